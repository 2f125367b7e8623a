//! Ownership of native reference-counted interface pointers.
//!
//! A [`Handle`] owns one reference on a native object. [`Handle::wrap`] takes
//! over a reference the caller already holds, [`Handle::adopt`] acquires a new
//! one. Clones acquire, drops and [`Handle::dispose`] release, so every
//! acquire is paired with exactly one release.

use std::collections::BTreeMap;
use std::fmt;
use std::ptr::NonNull;

use parking_lot::Mutex;

use crate::error::{InteropError, Result};

/// A native object with intrusive reference counting.
///
/// # Safety
///
/// `add_ref` and `release` must behave like `IUnknown::AddRef`/`Release`: the
/// object stays valid while its count is non-zero and the returned value is
/// the new count.
pub unsafe trait RefCounted {
    /// Name used in errors and leak reports.
    const TYPE_NAME: &'static str;

    unsafe fn add_ref(this: NonNull<Self>) -> u32;
    unsafe fn release(this: NonNull<Self>) -> u32;
}

/// An owned reference to a native object. `None` inside means disposed.
pub struct Handle<T: RefCounted> {
    ptr: Option<NonNull<T>>,
}

impl<T: RefCounted> Handle<T> {
    /// Takes ownership of a reference the caller already holds.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live object on which the caller owns one
    /// reference; that reference moves into the handle.
    pub unsafe fn wrap(ptr: *mut T) -> Result<Self> {
        let ptr = NonNull::new(ptr).ok_or(InteropError::NullPointer {
            type_name: T::TYPE_NAME,
        })?;
        track::acquire::<T>(ptr);
        tracing::debug!("Wrapped {} at {:p}", T::TYPE_NAME, ptr);
        Ok(Self { ptr: Some(ptr) })
    }

    /// Shares a pointer borrowed from another owner, acquiring a reference.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live object.
    pub unsafe fn adopt(ptr: *mut T) -> Result<Self> {
        let ptr = NonNull::new(ptr).ok_or(InteropError::NullPointer {
            type_name: T::TYPE_NAME,
        })?;
        T::add_ref(ptr);
        track::acquire::<T>(ptr);
        tracing::debug!("Adopted {} at {:p}", T::TYPE_NAME, ptr);
        Ok(Self { ptr: Some(ptr) })
    }

    /// Releases the reference. Further access fails with `ObjectDisposed`;
    /// disposing twice does nothing.
    pub fn dispose(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            track::release::<T>(ptr);
            // SAFETY: the handle owned exactly this reference.
            let remaining = unsafe { T::release(ptr) };
            tracing::debug!("Released {} at {:p} ({remaining} left)", T::TYPE_NAME, ptr);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.ptr.is_none()
    }

    /// The native pointer, or `ObjectDisposed`.
    pub fn get(&self) -> Result<NonNull<T>> {
        self.ptr.ok_or(InteropError::ObjectDisposed {
            type_name: T::TYPE_NAME,
        })
    }

    /// The raw pointer, null once disposed.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.map_or(std::ptr::null_mut(), NonNull::as_ptr)
    }

    /// Hands the reference back to native code without releasing it.
    pub fn into_raw(mut self) -> Result<*mut T> {
        let ptr = self.ptr.take().ok_or(InteropError::ObjectDisposed {
            type_name: T::TYPE_NAME,
        })?;
        track::release::<T>(ptr);
        Ok(ptr.as_ptr())
    }
}

impl<T: RefCounted> Clone for Handle<T> {
    fn clone(&self) -> Self {
        if let Some(ptr) = self.ptr {
            // SAFETY: we hold a reference, so the object is alive.
            unsafe { T::add_ref(ptr) };
            track::acquire::<T>(ptr);
        }
        Self { ptr: self.ptr }
    }
}

impl<T: RefCounted> Drop for Handle<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: RefCounted> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T: RefCounted> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ptr {
            Some(ptr) => write!(f, "Handle<{}>({:p})", T::TYPE_NAME, ptr),
            None => write!(f, "Handle<{}>(disposed)", T::TYPE_NAME),
        }
    }
}

/// A live native object recorded by the object table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveObject {
    pub address: usize,
    pub type_name: &'static str,
    /// Number of handles currently referencing the object.
    pub handles: u32,
}

/// Objects with at least one live handle, when tracking is enabled.
pub fn live_objects() -> Vec<LiveObject> {
    track::TABLE.lock().values().cloned().collect()
}

/// Logs every tracked object that is still alive and returns the count.
pub fn report_leaks() -> usize {
    let live = live_objects();
    for obj in &live {
        tracing::warn!(
            "Live {} at 0x{:x} ({} handle(s))",
            obj.type_name,
            obj.address,
            obj.handles
        );
    }
    live.len()
}

mod track {
    use super::*;

    pub(super) static TABLE: Mutex<BTreeMap<usize, LiveObject>> = Mutex::new(BTreeMap::new());

    pub(super) fn acquire<T: RefCounted>(ptr: NonNull<T>) {
        if !crate::config::current().enable_object_tracking {
            return;
        }
        let address = ptr.as_ptr() as usize;
        TABLE
            .lock()
            .entry(address)
            .or_insert(LiveObject {
                address,
                type_name: T::TYPE_NAME,
                handles: 0,
            })
            .handles += 1;
    }

    // Runs even when tracking was switched off after the acquire.
    pub(super) fn release<T: RefCounted>(ptr: NonNull<T>) {
        let address = ptr.as_ptr() as usize;
        let mut table = TABLE.lock();
        if let Some(obj) = table.get_mut(&address) {
            obj.handles -= 1;
            if obj.handles == 0 {
                table.remove(&address);
            }
        }
    }
}

#[cfg(windows)]
pub use self::windows_com::{Com, InterfaceName};

#[cfg(windows)]
mod windows_com {
    use std::ffi::c_void;
    use std::marker::PhantomData;
    use std::ptr::NonNull;

    use windows::core::{IUnknown, IUnknown_Vtbl, Interface};
    use windows::Win32::Graphics::Direct3D::ID3DBlob;
    use windows::Win32::Graphics::Direct3D11::{ID3D11Device, ID3D11Texture2D};
    use windows::Win32::Graphics::Dxgi::IDXGISurface;

    use super::RefCounted;

    /// Marker for a pointer to a `windows` COM interface `I`.
    ///
    /// `Handle<Com<I>>` holds the same raw pointer `I::into_raw` produces.
    #[repr(C)]
    pub struct Com<I: Interface> {
        _opaque: [u8; 0],
        _marker: PhantomData<I>,
    }

    impl<I: Interface> Com<I> {
        /// Moves an owned interface into a raw pointer for [`super::Handle::wrap`].
        pub fn into_raw(interface: I) -> *mut Self {
            interface.into_raw() as *mut Self
        }

        /// Borrows the interface behind `this` for the duration of a call.
        ///
        /// # Safety
        ///
        /// `this` must be a live pointer obtained from an `I`.
        pub unsafe fn borrow<'a>(this: &'a NonNull<Self>) -> &'a I {
            // Interfaces are transparent over a non-null interface pointer.
            &*(this as *const NonNull<Self> as *const I)
        }
    }

    /// Interface name reported in errors, logs and leak reports.
    pub trait InterfaceName: Interface {
        const NAME: &'static str;
    }

    macro_rules! interface_names {
        ($($ty:ident),* $(,)?) => {
            $(impl InterfaceName for $ty {
                const NAME: &'static str = stringify!($ty);
            })*
        };
    }

    interface_names!(IUnknown, ID3DBlob, ID3D11Device, ID3D11Texture2D, IDXGISurface);

    unsafe fn vtable(this: *mut c_void) -> *const IUnknown_Vtbl {
        *(this as *const *const IUnknown_Vtbl)
    }

    unsafe impl<I: InterfaceName> RefCounted for Com<I> {
        const TYPE_NAME: &'static str = I::NAME;

        unsafe fn add_ref(this: NonNull<Self>) -> u32 {
            let raw = this.as_ptr() as *mut c_void;
            ((*vtable(raw)).AddRef)(raw)
        }

        unsafe fn release(this: NonNull<Self>) -> u32 {
            let raw = this.as_ptr() as *mut c_void;
            ((*vtable(raw)).Release)(raw)
        }
    }
}
