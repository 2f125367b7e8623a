use std::ffi::c_void;
use std::ptr::NonNull;

use crate::com::{Handle, RefCounted};
use crate::error::Result;

/// Native operations behind [`DataBuffer`] (`ID3DXBuffer`, `ID3DBlob`).
pub trait BufferInterface: RefCounted {
    unsafe fn buffer_pointer(this: NonNull<Self>) -> *mut c_void;
    unsafe fn buffer_size(this: NonNull<Self>) -> usize;
}

/// A native memory blob returned by compression and shader-style calls.
pub struct DataBuffer<B: BufferInterface> {
    handle: Handle<B>,
}

impl<B: BufferInterface> DataBuffer<B> {
    pub fn from_handle(handle: Handle<B>) -> Self {
        Self { handle }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(unsafe { B::buffer_size(self.handle.get()?) })
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// The buffer contents, valid while `self` is alive and not disposed.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        let ptr = self.handle.get()?;
        unsafe {
            let data = B::buffer_pointer(ptr) as *const u8;
            let size = B::buffer_size(ptr);
            if data.is_null() || size == 0 {
                return Ok(&[]);
            }
            Ok(std::slice::from_raw_parts(data, size))
        }
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(self.as_bytes()?.to_vec())
    }

    pub fn handle(&self) -> &Handle<B> {
        &self.handle
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_disposed()
    }
}

#[cfg(windows)]
mod native {
    use std::ffi::c_void;
    use std::ptr::NonNull;

    use windows::Win32::Graphics::Direct3D::ID3DBlob;

    use super::BufferInterface;
    use crate::com::Com;

    // `ID3DXBuffer` shares this vtable layout.
    impl BufferInterface for Com<ID3DBlob> {
        unsafe fn buffer_pointer(this: NonNull<Self>) -> *mut c_void {
            Com::borrow(&this).GetBufferPointer()
        }

        unsafe fn buffer_size(this: NonNull<Self>) -> usize {
            Com::borrow(&this).GetBufferSize()
        }
    }
}
