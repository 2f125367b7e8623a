//! Direct3D 11 device and texture wrappers.

pub mod texture;

use std::ptr::NonNull;

use crate::com::{Handle, RefCounted};
use crate::ffi::{SubresourceDataRaw, Texture2DDescRaw};
use crate::result::ResultCode;

pub use texture::{
    BindFlags, CpuAccessFlags, DataRectangle, ResourceOptionFlags, Texture2D,
    Texture2DDescription, Usage,
};

/// Native operations behind [`Device`] (`ID3D11Device`).
pub trait DeviceInterface: RefCounted {
    type Texture2D: Texture2DInterface;

    /// `initial_data` is null or points at one entry per subresource.
    unsafe fn create_texture_2d(
        this: NonNull<Self>,
        desc: &Texture2DDescRaw,
        initial_data: *const SubresourceDataRaw,
        texture: &mut *mut Self::Texture2D,
    ) -> ResultCode;
}

/// Native operations behind [`Texture2D`] (`ID3D11Texture2D`).
pub trait Texture2DInterface: RefCounted {
    type Surface: crate::dxgi::SurfaceInterface;

    unsafe fn get_desc(this: NonNull<Self>, desc: &mut Texture2DDescRaw);

    /// `QueryInterface` for the DXGI surface view of the texture.
    unsafe fn query_surface(this: NonNull<Self>, surface: &mut *mut Self::Surface) -> ResultCode;
}

/// A Direct3D 11 device.
pub struct Device<D: DeviceInterface> {
    handle: Handle<D>,
}

impl<D: DeviceInterface> Device<D> {
    pub fn from_handle(handle: Handle<D>) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &Handle<D> {
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
pub use native::create_device;

#[cfg(windows)]
mod native {
    use std::ptr::NonNull;

    use windows::core::Interface;
    use windows::Win32::Foundation::HMODULE;
    use windows::Win32::Graphics::Direct3D::*;
    use windows::Win32::Graphics::Direct3D11::*;
    use windows::Win32::Graphics::Dxgi::IDXGISurface;

    use super::{Device, DeviceInterface, Texture2DInterface};
    use crate::com::{Com, Handle};
    use crate::error::{InteropError, Result};
    use crate::ffi::{SubresourceDataRaw, Texture2DDescRaw};
    use crate::result::ResultCode;

    /// Create a hardware device with BGRA support.
    pub fn create_device() -> Result<Device<Com<ID3D11Device>>> {
        let feature_levels = [D3D_FEATURE_LEVEL_11_1, D3D_FEATURE_LEVEL_11_0];
        let mut device = None;

        unsafe {
            D3D11CreateDevice(
                None,
                D3D_DRIVER_TYPE_HARDWARE,
                HMODULE::default(),
                D3D11_CREATE_DEVICE_BGRA_SUPPORT,
                Some(&feature_levels),
                D3D11_SDK_VERSION,
                Some(&mut device),
                None,
                None,
            )?;
        }

        let device = device.ok_or(InteropError::NullPointer {
            type_name: "ID3D11Device",
        })?;
        let handle = unsafe { Handle::wrap(Com::into_raw(device))? };
        Ok(Device::from_handle(handle))
    }

    // The mirror structs in `ffi` share the header layout, so pointers are
    // passed through with a cast.
    impl DeviceInterface for Com<ID3D11Device> {
        type Texture2D = Com<ID3D11Texture2D>;

        unsafe fn create_texture_2d(
            this: NonNull<Self>,
            desc: &Texture2DDescRaw,
            initial_data: *const SubresourceDataRaw,
            texture: &mut *mut Self::Texture2D,
        ) -> ResultCode {
            let desc = desc as *const Texture2DDescRaw as *const D3D11_TEXTURE2D_DESC;
            let data = (!initial_data.is_null())
                .then_some(initial_data as *const D3D11_SUBRESOURCE_DATA);
            let mut created = None;
            match Com::borrow(&this).CreateTexture2D(desc, data, Some(&mut created)) {
                Ok(()) => {
                    if let Some(t) = created {
                        *texture = Com::into_raw(t);
                    }
                    ResultCode::SUCCESS
                }
                Err(e) => e.code().into(),
            }
        }
    }

    impl Texture2DInterface for Com<ID3D11Texture2D> {
        type Surface = Com<IDXGISurface>;

        unsafe fn get_desc(this: NonNull<Self>, desc: &mut Texture2DDescRaw) {
            Com::borrow(&this).GetDesc(desc as *mut Texture2DDescRaw as *mut D3D11_TEXTURE2D_DESC);
        }

        unsafe fn query_surface(
            this: NonNull<Self>,
            surface: &mut *mut Self::Surface,
        ) -> ResultCode {
            match Com::borrow(&this).cast::<IDXGISurface>() {
                Ok(s) => {
                    *surface = Com::into_raw(s);
                    ResultCode::SUCCESS
                }
                Err(e) => e.code().into(),
            }
        }
    }
}
