//! DXGI descriptors and the surface wrapper.

pub mod format;

use std::ptr::NonNull;

use crate::com::{Handle, RefCounted};
use crate::error::Result;
use crate::ffi::{SampleDescRaw, SurfaceDescRaw};
use crate::result::ResultCode;

pub use format::Format;

/// Multisampling parameters of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleDescription {
    pub count: u32,
    pub quality: u32,
}

impl Default for SampleDescription {
    fn default() -> Self {
        Self {
            count: 1,
            quality: 0,
        }
    }
}

impl From<SampleDescRaw> for SampleDescription {
    fn from(raw: SampleDescRaw) -> Self {
        Self {
            count: raw.count,
            quality: raw.quality,
        }
    }
}

impl From<SampleDescription> for SampleDescRaw {
    fn from(desc: SampleDescription) -> Self {
        Self {
            count: desc.count,
            quality: desc.quality,
        }
    }
}

/// Properties of a surface, snapshotted from the native description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceDescription {
    width: u32,
    height: u32,
    format: Format,
    sample_description: SampleDescription,
}

impl SurfaceDescription {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn sample_description(&self) -> SampleDescription {
        self.sample_description
    }
}

impl From<&SurfaceDescRaw> for SurfaceDescription {
    fn from(raw: &SurfaceDescRaw) -> Self {
        Self {
            width: raw.width,
            height: raw.height,
            format: Format::from_raw(raw.format),
            sample_description: raw.sample_desc.into(),
        }
    }
}

/// Native operations behind [`Surface`] (`IDXGISurface`).
pub trait SurfaceInterface: RefCounted {
    unsafe fn get_desc(this: NonNull<Self>, desc: &mut SurfaceDescRaw) -> ResultCode;
}

/// A DXGI surface.
pub struct Surface<I: SurfaceInterface> {
    handle: Handle<I>,
}

impl<I: SurfaceInterface> Surface<I> {
    pub fn from_handle(handle: Handle<I>) -> Self {
        Self { handle }
    }

    pub fn description(&self) -> Result<SurfaceDescription> {
        let ptr = self.handle.get()?;
        let mut raw = SurfaceDescRaw::default();
        crate::result::check_with(unsafe { I::get_desc(ptr, &mut raw) }, "IDXGISurface::GetDesc")?;
        Ok(SurfaceDescription::from(&raw))
    }

    pub fn handle(&self) -> &Handle<I> {
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
    use std::ptr::NonNull;

    use windows::Win32::Graphics::Dxgi::IDXGISurface;

    use super::SurfaceInterface;
    use crate::com::Com;
    use crate::ffi::{SampleDescRaw, SurfaceDescRaw};
    use crate::result::ResultCode;

    impl SurfaceInterface for Com<IDXGISurface> {
        unsafe fn get_desc(this: NonNull<Self>, desc: &mut SurfaceDescRaw) -> ResultCode {
            match Com::borrow(&this).GetDesc() {
                Ok(d) => {
                    *desc = SurfaceDescRaw {
                        width: d.Width,
                        height: d.Height,
                        format: d.Format.0 as u32,
                        sample_desc: SampleDescRaw {
                            count: d.SampleDesc.Count,
                            quality: d.SampleDesc.Quality,
                        },
                    };
                    ResultCode::SUCCESS
                }
                Err(e) => e.code().into(),
            }
        }
    }
}
