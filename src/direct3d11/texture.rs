use std::ffi::c_void;

use bytemuck::Pod;

use super::{Device, DeviceInterface, Texture2DInterface};
use crate::com::Handle;
use crate::dxgi::{Format, SampleDescription, Surface};
use crate::error::{InteropError, Result};
use crate::ffi::{SubresourceDataRaw, Texture2DDescRaw};
use crate::result;
use crate::scratch::ScratchBuffer;

/// Expected CPU/GPU access pattern of a resource (`D3D11_USAGE`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Usage {
    #[default]
    Default,
    Immutable,
    Dynamic,
    Staging,
}

impl Usage {
    fn to_raw(self) -> i32 {
        match self {
            Usage::Default => 0,
            Usage::Immutable => 1,
            Usage::Dynamic => 2,
            Usage::Staging => 3,
        }
    }

    fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Usage::Immutable,
            2 => Usage::Dynamic,
            3 => Usage::Staging,
            _ => Usage::Default,
        }
    }
}

macro_rules! flags {
    ($(#[$doc:meta])* $name:ident { $($flag:ident = $value:expr),* $(,)? }) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
        pub struct $name(pub u32);

        impl $name {
            pub const NONE: $name = $name(0);
            $(pub const $flag: $name = $name($value);)*

            pub fn contains(self, other: $name) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }
    };
}

flags!(
    /// Pipeline stages a resource binds to (`D3D11_BIND_FLAG`).
    BindFlags {
        VERTEX_BUFFER = 0x1,
        INDEX_BUFFER = 0x2,
        CONSTANT_BUFFER = 0x4,
        SHADER_RESOURCE = 0x8,
        STREAM_OUTPUT = 0x10,
        RENDER_TARGET = 0x20,
        DEPTH_STENCIL = 0x40,
        UNORDERED_ACCESS = 0x80,
        DECODER = 0x200,
        VIDEO_ENCODER = 0x400,
    }
);

flags!(
    /// `D3D11_CPU_ACCESS_FLAG`
    CpuAccessFlags {
        WRITE = 0x10000,
        READ = 0x20000,
    }
);

flags!(
    /// `D3D11_RESOURCE_MISC_FLAG`
    ResourceOptionFlags {
        GENERATE_MIPMAPS = 0x1,
        SHARED = 0x2,
        TEXTURE_CUBE = 0x4,
        SHARED_KEYED_MUTEX = 0x100,
        GDI_COMPATIBLE = 0x200,
    }
);

/// Describes a two-dimensional texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texture2DDescription {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub array_size: u32,
    pub format: Format,
    pub sample_description: SampleDescription,
    pub usage: Usage,
    pub bind_flags: BindFlags,
    pub cpu_access_flags: CpuAccessFlags,
    pub option_flags: ResourceOptionFlags,
}

impl Default for Texture2DDescription {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            mip_levels: 1,
            array_size: 1,
            format: Format::Unknown,
            sample_description: SampleDescription::default(),
            usage: Usage::Default,
            bind_flags: BindFlags::NONE,
            cpu_access_flags: CpuAccessFlags::NONE,
            option_flags: ResourceOptionFlags::NONE,
        }
    }
}

impl Texture2DDescription {
    /// A single-mip render target, the shape most capture paths need.
    pub fn render_target(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            format,
            bind_flags: BindFlags::RENDER_TARGET | BindFlags::SHADER_RESOURCE,
            ..Default::default()
        }
    }

    fn subresource_count(&self) -> Option<usize> {
        (self.mip_levels > 0).then(|| self.mip_levels as usize * self.array_size as usize)
    }
}

impl From<&Texture2DDescription> for Texture2DDescRaw {
    fn from(d: &Texture2DDescription) -> Self {
        Self {
            width: d.width,
            height: d.height,
            mip_levels: d.mip_levels,
            array_size: d.array_size,
            format: d.format.to_raw(),
            sample_desc: d.sample_description.into(),
            usage: d.usage.to_raw(),
            bind_flags: d.bind_flags.0,
            cpu_access_flags: d.cpu_access_flags.0,
            misc_flags: d.option_flags.0,
        }
    }
}

impl From<&Texture2DDescRaw> for Texture2DDescription {
    fn from(raw: &Texture2DDescRaw) -> Self {
        Self {
            width: raw.width,
            height: raw.height,
            mip_levels: raw.mip_levels,
            array_size: raw.array_size,
            format: Format::from_raw(raw.format),
            sample_description: raw.sample_desc.into(),
            usage: Usage::from_raw(raw.usage),
            bind_flags: BindFlags(raw.bind_flags),
            cpu_access_flags: CpuAccessFlags(raw.cpu_access_flags),
            option_flags: ResourceOptionFlags(raw.misc_flags),
        }
    }
}

/// Initial data for one subresource: bytes plus the row pitch.
#[derive(Clone, Copy, Debug)]
pub struct DataRectangle<'a> {
    pub data: &'a [u8],
    pub pitch: u32,
}

impl<'a> DataRectangle<'a> {
    pub fn new(data: &'a [u8], pitch: u32) -> Self {
        Self { data, pitch }
    }

    /// Views typed pixels as bytes.
    pub fn from_pixels<T: Pod>(pixels: &'a [T], pitch: u32) -> Self {
        Self::new(bytemuck::cast_slice(pixels), pitch)
    }
}

fn check_subresource_count(
    description: &Texture2DDescription,
    data: &[DataRectangle<'_>],
) -> Result<()> {
    let expected = description.subresource_count().ok_or_else(|| {
        InteropError::InvalidArgument("initial data requires an explicit mip level count".into())
    })?;
    if data.len() != expected {
        return Err(InteropError::InvalidArgument(format!(
            "expected {expected} subresource(s) of initial data, got {}",
            data.len()
        )));
    }
    Ok(())
}

/// Subresources are ordered mip-major within each array slice.
fn check_rectangle(
    description: &Texture2DDescription,
    texel: u32,
    index: usize,
    rect: &DataRectangle<'_>,
) -> Result<()> {
    let mip = (index % description.mip_levels as usize) as u32;
    let width = description.width.checked_shr(mip).unwrap_or(0).max(1) as usize;
    let height = description.height.checked_shr(mip).unwrap_or(0).max(1) as usize;
    let row = width * texel as usize;
    let pitch = rect.pitch as usize;

    if pitch < row {
        return Err(InteropError::InvalidArgument(format!(
            "subresource {index}: pitch {pitch} is shorter than a {row} byte row"
        )));
    }
    let needed = pitch * (height - 1) + row;
    if rect.data.len() < needed {
        return Err(InteropError::InvalidArgument(format!(
            "subresource {index}: {} byte(s) of data, mip {mip} needs {needed}",
            rect.data.len()
        )));
    }
    Ok(())
}

/// A two-dimensional texture (`ID3D11Texture2D`).
pub struct Texture2D<I: Texture2DInterface> {
    handle: Handle<I>,
}

impl<I: Texture2DInterface> Texture2D<I> {
    /// Wraps an existing texture without a native call.
    pub fn from_handle(handle: Handle<I>) -> Self {
        Self { handle }
    }

    pub fn new<D>(device: &Device<D>, description: &Texture2DDescription) -> Result<Self>
    where
        D: DeviceInterface<Texture2D = I>,
    {
        Self::build(device, description, std::ptr::null())
    }

    /// Creates the texture with one [`DataRectangle`] per subresource.
    ///
    /// Every rectangle must cover its mip level: the pitch spans a full row
    /// and the data spans `pitch * (rows - 1)` plus one last row. Formats
    /// without a fixed texel size (block compressed, planar) are refused
    /// here; use [`Texture2D::with_data_unchecked`] for those.
    pub fn with_data<D>(
        device: &Device<D>,
        description: &Texture2DDescription,
        data: &[DataRectangle<'_>],
    ) -> Result<Self>
    where
        D: DeviceInterface<Texture2D = I>,
    {
        check_subresource_count(description, data)?;
        let texel = description.format.size_in_bytes().ok_or_else(|| {
            InteropError::InvalidArgument(format!(
                "cannot validate initial data for {:?}; use with_data_unchecked",
                description.format
            ))
        })?;
        for (index, rect) in data.iter().enumerate() {
            check_rectangle(description, texel, index, rect)?;
        }
        unsafe { Self::with_data_unchecked(device, description, data) }
    }

    /// Like [`Texture2D::with_data`] but only checks the rectangle count.
    ///
    /// # Safety
    ///
    /// Each rectangle must hold at least as many bytes as the driver reads
    /// for its subresource at the given pitch.
    pub unsafe fn with_data_unchecked<D>(
        device: &Device<D>,
        description: &Texture2DDescription,
        data: &[DataRectangle<'_>],
    ) -> Result<Self>
    where
        D: DeviceInterface<Texture2D = I>,
    {
        check_subresource_count(description, data)?;
        let rows = ScratchBuffer::from_iter_exact(data.iter().map(|rect| SubresourceDataRaw {
            sys_mem: rect.data.as_ptr() as *const c_void,
            sys_mem_pitch: rect.pitch,
            sys_mem_slice_pitch: 0,
        }));
        Self::build(device, description, rows.as_ptr())
    }

    fn build<D>(
        device: &Device<D>,
        description: &Texture2DDescription,
        data: *const SubresourceDataRaw,
    ) -> Result<Self>
    where
        D: DeviceInterface<Texture2D = I>,
    {
        let device = device.handle().get()?;
        let raw = Texture2DDescRaw::from(description);
        let mut texture = std::ptr::null_mut();

        let hr = unsafe { D::create_texture_2d(device, &raw, data, &mut texture) };
        if let Err(e) = result::check_with(hr, "ID3D11Device::CreateTexture2D") {
            if !texture.is_null() {
                // Never hand out a texture from a failed call.
                drop(unsafe { Handle::wrap(texture) });
            }
            return Err(e);
        }

        let handle = unsafe { Handle::wrap(texture)? };
        Ok(Self { handle })
    }

    pub fn description(&self) -> Result<Texture2DDescription> {
        let ptr = self.handle.get()?;
        let mut raw = Texture2DDescRaw::default();
        unsafe { I::get_desc(ptr, &mut raw) };
        Ok(Texture2DDescription::from(&raw))
    }

    /// The DXGI surface view of this texture.
    pub fn as_surface(&self) -> Result<Surface<I::Surface>> {
        let ptr = self.handle.get()?;
        let mut surface = std::ptr::null_mut();
        result::check_with(
            unsafe { I::query_surface(ptr, &mut surface) },
            "QueryInterface(IDXGISurface)",
        )?;
        Ok(Surface::from_handle(unsafe { Handle::wrap(surface)? }))
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
