//! `#[repr(C)]` mirrors of the native structs crossing the binding boundary.
//!
//! Field order and widths match the DXGI, D3D11 and D3DX9 headers so buffers
//! of these types can be handed to native calls directly.

use std::ffi::c_void;

use bytemuck::{Pod, Zeroable};

use crate::math::{Quaternion, Vector3};

/// `DXGI_SAMPLE_DESC`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SampleDescRaw {
    pub count: u32,
    pub quality: u32,
}

/// `DXGI_SURFACE_DESC`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SurfaceDescRaw {
    pub width: u32,
    pub height: u32,
    pub format: u32,
    pub sample_desc: SampleDescRaw,
}

/// `D3D11_TEXTURE2D_DESC`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Texture2DDescRaw {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub array_size: u32,
    pub format: u32,
    pub sample_desc: SampleDescRaw,
    pub usage: i32,
    pub bind_flags: u32,
    pub cpu_access_flags: u32,
    pub misc_flags: u32,
}

/// `D3D11_SUBRESOURCE_DATA`
#[repr(C)]
#[derive(Clone, Copy, Debug, Zeroable)]
pub struct SubresourceDataRaw {
    pub sys_mem: *const c_void,
    pub sys_mem_pitch: u32,
    pub sys_mem_slice_pitch: u32,
}

/// `D3DXKEY_VECTOR3`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct KeyVector3Raw {
    pub time: f32,
    pub value: Vector3,
}

/// `D3DXKEY_QUATERNION`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct KeyQuaternionRaw {
    pub time: f32,
    pub value: Quaternion,
}

/// `D3DXKEY_CALLBACK`
#[repr(C)]
#[derive(Clone, Copy, Debug, Zeroable)]
pub struct KeyCallbackRaw {
    pub time: f32,
    pub callback_data: *mut c_void,
}
