//! D3DX9 animation sets reached through their raw vtables.
//!
//! The `windows` crate carries no D3DX bindings, so the interfaces are
//! declared here in header order. Creation goes through `d3dx9_43.dll`, which
//! is loaded on first use and stays loaded for the life of the process.
#![cfg_attr(not(windows), allow(dead_code))]

use std::ffi::{c_char, c_void};
use std::ptr::NonNull;

use super::animation::AnimationSetInterface;
use crate::com::RefCounted;
use crate::ffi::{KeyCallbackRaw, KeyQuaternionRaw, KeyVector3Raw};
use crate::math::{Quaternion, Vector3};
use crate::result::ResultCode;

type This = *mut c_void;
type HResult = i32;

#[repr(C)]
pub(crate) struct UnknownVtbl {
    pub query_interface: unsafe extern "system" fn(This, *const c_void, *mut *mut c_void) -> HResult,
    pub add_ref: unsafe extern "system" fn(This) -> u32,
    pub release: unsafe extern "system" fn(This) -> u32,
}

/// `ID3DXAnimationSet`
#[repr(C)]
pub(crate) struct AnimationSetVtbl {
    pub unknown: UnknownVtbl,
    pub get_name: unsafe extern "system" fn(This) -> *const c_char,
    pub get_period: unsafe extern "system" fn(This) -> f64,
    pub get_periodic_position: unsafe extern "system" fn(This, f64) -> f64,
    pub get_num_animations: unsafe extern "system" fn(This) -> u32,
    pub get_animation_name_by_index: unsafe extern "system" fn(This, u32, *mut *const c_char) -> HResult,
    pub get_animation_index_by_name: unsafe extern "system" fn(This, *const c_char, *mut u32) -> HResult,
    pub get_srt: unsafe extern "system" fn(
        This,
        f64,
        u32,
        *mut Vector3,
        *mut Quaternion,
        *mut Vector3,
    ) -> HResult,
    pub get_callback: unsafe extern "system" fn(This, f64, u32, *mut f64, *mut *mut c_void) -> HResult,
}

type KeyCount = unsafe extern "system" fn(This, u32) -> u32;
type KeyBulk<K> = unsafe extern "system" fn(This, u32, *mut K) -> HResult;
type KeyOne<K> = unsafe extern "system" fn(This, u32, u32, *mut K) -> HResult;
type KeyRemove = unsafe extern "system" fn(This, u32, u32) -> HResult;

/// `ID3DXKeyframedAnimationSet`
#[repr(C)]
pub(crate) struct KeyframedVtbl {
    pub base: AnimationSetVtbl,
    pub get_playback_type: unsafe extern "system" fn(This) -> u32,
    pub get_source_ticks_per_second: unsafe extern "system" fn(This) -> f64,
    pub get_num_scale_keys: KeyCount,
    pub get_scale_keys: KeyBulk<KeyVector3Raw>,
    pub get_scale_key: KeyOne<KeyVector3Raw>,
    pub set_scale_key: KeyOne<KeyVector3Raw>,
    pub get_num_rotation_keys: KeyCount,
    pub get_rotation_keys: KeyBulk<KeyQuaternionRaw>,
    pub get_rotation_key: KeyOne<KeyQuaternionRaw>,
    pub set_rotation_key: KeyOne<KeyQuaternionRaw>,
    pub get_num_translation_keys: KeyCount,
    pub get_translation_keys: KeyBulk<KeyVector3Raw>,
    pub get_translation_key: KeyOne<KeyVector3Raw>,
    pub set_translation_key: KeyOne<KeyVector3Raw>,
    pub get_num_callback_keys: unsafe extern "system" fn(This) -> u32,
    pub get_callback_keys: unsafe extern "system" fn(This, *mut KeyCallbackRaw) -> HResult,
    pub get_callback_key: unsafe extern "system" fn(This, u32, *mut KeyCallbackRaw) -> HResult,
    pub set_callback_key: unsafe extern "system" fn(This, u32, *mut KeyCallbackRaw) -> HResult,
    pub unregister_scale_key: KeyRemove,
    pub unregister_rotation_key: KeyRemove,
    pub unregister_translation_key: KeyRemove,
    pub register_animation_srt_keys: unsafe extern "system" fn(
        This,
        *const c_char,
        u32,
        u32,
        u32,
        *const KeyVector3Raw,
        *const KeyQuaternionRaw,
        *const KeyVector3Raw,
        *mut u32,
    ) -> HResult,
    pub compress: unsafe extern "system" fn(This, u32, f32, *mut c_void, *mut *mut c_void) -> HResult,
    pub unregister_animation: unsafe extern "system" fn(This, u32) -> HResult,
}

/// `ID3DXCompressedAnimationSet`
#[repr(C)]
pub(crate) struct CompressedVtbl {
    pub base: AnimationSetVtbl,
    pub get_playback_type: unsafe extern "system" fn(This) -> u32,
    pub get_source_ticks_per_second: unsafe extern "system" fn(This) -> f64,
    pub get_compressed_data: unsafe extern "system" fn(This, *mut *mut c_void) -> HResult,
    pub get_num_callback_keys: unsafe extern "system" fn(This) -> u32,
    pub get_callback_keys: unsafe extern "system" fn(This, *mut KeyCallbackRaw) -> HResult,
}

/// A native `ID3DXKeyframedAnimationSet` object.
#[repr(C)]
pub struct D3dxKeyframedAnimationSet {
    vtbl: *const KeyframedVtbl,
}

/// A native `ID3DXCompressedAnimationSet` object.
#[repr(C)]
pub struct D3dxCompressedAnimationSet {
    vtbl: *const CompressedVtbl,
}

fn raw<T>(this: NonNull<T>) -> This {
    this.as_ptr() as This
}

/// Every D3DX animation vtable starts with the base set's entries.
unsafe fn base<'a, T>(this: NonNull<T>) -> &'a AnimationSetVtbl {
    &**(this.as_ptr() as *const *const AnimationSetVtbl)
}

macro_rules! native_animation_set {
    ($ty:ident, $name:literal) => {
        unsafe impl RefCounted for $ty {
            const TYPE_NAME: &'static str = $name;

            unsafe fn add_ref(this: NonNull<Self>) -> u32 {
                (base(this).unknown.add_ref)(raw(this))
            }

            unsafe fn release(this: NonNull<Self>) -> u32 {
                (base(this).unknown.release)(raw(this))
            }
        }

        impl AnimationSetInterface for $ty {
            unsafe fn name(this: NonNull<Self>) -> *const c_char {
                (base(this).get_name)(raw(this))
            }

            unsafe fn period(this: NonNull<Self>) -> f64 {
                (base(this).get_period)(raw(this))
            }

            unsafe fn periodic_position(this: NonNull<Self>, position: f64) -> f64 {
                (base(this).get_periodic_position)(raw(this), position)
            }

            unsafe fn num_animations(this: NonNull<Self>) -> u32 {
                (base(this).get_num_animations)(raw(this))
            }

            unsafe fn animation_name_by_index(
                this: NonNull<Self>,
                index: u32,
                name: &mut *const c_char,
            ) -> ResultCode {
                (base(this).get_animation_name_by_index)(raw(this), index, name).into()
            }

            unsafe fn animation_index_by_name(
                this: NonNull<Self>,
                name: *const c_char,
                index: &mut u32,
            ) -> ResultCode {
                (base(this).get_animation_index_by_name)(raw(this), name, index).into()
            }

            unsafe fn srt(
                this: NonNull<Self>,
                periodic_position: f64,
                animation: u32,
                scale: &mut Vector3,
                rotation: &mut Quaternion,
                translation: &mut Vector3,
            ) -> ResultCode {
                (base(this).get_srt)(raw(this), periodic_position, animation, scale, rotation, translation)
                    .into()
            }

            unsafe fn callback(
                this: NonNull<Self>,
                position: f64,
                flags: u32,
                callback_position: &mut f64,
                callback_data: &mut *mut c_void,
            ) -> ResultCode {
                (base(this).get_callback)(raw(this), position, flags, callback_position, callback_data)
                    .into()
            }
        }
    };
}

native_animation_set!(D3dxKeyframedAnimationSet, "ID3DXKeyframedAnimationSet");
native_animation_set!(D3dxCompressedAnimationSet, "ID3DXCompressedAnimationSet");

#[cfg(windows)]
mod d3dx {
    use std::ffi::{c_char, c_void};
    use std::ptr::NonNull;
    use std::sync::OnceLock;

    use windows::core::{s, w};
    use windows::Win32::Graphics::Direct3D::ID3DBlob;
    use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

    use super::{raw, D3dxCompressedAnimationSet, D3dxKeyframedAnimationSet, HResult};
    use crate::com::Com;
    use crate::direct3d9::animation::{
        CompressedAnimationSetInterface, KeyframedAnimationSetInterface,
    };
    use crate::ffi::{KeyCallbackRaw, KeyQuaternionRaw, KeyVector3Raw};
    use crate::result::ResultCode;

    type CreateKeyframedFn = unsafe extern "system" fn(
        *const c_char,
        f64,
        u32,
        u32,
        u32,
        *const KeyCallbackRaw,
        *mut *mut D3dxKeyframedAnimationSet,
    ) -> HResult;

    type CreateCompressedFn = unsafe extern "system" fn(
        *const c_char,
        f64,
        u32,
        *mut c_void,
        u32,
        *const KeyCallbackRaw,
        *mut *mut D3dxCompressedAnimationSet,
    ) -> HResult;

    struct Exports {
        create_keyframed: CreateKeyframedFn,
        create_compressed: CreateCompressedFn,
    }

    static EXPORTS: OnceLock<Result<Exports, ResultCode>> = OnceLock::new();

    fn exports() -> Result<&'static Exports, ResultCode> {
        EXPORTS.get_or_init(|| unsafe { load() }).as_ref().map_err(|code| *code)
    }

    // Never freed: live sets call back into the module.
    unsafe fn load() -> Result<Exports, ResultCode> {
        let module = LoadLibraryW(w!("d3dx9_43.dll")).map_err(|e| {
            tracing::warn!("Failed to load d3dx9_43.dll: {e}");
            ResultCode::from(e.code())
        })?;
        let keyframed = GetProcAddress(module, s!("D3DXCreateKeyframedAnimationSet"));
        let compressed = GetProcAddress(module, s!("D3DXCreateCompressedAnimationSet"));
        match (keyframed, compressed) {
            (Some(keyframed), Some(compressed)) => {
                tracing::debug!("Loaded D3DX animation exports from d3dx9_43.dll");
                Ok(Exports {
                    create_keyframed: std::mem::transmute::<_, CreateKeyframedFn>(keyframed),
                    create_compressed: std::mem::transmute::<_, CreateCompressedFn>(compressed),
                })
            }
            _ => {
                tracing::warn!("d3dx9_43.dll lacks the animation set exports");
                Err(ResultCode::NOT_IMPLEMENTED)
            }
        }
    }

    unsafe fn keyframed<'a>(this: NonNull<D3dxKeyframedAnimationSet>) -> &'a super::KeyframedVtbl {
        &*(*this.as_ptr()).vtbl
    }

    unsafe fn compressed<'a>(this: NonNull<D3dxCompressedAnimationSet>) -> &'a super::CompressedVtbl {
        &*(*this.as_ptr()).vtbl
    }

    // `ID3DXBuffer` and `ID3DBlob` share one vtable layout.
    fn blob_out(data: &mut *mut Com<ID3DBlob>) -> *mut *mut c_void {
        data as *mut *mut Com<ID3DBlob> as *mut *mut c_void
    }

    impl KeyframedAnimationSetInterface for D3dxKeyframedAnimationSet {
        type Buffer = Com<ID3DBlob>;

        unsafe fn create(
            name: *const c_char,
            ticks_per_second: f64,
            playback: u32,
            animation_count: u32,
            callback_key_count: u32,
            callback_keys: *const KeyCallbackRaw,
            set: &mut *mut Self,
        ) -> ResultCode {
            match exports() {
                Ok(d3dx) => (d3dx.create_keyframed)(
                    name,
                    ticks_per_second,
                    playback,
                    animation_count,
                    callback_key_count,
                    callback_keys,
                    set,
                )
                .into(),
                Err(code) => code,
            }
        }

        unsafe fn playback_type(this: NonNull<Self>) -> u32 {
            (keyframed(this).get_playback_type)(raw(this))
        }

        unsafe fn source_ticks_per_second(this: NonNull<Self>) -> f64 {
            (keyframed(this).get_source_ticks_per_second)(raw(this))
        }

        unsafe fn num_scale_keys(this: NonNull<Self>, animation: u32) -> u32 {
            (keyframed(this).get_num_scale_keys)(raw(this), animation)
        }

        unsafe fn scale_keys(this: NonNull<Self>, animation: u32, keys: *mut KeyVector3Raw) -> ResultCode {
            (keyframed(this).get_scale_keys)(raw(this), animation, keys).into()
        }

        unsafe fn scale_key(this: NonNull<Self>, animation: u32, key: u32, out: &mut KeyVector3Raw) -> ResultCode {
            (keyframed(this).get_scale_key)(raw(this), animation, key, out).into()
        }

        unsafe fn set_scale_key(this: NonNull<Self>, animation: u32, key: u32, value: &KeyVector3Raw) -> ResultCode {
            // D3DX takes a non-const pointer but only reads it.
            let value = value as *const KeyVector3Raw as *mut KeyVector3Raw;
            (keyframed(this).set_scale_key)(raw(this), animation, key, value).into()
        }

        unsafe fn unregister_scale_key(this: NonNull<Self>, animation: u32, key: u32) -> ResultCode {
            (keyframed(this).unregister_scale_key)(raw(this), animation, key).into()
        }

        unsafe fn num_rotation_keys(this: NonNull<Self>, animation: u32) -> u32 {
            (keyframed(this).get_num_rotation_keys)(raw(this), animation)
        }

        unsafe fn rotation_keys(this: NonNull<Self>, animation: u32, keys: *mut KeyQuaternionRaw) -> ResultCode {
            (keyframed(this).get_rotation_keys)(raw(this), animation, keys).into()
        }

        unsafe fn rotation_key(this: NonNull<Self>, animation: u32, key: u32, out: &mut KeyQuaternionRaw) -> ResultCode {
            (keyframed(this).get_rotation_key)(raw(this), animation, key, out).into()
        }

        unsafe fn set_rotation_key(this: NonNull<Self>, animation: u32, key: u32, value: &KeyQuaternionRaw) -> ResultCode {
            let value = value as *const KeyQuaternionRaw as *mut KeyQuaternionRaw;
            (keyframed(this).set_rotation_key)(raw(this), animation, key, value).into()
        }

        unsafe fn unregister_rotation_key(this: NonNull<Self>, animation: u32, key: u32) -> ResultCode {
            (keyframed(this).unregister_rotation_key)(raw(this), animation, key).into()
        }

        unsafe fn num_translation_keys(this: NonNull<Self>, animation: u32) -> u32 {
            (keyframed(this).get_num_translation_keys)(raw(this), animation)
        }

        unsafe fn translation_keys(this: NonNull<Self>, animation: u32, keys: *mut KeyVector3Raw) -> ResultCode {
            (keyframed(this).get_translation_keys)(raw(this), animation, keys).into()
        }

        unsafe fn translation_key(this: NonNull<Self>, animation: u32, key: u32, out: &mut KeyVector3Raw) -> ResultCode {
            (keyframed(this).get_translation_key)(raw(this), animation, key, out).into()
        }

        unsafe fn set_translation_key(this: NonNull<Self>, animation: u32, key: u32, value: &KeyVector3Raw) -> ResultCode {
            let value = value as *const KeyVector3Raw as *mut KeyVector3Raw;
            (keyframed(this).set_translation_key)(raw(this), animation, key, value).into()
        }

        unsafe fn unregister_translation_key(this: NonNull<Self>, animation: u32, key: u32) -> ResultCode {
            (keyframed(this).unregister_translation_key)(raw(this), animation, key).into()
        }

        unsafe fn num_callback_keys(this: NonNull<Self>) -> u32 {
            (keyframed(this).get_num_callback_keys)(raw(this))
        }

        unsafe fn callback_keys(this: NonNull<Self>, keys: *mut KeyCallbackRaw) -> ResultCode {
            (keyframed(this).get_callback_keys)(raw(this), keys).into()
        }

        unsafe fn callback_key(this: NonNull<Self>, index: u32, out: &mut KeyCallbackRaw) -> ResultCode {
            (keyframed(this).get_callback_key)(raw(this), index, out).into()
        }

        unsafe fn set_callback_key(this: NonNull<Self>, index: u32, value: &KeyCallbackRaw) -> ResultCode {
            let value = value as *const KeyCallbackRaw as *mut KeyCallbackRaw;
            (keyframed(this).set_callback_key)(raw(this), index, value).into()
        }

        unsafe fn unregister_animation(this: NonNull<Self>, animation: u32) -> ResultCode {
            (keyframed(this).unregister_animation)(raw(this), animation).into()
        }

        unsafe fn register_animation_srt_keys(
            this: NonNull<Self>,
            name: *const c_char,
            scale_count: u32,
            rotation_count: u32,
            translation_count: u32,
            scale_keys: *const KeyVector3Raw,
            rotation_keys: *const KeyQuaternionRaw,
            translation_keys: *const KeyVector3Raw,
            index: &mut u32,
        ) -> ResultCode {
            (keyframed(this).register_animation_srt_keys)(
                raw(this),
                name,
                scale_count,
                rotation_count,
                translation_count,
                scale_keys,
                rotation_keys,
                translation_keys,
                index,
            )
            .into()
        }

        unsafe fn compress(
            this: NonNull<Self>,
            flags: u32,
            lossiness: f32,
            frame: *mut c_void,
            data: &mut *mut Com<ID3DBlob>,
        ) -> ResultCode {
            (keyframed(this).compress)(raw(this), flags, lossiness, frame, blob_out(data)).into()
        }
    }

    impl CompressedAnimationSetInterface for D3dxCompressedAnimationSet {
        type Buffer = Com<ID3DBlob>;

        unsafe fn create(
            name: *const c_char,
            ticks_per_second: f64,
            playback: u32,
            compressed_data: NonNull<Com<ID3DBlob>>,
            callback_key_count: u32,
            callback_keys: *const KeyCallbackRaw,
            set: &mut *mut Self,
        ) -> ResultCode {
            match exports() {
                Ok(d3dx) => (d3dx.create_compressed)(
                    name,
                    ticks_per_second,
                    playback,
                    raw(compressed_data),
                    callback_key_count,
                    callback_keys,
                    set,
                )
                .into(),
                Err(code) => code,
            }
        }

        unsafe fn playback_type(this: NonNull<Self>) -> u32 {
            (compressed(this).get_playback_type)(raw(this))
        }

        unsafe fn source_ticks_per_second(this: NonNull<Self>) -> f64 {
            (compressed(this).get_source_ticks_per_second)(raw(this))
        }

        unsafe fn num_callback_keys(this: NonNull<Self>) -> u32 {
            (compressed(this).get_num_callback_keys)(raw(this))
        }

        unsafe fn callback_keys(this: NonNull<Self>, keys: *mut KeyCallbackRaw) -> ResultCode {
            (compressed(this).get_callback_keys)(raw(this), keys).into()
        }

        unsafe fn compressed_data(this: NonNull<Self>, data: &mut *mut Com<ID3DBlob>) -> ResultCode {
            (compressed(this).get_compressed_data)(raw(this), blob_out(data)).into()
        }
    }
}
