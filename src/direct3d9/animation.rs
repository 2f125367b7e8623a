//! Animation set wrappers (`ID3DXAnimationSet` and its keyframed and
//! compressed forms).
//!
//! Bulk key transfers go through a [`ScratchBuffer`] sized from the native
//! count; the buffer is released on every exit path, including failures.

use std::ffi::{c_char, c_void, CStr, CString};
use std::ptr::NonNull;

use super::buffer::{BufferInterface, DataBuffer};
use super::keys::{CallbackData, CallbackKey, RotationKey, ScaleKey, TranslationKey};
use super::{CallbackSearchFlags, PlaybackType, COMPRESS_DEFAULT};
use crate::com::{Handle, RefCounted};
use crate::error::{InteropError, Result};
use crate::ffi::{KeyCallbackRaw, KeyQuaternionRaw, KeyVector3Raw};
use crate::math::{Quaternion, Vector3};
use crate::result::{self, ResultCode};
use crate::scratch::ScratchBuffer;

/// Native operations shared by every animation set.
pub trait AnimationSetInterface: crate::com::RefCounted {
    unsafe fn name(this: NonNull<Self>) -> *const c_char;
    unsafe fn period(this: NonNull<Self>) -> f64;
    unsafe fn periodic_position(this: NonNull<Self>, position: f64) -> f64;
    unsafe fn num_animations(this: NonNull<Self>) -> u32;
    unsafe fn animation_name_by_index(
        this: NonNull<Self>,
        index: u32,
        name: &mut *const c_char,
    ) -> ResultCode;
    unsafe fn animation_index_by_name(
        this: NonNull<Self>,
        name: *const c_char,
        index: &mut u32,
    ) -> ResultCode;
    unsafe fn srt(
        this: NonNull<Self>,
        periodic_position: f64,
        animation: u32,
        scale: &mut Vector3,
        rotation: &mut Quaternion,
        translation: &mut Vector3,
    ) -> ResultCode;
    unsafe fn callback(
        this: NonNull<Self>,
        position: f64,
        flags: u32,
        callback_position: &mut f64,
        callback_data: &mut *mut c_void,
    ) -> ResultCode;
}

/// Native operations of `ID3DXKeyframedAnimationSet`.
pub trait KeyframedAnimationSetInterface: AnimationSetInterface {
    type Buffer: BufferInterface;

    /// `D3DXCreateKeyframedAnimationSet`
    #[allow(clippy::too_many_arguments)]
    unsafe fn create(
        name: *const c_char,
        ticks_per_second: f64,
        playback: u32,
        animation_count: u32,
        callback_key_count: u32,
        callback_keys: *const KeyCallbackRaw,
        set: &mut *mut Self,
    ) -> ResultCode;

    unsafe fn playback_type(this: NonNull<Self>) -> u32;
    unsafe fn source_ticks_per_second(this: NonNull<Self>) -> f64;

    unsafe fn num_scale_keys(this: NonNull<Self>, animation: u32) -> u32;
    unsafe fn scale_keys(this: NonNull<Self>, animation: u32, keys: *mut KeyVector3Raw) -> ResultCode;
    unsafe fn scale_key(this: NonNull<Self>, animation: u32, key: u32, out: &mut KeyVector3Raw) -> ResultCode;
    unsafe fn set_scale_key(this: NonNull<Self>, animation: u32, key: u32, value: &KeyVector3Raw) -> ResultCode;
    unsafe fn unregister_scale_key(this: NonNull<Self>, animation: u32, key: u32) -> ResultCode;

    unsafe fn num_rotation_keys(this: NonNull<Self>, animation: u32) -> u32;
    unsafe fn rotation_keys(this: NonNull<Self>, animation: u32, keys: *mut KeyQuaternionRaw) -> ResultCode;
    unsafe fn rotation_key(this: NonNull<Self>, animation: u32, key: u32, out: &mut KeyQuaternionRaw) -> ResultCode;
    unsafe fn set_rotation_key(this: NonNull<Self>, animation: u32, key: u32, value: &KeyQuaternionRaw) -> ResultCode;
    unsafe fn unregister_rotation_key(this: NonNull<Self>, animation: u32, key: u32) -> ResultCode;

    unsafe fn num_translation_keys(this: NonNull<Self>, animation: u32) -> u32;
    unsafe fn translation_keys(this: NonNull<Self>, animation: u32, keys: *mut KeyVector3Raw) -> ResultCode;
    unsafe fn translation_key(this: NonNull<Self>, animation: u32, key: u32, out: &mut KeyVector3Raw) -> ResultCode;
    unsafe fn set_translation_key(this: NonNull<Self>, animation: u32, key: u32, value: &KeyVector3Raw) -> ResultCode;
    unsafe fn unregister_translation_key(this: NonNull<Self>, animation: u32, key: u32) -> ResultCode;

    unsafe fn num_callback_keys(this: NonNull<Self>) -> u32;
    unsafe fn callback_keys(this: NonNull<Self>, keys: *mut KeyCallbackRaw) -> ResultCode;
    unsafe fn callback_key(this: NonNull<Self>, index: u32, out: &mut KeyCallbackRaw) -> ResultCode;
    unsafe fn set_callback_key(this: NonNull<Self>, index: u32, value: &KeyCallbackRaw) -> ResultCode;

    unsafe fn unregister_animation(this: NonNull<Self>, animation: u32) -> ResultCode;

    #[allow(clippy::too_many_arguments)]
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
    ) -> ResultCode;

    unsafe fn compress(
        this: NonNull<Self>,
        flags: u32,
        lossiness: f32,
        frame: *mut c_void,
        data: &mut *mut Self::Buffer,
    ) -> ResultCode;
}

/// Native operations of `ID3DXCompressedAnimationSet`.
pub trait CompressedAnimationSetInterface: AnimationSetInterface {
    type Buffer: BufferInterface;

    /// `D3DXCreateCompressedAnimationSet`
    #[allow(clippy::too_many_arguments)]
    unsafe fn create(
        name: *const c_char,
        ticks_per_second: f64,
        playback: u32,
        compressed_data: NonNull<Self::Buffer>,
        callback_key_count: u32,
        callback_keys: *const KeyCallbackRaw,
        set: &mut *mut Self,
    ) -> ResultCode;

    unsafe fn playback_type(this: NonNull<Self>) -> u32;
    unsafe fn source_ticks_per_second(this: NonNull<Self>) -> f64;
    unsafe fn num_callback_keys(this: NonNull<Self>) -> u32;
    unsafe fn callback_keys(this: NonNull<Self>, keys: *mut KeyCallbackRaw) -> ResultCode;
    unsafe fn compressed_data(this: NonNull<Self>, data: &mut *mut Self::Buffer) -> ResultCode;
}

/// Which channels of an [`AnimationOutput`] are populated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AnimationOutputFlags(pub u32);

impl AnimationOutputFlags {
    pub const NONE: AnimationOutputFlags = AnimationOutputFlags(0);
    pub const TRANSFORMATION: AnimationOutputFlags = AnimationOutputFlags(0x1);
    pub const TRANSLATION: AnimationOutputFlags = AnimationOutputFlags(0x2);
    pub const SCALE: AnimationOutputFlags = AnimationOutputFlags(0x4);
    pub const ROTATION: AnimationOutputFlags = AnimationOutputFlags(0x8);

    pub fn contains(self, other: AnimationOutputFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for AnimationOutputFlags {
    type Output = AnimationOutputFlags;

    fn bitor(self, rhs: Self) -> Self {
        AnimationOutputFlags(self.0 | rhs.0)
    }
}

/// Scale, rotation and translation sampled from one animation.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AnimationOutput {
    pub flags: AnimationOutputFlags,
    pub scaling: Vector3,
    pub rotation: Quaternion,
    pub translation: Vector3,
}

/// A pointer to a native `D3DXFRAME` hierarchy node.
#[derive(Clone, Copy, Debug)]
pub struct FramePointer(NonNull<c_void>);

impl FramePointer {
    /// # Safety
    ///
    /// `ptr` must point to a `D3DXFRAME` that outlives every call it is
    /// passed to.
    pub unsafe fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(FramePointer)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

fn native_name(name: &str) -> Result<CString> {
    CString::new(name)
        .map_err(|_| InteropError::InvalidArgument(format!("name {name:?} contains a NUL byte")))
}

fn native_count(len: usize) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| InteropError::InvalidArgument(format!("{len} keys exceed the native limit")))
}

unsafe fn managed_name(name: *const c_char) -> String {
    if name.is_null() {
        String::new()
    } else {
        CStr::from_ptr(name).to_string_lossy().into_owned()
    }
}

/// Fetches `count` native keys in one call and converts them.
fn fetch_keys<R, K>(
    count: u32,
    what: &str,
    fill: impl FnOnce(*mut R) -> ResultCode,
) -> Result<Vec<K>>
where
    R: Copy + bytemuck::Zeroable,
    K: for<'a> From<&'a R>,
{
    let mut keys = ScratchBuffer::<R>::zeroed(count as usize);
    result::check_with(fill(keys.as_mut_ptr()), what)?;
    Ok(keys.iter().map(K::from).collect())
}

/// Marshals managed keys into a native buffer for one call.
fn stage_keys<'a, K, R>(keys: &'a [K]) -> ScratchBuffer<R>
where
    R: From<&'a K>,
{
    ScratchBuffer::from_iter_exact(keys.iter().map(R::from))
}

/// Takes ownership of an object a creation call handed back. A failed call
/// that still wrote a pointer has its object released here.
fn take_created<T: RefCounted>(hr: ResultCode, created: *mut T, what: &str) -> Result<Handle<T>> {
    if let Err(e) = result::check_with(hr, what) {
        if !created.is_null() {
            drop(unsafe { Handle::wrap(created) });
        }
        return Err(e);
    }
    unsafe { Handle::wrap(created) }
}

/// An animation set of any kind.
pub struct AnimationSet<I: AnimationSetInterface> {
    handle: Handle<I>,
}

impl<I: AnimationSetInterface> AnimationSet<I> {
    pub fn from_handle(handle: Handle<I>) -> Self {
        Self { handle }
    }

    fn ptr(&self) -> Result<NonNull<I>> {
        self.handle.get()
    }

    pub fn name(&self) -> Result<String> {
        Ok(unsafe { managed_name(I::name(self.ptr()?)) })
    }

    pub fn animation_count(&self) -> Result<u32> {
        Ok(unsafe { I::num_animations(self.ptr()?) })
    }

    pub fn period(&self) -> Result<f64> {
        Ok(unsafe { I::period(self.ptr()?) })
    }

    pub fn periodic_position(&self, position: f64) -> Result<f64> {
        Ok(unsafe { I::periodic_position(self.ptr()?, position) })
    }

    pub fn animation_index(&self, name: &str) -> Result<u32> {
        let ptr = self.ptr()?;
        let name = native_name(name)?;
        let mut index = 0;
        result::check_with(
            unsafe { I::animation_index_by_name(ptr, name.as_ptr(), &mut index) },
            "GetAnimationIndexByName",
        )?;
        Ok(index)
    }

    pub fn animation_name(&self, index: u32) -> Result<String> {
        let ptr = self.ptr()?;
        let mut name = std::ptr::null();
        result::check_with(
            unsafe { I::animation_name_by_index(ptr, index, &mut name) },
            "GetAnimationNameByIndex",
        )?;
        Ok(unsafe { managed_name(name) })
    }

    /// The next callback at or after `position`, with its position.
    pub fn callback(&self, position: f64, flags: CallbackSearchFlags) -> Result<(CallbackData, f64)> {
        let ptr = self.ptr()?;
        let mut at = 0.0;
        let mut data = std::ptr::null_mut();
        result::check_with(
            unsafe { I::callback(ptr, position, flags.0, &mut at, &mut data) },
            "GetCallback",
        )?;
        Ok((CallbackData::from_ptr(data), at))
    }

    pub fn transformation(&self, periodic_position: f64, animation: u32) -> Result<AnimationOutput> {
        let ptr = self.ptr()?;
        let mut output = AnimationOutput {
            flags: AnimationOutputFlags::ROTATION
                | AnimationOutputFlags::SCALE
                | AnimationOutputFlags::TRANSLATION,
            ..Default::default()
        };
        result::check_with(
            unsafe {
                I::srt(
                    ptr,
                    periodic_position,
                    animation,
                    &mut output.scaling,
                    &mut output.rotation,
                    &mut output.translation,
                )
            },
            "GetSRT",
        )?;
        Ok(output)
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

/// An animation set whose keys can be edited.
pub struct KeyframedAnimationSet<I: KeyframedAnimationSetInterface> {
    base: AnimationSet<I>,
}

impl<I: KeyframedAnimationSetInterface> KeyframedAnimationSet<I> {
    pub fn from_handle(handle: Handle<I>) -> Self {
        Self {
            base: AnimationSet::from_handle(handle),
        }
    }

    pub fn create(
        name: &str,
        ticks_per_second: f64,
        playback: PlaybackType,
        animation_count: u32,
        callback_keys: &[CallbackKey],
    ) -> Result<Self> {
        let name = native_name(name)?;
        let count = native_count(callback_keys.len())?;
        let keys: ScratchBuffer<KeyCallbackRaw> = stage_keys(callback_keys);
        let mut set = std::ptr::null_mut();

        let hr = unsafe {
            I::create(
                name.as_ptr(),
                ticks_per_second,
                playback.to_raw(),
                animation_count,
                count,
                keys.as_ptr(),
                &mut set,
            )
        };
        drop(keys);
        let handle = take_created(hr, set, "D3DXCreateKeyframedAnimationSet")?;
        Ok(Self::from_handle(handle))
    }

    /// Operations common to every animation set.
    pub fn base(&self) -> &AnimationSet<I> {
        &self.base
    }

    fn ptr(&self) -> Result<NonNull<I>> {
        self.base.ptr()
    }

    pub fn playback_type(&self) -> Result<PlaybackType> {
        Ok(PlaybackType::from_raw(unsafe { I::playback_type(self.ptr()?) }))
    }

    pub fn source_ticks_per_second(&self) -> Result<f64> {
        Ok(unsafe { I::source_ticks_per_second(self.ptr()?) })
    }

    pub fn callback_key_count(&self) -> Result<u32> {
        Ok(unsafe { I::num_callback_keys(self.ptr()?) })
    }

    pub fn callback_keys(&self) -> Result<Vec<CallbackKey>> {
        let ptr = self.ptr()?;
        let count = unsafe { I::num_callback_keys(ptr) };
        fetch_keys(count, "GetCallbackKeys", |buf| unsafe { I::callback_keys(ptr, buf) })
    }

    pub fn callback_key(&self, index: u32) -> Result<CallbackKey> {
        let ptr = self.ptr()?;
        let mut raw: KeyCallbackRaw = bytemuck::Zeroable::zeroed();
        result::check_with(unsafe { I::callback_key(ptr, index, &mut raw) }, "GetCallbackKey")?;
        Ok(CallbackKey::from(&raw))
    }

    pub fn set_callback_key(&self, index: u32, key: CallbackKey) -> Result<()> {
        let ptr = self.ptr()?;
        let raw = KeyCallbackRaw::from(&key);
        result::check_with(unsafe { I::set_callback_key(ptr, index, &raw) }, "SetCallbackKey")?;
        Ok(())
    }

    pub fn scale_key_count(&self, animation: u32) -> Result<u32> {
        Ok(unsafe { I::num_scale_keys(self.ptr()?, animation) })
    }

    pub fn scale_keys(&self, animation: u32) -> Result<Vec<ScaleKey>> {
        let ptr = self.ptr()?;
        let count = unsafe { I::num_scale_keys(ptr, animation) };
        fetch_keys(count, "GetScaleKeys", |buf| unsafe { I::scale_keys(ptr, animation, buf) })
    }

    pub fn scale_key(&self, animation: u32, key: u32) -> Result<ScaleKey> {
        let ptr = self.ptr()?;
        let mut raw = KeyVector3Raw::default();
        result::check_with(unsafe { I::scale_key(ptr, animation, key, &mut raw) }, "GetScaleKey")?;
        Ok(ScaleKey::from(&raw))
    }

    pub fn set_scale_key(&self, animation: u32, key: u32, value: ScaleKey) -> Result<()> {
        let ptr = self.ptr()?;
        let raw = KeyVector3Raw::from(&value);
        result::check_with(unsafe { I::set_scale_key(ptr, animation, key, &raw) }, "SetScaleKey")?;
        Ok(())
    }

    pub fn unregister_scale_key(&self, animation: u32, key: u32) -> Result<()> {
        let ptr = self.ptr()?;
        result::check_with(
            unsafe { I::unregister_scale_key(ptr, animation, key) },
            "UnregisterScaleKey",
        )?;
        Ok(())
    }

    pub fn rotation_key_count(&self, animation: u32) -> Result<u32> {
        Ok(unsafe { I::num_rotation_keys(self.ptr()?, animation) })
    }

    pub fn rotation_keys(&self, animation: u32) -> Result<Vec<RotationKey>> {
        let ptr = self.ptr()?;
        let count = unsafe { I::num_rotation_keys(ptr, animation) };
        fetch_keys(count, "GetRotationKeys", |buf| unsafe { I::rotation_keys(ptr, animation, buf) })
    }

    pub fn rotation_key(&self, animation: u32, key: u32) -> Result<RotationKey> {
        let ptr = self.ptr()?;
        let mut raw = KeyQuaternionRaw::default();
        result::check_with(
            unsafe { I::rotation_key(ptr, animation, key, &mut raw) },
            "GetRotationKey",
        )?;
        Ok(RotationKey::from(&raw))
    }

    pub fn set_rotation_key(&self, animation: u32, key: u32, value: RotationKey) -> Result<()> {
        let ptr = self.ptr()?;
        let raw = KeyQuaternionRaw::from(&value);
        result::check_with(
            unsafe { I::set_rotation_key(ptr, animation, key, &raw) },
            "SetRotationKey",
        )?;
        Ok(())
    }

    pub fn unregister_rotation_key(&self, animation: u32, key: u32) -> Result<()> {
        let ptr = self.ptr()?;
        result::check_with(
            unsafe { I::unregister_rotation_key(ptr, animation, key) },
            "UnregisterRotationKey",
        )?;
        Ok(())
    }

    pub fn translation_key_count(&self, animation: u32) -> Result<u32> {
        Ok(unsafe { I::num_translation_keys(self.ptr()?, animation) })
    }

    pub fn translation_keys(&self, animation: u32) -> Result<Vec<TranslationKey>> {
        let ptr = self.ptr()?;
        let count = unsafe { I::num_translation_keys(ptr, animation) };
        fetch_keys(count, "GetTranslationKeys", |buf| unsafe {
            I::translation_keys(ptr, animation, buf)
        })
    }

    pub fn translation_key(&self, animation: u32, key: u32) -> Result<TranslationKey> {
        let ptr = self.ptr()?;
        let mut raw = KeyVector3Raw::default();
        result::check_with(
            unsafe { I::translation_key(ptr, animation, key, &mut raw) },
            "GetTranslationKey",
        )?;
        Ok(TranslationKey::from(&raw))
    }

    pub fn set_translation_key(&self, animation: u32, key: u32, value: TranslationKey) -> Result<()> {
        let ptr = self.ptr()?;
        let raw = KeyVector3Raw::from(&value);
        result::check_with(
            unsafe { I::set_translation_key(ptr, animation, key, &raw) },
            "SetTranslationKey",
        )?;
        Ok(())
    }

    pub fn unregister_translation_key(&self, animation: u32, key: u32) -> Result<()> {
        let ptr = self.ptr()?;
        result::check_with(
            unsafe { I::unregister_translation_key(ptr, animation, key) },
            "UnregisterTranslationKey",
        )?;
        Ok(())
    }

    /// Registers a new animation from its three key sequences and returns its
    /// index.
    pub fn register_animation_keys(
        &self,
        name: &str,
        scale_keys: &[ScaleKey],
        rotation_keys: &[RotationKey],
        translation_keys: &[TranslationKey],
    ) -> Result<u32> {
        let ptr = self.ptr()?;
        let name = native_name(name)?;
        let scale_count = native_count(scale_keys.len())?;
        let rotation_count = native_count(rotation_keys.len())?;
        let translation_count = native_count(translation_keys.len())?;

        let scales: ScratchBuffer<KeyVector3Raw> = stage_keys(scale_keys);
        let rotations: ScratchBuffer<KeyQuaternionRaw> = stage_keys(rotation_keys);
        let translations: ScratchBuffer<KeyVector3Raw> = stage_keys(translation_keys);
        let mut index = 0;

        result::check_with(
            unsafe {
                I::register_animation_srt_keys(
                    ptr,
                    name.as_ptr(),
                    scale_count,
                    rotation_count,
                    translation_count,
                    scales.as_ptr(),
                    rotations.as_ptr(),
                    translations.as_ptr(),
                    &mut index,
                )
            },
            "RegisterAnimationSRTKeys",
        )?;
        Ok(index)
    }

    pub fn unregister_animation(&self, animation: u32) -> Result<()> {
        let ptr = self.ptr()?;
        result::check_with(unsafe { I::unregister_animation(ptr, animation) }, "UnregisterAnimation")?;
        Ok(())
    }

    /// Compresses every animation in the set.
    pub fn compress(&self, lossiness: f32) -> Result<DataBuffer<I::Buffer>> {
        self.compress_inner(lossiness, std::ptr::null_mut())
    }

    /// Compresses the animations driving `frame`'s hierarchy.
    pub fn compress_frame(&self, lossiness: f32, frame: FramePointer) -> Result<DataBuffer<I::Buffer>> {
        self.compress_inner(lossiness, frame.as_ptr())
    }

    fn compress_inner(&self, lossiness: f32, frame: *mut c_void) -> Result<DataBuffer<I::Buffer>> {
        let ptr = self.ptr()?;
        let mut data = std::ptr::null_mut();
        let hr = unsafe { I::compress(ptr, COMPRESS_DEFAULT, lossiness, frame, &mut data) };
        Ok(DataBuffer::from_handle(take_created(hr, data, "Compress")?))
    }

    pub fn handle(&self) -> &Handle<I> {
        self.base.handle()
    }

    pub fn dispose(&mut self) {
        self.base.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.base.is_disposed()
    }
}

/// A read-only animation set built from compressed key data.
pub struct CompressedAnimationSet<I: CompressedAnimationSetInterface> {
    base: AnimationSet<I>,
}

impl<I: CompressedAnimationSetInterface> CompressedAnimationSet<I> {
    pub fn from_handle(handle: Handle<I>) -> Self {
        Self {
            base: AnimationSet::from_handle(handle),
        }
    }

    pub fn create(
        name: &str,
        ticks_per_second: f64,
        playback: PlaybackType,
        compressed_data: &DataBuffer<I::Buffer>,
        callback_keys: &[CallbackKey],
    ) -> Result<Self> {
        let name = native_name(name)?;
        let data = compressed_data.handle().get()?;
        let count = native_count(callback_keys.len())?;
        let keys: ScratchBuffer<KeyCallbackRaw> = stage_keys(callback_keys);
        let mut set = std::ptr::null_mut();

        let hr = unsafe {
            I::create(
                name.as_ptr(),
                ticks_per_second,
                playback.to_raw(),
                data,
                count,
                keys.as_ptr(),
                &mut set,
            )
        };
        drop(keys);
        let handle = take_created(hr, set, "D3DXCreateCompressedAnimationSet")?;
        Ok(Self::from_handle(handle))
    }

    pub fn base(&self) -> &AnimationSet<I> {
        &self.base
    }

    fn ptr(&self) -> Result<NonNull<I>> {
        self.base.ptr()
    }

    pub fn playback_type(&self) -> Result<PlaybackType> {
        Ok(PlaybackType::from_raw(unsafe { I::playback_type(self.ptr()?) }))
    }

    pub fn source_ticks_per_second(&self) -> Result<f64> {
        Ok(unsafe { I::source_ticks_per_second(self.ptr()?) })
    }

    pub fn callback_key_count(&self) -> Result<u32> {
        Ok(unsafe { I::num_callback_keys(self.ptr()?) })
    }

    pub fn callback_keys(&self) -> Result<Vec<CallbackKey>> {
        let ptr = self.ptr()?;
        let count = unsafe { I::num_callback_keys(ptr) };
        fetch_keys(count, "GetCallbackKeys", |buf| unsafe { I::callback_keys(ptr, buf) })
    }

    pub fn compressed_data(&self) -> Result<DataBuffer<I::Buffer>> {
        let ptr = self.ptr()?;
        let mut data = std::ptr::null_mut();
        let hr = unsafe { I::compressed_data(ptr, &mut data) };
        Ok(DataBuffer::from_handle(take_created(hr, data, "GetCompressedData")?))
    }

    pub fn handle(&self) -> &Handle<I> {
        self.base.handle()
    }

    pub fn dispose(&mut self) {
        self.base.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.base.is_disposed()
    }
}
