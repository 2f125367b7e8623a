//! In-process stand-ins for the native interfaces.
#![allow(dead_code)]

use std::cell::Cell;
use std::ffi::{c_char, c_void, CStr, CString};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use dx_interop::com::RefCounted;
use dx_interop::direct3d11::{DeviceInterface, Texture2DInterface};
use dx_interop::direct3d9::{
    AnimationSetInterface, BufferInterface, CompressedAnimationSetInterface,
    KeyframedAnimationSetInterface,
};
use dx_interop::dxgi::SurfaceInterface;
use dx_interop::ffi::*;
use dx_interop::math::{Quaternion, Vector3};
use dx_interop::result::ResultCode;

/// Heap objects freed when their count reaches zero.
macro_rules! ref_counted {
    ($ty:ident) => {
        unsafe impl RefCounted for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            unsafe fn add_ref(this: NonNull<Self>) -> u32 {
                this.as_ref().refs.fetch_add(1, Ordering::SeqCst) + 1
            }

            unsafe fn release(this: NonNull<Self>) -> u32 {
                let left = this.as_ref().refs.fetch_sub(1, Ordering::SeqCst) - 1;
                if left == 0 {
                    drop(Box::from_raw(this.as_ptr()));
                }
                left
            }
        }

        impl $ty {
            pub fn into_raw(self) -> *mut $ty {
                Box::into_raw(Box::new(self))
            }
        }
    };
}

/// A counted object that is never freed, so its count stays observable.
pub struct Pinned {
    pub refs: AtomicU32,
}

unsafe impl RefCounted for Pinned {
    const TYPE_NAME: &'static str = "Pinned";

    unsafe fn add_ref(this: NonNull<Self>) -> u32 {
        this.as_ref().refs.fetch_add(1, Ordering::SeqCst) + 1
    }

    unsafe fn release(this: NonNull<Self>) -> u32 {
        this.as_ref().refs.fetch_sub(1, Ordering::SeqCst) - 1
    }
}

impl Pinned {
    pub fn new(refs: u32) -> Box<Self> {
        Box::new(Self {
            refs: AtomicU32::new(refs),
        })
    }

    pub fn count(&self) -> u32 {
        self.refs.load(Ordering::SeqCst)
    }
}

// ── Direct3D 11 ──

pub struct FakeDevice {
    refs: AtomicU32,
    /// Textures created by this device that are still alive.
    pub live_textures: Arc<AtomicUsize>,
    /// Native calls made through this device.
    pub calls: AtomicUsize,
    /// Hand out a texture even when creation fails, like a buggy driver.
    pub leak_on_failure: bool,
}

ref_counted!(FakeDevice);

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            refs: AtomicU32::new(1),
            live_textures: Arc::new(AtomicUsize::new(0)),
            calls: AtomicUsize::new(0),
            leak_on_failure: false,
        }
    }

    pub fn leaky() -> Self {
        Self {
            leak_on_failure: true,
            ..Self::new()
        }
    }
}

impl DeviceInterface for FakeDevice {
    type Texture2D = FakeTexture;

    unsafe fn create_texture_2d(
        this: NonNull<Self>,
        desc: &Texture2DDescRaw,
        initial_data: *const SubresourceDataRaw,
        texture: &mut *mut FakeTexture,
    ) -> ResultCode {
        let device = this.as_ref();
        device.calls.fetch_add(1, Ordering::SeqCst);

        let pitches = if initial_data.is_null() {
            Vec::new()
        } else {
            let count = (desc.mip_levels * desc.array_size) as usize;
            std::slice::from_raw_parts(initial_data, count)
                .iter()
                .map(|d| d.sys_mem_pitch)
                .collect()
        };

        let invalid = desc.width == 0 || desc.height == 0;
        if invalid && !device.leak_on_failure {
            return ResultCode::INVALID_ARGUMENT;
        }

        device.live_textures.fetch_add(1, Ordering::SeqCst);
        *texture = FakeTexture {
            refs: AtomicU32::new(1),
            desc: *desc,
            initial_pitches: pitches,
            live: device.live_textures.clone(),
            calls: AtomicUsize::new(0),
        }
        .into_raw();

        if invalid {
            ResultCode::INVALID_ARGUMENT
        } else {
            ResultCode::SUCCESS
        }
    }
}

pub struct FakeTexture {
    refs: AtomicU32,
    pub desc: Texture2DDescRaw,
    pub initial_pitches: Vec<u32>,
    live: Arc<AtomicUsize>,
    pub calls: AtomicUsize,
}

ref_counted!(FakeTexture);

impl Drop for FakeTexture {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Texture2DInterface for FakeTexture {
    type Surface = FakeSurface;

    unsafe fn get_desc(this: NonNull<Self>, desc: &mut Texture2DDescRaw) {
        this.as_ref().calls.fetch_add(1, Ordering::SeqCst);
        *desc = this.as_ref().desc;
    }

    unsafe fn query_surface(this: NonNull<Self>, surface: &mut *mut FakeSurface) -> ResultCode {
        let tex = this.as_ref();
        tex.calls.fetch_add(1, Ordering::SeqCst);
        if tex.desc.mip_levels != 1 || tex.desc.array_size != 1 {
            return ResultCode(0x8000_4002u32 as i32); // E_NOINTERFACE
        }
        *surface = FakeSurface {
            refs: AtomicU32::new(1),
            desc: SurfaceDescRaw {
                width: tex.desc.width,
                height: tex.desc.height,
                format: tex.desc.format,
                sample_desc: tex.desc.sample_desc,
            },
        }
        .into_raw();
        ResultCode::SUCCESS
    }
}

pub struct FakeSurface {
    refs: AtomicU32,
    desc: SurfaceDescRaw,
}

ref_counted!(FakeSurface);

impl SurfaceInterface for FakeSurface {
    unsafe fn get_desc(this: NonNull<Self>, desc: &mut SurfaceDescRaw) -> ResultCode {
        *desc = this.as_ref().desc;
        ResultCode::SUCCESS
    }
}

// ── D3DX animation ──

pub struct FakeBuffer {
    refs: AtomicU32,
    pub data: Vec<u8>,
}

ref_counted!(FakeBuffer);

impl FakeBuffer {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            refs: AtomicU32::new(1),
            data,
        }
    }
}

impl BufferInterface for FakeBuffer {
    unsafe fn buffer_pointer(this: NonNull<Self>) -> *mut c_void {
        this.as_ref().data.as_ptr() as *mut c_void
    }

    unsafe fn buffer_size(this: NonNull<Self>) -> usize {
        this.as_ref().data.len()
    }
}

#[derive(Default)]
pub struct Track {
    pub name: CString,
    pub scale: Vec<KeyVector3Raw>,
    pub rotation: Vec<KeyQuaternionRaw>,
    pub translation: Vec<KeyVector3Raw>,
}

pub struct SetState {
    pub name: CString,
    pub ticks_per_second: f64,
    pub playback: u32,
    pub tracks: Vec<Option<Track>>,
    pub callbacks: Vec<KeyCallbackRaw>,
    /// Returned (once) by the next fallible call.
    pub fail_next: Option<ResultCode>,
}

thread_local! {
    static LIVE_SETS: Cell<usize> = const { Cell::new(0) };
}

/// Animation sets created on this thread that are still alive.
pub fn live_sets() -> usize {
    LIVE_SETS.with(Cell::get)
}

fn set_born() {
    LIVE_SETS.with(|n| n.set(n.get() + 1));
}

/// Negative tick rates fail but still hand out a set, like a buggy runtime.
fn leaks_on_failure(ticks_per_second: f64) -> bool {
    ticks_per_second < 0.0
}

pub struct FakeKeyframedSet {
    refs: AtomicU32,
    pub state: Mutex<SetState>,
}

ref_counted!(FakeKeyframedSet);

impl Drop for FakeKeyframedSet {
    fn drop(&mut self) {
        LIVE_SETS.with(|n| n.set(n.get() - 1));
    }
}

impl FakeKeyframedSet {
    fn fail(&self) -> Option<ResultCode> {
        self.state.lock().fail_next.take()
    }

    fn track<R>(&self, animation: u32, f: impl FnOnce(&mut Track) -> R) -> Option<R> {
        let mut state = self.state.lock();
        state
            .tracks
            .get_mut(animation as usize)
            .and_then(Option::as_mut)
            .map(f)
    }
}

const INVALID: ResultCode = ResultCode::D3D9_INVALID_CALL;

unsafe fn copy_out<T: Copy>(src: &[T], dst: *mut T) {
    if !src.is_empty() {
        std::ptr::copy_nonoverlapping(src.as_ptr(), dst, src.len());
    }
}

unsafe fn copy_in<T: Copy>(src: *const T, count: u32) -> Vec<T> {
    if count == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(src, count as usize).to_vec()
    }
}

fn first_or<T: Copy>(keys: &[T], default: T) -> T {
    keys.first().copied().unwrap_or(default)
}

/// Shared `ID3DXAnimationSet` behaviour for both fakes.
macro_rules! animation_set {
    ($ty:ident) => {
        impl AnimationSetInterface for $ty {
            unsafe fn name(this: NonNull<Self>) -> *const c_char {
                this.as_ref().state.lock().name.as_ptr()
            }

            unsafe fn period(this: NonNull<Self>) -> f64 {
                let state = this.as_ref().state.lock();
                let last = state
                    .tracks
                    .iter()
                    .flatten()
                    .flat_map(|t| t.scale.iter().map(|k| k.time))
                    .fold(0.0f32, f32::max);
                last as f64 / state.ticks_per_second
            }

            unsafe fn periodic_position(this: NonNull<Self>, position: f64) -> f64 {
                let period = Self::period(this);
                if period == 0.0 {
                    0.0
                } else {
                    position % period
                }
            }

            unsafe fn num_animations(this: NonNull<Self>) -> u32 {
                this.as_ref().state.lock().tracks.len() as u32
            }

            unsafe fn animation_name_by_index(
                this: NonNull<Self>,
                index: u32,
                name: &mut *const c_char,
            ) -> ResultCode {
                let state = this.as_ref().state.lock();
                match state.tracks.get(index as usize).and_then(Option::as_ref) {
                    Some(t) => {
                        *name = t.name.as_ptr();
                        ResultCode::SUCCESS
                    }
                    None => INVALID,
                }
            }

            unsafe fn animation_index_by_name(
                this: NonNull<Self>,
                name: *const c_char,
                index: &mut u32,
            ) -> ResultCode {
                let wanted = CStr::from_ptr(name);
                let state = this.as_ref().state.lock();
                let found = state
                    .tracks
                    .iter()
                    .position(|t| t.as_ref().map_or(false, |t| t.name.as_c_str() == wanted));
                match found {
                    Some(i) => {
                        *index = i as u32;
                        ResultCode::SUCCESS
                    }
                    None => ResultCode::D3DX_INVALID_DATA,
                }
            }

            unsafe fn srt(
                this: NonNull<Self>,
                _periodic_position: f64,
                animation: u32,
                scale: &mut Vector3,
                rotation: &mut Quaternion,
                translation: &mut Vector3,
            ) -> ResultCode {
                let state = this.as_ref().state.lock();
                match state.tracks.get(animation as usize).and_then(Option::as_ref) {
                    Some(t) => {
                        *scale = first_or(&t.scale, KeyVector3Raw::default()).value;
                        *rotation = first_or(&t.rotation, KeyQuaternionRaw::default()).value;
                        *translation = first_or(&t.translation, KeyVector3Raw::default()).value;
                        ResultCode::SUCCESS
                    }
                    None => INVALID,
                }
            }

            unsafe fn callback(
                this: NonNull<Self>,
                position: f64,
                _flags: u32,
                callback_position: &mut f64,
                callback_data: &mut *mut c_void,
            ) -> ResultCode {
                let state = this.as_ref().state.lock();
                match state.callbacks.iter().find(|k| k.time as f64 >= position) {
                    Some(k) => {
                        *callback_position = k.time as f64;
                        *callback_data = k.callback_data;
                        ResultCode::SUCCESS
                    }
                    None => INVALID,
                }
            }
        }
    };
}

animation_set!(FakeKeyframedSet);
animation_set!(FakeCompressedSet);

macro_rules! key_channel {
    ($count:ident, $all:ident, $one:ident, $set:ident, $unregister:ident, $field:ident, $raw:ty) => {
        unsafe fn $count(this: NonNull<Self>, animation: u32) -> u32 {
            this.as_ref().track(animation, |t| t.$field.len() as u32).unwrap_or(0)
        }

        unsafe fn $all(this: NonNull<Self>, animation: u32, keys: *mut $raw) -> ResultCode {
            let set = this.as_ref();
            if let Some(code) = set.fail() {
                return code;
            }
            set.track(animation, |t| copy_out(&t.$field, keys))
                .map_or(INVALID, |_| ResultCode::SUCCESS)
        }

        unsafe fn $one(this: NonNull<Self>, animation: u32, key: u32, out: &mut $raw) -> ResultCode {
            this.as_ref()
                .track(animation, |t| t.$field.get(key as usize).copied())
                .flatten()
                .map_or(INVALID, |k| {
                    *out = k;
                    ResultCode::SUCCESS
                })
        }

        unsafe fn $set(this: NonNull<Self>, animation: u32, key: u32, value: &$raw) -> ResultCode {
            this.as_ref()
                .track(animation, |t| t.$field.get_mut(key as usize).map(|k| *k = *value))
                .flatten()
                .map_or(INVALID, |_| ResultCode::SUCCESS)
        }

        unsafe fn $unregister(this: NonNull<Self>, animation: u32, key: u32) -> ResultCode {
            this.as_ref()
                .track(animation, |t| {
                    ((key as usize) < t.$field.len()).then(|| t.$field.remove(key as usize))
                })
                .flatten()
                .map_or(INVALID, |_| ResultCode::SUCCESS)
        }
    };
}

impl KeyframedAnimationSetInterface for FakeKeyframedSet {
    type Buffer = FakeBuffer;

    unsafe fn create(
        name: *const c_char,
        ticks_per_second: f64,
        playback: u32,
        animation_count: u32,
        callback_key_count: u32,
        callback_keys: *const KeyCallbackRaw,
        set: &mut *mut Self,
    ) -> ResultCode {
        if ticks_per_second == 0.0 {
            return ResultCode::INVALID_ARGUMENT;
        }
        let mut tracks = Vec::new();
        tracks.resize_with(animation_count as usize, || None);
        *set = FakeKeyframedSet {
            refs: AtomicU32::new(1),
            state: Mutex::new(SetState {
                name: CStr::from_ptr(name).to_owned(),
                ticks_per_second,
                playback,
                tracks,
                callbacks: copy_in(callback_keys, callback_key_count),
                fail_next: None,
            }),
        }
        .into_raw();
        set_born();
        if leaks_on_failure(ticks_per_second) {
            ResultCode::INVALID_ARGUMENT
        } else {
            ResultCode::SUCCESS
        }
    }

    unsafe fn playback_type(this: NonNull<Self>) -> u32 {
        this.as_ref().state.lock().playback
    }

    unsafe fn source_ticks_per_second(this: NonNull<Self>) -> f64 {
        this.as_ref().state.lock().ticks_per_second
    }

    key_channel!(
        num_scale_keys,
        scale_keys,
        scale_key,
        set_scale_key,
        unregister_scale_key,
        scale,
        KeyVector3Raw
    );
    key_channel!(
        num_rotation_keys,
        rotation_keys,
        rotation_key,
        set_rotation_key,
        unregister_rotation_key,
        rotation,
        KeyQuaternionRaw
    );
    key_channel!(
        num_translation_keys,
        translation_keys,
        translation_key,
        set_translation_key,
        unregister_translation_key,
        translation,
        KeyVector3Raw
    );

    unsafe fn num_callback_keys(this: NonNull<Self>) -> u32 {
        this.as_ref().state.lock().callbacks.len() as u32
    }

    unsafe fn callback_keys(this: NonNull<Self>, keys: *mut KeyCallbackRaw) -> ResultCode {
        let set = this.as_ref();
        if let Some(code) = set.fail() {
            return code;
        }
        copy_out(&set.state.lock().callbacks, keys);
        ResultCode::SUCCESS
    }

    unsafe fn callback_key(this: NonNull<Self>, index: u32, out: &mut KeyCallbackRaw) -> ResultCode {
        match this.as_ref().state.lock().callbacks.get(index as usize) {
            Some(k) => {
                *out = *k;
                ResultCode::SUCCESS
            }
            None => INVALID,
        }
    }

    unsafe fn set_callback_key(this: NonNull<Self>, index: u32, value: &KeyCallbackRaw) -> ResultCode {
        match this.as_ref().state.lock().callbacks.get_mut(index as usize) {
            Some(k) => {
                *k = *value;
                ResultCode::SUCCESS
            }
            None => INVALID,
        }
    }

    unsafe fn unregister_animation(this: NonNull<Self>, animation: u32) -> ResultCode {
        let mut state = this.as_ref().state.lock();
        match state.tracks.get_mut(animation as usize) {
            Some(slot @ Some(_)) => {
                *slot = None;
                ResultCode::SUCCESS
            }
            _ => INVALID,
        }
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
        let set = this.as_ref();
        if let Some(code) = set.fail() {
            return code;
        }
        let track = Track {
            name: CStr::from_ptr(name).to_owned(),
            scale: copy_in(scale_keys, scale_count),
            rotation: copy_in(rotation_keys, rotation_count),
            translation: copy_in(translation_keys, translation_count),
        };
        let mut state = set.state.lock();
        match state.tracks.iter().position(Option::is_none) {
            Some(free) => {
                state.tracks[free] = Some(track);
                *index = free as u32;
                ResultCode::SUCCESS
            }
            None => ResultCode::OUT_OF_MEMORY,
        }
    }

    unsafe fn compress(
        this: NonNull<Self>,
        _flags: u32,
        lossiness: f32,
        frame: *mut c_void,
        data: &mut *mut FakeBuffer,
    ) -> ResultCode {
        let set = this.as_ref();
        if let Some(code) = set.fail() {
            return code;
        }
        if !(0.0..=1.0).contains(&lossiness) {
            return ResultCode::INVALID_ARGUMENT;
        }
        let state = set.state.lock();
        let mut bytes = Vec::new();
        for track in state.tracks.iter().flatten() {
            bytes.extend_from_slice(bytemuck::cast_slice(&track.scale));
            bytes.extend_from_slice(bytemuck::cast_slice(&track.rotation));
            bytes.extend_from_slice(bytemuck::cast_slice(&track.translation));
        }
        // Scoping to a frame keeps only the first track's worth of data.
        if !frame.is_null() {
            bytes.truncate(16);
        }
        *data = FakeBuffer::new(bytes).into_raw();
        ResultCode::SUCCESS
    }
}

pub struct FakeCompressedSet {
    refs: AtomicU32,
    pub state: Mutex<SetState>,
    pub data: Vec<u8>,
}

ref_counted!(FakeCompressedSet);

impl Drop for FakeCompressedSet {
    fn drop(&mut self) {
        LIVE_SETS.with(|n| n.set(n.get() - 1));
    }
}

impl CompressedAnimationSetInterface for FakeCompressedSet {
    type Buffer = FakeBuffer;

    unsafe fn create(
        name: *const c_char,
        ticks_per_second: f64,
        playback: u32,
        compressed_data: NonNull<FakeBuffer>,
        callback_key_count: u32,
        callback_keys: *const KeyCallbackRaw,
        set: &mut *mut Self,
    ) -> ResultCode {
        let data = compressed_data.as_ref().data.clone();
        if data.is_empty() {
            return ResultCode::D3DX_INVALID_DATA;
        }
        *set = FakeCompressedSet {
            refs: AtomicU32::new(1),
            state: Mutex::new(SetState {
                name: CStr::from_ptr(name).to_owned(),
                ticks_per_second,
                playback,
                tracks: Vec::new(),
                callbacks: copy_in(callback_keys, callback_key_count),
                fail_next: None,
            }),
            data,
        }
        .into_raw();
        set_born();
        if leaks_on_failure(ticks_per_second) {
            ResultCode::INVALID_ARGUMENT
        } else {
            ResultCode::SUCCESS
        }
    }

    unsafe fn playback_type(this: NonNull<Self>) -> u32 {
        this.as_ref().state.lock().playback
    }

    unsafe fn source_ticks_per_second(this: NonNull<Self>) -> f64 {
        this.as_ref().state.lock().ticks_per_second
    }

    unsafe fn num_callback_keys(this: NonNull<Self>) -> u32 {
        this.as_ref().state.lock().callbacks.len() as u32
    }

    unsafe fn callback_keys(this: NonNull<Self>, keys: *mut KeyCallbackRaw) -> ResultCode {
        copy_out(&this.as_ref().state.lock().callbacks, keys);
        ResultCode::SUCCESS
    }

    unsafe fn compressed_data(this: NonNull<Self>, data: &mut *mut FakeBuffer) -> ResultCode {
        *data = FakeBuffer::new(this.as_ref().data.clone()).into_raw();
        ResultCode::SUCCESS
    }
}
