//! D3DX9 animation sets and keyframe marshaling.

pub mod animation;
pub mod buffer;
pub mod keys;
mod native;

pub use animation::{
    AnimationOutput, AnimationOutputFlags, AnimationSet, AnimationSetInterface,
    CompressedAnimationSet, CompressedAnimationSetInterface, FramePointer,
    KeyframedAnimationSet, KeyframedAnimationSetInterface,
};
pub use buffer::{BufferInterface, DataBuffer};
pub use keys::{CallbackData, CallbackKey, RotationKey, ScaleKey, TranslationKey};
pub use native::{D3dxCompressedAnimationSet, D3dxKeyframedAnimationSet};

/// How an animation behaves past its period (`D3DXPLAYBACK_TYPE`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackType {
    #[default]
    Loop,
    Once,
    PingPong,
}

impl PlaybackType {
    pub fn to_raw(self) -> u32 {
        match self {
            PlaybackType::Loop => 0,
            PlaybackType::Once => 1,
            PlaybackType::PingPong => 2,
        }
    }

    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => PlaybackType::Once,
            2 => PlaybackType::PingPong,
            _ => PlaybackType::Loop,
        }
    }
}

/// Search direction for callback keys (`D3DXCALLBACK_SEARCH_FLAGS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CallbackSearchFlags(pub u32);

impl CallbackSearchFlags {
    pub const NONE: CallbackSearchFlags = CallbackSearchFlags(0);
    pub const EXCLUDING_INITIAL_POSITION: CallbackSearchFlags = CallbackSearchFlags(0x1);
    pub const BEHIND_INITIAL_POSITION: CallbackSearchFlags = CallbackSearchFlags(0x2);
}

/// `D3DXCOMPRESS_DEFAULT`, the only compression flag D3DX defines.
pub const COMPRESS_DEFAULT: u32 = 0;
