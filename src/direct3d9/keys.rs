//! Managed keyframe records and their native counterparts.
//!
//! Key times are `f32`, the width D3DX stores, so every key round-trips
//! through the native set unchanged. Positions passed to the set's sampling
//! calls stay `f64`.

use std::ffi::c_void;

use crate::ffi::{KeyCallbackRaw, KeyQuaternionRaw, KeyVector3Raw};
use crate::math::{Quaternion, Vector3};

/// Opaque user data attached to a callback key. Never dereferenced here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CallbackData(pub usize);

impl CallbackData {
    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }

    pub fn from_ptr(ptr: *mut c_void) -> Self {
        CallbackData(ptr as usize)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScaleKey {
    pub time: f32,
    pub value: Vector3,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RotationKey {
    pub time: f32,
    pub value: Quaternion,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TranslationKey {
    pub time: f32,
    pub value: Vector3,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CallbackKey {
    pub time: f32,
    pub data: CallbackData,
}

macro_rules! vector_key {
    ($key:ident) => {
        impl $key {
            pub fn new(time: f32, value: Vector3) -> Self {
                Self { time, value }
            }
        }

        impl From<&KeyVector3Raw> for $key {
            fn from(raw: &KeyVector3Raw) -> Self {
                Self {
                    time: raw.time,
                    value: raw.value,
                }
            }
        }

        impl From<&$key> for KeyVector3Raw {
            fn from(key: &$key) -> Self {
                Self {
                    time: key.time,
                    value: key.value,
                }
            }
        }
    };
}

vector_key!(ScaleKey);
vector_key!(TranslationKey);

impl RotationKey {
    pub fn new(time: f32, value: Quaternion) -> Self {
        Self { time, value }
    }
}

impl From<&KeyQuaternionRaw> for RotationKey {
    fn from(raw: &KeyQuaternionRaw) -> Self {
        Self {
            time: raw.time,
            value: raw.value,
        }
    }
}

impl From<&RotationKey> for KeyQuaternionRaw {
    fn from(key: &RotationKey) -> Self {
        Self {
            time: key.time,
            value: key.value,
        }
    }
}

impl CallbackKey {
    pub fn new(time: f32, data: CallbackData) -> Self {
        Self { time, data }
    }
}

impl From<&KeyCallbackRaw> for CallbackKey {
    fn from(raw: &KeyCallbackRaw) -> Self {
        Self {
            time: raw.time,
            data: CallbackData::from_ptr(raw.callback_data),
        }
    }
}

impl From<&CallbackKey> for KeyCallbackRaw {
    fn from(key: &CallbackKey) -> Self {
        Self {
            time: key.time,
            callback_data: key.data.as_ptr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_is_native_width() {
        let key = ScaleKey::new(0.1, Vector3::ONE);
        let raw = KeyVector3Raw::from(&key);
        assert_eq!(raw.time.to_bits(), 0.1f32.to_bits());
        assert_eq!(ScaleKey::from(&raw), key);

        let late = TranslationKey::new(86_400.125, Vector3::ZERO);
        assert_eq!(TranslationKey::from(&KeyVector3Raw::from(&late)), late);
    }

    #[test]
    fn test_callback_data_is_opaque() {
        let key = CallbackKey::new(2.0, CallbackData(0xDEAD_BEEF));
        let raw = KeyCallbackRaw::from(&key);
        assert_eq!(raw.callback_data as usize, 0xDEAD_BEEF);
        assert_eq!(CallbackKey::from(&raw), key);
    }
}
