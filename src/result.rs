//! Translation of native HRESULT codes into named results.
//!
//! Every native call in the wrapper layer goes through [`check`] (or
//! [`check_with`]). Failures become [`InteropError::Native`]; success codes are
//! handed back so callers can react to the notable ones such as
//! [`ResultCode::WAS_STILL_DRAWING`].

use std::cell::Cell;
use std::fmt;

use crate::error::{InteropError, Result};

/// A native signed 32-bit result code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ResultCode(pub i32);

/// The closed set of named outcomes a [`ResultCode`] classifies into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Success,
    False,
    WasStillDrawing,
    InvalidCall,
    FileNotFound,
    TooManyUniqueStateObjects,
    Failure,
    InvalidArgument,
    OutOfMemory,
    /// A non-negative code with no table entry.
    UnmappedSuccess,
    /// A negative code with no table entry.
    UnmappedFailure,
}

const fn hr(code: u32) -> ResultCode {
    ResultCode(code as i32)
}

impl ResultCode {
    pub const SUCCESS: ResultCode = hr(0x0000_0000);
    pub const FALSE: ResultCode = hr(0x0000_0001);
    pub const FAILURE: ResultCode = hr(0x8000_4005);
    pub const INVALID_ARGUMENT: ResultCode = hr(0x8007_0057);
    pub const OUT_OF_MEMORY: ResultCode = hr(0x8007_000E);
    pub const NOT_IMPLEMENTED: ResultCode = hr(0x8000_4001);
    pub const INVALID_POINTER: ResultCode = hr(0x8000_4003);

    pub const INVALID_CALL: ResultCode = hr(0x887A_0001);
    pub const WAS_STILL_DRAWING: ResultCode = hr(0x887A_000A);

    pub const TOO_MANY_UNIQUE_STATE_OBJECTS: ResultCode = hr(0x887C_0001);
    pub const FILE_NOT_FOUND: ResultCode = hr(0x887C_0002);

    /// `D3DERR_INVALIDCALL`, returned by the D3D9/D3DX animation interfaces.
    pub const D3D9_INVALID_CALL: ResultCode = hr(0x8876_086C);
    /// `D3DXERR_INVALIDDATA`.
    pub const D3DX_INVALID_DATA: ResultCode = hr(0x8876_0B59);

    pub fn kind(self) -> ResultKind {
        match self {
            ResultCode::SUCCESS => ResultKind::Success,
            ResultCode::FALSE => ResultKind::False,
            ResultCode::WAS_STILL_DRAWING => ResultKind::WasStillDrawing,
            ResultCode::INVALID_CALL | ResultCode::D3D9_INVALID_CALL => ResultKind::InvalidCall,
            ResultCode::FILE_NOT_FOUND => ResultKind::FileNotFound,
            ResultCode::TOO_MANY_UNIQUE_STATE_OBJECTS => ResultKind::TooManyUniqueStateObjects,
            ResultCode::FAILURE => ResultKind::Failure,
            ResultCode::INVALID_ARGUMENT => ResultKind::InvalidArgument,
            ResultCode::OUT_OF_MEMORY => ResultKind::OutOfMemory,
            code if code.0 < 0 => ResultKind::UnmappedFailure,
            _ => ResultKind::UnmappedSuccess,
        }
    }

    /// Whether the code counts as success. `WAS_STILL_DRAWING` is negative on
    /// the wire but reported as a success with notice.
    pub fn is_success(self) -> bool {
        self.kind().is_success()
    }

    pub fn is_failure(self) -> bool {
        !self.is_success()
    }

    /// A success that the caller should not silently drop.
    pub fn is_notable(self) -> bool {
        matches!(self.kind(), ResultKind::False | ResultKind::WasStillDrawing)
    }

    pub fn name(self) -> &'static str {
        self.kind().name()
    }
}

impl ResultKind {
    pub fn is_success(self) -> bool {
        matches!(
            self,
            ResultKind::Success
                | ResultKind::False
                | ResultKind::WasStillDrawing
                | ResultKind::UnmappedSuccess
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ResultKind::Success => "Success",
            ResultKind::False => "False",
            ResultKind::WasStillDrawing => "WasStillDrawing",
            ResultKind::InvalidCall => "InvalidCall",
            ResultKind::FileNotFound => "FileNotFound",
            ResultKind::TooManyUniqueStateObjects => "TooManyUniqueStateObjects",
            ResultKind::Failure => "Failure",
            ResultKind::InvalidArgument => "InvalidArgument",
            ResultKind::OutOfMemory => "OutOfMemory",
            ResultKind::UnmappedSuccess => "UnknownSuccess",
            ResultKind::UnmappedFailure => "UnknownFailure",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08X})", self.name(), self.0 as u32)
    }
}

impl From<i32> for ResultCode {
    fn from(code: i32) -> Self {
        ResultCode(code)
    }
}

#[cfg(windows)]
impl From<windows::core::HRESULT> for ResultCode {
    fn from(code: windows::core::HRESULT) -> Self {
        ResultCode(code.0)
    }
}

thread_local! {
    static LAST: Cell<ResultCode> = const { Cell::new(ResultCode::SUCCESS) };
}

/// Maps a raw native code to its named result.
pub fn to_result(code: i32) -> ResultCode {
    ResultCode(code)
}

/// The result of the most recent [`check`] on this thread.
pub fn last() -> ResultCode {
    LAST.with(|l| l.get())
}

/// Checks a native code, raising failures as [`InteropError::Native`].
pub fn check(code: impl Into<ResultCode>) -> Result<ResultCode> {
    check_inner(code.into(), None)
}

/// Like [`check`], attaching a description to the raised error.
pub fn check_with(code: impl Into<ResultCode>, description: &str) -> Result<ResultCode> {
    check_inner(code.into(), Some(description))
}

fn check_inner(result: ResultCode, description: Option<&str>) -> Result<ResultCode> {
    LAST.with(|l| l.set(result));
    if result.is_success() {
        return Ok(result);
    }
    match description {
        Some(d) => tracing::error!("Native call failed: {result}: {d}"),
        None => tracing::error!("Native call failed: {result}"),
    }
    Err(InteropError::Native {
        result,
        description: description.map(str::to_owned),
    })
}
