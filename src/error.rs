use thiserror::Error;

use crate::result::ResultCode;

#[derive(Error, Debug)]
pub enum InteropError {
    #[error("{}", native_message(.result, .description))]
    Native {
        result: ResultCode,
        description: Option<String>,
    },

    #[error("Cannot access a disposed {type_name}")]
    ObjectDisposed { type_name: &'static str },

    #[error("Native pointer for {type_name} is null")]
    NullPointer { type_name: &'static str },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),
}

impl InteropError {
    /// The native result carried by this error, if it came from a native call.
    pub fn result(&self) -> Option<ResultCode> {
        match self {
            InteropError::Native { result, .. } => Some(*result),
            #[cfg(windows)]
            InteropError::Windows(e) => Some(ResultCode(e.code().0)),
            _ => None,
        }
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self, InteropError::ObjectDisposed { .. })
    }
}

fn native_message(result: &ResultCode, description: &Option<String>) -> String {
    match description {
        Some(d) => format!("{result}: {d}"),
        None => result.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, InteropError>;
