pub mod com;
pub mod config;
pub mod direct3d11;
pub mod direct3d9;
pub mod dxgi;
pub mod error;
pub mod ffi;
pub mod install;
pub mod logging;
pub mod math;
pub mod result;
pub mod scratch;

use napi::bindgen_prelude::*;
use napi_derive::napi;

use config::Configuration;
use error::InteropError;
use result::ResultCode;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

impl From<InteropError> for napi::Error {
    fn from(e: InteropError) -> Self {
        let status = match &e {
            InteropError::InvalidArgument(_) | InteropError::Config(_) => Status::InvalidArg,
            _ => Status::GenericFailure,
        };
        napi::Error::new(status, e.to_string())
    }
}

#[napi]
pub fn version() -> String {
    VERSION.to_string()
}

// ── Result codes ──

#[napi(object)]
pub struct JsResultInfo {
    pub code: i32,
    pub name: String,
    pub success: bool,
    /// Success codes the caller should not ignore (`False`, `WasStillDrawing`).
    pub notable: bool,
}

impl From<ResultCode> for JsResultInfo {
    fn from(r: ResultCode) -> Self {
        Self {
            code: r.0,
            name: r.name().to_string(),
            success: r.is_success(),
            notable: r.is_notable(),
        }
    }
}

#[napi]
pub fn describe_result(code: i32) -> JsResultInfo {
    result::to_result(code).into()
}

/// Throws for failure codes, otherwise describes the success.
#[napi]
pub fn check_result(code: i32, description: Option<String>) -> Result<JsResultInfo> {
    let checked = match description {
        Some(d) => result::check_with(code, &d)?,
        None => result::check(code)?,
    };
    Ok(checked.into())
}

#[napi]
pub fn last_result() -> JsResultInfo {
    result::last().into()
}

// ── Object tracking ──

#[napi(object)]
pub struct JsLiveObject {
    pub address: i64,
    pub type_name: String,
    pub handles: u32,
}

#[napi]
pub fn live_objects() -> Vec<JsLiveObject> {
    com::live_objects()
        .into_iter()
        .map(|o| JsLiveObject {
            address: o.address as i64,
            type_name: o.type_name.to_string(),
            handles: o.handles,
        })
        .collect()
}

#[napi]
pub fn report_leaks() -> u32 {
    com::report_leaks() as u32
}

// ── Configuration / logging ──

/// Replaces the configuration with `json`; omitted fields take defaults.
#[napi]
pub fn configure(json: String) -> Result<()> {
    config::set(Configuration::from_json(&json)?);
    Ok(())
}

#[napi]
pub fn current_configuration() -> Result<String> {
    Ok(config::current().to_json()?)
}

#[napi]
pub fn init_logging(filter: Option<String>) {
    logging::init(filter.as_deref());
}
