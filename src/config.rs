use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::InteropError;

/// Process-wide settings for the binding layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    /// Record every live native handle so leaks can be reported.
    pub enable_object_tracking: bool,
    /// `tracing` filter directive used by [`crate::logging::init`].
    pub log_filter: String,
    pub installer: InstallerConfig,
}

/// Settings for the redistributable setup action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstallerConfig {
    /// Installer property holding the extraction directory.
    pub property_name: String,
    /// How long to wait before deleting the extracted files.
    pub cleanup_delay_ms: u64,
    /// Whether to invoke the native setup routine after extraction.
    pub run_setup: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            enable_object_tracking: cfg!(debug_assertions),
            log_filter: "info".to_string(),
            installer: InstallerConfig::default(),
        }
    }
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            property_name: "CustomActionData".to_string(),
            cleanup_delay_ms: 15_000,
            run_setup: false,
        }
    }
}

impl Configuration {
    pub fn from_json(json: &str) -> Result<Self, InteropError> {
        serde_json::from_str(json).map_err(|e| InteropError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, InteropError> {
        serde_json::to_string_pretty(self).map_err(|e| InteropError::Config(e.to_string()))
    }
}

static CURRENT: RwLock<Option<Arc<Configuration>>> = RwLock::new(None);

/// The active configuration, defaults until [`set`] is called.
pub fn current() -> Arc<Configuration> {
    if let Some(c) = CURRENT.read().as_ref() {
        return c.clone();
    }
    CURRENT
        .write()
        .get_or_insert_with(|| Arc::new(Configuration::default()))
        .clone()
}

pub fn set(config: Configuration) {
    tracing::debug!("Configuration replaced: {config:?}");
    *CURRENT.write() = Some(Arc::new(config));
}
