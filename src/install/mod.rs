//! Installer custom action that unpacks the DirectX redistributable.
//!
//! The action reads the target directory from an installer property,
//! extracts every manifest entry from embedded resources, optionally runs the
//! native setup, waits, and then deletes every manifest file again. Cleanup
//! runs whether or not extraction succeeded.

pub mod extract;
pub mod manifest;

#[cfg(windows)]
pub mod msi;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::InstallerConfig;
use crate::error::{InteropError, Result};
use crate::result::ResultCode;

pub use manifest::{Manifest, ManifestEntry, Platform};

/// Read access to installer properties.
pub trait PropertyStore {
    fn property(&self, name: &str) -> Option<String>;
}

/// Embedded binary payloads addressed by resource id.
pub trait ResourceSource {
    fn resource(&self, id: u16) -> Option<Cow<'_, [u8]>>;
}

/// The native setup routine run against the extracted files.
pub trait SetupRunner {
    fn run(&self, directory: &Path) -> Result<()>;
}

/// User-facing progress notifications.
pub trait Notifier {
    fn notify(&self, phase: Phase, message: &str);
}

/// Step of the action a notification belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    ReadDirectory,
    Extracting,
    RunningSetup,
    Cleanup,
    Failed,
}

/// Two-valued outcome reported to the installer host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionStatus {
    Success,
    Failure,
}

impl ActionStatus {
    pub fn code(self) -> ResultCode {
        match self {
            ActionStatus::Success => ResultCode::SUCCESS,
            ActionStatus::Failure => ResultCode::FAILURE,
        }
    }

    /// `ERROR_SUCCESS` or `ERROR_INSTALL_FAILURE`.
    pub fn msi_code(self) -> u32 {
        match self {
            ActionStatus::Success => 0,
            ActionStatus::Failure => 1603,
        }
    }
}

/// Runs the extract, setup, cleanup sequence once.
pub struct SetupAction<'a> {
    pub manifest: &'a Manifest,
    pub properties: &'a dyn PropertyStore,
    pub resources: &'a dyn ResourceSource,
    pub setup: &'a dyn SetupRunner,
    pub notifier: &'a dyn Notifier,
    pub config: InstallerConfig,
}

impl<'a> SetupAction<'a> {
    pub fn new(
        manifest: &'a Manifest,
        properties: &'a dyn PropertyStore,
        resources: &'a dyn ResourceSource,
    ) -> Self {
        Self {
            manifest,
            properties,
            resources,
            setup: &NoSetup,
            notifier: &LogNotifier,
            config: crate::config::current().installer.clone(),
        }
    }

    pub fn run(&self) -> ActionStatus {
        let directory = match self.properties.property(&self.config.property_name) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let msg = format!("Property {} is not set", self.config.property_name);
                self.notifier.notify(Phase::Failed, &msg);
                return ActionStatus::Failure;
            }
        };
        self.notifier
            .notify(Phase::ReadDirectory, &directory.display().to_string());

        self.notifier.notify(Phase::Extracting, "Creating files");
        let mut status = match self.extract_all(&directory) {
            Ok(()) => ActionStatus::Success,
            Err((path, e)) => {
                tracing::error!("Failed to extract {}: {e}", path.display());
                self.notifier
                    .notify(Phase::Failed, &path.display().to_string());
                ActionStatus::Failure
            }
        };

        if status == ActionStatus::Success {
            if self.config.run_setup {
                self.notifier.notify(Phase::RunningSetup, "Running DirectX setup");
                if let Err(e) = self.setup.run(&directory) {
                    tracing::error!("DirectX setup failed: {e}");
                    self.notifier.notify(Phase::Failed, &e.to_string());
                    status = ActionStatus::Failure;
                }
            }
            std::thread::sleep(Duration::from_millis(self.config.cleanup_delay_ms));
        }

        self.notifier.notify(Phase::Cleanup, "Deleting files");
        self.cleanup(&directory);
        status
    }

    /// Paths of every manifest file under `directory`.
    pub fn target_paths(&self, directory: &Path) -> Vec<PathBuf> {
        self.manifest
            .entries()
            .iter()
            .map(|e| directory.join(&e.file_name))
            .collect()
    }

    fn extract_all(&self, directory: &Path) -> std::result::Result<(), (PathBuf, InteropError)> {
        for entry in self.manifest.entries() {
            let path = directory.join(&entry.file_name);
            let bytes = self.resources.resource(entry.resource_id).ok_or_else(|| {
                let msg = format!("resource {} not found", entry.resource_id);
                (path.clone(), InteropError::InvalidArgument(msg))
            })?;
            extract::write_mapped(&path, &bytes).map_err(|e| (path.clone(), e.into()))?;
            tracing::debug!("Extracted {} ({} bytes)", path.display(), bytes.len());
        }
        Ok(())
    }

    fn cleanup(&self, directory: &Path) {
        for path in self.target_paths(directory) {
            if let Err(e) = extract::remove_if_present(&path) {
                tracing::warn!("Could not delete {}: {e}", path.display());
            }
        }
    }
}

/// Properties held in memory.
#[derive(Clone, Debug, Default)]
pub struct MapPropertyStore(pub HashMap<String, String>);

impl MapPropertyStore {
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl PropertyStore for MapPropertyStore {
    fn property(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Resources held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryResources(pub BTreeMap<u16, Vec<u8>>);

impl MemoryResources {
    pub fn insert(&mut self, id: u16, bytes: impl Into<Vec<u8>>) {
        self.0.insert(id, bytes.into());
    }
}

impl ResourceSource for MemoryResources {
    fn resource(&self, id: u16) -> Option<Cow<'_, [u8]>> {
        self.0.get(&id).map(|b| Cow::Borrowed(b.as_slice()))
    }
}

/// Skips the native setup step.
pub struct NoSetup;

impl SetupRunner for NoSetup {
    fn run(&self, _directory: &Path) -> Result<()> {
        Ok(())
    }
}

/// Sends notifications to the log instead of the user.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, phase: Phase, message: &str) {
        match phase {
            Phase::Failed => tracing::error!("{phase:?}: {message}"),
            _ => tracing::info!("{phase:?}: {message}"),
        }
    }
}
