/// One embedded file: where it goes and which resource holds it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub file_name: String,
    pub resource_id: u16,
}

impl ManifestEntry {
    pub fn new(file_name: impl Into<String>, resource_id: u16) -> Self {
        Self {
            file_name: file_name.into(),
            resource_id,
        }
    }
}

/// Target architecture of the redistributable cabinets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    X86,
    X64,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            Platform::X64
        } else {
            Platform::X86
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::X86 => "x86",
            Platform::X64 => "x64",
        }
    }
}

pub const REDIST_VERSION_NAME: &str = "Jun2008";
pub const REDIST_VERSION_NUMBER: &str = "38";

/// The files an installer action extracts, each with its own resource id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// The DirectX redistributable payload for `platform`.
    pub fn directx_redist(platform: Platform) -> Self {
        let cab = |component: &str| {
            format!(
                "{REDIST_VERSION_NAME}_{component}_{REDIST_VERSION_NUMBER}_{}.cab",
                platform.as_str()
            )
        };
        Self::new(vec![
            ManifestEntry::new("dsetup32.dll", 101),
            ManifestEntry::new("dsetup.dll", 102),
            ManifestEntry::new("dxdllreg_x86.cab", 103),
            ManifestEntry::new("dxsetup.exe", 104),
            ManifestEntry::new("dxupdate.cab", 105),
            ManifestEntry::new(cab("d3dx9"), 106),
            ManifestEntry::new(cab("d3dx10"), 107),
            ManifestEntry::new(cab("X3DAudio"), 108),
            ManifestEntry::new(cab("XAudio"), 109),
        ])
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
