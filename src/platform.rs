//! What the host platform tells about its storage
//!
//! The default volume, the label texts and the caller's acceptance
//! policy all come from outside. Each is a trait with stock
//! implementations for the common cases.

use {
    crate::*,
    std::{
        env,
        path::{Path, PathBuf},
        str::FromStr,
    },
};

/// The state of the default volume, as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageState {
    Mounted,
    MountedReadOnly,
    Unmounted,
    Other(String),
}

impl StorageState {
    /// whether the volume can be listed
    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted | Self::MountedReadOnly)
    }
}

impl FromStr for StorageState {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "mounted" => Ok(Self::Mounted),
            "mounted_ro" => Ok(Self::MountedReadOnly),
            "unmounted" => Ok(Self::Unmounted),
            "" => Err(Error::ParseStorageState(s.to_string())),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

/// How much the platform can tell about its default volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTier {
    /// nothing is known, the default volume is built-in
    Legacy,
    /// the platform tells whether the default volume is removable
    RemovableQuery,
    /// the platform also tells whether it's emulated
    EmulatedQuery,
}

impl FromStr for ApiTier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "removable" => Ok(Self::RemovableQuery),
            "emulated" => Ok(Self::EmulatedQuery),
            _ => Err(Error::ParseApiTier(s.to_string())),
        }
    }
}

/// Capabilities of the default volume, resolved once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub removable: bool,
    pub emulated: bool,
    pub api_tier: ApiTier,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            removable: false,
            emulated: false,
            api_tier: ApiTier::EmulatedQuery,
        }
    }
}

impl Capabilities {
    /// whether the default volume is removable media rather than
    /// built-in memory
    pub fn is_external(&self) -> bool {
        match self.api_tier {
            ApiTier::Legacy => false,
            ApiTier::RemovableQuery => self.removable,
            ApiTier::EmulatedQuery => self.removable && !self.emulated,
        }
    }
}

/// The platform accessor for the default (primary) volume
pub trait DefaultVolumeSource {
    fn state(&self) -> StorageState;
    fn default_path(&self) -> PathBuf;
    fn capabilities(&self) -> Capabilities;
}

/// A platform without default volume
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaultVolume;

impl DefaultVolumeSource for NoDefaultVolume {
    fn state(&self) -> StorageState {
        StorageState::Unmounted
    }
    fn default_path(&self) -> PathBuf {
        PathBuf::new()
    }
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }
}

/// A default volume described by plain data
#[derive(Debug, Clone)]
pub struct FixedDefaultVolume {
    pub state: StorageState,
    pub path: PathBuf,
    pub capabilities: Capabilities,
}

impl FixedDefaultVolume {
    /// a mounted built-in volume
    pub fn built_in<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            state: StorageState::Mounted,
            path: path.into(),
            capabilities: Capabilities::default(),
        }
    }
}

impl DefaultVolumeSource for FixedDefaultVolume {
    fn state(&self) -> StorageState {
        self.state.clone()
    }
    fn default_path(&self) -> PathBuf {
        self.path.clone()
    }
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

/// The default volume advertised by the `EXTERNAL_STORAGE`
/// environment variable, as set on Android
#[derive(Debug, Clone, Default)]
pub struct EnvDefaultVolume {
    /// root under which the advertised path is checked
    pub root: Option<PathBuf>,
}

impl EnvDefaultVolume {
    pub const VAR: &'static str = "EXTERNAL_STORAGE";
    fn path(&self) -> Option<PathBuf> {
        env::var_os(Self::VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

impl DefaultVolumeSource for EnvDefaultVolume {
    fn state(&self) -> StorageState {
        let root = self.root.as_deref().unwrap_or_else(|| Path::new("/"));
        match self.path() {
            Some(path) if sys::is_dir_under(root, &path) => StorageState::Mounted,
            _ => StorageState::Unmounted,
        }
    }
    fn default_path(&self) -> PathBuf {
        self.path().unwrap_or_default()
    }
    fn capabilities(&self) -> Capabilities {
        let emulated = self
            .path()
            .map_or(false, |p| p.to_string_lossy().starts_with("/storage/emulated"));
        Capabilities {
            removable: !emulated,
            emulated,
            api_tier: ApiTier::EmulatedQuery,
        }
    }
}

/// Localized texts for the labels
pub trait LabelSource {
    fn built_in_memory_card(&self) -> String;
    /// the numbered suffix is appended by the builder
    fn external_storage(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLabels;

impl LabelSource for EnglishLabels {
    fn built_in_memory_card(&self) -> String {
        "Built-in memory card".to_string()
    }
    fn external_storage(&self) -> String {
        "External storage".to_string()
    }
}

/// The caller's own acceptance rules for mount points
pub trait MountPointPolicy {
    fn accepts(&self, volume: &VolumeInfo) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl MountPointPolicy for AcceptAll {
    fn accepts(&self, _volume: &VolumeInfo) -> bool {
        true
    }
}

impl<F> MountPointPolicy for F
where
    F: Fn(&VolumeInfo) -> bool,
{
    fn accepts(&self, volume: &VolumeInfo) -> bool {
        self(volume)
    }
}

#[test]
fn test_storage_state() {
    assert_eq!("mounted".parse::<StorageState>().unwrap(), StorageState::Mounted);
    assert!("mounted_ro".parse::<StorageState>().unwrap().is_mounted());
    assert!(!"unmounted".parse::<StorageState>().unwrap().is_mounted());
    assert_eq!(
        "bad_removal".parse::<StorageState>().unwrap(),
        StorageState::Other("bad_removal".to_string()),
    );
    assert!("".parse::<StorageState>().is_err());
}

#[test]
fn test_capabilities_is_external() {
    let caps = |removable, emulated, api_tier| Capabilities {
        removable,
        emulated,
        api_tier,
    };
    assert!(!caps(true, false, ApiTier::Legacy).is_external());
    assert!(caps(true, false, ApiTier::RemovableQuery).is_external());
    assert!(!caps(false, false, ApiTier::RemovableQuery).is_external());
    // emulation isn't known at this tier
    assert!(caps(true, true, ApiTier::RemovableQuery).is_external());
    assert!(caps(true, false, ApiTier::EmulatedQuery).is_external());
    assert!(!caps(true, true, ApiTier::EmulatedQuery).is_external());
    assert!(!caps(false, false, ApiTier::EmulatedQuery).is_external());
    assert_eq!("removable".parse::<ApiTier>().unwrap(), ApiTier::RemovableQuery);
    assert!("honeycomb".parse::<ApiTier>().is_err());
}

#[test]
fn test_closure_policy() {
    let policy = |v: &VolumeInfo| !v.is_read_only;
    let volume = VolumeInfo {
        label: "External storage 1".to_string(),
        path: "/storage/sdcard1".to_string(),
        is_external: true,
        is_read_only: true,
    };
    assert!(!policy.accepts(&volume));
    assert!(AcceptAll.accepts(&volume));
}

#[test]
fn test_env_default_volume() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("storage/emulated/0")).unwrap();
    let source = EnvDefaultVolume {
        root: Some(root.path().to_path_buf()),
    };
    env::set_var(EnvDefaultVolume::VAR, "/storage/emulated/0");
    assert_eq!(source.state(), StorageState::Mounted);
    assert_eq!(source.default_path(), PathBuf::from("/storage/emulated/0"));
    assert!(!source.capabilities().is_external());
    env::set_var(EnvDefaultVolume::VAR, "/mnt/sdcard");
    assert_eq!(source.state(), StorageState::Unmounted);
    assert!(source.capabilities().is_external());
    env::remove_var(EnvDefaultVolume::VAR);
    assert_eq!(source.default_path(), PathBuf::new());
}
