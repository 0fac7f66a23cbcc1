use std::path::Path;

/// A storage volume, as presented to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// ex: "Built-in memory card", "External storage 2"
    pub label: String,
    /// absolute path of the mount point, identifies the volume
    pub path: String,
    /// true for removable media, false for the built-in default volume
    pub is_external: bool,
    pub is_read_only: bool,
}

impl VolumeInfo {
    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }
}
