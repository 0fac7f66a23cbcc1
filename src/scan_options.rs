use std::path::PathBuf;

/// where to look for the mount table and the mount points
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// the mount table, `/proc/mounts` by default
    pub mounts_path: PathBuf,
    /// the root under which mount points are checked to be directories
    pub root: PathBuf,
}
impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            mounts_path: PathBuf::from("/proc/mounts"),
            root: PathBuf::from("/"),
        }
    }
}
impl ScanOptions {
    pub fn mounts_path<P: Into<PathBuf>>(
        mut self,
        v: P,
    ) -> Self {
        self.mounts_path = v.into();
        self
    }
    pub fn root<P: Into<PathBuf>>(
        mut self,
        v: P,
    ) -> Self {
        self.root = v.into();
        self
    }
}
