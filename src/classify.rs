//! Decision table telling which mount entries are external storage
//!
//! Genuine removable storage comes in two conventions:
//! - block devices managed by the volume daemon (`/dev/block/vold/...`)
//! - FUSE or media-transfer mounts exposed under `/storage/`

use crate::*;

/// mount points of secure containers and app sandboxes
const HIDDEN_MOUNT_PREFIXES: &[&str] = &["/mnt/secure", "/mnt/asec", "/mnt/obb"];

/// internal staging path, always with a public alias elsewhere
const STAGING_PREFIX: &str = "/mnt/media_rw";

/// tell whether the entry may be a storage volume at all
pub fn is_relevant(entry: &MountEntry) -> bool {
    entry.fs_type == "vfat"
        || entry.mount_path.starts_with("/mnt/")
        || entry.mount_path.starts_with("/storage/")
}

fn is_vold_volume(entry: &MountEntry) -> bool {
    entry.device.starts_with("/dev/block/vold/")
        && !HIDDEN_MOUNT_PREFIXES
            .iter()
            .any(|prefix| entry.mount_path.starts_with(prefix))
        && !entry.device.starts_with("/dev/mapper")
        && entry.fs_type != "tmpfs"
}

fn is_fuse_volume(entry: &MountEntry) -> bool {
    (entry.device.starts_with("/dev/fuse") || entry.device.starts_with("/mnt/media"))
        && entry.mount_path.starts_with("/storage/")
        && !entry.mount_path.starts_with("/storage/emulated")
}

/// tell whether a relevant entry is an external volume
pub fn is_external_candidate(entry: &MountEntry) -> bool {
    is_vold_volume(entry) || is_fuse_volume(entry)
}

/// check the mount point is a real directory which isn't the
/// staging path (the caller's policy is checked apart)
pub fn is_valid_mount_point(
    volume: &VolumeInfo,
    options: &ScanOptions,
) -> bool {
    !volume.path.starts_with(STAGING_PREFIX) && sys::is_dir_under(&options.root, volume.path())
}

#[cfg(test)]
fn entry(line: &str) -> MountEntry {
    line.parse().unwrap()
}

#[test]
fn test_is_relevant() {
    assert!(is_relevant(&entry("/dev/block/sda1 /data/usb vfat rw")));
    assert!(is_relevant(&entry("tmpfs /mnt/secure tmpfs rw")));
    assert!(is_relevant(&entry("/dev/fuse /storage/emulated fuse rw")));
    assert!(!is_relevant(&entry("proc /proc proc rw,relatime 0 0")));
    assert!(!is_relevant(&entry("/dev/block/dm-0 /system ext4 ro 0 0")));
    // the trailing slash is required
    assert!(!is_relevant(&entry("/dev/block/vold/179:1 /storage ext4 rw")));
}

#[test]
fn test_is_external_candidate() {
    assert!(is_external_candidate(&entry(
        "/dev/block/vold/179:1 /storage/sdcard1 vfat rw,dirsync 0 0"
    )));
    assert!(is_external_candidate(&entry(
        "/dev/block/vold/public:8,1 /mnt/media_rw/usb vfat rw 0 0"
    )));
    assert!(is_external_candidate(&entry("/dev/fuse /storage/1234-ABCD fuse rw 0 0")));
    assert!(is_external_candidate(&entry(
        "/mnt/media_rw/1234-ABCD /storage/1234-ABCD sdcardfs rw 0 0"
    )));
    for line in [
        "/dev/block/vold/179:1 /mnt/secure/asec vfat rw 0 0",
        "/dev/block/vold/179:1 /mnt/asec/app-1 vfat ro 0 0",
        "/dev/block/vold/179:1 /mnt/obb/x vfat ro 0 0",
        "/dev/block/vold/179:1 /storage/sdcard1 tmpfs rw 0 0",
        "/dev/mapper/vold-1 /mnt/usb vfat rw 0 0",
        "/dev/fuse /storage/emulated fuse rw 0 0",
        "/dev/fuse /storage/emulated/0 fuse rw 0 0",
        "/dev/fuse /mnt/runtime/default/emulated fuse rw 0 0",
        "/dev/block/sda1 /mnt/usb vfat rw 0 0",
    ] {
        assert!(!is_external_candidate(&entry(line)), "{} accepted", line);
    }
}

#[test]
fn test_is_valid_mount_point() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("storage/sdcard1")).unwrap();
    std::fs::create_dir_all(root.path().join("mnt/media_rw/sdcard1")).unwrap();
    std::fs::write(root.path().join("storage/file"), "").unwrap();
    let options = ScanOptions::default().root(root.path());
    let volume = |path: &str| VolumeInfo {
        label: "External storage 1".to_string(),
        path: path.to_string(),
        is_external: true,
        is_read_only: false,
    };
    assert!(is_valid_mount_point(&volume("/storage/sdcard1"), &options));
    assert!(!is_valid_mount_point(&volume("/mnt/media_rw/sdcard1"), &options));
    assert!(!is_valid_mount_point(&volume("/storage/file"), &options));
    assert!(!is_valid_mount_point(&volume("/storage/usb1"), &options));
}
