use {
    crate::*,
    std::path::Path,
};

const MEDIA_RW_PREFIX: &str = "/mnt/media_rw/";
const STORAGE_PREFIX: &str = "/storage/";

/// compare two paths component-wise, so that `/storage//sdcard1/`
/// and `/storage/sdcard1` are the same path
fn same_path(a: &str, b: &str) -> bool {
    Path::new(a) == Path::new(b)
}

/// tell whether the two mount paths are the same media seen through
/// the `/mnt/media_rw/` and `/storage/` namespaces
fn is_media_rw_alias(a: &str, b: &str) -> bool {
    let crossed = (a.starts_with(MEDIA_RW_PREFIX) && b.starts_with(STORAGE_PREFIX))
        || (b.starts_with(MEDIA_RW_PREFIX) && a.starts_with(STORAGE_PREFIX));
    crossed && Path::new(a).file_name() == Path::new(b).file_name()
}

/// tell whether two mount paths designate the same volume
pub fn same_volume(a: &str, b: &str) -> bool {
    same_path(a, b) || is_media_rw_alias(a, b)
}

/// tell whether the mount entry is already represented in the list,
/// either by its mount path or by its device path
pub fn is_listed(volumes: &[VolumeInfo], entry: &MountEntry) -> bool {
    volumes.iter().any(|volume| {
        same_volume(&volume.path, &entry.mount_path) || same_path(&volume.path, &entry.device)
    })
}

#[test]
fn test_same_volume() {
    assert!(same_volume("/storage/sdcard1", "/storage/sdcard1"));
    assert!(same_volume("/storage/sdcard1/", "/storage//sdcard1"));
    assert!(same_volume("/mnt/media_rw/sdcard1", "/storage/sdcard1"));
    assert!(same_volume("/storage/sdcard1", "/mnt/media_rw/sdcard1/"));
    assert!(!same_volume("/mnt/media_rw/sdcard1", "/storage/usb1"));
    assert!(!same_volume("/mnt/sdcard1", "/storage/sdcard1"));
    assert!(!same_volume("/storage/sdcard1", "/storage/sdcard2"));
}

#[test]
fn test_is_listed() {
    let volumes = vec![VolumeInfo {
        label: "External storage 1".to_string(),
        path: "/storage/sdcard1".to_string(),
        is_external: true,
        is_read_only: false,
    }];
    let alias: MountEntry = "/dev/block/vold/179:1 /mnt/media_rw/sdcard1 vfat rw 0 0"
        .parse()
        .unwrap();
    assert!(is_listed(&volumes, &alias));
    let bound: MountEntry = "/storage/sdcard1 /mnt/runtime/sdcard1 sdcardfs rw 0 0"
        .parse()
        .unwrap();
    assert!(is_listed(&volumes, &bound));
    let other: MountEntry = "/dev/block/vold/8:1 /storage/usb1 vfat rw 0 0".parse().unwrap();
    assert!(!is_listed(&volumes, &other));
}
