use {
    crate::*,
    std::path::Path,
};

/// read the whole mount table.
///
/// Failures are logged and give an empty table: a device whose
/// mount table can't be read simply has no additional volume.
pub fn read_mount_table<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    log::debug!("reading mounts from {:?}", path);
    match sys::read_file(path) {
        Ok(content) => content,
        Err(source) => {
            let e = Error::CantReadFile {
                source,
                path: path.to_path_buf(),
            };
            log::warn!("{}", e);
            String::new()
        }
    }
}

#[test]
fn test_read_missing_mount_table() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(read_mount_table(dir.path().join("mounts")), "");
}

#[test]
fn test_read_mount_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mounts");
    std::fs::write(&path, "/dev/block/vold/179:1 /storage/sdcard1 vfat rw 0 0\n").unwrap();
    assert!(read_mount_table(&path).starts_with("/dev/block/vold/179:1"));
}
