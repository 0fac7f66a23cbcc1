use {
    crate::*,
    std::sync::{Arc, Mutex},
};

/// The storage volumes of the device, built on first access
/// and kept until reset.
///
/// Build it once and share it by reference: concurrent callers
/// never trigger more than one build.
pub struct StorageList {
    builder: StorageListBuilder,
    volumes: Mutex<Option<Arc<[VolumeInfo]>>>,
}

impl StorageList {
    pub fn new(builder: StorageListBuilder) -> Self {
        Self {
            builder,
            volumes: Mutex::new(None),
        }
    }

    /// the list of volumes, built if needed
    pub fn get(&self) -> Arc<[VolumeInfo]> {
        // a panicking builder can't leave a half built list
        // behind, so a poisoned lock is still usable
        let mut volumes = self.volumes.lock().unwrap_or_else(|e| e.into_inner());
        volumes
            .get_or_insert_with(|| {
                let list: Arc<[VolumeInfo]> = self.builder.build().into();
                log::debug!("{} storage volume(s) found", list.len());
                list
            })
            .clone()
    }

    /// forget the list: the next access will rebuild it, for
    /// example after the platform signaled a storage change
    pub fn reset(&self) {
        let mut volumes = self.volumes.lock().unwrap_or_else(|e| e.into_inner());
        *volumes = None;
    }

    /// the built-in volume, or the first one when all are external
    pub fn default_volume(&self) -> Option<VolumeInfo> {
        let volumes = self.get();
        volumes
            .iter()
            .find(|v| !v.is_external)
            .or_else(|| volumes.first())
            .cloned()
    }
}

impl Default for StorageList {
    fn default() -> Self {
        Self::new(StorageListBuilder::default())
    }
}

#[test]
fn test_cache_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    let mounts = dir.path().join("mounts");
    std::fs::create_dir_all(dir.path().join("storage/sdcard1")).unwrap();
    std::fs::create_dir_all(dir.path().join("storage/usb1")).unwrap();
    std::fs::write(&mounts, "/dev/block/vold/179:1 /storage/sdcard1 vfat rw 0 0\n").unwrap();
    let options = ScanOptions::default().root(dir.path()).mounts_path(&mounts);
    let list = StorageList::new(StorageListBuilder::new(options));

    let first = list.get();
    assert_eq!(first.len(), 1);

    // the table changes, but the list is cached
    std::fs::write(
        &mounts,
        "/dev/block/vold/179:1 /storage/sdcard1 vfat rw 0 0\n/dev/fuse /storage/usb1 fuse ro 0 0\n",
    )
    .unwrap();
    assert!(Arc::ptr_eq(&first, &list.get()));

    list.reset();
    let second = list.get();
    assert_eq!(second.len(), 2);
    assert_eq!(second[1].label, "External storage 2");
    assert!(second[1].is_read_only);
}

#[test]
fn test_default_volume() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("storage/sdcard1")).unwrap();
    std::fs::write(
        dir.path().join("mounts"),
        "/dev/block/vold/179:1 /storage/sdcard1 vfat rw 0 0\n",
    )
    .unwrap();
    let options = ScanOptions::default()
        .root(dir.path())
        .mounts_path(dir.path().join("mounts"));

    let list = StorageList::new(StorageListBuilder::new(options.clone()));
    assert_eq!(list.default_volume().unwrap().path, "/storage/sdcard1");

    let list = StorageList::new(
        StorageListBuilder::new(options)
            .default_volume(FixedDefaultVolume::built_in("/storage/emulated/0")),
    );
    let default_volume = list.default_volume().unwrap();
    assert_eq!(default_volume.path, "/storage/emulated/0");
    assert!(!default_volume.is_external);

    let empty = StorageList::new(StorageListBuilder::new(
        ScanOptions::default().mounts_path(dir.path().join("none")),
    ));
    assert!(empty.default_volume().is_none());
}

#[test]
fn test_concurrent_access() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("storage/sdcard1")).unwrap();
    std::fs::write(
        dir.path().join("mounts"),
        "/dev/block/vold/179:1 /storage/sdcard1 vfat rw 0 0\n",
    )
    .unwrap();
    let options = ScanOptions::default()
        .root(dir.path())
        .mounts_path(dir.path().join("mounts"));
    let list = StorageList::new(StorageListBuilder::new(options));
    let lists: Vec<Arc<[VolumeInfo]>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| list.get())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for l in &lists {
        assert!(Arc::ptr_eq(l, &lists[0]));
    }
}
