use crate::*;

/// Builds the list of storage volumes: the platform's default
/// volume first, then the external volumes found in the mount table
pub struct StorageListBuilder {
    options: ScanOptions,
    default_volume: Box<dyn DefaultVolumeSource + Send + Sync>,
    labels: Box<dyn LabelSource + Send + Sync>,
    policy: Box<dyn MountPointPolicy + Send + Sync>,
}

impl Default for StorageListBuilder {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl StorageListBuilder {
    /// a builder without default volume, with english labels,
    /// accepting all valid mount points
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            default_volume: Box::new(NoDefaultVolume),
            labels: Box::new(EnglishLabels),
            policy: Box::new(AcceptAll),
        }
    }
    pub fn default_volume<S>(
        mut self,
        source: S,
    ) -> Self
    where
        S: DefaultVolumeSource + Send + Sync + 'static,
    {
        self.default_volume = Box::new(source);
        self
    }
    pub fn labels<L>(
        mut self,
        labels: L,
    ) -> Self
    where
        L: LabelSource + Send + Sync + 'static,
    {
        self.labels = Box::new(labels);
        self
    }
    pub fn policy<P>(
        mut self,
        policy: P,
    ) -> Self
    where
        P: MountPointPolicy + Send + Sync + 'static,
    {
        self.policy = Box::new(policy);
        self
    }
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// build the list. This never fails: when nothing can be
    /// read, the list is just shorter
    pub fn build(&self) -> Vec<VolumeInfo> {
        let mut volumes = Vec::new();
        let mut ext_counter = 1;
        if let Some(volume) = self.default_volume_info(ext_counter) {
            if volume.is_external {
                ext_counter += 1;
            }
            volumes.push(volume);
        }
        let mount_table = read_mount_table(&self.options.mounts_path);
        self.add_mounted_volumes(&mount_table, &mut volumes, ext_counter);
        volumes
    }

    fn external_label(&self, counter: usize) -> String {
        format!("{} {}", self.labels.external_storage(), counter)
    }

    /// the default volume, when the platform has one mounted
    fn default_volume_info(&self, ext_counter: usize) -> Option<VolumeInfo> {
        let state = self.default_volume.state();
        if !state.is_mounted() {
            return None;
        }
        let path = self.default_volume.default_path();
        if path.as_os_str().is_empty() {
            return None;
        }
        let is_external = self.default_volume.capabilities().is_external();
        let label = if is_external {
            self.external_label(ext_counter)
        } else {
            self.labels.built_in_memory_card()
        };
        Some(VolumeInfo {
            label,
            path: path.to_string_lossy().to_string(),
            is_external,
            is_read_only: state == StorageState::MountedReadOnly,
        })
    }

    /// add the external volumes of the mount table which aren't
    /// yet in the list, numbering them from `ext_counter`
    fn add_mounted_volumes(
        &self,
        mount_table: &str,
        volumes: &mut Vec<VolumeInfo>,
        mut ext_counter: usize,
    ) {
        for entry in parse_mount_table(mount_table) {
            if !is_relevant(&entry) || is_listed(volumes, &entry) {
                continue;
            }
            if !is_external_candidate(&entry) {
                continue;
            }
            let volume = VolumeInfo {
                label: self.external_label(ext_counter),
                is_read_only: entry.is_read_only(),
                path: entry.mount_path,
                is_external: true,
            };
            if is_valid_mount_point(&volume, &self.options) && self.policy.accepts(&volume) {
                log::debug!("found external volume {:?} on {}", volume.path, entry.device);
                volumes.push(volume);
                ext_counter += 1;
            }
        }
    }
}

#[cfg(test)]
struct Sandbox {
    dir: tempfile::TempDir,
}

#[cfg(test)]
impl Sandbox {
    /// a fake root with the given mount points, and a mount table
    fn new<T: AsRef<[u8]>>(mount_points: &[&str], mount_table: T) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for mp in mount_points {
            std::fs::create_dir_all(dir.path().join(mp.trim_start_matches('/'))).unwrap();
        }
        std::fs::write(dir.path().join("mounts"), mount_table).unwrap();
        Self { dir }
    }
    fn options(&self) -> ScanOptions {
        ScanOptions::default()
            .root(self.dir.path())
            .mounts_path(self.dir.path().join("mounts"))
    }
    fn builder(&self) -> StorageListBuilder {
        StorageListBuilder::new(self.options())
    }
}

#[cfg(test)]
fn external(label: &str, path: &str, is_read_only: bool) -> VolumeInfo {
    VolumeInfo {
        label: label.to_string(),
        path: path.to_string(),
        is_external: true,
        is_read_only,
    }
}

#[test]
fn test_single_sd_card() {
    let sandbox = Sandbox::new(
        &["/storage/sdcard1"],
        "/dev/block/vold/179:1 /storage/sdcard1 vfat rw,dirsync 0 0\n",
    );
    assert_eq!(
        sandbox.builder().build(),
        vec![external("External storage 1", "/storage/sdcard1", false)],
    );
}

#[test]
fn test_media_rw_alias() {
    let sandbox = Sandbox::new(
        &["/storage/sdcard1", "/mnt/media_rw/sdcard1"],
        "\
/dev/block/vold/179:1 /mnt/media_rw/sdcard1 vfat rw,dirsync 0 0
/dev/block/vold/179:1 /storage/sdcard1 vfat rw,dirsync 0 0
/mnt/media_rw/sdcard1 /storage/sdcard1 sdcardfs rw 0 0
",
    );
    // the staging path is refused, its public alias is kept once
    assert_eq!(
        sandbox.builder().build(),
        vec![external("External storage 1", "/storage/sdcard1", false)],
    );

    let sandbox = Sandbox::new(
        &["/storage/sdcard1", "/mnt/media_rw/sdcard1"],
        "\
/dev/block/vold/179:1 /storage/sdcard1 vfat rw,dirsync 0 0
/dev/block/vold/179:1 /mnt/media_rw/sdcard1 vfat rw,dirsync 0 0
",
    );
    assert_eq!(sandbox.builder().build().len(), 1);
}

#[test]
fn test_unreadable_mount_table() {
    let dir = tempfile::tempdir().unwrap();
    let options = ScanOptions::default().mounts_path(dir.path().join("no-such-file"));
    let builder = StorageListBuilder::new(options)
        .default_volume(FixedDefaultVolume::built_in("/storage/emulated/0"));
    assert_eq!(
        builder.build(),
        vec![VolumeInfo {
            label: "Built-in memory card".to_string(),
            path: "/storage/emulated/0".to_string(),
            is_external: false,
            is_read_only: false,
        }],
    );
}

#[test]
fn test_external_default_volume() {
    let sandbox = Sandbox::new(
        &["/storage/usb1"],
        "/dev/block/vold/8:1 /storage/usb1 vfat ro,nosuid 0 0\n",
    );
    let builder = sandbox.builder().default_volume(FixedDefaultVolume {
        state: StorageState::Mounted,
        path: "/mnt/sdcard".into(),
        capabilities: Capabilities {
            removable: true,
            emulated: false,
            api_tier: ApiTier::EmulatedQuery,
        },
    });
    assert_eq!(
        builder.build(),
        vec![
            external("External storage 1", "/mnt/sdcard", false),
            external("External storage 2", "/storage/usb1", true),
        ],
    );
}

#[test]
fn test_unmounted_default_volume() {
    let sandbox = Sandbox::new(&[], "");
    let builder = sandbox.builder().default_volume(FixedDefaultVolume {
        state: StorageState::Other("checking".to_string()),
        path: "/storage/emulated/0".into(),
        capabilities: Capabilities::default(),
    });
    assert!(builder.build().is_empty());
}

#[test]
fn test_noise_is_filtered() {
    let table = "\
rootfs / rootfs ro,seclabel,relatime 0 0
proc /proc proc rw,relatime 0 0
/dev/block/dm-0 /system ext4 ro,seclabel,relatime 0 0
tmpfs /mnt tmpfs rw,seclabel,nosuid,nodev,noexec,relatime 0 0
tmpfs /mnt/secure tmpfs rw,seclabel,relatime 0 0
/dev/block/vold/179:1 /mnt/secure/asec vfat rw,dirsync 0 0
/dev/block/vold/179:2 /mnt/obb/game vfat ro 0 0
/dev/mapper/vold-1 /mnt/usb vfat rw 0 0
/dev/fuse /storage/emulated fuse rw,nosuid 0 0
/dev/fuse /storage/emulated/0 fuse rw,nosuid 0 0
/dev/block/vold/179:3 /storage/tmp tmpfs rw 0 0
/dev/block/vold/179:4 /storage/gone vfat rw 0 0
/dev/fuse /storage/1234-ABCD fuse rw,nosuid 0 0
";
    let sandbox = Sandbox::new(
        &[
            "/mnt/secure/asec",
            "/mnt/obb/game",
            "/mnt/usb",
            "/storage/emulated/0",
            "/storage/tmp",
            "/storage/1234-ABCD",
        ],
        table,
    );
    assert_eq!(
        sandbox.builder().build(),
        vec![external("External storage 1", "/storage/1234-ABCD", false)],
    );
}

#[test]
fn test_policy_veto() {
    let sandbox = Sandbox::new(
        &["/storage/sdcard1", "/storage/usb1"],
        "\
/dev/block/vold/179:1 /storage/sdcard1 vfat rw 0 0
/dev/block/vold/8:1 /storage/usb1 vfat rw 0 0
",
    );
    let builder = sandbox
        .builder()
        .policy(|v: &VolumeInfo| !v.path.ends_with("sdcard1"));
    // a refused volume doesn't consume a number
    assert_eq!(
        builder.build(),
        vec![external("External storage 1", "/storage/usb1", false)],
    );
}

#[test]
fn test_labels_are_sequential_and_paths_unique() {
    let table = "\
/dev/block/vold/179:1 /storage/sdcard1 vfat rw 0 0
/dev/block/vold/179:1 /storage/sdcard1/ vfat rw 0 0
/dev/block/vold/8:1 /mnt/media_rw/usb1 vfat rw 0 0
/dev/block/vold/8:1 /storage/usb1 vfat rw 0 0
/dev/fuse /storage/usb1 fuse rw 0 0
/dev/block/vold/8:17 /mnt/usb2 vfat ro 0 0
";
    let sandbox = Sandbox::new(
        &["/storage/sdcard1", "/mnt/media_rw/usb1", "/storage/usb1", "/mnt/usb2"],
        table,
    );
    let builder = sandbox.builder();
    let volumes = builder.build();
    assert_eq!(
        volumes,
        vec![
            external("External storage 1", "/storage/sdcard1", false),
            external("External storage 2", "/storage/usb1", false),
            external("External storage 3", "/mnt/usb2", true),
        ],
    );
    for (i, a) in volumes.iter().enumerate() {
        for b in &volumes[i + 1..] {
            assert!(!same_volume(&a.path, &b.path));
        }
    }
    assert_eq!(builder.build(), volumes);
}

#[test]
fn test_custom_labels() {
    struct French;
    impl LabelSource for French {
        fn built_in_memory_card(&self) -> String {
            "Mémoire interne".to_string()
        }
        fn external_storage(&self) -> String {
            "Stockage externe".to_string()
        }
    }
    let sandbox = Sandbox::new(
        &["/storage/sdcard1"],
        "/dev/block/vold/179:1 /storage/sdcard1 vfat rw 0 0\n",
    );
    let volumes = sandbox
        .builder()
        .labels(French)
        .default_volume(FixedDefaultVolume::built_in("/data/media/0"))
        .build();
    assert_eq!(volumes[0].label, "Mémoire interne");
    assert_eq!(volumes[1].label, "Stockage externe 1");
}

#[test]
fn test_non_utf8_mount_table() {
    let sandbox = Sandbox::new(
        &["/storage/sdcard1"],
        &b"/dev/sda1 /media/caf\xe9 ext4 rw 0 0\n/dev/block/vold/179:1 /storage/sdcard1 vfat rw 0 0\n"[..],
    );
    assert_eq!(
        sandbox.builder().build(),
        vec![external("External storage 1", "/storage/sdcard1", false)],
    );
}

#[test]
fn test_escaped_device_alias() {
    let sandbox = Sandbox::new(
        &["/mnt/media/USB DISK", "/storage/USB DISK"],
        r"/dev/block/vold/8:1 /mnt/media/USB\040DISK vfat rw 0 0
/mnt/media/USB\040DISK /storage/USB\040DISK fuse rw 0 0
",
    );
    assert_eq!(
        sandbox.builder().build(),
        vec![external("External storage 1", "/mnt/media/USB DISK", false)],
    );
}

#[test]
fn test_read_only_default_volume() {
    let sandbox = Sandbox::new(&[], "");
    let builder = sandbox.builder().default_volume(FixedDefaultVolume {
        state: StorageState::MountedReadOnly,
        path: "/storage/emulated/0".into(),
        capabilities: Capabilities::default(),
    });
    assert_eq!(
        builder.build(),
        vec![VolumeInfo {
            label: "Built-in memory card".to_string(),
            path: "/storage/emulated/0".to_string(),
            is_external: false,
            is_read_only: true,
        }],
    );
}
