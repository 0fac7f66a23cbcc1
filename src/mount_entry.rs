use {
    crate::*,
    lazy_regex::*,
    std::collections::BTreeSet,
};

/// One line of a `/proc/mounts`-like table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    /// ex: "/dev/block/vold/179:1", "/dev/fuse"
    pub device: String,
    /// ex: "/storage/sdcard1"
    pub mount_path: String,
    /// ex: "vfat", "sdcardfs"
    pub fs_type: String,
    pub flags: BTreeSet<String>,
}

impl std::str::FromStr for MountEntry {
    type Err = Error;
    fn from_str(line: &str) -> Result<Self> {
        // only the 4 first columns are relevant, the dump and pass
        // counters (and whatever else) are ignored
        let (_, device, mount_path, fs_type, flags) = regex_captures!(
            r#"^([^\s#]\S*)\s+(\S+)\s+(\S+)\s+(\S+)"#,
            line.trim_start()
        )
        .ok_or_else(|| Error::UnexpectedFormat {
            line: line.to_string(),
        })?;
        Ok(Self {
            device: sys::decode_string(device),
            mount_path: sys::decode_string(mount_path),
            fs_type: fs_type.to_string(),
            flags: flags
                .split(',')
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

impl MountEntry {
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
    pub fn is_read_only(&self) -> bool {
        self.has_flag("ro")
    }
}

/// parse all the well formed lines of a mount table, in order.
///
/// Lines not looking like mount entries (blank ones, comments,
/// truncated ones) are skipped without notice.
pub fn parse_mount_table(text: &str) -> impl Iterator<Item = MountEntry> + '_ {
    text.lines().filter_map(|line| line.parse().ok())
}

#[test]
fn test_from_str() {
    use std::str::FromStr;

    let me = MountEntry::from_str("/dev/block/vold/179:1 /storage/sdcard1 vfat rw,dirsync,nosuid 0 0")
        .unwrap();
    assert_eq!(me.device, "/dev/block/vold/179:1");
    assert_eq!(me.mount_path, "/storage/sdcard1");
    assert_eq!(me.fs_type, "vfat");
    assert_eq!(me.flags.len(), 3);
    assert!(me.has_flag("dirsync"));
    assert!(!me.is_read_only());

    let me = MountEntry::from_str(r"/dev/fuse /storage/USB\040DISK fuse ro,nosuid").unwrap();
    assert_eq!(me.mount_path, "/storage/USB DISK");
    assert!(me.is_read_only());

    let me = MountEntry::from_str(r"/mnt/media/USB\040DISK /storage/USB\040DISK fuse rw").unwrap();
    assert_eq!(me.device, "/mnt/media/USB DISK");

    assert!(MountEntry::from_str("rootfs / rootfs").is_err());
    assert!(MountEntry::from_str("").is_err());
    assert!(MountEntry::from_str("# /dev/sda1 /mnt/usb vfat rw").is_err());
}

#[test]
fn test_parse_mount_table() {
    let text = "\
rootfs / rootfs ro,seclabel,relatime 0 0
tmpfs /dev tmpfs rw,seclabel,nosuid,relatime,mode=755 0 0
garbage

/dev/block/vold/179:1 /storage/sdcard1 vfat rw,dirsync 0 0
";
    let entries: Vec<MountEntry> = parse_mount_table(text).collect();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].mount_path, "/");
    assert_eq!(entries[2].device, "/dev/block/vold/179:1");
}
