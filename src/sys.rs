use {
    lazy_regex::*,
    std::{
        fs,
        io,
        path::Path,
    },
};

/// read a system file into a string.
///
/// Mount tables don't escape non-ASCII bytes, so invalid UTF-8
/// is replaced rather than failing the whole read
pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let bytes = fs::read(path.as_ref())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// tell whether the path, taken relative to `root`, is an existing directory
pub fn is_dir_under<R: AsRef<Path>, P: AsRef<Path>>(root: R, path: P) -> bool {
    let path = path.as_ref();
    let relative = path.strip_prefix("/").unwrap_or(path);
    root.as_ref().join(relative).is_dir()
}

/// decode ascii-octal encoded chars.
/// Mount tables encode some chars, for example
/// `/storage/USB DISK` is present as `/storage/USB\040DISK`
pub fn decode_string<S: AsRef<str>>(s: S) -> String {
    regex_replace_all!(r#"\\([0-7]{3})"#, s.as_ref(), |whole: &str, n: &str| {
        u8::from_str_radix(n, 8)
            .map(|b| (b as char).to_string())
            .unwrap_or_else(|_| whole.to_string())
    })
    .to_string()
}

#[test]
fn test_decode_string() {
    assert_eq!(decode_string(r"/storage/USB\040DISK"), "/storage/USB DISK");
    assert_eq!(decode_string("/storage/sdcard1"), "/storage/sdcard1");
}

#[test]
fn test_read_file_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mounts");
    std::fs::write(&path, b"/dev/sda1 /media/caf\xe9 ext4 rw 0 0\n").unwrap();
    let content = read_file(&path).unwrap();
    assert!(content.starts_with("/dev/sda1 /media/caf"));
    assert!(content.ends_with("ext4 rw 0 0\n"));
}

#[test]
fn test_is_dir_under() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("storage/sdcard1")).unwrap();
    assert!(is_dir_under(root.path(), "/storage/sdcard1"));
    assert!(is_dir_under(root.path(), "/storage/sdcard1/"));
    assert!(!is_dir_under(root.path(), "/storage/usb1"));
}
