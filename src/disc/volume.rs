//! Volume label lookup
//!
//! The label is cosmetic. Every failure path ends in the disc root's
//! directory name.

use std::path::Path;

use super::dir::DirHandle;

/// Platform capability returning the label of the volume holding a path
pub trait VolumeLabelSource {
    fn volume_label(&self, path: &Path) -> Option<String>;
}

/// For platforms without a lookup, and for callers that opt out
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVolumeLabel;

impl VolumeLabelSource for NoVolumeLabel {
    fn volume_label(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// Linux lookup: mount source from `/proc/self/mountinfo`, label from the
/// udev links in `/dev/disk/by-label`. Only a disc root that is itself a
/// mount point has a label.
#[cfg(target_os = "linux")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MountInfoLabel;

#[cfg(target_os = "linux")]
impl VolumeLabelSource for MountInfoLabel {
    fn volume_label(&self, path: &Path) -> Option<String> {
        let mountinfo = std::fs::read_to_string("/proc/self/mountinfo").ok()?;
        let path = path.canonicalize().ok()?;
        let source = mount_source_for(&mountinfo, &path)?;
        let device = Path::new(&source).canonicalize().ok()?;

        std::fs::read_dir("/dev/disk/by-label")
            .ok()?
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.path().canonicalize().ok().as_deref() == Some(device.as_path()))
            .and_then(|entry| entry.file_name().to_str().map(unescape_udev))
    }
}

/// The label source for the current target
pub fn platform_label_source() -> Box<dyn VolumeLabelSource> {
    #[cfg(target_os = "linux")]
    {
        Box::new(MountInfoLabel)
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(NoVolumeLabel)
    }
}

/// Label of the volume holding `root`, or the directory's own name
pub fn resolve_volume_label(source: &dyn VolumeLabelSource, root: &DirHandle) -> String {
    match source.volume_label(root.path()) {
        Some(label) if !label.is_empty() => label,
        _ => {
            tracing::debug!("No volume label for {:?}, using directory name", root.path());
            root.name().to_string()
        }
    }
}

/// Mount source of the file system mounted exactly at `path`. A directory
/// below a mount point has no volume of its own and yields `None`.
pub fn mount_source_for(mountinfo: &str, path: &Path) -> Option<String> {
    mountinfo
        .lines()
        .filter_map(|line| {
            let (left, right) = line.split_once(" - ")?;
            let mount_point = unescape_mountinfo(left.split_whitespace().nth(4)?);
            let source = right.split_whitespace().nth(1)?.to_string();
            Some((mount_point, source))
        })
        .filter(|(mount_point, _)| Path::new(mount_point) == path)
        .last()
        .map(|(_, source)| source)
}

/// mountinfo escapes space, tab, newline and backslash as `\ooo`
fn unescape_mountinfo(field: &str) -> String {
    unescape_with(field, |chars| {
        let digits: String = chars.by_ref().take(3).collect();
        u8::from_str_radix(&digits, 8).ok()
    })
}

/// udev escapes unsafe label characters as `\xHH`
fn unescape_udev(name: &str) -> String {
    unescape_with(name, |chars| {
        if chars.next() != Some('x') {
            return None;
        }
        let digits: String = chars.by_ref().take(2).collect();
        u8::from_str_radix(&digits, 16).ok()
    })
}

fn unescape_with<F>(text: &str, mut decode: F) -> String
where
    F: FnMut(&mut std::str::Chars<'_>) -> Option<u8>,
{
    let mut bytes = Vec::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let mut lookahead = chars.clone();
            if let Some(byte) = decode(&mut lookahead) {
                bytes.push(byte);
                chars = lookahead;
                continue;
            }
        }
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUNTINFO: &str = "\
22 1 8:2 / / rw,relatime shared:1 - ext4 /dev/sda2 rw
35 22 11:0 / /media/user/MY\\040DISC ro,nosuid shared:20 - udf /dev/sr0 ro
36 22 8:3 / /media/user rw shared:21 - ext4 /dev/sda3 rw
";

    struct FixedLabel(&'static str);

    impl VolumeLabelSource for FixedLabel {
        fn volume_label(&self, _path: &Path) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn test_mount_source_of_mount_point() {
        assert_eq!(
            mount_source_for(MOUNTINFO, Path::new("/media/user/MY DISC")).as_deref(),
            Some("/dev/sr0")
        );
        assert_eq!(
            mount_source_for(MOUNTINFO, Path::new("/media/user")).as_deref(),
            Some("/dev/sda3")
        );
        assert_eq!(mount_source_for(MOUNTINFO, Path::new("/")).as_deref(), Some("/dev/sda2"));
    }

    #[test]
    fn test_root_below_mount_point_has_no_source() {
        let mountinfo = "\
22 1 8:2 / / rw,relatime shared:1 - ext4 /dev/sda2 rw
40 22 8:17 / /data rw,relatime shared:30 - ext4 /dev/sdb1 rw
";
        assert_eq!(mount_source_for(mountinfo, Path::new("/data/rips/MY_MOVIE")), None);
        assert_eq!(mount_source_for(MOUNTINFO, Path::new("/media/user/MY DISC/BDMV")), None);
        assert_eq!(mount_source_for(MOUNTINFO, Path::new("/media/user/rips")), None);
        assert_eq!(mount_source_for(mountinfo, Path::new("/data")).as_deref(), Some("/dev/sdb1"));

        let root = DirHandle::new("/data/rips/MY_MOVIE");
        assert_eq!(resolve_volume_label(&NoVolumeLabel, &root), "MY_MOVIE");
    }

    #[test]
    fn test_unescape_udev() {
        assert_eq!(unescape_udev("MY\\x20MOVIE"), "MY MOVIE");
        assert_eq!(unescape_udev("PLAIN"), "PLAIN");
        assert_eq!(unescape_udev("BAD\\q"), "BAD\\q");
    }

    #[test]
    fn test_resolve_falls_back_to_directory_name() {
        let root = DirHandle::new("/discs/MOVIE_2010");
        assert_eq!(resolve_volume_label(&NoVolumeLabel, &root), "MOVIE_2010");
        assert_eq!(resolve_volume_label(&FixedLabel(""), &root), "MOVIE_2010");
        assert_eq!(resolve_volume_label(&FixedLabel("LABEL"), &root), "LABEL");
    }
}
