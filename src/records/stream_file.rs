//! Elementary stream file records

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::stream::{FrameRate, StreamType, TsStream};
use crate::disc::dir::FileEntry;

/// A `.m2ts` file
#[derive(Debug, Clone)]
pub struct StreamFile {
    pub name: String,
    pub path: PathBuf,
    /// Size at catalog time; `None` when it could not be read
    pub size: Option<u64>,
    /// Key of the paired interleaved file in the interleaved table
    pub interleaved_file: Option<String>,
    /// Streams keyed by PID
    pub streams: BTreeMap<u16, TsStream>,
    /// Names of the playlists that reference this file
    pub playlists: Vec<String>,
    /// Frame rate of the first video stream
    pub frame_rate: FrameRate,
    /// Carries an MVC dependent-view stream
    pub has_mvc: bool,
    pub scanned: bool,
}

impl StreamFile {
    pub fn new(entry: &FileEntry) -> Self {
        Self::with_size(entry.key(), entry.path.clone(), entry.size)
    }

    pub fn with_size(name: String, path: PathBuf, size: Option<u64>) -> Self {
        Self {
            name,
            path,
            size,
            interleaved_file: None,
            streams: BTreeMap::new(),
            playlists: Vec::new(),
            frame_rate: FrameRate::Unknown,
            has_mvc: false,
            scanned: false,
        }
    }

    /// File name without its extension (`00001` for `00001.M2TS`)
    pub fn base_name(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((base, _)) => base,
            None => &self.name,
        }
    }

    /// Catalog key of the interleaved file that would pair with this one
    pub fn interleaved_key(&self) -> String {
        format!("{}.SSIF", self.base_name().to_uppercase())
    }

    /// Recompute the derived fields from `streams`
    pub fn update_derived(&mut self) {
        self.frame_rate = self
            .streams
            .values()
            .find(|s| s.stream_type.is_video())
            .map(|s| s.frame_rate)
            .unwrap_or_default();
        self.has_mvc = self
            .streams
            .values()
            .any(|s| s.stream_type == StreamType::MvcVideo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleaved_key() {
        let file = StreamFile::with_size("00001.M2TS".to_string(), PathBuf::new(), Some(1));
        assert_eq!(file.base_name(), "00001");
        assert_eq!(file.interleaved_key(), "00001.SSIF");
    }

    #[test]
    fn test_update_derived() {
        let mut file = StreamFile::with_size("00001.M2TS".to_string(), PathBuf::new(), None);
        file.streams
            .insert(0x1100, TsStream::new(0x1100, StreamType::Ac3));
        file.streams.insert(
            0x1012,
            TsStream::video(0x1012, StreamType::MvcVideo, FrameRate::Fps23_976),
        );
        file.streams.insert(
            0x1011,
            TsStream::video(0x1011, StreamType::AvcVideo, FrameRate::Fps24),
        );
        file.update_derived();
        assert_eq!(file.frame_rate, FrameRate::Fps24);
        assert!(file.has_mvc);
    }
}
