//! Playlist records

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::stream::{TsStream, VideoStream};
use crate::disc::dir::FileEntry;

/// One clip reference of a playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamClip {
    /// Stream file key (`00001.M2TS`)
    pub name: String,
    /// Clip-info key (`00001.CLPI`)
    pub clip_name: String,
    /// 0 for the main path, 1.. for alternate angles
    pub angle_index: u8,
    /// Whether the stream file exists in the stream file table
    pub stream_file_present: bool,
    /// Streams this clip contributes, keyed by PID
    pub streams: BTreeMap<u16, TsStream>,
}

impl StreamClip {
    /// Build a reference from the five-character clip id of a play item
    pub fn new(clip_id: &str, angle_index: u8) -> Self {
        let id = clip_id.to_uppercase();
        Self {
            name: format!("{}.M2TS", id),
            clip_name: format!("{}.CLPI", id),
            angle_index,
            stream_file_present: false,
            streams: BTreeMap::new(),
        }
    }
}

/// A `.mpls` file
#[derive(Debug, Clone)]
pub struct PlaylistFile {
    pub name: String,
    pub path: PathBuf,
    pub size: Option<u64>,
    /// The base view of a stereoscopic title is the right eye
    pub mvc_base_view_r: bool,
    /// Clip references in play order
    pub stream_clips: Vec<StreamClip>,
    /// Union of the clip streams, keyed by PID
    pub streams: BTreeMap<u16, TsStream>,
    /// Filled by `initialize`
    pub video_streams: Vec<VideoStream>,
    pub scanned: bool,
}

impl PlaylistFile {
    pub fn new(entry: &FileEntry) -> Self {
        Self::named(entry.key(), entry.path.clone(), entry.size)
    }

    pub fn named(name: String, path: PathBuf, size: Option<u64>) -> Self {
        Self {
            name,
            path,
            size,
            mvc_base_view_r: false,
            stream_clips: Vec::new(),
            streams: BTreeMap::new(),
            video_streams: Vec::new(),
            scanned: false,
        }
    }

    /// Does any clip of this playlist play the given stream file
    pub fn references(&self, stream_file: &str) -> bool {
        self.stream_clips.iter().any(|c| c.name == stream_file)
    }

    /// Rebuild the derived stream lists after all scans have run.
    /// Video streams are listed in PID order with no view classification.
    pub fn initialize(&mut self) {
        for clip in &self.stream_clips {
            for (pid, stream) in &clip.streams {
                self.streams.entry(*pid).or_insert_with(|| stream.clone());
            }
        }
        self.video_streams = self
            .streams
            .values()
            .filter(|s| s.stream_type.is_video())
            .map(VideoStream::from)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::stream::{FrameRate, StreamType};

    #[test]
    fn test_stream_clip_names() {
        let clip = StreamClip::new("00042", 0);
        assert_eq!(clip.name, "00042.M2TS");
        assert_eq!(clip.clip_name, "00042.CLPI");
    }

    #[test]
    fn test_initialize_collects_video_in_pid_order() {
        let mut playlist = PlaylistFile::named("00000.MPLS".to_string(), PathBuf::new(), None);
        let mut clip = StreamClip::new("00001", 0);
        clip.streams.insert(
            0x1012,
            TsStream::video(0x1012, StreamType::MvcVideo, FrameRate::Fps24),
        );
        clip.streams
            .insert(0x1100, TsStream::new(0x1100, StreamType::DtsHdMaster));
        clip.streams.insert(
            0x1011,
            TsStream::video(0x1011, StreamType::AvcVideo, FrameRate::Fps24),
        );
        playlist.stream_clips.push(clip);

        playlist.initialize();

        assert_eq!(playlist.streams.len(), 3);
        let pids: Vec<u16> = playlist.video_streams.iter().map(|v| v.pid).collect();
        assert_eq!(pids, vec![0x1011, 0x1012]);
        assert!(playlist.video_streams.iter().all(|v| v.base_view.is_none()));
        assert!(playlist.references("00001.M2TS"));
        assert!(!playlist.references("00002.M2TS"));
    }
}
