//! Record decoders
//!
//! The scan phases only see the [`RecordDecoder`] contract. [`HeaderDecoder`]
//! is the built-in implementation:
//! - Clip info: ProgramInfo stream list
//! - Playlists: MVC base-view flag, PlayItem clips and STN streams
//! - Stream files: BDAV framing probe, streams taken from the playlists
//!
//! No decoder here measures bitrates or durations.

pub mod clpi;
pub mod m2ts;
pub mod mpls;
pub(crate) mod reader;

use crate::catalog::Table;
use crate::error::{BdError, Result};
use crate::records::{FrameRate, PlaylistFile, StreamClip, StreamClipFile, StreamFile, StreamType, TsStream};

use reader::PayloadReader;

/// The per-record scan operations driven by [`crate::BdRom::scan`]
pub trait RecordDecoder {
    /// Fill in the streams of a clip-info record
    fn scan_clip(&mut self, clip: &mut StreamClipFile) -> Result<()>;

    /// Fill in the clip references and streams of a playlist, resolving
    /// clips against the stream file and clip tables
    fn scan_playlist(
        &mut self,
        playlist: &mut PlaylistFile,
        stream_files: &Table<StreamFile>,
        stream_clips: &Table<StreamClipFile>,
    ) -> Result<()>;

    /// Fill in a stream file given the playlists that play it
    fn scan_stream_file(&mut self, stream_file: &mut StreamFile, playlists: &[&PlaylistFile]) -> Result<()>;
}

/// Decoder reading the on-disc headers of each record
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDecoder;

impl RecordDecoder for HeaderDecoder {
    fn scan_clip(&mut self, clip: &mut StreamClipFile) -> Result<()> {
        let data = std::fs::read(&clip.path)?;
        clip.streams = clpi::parse_clip_info(&clip.name, &data)?;
        clip.scanned = true;
        Ok(())
    }

    fn scan_playlist(
        &mut self,
        playlist: &mut PlaylistFile,
        stream_files: &Table<StreamFile>,
        stream_clips: &Table<StreamClipFile>,
    ) -> Result<()> {
        let data = std::fs::read(&playlist.path)?;
        let header = mpls::parse_playlist(&playlist.name, &data)?;

        playlist.mvc_base_view_r = header.mvc_base_view_r;
        playlist.stream_clips.clear();
        playlist.streams.clear();

        for item in header.items {
            let mut clip = StreamClip::new(&item.clip_id, item.angle_index);
            clip.stream_file_present = stream_files.contains_key(&clip.name);
            if !clip.stream_file_present {
                tracing::warn!(
                    "Playlist {} references missing stream file {}",
                    playlist.name,
                    clip.name
                );
            }

            clip.streams = item.streams;
            match stream_clips.get(&clip.clip_name) {
                Some(info) => {
                    for (pid, stream) in &info.streams {
                        clip.streams.entry(*pid).or_insert_with(|| stream.clone());
                    }
                }
                None => tracing::debug!(
                    "Playlist {} references missing clip info {}",
                    playlist.name,
                    clip.clip_name
                ),
            }

            for (pid, stream) in &clip.streams {
                playlist.streams.entry(*pid).or_insert_with(|| stream.clone());
            }
            playlist.stream_clips.push(clip);
        }

        playlist.scanned = true;
        Ok(())
    }

    fn scan_stream_file(&mut self, stream_file: &mut StreamFile, playlists: &[&PlaylistFile]) -> Result<()> {
        let data = m2ts::read_probe(&stream_file.path)?;
        m2ts::check_framing(&stream_file.name, &data)?;

        stream_file.playlists = playlists.iter().map(|p| p.name.clone()).collect();
        for playlist in playlists {
            for clip in playlist
                .stream_clips
                .iter()
                .filter(|c| c.name == stream_file.name)
            {
                for (pid, stream) in &clip.streams {
                    stream_file
                        .streams
                        .entry(*pid)
                        .or_insert_with(|| stream.clone());
                }
            }
        }

        stream_file.update_derived();
        stream_file.scanned = true;
        Ok(())
    }
}

/// Header versions of BD-ROM 1.x/2.x (`0100`, `0200`) and UHD (`0300`)
pub(crate) fn check_version(file: &str, version: &str) -> Result<()> {
    match version {
        "0100" | "0200" | "0300" => Ok(()),
        other => Err(BdError::invalid(
            file,
            format!("unsupported version {:?}", other),
        )),
    }
}

/// Coding type byte, then for video the format/frame-rate byte
pub(crate) fn read_coding_info(pid: u16, info: &mut PayloadReader<'_>) -> Result<TsStream> {
    let stream_type = StreamType::from(info.u8("stream coding type")?);
    if stream_type.is_video() && info.remaining() > 0 {
        let format = info.u8("video format")?;
        return Ok(TsStream::video(
            pid,
            stream_type,
            FrameRate::from_code(format & 0x0F),
        ));
    }
    Ok(TsStream::new(pid, stream_type))
}
