//! Catalog records
//!
//! One record type per file family of the disc:
//! - Stream clips (`CLIPINF/*.clpi`)
//! - Playlists (`PLAYLIST/*.mpls`)
//! - Stream files (`STREAM/*.m2ts`)
//! - Interleaved files (`STREAM/SSIF/*.ssif`)
//!
//! Records are created empty by the catalog and filled in by their own scan.

pub mod clip;
pub mod interleaved;
pub mod playlist;
pub mod stream;
pub mod stream_file;

pub use clip::StreamClipFile;
pub use interleaved::InterleavedFile;
pub use playlist::{PlaylistFile, StreamClip};
pub use stream::{FrameRate, StreamType, TsStream, VideoStream};
pub use stream_file::StreamFile;

/// A catalog record that has a scan of its own
pub trait ScanRecord {
    /// Uppercase file name, also the catalog key
    fn name(&self) -> &str;
}

impl ScanRecord for StreamClipFile {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ScanRecord for PlaylistFile {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ScanRecord for StreamFile {
    fn name(&self) -> &str {
        &self.name
    }
}
