//! Clip-info records

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::stream::TsStream;
use crate::disc::dir::FileEntry;

/// A `.clpi` file and the streams its program info declares
#[derive(Debug, Clone)]
pub struct StreamClipFile {
    pub name: String,
    pub path: PathBuf,
    pub size: Option<u64>,
    /// Streams keyed by PID
    pub streams: BTreeMap<u16, TsStream>,
    pub scanned: bool,
}

impl StreamClipFile {
    pub fn new(entry: &FileEntry) -> Self {
        Self {
            name: entry.key(),
            path: entry.path.clone(),
            size: entry.size,
            streams: BTreeMap::new(),
            scanned: false,
        }
    }
}
