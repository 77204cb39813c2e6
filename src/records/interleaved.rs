use std::path::PathBuf;

use crate::disc::dir::FileEntry;

/// A `.ssif` file interleaving the base and dependent view stream files of a
/// stereoscopic title. Never scanned on its own.
#[derive(Debug, Clone)]
pub struct InterleavedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: Option<u64>,
}

impl InterleavedFile {
    pub fn new(entry: &FileEntry) -> Self {
        Self {
            name: entry.key(),
            path: entry.path.clone(),
            size: entry.size,
        }
    }
}
