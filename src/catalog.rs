//! File catalog
//!
//! Lists each well-known directory for its family's extension and keys the
//! records by uppercase file name. The uppercase extension is tried first;
//! the lowercase one only when the uppercase listing is empty, and always in
//! the same family's directory.

use std::collections::BTreeMap;

use crate::disc::dir::{DirHandle, FileEntry};
use crate::disc::paths::DiscLayout;
use crate::error::{BdError, Result};
use crate::records::{InterleavedFile, PlaylistFile, StreamClipFile, StreamFile};

/// Records keyed by uppercase file name
pub type Table<T> = BTreeMap<String, T>;

pub const PLAYLIST_EXT: &str = "MPLS";
pub const CLIP_EXT: &str = "CLPI";
pub const STREAM_EXT: &str = "M2TS";
pub const INTERLEAVED_EXT: &str = "SSIF";

/// The four file tables of a disc
#[derive(Debug, Default)]
pub struct FileCatalog {
    pub playlists: Table<PlaylistFile>,
    pub stream_clips: Table<StreamClipFile>,
    pub stream_files: Table<StreamFile>,
    pub interleaved_files: Table<InterleavedFile>,
}

impl FileCatalog {
    pub fn build(layout: &DiscLayout) -> Result<Self> {
        let mut catalog = Self::default();

        for entry in find_files(&layout.playlist, PLAYLIST_EXT)? {
            insert_unique(
                &mut catalog.playlists,
                "playlist",
                entry.key(),
                PlaylistFile::new(&entry),
            )?;
        }

        for entry in find_files(&layout.clipinf, CLIP_EXT)? {
            insert_unique(
                &mut catalog.stream_clips,
                "stream clip",
                entry.key(),
                StreamClipFile::new(&entry),
            )?;
        }

        if let Some(stream) = &layout.stream {
            for entry in find_files(stream, STREAM_EXT)? {
                insert_unique(
                    &mut catalog.stream_files,
                    "stream file",
                    entry.key(),
                    StreamFile::new(&entry),
                )?;
            }
        }

        if let Some(ssif) = &layout.ssif {
            for entry in find_files(ssif, INTERLEAVED_EXT)? {
                insert_unique(
                    &mut catalog.interleaved_files,
                    "interleaved file",
                    entry.key(),
                    InterleavedFile::new(&entry),
                )?;
            }
        }

        tracing::debug!(
            "Cataloged {} playlists, {} clips, {} stream files, {} interleaved files",
            catalog.playlists.len(),
            catalog.stream_clips.len(),
            catalog.stream_files.len(),
            catalog.interleaved_files.len()
        );

        Ok(catalog)
    }
}

/// Files of `dir` with extension `ext` in upper case, or in lower case if
/// there are none in upper case
pub fn find_files(dir: &DirHandle, ext: &str) -> Result<Vec<FileEntry>> {
    let files = dir.files_with_extension(&ext.to_uppercase())?;
    if !files.is_empty() {
        return Ok(files);
    }
    dir.files_with_extension(&ext.to_lowercase())
}

fn insert_unique<T>(table: &mut Table<T>, table_name: &'static str, key: String, value: T) -> Result<()> {
    if table.contains_key(&key) {
        return Err(BdError::DuplicateEntry {
            table: table_name,
            key,
        });
    }
    table.insert(key, value);
    Ok(())
}
