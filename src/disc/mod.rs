//! Disc discovery
//!
//! This module builds a `BdRom` from a directory:
//! - Locating BDMV and its well-known children
//! - Classifying disc features from marker files and the index header
//! - Volume label, title and size accounting
//! - Cataloging the playlist, clip, stream and interleaved files

pub mod dir;
pub mod features;
pub mod paths;
pub mod volume;

use std::path::Path;

use crate::catalog::{FileCatalog, Table};
use crate::config::ScanConfig;
use crate::error::Result;
use crate::records::{InterleavedFile, PlaylistFile, StreamClipFile, StreamFile};

pub use dir::{DirHandle, FileEntry};
pub use features::DiscFeatures;
pub use paths::DiscLayout;
pub use volume::{platform_label_source, NoVolumeLabel, VolumeLabelSource};

/// A Blu-ray disc tree: its structure, feature flags and file tables.
///
/// Built by [`BdRom::open`]; filled in by [`BdRom::scan`].
#[derive(Debug)]
pub struct BdRom {
    pub layout: DiscLayout,
    pub volume_label: String,
    pub disc_title: Option<String>,
    /// Bytes below the disc root, interleaved files excluded
    pub size: u64,
    pub features: DiscFeatures,
    /// Set by the post-scan pass when any playlist has 25 or 50 fps video
    pub is_50hz: bool,
    pub playlists: Table<PlaylistFile>,
    pub stream_clips: Table<StreamClipFile>,
    pub stream_files: Table<StreamFile>,
    pub interleaved_files: Table<InterleavedFile>,
}

impl BdRom {
    /// Discover the disc around `path` using the platform volume label lookup
    pub fn open<P: AsRef<Path>>(path: P, config: &ScanConfig) -> Result<Self> {
        if config.read_volume_label {
            Self::open_with_label_source(path, config, platform_label_source().as_ref())
        } else {
            Self::open_with_label_source(path, config, &NoVolumeLabel)
        }
    }

    /// Discover the disc around `path` with an explicit label source
    pub fn open_with_label_source<P: AsRef<Path>>(
        path: P,
        config: &ScanConfig,
        labels: &dyn VolumeLabelSource,
    ) -> Result<Self> {
        let layout = DiscLayout::resolve(path.as_ref(), config.search_depth)?;

        let volume_label = volume::resolve_volume_label(labels, &layout.root);
        let size = features::directory_size(layout.root.path());
        let disc_title = layout.meta.as_ref().and_then(features::read_disc_title);
        let features = DiscFeatures::classify(&layout);

        let catalog = FileCatalog::build(&layout)?;

        tracing::info!(
            "Opened disc {:?} (label={}, size={}, playlists={}, clips={}, streams={}, interleaved={})",
            layout.root.path(),
            volume_label,
            size,
            catalog.playlists.len(),
            catalog.stream_clips.len(),
            catalog.stream_files.len(),
            catalog.interleaved_files.len()
        );

        Ok(Self {
            layout,
            volume_label,
            disc_title,
            size,
            features,
            is_50hz: false,
            playlists: catalog.playlists,
            stream_clips: catalog.stream_clips,
            stream_files: catalog.stream_files,
            interleaved_files: catalog.interleaved_files,
        })
    }

    pub fn root(&self) -> &DirHandle {
        &self.layout.root
    }

    pub fn bdmv(&self) -> &DirHandle {
        &self.layout.bdmv
    }
}
