//! Serializable snapshot of a scanned disc

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::disc::{BdRom, DiscFeatures};
use crate::error::Result;
use crate::records::{FrameRate, VideoStream};
use crate::scan::{ScanOutcome, ScanPhase, ScanReport};

#[derive(Debug, Serialize)]
pub struct DiscSummary {
    pub scanned_at: DateTime<Utc>,
    pub root: PathBuf,
    pub volume_label: String,
    pub disc_title: Option<String>,
    pub size: u64,
    pub features: DiscFeatures,
    pub is_50hz: bool,
    pub outcome: ScanOutcome,
    pub failures: Vec<FailureSummary>,
    pub stream_clip_count: usize,
    pub interleaved_file_count: usize,
    pub playlists: Vec<PlaylistSummary>,
    /// In scan order, smallest first. Key order when the scan stopped
    /// before the files were ordered.
    pub stream_files: Vec<StreamFileSummary>,
}

#[derive(Debug, Serialize)]
pub struct FailureSummary {
    pub phase: ScanPhase,
    pub file: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct PlaylistSummary {
    pub name: String,
    pub size: Option<u64>,
    pub clips: Vec<String>,
    pub video_streams: Vec<VideoStream>,
}

#[derive(Debug, Serialize)]
pub struct StreamFileSummary {
    pub name: String,
    pub size: Option<u64>,
    pub interleaved_file: Option<String>,
    pub frame_rate: FrameRate,
    pub has_mvc: bool,
    pub playlists: Vec<String>,
}

impl DiscSummary {
    pub fn new(disc: &BdRom, report: &ScanReport) -> Self {
        let playlists = disc
            .playlists
            .values()
            .map(|p| PlaylistSummary {
                name: p.name.clone(),
                size: p.size,
                clips: p.stream_clips.iter().map(|c| c.name.clone()).collect(),
                video_streams: p.video_streams.clone(),
            })
            .collect();

        let order: Vec<&String> = if report.stream_file_order.is_empty() {
            disc.stream_files.keys().collect()
        } else {
            report.stream_file_order.iter().collect()
        };
        let stream_files = order
            .into_iter()
            .filter_map(|name| disc.stream_files.get(name))
            .map(|f| StreamFileSummary {
                name: f.name.clone(),
                size: f.size,
                interleaved_file: f.interleaved_file.clone(),
                frame_rate: f.frame_rate,
                has_mvc: f.has_mvc,
                playlists: f.playlists.clone(),
            })
            .collect();

        Self {
            scanned_at: Utc::now(),
            root: disc.root().path().to_path_buf(),
            volume_label: disc.volume_label.clone(),
            disc_title: disc.disc_title.clone(),
            size: disc.size,
            features: disc.features,
            is_50hz: disc.is_50hz,
            outcome: report.outcome,
            failures: report
                .failures
                .iter()
                .map(|f| FailureSummary {
                    phase: f.phase,
                    file: f.file.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
            stream_clip_count: disc.stream_clips.len(),
            interleaved_file_count: disc.interleaved_files.len(),
            playlists,
            stream_files,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
