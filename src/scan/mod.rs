//! Scan orchestration
//!
//! [`BdRom::scan`] runs six phases in a fixed order:
//! 1. Clip scan
//! 2. Interleave link
//! 3. Stream file ordering
//! 4. Playlist scan
//! 5. Stream file scan, in the phase 3 order
//! 6. Post-scan pass (playlist initialization, 50 Hz flag, base views)
//!
//! Phases 1, 4 and 5 consult [`ScanPolicies`] on failure.

pub mod policy;

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::catalog::Table;
use crate::decode::RecordDecoder;
use crate::disc::BdRom;
use crate::error::{BdError, Result};
use crate::records::{PlaylistFile, ScanRecord, StreamFile, StreamType};

pub use policy::{ErrorHandler, ScanDecision, ScanPolicies};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    Clips,
    InterleaveLink,
    Ordering,
    Playlists,
    StreamFiles,
    PostScan,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanPhase::Clips => "clip scan",
            ScanPhase::InterleaveLink => "interleave link",
            ScanPhase::Ordering => "stream file ordering",
            ScanPhase::Playlists => "playlist scan",
            ScanPhase::StreamFiles => "stream file scan",
            ScanPhase::PostScan => "post-scan pass",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ScanOutcome {
    Completed,
    /// A policy stopped the scan; phases after `phase` did not run
    Aborted { phase: ScanPhase },
}

/// A record that failed its scan and was let through by a policy
#[derive(Debug)]
pub struct ScanFailure {
    pub phase: ScanPhase,
    pub file: String,
    pub error: BdError,
}

#[derive(Debug)]
pub struct ScanReport {
    pub outcome: ScanOutcome,
    pub failures: Vec<ScanFailure>,
    /// Stream file keys in phase 3 order
    pub stream_file_order: Vec<String>,
}

impl Default for ScanReport {
    fn default() -> Self {
        Self {
            outcome: ScanOutcome::Completed,
            failures: Vec::new(),
            stream_file_order: Vec::new(),
        }
    }
}

impl ScanReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == ScanOutcome::Completed
    }

    pub fn failed_files(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.file.as_str()).collect()
    }

    pub fn failures_in(&self, phase: ScanPhase) -> impl Iterator<Item = &ScanFailure> {
        self.failures.iter().filter(move |f| f.phase == phase)
    }

    fn aborted(mut self, phase: ScanPhase) -> Self {
        tracing::info!(
            "Scan aborted during {} with {} failed files",
            phase,
            self.failures.len()
        );
        self.outcome = ScanOutcome::Aborted { phase };
        self
    }
}

/// Ascending by size; files without a size sort last
pub fn compare_stream_files(a: &StreamFile, b: &StreamFile) -> Ordering {
    match (a.size, b.size) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Keys of `files` in [`compare_stream_files`] order, ties in key order
pub fn sort_stream_files(files: &Table<StreamFile>) -> Vec<String> {
    let mut sorted: Vec<&StreamFile> = files.values().collect();
    sorted.sort_by(|a, b| compare_stream_files(a, b));
    sorted.into_iter().map(|f| f.name.clone()).collect()
}

/// Mark the AVC and MVC streams of a stereoscopic playlist as base or
/// dependent view. Playlists with a single video stream are left alone.
pub fn classify_base_views(playlist: &mut PlaylistFile) {
    if playlist.video_streams.len() <= 1 {
        return;
    }
    let base_is_right = playlist.mvc_base_view_r;
    for video in &mut playlist.video_streams {
        match video.stream_type {
            StreamType::AvcVideo => video.base_view = Some(base_is_right),
            StreamType::MvcVideo => video.base_view = Some(!base_is_right),
            _ => {}
        }
    }
}

/// Handle a failed record scan. Without a handler the failure is returned
/// as an error; otherwise it is recorded and the handler decides.
fn record_failure<R: ScanRecord>(
    phase: ScanPhase,
    record: &R,
    error: BdError,
    handler: Option<&mut ErrorHandler<'_, R>>,
    failures: &mut Vec<ScanFailure>,
) -> Result<ScanDecision> {
    let Some(handler) = handler else {
        return Err(BdError::RecordScan {
            phase,
            file: record.name().to_string(),
            source: Box::new(error),
        });
    };

    tracing::warn!("{} failed for {}: {}", phase, record.name(), error);
    let decision = handler(record, &error);
    failures.push(ScanFailure {
        phase,
        file: record.name().to_string(),
        error,
    });
    Ok(decision)
}

impl BdRom {
    /// Run all scan phases over the catalog.
    ///
    /// Returns `Err` only when a phase without a handler sees a failure.
    /// A policy abort returns `Ok` with [`ScanOutcome::Aborted`].
    pub fn scan(
        &mut self,
        policies: &mut ScanPolicies<'_>,
        decoder: &mut dyn RecordDecoder,
    ) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        tracing::debug!("Starting {} of {} clips", ScanPhase::Clips, self.stream_clips.len());
        for clip in self.stream_clips.values_mut() {
            if let Err(e) = decoder.scan_clip(clip) {
                let decision = record_failure(
                    ScanPhase::Clips,
                    &*clip,
                    e,
                    policies.clip.as_mut(),
                    &mut report.failures,
                )?;
                if decision == ScanDecision::Abort {
                    return Ok(report.aborted(ScanPhase::Clips));
                }
            }
        }

        tracing::debug!("Starting {}", ScanPhase::InterleaveLink);
        self.link_interleaved_files();

        tracing::debug!("Starting {}", ScanPhase::Ordering);
        report.stream_file_order = sort_stream_files(&self.stream_files);

        tracing::debug!("Starting {} of {} playlists", ScanPhase::Playlists, self.playlists.len());
        let stream_files = &self.stream_files;
        let stream_clips = &self.stream_clips;
        for playlist in self.playlists.values_mut() {
            if let Err(e) = decoder.scan_playlist(playlist, stream_files, stream_clips) {
                let decision = record_failure(
                    ScanPhase::Playlists,
                    &*playlist,
                    e,
                    policies.playlist.as_mut(),
                    &mut report.failures,
                )?;
                if decision == ScanDecision::Abort {
                    return Ok(report.aborted(ScanPhase::Playlists));
                }
            }
        }

        tracing::debug!("Starting {} of {} files", ScanPhase::StreamFiles, report.stream_file_order.len());
        let mut aborted = false;
        for name in &report.stream_file_order {
            let referencing: Vec<&PlaylistFile> = self
                .playlists
                .values()
                .filter(|p| p.references(name))
                .collect();
            let Some(file) = self.stream_files.get_mut(name) else {
                continue;
            };
            if let Err(e) = decoder.scan_stream_file(file, &referencing) {
                let decision = record_failure(
                    ScanPhase::StreamFiles,
                    &*file,
                    e,
                    policies.stream_file.as_mut(),
                    &mut report.failures,
                )?;
                if decision == ScanDecision::Abort {
                    aborted = true;
                    break;
                }
            }
        }
        if aborted {
            return Ok(report.aborted(ScanPhase::StreamFiles));
        }

        tracing::debug!("Starting {}", ScanPhase::PostScan);
        self.post_scan();

        tracing::info!(
            "Scan complete: {} playlists, {} clips, {} stream files, {} failed, 50Hz={}",
            self.playlists.len(),
            self.stream_clips.len(),
            self.stream_files.len(),
            report.failures.len(),
            self.is_50hz
        );
        Ok(report)
    }

    /// Link every stream file to the interleaved file sharing its base name
    fn link_interleaved_files(&mut self) {
        for file in self.stream_files.values_mut() {
            let key = file.interleaved_key();
            file.interleaved_file = self.interleaved_files.contains_key(&key).then_some(key);
        }
    }

    fn post_scan(&mut self) {
        for playlist in self.playlists.values_mut() {
            playlist.initialize();

            if !self.is_50hz
                && playlist
                    .video_streams
                    .iter()
                    .any(|v| v.frame_rate.is_50hz())
            {
                tracing::debug!("Playlist {} has 25/50 fps video", playlist.name);
                self.is_50hz = true;
            }

            // Classified for every playlist, 50 Hz or not
            classify_base_views(playlist);
        }
    }
}
