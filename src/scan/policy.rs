//! Per-phase error recovery

use std::fmt;

use crate::config::{RecoveryConfig, RecoveryMode};
use crate::error::BdError;
use crate::records::{PlaylistFile, ScanRecord, StreamClipFile, StreamFile};

/// What to do after a record failed its scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDecision {
    /// Record the failure and scan the remaining records of the phase
    Continue,
    /// Record the failure and end the scan after this phase
    Abort,
}

/// Decision function for one phase
pub type ErrorHandler<'a, R> = Box<dyn FnMut(&R, &BdError) -> ScanDecision + 'a>;

/// Error handlers for the clip, playlist and stream file scans.
///
/// A phase without a handler is fail-closed: its first failure is returned
/// from [`crate::BdRom::scan`] as [`BdError::RecordScan`].
#[derive(Default)]
pub struct ScanPolicies<'a> {
    pub(crate) clip: Option<ErrorHandler<'a, StreamClipFile>>,
    pub(crate) playlist: Option<ErrorHandler<'a, PlaylistFile>>,
    pub(crate) stream_file: Option<ErrorHandler<'a, StreamFile>>,
}

impl<'a> ScanPolicies<'a> {
    /// Policies with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_clip_error<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&StreamClipFile, &BdError) -> ScanDecision + 'a,
    {
        self.clip = Some(Box::new(handler));
        self
    }

    pub fn on_playlist_error<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&PlaylistFile, &BdError) -> ScanDecision + 'a,
    {
        self.playlist = Some(Box::new(handler));
        self
    }

    pub fn on_stream_file_error<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&StreamFile, &BdError) -> ScanDecision + 'a,
    {
        self.stream_file = Some(Box::new(handler));
        self
    }

    /// Policies for the `[recovery]` configuration section
    pub fn from_config(config: &RecoveryConfig) -> Self {
        Self {
            clip: handler_for(config.clip),
            playlist: handler_for(config.playlist),
            stream_file: handler_for(config.stream_file),
        }
    }
}

impl fmt::Debug for ScanPolicies<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanPolicies")
            .field("clip", &self.clip.is_some())
            .field("playlist", &self.playlist.is_some())
            .field("stream_file", &self.stream_file.is_some())
            .finish()
    }
}

fn handler_for<'a, R: ScanRecord + 'a>(mode: RecoveryMode) -> Option<ErrorHandler<'a, R>> {
    match mode {
        RecoveryMode::Fail => None,
        RecoveryMode::Skip => Some(Box::new(|record: &R, err: &BdError| {
            tracing::warn!("Skipping {}: {}", record.name(), err);
            ScanDecision::Continue
        })),
        RecoveryMode::Abort => Some(Box::new(|record: &R, err: &BdError| {
            tracing::warn!("Aborting scan at {}: {}", record.name(), err);
            ScanDecision::Abort
        })),
    }
}
