//! Blu-ray BDMV structure discovery and scanning
//!
//! Open a disc tree with [`BdRom::open`], then run [`BdRom::scan`] with a
//! [`RecordDecoder`] and [`ScanPolicies`]:
//!
//! ```no_run
//! use bdrom_scan::{BdRom, HeaderDecoder, ScanConfig, ScanPolicies};
//!
//! let config = ScanConfig::default();
//! let mut disc = BdRom::open("/mnt/bluray", &config)?;
//! let mut policies = ScanPolicies::from_config(&config.recovery);
//! let report = disc.scan(&mut policies, &mut HeaderDecoder)?;
//! println!("{} playlists, complete={}", disc.playlists.len(), report.is_complete());
//! # Ok::<(), bdrom_scan::BdError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod config_file;
pub mod decode;
pub mod disc;
pub mod error;
pub mod records;
pub mod scan;
pub mod summary;

#[cfg(test)]
pub(crate) mod tests;

pub use catalog::{FileCatalog, Table};
pub use config::{RecoveryConfig, RecoveryMode, ScanConfig};
pub use config_file::ConfigFile;
pub use decode::{HeaderDecoder, RecordDecoder};
pub use disc::{BdRom, DirHandle, DiscFeatures, DiscLayout, NoVolumeLabel, VolumeLabelSource};
pub use error::{BdError, Result};
pub use records::{
    FrameRate, InterleavedFile, PlaylistFile, StreamClip, StreamClipFile, StreamFile, StreamType,
    TsStream, VideoStream,
};
pub use scan::{ScanDecision, ScanFailure, ScanOutcome, ScanPhase, ScanPolicies, ScanReport};
pub use summary::DiscSummary;
