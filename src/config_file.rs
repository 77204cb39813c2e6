//! Configuration file support
//!
//! Loads scan configuration from TOML files. Every section and field is
//! optional; missing values take the `ScanConfig` defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{RecoveryConfig, RecoveryMode, ScanConfig};
use crate::error::{BdError, Result};

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Disc discovery settings
    pub disc: Option<DiscSettings>,
    /// Error recovery settings
    pub recovery: Option<RecoverySettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscSettings {
    /// Depth of the descending directory search
    pub search_depth: Option<usize>,
    /// Query the platform for the volume label
    pub volume_label: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverySettings {
    /// Clip-info scan failures (fail, skip, abort)
    pub clip: Option<RecoveryMode>,
    /// Playlist scan failures
    pub playlist: Option<RecoveryMode>,
    /// Stream file scan failures
    pub stream_file: Option<RecoveryMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| BdError::Config(format!("{}: {}", path.as_ref().display(), e)))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| BdError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            disc: Some(DiscSettings {
                search_depth: Some(0),
                volume_label: Some(true),
            }),
            recovery: Some(RecoverySettings {
                clip: Some(RecoveryMode::Skip),
                playlist: Some(RecoveryMode::Skip),
                stream_file: Some(RecoveryMode::Skip),
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to ScanConfig
    pub fn into_scan_config(self) -> ScanConfig {
        let defaults = ScanConfig::default();
        let disc = self.disc.as_ref();
        let recovery = self.recovery.as_ref();

        ScanConfig {
            search_depth: disc
                .and_then(|d| d.search_depth)
                .unwrap_or(defaults.search_depth),
            read_volume_label: disc
                .and_then(|d| d.volume_label)
                .unwrap_or(defaults.read_volume_label),
            recovery: RecoveryConfig {
                clip: recovery
                    .and_then(|r| r.clip)
                    .unwrap_or(defaults.recovery.clip),
                playlist: recovery
                    .and_then(|r| r.playlist)
                    .unwrap_or(defaults.recovery.playlist),
                stream_file: recovery
                    .and_then(|r| r.stream_file)
                    .unwrap_or(defaults.recovery.stream_file),
            },
            log_level: self
                .logging
                .as_ref()
                .map(|l| l.level.clone())
                .unwrap_or(defaults.log_level),
            log_format: self
                .logging
                .and_then(|l| l.format)
                .unwrap_or(defaults.log_format),
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
