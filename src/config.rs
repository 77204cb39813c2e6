//! Scan configuration

use serde::{Deserialize, Serialize};

use crate::error::{BdError, Result};

/// What to do when a record in one scan phase fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryMode {
    /// No handler: the first failure ends the scan with an error
    Fail,
    /// Log the failure and keep scanning the phase
    #[default]
    Skip,
    /// Log the failure and stop the scan after this phase
    Abort,
}

/// Per-phase recovery configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Clip-info scan
    pub clip: RecoveryMode,

    /// Playlist scan
    pub playlist: RecoveryMode,

    /// Stream file scan
    pub stream_file: RecoveryMode,
}

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// How many levels below the immediate children the directory search
    /// descends (0 = immediate children only)
    pub search_depth: usize,

    /// Ask the platform for the volume label of the disc root
    pub read_volume_label: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,

    /// Recovery behavior of the fallible scan phases
    pub recovery: RecoveryConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            search_depth: 0,
            read_volume_label: true,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            recovery: RecoveryConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BdError::Config(format!("{}: {}", path, e)))
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| BdError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default tracing filter directive for this configuration
    pub fn log_filter(&self) -> String {
        format!("bdrom_scan={}", self.log_level)
    }
}
