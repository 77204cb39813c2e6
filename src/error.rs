use thiserror::Error;

use crate::scan::ScanPhase;

/// Main error type for disc discovery and scanning
#[derive(Error, Debug)]
pub enum BdError {
    /// A mandatory directory (BDMV, CLIPINF or PLAYLIST) could not be located
    #[error("Unable to locate BD structure: {0}")]
    StructureNotFound(String),

    /// Two files normalize to the same uppercase catalog key
    #[error("Duplicate {table} entry: {key}")]
    DuplicateEntry { table: &'static str, key: String },

    /// A single clip, playlist or stream file failed its own scan
    #[error("Failed to scan {file} during {phase}: {source}")]
    RecordScan {
        phase: ScanPhase,
        file: String,
        #[source]
        source: Box<BdError>,
    },

    /// A payload did not have the expected binary layout
    #[error("Invalid file {file}: {reason}")]
    InvalidFile { file: String, reason: String },

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Summary serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BdError {
    /// Shorthand for an [`BdError::InvalidFile`] error
    pub fn invalid(file: impl Into<String>, reason: impl Into<String>) -> Self {
        BdError::InvalidFile {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BdError>;
