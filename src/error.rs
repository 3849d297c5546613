//! Error types for the detection core.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, DetectorError>;

/// Detector error types
#[derive(Error, Debug)]
pub enum DetectorError {
    /// Training preconditions unmet (empty corpus, single label, bad ratios)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or missing fields in a training corpus or batch input
    #[error("Data error: {0}")]
    Data(String),

    /// Model artifact could not be encoded, decoded, or is of an unknown version
    #[error("Model artifact error: {0}")]
    Artifact(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<bincode::Error> for DetectorError {
    fn from(err: bincode::Error) -> Self {
        DetectorError::Artifact(err.to_string())
    }
}
