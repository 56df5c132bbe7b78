//! Error types for the tracker.

use thiserror::Error;

/// Top-level error type for tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// IO errors while reading or writing persisted state
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors (JSON, RON)
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Player identifier could not be parsed
    #[error("Invalid player UUID: {0}")]
    InvalidUuid(String),

    /// Game data is inconsistent
    #[error("Invalid game data: {0}")]
    InvalidData(String),
}

/// Result type alias for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
