//! Error types for the calfeed ecosystem.

use thiserror::Error;

/// Errors that can occur in calfeed operations.
#[derive(Error, Debug)]
pub enum CalFeedError {
    #[error("identifier is required")]
    MissingIdentifier,

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for calfeed operations.
pub type CalFeedResult<T> = Result<T, CalFeedError>;
