//! Error types for LearnSync.

use thiserror::Error;

/// Common error type for LearnSync.
#[derive(Error, Debug)]
pub enum LearnSyncError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for configuration or user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Web server error.
    #[error("server error: {0}")]
    Server(String),
}

/// Result type alias for LearnSync operations.
pub type Result<T> = std::result::Result<T, LearnSyncError>;
