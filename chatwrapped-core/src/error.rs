//! Error types for chatwrapped-core

use thiserror::Error;

/// Main error type for the chatwrapped-core library
#[derive(Error, Debug)]
pub enum Error {
    /// The message store could not be opened; fatal, nothing can be computed
    #[error("message store unavailable: {0}")]
    Store(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for chatwrapped-core
pub type Result<T> = std::result::Result<T, Error>;
