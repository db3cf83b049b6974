//! Common error types for callgrade

use thiserror::Error;

/// Common result type for callgrade operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the callgrade crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON decoding error for a stored or received result
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
