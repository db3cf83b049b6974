//! Error types for callgrade-client
//!
//! Per-job analysis failures are values (`AnalysisError`) that the batch
//! orchestrator records and moves past. `ClientError` covers the local
//! operations around a run: manifests and exports.

use thiserror::Error;

/// Client-side error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Batch manifest could not be read or parsed
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
