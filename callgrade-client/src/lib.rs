//! callgrade-client library interface
//!
//! Upload sales calls to the analysis service, explain the returned
//! scorecards, and export batch results.

pub mod analysis;
pub mod error;
pub mod export;
pub mod manifest;
pub mod render;
pub mod services;

pub use crate::error::{ClientError, ClientResult};
pub use crate::services::{
    AnalysisClient, AnalysisError, AnalysisService, BatchError, BatchOrchestrator,
};
