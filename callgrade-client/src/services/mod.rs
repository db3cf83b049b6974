//! Service layer: the analysis service client and the two submission paths
//! (single upload and sequential batch) built on top of it.

pub mod analysis_client;
pub mod batch_orchestrator;
pub mod single_upload;

pub use analysis_client::{AnalysisClient, AnalysisError, AnalysisService};
pub use batch_orchestrator::{BatchError, BatchOrchestrator};
pub use single_upload::{submit_single, UploadOutcome};
