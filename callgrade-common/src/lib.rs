//! # callgrade common library
//!
//! Shared code for the callgrade client including:
//! - The scorecard wire model returned by the analysis service
//! - Typed evidence events feeding the call timeline
//! - Batch progress events and the event bus that carries them
//! - Configuration loading (API base address, logging)
//! - Human-readable call offsets

pub mod batch;
pub mod config;
pub mod error;
pub mod events;
pub mod human_time;
pub mod scorecard;

pub use batch::{BatchJob, BatchRun};
pub use error::{Error, Result};
pub use scorecard::{CallResult, Scorecard};
