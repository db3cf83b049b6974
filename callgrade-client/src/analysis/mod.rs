//! Pure scorecard analysis
//!
//! Everything in here is synchronous and free of I/O: it turns one
//! `Scorecard` into an explanation (factors), a chronological narrative
//! (timeline), and display tiers.

pub mod factors;
pub mod tiers;
pub mod timeline;

pub use factors::{attribute, Factor, FactorSign, ScoreFactors};
pub use tiers::ScoreTier;
pub use timeline::{build_timeline, TimelineEntry};
