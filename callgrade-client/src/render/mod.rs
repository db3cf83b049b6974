//! Plain-text views
//!
//! Each view is a borrowed `Display` wrapper, so callers can print it,
//! `to_string()` it in tests, or write it anywhere a formatter goes.

pub mod batch;
pub mod detail;

pub use batch::{BatchTable, ProgressLine};
pub use detail::DetailView;

use crate::analysis::tiers::{bar_level, BarLevel};

const BAR_WIDTH: usize = 20;

/// Fixed-width bar for a 0-100 sub-score
pub(crate) fn score_bar(score: f64) -> String {
    let clamped = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };
    let filled = ((clamped / 100.0) * BAR_WIDTH as f64).round() as usize;
    let fill = match bar_level(clamped) {
        BarLevel::High => '#',
        BarLevel::Medium => '=',
        BarLevel::Low => '-',
    };
    format!(
        "[{}{}]",
        fill.to_string().repeat(filled),
        " ".repeat(BAR_WIDTH - filled)
    )
}

/// Placeholder for blank free-text fields
pub(crate) fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
