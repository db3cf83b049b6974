//! Human-readable call offsets
//!
//! Evidence timestamps are seconds from the start of the recording. They are
//! displayed as `M:SS`, with minutes allowed to grow past 59 because calls
//! rarely run long enough for an hour field to be worth the width.

/// Format seconds from call start as `M:SS`.
///
/// Fractional seconds are truncated. Negative and non-finite inputs are
/// treated as the start of the call.
///
/// # Examples
///
/// ```
/// use callgrade_common::human_time::format_call_offset;
///
/// assert_eq!(format_call_offset(0.0), "0:00");
/// assert_eq!(format_call_offset(65.9), "1:05");
/// assert_eq!(format_call_offset(3725.0), "62:05");
/// ```
pub fn format_call_offset(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let minutes = whole / 60;
    let secs = whole % 60;
    format!("{}:{:02}", minutes, secs)
}

/// Format a duration in seconds for panel text (`12.5s`, `8s`).
pub fn format_seconds(seconds: f64) -> String {
    format!("{}s", seconds)
}
