//! Tabular CSV export
//!
//! One header row, then one row per result in the order given. The column
//! set is fixed: absent optional sub-models render as `N/A` instead of
//! dropping the cell, so every row has the same width.

use callgrade_common::scorecard::CallResult;
use chrono::NaiveDate;
use std::borrow::Borrow;
use std::path::{Path, PathBuf};

use crate::error::ClientResult;

/// Column headers, in output order
pub const CSV_HEADERS: [&str; 17] = [
    "Filename",
    "Rep Name",
    "Call Type",
    "Score",
    "SOA",
    "Benefits",
    "Intro",
    "Healthcare Decisions",
    "Referral Ask",
    "Review Request",
    "Questions",
    "Tie-downs",
    "Fillers",
    "Objections",
    "Rebuttals",
    "Energy",
    "Talk Ratio Agent %",
];

const NOT_AVAILABLE: &str = "N/A";

fn yes_no(flag: bool) -> String {
    let cell = if flag { "Yes" } else { "No" };
    cell.to_string()
}

/// Quote a cell if it contains a delimiter, quote or line break
fn escape_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Display cells for one result, in `CSV_HEADERS` order
pub fn csv_row(result: &CallResult) -> Vec<String> {
    let card = &result.scores;
    vec![
        result.display_name().to_string(),
        result.rep_name.clone(),
        result.call_type.clone(),
        card.score.to_string(),
        yes_no(card.soa_mentioned),
        card.benefits_status.to_string(),
        card.intro
            .as_ref()
            .map(|i| i.status.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        yes_no(card.healthcare_decisions_asked.unwrap_or(false)),
        yes_no(card.referral_asked.unwrap_or(false)),
        yes_no(card.review_requested.unwrap_or(false)),
        card.questions.to_string(),
        card.tie_downs.to_string(),
        card.filler_total.to_string(),
        card.objection_hits.to_string(),
        card.rebuttal_hits.to_string(),
        card.energy
            .as_ref()
            .map(|e| e.overall.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        result
            .talk_ratio
            .as_ref()
            .map(|t| t.agent_pct.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    ]
}

fn join_row<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|c| escape_cell(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render the whole results set as CSV text (header first, `\n` separated)
pub fn export_csv<R: Borrow<CallResult>>(results: &[R]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(join_row(&CSV_HEADERS));
    lines.extend(results.iter().map(|r| join_row(&csv_row(r.borrow()))));
    lines.join("\n")
}

/// `call_grades_<YYYY-MM-DD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("call_grades_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the export into `dir`, returning the path written
pub fn write_csv<R: Borrow<CallResult>>(
    results: &[R],
    dir: &Path,
    date: NaiveDate,
) -> ClientResult<PathBuf> {
    let path = dir.join(export_file_name(date));
    std::fs::write(&path, export_csv(results))?;
    tracing::info!(path = %path.display(), rows = results.len(), "Exported batch results");
    Ok(path)
}
