//! Call timeline
//!
//! Merges the independent evidence sequences into one chronological list.
//! Each category is flattened into a common `{time, label, detail}` entry,
//! then the whole list is stably sorted by time, so events at the same second
//! keep category order and, within a category, received order.

use callgrade_common::scorecard::{Evidence, EvidenceEvent};
use serde::Serialize;

/// One merged timeline row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    /// Seconds from call start
    pub time: f64,
    /// Fixed per-category label (`SOA`, `Intro: <component>`, `Pause`, ...)
    pub label: String,
    /// Category-specific description
    pub detail: String,
}

fn quoted_with_text(phrase: &str, text: &str) -> String {
    format!("\"{}\" - {}", phrase, text)
}

impl From<EvidenceEvent<'_>> for TimelineEntry {
    fn from(event: EvidenceEvent<'_>) -> Self {
        let (label, detail) = match event {
            EvidenceEvent::Soa(e) => ("SOA".to_string(), e.text.clone()),
            EvidenceEvent::Intro(e) => (format!("Intro: {}", e.component), e.text.clone()),
            EvidenceEvent::HealthcareDecisions(e) => {
                ("Healthcare Decisions".to_string(), e.text.clone())
            }
            EvidenceEvent::Referral(e) => ("Referral Ask".to_string(), e.text.clone()),
            EvidenceEvent::Review(e) => ("Review Request".to_string(), e.text.clone()),
            EvidenceEvent::Objection(e) => {
                ("Objection".to_string(), quoted_with_text(&e.phrase, &e.text))
            }
            EvidenceEvent::Rebuttal(e) => {
                ("Rebuttal".to_string(), quoted_with_text(&e.phrase, &e.text))
            }
            EvidenceEvent::TieDown(e) => ("Tie-down".to_string(), format!("\"{}\"", e.phrase)),
            EvidenceEvent::Benefit(e) => ("Benefit".to_string(), e.term.clone()),
            EvidenceEvent::Pause(e) => ("Pause".to_string(), format!("{}s pause", e.duration)),
        };

        Self {
            time: event.time(),
            label,
            detail,
        }
    }
}

/// Build the chronological timeline for one evidence bag.
///
/// Empty categories contribute nothing; an empty bag yields an empty list.
pub fn build_timeline(evidence: &Evidence) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = evidence.events().map(TimelineEntry::from).collect();
    entries.sort_by(|a, b| a.time.total_cmp(&b.time));
    entries
}
