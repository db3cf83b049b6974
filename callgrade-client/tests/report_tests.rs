//! Scorecard explanation tests against a realistic service response
//!
//! The fixture is a full `POST /calls` response, including fields the client
//! does not model, so these tests also cover lenient decoding end to end.

use callgrade_client::analysis::{attribute, build_timeline, FactorSign, ScoreTier};
use callgrade_client::export::{csv_row, export_csv, CSV_HEADERS};
use callgrade_client::render::DetailView;
use callgrade_common::scorecard::{CallResult, CoverageStatus};

fn fixture() -> CallResult {
    let json = include_str!("fixtures/medicare_call.json");
    serde_json::from_str(json).expect("fixture should decode")
}

#[test]
fn test_fixture_decodes_with_unknown_fields() {
    let result = fixture();
    assert_eq!(result.rep_name, "tank5");
    assert_eq!(result.scores.benefits_status, CoverageStatus::Partial);
    assert_eq!(result.scores.healthcare_decisions_asked, None);
    assert_eq!(result.scores.top_fillers[0], ("um".to_string(), 5));
    assert_eq!(result.scores.evidence.objection_responses.len(), 1);

    // two distinct warmth signals
    assert_eq!(result.scores.energy.as_ref().unwrap().warmth_score, Some(62.0));
    assert_eq!(result.warmth.as_ref().unwrap().score, 66.0);
}

#[test]
fn test_attribution_for_fixture() {
    let card = fixture().scores;
    let factors = attribute(&card);

    let top: Vec<(&str, i32)> = factors.top.iter().map(|f| (f.label.as_str(), f.impact)).collect();
    assert_eq!(
        top,
        vec![
            ("Discovery Questions (4)", 12),
            ("Rebuttals (1)", 8),
            ("Tie-downs (2)", 4),
        ]
    );

    let bottom: Vec<(&str, i32)> = factors
        .bottom
        .iter()
        .map(|f| (f.label.as_str(), f.impact))
        .collect();
    assert_eq!(
        bottom,
        vec![
            ("SOA Missing", -20),
            ("Filler Words (9)", -18),
            ("Partial Benefits Review", -10),
        ]
    );

    assert!(factors.top.iter().all(|f| f.sign == FactorSign::Positive));
    assert!(factors.bottom.iter().all(|f| f.sign == FactorSign::Negative));
    assert_eq!(ScoreTier::for_score(card.score), ScoreTier::Warn);

    // deterministic
    assert_eq!(attribute(&card), factors);
}

#[test]
fn test_timeline_for_fixture() {
    let result = fixture();
    let timeline = build_timeline(&result.scores.evidence);

    let labels: Vec<&str> = timeline.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Intro: licensed_agent",
            "Intro: recorded_line",
            "Tie-down",
            "Pause",
            "Objection",
            "Rebuttal",
            "Benefit",
            "Benefit",
            "Tie-down",
            "Objection",
            "Referral Ask",
        ]
    );
    assert_eq!(timeline[3].detail, "9.2s pause");
    assert_eq!(timeline[4].detail, "\"too expensive\" - that sounds too expensive");
    assert_eq!(timeline[10].time, 590.5);
}

#[test]
fn test_detail_report_for_fixture() {
    let result = fixture();
    let report = DetailView::new(&result)
        .with_pdf_url(format!("http://127.0.0.1:8000/calls/{}/pdf", result.call_id))
        .with_transcript(true)
        .to_string();

    assert!(report.contains("61  [Score tier: WARN]"));
    assert!(report.contains("== Talk Ratio (Agent vs Customer) =="));
    assert!(report.contains("Agent (SPEAKER_00)"));
    assert!(report.contains("== Agent Energy =="));
    assert!(report.contains("2.7 words/sec, Good pace"));
    assert!(report.contains("Found: great, awesome"));
    assert!(report.contains("== Voice Tone =="));
    assert!(report.contains("== Warmth Analysis =="));
    assert!(report.contains("Missing: medicare_check, other_coverage"));
    assert!(report.contains("Missing: otc, part b giveback"));
    assert!(report.contains("  3:21  Objection"));
    assert!(report.contains("licensed agent. This call is recorded"));
}

#[test]
fn test_export_row_for_fixture() {
    let result = fixture();
    let row = csv_row(&result);
    assert_eq!(row.len(), CSV_HEADERS.len());
    assert_eq!(
        row.join(","),
        "7f3c2a10-5d9e-4b8a-9c61-0a1b2c3d4e5f,tank5,Medicare,61,No,partial,partial,No,Yes,No,4,2,9,2,1,68,65"
    );

    let csv = export_csv(&[result.clone(), result]);
    assert_eq!(csv.lines().count(), 3);
}
