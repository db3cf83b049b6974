//! Scorecard wire model
//!
//! Typed shape of one analysis result as returned by `POST /calls`.
//!
//! The analysis service grows new fields over time and omits sub-models it did
//! not compute (`energy`, `intro`, `pauses`, ...). Every struct here therefore
//! deserializes leniently: absent fields and explicit `null` values both take
//! their defaults, and unknown fields are ignored. An absent optional
//! sub-model means "feature not computed", never an error.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Treat an explicit JSON `null` the same as an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Coverage level for benefits review and intro completeness
///
/// Unrecognized values from the service are read as `None` rather than
/// rejecting the whole result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CoverageStatus {
    #[default]
    None,
    Partial,
    Full,
}

impl CoverageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CoverageStatus::None => "none",
            CoverageStatus::Partial => "partial",
            CoverageStatus::Full => "full",
        }
    }
}

impl From<String> for CoverageStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => CoverageStatus::Full,
            "partial" => CoverageStatus::Partial,
            _ => CoverageStatus::None,
        }
    }
}

impl From<CoverageStatus> for String {
    fn from(value: CoverageStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full result object for one analyzed call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallResult {
    /// Service-assigned identifier, used for the PDF endpoint
    #[serde(deserialize_with = "nullable")]
    pub call_id: String,
    #[serde(deserialize_with = "nullable")]
    pub rep_name: String,
    #[serde(deserialize_with = "nullable")]
    pub call_type: String,
    /// Service-side processing status string
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub transcript: String,
    #[serde(deserialize_with = "nullable")]
    pub scores: Scorecard,
    #[serde(deserialize_with = "nullable")]
    pub diarization_enabled: bool,
    pub diarization_error: Option<String>,
    pub talk_ratio: Option<TalkRatio>,
    #[serde(deserialize_with = "nullable")]
    pub talk_coaching: Vec<String>,
    /// Originating upload file name; set client-side by the batch orchestrator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub voice_tone: Option<VoiceTone>,
    /// Top-level warmth model. Independent of `Energy::warmth_score`.
    pub warmth: Option<Warmth>,
}

impl CallResult {
    /// Name shown in tables and exports: the upload file name when known,
    /// otherwise the service call id.
    pub fn display_name(&self) -> &str {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.call_id,
        }
    }

    /// Read a result previously saved as JSON
    pub fn load_json(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Rubric-based assessment of one call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scorecard {
    /// Overall score computed by the service
    #[serde(deserialize_with = "nullable")]
    pub score: f64,

    // === Compliance ===
    #[serde(deserialize_with = "nullable")]
    pub soa_mentioned: bool,
    #[serde(deserialize_with = "nullable")]
    pub benefits_status: CoverageStatus,
    #[serde(deserialize_with = "nullable")]
    pub benefits_mentioned: bool,
    #[serde(deserialize_with = "nullable")]
    pub benefits_reviewed: bool,
    #[serde(deserialize_with = "nullable")]
    pub benefit_terms_found: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub benefit_terms_missing: Vec<String>,
    pub intro: Option<IntroCheck>,
    pub healthcare_decisions_asked: Option<bool>,
    pub referral_asked: Option<bool>,
    pub review_requested: Option<bool>,

    // === Behavioral counters ===
    #[serde(deserialize_with = "nullable")]
    pub word_count: u32,
    #[serde(deserialize_with = "nullable")]
    pub questions: u32,
    #[serde(deserialize_with = "nullable")]
    pub tie_downs: u32,
    #[serde(deserialize_with = "nullable")]
    pub filler_total: u32,
    #[serde(deserialize_with = "nullable")]
    pub top_fillers: Vec<(String, u32)>,
    #[serde(deserialize_with = "nullable")]
    pub objection_hits: u32,
    #[serde(deserialize_with = "nullable")]
    pub rebuttal_hits: u32,
    pub objections_handled: Option<u32>,
    pub objections_missed: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    pub avg_sentence_words: f64,
    #[serde(deserialize_with = "nullable")]
    pub exclaims: u32,

    // === Optional sub-models ===
    pub energy: Option<Energy>,
    pub pauses: Option<PauseSummary>,

    #[serde(deserialize_with = "nullable")]
    pub evidence: Evidence,
}

/// Intro completeness check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroCheck {
    #[serde(deserialize_with = "nullable")]
    pub status: CoverageStatus,
    #[serde(deserialize_with = "nullable")]
    pub components_found: IntroComponents,
    #[serde(deserialize_with = "nullable")]
    pub missing: Vec<String>,
}

/// Which required intro components were heard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroComponents {
    #[serde(deserialize_with = "nullable")]
    pub licensed_agent: bool,
    #[serde(deserialize_with = "nullable")]
    pub recorded_line: bool,
    #[serde(deserialize_with = "nullable")]
    pub medicare_check: bool,
    #[serde(deserialize_with = "nullable")]
    pub other_coverage: bool,
}

/// Agent energy model (all scores 0-100)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Energy {
    #[serde(deserialize_with = "nullable")]
    pub overall: f64,
    #[serde(deserialize_with = "nullable")]
    pub label: String,
    #[serde(deserialize_with = "nullable")]
    pub speech_pace: SpeechPace,
    #[serde(deserialize_with = "nullable")]
    pub enthusiasm: WordSignal,
    #[serde(deserialize_with = "nullable")]
    pub confidence: WordSignal,
    #[serde(deserialize_with = "nullable")]
    pub engagement: Engagement,
    #[serde(deserialize_with = "nullable")]
    pub hedge_penalty: WordSignal,
    #[serde(deserialize_with = "nullable")]
    pub variation: Variation,
    /// Warmth sub-score reported inside the energy model, when present
    pub warmth_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechPace {
    #[serde(deserialize_with = "nullable")]
    pub score: f64,
    #[serde(deserialize_with = "nullable")]
    pub words_per_sec: f64,
    #[serde(deserialize_with = "nullable")]
    pub label: String,
}

/// Sub-score backed by a list of matched words
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WordSignal {
    #[serde(deserialize_with = "nullable")]
    pub score: f64,
    #[serde(deserialize_with = "nullable")]
    pub words_found: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Engagement {
    #[serde(deserialize_with = "nullable")]
    pub score: f64,
    #[serde(deserialize_with = "nullable")]
    pub phrases_found: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub questions: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Variation {
    #[serde(deserialize_with = "nullable")]
    pub score: f64,
    #[serde(deserialize_with = "nullable")]
    pub std_dev: f64,
}

/// Aggregate silence statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseSummary {
    #[serde(deserialize_with = "nullable")]
    pub total_pauses: u32,
    #[serde(deserialize_with = "nullable")]
    pub total_pause_time: f64,
    #[serde(deserialize_with = "nullable")]
    pub long_pauses: u32,
    #[serde(deserialize_with = "nullable")]
    pub avg_pause: f64,
}

/// Agent vs customer speaking time (requires diarization)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TalkRatio {
    #[serde(deserialize_with = "nullable")]
    pub total_seconds: f64,
    #[serde(deserialize_with = "nullable")]
    pub speaker_seconds: BTreeMap<String, f64>,
    #[serde(deserialize_with = "nullable")]
    pub agent_speaker: String,
    #[serde(deserialize_with = "nullable")]
    pub agent_seconds: f64,
    #[serde(deserialize_with = "nullable")]
    pub customer_seconds: f64,
    #[serde(deserialize_with = "nullable")]
    pub agent_pct: f64,
    #[serde(deserialize_with = "nullable")]
    pub customer_pct: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceTone {
    #[serde(deserialize_with = "nullable")]
    pub pitch_variation: f64,
    #[serde(deserialize_with = "nullable")]
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Warmth {
    #[serde(deserialize_with = "nullable")]
    pub score: f64,
    #[serde(deserialize_with = "nullable")]
    pub mirroring: f64,
    #[serde(deserialize_with = "nullable")]
    pub name_usage: u32,
    #[serde(deserialize_with = "nullable")]
    pub empathy_phrases: u32,
    #[serde(deserialize_with = "nullable")]
    pub interruptions: u32,
    #[serde(deserialize_with = "nullable")]
    pub label: String,
}

// ============================================================================
// Evidence
// ============================================================================

/// Plain transcript hit (SOA, healthcare decisions, referral, review)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Utterance {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: f64,
    #[serde(deserialize_with = "nullable")]
    pub speaker: String,
    #[serde(deserialize_with = "nullable")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroEvidence {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: f64,
    #[serde(deserialize_with = "nullable")]
    pub speaker: String,
    #[serde(deserialize_with = "nullable")]
    pub component: String,
    #[serde(deserialize_with = "nullable")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FillerEvidence {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: f64,
    #[serde(deserialize_with = "nullable")]
    pub speaker: String,
    #[serde(deserialize_with = "nullable")]
    pub filler: String,
    #[serde(deserialize_with = "nullable")]
    pub text: String,
}

/// Matched phrase (tie-downs, objections, rebuttals)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseEvidence {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: f64,
    #[serde(deserialize_with = "nullable")]
    pub speaker: String,
    #[serde(deserialize_with = "nullable")]
    pub phrase: String,
    #[serde(deserialize_with = "nullable")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TermEvidence {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: f64,
    #[serde(deserialize_with = "nullable")]
    pub speaker: String,
    #[serde(deserialize_with = "nullable")]
    pub term: String,
    #[serde(deserialize_with = "nullable")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseEvidence {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: f64,
    #[serde(deserialize_with = "nullable")]
    pub duration: f64,
    #[serde(deserialize_with = "nullable")]
    pub before_speaker: String,
    #[serde(deserialize_with = "nullable")]
    pub after_speaker: String,
    #[serde(deserialize_with = "nullable")]
    pub before_text: String,
    #[serde(deserialize_with = "nullable")]
    pub after_text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectionResponse {
    #[serde(deserialize_with = "nullable")]
    pub objection_timestamp: f64,
    #[serde(deserialize_with = "nullable")]
    pub objection_phrase: String,
    #[serde(deserialize_with = "nullable")]
    pub objection_text: String,
    #[serde(deserialize_with = "nullable")]
    pub response_timestamp: f64,
    #[serde(deserialize_with = "nullable")]
    pub response_phrase: String,
    #[serde(deserialize_with = "nullable")]
    pub response_text: String,
}

/// Evidence bag: independently populated, individually ordered sequences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Evidence {
    #[serde(deserialize_with = "nullable")]
    pub soa: Vec<Utterance>,
    #[serde(deserialize_with = "nullable")]
    pub intro: Vec<IntroEvidence>,
    #[serde(deserialize_with = "nullable")]
    pub healthcare_decisions: Vec<Utterance>,
    #[serde(deserialize_with = "nullable")]
    pub referral: Vec<Utterance>,
    #[serde(deserialize_with = "nullable")]
    pub review: Vec<Utterance>,
    #[serde(deserialize_with = "nullable")]
    pub fillers: Vec<FillerEvidence>,
    #[serde(deserialize_with = "nullable")]
    pub tie_downs: Vec<PhraseEvidence>,
    #[serde(deserialize_with = "nullable")]
    pub objections: Vec<PhraseEvidence>,
    #[serde(deserialize_with = "nullable")]
    pub rebuttals: Vec<PhraseEvidence>,
    #[serde(deserialize_with = "nullable")]
    pub objection_responses: Vec<ObjectionResponse>,
    #[serde(deserialize_with = "nullable")]
    pub benefits: Vec<TermEvidence>,
    #[serde(deserialize_with = "nullable")]
    pub pauses: Vec<PauseEvidence>,
}

/// One timestamped evidence event, tagged by category
///
/// Fillers and objection/response pairs are not timeline categories and have
/// no variant here.
#[derive(Debug, Clone, Copy)]
pub enum EvidenceEvent<'a> {
    Soa(&'a Utterance),
    Intro(&'a IntroEvidence),
    HealthcareDecisions(&'a Utterance),
    Referral(&'a Utterance),
    Review(&'a Utterance),
    Objection(&'a PhraseEvidence),
    Rebuttal(&'a PhraseEvidence),
    TieDown(&'a PhraseEvidence),
    Benefit(&'a TermEvidence),
    Pause(&'a PauseEvidence),
}

impl EvidenceEvent<'_> {
    /// Seconds from call start
    pub fn time(&self) -> f64 {
        match self {
            EvidenceEvent::Soa(e)
            | EvidenceEvent::HealthcareDecisions(e)
            | EvidenceEvent::Referral(e)
            | EvidenceEvent::Review(e) => e.timestamp,
            EvidenceEvent::Intro(e) => e.timestamp,
            EvidenceEvent::Objection(e)
            | EvidenceEvent::Rebuttal(e)
            | EvidenceEvent::TieDown(e) => e.timestamp,
            EvidenceEvent::Benefit(e) => e.timestamp,
            EvidenceEvent::Pause(e) => e.timestamp,
        }
    }
}

impl Evidence {
    /// Every timeline event, category by category, each category in its
    /// received order.
    pub fn events(&self) -> impl Iterator<Item = EvidenceEvent<'_>> {
        self.soa
            .iter()
            .map(EvidenceEvent::Soa)
            .chain(self.intro.iter().map(EvidenceEvent::Intro))
            .chain(
                self.healthcare_decisions
                    .iter()
                    .map(EvidenceEvent::HealthcareDecisions),
            )
            .chain(self.referral.iter().map(EvidenceEvent::Referral))
            .chain(self.review.iter().map(EvidenceEvent::Review))
            .chain(self.objections.iter().map(EvidenceEvent::Objection))
            .chain(self.rebuttals.iter().map(EvidenceEvent::Rebuttal))
            .chain(self.tie_downs.iter().map(EvidenceEvent::TieDown))
            .chain(self.benefits.iter().map(EvidenceEvent::Benefit))
            .chain(self.pauses.iter().map(EvidenceEvent::Pause))
    }
}
