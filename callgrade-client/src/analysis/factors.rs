//! Factor attribution
//!
//! Explains a score by mapping the scorecard onto a fixed, hand-tuned rubric.
//! Every rule emits at most one factor; repeated behaviors are capped so no
//! single signal dominates the explanation.
//!
//! | Signal                         | Rule                               | Cap  |
//! |--------------------------------|------------------------------------|------|
//! | Discovery questions            | +3 each                            | +20  |
//! | Rebuttals                      | +8 each                            | +16  |
//! | Tie-downs                      | +2 each                            | +10  |
//! | SOA disclosure                 | +8 mentioned, -20 missing          |      |
//! | Benefits review                | full +8, partial -10, none -20     |      |
//! | Intro (if computed)            | full +5, partial -5, none -10      |      |
//! | Healthcare decisions asked     | +3                                 |      |
//! | Referral ask                   | +3                                 |      |
//! | Review request                 | +2                                 |      |
//! | Filler words                   | -2 each                            | -20  |
//! | Avg sentence words > 22        | -5                                 |      |
//! | Long pauses > 2 (if computed)  | -5                                 |      |
//! | Missed objections              | -5 each                            | -10  |

use callgrade_common::scorecard::{CoverageStatus, Scorecard};
use serde::Serialize;

const QUESTION_POINTS: i64 = 3;
const QUESTION_CAP: i64 = 20;
const REBUTTAL_POINTS: i64 = 8;
const REBUTTAL_CAP: i64 = 16;
const TIE_DOWN_POINTS: i64 = 2;
const TIE_DOWN_CAP: i64 = 10;
const FILLER_POINTS: i64 = 2;
const FILLER_CAP: i64 = 20;
const MISSED_OBJECTION_POINTS: i64 = 5;
const MISSED_OBJECTION_CAP: i64 = 10;

const RAMBLING_SENTENCE_WORDS: f64 = 22.0;
const LONG_PAUSE_LIMIT: u32 = 2;

/// Factors kept per side
pub const MAX_FACTORS: usize = 3;

/// Direction of a factor's contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorSign {
    Positive,
    Negative,
}

/// One human-readable contribution to the score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factor {
    pub label: String,
    pub impact: i32,
    pub sign: FactorSign,
}

impl Factor {
    fn positive(label: impl Into<String>, impact: i32) -> Self {
        Self {
            label: label.into(),
            impact,
            sign: FactorSign::Positive,
        }
    }

    fn negative(label: impl Into<String>, impact: i32) -> Self {
        Self {
            label: label.into(),
            impact,
            sign: FactorSign::Negative,
        }
    }
}

/// Strongest contributors on each side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreFactors {
    /// Positive factors, largest first
    pub top: Vec<Factor>,
    /// Negative factors, most damaging first
    pub bottom: Vec<Factor>,
}

/// `count * per`, clamped to `cap` (all magnitudes)
fn capped(count: u32, per: i64, cap: i64) -> i32 {
    (i64::from(count) * per).min(cap) as i32
}

/// Evaluate every rubric rule in table order.
fn evaluate_rules(card: &Scorecard) -> Vec<Factor> {
    let mut factors = Vec::new();

    let questions = capped(card.questions, QUESTION_POINTS, QUESTION_CAP);
    if questions > 0 {
        factors.push(Factor::positive(
            format!("Discovery Questions ({})", card.questions),
            questions,
        ));
    }

    let rebuttals = capped(card.rebuttal_hits, REBUTTAL_POINTS, REBUTTAL_CAP);
    if rebuttals > 0 {
        factors.push(Factor::positive(
            format!("Rebuttals ({})", card.rebuttal_hits),
            rebuttals,
        ));
    }

    let tie_downs = capped(card.tie_downs, TIE_DOWN_POINTS, TIE_DOWN_CAP);
    if tie_downs > 0 {
        factors.push(Factor::positive(
            format!("Tie-downs ({})", card.tie_downs),
            tie_downs,
        ));
    }

    if card.soa_mentioned {
        factors.push(Factor::positive("SOA Mentioned", 8));
    } else {
        factors.push(Factor::negative("SOA Missing", -20));
    }

    factors.push(match card.benefits_status {
        CoverageStatus::Full => Factor::positive("Full Benefits Review", 8),
        CoverageStatus::Partial => Factor::negative("Partial Benefits Review", -10),
        CoverageStatus::None => Factor::negative("No Benefits Review", -20),
    });

    if let Some(intro) = &card.intro {
        factors.push(match intro.status {
            CoverageStatus::Full => Factor::positive("Complete Intro", 5),
            CoverageStatus::Partial => Factor::negative("Incomplete Intro", -5),
            CoverageStatus::None => Factor::negative("Missing Intro", -10),
        });
    }

    if card.healthcare_decisions_asked == Some(true) {
        factors.push(Factor::positive("Healthcare Decisions Asked", 3));
    }

    if card.referral_asked == Some(true) {
        factors.push(Factor::positive("Referral Ask", 3));
    }

    if card.review_requested == Some(true) {
        factors.push(Factor::positive("Review Request", 2));
    }

    let fillers = capped(card.filler_total, FILLER_POINTS, FILLER_CAP);
    if fillers > 0 {
        factors.push(Factor::negative(
            format!("Filler Words ({})", card.filler_total),
            -fillers,
        ));
    }

    if card.avg_sentence_words > RAMBLING_SENTENCE_WORDS {
        factors.push(Factor::negative("Rambling Sentences", -5));
    }

    if let Some(pauses) = &card.pauses {
        if pauses.long_pauses > LONG_PAUSE_LIMIT {
            factors.push(Factor::negative(
                format!("Long Pauses ({})", pauses.long_pauses),
                -5,
            ));
        }
    }

    if let Some(missed) = card.objections_missed.filter(|&n| n > 0) {
        factors.push(Factor::negative(
            format!("Missed Objections ({})", missed),
            -capped(missed, MISSED_OBJECTION_POINTS, MISSED_OBJECTION_CAP),
        ));
    }

    factors
}

/// Rank the rubric factors for one scorecard.
///
/// Pure and deterministic. Positive factors are ordered by descending impact
/// and negative factors by ascending impact; both sorts are stable, so equal
/// impacts keep rubric order. Each side keeps at most three factors. Rules
/// whose sub-model was not computed (`intro`, `pauses`) are skipped.
pub fn attribute(card: &Scorecard) -> ScoreFactors {
    let (mut top, mut bottom): (Vec<Factor>, Vec<Factor>) = evaluate_rules(card)
        .into_iter()
        .partition(|f| f.sign == FactorSign::Positive);

    top.sort_by(|a, b| b.impact.cmp(&a.impact));
    bottom.sort_by_key(|f| f.impact);

    top.truncate(MAX_FACTORS);
    bottom.truncate(MAX_FACTORS);

    ScoreFactors { top, bottom }
}
