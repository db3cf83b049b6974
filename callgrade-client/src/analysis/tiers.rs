//! Badge tiers for scores and sub-models

use callgrade_common::scorecard::CoverageStatus;
use serde::Serialize;

/// Overall score tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScoreTier {
    Good,
    Warn,
    Bad,
}

impl ScoreTier {
    /// `Good` at 80+, `Warn` at 60+, otherwise `Bad`
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreTier::Good
        } else if score >= 60.0 {
            ScoreTier::Warn
        } else {
            ScoreTier::Bad
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreTier::Good => "GOOD",
            ScoreTier::Warn => "WARN",
            ScoreTier::Bad => "BAD",
        }
    }
}

/// Badge style for panel values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Good,
    Warn,
    Bad,
    Neutral,
}

impl Badge {
    /// Marker used in text output
    pub fn marker(self) -> &'static str {
        match self {
            Badge::Good => "+",
            Badge::Warn => "~",
            Badge::Bad => "!",
            Badge::Neutral => " ",
        }
    }
}

pub fn coverage_badge(status: CoverageStatus) -> Badge {
    match status {
        CoverageStatus::Full => Badge::Good,
        CoverageStatus::Partial => Badge::Warn,
        CoverageStatus::None => Badge::Bad,
    }
}

pub fn energy_badge(overall: f64) -> Badge {
    if overall >= 75.0 {
        Badge::Good
    } else if overall >= 50.0 {
        Badge::Neutral
    } else {
        Badge::Warn
    }
}

pub fn warmth_badge(score: f64) -> Badge {
    if score >= 70.0 {
        Badge::Good
    } else if score >= 50.0 {
        Badge::Neutral
    } else {
        Badge::Warn
    }
}

/// Level bucket for 0-100 sub-score bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarLevel {
    High,
    Medium,
    Low,
}

pub fn bar_level(score: f64) -> BarLevel {
    if score >= 75.0 {
        BarLevel::High
    } else if score >= 50.0 {
        BarLevel::Medium
    } else {
        BarLevel::Low
    }
}
