//! Detail view for one scored call

use callgrade_common::human_time::{format_call_offset, format_seconds};
use callgrade_common::scorecard::{CallResult, Energy, PauseSummary, TalkRatio, Warmth};
use std::fmt;

use super::{or_dash, score_bar};
use crate::analysis::tiers::{coverage_badge, energy_badge, warmth_badge, ScoreTier};
use crate::analysis::{attribute, build_timeline, Factor};

const FOUND_WORDS_SHOWN: usize = 5;
const HEDGE_WORDS_SHOWN: usize = 8;

/// Full text report for one result: score, factors, panels, timeline
pub struct DetailView<'a> {
    result: &'a CallResult,
    pdf_url: Option<String>,
    show_transcript: bool,
}

impl<'a> DetailView<'a> {
    pub fn new(result: &'a CallResult) -> Self {
        Self {
            result,
            pdf_url: None,
            show_transcript: false,
        }
    }

    pub fn with_pdf_url(mut self, url: impl Into<String>) -> Self {
        self.pdf_url = Some(url.into());
        self
    }

    pub fn with_transcript(mut self, show: bool) -> Self {
        self.show_transcript = show;
        self
    }

    fn write_overall(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        let card = &r.scores;
        let tier = ScoreTier::for_score(card.score);

        writeln!(f, "== Overall Score ==")?;
        writeln!(f, "{}  [Score tier: {}]", card.score, tier.as_str())?;
        writeln!(f, "Call ID: {}", or_dash(&r.call_id))?;
        writeln!(f, "Rep: {} | Type: {}", or_dash(&r.rep_name), or_dash(&r.call_type))?;
        writeln!(
            f,
            "Questions: {} | Tie-downs: {} | Fillers: {} | Objections: {} | Rebuttals: {}",
            card.questions,
            card.tie_downs,
            card.filler_total,
            card.objection_hits,
            card.rebuttal_hits
        )?;

        let factors = attribute(card);
        writeln!(f)?;
        write_factor_list(f, "TOP 3 FACTORS", &factors.top, "No positive factors")?;
        write_factor_list(f, "BOTTOM 3 FACTORS", &factors.bottom, "No negative factors")?;

        if let Some(url) = &self.pdf_url {
            writeln!(f, "PDF scorecard: {}", url)?;
        }
        Ok(())
    }

    fn write_talk_ratio(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        match (&r.talk_ratio, r.diarization_enabled) {
            (Some(ratio), true) => write_talk_ratio_panel(f, ratio, &r.talk_coaching),
            _ => {
                writeln!(f, "== Talk Ratio ==")?;
                writeln!(f, "Speaker separation unavailable")?;
                if let Some(error) = r.diarization_error.as_deref().filter(|e| !e.is_empty()) {
                    writeln!(f, "  {}", error)?;
                }
                Ok(())
            }
        }
    }

    fn write_energy(&self, f: &mut fmt::Formatter<'_>, energy: &Energy) -> fmt::Result {
        let r = self.result;
        writeln!(f, "== Agent Energy ==")?;
        writeln!(
            f,
            "{} {} [{}]",
            energy.overall,
            energy_badge(energy.overall).marker(),
            or_dash(&energy.label)
        )?;

        let pace = &energy.speech_pace;
        write_bar(
            f,
            "Speech Pace",
            pace.score,
            &format!("{} words/sec, {}", pace.words_per_sec, pace.label),
        )?;
        write_bar(
            f,
            "Enthusiasm",
            energy.enthusiasm.score,
            &found_or(&energy.enthusiasm.words_found, "No enthusiasm words detected"),
        )?;
        write_bar(
            f,
            "Confidence",
            energy.confidence.score,
            &found_or(&energy.confidence.words_found, "No confidence words detected"),
        )?;
        write_bar(
            f,
            "Engagement",
            energy.engagement.score,
            &format!("{} questions asked", energy.engagement.questions),
        )?;
        write_bar(
            f,
            "Variation",
            energy.variation.score,
            &format!("Sentence length std dev: {}", energy.variation.std_dev),
        )?;
        if let Some(tone) = &r.voice_tone {
            write_bar(f, "Pitch Variation", tone.pitch_variation, &tone.label)?;
        }
        // energy.warmth_score and the warmth panel are separate signals
        if let Some(score) = energy.warmth_score {
            let label = r.warmth.as_ref().map(|w| w.label.as_str()).unwrap_or("");
            write_bar(f, "Warmth", score, label)?;
        }

        let hedge = &energy.hedge_penalty;
        if hedge.count > 0 {
            writeln!(f, "  Hedge Word Penalty: -{}", hedge.score)?;
            let words: Vec<&str> = hedge
                .words_found
                .iter()
                .take(HEDGE_WORDS_SHOWN)
                .map(String::as_str)
                .collect();
            writeln!(f, "    Found {}x: {}", hedge.count, words.join(", "))?;
        }

        if let Some(pauses) = &r.scores.pauses {
            write_pause_summary(f, pauses)?;
        }
        Ok(())
    }

    fn write_voice_and_warmth(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tone) = &self.result.voice_tone {
            writeln!(f)?;
            writeln!(f, "== Voice Tone ==")?;
            writeln!(f, "{} [{}]", tone.pitch_variation, or_dash(&tone.label))?;
        }
        if let Some(warmth) = &self.result.warmth {
            writeln!(f)?;
            write_warmth_panel(f, warmth)?;
        }
        Ok(())
    }

    fn write_timeline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Call Timeline ==")?;
        let timeline = build_timeline(&self.result.scores.evidence);
        if timeline.is_empty() {
            return writeln!(f, "No timestamped events found.");
        }
        for entry in &timeline {
            writeln!(
                f,
                "{:>6}  {:<24} {}",
                format_call_offset(entry.time),
                entry.label,
                entry.detail
            )?;
        }
        Ok(())
    }

    fn write_compliance(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = &self.result.scores;
        writeln!(f, "== Compliance Checklist ==")?;

        match &card.intro {
            Some(intro) => {
                write_check(
                    f,
                    "Intro",
                    &intro.status.as_str().to_uppercase(),
                    coverage_badge(intro.status).marker(),
                )?;
                if !intro.missing.is_empty() {
                    writeln!(f, "    Missing: {}", intro.missing.join(", "))?;
                }
            }
            None => write_check(f, "Intro", "N/A", " ")?,
        }

        let asked = |flag: Option<bool>| if flag.unwrap_or(false) { "ASKED" } else { "NOT ASKED" };
        write_check(f, "Healthcare Decisions", asked(card.healthcare_decisions_asked), "")?;
        write_check(
            f,
            "SOA (Scope of Appointment)",
            if card.soa_mentioned { "MENTIONED" } else { "MISSING" },
            "",
        )?;
        write_check(
            f,
            "Benefits Review",
            &card.benefits_status.as_str().to_uppercase(),
            coverage_badge(card.benefits_status).marker(),
        )?;
        if !card.benefit_terms_missing.is_empty() {
            writeln!(f, "    Missing: {}", card.benefit_terms_missing.join(", "))?;
        }
        write_check(f, "Referral Ask", asked(card.referral_asked), "")?;
        write_check(f, "Review Request", asked(card.review_requested), "")
    }

    fn write_fillers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Filler Words Summary ==")?;
        let fillers = &self.result.scores.top_fillers;
        if fillers.is_empty() {
            return writeln!(f, "No fillers detected.");
        }
        for (word, count) in fillers {
            writeln!(f, "  {}: {}", word, count)?;
        }
        Ok(())
    }
}

fn write_factor_list(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    factors: &[Factor],
    empty: &str,
) -> fmt::Result {
    writeln!(f, "{}", title)?;
    if factors.is_empty() {
        return writeln!(f, "  {}", empty);
    }
    for factor in factors {
        writeln!(f, "  {} {:+}", factor.label, factor.impact)?;
    }
    Ok(())
}

fn write_talk_ratio_panel(
    f: &mut fmt::Formatter<'_>,
    ratio: &TalkRatio,
    coaching: &[String],
) -> fmt::Result {
    writeln!(f, "== Talk Ratio (Agent vs Customer) ==")?;
    let agent = format!("Agent ({})", ratio.agent_speaker);
    writeln!(f, "  {:<20} {:>6}% {}", agent, ratio.agent_pct, score_bar(ratio.agent_pct))?;
    writeln!(
        f,
        "  {:<20} {:>6}% {}",
        "Customer",
        ratio.customer_pct,
        score_bar(ratio.customer_pct)
    )?;
    writeln!(f, "  Total duration: {}", format_seconds(ratio.total_seconds))?;
    if !coaching.is_empty() {
        writeln!(f, "  Coaching:")?;
        for tip in coaching {
            writeln!(f, "    - {}", tip)?;
        }
    }
    Ok(())
}

fn write_pause_summary(f: &mut fmt::Formatter<'_>, pauses: &PauseSummary) -> fmt::Result {
    if pauses.total_pauses == 0 {
        return Ok(());
    }
    write!(
        f,
        "  Pauses (5s+): {} pauses, {} total",
        pauses.total_pauses,
        format_seconds(pauses.total_pause_time)
    )?;
    if pauses.long_pauses > 0 {
        write!(f, " ({} long pauses 8s+)", pauses.long_pauses)?;
    }
    writeln!(f)
}

fn write_warmth_panel(f: &mut fmt::Formatter<'_>, warmth: &Warmth) -> fmt::Result {
    writeln!(f, "== Warmth Analysis ==")?;
    writeln!(
        f,
        "{} {} [{}]",
        warmth.score,
        warmth_badge(warmth.score).marker(),
        or_dash(&warmth.label)
    )?;
    write_bar(f, "Mirroring", warmth.mirroring, "Repeating customer's words")?;
    writeln!(f, "  Name Usage: {}x", warmth.name_usage)?;
    writeln!(f, "  Empathy Phrases: {}x", warmth.empathy_phrases)?;
    writeln!(f, "  Interruptions: {}x", warmth.interruptions)
}

fn write_bar(f: &mut fmt::Formatter<'_>, label: &str, score: f64, detail: &str) -> fmt::Result {
    writeln!(f, "  {:<16} {} {:>5}  {}", label, score_bar(score), score, detail)
}

fn write_check(f: &mut fmt::Formatter<'_>, label: &str, value: &str, marker: &str) -> fmt::Result {
    writeln!(f, "  {:<28} {} {}", label, value, marker)
}

fn found_or(words: &[String], none: &str) -> String {
    if words.is_empty() {
        none.to_string()
    } else {
        let shown: Vec<&str> = words.iter().take(FOUND_WORDS_SHOWN).map(String::as_str).collect();
        format!("Found: {}", shown.join(", "))
    }
}

impl fmt::Display for DetailView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        if r.filename.is_some() {
            writeln!(f, "Viewing: {}", r.display_name())?;
            writeln!(f)?;
        }

        self.write_overall(f)?;
        writeln!(f)?;
        self.write_talk_ratio(f)?;

        if let Some(energy) = &r.scores.energy {
            writeln!(f)?;
            self.write_energy(f, energy)?;
        }
        self.write_voice_and_warmth(f)?;

        writeln!(f)?;
        self.write_timeline(f)?;
        writeln!(f)?;
        self.write_compliance(f)?;
        writeln!(f)?;
        self.write_fillers(f)?;

        if self.show_transcript {
            writeln!(f)?;
            writeln!(f, "== Transcript ==")?;
            let text = if r.transcript.is_empty() {
                "(empty transcript)"
            } else {
                r.transcript.as_str()
            };
            writeln!(f, "{}", text)?;
        }
        Ok(())
    }
}
