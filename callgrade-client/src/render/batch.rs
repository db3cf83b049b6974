//! Batch progress line and results table

use callgrade_common::batch::BatchRun;
use std::fmt;

use super::or_dash;
use crate::analysis::tiers::ScoreTier;

/// `Progress: 2 / 5  Processing: c.mp3`
pub struct ProgressLine<'a>(pub &'a BatchRun);

impl fmt::Display for ProgressLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let run = self.0;
        write!(
            f,
            "Progress: {} / {} ({:.0}%)",
            run.completed,
            run.total,
            run.percentage()
        )?;
        if let Some(current) = &run.current {
            write!(f, "  Processing: {}", current)?;
        }
        Ok(())
    }
}

/// Results table plus the error list
pub struct BatchTable<'a>(pub &'a BatchRun);

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

impl fmt::Display for BatchTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let run = self.0;

        if !run.results.is_empty() {
            writeln!(f, "Results ({} calls)", run.results.len())?;
            writeln!(
                f,
                "{:<28} {:<12} {:>6} {:<5} {:<4} {:<9} {:<9} {:>6} {:>7}",
                "File", "Rep", "Score", "Tier", "SOA", "Benefits", "Intro", "Energy", "Talk %"
            )?;
            for r in &run.results {
                let card = &r.scores;
                writeln!(
                    f,
                    "{:<28} {:<12} {:>6} {:<5} {:<4} {:<9} {:<9} {:>6} {:>7}",
                    r.display_name(),
                    or_dash(&r.rep_name),
                    card.score,
                    ScoreTier::for_score(card.score).as_str(),
                    if card.soa_mentioned { "yes" } else { "no" },
                    card.benefits_status.as_str(),
                    card.intro
                        .as_ref()
                        .map(|i| i.status.as_str())
                        .unwrap_or("N/A"),
                    optional_number(card.energy.as_ref().map(|e| e.overall)),
                    optional_number(r.talk_ratio.as_ref().map(|t| t.agent_pct)),
                )?;
            }
        }

        if !run.errors.is_empty() {
            if !run.results.is_empty() {
                writeln!(f)?;
            }
            writeln!(f, "Errors ({}):", run.errors.len())?;
            for e in &run.errors {
                writeln!(f, "  {}: {}", e.filename, e.error)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callgrade_common::batch::BatchJob;
    use callgrade_common::scorecard::CallResult;

    fn finished_run() -> BatchRun {
        let jobs = vec![BatchJob::new("a.mp3"), BatchJob::new("b.mp3")];
        let mut run = BatchRun::new(&jobs);
        run.start_job(0);
        let result: CallResult =
            serde_json::from_str(r#"{"rep_name": "tank5", "scores": {"score": 82, "soa_mentioned": true}}"#)
                .unwrap();
        run.record_success(0, result);
        run.start_job(1);
        run.record_failure(1, "503 Service Unavailable");
        run
    }

    #[test]
    fn test_progress_line() {
        let jobs = vec![BatchJob::new("a.mp3"), BatchJob::new("b.mp3")];
        let mut run = BatchRun::new(&jobs);
        run.start_job(0);
        assert_eq!(
            ProgressLine(&run).to_string(),
            "Progress: 0 / 2 (0%)  Processing: a.mp3"
        );
        assert_eq!(
            ProgressLine(&finished_run()).to_string(),
            "Progress: 2 / 2 (100%)"
        );
    }

    #[test]
    fn test_table_rows_and_errors() {
        let text = BatchTable(&finished_run()).to_string();
        assert!(text.starts_with("Results (1 calls)"));
        let row = text.lines().find(|l| l.starts_with("a.mp3")).unwrap();
        assert!(row.contains("tank5"));
        assert!(row.contains("GOOD"));
        assert!(row.contains("N/A"));
        assert!(text.contains("Errors (1):\n  b.mp3: 503 Service Unavailable"));
    }

    #[test]
    fn test_empty_run_renders_nothing() {
        assert_eq!(BatchTable(&BatchRun::default()).to_string(), "");
    }
}
