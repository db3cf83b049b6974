//! Batch run model
//!
//! A batch run walks a fixed list of upload jobs one at a time. The run
//! snapshot (`BatchRun`) is the only state mutated while a run is active; it is
//! owned by the orchestrator and copied out to observers after every step.
//!
//! Per-job state machine: `Pending → InFlight → Succeeded | Failed`.
//! Run state machine: `Idle → Running → Idle`.

use crate::scorecard::CallResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One user-supplied upload job
///
/// Editable until submitted. Once a run starts the job list is moved into the
/// orchestrator and never changes; outcomes live in `BatchRun`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    /// Audio file to upload
    pub file: PathBuf,
    /// Display name, derived from the file path
    pub filename: String,
    pub rep_name: String,
    pub call_type: String,
}

impl BatchJob {
    /// New job with empty rep name and call type
    pub fn new(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let filename = display_filename(&file);
        Self {
            file,
            filename,
            rep_name: String::new(),
            call_type: String::new(),
        }
    }

    pub fn with_rep_name(mut self, rep_name: impl Into<String>) -> Self {
        self.rep_name = rep_name.into();
        self
    }

    pub fn with_call_type(mut self, call_type: impl Into<String>) -> Self {
        self.call_type = call_type.into();
        self
    }
}

fn display_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Apply one rep name to every job in the list
pub fn set_all_rep_names(jobs: &mut [BatchJob], rep_name: &str) {
    for job in jobs {
        job.rep_name = rep_name.to_string();
    }
}

/// Apply one call type to every job in the list
pub fn set_all_call_types(jobs: &mut [BatchJob], call_type: &str) {
    for job in jobs {
        job.call_type = call_type.to_string();
    }
}

/// Run-level state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// Per-job state within a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobState {
    #[default]
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// Progress entry for one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    pub filename: String,
    pub state: JobState,
}

/// A job that failed, with the diagnostic that was surfaced for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    pub filename: String,
    pub error: String,
}

/// Snapshot of one batch run
///
/// Invariants after every update:
/// - `completed == results.len() + errors.len()`
/// - `completed` never decreases
/// - `current` is `None` exactly when no job is in flight
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRun {
    pub total: usize,
    pub completed: usize,
    /// File name of the job in flight
    pub current: Option<String>,
    /// Successful results in job order, each tagged with its file name.
    /// Shared so that snapshot copies do not duplicate transcripts.
    pub results: Vec<Arc<CallResult>>,
    /// Failed jobs in job order
    pub errors: Vec<JobError>,
    pub jobs: Vec<JobProgress>,
}

impl BatchRun {
    /// Fresh snapshot with every job pending
    pub fn new(jobs: &[BatchJob]) -> Self {
        Self {
            total: jobs.len(),
            completed: 0,
            current: None,
            results: Vec::new(),
            errors: Vec::new(),
            jobs: jobs
                .iter()
                .map(|j| JobProgress {
                    filename: j.filename.clone(),
                    state: JobState::Pending,
                })
                .collect(),
        }
    }

    /// Mark job `index` as in flight
    pub fn start_job(&mut self, index: usize) {
        if let Some(job) = self.jobs.get_mut(index) {
            job.state = JobState::InFlight;
            self.current = Some(job.filename.clone());
        }
    }

    /// Record a successful job, tagging the result with the job's file name
    pub fn record_success(&mut self, index: usize, mut result: CallResult) {
        let Some(job) = self.jobs.get_mut(index) else {
            return;
        };
        job.state = JobState::Succeeded;
        result.filename = Some(job.filename.clone());
        self.results.push(Arc::new(result));
        self.finish_job();
    }

    /// Record a failed job
    pub fn record_failure(&mut self, index: usize, error: impl Into<String>) {
        let Some(job) = self.jobs.get_mut(index) else {
            return;
        };
        job.state = JobState::Failed;
        self.errors.push(JobError {
            filename: job.filename.clone(),
            error: error.into(),
        });
        self.finish_job();
    }

    fn finish_job(&mut self) {
        self.completed += 1;
        self.current = None;
    }

    /// True when the completed count agrees with the recorded outcomes and
    /// with the number of jobs in a terminal state
    pub fn is_consistent(&self) -> bool {
        let terminal = self.jobs.iter().filter(|j| j.state.is_terminal()).count();
        self.completed == self.results.len() + self.errors.len() && self.completed == terminal
    }

    /// True once every job has an outcome
    pub fn is_finished(&self) -> bool {
        self.completed == self.total
    }

    /// Percentage complete (0.0 - 100.0)
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.completed as f64 / self.total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs() -> Vec<BatchJob> {
        vec![
            BatchJob::new("/calls/monday/a.mp3"),
            BatchJob::new("b.wav"),
        ]
    }

    #[test]
    fn test_job_filename_from_path() {
        let job = BatchJob::new("/calls/monday/a.mp3");
        assert_eq!(job.filename, "a.mp3");
        assert!(job.rep_name.is_empty());
    }

    #[test]
    fn test_set_all_applies_to_every_job() {
        let mut jobs = jobs();
        set_all_rep_names(&mut jobs, "tank5");
        set_all_call_types(&mut jobs, "Medicare");
        assert!(jobs.iter().all(|j| j.rep_name == "tank5"));
        assert!(jobs.iter().all(|j| j.call_type == "Medicare"));
    }

    #[test]
    fn test_run_transitions_keep_invariants() {
        let jobs = jobs();
        let mut run = BatchRun::new(&jobs);
        assert_eq!(run.total, 2);
        assert!(run.current.is_none());

        run.start_job(0);
        assert_eq!(run.current.as_deref(), Some("a.mp3"));
        assert_eq!(run.jobs[0].state, JobState::InFlight);
        assert!(run.is_consistent());

        run.record_success(0, CallResult::default());
        assert!(run.current.is_none());
        assert_eq!(run.results[0].filename.as_deref(), Some("a.mp3"));
        assert!(run.is_consistent());

        run.start_job(1);
        run.record_failure(1, "503 Service Unavailable");
        assert_eq!(run.jobs[1].state, JobState::Failed);
        assert_eq!(run.errors[0].filename, "b.wav");
        assert!(run.is_consistent());
        assert!(run.is_finished());
        assert_eq!(run.percentage(), 100.0);
    }

    #[test]
    fn test_consistency_counts_terminal_jobs() {
        let mut run = BatchRun::new(&jobs());
        run.start_job(0);
        run.record_success(0, CallResult::default());
        assert!(run.is_consistent());

        run.jobs[0].state = JobState::InFlight;
        assert!(!run.is_consistent());
        assert!(!JobState::Pending.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }

    #[test]
    fn test_snapshot_copies_share_results() {
        let mut run = BatchRun::new(&jobs());
        run.start_job(0);
        run.record_success(
            0,
            CallResult {
                transcript: "a long transcript".to_string(),
                ..Default::default()
            },
        );

        let copy = run.clone();
        assert!(Arc::ptr_eq(&run.results[0], &copy.results[0]));
        assert_eq!(copy.results[0].transcript, "a long transcript");
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut run = BatchRun::new(&jobs());
        run.record_failure(7, "nope");
        assert_eq!(run.completed, 0);
        assert!(run.is_consistent());
    }
}
