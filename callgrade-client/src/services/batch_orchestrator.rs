//! Batch orchestrator
//!
//! Runs a fixed job list against the analysis service, strictly in input
//! order with one upload in flight at a time. A failed job is recorded and the
//! run moves on; a run always finishes its list.
//!
//! Run state: `Idle → Running → Idle`. The `BatchRun` snapshot is owned by the
//! running task and copied onto the event bus after every step.

use callgrade_common::batch::{BatchJob, BatchRun, RunState};
use callgrade_common::events::{BatchEvent, BatchEventBus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use super::analysis_client::AnalysisService;

/// Reasons a run is refused before it starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("A batch run is already in progress")]
    AlreadyRunning,

    #[error("No files to process")]
    NoJobs,
}

/// Clears the running flag however the run future ends
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Sequential batch runner
pub struct BatchOrchestrator<S: AnalysisService + ?Sized> {
    service: Arc<S>,
    events: BatchEventBus,
    running: AtomicBool,
}

impl<S: AnalysisService + ?Sized> BatchOrchestrator<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self::with_event_bus(service, BatchEventBus::default())
    }

    pub fn with_event_bus(service: Arc<S>, events: BatchEventBus) -> Self {
        Self {
            service,
            events,
            running: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> RunState {
        if self.running.load(Ordering::SeqCst) {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    /// Subscribe to progress of future runs
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<BatchEvent> {
        self.events.subscribe()
    }

    /// Process every job and return the final snapshot.
    ///
    /// Refused with `NoJobs` for an empty list and with `AlreadyRunning` while
    /// another run is active; neither touches the active run.
    pub async fn run(&self, jobs: Vec<BatchJob>) -> Result<BatchRun, BatchError> {
        if jobs.is_empty() {
            return Err(BatchError::NoJobs);
        }

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Batch submission rejected: run already in progress");
            return Err(BatchError::AlreadyRunning);
        }
        let guard = RunningGuard(&self.running);

        let start_time = std::time::Instant::now();
        let mut run = BatchRun::new(&jobs);

        tracing::info!(total = run.total, "Starting batch run");
        self.events.emit_lossy(BatchEvent::RunStarted {
            snapshot: run.clone(),
        });

        for (index, job) in jobs.iter().enumerate() {
            run.start_job(index);
            self.events.emit_lossy(BatchEvent::JobStarted {
                index,
                filename: job.filename.clone(),
                snapshot: run.clone(),
            });

            tracing::debug!(
                index,
                file = %job.filename,
                rep_name = %job.rep_name,
                call_type = %job.call_type,
                "Submitting job"
            );

            let error = match self.service.submit_call(job).await {
                Ok(result) => {
                    tracing::info!(
                        file = %job.filename,
                        score = result.scores.score,
                        "Job succeeded"
                    );
                    run.record_success(index, result);
                    None
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::warn!(file = %job.filename, error = %message, "Job failed");
                    run.record_failure(index, message.clone());
                    Some(message)
                }
            };

            self.events.emit_lossy(BatchEvent::JobFinished {
                index,
                filename: job.filename.clone(),
                error,
                snapshot: run.clone(),
            });
        }

        tracing::info!(
            total = run.total,
            succeeded = run.results.len(),
            failed = run.errors.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Batch run completed"
        );

        drop(guard);
        self.events.emit_lossy(BatchEvent::RunCompleted {
            snapshot: run.clone(),
        });

        Ok(run)
    }
}
