//! Batch flow tests: manifest → orchestrator → progress events → CSV export
//!
//! Uses an in-memory analysis service so no backend is needed.

use async_trait::async_trait;
use callgrade_client::export::write_csv;
use callgrade_client::manifest::load_manifest;
use callgrade_client::render::{BatchTable, ProgressLine};
use callgrade_client::services::{AnalysisError, AnalysisService, BatchOrchestrator};
use callgrade_common::batch::{set_all_call_types, BatchJob, JobState, RunState};
use callgrade_common::events::BatchEvent;
use callgrade_common::scorecard::CallResult;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

/// Scores a call by file size; files named `bad*` are rejected by the service,
/// files that do not exist fail before upload.
struct FakeService;

#[async_trait]
impl AnalysisService for FakeService {
    async fn submit_call(&self, job: &BatchJob) -> Result<CallResult, AnalysisError> {
        let bytes = tokio::fs::read(&job.file)
            .await
            .map_err(|source| AnalysisError::File {
                path: job.file.clone(),
                source,
            })?;

        // let other tasks observe the in-flight state
        tokio::time::sleep(Duration::from_millis(5)).await;

        if job.filename.starts_with("bad") {
            return Err(AnalysisError::Service {
                status: 500,
                reason: "Internal Server Error".to_string(),
                body: "transcription failed".to_string(),
            });
        }

        let json = format!(
            r#"{{"call_id": "id-{}", "rep_name": "{}", "call_type": "{}",
                "scores": {{"score": {}, "soa_mentioned": true}}}}"#,
            job.filename,
            job.rep_name,
            job.call_type,
            50 + bytes.len()
        );
        serde_json::from_str(&json).map_err(|e| AnalysisError::Parse(e.to_string()))
    }
}

#[tokio::test]
async fn test_manifest_batch_with_failures_and_export() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.mp3"), vec![0u8; 30]).unwrap();
    std::fs::write(dir.path().join("bad.mp3"), vec![0u8; 10]).unwrap();
    std::fs::write(dir.path().join("c.wav"), vec![0u8; 40]).unwrap();

    let manifest = dir.path().join("batch.toml");
    std::fs::write(
        &manifest,
        r#"
rep_name = "tank5"

[[job]]
file = "a.mp3"

[[job]]
file = "bad.mp3"

[[job]]
file = "missing.mp3"

[[job]]
file = "c.wav"
rep_name = "rookie2"
"#,
    )
    .unwrap();

    let mut jobs = load_manifest(&manifest).unwrap();
    set_all_call_types(&mut jobs, "Medicare");

    let orchestrator = BatchOrchestrator::new(Arc::new(FakeService));
    let run = orchestrator.run(jobs).await.unwrap();

    assert_eq!(run.total, 4);
    assert_eq!(run.completed, 4);
    assert!(run.is_consistent());
    assert!(run.current.is_none());

    let names: Vec<&str> = run.results.iter().map(|r| r.display_name()).collect();
    assert_eq!(names, vec!["a.mp3", "c.wav"]);
    assert_eq!(run.results[0].rep_name, "tank5");
    assert_eq!(run.results[1].rep_name, "rookie2");
    assert_eq!(run.results[1].call_type, "Medicare");
    assert_eq!(run.results[1].scores.score, 90.0);

    assert_eq!(run.errors.len(), 2);
    assert_eq!(run.errors[0].filename, "bad.mp3");
    assert_eq!(run.errors[0].error, "500 Internal Server Error: transcription failed");
    assert_eq!(run.errors[1].filename, "missing.mp3");
    assert!(run.errors[1].error.contains("missing.mp3"));

    let states: Vec<JobState> = run.jobs.iter().map(|j| j.state).collect();
    assert_eq!(
        states,
        vec![
            JobState::Succeeded,
            JobState::Failed,
            JobState::Failed,
            JobState::Succeeded
        ]
    );

    let table = BatchTable(&run).to_string();
    assert!(table.starts_with("Results (2 calls)"));
    assert!(table.contains("Errors (2):"));

    let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    let path = write_csv(&run.results, dir.path(), date).unwrap();
    assert!(path.ends_with("call_grades_2026-10-17.csv"));
    let csv = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("a.mp3,tank5,Medicare,80,Yes,none,N/A,"));
    assert!(lines[2].ends_with(",N/A,N/A"));
}

#[tokio::test]
async fn test_concurrent_subscribers_see_consistent_progress() {
    let dir = tempfile::tempdir().unwrap();
    let mut jobs = Vec::new();
    for i in 0..5 {
        let name = if i == 2 {
            "bad-2.mp3".to_string()
        } else {
            format!("call-{}.mp3", i)
        };
        let path = dir.path().join(&name);
        std::fs::write(&path, b"audio").unwrap();
        jobs.push(BatchJob::new(path));
    }

    let orchestrator = Arc::new(BatchOrchestrator::new(Arc::new(FakeService)));

    let mut watchers = Vec::new();
    for _ in 0..3 {
        let mut rx = orchestrator.subscribe();
        watchers.push(tokio::spawn(async move {
            let mut lines = Vec::new();
            let mut last_completed = 0;
            while let Ok(event) = rx.recv().await {
                let snapshot = event.snapshot();
                assert!(snapshot.is_consistent());
                assert!(snapshot.completed >= last_completed);
                last_completed = snapshot.completed;
                lines.push(ProgressLine(snapshot).to_string());
                if matches!(event, BatchEvent::RunCompleted { .. }) {
                    break;
                }
            }
            lines
        }));
    }

    let runner = orchestrator.clone();
    let handle = tokio::spawn(async move { runner.run(jobs).await });

    // observe the run from outside while it is active
    let mut saw_running = false;
    for _ in 0..100 {
        if orchestrator.state() == RunState::Running {
            saw_running = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let run = handle.await.unwrap().unwrap();
    assert!(saw_running);
    assert_eq!(run.completed, 5);
    assert_eq!(run.results.len(), 4);
    assert_eq!(run.errors[0].filename, "bad-2.mp3");
    assert_eq!(orchestrator.state(), RunState::Idle);

    for watcher in watchers {
        let lines = watcher.await.unwrap();
        // start + 2 per job + completed
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "Progress: 0 / 5 (0%)");
        assert_eq!(lines[1], "Progress: 0 / 5 (0%)  Processing: call-0.mp3");
        assert_eq!(lines[11], "Progress: 5 / 5 (100%)");
    }
}
