//! Single-call upload
//!
//! One file, one request. Failures are reported as a short status line plus
//! the raw diagnostic; nothing here touches batch state.

use callgrade_common::batch::BatchJob;
use callgrade_common::scorecard::CallResult;
use serde::Serialize;

use super::analysis_client::{AnalysisError, AnalysisService};

pub const STATUS_NO_FILE: &str = "Pick an audio file first.";
pub const STATUS_UPLOADING: &str = "Uploading / transcribing… (big files take a bit)";
pub const STATUS_NETWORK_FAILED: &str = "Upload failed (network error). Is the backend running?";
pub const STATUS_DONE: &str = "Done.";

/// What the user sees after a single submission
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub status: String,
    /// Service body or transport diagnostic for failed uploads
    pub raw_error: Option<String>,
    pub result: Option<CallResult>,
}

impl UploadOutcome {
    fn failed(status: impl Into<String>, raw_error: Option<String>) -> Self {
        Self {
            status: status.into(),
            raw_error,
            result: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

/// Submit one call and map the outcome to user-facing status text
pub async fn submit_single<S: AnalysisService + ?Sized>(
    service: &S,
    job: &BatchJob,
) -> UploadOutcome {
    if !job.file.is_file() {
        tracing::warn!(file = %job.file.display(), "No audio file to upload");
        return UploadOutcome::failed(STATUS_NO_FILE, None);
    }

    tracing::info!(file = %job.filename, "{}", STATUS_UPLOADING);

    match service.submit_call(job).await {
        Ok(result) => UploadOutcome {
            status: STATUS_DONE.to_string(),
            raw_error: None,
            result: Some(result),
        },
        Err(AnalysisError::Service {
            status,
            reason,
            body,
        }) => {
            tracing::warn!(file = %job.filename, status, "Upload rejected by service");
            UploadOutcome::failed(format!("Upload failed: {} {}", status, reason), Some(body))
        }
        Err(AnalysisError::File { path, source }) => {
            tracing::warn!(file = %path.display(), error = %source, "Audio file unreadable");
            UploadOutcome::failed(STATUS_NO_FILE, Some(source.to_string()))
        }
        Err(e) => {
            tracing::warn!(file = %job.filename, error = %e, "Upload failed");
            UploadOutcome::failed(STATUS_NETWORK_FAILED, Some(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    enum Reply {
        Ok,
        Service,
        Network,
    }

    struct FixedService(Reply);

    #[async_trait]
    impl AnalysisService for FixedService {
        async fn submit_call(&self, job: &BatchJob) -> Result<CallResult, AnalysisError> {
            match self.0 {
                Reply::Ok => Ok(CallResult {
                    call_id: "c-9".to_string(),
                    rep_name: job.rep_name.clone(),
                    ..Default::default()
                }),
                Reply::Service => Err(AnalysisError::Service {
                    status: 422,
                    reason: "Unprocessable Entity".to_string(),
                    body: "{\"detail\":\"bad audio\"}".to_string(),
                }),
                Reply::Network => Err(AnalysisError::Network("connection refused".to_string())),
            }
        }
    }

    fn audio_job(dir: &tempfile::TempDir) -> BatchJob {
        let path = dir.path().join("call.mp3");
        std::fs::write(&path, b"ID3").unwrap();
        BatchJob::new(path).with_rep_name("tank5")
    }

    #[tokio::test]
    async fn test_missing_file_never_contacts_service() {
        struct Unreachable;

        #[async_trait]
        impl AnalysisService for Unreachable {
            async fn submit_call(&self, _job: &BatchJob) -> Result<CallResult, AnalysisError> {
                panic!("service must not be called");
            }
        }

        let outcome = submit_single(&Unreachable, &BatchJob::new("/nope/missing.mp3")).await;
        assert_eq!(outcome.status, STATUS_NO_FILE);
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_success() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = submit_single(&FixedService(Reply::Ok), &audio_job(&dir)).await;
        assert_eq!(outcome.status, "Done.");
        assert!(outcome.raw_error.is_none());
        let result = outcome.result.unwrap();
        assert_eq!(result.call_id, "c-9");
        assert!(result.filename.is_none());
    }

    #[tokio::test]
    async fn test_service_failure_status_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = submit_single(&FixedService(Reply::Service), &audio_job(&dir)).await;
        assert_eq!(outcome.status, "Upload failed: 422 Unprocessable Entity");
        assert_eq!(outcome.raw_error.as_deref(), Some("{\"detail\":\"bad audio\"}"));
    }

    #[tokio::test]
    async fn test_network_failure() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = submit_single(&FixedService(Reply::Network), &audio_job(&dir)).await;
        assert_eq!(outcome.status, STATUS_NETWORK_FAILED);
        assert!(outcome.raw_error.unwrap().contains("connection refused"));
    }
}
