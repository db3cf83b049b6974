//! Call analysis service client
//!
//! Uploads one audio file with its rep/call-type metadata and returns the
//! scored result. The service does the transcription and scoring; this side
//! only moves bytes and decodes the lenient result model.
//!
//! - `POST {base}/calls` (multipart: `file`, `rep_name`, `call_type`)
//! - `GET {base}/calls/{call_id}/pdf`

use async_trait::async_trait;
use callgrade_common::batch::BatchJob;
use callgrade_common::scorecard::CallResult;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use thiserror::Error;

const USER_AGENT: &str = concat!("callgrade/", env!("CARGO_PKG_VERSION"));

/// Analysis service errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Non-success HTTP status; `body` is whatever text the service returned
    #[error("{status} {reason}{}", body_suffix(.body))]
    Service {
        status: u16,
        reason: String,
        body: String,
    },

    /// Request never got a response
    #[error("Network error: {0}")]
    Network(String),

    #[error("File error for {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

/// Anything that can score one uploaded call
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn submit_call(&self, job: &BatchJob) -> Result<CallResult, AnalysisError>;
}

/// Content type sent for the uploaded file
pub fn audio_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" | "mp4" => "audio/mp4",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "webm" => "audio/webm",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

/// HTTP client for the analysis service
pub struct AnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Transcription of long calls can take minutes, so no request timeout is
    /// set.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn calls_url(&self) -> String {
        format!("{}/calls", self.base_url)
    }

    /// Printable report URL for a scored call
    pub fn pdf_url(&self, call_id: &str) -> String {
        format!("{}/calls/{}/pdf", self.base_url, call_id)
    }

    /// Upload one call and decode the scored result
    pub async fn upload(
        &self,
        file: &Path,
        rep_name: &str,
        call_type: &str,
    ) -> Result<CallResult, AnalysisError> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|source| AnalysisError::File {
                path: file.to_path_buf(),
                source,
            })?;

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::debug!(
            file = %file_name,
            bytes = bytes.len(),
            url = %self.calls_url(),
            "Uploading call"
        );

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(audio_mime(file))
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let form = Form::new()
            .part("file", part)
            .text("rep_name", rep_name.to_string())
            .text("call_type", call_type.to_string());

        let response = self
            .http_client
            .post(self.calls_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Service {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let result: CallResult = response
            .json()
            .await
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;

        tracing::info!(
            file = %file_name,
            call_id = %result.call_id,
            score = result.scores.score,
            "Call scored"
        );

        Ok(result)
    }

    /// Fetch the printable report and write it to `dest`; returns bytes written
    pub async fn download_pdf(&self, call_id: &str, dest: &Path) -> Result<u64, AnalysisError> {
        let url = self.pdf_url(call_id);
        tracing::debug!(call_id = %call_id, url = %url, "Fetching call report");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Service {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|source| AnalysisError::File {
                path: dest.to_path_buf(),
                source,
            })?;

        tracing::info!(call_id = %call_id, path = %dest.display(), "Saved call report");
        Ok(bytes.len() as u64)
    }
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    async fn submit_call(&self, job: &BatchJob) -> Result<CallResult, AnalysisError> {
        self.upload(&job.file, &job.rep_name, &job.call_type).await
    }
}
