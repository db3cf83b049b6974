//! Batch manifest (TOML)
//!
//! ```toml
//! rep_name = "tank5"        # default for jobs that leave it out
//! call_type = "Medicare"
//!
//! [[job]]
//! file = "calls/monday.mp3"
//!
//! [[job]]
//! file = "/abs/tuesday.wav"
//! rep_name = "rookie2"
//! ```
//!
//! Relative `file` paths are resolved against the manifest's directory.

use callgrade_common::batch::BatchJob;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    rep_name: Option<String>,
    #[serde(default)]
    call_type: Option<String>,
    #[serde(default)]
    job: Vec<ManifestJob>,
}

#[derive(Debug, Deserialize)]
struct ManifestJob {
    file: PathBuf,
    rep_name: Option<String>,
    call_type: Option<String>,
}

/// Parse manifest text; relative paths are joined onto `base_dir`
pub fn parse_manifest(content: &str, base_dir: &Path) -> ClientResult<Vec<BatchJob>> {
    let manifest: ManifestFile =
        toml::from_str(content).map_err(|e| ClientError::Manifest(e.to_string()))?;

    let default_rep = manifest.rep_name.unwrap_or_default();
    let default_type = manifest.call_type.unwrap_or_default();

    let jobs = manifest
        .job
        .into_iter()
        .map(|entry| {
            let file = if entry.file.is_absolute() {
                entry.file
            } else {
                base_dir.join(entry.file)
            };
            BatchJob::new(file)
                .with_rep_name(entry.rep_name.unwrap_or_else(|| default_rep.clone()))
                .with_call_type(entry.call_type.unwrap_or_else(|| default_type.clone()))
        })
        .collect();

    Ok(jobs)
}

/// Read and parse a manifest file
pub fn load_manifest(path: &Path) -> ClientResult<Vec<BatchJob>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ClientError::Manifest(format!("{}: {}", path.display(), e)))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let jobs = parse_manifest(&content, base_dir)?;
    tracing::debug!(path = %path.display(), jobs = jobs.len(), "Loaded batch manifest");
    Ok(jobs)
}
