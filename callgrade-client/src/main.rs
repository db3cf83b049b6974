//! callgrade - command-line client for the call analysis service
//!
//! - `grade`: upload one call and print its detail report
//! - `batch`: upload many calls in order, print the results table, export CSV
//! - `show`: render a saved result offline
//! - `pdf`: download the printable scorecard for a call

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use callgrade_client::render::{BatchTable, DetailView, ProgressLine};
use callgrade_client::services::{submit_single, AnalysisClient, BatchOrchestrator};
use callgrade_client::{export, manifest};
use callgrade_common::batch::{set_all_call_types, set_all_rep_names, BatchJob};
use callgrade_common::config::{self, TomlConfig, API_BASE_ENV};
use callgrade_common::events::BatchEvent;
use callgrade_common::scorecard::CallResult;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for callgrade
#[derive(Parser, Debug)]
#[command(name = "callgrade")]
#[command(about = "Grade sales calls with an explainable scorecard")]
#[command(version)]
struct Cli {
    /// Analysis service base URL (overrides env and config file)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Config file (default: <config dir>/callgrade/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload one call and print its scorecard
    Grade {
        file: PathBuf,
        #[arg(long, default_value = "")]
        rep_name: String,
        #[arg(long, default_value = "")]
        call_type: String,
        /// Include the transcript in the report
        #[arg(long)]
        transcript: bool,
        /// Print the raw result as JSON instead of the report
        #[arg(long)]
        json: bool,
    },

    /// Upload several calls, one at a time, in the order given
    Batch {
        files: Vec<PathBuf>,
        /// TOML manifest with [[job]] entries (added after FILES)
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Set the rep name on every job
        #[arg(long)]
        rep_name: Option<String>,
        /// Set the call type on every job
        #[arg(long)]
        call_type: Option<String>,
        /// Write call_grades_<date>.csv when the run finishes
        #[arg(long)]
        export_csv: bool,
        /// Directory for the CSV export
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Print the detail report for this file after the table
        #[arg(long)]
        detail: Option<String>,
    },

    /// Render a saved result JSON without contacting the service
    Show {
        result: PathBuf,
        #[arg(long)]
        transcript: bool,
    },

    /// Download the PDF scorecard for a call
    Pdf {
        call_id: String,
        /// Output path (default: <CALL_ID>.pdf)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (toml_config, config_warning) = TomlConfig::load_or_default(cli.config.as_deref());

    // Logs go to stderr so reports on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(warning) = config_warning {
        warn!("{}", warning);
    }

    let api_base = config::resolve_api_base(cli.api_base.as_deref(), API_BASE_ENV, &toml_config);
    info!(api_base = %api_base, "Using analysis service");

    let client = AnalysisClient::new(api_base).context("Failed to create analysis client")?;

    match cli.command {
        Command::Grade {
            file,
            rep_name,
            call_type,
            transcript,
            json,
        } => grade(&client, file, rep_name, call_type, transcript, json).await,
        Command::Batch {
            files,
            manifest: manifest_path,
            rep_name,
            call_type,
            export_csv,
            out_dir,
            detail,
        } => {
            let mut jobs: Vec<BatchJob> = files.into_iter().map(BatchJob::new).collect();
            if let Some(path) = manifest_path {
                jobs.extend(manifest::load_manifest(&path).context("Failed to load manifest")?);
            }
            if let Some(rep_name) = rep_name {
                set_all_rep_names(&mut jobs, &rep_name);
            }
            if let Some(call_type) = call_type {
                set_all_call_types(&mut jobs, &call_type);
            }
            batch(client, jobs, export_csv.then_some(out_dir), detail).await
        }
        Command::Show { result, transcript } => show(&result, transcript),
        Command::Pdf { call_id, out } => {
            let dest = out.unwrap_or_else(|| PathBuf::from(format!("{}.pdf", call_id)));
            let bytes = client
                .download_pdf(&call_id, &dest)
                .await
                .with_context(|| format!("Failed to download {}", client.pdf_url(&call_id)))?;
            println!("Saved {} ({} bytes)", dest.display(), bytes);
            Ok(())
        }
    }
}

async fn grade(
    client: &AnalysisClient,
    file: PathBuf,
    rep_name: String,
    call_type: String,
    transcript: bool,
    json: bool,
) -> Result<()> {
    let job = BatchJob::new(file)
        .with_rep_name(rep_name)
        .with_call_type(call_type);

    let outcome = submit_single(client, &job).await;
    eprintln!("{}", outcome.status);

    let Some(result) = outcome.result else {
        if let Some(raw) = outcome.raw_error.filter(|r| !r.is_empty()) {
            eprintln!("{}", raw);
        }
        bail!("{}", outcome.status);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let view = DetailView::new(&result)
            .with_pdf_url(client.pdf_url(&result.call_id))
            .with_transcript(transcript);
        print!("{}", view);
    }
    Ok(())
}

async fn batch(
    client: AnalysisClient,
    jobs: Vec<BatchJob>,
    export_dir: Option<PathBuf>,
    detail: Option<String>,
) -> Result<()> {
    let orchestrator = BatchOrchestrator::new(Arc::new(client));

    let mut rx = orchestrator.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match &event {
                BatchEvent::JobFinished {
                    filename,
                    error: Some(error),
                    ..
                } => eprintln!("Failed: {}: {}", filename, error),
                BatchEvent::RunCompleted { snapshot } => {
                    eprintln!("{}", ProgressLine(snapshot));
                    break;
                }
                _ => eprintln!("{}", ProgressLine(event.snapshot())),
            }
        }
    });

    let run = orchestrator.run(jobs).await?;
    if let Err(e) = printer.await {
        warn!("Progress printer stopped: {}", e);
    }

    print!("{}", BatchTable(&run));

    if let Some(dir) = export_dir {
        if run.results.is_empty() {
            eprintln!("No results to export");
        } else {
            let date = chrono::Utc::now().date_naive();
            let path = export::write_csv(&run.results, &dir, date)
                .with_context(|| format!("Failed to export CSV to {}", dir.display()))?;
            println!("Exported {}", path.display());
        }
    }

    if let Some(name) = detail {
        match run.results.iter().find(|r| r.display_name() == name) {
            Some(result) => {
                println!();
                print!("{}", DetailView::new(result));
            }
            None => eprintln!("No result for {}", name),
        }
    }

    Ok(())
}

fn show(path: &Path, transcript: bool) -> Result<()> {
    let result = CallResult::load_json(path)
        .with_context(|| format!("Failed to load result {}", path.display()))?;
    print!("{}", DetailView::new(&result).with_transcript(transcript));
    Ok(())
}
