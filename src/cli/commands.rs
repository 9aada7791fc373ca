//! CLI command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::audio::FfmpegExtractor;
use crate::cli::args::{ConfigCommand, RunOptions};
use crate::config::Settings;
use crate::llm::{build_backend, SummaryBackend};
use crate::pipeline::{discover_media, BatchPolicy, Pipeline};
use crate::summary::{Summarizer, SummaryHints, TiktokenCounter};
use crate::transcription::{build_transcriber, Transcriber};

/// Process a single media file
pub async fn process_file(
    settings: &Settings,
    input: &Path,
    options: RunOptions,
    hints: SummaryHints,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }

    let summarize = !options.no_summary;
    let output_dir = output_dir(settings, &options);
    let pipeline = build_pipeline(settings, &options, hints, summarize)?;

    println!("Processing {}...", input.display());
    let output = pipeline.process(input, summarize, &output_dir).await?;

    println!("Saved to {}", output.display());
    println!("Processing complete!");

    Ok(())
}

/// Process every media file in a directory
pub async fn batch_directory(
    settings: &Settings,
    directory: &Path,
    options: RunOptions,
    fail_fast: bool,
) -> Result<()> {
    if !directory.is_dir() {
        anyhow::bail!("Directory not found: {}", directory.display());
    }

    let files = discover_media(directory)?;
    if files.is_empty() {
        println!("No media files found in directory");
        return Ok(());
    }

    let summarize = !options.no_summary;
    let output_dir = output_dir(settings, &options);
    let policy = if fail_fast {
        BatchPolicy::FailFast
    } else {
        settings.batch_policy()
    };
    let pipeline = build_pipeline(settings, &options, settings.summary_hints(), summarize)?;

    let report = pipeline
        .batch_files(files, summarize, &output_dir, policy)
        .await?;

    for success in &report.succeeded {
        println!(
            "ok      {} -> {}",
            success.input.display(),
            success.output.display()
        );
    }
    for failure in &report.failed {
        println!("failed  {}: {}", failure.input.display(), failure.error);
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} files failed",
            report.failed.len(),
            report.total()
        );
    }

    println!("Processing complete!");
    Ok(())
}

fn output_dir(settings: &Settings, options: &RunOptions) -> PathBuf {
    options
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.general.output_dir.clone())
}

/// Wire the configured collaborators into a pipeline.
fn build_pipeline(
    settings: &Settings,
    options: &RunOptions,
    hints: SummaryHints,
    summarize: bool,
) -> Result<Pipeline> {
    let transcriber: Arc<dyn Transcriber> = Arc::from(build_transcriber(settings)?);
    let language = options.language.clone().or_else(|| settings.language());

    let mut pipeline = Pipeline::new(
        Arc::new(FfmpegExtractor::from_settings(settings)),
        transcriber,
    )
    .with_language(language);

    if summarize {
        let backend: Arc<dyn SummaryBackend> = Arc::from(build_backend(settings)?);
        let counter = Arc::new(TiktokenCounter::new()?);
        let summarizer = Summarizer::new(backend, counter, settings.summary.max_chunk_tokens)
            .context("Invalid summary settings")?;

        pipeline = pipeline.with_summarizer(summarizer).with_hints(hints);
    }

    Ok(pipeline)
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = settings.clone();
            if !shown.llm.api_key.is_empty() {
                shown.llm.api_key = "<redacted>".to_string();
            }
            let toml = toml::to_string_pretty(&shown)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct DoctorReport {
    transcription_backend: String,
    summary_provider: String,
    checks: Vec<DoctorCheck>,
}

/// Run diagnostic checks to help troubleshoot local setup issues.
pub async fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("mediamind doctor");
    println!("transcription: {}", report.transcription_backend);
    println!("summaries: {}", report.summary_provider);
    println!();

    for check in &report.checks {
        println!("{:<10} {:<8} {}", check.name, check.status, check.detail);
    }

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> DoctorReport {
    let ffmpeg_ok = command_exists(&settings.audio.ffmpeg);
    let api_key_ok = !settings.llm.api_key.trim().is_empty();

    let mut checks = vec![
        DoctorCheck {
            name: "ffmpeg",
            status: if ffmpeg_ok { "ok" } else { "missing" },
            detail: format!("required for audio extraction ({})", settings.audio.ffmpeg),
        },
        DoctorCheck {
            name: "api-key",
            status: if api_key_ok { "ok" } else { "missing" },
            detail: "set llm.api_key or OPENAI_API_KEY".to_string(),
        },
    ];

    if settings.whisper.backend.eq_ignore_ascii_case("local") {
        let model_path = settings.model_path();
        checks.push(DoctorCheck {
            name: "model",
            status: if model_path.exists() { "ok" } else { "missing" },
            detail: model_path.display().to_string(),
        });
        checks.push(DoctorCheck {
            name: "build",
            status: if cfg!(feature = "local-whisper") {
                "ok"
            } else {
                "missing"
            },
            detail: "local transcription needs the local-whisper feature".to_string(),
        });
    }

    DoctorReport {
        transcription_backend: settings.whisper.backend.clone(),
        summary_provider: format!("{} ({})", settings.llm.provider, settings.llm.model),
        checks,
    }
}

// Helper functions

fn command_exists(bin: &str) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
