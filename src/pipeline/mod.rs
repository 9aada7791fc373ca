//! Pipeline module for mediamind
//!
//! Runs extraction, transcription, optional summarization and the output write for one
//! media file, or for every media file in a directory. Each run removes its temporary
//! audio file before returning, whichever stage it ended in.

mod batch;
mod output;
mod run;

pub use crate::audio::TempAudio;
pub use batch::{discover_media, BatchFailure, BatchPolicy, BatchReport, BatchSuccess};
pub use output::{output_stem, render_summarized, render_transcript};
pub use run::{PipelineRun, RunStage};

use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::audio::AudioExtractor;
use crate::summary::{Summarizer, SummaryHints};
use crate::transcription::Transcriber;
use crate::{MediaMindError, Result};

/// Sequential media-to-markdown pipeline.
pub struct Pipeline {
    extractor: Arc<dyn AudioExtractor>,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Option<Summarizer>,
    language: Option<String>,
    hints: SummaryHints,
}

impl Pipeline {
    pub fn new(extractor: Arc<dyn AudioExtractor>, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            extractor,
            transcriber,
            summarizer: None,
            language: None,
            hints: SummaryHints::default(),
        }
    }

    /// Enable summarized runs.
    pub fn with_summarizer(mut self, summarizer: Summarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_hints(mut self, hints: SummaryHints) -> Self {
        self.hints = hints;
        self
    }

    /// Process one media file and return the path of the written markdown file.
    pub async fn process(&self, input: &Path, summarize: bool, output_dir: &Path) -> Result<PathBuf> {
        let mut run = PipelineRun::new(input, summarize);

        match self.execute(&mut run, output_dir).await {
            Ok(path) => {
                run.complete();
                info!("Saved {}", path.display());
                Ok(path)
            }
            Err(e) => {
                run.fail(&e);
                Err(e)
            }
        }
    }

    async fn execute(&self, run: &mut PipelineRun, output_dir: &Path) -> Result<PathBuf> {
        let summarizer = match (run.summarize(), &self.summarizer) {
            (false, _) => None,
            (true, Some(summarizer)) => {
                self.hints.validate()?;
                Some(summarizer)
            }
            (true, None) => {
                return Err(MediaMindError::Config(
                    "Summarization requested but no summary backend is configured".to_string(),
                ))
            }
        };

        tokio::fs::create_dir_all(output_dir).await?;

        run.enter(RunStage::ExtractingAudio);
        let extracted = self.extractor.extract(run.input()).await?;
        let audio_path = run.attach_audio(extracted);

        run.enter(RunStage::Transcribing);
        let transcript = self
            .transcriber
            .transcribe(&audio_path, self.language.as_deref())
            .await?;
        if transcript.trim().is_empty() {
            warn!(input = %run.input().display(), "Transcript is empty");
        }

        // One instant feeds both halves of the output file name.
        let created_at = Local::now();

        let document = match summarizer {
            Some(summarizer) => {
                run.enter(RunStage::Summarizing);
                let summary = summarizer.summarize(&transcript, &self.hints).await?;
                render_summarized(&summary, &transcript)
            }
            None => render_transcript(&transcript),
        };

        run.enter(RunStage::Writing);
        output::write_document(output_dir, &created_at, &document).await
    }

    /// Process every recognized media file directly inside `directory`.
    pub async fn batch(
        &self,
        directory: &Path,
        summarize: bool,
        output_dir: &Path,
        policy: BatchPolicy,
    ) -> Result<BatchReport> {
        let files = discover_media(directory)?;
        if files.is_empty() {
            info!("No media files found in {}", directory.display());
        }

        self.batch_files(files, summarize, output_dir, policy).await
    }

    /// Process already discovered media files, one at a time in the given order.
    ///
    /// Under [`BatchPolicy::FailFast`] the first error is returned; otherwise failures are
    /// collected in the report.
    pub async fn batch_files(
        &self,
        files: Vec<PathBuf>,
        summarize: bool,
        output_dir: &Path,
        policy: BatchPolicy,
    ) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        if files.is_empty() {
            return Ok(report);
        }

        let total = files.len();
        for (i, input) in files.into_iter().enumerate() {
            info!("Processing file {}/{}: {}", i + 1, total, input.display());

            match self.process(&input, summarize, output_dir).await {
                Ok(output) => report.succeeded.push(BatchSuccess { input, output }),
                Err(e) if policy == BatchPolicy::FailFast => return Err(e),
                Err(e) => report.failed.push(BatchFailure {
                    input,
                    error: e.to_string(),
                }),
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Batch finished"
        );
        Ok(report)
    }
}
