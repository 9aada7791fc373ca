//! Per-input run state

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info};

use crate::audio::TempAudio;
use crate::MediaMindError;

/// Stage of a run. Runs only move forward; any stage can end in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    ExtractingAudio,
    Transcribing,
    Summarizing,
    Writing,
    Done,
    Failed,
}

impl RunStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ExtractingAudio => "extracting audio",
            Self::Transcribing => "transcribing",
            Self::Summarizing => "summarizing",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One end-to-end execution for a single input file.
///
/// The run exclusively owns the temporary audio file once extraction hands it over; it is
/// removed when the run releases it or is dropped.
#[derive(Debug)]
pub struct PipelineRun {
    input: PathBuf,
    summarize: bool,
    stage: RunStage,
    failed_in: Option<RunStage>,
    audio: Option<TempAudio>,
    started: Instant,
}

impl PipelineRun {
    pub fn new(input: &Path, summarize: bool) -> Self {
        Self {
            input: input.to_path_buf(),
            summarize,
            stage: RunStage::Idle,
            failed_in: None,
            audio: None,
            started: Instant::now(),
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn summarize(&self) -> bool {
        self.summarize
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// Stage that was active when the run failed
    pub fn failed_in(&self) -> Option<RunStage> {
        self.failed_in
    }

    pub(crate) fn enter(&mut self, stage: RunStage) {
        info!(
            input = %self.input.display(),
            "{} -> {}",
            self.stage,
            stage
        );
        self.stage = stage;
    }

    /// Take ownership of the extracted audio file.
    pub(crate) fn attach_audio(&mut self, audio: TempAudio) -> PathBuf {
        let path = audio.path().to_path_buf();
        self.audio = Some(audio);
        path
    }

    /// Delete the temporary audio file now.
    pub(crate) fn release_audio(&mut self) {
        self.audio.take();
    }

    pub(crate) fn complete(&mut self) {
        self.release_audio();
        self.enter(RunStage::Done);
        info!(
            input = %self.input.display(),
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Processing complete"
        );
    }

    pub(crate) fn fail(&mut self, err: &MediaMindError) {
        self.release_audio();
        self.failed_in = Some(self.stage);
        error!(
            input = %self.input.display(),
            stage = %self.stage,
            "Run failed: {}",
            err
        );
        self.stage = RunStage::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_releases_audio() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("a.wav");
        std::fs::write(&wav, b"RIFF").unwrap();

        let mut run = PipelineRun::new(&dir.path().join("a.mp4"), false);
        assert_eq!(run.stage(), RunStage::Idle);

        run.enter(RunStage::ExtractingAudio);
        let path = run.attach_audio(TempAudio::new(wav.clone()));
        assert_eq!(path, wav);
        run.enter(RunStage::Transcribing);
        run.enter(RunStage::Writing);
        run.complete();

        assert_eq!(run.stage(), RunStage::Done);
        assert!(run.stage().is_terminal());
        assert!(!wav.exists());
    }

    #[test]
    fn failure_records_stage_and_releases_audio() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("a.wav");
        std::fs::write(&wav, b"RIFF").unwrap();

        let mut run = PipelineRun::new(&dir.path().join("a.mp4"), true);
        run.attach_audio(TempAudio::new(wav.clone()));
        run.enter(RunStage::Summarizing);
        run.fail(&MediaMindError::Summarization("boom".to_string()));

        assert_eq!(run.stage(), RunStage::Failed);
        assert_eq!(run.failed_in(), Some(RunStage::Summarizing));
        assert!(!wav.exists());
    }

    #[test]
    fn dropping_a_run_releases_audio() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("a.wav");
        std::fs::write(&wav, b"RIFF").unwrap();

        let mut run = PipelineRun::new(&dir.path().join("a.mp4"), false);
        run.attach_audio(TempAudio::new(wav.clone()));
        drop(run);

        assert!(!wav.exists());
    }
}
