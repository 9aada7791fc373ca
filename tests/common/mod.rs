#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use mediamind::audio::{audio_path_for, is_supported_media, AudioExtractor, TempAudio};
use mediamind::transcription::Transcriber;
use mediamind::{MediaMindError, Result};

pub const TRANSCRIPT: &str = "Intro.\n\nDecision: ship it.\n\nAction: Alice to follow up.";

/// Writes a one-second silent WAV next to the input instead of calling ffmpeg.
#[derive(Default)]
pub struct FakeExtractor {
    extracted: Mutex<Vec<PathBuf>>,
}

impl FakeExtractor {
    pub fn extracted(&self) -> Vec<PathBuf> {
        self.extracted.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioExtractor for FakeExtractor {
    async fn extract(&self, media_path: &Path) -> Result<TempAudio> {
        if !media_path.exists() {
            return Err(MediaMindError::FileNotFound(
                media_path.display().to_string(),
            ));
        }
        if !is_supported_media(media_path) {
            return Err(MediaMindError::UnsupportedFormat(
                media_path.display().to_string(),
            ));
        }

        let audio = TempAudio::new(audio_path_for(media_path));
        write_silent_wav(audio.path());
        self.extracted.lock().unwrap().push(audio.path().to_path_buf());
        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn write_silent_wav(path: &Path) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for _ in 0..16000 {
        writer.write_sample(0i16).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

enum Behavior {
    Reply(String),
    Fail(String),
    Hang,
}

/// Returns a fixed transcript, optionally failing for inputs whose stem matches.
pub struct ScriptedTranscriber {
    behavior: Behavior,
    fail_stems: Vec<String>,
    seen_audio: Mutex<Vec<(PathBuf, bool)>>,
}

impl ScriptedTranscriber {
    pub fn replying(text: &str) -> Self {
        Self::with(Behavior::Reply(text.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with(Behavior::Fail(message.to_string()))
    }

    /// Never finishes; used to cancel a run mid-transcription.
    pub fn hanging() -> Self {
        Self::with(Behavior::Hang)
    }

    pub fn fail_for(mut self, stem: &str) -> Self {
        self.fail_stems.push(stem.to_string());
        self
    }

    /// Audio paths received and whether each existed at call time.
    pub fn seen_audio(&self) -> Vec<(PathBuf, bool)> {
        self.seen_audio.lock().unwrap().clone()
    }

    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            fail_stems: Vec::new(),
            seen_audio: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, audio_path: &Path, _language: Option<&str>) -> Result<String> {
        self.seen_audio
            .lock()
            .unwrap()
            .push((audio_path.to_path_buf(), audio_path.exists()));

        let stem = audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.fail_stems.contains(&stem) {
            return Err(MediaMindError::Transcription(format!(
                "model failed on {}",
                stem
            )));
        }

        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail(message) => Err(MediaMindError::Transcription(message.clone())),
            Behavior::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Executable shell script standing in for ffmpeg. `$out` holds the output path.
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-ffmpeg");
    std::fs::write(&script, format!("#!/bin/sh\nfor out; do :; done\n{}\n", body))
        .expect("write fake ffmpeg");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .expect("make fake ffmpeg executable");
    script
}

/// Create empty media files in `dir`.
pub fn touch_media(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"").expect("create media file");
            path
        })
        .collect()
}

/// Markdown files in `dir`, sorted.
pub fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("read output dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.extension().map(|ext| ext == "md").unwrap_or(false))
        .collect();
    files.sort();
    files
}

/// Runs the built binary with isolated HOME and XDG directories.
pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_mediamind"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("OPENAI_API_KEY")
            .env_remove("MEDIAMIND_API_KEY")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute mediamind binary")
    }
}

pub fn run_mediamind(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}
