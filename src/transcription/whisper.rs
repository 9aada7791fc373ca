//! Local Whisper transcription using whisper-rs

use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::Settings;
use crate::transcription::paragraphs::{paragraphs_from_segments, TranscriptSegment};
use crate::transcription::Transcriber;
use crate::{MediaMindError, Result};

/// Whisper expects 16 kHz mono input
const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Audio is fed to the model in windows of this length
const WINDOW_SECS: f32 = 30.0;

/// Whisper-based transcriber
pub struct WhisperTranscriber {
    ctx: Arc<WhisperContext>,
    threads: u32,
}

impl WhisperTranscriber {
    /// Load the configured model
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let model_path = settings.model_path();

        if !model_path.exists() {
            anyhow::bail!(
                "Whisper model not found at {}. Download ggml-{}.bin into {} first.",
                model_path.display(),
                settings.whisper.model,
                settings.whisper.models_dir.display()
            );
        }

        let model_path = model_path
            .to_str()
            .context("Whisper model path is not valid UTF-8")?;

        let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
            .context("Failed to load Whisper model")?;

        Ok(Self {
            ctx: Arc::new(ctx),
            threads: settings.whisper.threads,
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String> {
        if !audio_path.exists() {
            return Err(MediaMindError::FileNotFound(format!(
                "Audio file not found: {}",
                audio_path.display()
            )));
        }

        let samples = load_audio(audio_path)?;
        let ctx = self.ctx.clone();
        let threads = self.threads;
        let language = language.map(str::to_string);

        let segments = tokio::task::spawn_blocking(move || {
            transcribe_windows(&ctx, &samples, language.as_deref(), threads)
        })
        .await
        .map_err(|e| MediaMindError::Transcription(format!("inference task failed: {}", e)))??;

        tracing::info!(segments = segments.len(), "Local transcription complete");

        Ok(paragraphs_from_segments(&segments))
    }

    fn name(&self) -> &'static str {
        "whisper"
    }
}

fn transcribe_windows(
    ctx: &WhisperContext,
    samples: &[f32],
    language: Option<&str>,
    threads: u32,
) -> Result<Vec<TranscriptSegment>> {
    let window = (WINDOW_SECS * WHISPER_SAMPLE_RATE as f32) as usize;
    let windows: Vec<&[f32]> = samples.chunks(window).collect();
    let total = windows.len();

    let mut all_segments = Vec::new();
    let mut offset = 0.0;

    for (i, samples) in windows.into_iter().enumerate() {
        tracing::debug!("Processing window {}/{}", i + 1, total);

        let mut segments = transcribe_window(ctx, samples, language, threads)?;
        for segment in &mut segments {
            segment.start += offset;
            segment.end += offset;
        }
        all_segments.extend(segments);

        offset += samples.len() as f64 / WHISPER_SAMPLE_RATE as f64;
    }

    Ok(all_segments)
}

fn transcribe_window(
    ctx: &WhisperContext,
    samples: &[f32],
    language: Option<&str>,
    threads: u32,
) -> Result<Vec<TranscriptSegment>> {
    let failed = |what: &str, e: whisper_rs::WhisperError| {
        MediaMindError::Transcription(format!("{}: {}", what, e))
    };

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);
    params.set_language(language);
    if threads > 0 {
        params.set_n_threads(threads as i32);
    }

    let mut state = ctx
        .create_state()
        .map_err(|e| failed("Failed to create Whisper state", e))?;
    state
        .full(params, samples)
        .map_err(|e| failed("Whisper inference failed", e))?;

    let num_segments = state
        .full_n_segments()
        .map_err(|e| failed("Failed to get segment count", e))?;
    let mut segments = Vec::new();

    for i in 0..num_segments {
        // Timestamps are reported in centiseconds
        let start = state
            .full_get_segment_t0(i)
            .map_err(|e| failed("Failed to get segment start time", e))? as f64
            / 100.0;
        let end = state
            .full_get_segment_t1(i)
            .map_err(|e| failed("Failed to get segment end time", e))? as f64
            / 100.0;
        let text = state
            .full_get_segment_text(i)
            .map_err(|e| failed("Failed to get segment text", e))?;

        segments.push(TranscriptSegment::new(start, end, text));
    }

    Ok(segments)
}

/// Load audio from a WAV file and convert to f32 samples at 16kHz mono
fn load_audio(path: &Path) -> Result<Vec<f32>> {
    let reader = hound::WavReader::open(path).map_err(|e| {
        MediaMindError::Transcription(format!(
            "Failed to open audio file {}: {}",
            path.display(),
            e
        ))
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;

    let decoded: std::result::Result<Vec<f32>, hound::Error> =
        match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Int, 16) => reader
                .into_samples::<i16>()
                .map(|s| s.map(|s| s as f32 / 32768.0))
                .collect(),
            (hound::SampleFormat::Int, 32) => reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f32 / 2147483648.0))
                .collect(),
            (hound::SampleFormat::Float, 32) => reader.into_samples::<f32>().collect(),
            _ => {
                return Err(MediaMindError::Transcription(format!(
                    "Unsupported audio format: {:?} {}bit",
                    spec.sample_format, spec.bits_per_sample
                )))
            }
        };

    let samples = decoded.map_err(|e| {
        MediaMindError::Transcription(format!(
            "Failed to decode audio file {}: {}",
            path.display(),
            e
        ))
    })?;

    let samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok(if spec.sample_rate != WHISPER_SAMPLE_RATE {
        resample(&samples, spec.sample_rate, WHISPER_SAMPLE_RATE)
    } else {
        samples
    })
}

/// Linear resampling
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio) as usize;

    (0..new_len)
        .map(|i| {
            let src_pos = i as f64 * ratio;
            let src_idx = src_pos as usize;
            let frac = (src_pos - src_idx as f64) as f32;

            match (samples.get(src_idx), samples.get(src_idx + 1)) {
                (Some(a), Some(b)) => a * (1.0 - frac) + b * frac,
                (Some(a), None) => *a,
                _ => 0.0,
            }
        })
        .collect()
}
