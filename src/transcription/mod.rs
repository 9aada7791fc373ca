//! Transcription module for mediamind
//!
//! Speech-to-text over the extracted audio, either through the hosted transcription API
//! or locally with whisper-rs (`local-whisper` feature).

mod openai;
mod paragraphs;
#[cfg(feature = "local-whisper")]
mod whisper;

pub use openai::OpenAiTranscriber;
pub use paragraphs::{paragraphs_from_segments, TranscriptSegment, PARAGRAPH_PAUSE_SECS};
#[cfg(feature = "local-whisper")]
pub use whisper::WhisperTranscriber;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use std::path::Path;

use crate::config::Settings;
use crate::Result;

/// Turns an audio file into transcript text with blank-line separated paragraphs.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Build a transcriber from runtime settings.
pub fn build_transcriber(settings: &Settings) -> AnyResult<Box<dyn Transcriber>> {
    match settings.whisper.backend.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiTranscriber::from_settings(settings)?)),
        "local" => build_local(settings),
        other => anyhow::bail!(
            "Unsupported whisper.backend '{}'. Supported backends: openai, local",
            other
        ),
    }
}

#[cfg(feature = "local-whisper")]
fn build_local(settings: &Settings) -> AnyResult<Box<dyn Transcriber>> {
    Ok(Box::new(WhisperTranscriber::new(settings)?))
}

#[cfg(not(feature = "local-whisper"))]
fn build_local(_settings: &Settings) -> AnyResult<Box<dyn Transcriber>> {
    anyhow::bail!(
        "whisper.backend = \"local\" requires a build with the `local-whisper` feature"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_backend_returns_error() {
        let mut settings = Settings::default();
        settings.whisper.backend = "carrier-pigeon".to_string();

        let err = match build_transcriber(&settings) {
            Ok(_) => panic!("expected transcriber creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Unsupported whisper.backend"));
    }

    #[test]
    fn hosted_backend_requires_api_key() {
        let mut settings = Settings::default();
        settings.llm.api_key = String::new();

        let err = match build_transcriber(&settings) {
            Ok(_) => panic!("expected transcriber creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("API key is missing"));
    }

    #[cfg(not(feature = "local-whisper"))]
    #[test]
    fn local_backend_needs_feature() {
        let mut settings = Settings::default();
        settings.whisper.backend = "local".to_string();

        let err = match build_transcriber(&settings) {
            Ok(_) => panic!("expected transcriber creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("local-whisper"));
    }
}
