use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::path::Path;

use crate::config::Settings;
use crate::llm::resolve_endpoint;
use crate::transcription::paragraphs::{paragraphs_from_segments, TranscriptSegment};
use crate::transcription::Transcriber;
use crate::{MediaMindError, Result};

/// Hosted transcription API (`/audio/transcriptions`).
pub struct OpenAiTranscriber {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiTranscriber {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "OpenAI API key is missing. Set llm.api_key in config or OPENAI_API_KEY."
            );
        }

        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(settings.llm.timeout_secs.max(300)))
                .build()
                .context("Failed to build transcription HTTP client")?,
            api_key,
            endpoint: resolve_endpoint(&settings.llm.endpoint),
            model: settings.whisper.api_model.clone(),
        })
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String> {
        if !audio_path.exists() {
            return Err(MediaMindError::FileNotFound(format!(
                "Audio file not found: {}",
                audio_path.display()
            )));
        }

        let audio = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        let file_part = multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| MediaMindError::Transcription(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .part("file", file_part);
        if let Some(language) = language {
            form = form.text("language", language.to_string());
        }

        tracing::debug!(model = %self.model, "Sending audio to transcription API");

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.endpoint))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaMindError::Transcription(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MediaMindError::Transcription(format!(
                "status {}: {}",
                status, body
            )));
        }

        let payload: VerboseTranscription = response
            .json()
            .await
            .map_err(|e| MediaMindError::Transcription(format!("body: {}", e)))?;

        let transcript = payload.into_text();
        tracing::info!(chars = transcript.len(), "Transcription API call completed");

        Ok(transcript)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    text: String,
    #[serde(default)]
    segments: Vec<TranscriptSegment>,
}

impl VerboseTranscription {
    fn into_text(self) -> String {
        if self.segments.is_empty() {
            self.text.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            paragraphs_from_segments(&self.segments)
        }
    }
}
