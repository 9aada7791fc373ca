use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::Settings;
use crate::llm::gemini::GeminiBackend;
use crate::llm::openai::OpenAiBackend;

/// One stateless generation call: a system instruction and a user instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Transport-level failures of a generation backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("rate limited")]
    RateLimited,

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Text generation capability used for summarization.
///
/// Implementations hold their own credentials and connection state; callers construct
/// one explicitly and pass it where it is needed.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

/// Build a summary backend from runtime settings.
pub fn build_backend(settings: &Settings) -> Result<Box<dyn SummaryBackend>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiBackend::from_settings(settings)?)),
        "gemini" => Ok(Box::new(GeminiBackend::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported llm.provider '{}'. Supported providers: openai, gemini",
            other
        ),
    }
}

/// Map an HTTP error status onto the backend error taxonomy.
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> BackendError {
    match status.as_u16() {
        401 | 403 => BackendError::Auth(body),
        429 => BackendError::RateLimited,
        code => BackendError::Status { status: code, body },
    }
}
