//! LLM module for mediamind
//!
//! Text generation backends used to turn transcripts into meeting minutes.

mod client;
mod gemini;
pub mod mock;
mod openai;
pub mod prompts;

pub use client::{build_backend, BackendError, GenerationRequest, SummaryBackend};
pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;

pub(crate) use openai::resolve_endpoint;
