//! Combine pass over chunk summaries

use std::sync::Arc;

use tracing::debug;

use crate::llm::prompts::build_combine_request;
use crate::llm::SummaryBackend;
use crate::{MediaMindError, Result};

pub struct SummaryCombiner {
    backend: Arc<dyn SummaryBackend>,
}

impl SummaryCombiner {
    pub fn new(backend: Arc<dyn SummaryBackend>) -> Self {
        Self { backend }
    }

    /// Merge chunk summaries into one document.
    ///
    /// A single summary is returned untouched without calling the backend. Two or more
    /// are merged with exactly one backend call.
    pub async fn combine(&self, mut summaries: Vec<String>) -> Result<String> {
        match summaries.len() {
            0 => Err(MediaMindError::InvalidInput(
                "No summaries to combine".to_string(),
            )),
            1 => Ok(summaries.remove(0)),
            sections => {
                debug!(sections, "Combining chunk summaries");

                let request = build_combine_request(&summaries);
                let reply = self.backend.generate(&request).await.map_err(|e| {
                    MediaMindError::Summarization(format!("Failed to combine summaries: {}", e))
                })?;

                let combined = reply.trim();
                if combined.is_empty() {
                    return Err(MediaMindError::Summarization(
                        "Combined summary is empty".to_string(),
                    ));
                }

                Ok(combined.to_string())
            }
        }
    }
}
