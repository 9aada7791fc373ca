//! One backend round-trip per chunk, in document order

use std::sync::Arc;

use tracing::debug;

use crate::llm::prompts::build_chunk_request;
use crate::llm::SummaryBackend;
use crate::summary::splitter::ChunkSplitter;
use crate::summary::tokens::TokenCounter;
use crate::summary::SummaryHints;
use crate::{MediaMindError, Result};

pub struct ChunkSummarizer {
    backend: Arc<dyn SummaryBackend>,
    splitter: ChunkSplitter,
}

impl ChunkSummarizer {
    pub fn new(
        backend: Arc<dyn SummaryBackend>,
        counter: Arc<dyn TokenCounter>,
        max_chunk_tokens: usize,
    ) -> Result<Self> {
        Ok(Self {
            backend,
            splitter: ChunkSplitter::new(counter, max_chunk_tokens)?,
        })
    }

    /// Summarize every chunk of `text`, returning one summary per chunk in chunk order.
    ///
    /// Chunks are sent strictly one after another. The first failure or blank reply stops
    /// the run.
    pub async fn summarize_chunks(&self, text: &str, hints: &SummaryHints) -> Result<Vec<String>> {
        hints.validate()?;

        let chunks = self.splitter.split(text);
        let total = chunks.len();
        let mut summaries = Vec::with_capacity(total);

        for chunk in &chunks {
            debug!(
                chunk = chunk.index,
                total,
                tokens = chunk.tokens,
                "Summarizing chunk"
            );

            let request =
                build_chunk_request(&chunk.text, hints.max_points, hints.style.as_deref());

            let reply = self.backend.generate(&request).await.map_err(|e| {
                MediaMindError::Summarization(format!(
                    "Failed to generate summary for chunk {}/{}: {}",
                    chunk.index, total, e
                ))
            })?;

            let summary = reply.trim();
            if summary.is_empty() {
                return Err(MediaMindError::Summarization(format!(
                    "Generated summary for chunk {}/{} is empty",
                    chunk.index, total
                )));
            }

            summaries.push(summary.to_string());
        }

        Ok(summaries)
    }
}
