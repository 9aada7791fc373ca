//! Summary module for mediamind
//!
//! Splits a transcript into token-bounded chunks, summarizes each chunk with the
//! configured backend and merges the results into one set of meeting minutes.

mod chunk_summarizer;
mod combiner;
mod splitter;
mod tokens;

pub use chunk_summarizer::ChunkSummarizer;
pub use combiner::SummaryCombiner;
pub use splitter::{Chunk, ChunkSplitter, PARAGRAPH_SEPARATOR};
pub use tokens::{TiktokenCounter, TokenCounter, WordCounter};

use std::sync::Arc;

use tracing::info;

use crate::llm::SummaryBackend;
use crate::{MediaMindError, Result};

/// Optional instructions appended to every chunk request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryHints {
    /// Target number of key points
    pub max_points: Option<u32>,
    /// Free-form style descriptor
    pub style: Option<String>,
}

impl SummaryHints {
    pub fn validate(&self) -> Result<()> {
        if self.max_points == Some(0) {
            return Err(MediaMindError::InvalidInput(
                "Invalid max_points: must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Transcript to minutes: chunk summaries followed by the combine pass.
pub struct Summarizer {
    chunks: ChunkSummarizer,
    combiner: SummaryCombiner,
}

impl Summarizer {
    pub fn new(
        backend: Arc<dyn SummaryBackend>,
        counter: Arc<dyn TokenCounter>,
        max_chunk_tokens: usize,
    ) -> Result<Self> {
        Ok(Self {
            chunks: ChunkSummarizer::new(backend.clone(), counter, max_chunk_tokens)?,
            combiner: SummaryCombiner::new(backend),
        })
    }

    pub async fn summarize(&self, text: &str, hints: &SummaryHints) -> Result<String> {
        if text.trim().is_empty() {
            return Err(MediaMindError::InvalidInput("Input text is empty".to_string()));
        }

        let summaries = self.chunks.summarize_chunks(text, hints).await?;
        info!(chunks = summaries.len(), "Chunk summaries generated");

        self.combiner.combine(summaries).await
    }
}
