//! Paragraph-aligned chunking under a token budget

use std::sync::Arc;

use crate::summary::tokens::TokenCounter;
use crate::{MediaMindError, Result};

/// Blank-line separator between paragraphs.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// A contiguous run of paragraphs from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position in the document
    pub index: usize,
    pub text: String,
    /// Measured token count of `text`
    pub tokens: usize,
    pub paragraphs: usize,
}

/// Splits documents into chunks that fit a token budget without breaking paragraphs.
///
/// A paragraph that is over budget on its own becomes a chunk by itself and is passed
/// through unsplit.
pub struct ChunkSplitter {
    counter: Arc<dyn TokenCounter>,
    budget: usize,
}

impl ChunkSplitter {
    pub fn new(counter: Arc<dyn TokenCounter>, budget: usize) -> Result<Self> {
        if budget == 0 {
            return Err(MediaMindError::InvalidInput(
                "Chunk token budget must be positive".to_string(),
            ));
        }
        Ok(Self { counter, budget })
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Split `text` into chunks. Joining the chunk texts with [`PARAGRAPH_SEPARATOR`]
    /// gives back `text` exactly; an empty document yields no chunks.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        if text.is_empty() {
            return chunks;
        }

        let mut current: Option<(String, usize)> = None;

        for paragraph in text.split(PARAGRAPH_SEPARATOR) {
            current = match current.take() {
                None => Some((paragraph.to_string(), 1)),
                Some((buffer, paragraphs)) => {
                    let candidate_len = buffer.len() + PARAGRAPH_SEPARATOR.len() + paragraph.len();
                    let mut candidate = String::with_capacity(candidate_len);
                    candidate.push_str(&buffer);
                    candidate.push_str(PARAGRAPH_SEPARATOR);
                    candidate.push_str(paragraph);

                    if self.counter.count(&candidate) > self.budget {
                        self.emit(&mut chunks, buffer, paragraphs);
                        Some((paragraph.to_string(), 1))
                    } else {
                        Some((candidate, paragraphs + 1))
                    }
                }
            };
        }

        if let Some((buffer, paragraphs)) = current {
            self.emit(&mut chunks, buffer, paragraphs);
        }

        chunks
    }

    fn emit(&self, chunks: &mut Vec<Chunk>, text: String, paragraphs: usize) {
        let tokens = self.counter.count(&text);
        if tokens > self.budget {
            tracing::warn!(
                chunk = chunks.len() + 1,
                tokens,
                budget = self.budget,
                "Paragraph exceeds the chunk budget on its own; passing it through unsplit"
            );
        }

        chunks.push(Chunk {
            index: chunks.len() + 1,
            text,
            tokens,
            paragraphs,
        });
    }
}
