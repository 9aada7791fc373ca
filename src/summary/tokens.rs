//! Token measurement

use tiktoken_rs::CoreBPE;

use crate::{MediaMindError, Result};

/// Counts tokens under a fixed encoding.
///
/// Counts are not additive: `count(a + b)` may differ from `count(a) + count(b)`, so a
/// combined text has to be measured as a whole.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// `o200k_base` encoding, the one used by the gpt-4o family.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::o200k_base().map_err(|e| {
            MediaMindError::Config(format!("Failed to initialize o200k_base tokenizer: {}", e))
        })?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

/// Counts whitespace-separated words. Cheap and predictable, used in tests.
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}
