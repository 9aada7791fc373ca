//! Transcript segments to paragraph text

use serde::{Deserialize, Serialize};

use crate::summary::PARAGRAPH_SEPARATOR;

/// A pause at least this long between two segments starts a new paragraph.
pub const PARAGRAPH_PAUSE_SECS: f64 = 2.0;

/// A timed piece of recognized speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Join segments into paragraphs, breaking wherever speech pauses for at least
/// [`PARAGRAPH_PAUSE_SECS`]. Whitespace inside a paragraph is collapsed and blank
/// segments are dropped.
pub fn paragraphs_from_segments(segments: &[TranscriptSegment]) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut last_end: Option<f64> = None;

    for segment in segments {
        let words = segment.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if words.is_empty() {
            continue;
        }

        let paused = last_end
            .map(|end| segment.start - end >= PARAGRAPH_PAUSE_SECS)
            .unwrap_or(false);

        if paused && !current.is_empty() {
            paragraphs.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&words);
        last_end = Some(segment.end);
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs.join(PARAGRAPH_SEPARATOR)
}
