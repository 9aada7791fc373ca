//! Audio module for mediamind
//!
//! Pulls a decodable audio track out of a media container.

mod extractor;
mod temp_audio;

pub use extractor::{audio_duration, audio_path_for, is_supported_media, FfmpegExtractor};
pub use temp_audio::TempAudio;

use async_trait::async_trait;
use std::path::Path;

use crate::Result;

/// Media container extensions the extractor accepts, lowercase.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["mov", "mp4"];

/// Produces a WAV file from a media file.
///
/// The file lives at a path derived from the input (same stem, `.wav`). Implementations
/// guard that path before writing to it, so a failed or cancelled extraction leaves
/// nothing behind; on success the guard passes to the caller.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, media_path: &Path) -> Result<TempAudio>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}
