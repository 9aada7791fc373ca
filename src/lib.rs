//! mediamind - Turn recorded meetings into transcripts and structured meeting minutes
//!
//! A run extracts the audio track from a media file, transcribes it, optionally condenses
//! the transcript into minutes, and writes a markdown file. The temporary audio file is
//! removed on every exit path.

pub mod audio;
pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod summary;
pub mod transcription;

use thiserror::Error;

/// Main error type for mediamind
#[derive(Error, Debug)]
pub enum MediaMindError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Audio extraction failed: {0}")]
    AudioExtraction(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MediaMindError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "mediamind";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_the_cause() {
        let err = MediaMindError::Summarization("Generated summary is empty".to_string());
        assert_eq!(
            err.to_string(),
            "Summarization failed: Generated summary is empty"
        );

        let err = MediaMindError::UnsupportedFormat(".avi".to_string());
        assert!(err.to_string().contains(".avi"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MediaMindError = io.into();
        assert!(matches!(err, MediaMindError::Io(_)));
    }
}
