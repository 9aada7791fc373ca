//! Directory batch support

use std::path::{Path, PathBuf};

use crate::audio::is_supported_media;
use crate::{MediaMindError, Result};

/// What a batch does when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Record the failure and move on to the next file
    ContinueOnError,
    /// Stop and return the first error
    FailFast,
}

#[derive(Debug, Clone)]
pub struct BatchSuccess {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: String,
}

/// Per-file outcomes of a batch, in processing order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub succeeded: Vec<BatchSuccess>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Recognized media files directly inside `directory`, sorted by path.
pub fn discover_media(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(MediaMindError::FileNotFound(format!(
            "Directory not found: {}",
            directory.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && is_supported_media(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
