//! Scoped ownership of the extracted audio file

use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Owns a temporary audio file and deletes it when dropped.
///
/// Dropping covers every way a run can end: normal return, `?` propagation, panics that
/// unwind, and the run future being dropped before completion. A failed removal is
/// logged and never turned into an error.
#[derive(Debug)]
pub struct TempAudio {
    path: PathBuf,
}

impl TempAudio {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudio {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => info!("Cleaned up temporary audio file: {}", self.path.display()),
            Err(e) => warn!(
                "Could not remove temporary audio file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
