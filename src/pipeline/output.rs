//! Output document layout and file naming

use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::Result;

/// Human-readable half of the file name (no colons, so it is valid everywhere)
const HUMAN_FORMAT: &str = "%Y-%m-%d %H-%M-%S";
/// Compact sortable half of the file name
const COMPACT_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<human>_<compact>` stem, both halves taken from the same instant.
pub fn output_stem(created_at: &DateTime<Local>) -> String {
    format!(
        "{}_{}",
        created_at.format(HUMAN_FORMAT),
        created_at.format(COMPACT_FORMAT)
    )
}

/// Minutes followed by the raw transcript.
pub fn render_summarized(summary: &str, transcript: &str) -> String {
    format!("{}\n\n## Original Transcript\n\n{}\n", summary, transcript)
}

/// Transcript only. The transcript is kept verbatim.
pub fn render_transcript(transcript: &str) -> String {
    format!("# Transcript\n\n{}\n", transcript)
}

/// Write `document` under `output_dir` without overwriting an existing file.
///
/// The first choice is `<stem>.md`; if taken, `<stem>-2.md`, `<stem>-3.md`, and so on.
pub async fn write_document(
    output_dir: &Path,
    created_at: &DateTime<Local>,
    document: &str,
) -> Result<PathBuf> {
    let stem = output_stem(created_at);
    let mut attempt = 1u32;

    loop {
        let name = if attempt == 1 {
            format!("{}.md", stem)
        } else {
            format!("{}-{}.md", stem, attempt)
        };
        let path = output_dir.join(name);

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(document.as_bytes()).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
