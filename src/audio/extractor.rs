//! ffmpeg-based audio extraction

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::audio::{AudioExtractor, TempAudio, SUPPORTED_EXTENSIONS};
use crate::config::Settings;
use crate::{MediaMindError, Result};

/// Lines of ffmpeg stderr kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

/// Extracts 16-bit PCM WAV audio with the ffmpeg binary.
pub struct FfmpegExtractor {
    ffmpeg: String,
    sample_rate: u32,
    channels: u16,
}

impl FfmpegExtractor {
    pub fn new(ffmpeg: impl Into<String>, sample_rate: u32, channels: u16) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            sample_rate,
            channels,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.audio.ffmpeg.clone(),
            settings.audio.sample_rate,
            settings.audio.channels,
        )
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    async fn extract(&self, media_path: &Path) -> Result<TempAudio> {
        if !media_path.exists() {
            return Err(MediaMindError::FileNotFound(
                media_path.display().to_string(),
            ));
        }
        if !is_supported_media(media_path) {
            return Err(MediaMindError::UnsupportedFormat(extension_label(media_path)));
        }

        let audio = TempAudio::new(audio_path_for(media_path));
        let output_path = audio.path();
        tracing::info!(
            input = %media_path.display(),
            output = %output_path.display(),
            "Extracting audio"
        );

        let channels = self.channels.to_string();
        let sample_rate = self.sample_rate.to_string();
        let output = Command::new(&self.ffmpeg)
            .arg("-y")
            .arg("-i")
            .arg(media_path)
            .args([
                "-vn",
                "-ac",
                channels.as_str(),
                "-ar",
                sample_rate.as_str(),
                "-acodec",
                "pcm_s16le",
            ])
            .arg(output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                MediaMindError::AudioExtraction(format!("Failed to run {}: {}", self.ffmpeg, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaMindError::AudioExtraction(format!(
                "{} exited with {}: {}",
                self.ffmpeg,
                output.status,
                stderr_tail(&stderr)
            )));
        }

        let secs = audio_duration(output_path)?;
        tracing::info!(duration_secs = secs, "Audio extracted");

        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

/// WAV path that extraction writes for `media_path`: same directory and stem.
pub fn audio_path_for(media_path: &Path) -> PathBuf {
    media_path.with_extension("wav")
}

/// Whether the file extension is a recognized media container.
pub fn is_supported_media(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Duration of a WAV file in seconds, read from its header.
pub fn audio_duration(path: &Path) -> Result<f64> {
    let reader = hound::WavReader::open(path).map_err(|e| {
        MediaMindError::AudioExtraction(format!(
            "Failed to read audio file {}: {}",
            path.display(),
            e
        ))
    })?;

    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(MediaMindError::AudioExtraction(format!(
            "Audio file {} reports a zero sample rate",
            path.display()
        )));
    }

    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

fn extension_label(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_else(|| "(no extension)".to_string())
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, samples: usize) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..samples {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn audio_path_keeps_stem_and_directory() {
        assert_eq!(
            audio_path_for(Path::new("/meetings/standup.MOV")),
            PathBuf::from("/meetings/standup.wav")
        );
        assert_eq!(
            audio_path_for(Path::new("review.2024.mp4")),
            PathBuf::from("review.2024.wav")
        );
    }

    #[test]
    fn recognizes_containers_case_insensitively() {
        assert!(is_supported_media(Path::new("a.mov")));
        assert!(is_supported_media(Path::new("a.MP4")));
        assert!(!is_supported_media(Path::new("a.avi")));
        assert!(!is_supported_media(Path::new("mp4")));
    }

    #[test]
    fn duration_comes_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wav");
        write_wav(&path, 16000, 24000);

        let secs = audio_duration(&path).unwrap();
        assert!((secs - 1.5).abs() < 1e-9);
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let stderr = "l1\nl2\n\nl3\nl4\nl5\nl6\n";
        assert_eq!(stderr_tail(stderr), "l2\nl3\nl4\nl5\nl6");
    }

    #[tokio::test]
    async fn missing_input_is_not_found() {
        let extractor = FfmpegExtractor::new("ffmpeg", 16000, 1);
        let err = extractor
            .extract(Path::new("/definitely/not/here.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaMindError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn unknown_container_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.avi");
        std::fs::write(&path, b"not a video").unwrap();

        let extractor = FfmpegExtractor::new("ffmpeg", 16000, 1);
        let err = extractor.extract(&path).await.unwrap_err();

        assert!(matches!(err, MediaMindError::UnsupportedFormat(ref ext) if ext == ".avi"));
        assert!(!audio_path_for(&path).exists());
    }

    /// Shell stand-in for ffmpeg; `$out` is the last argument.
    #[cfg(unix)]
    fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-ffmpeg");
        std::fs::write(
            &script,
            format!("#!/bin/sh\nfor out; do :; done\n{}\n", body),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_ffmpeg_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mov");
        std::fs::write(&path, b"not a video").unwrap();
        let script = fake_ffmpeg(
            dir.path(),
            "printf 'RIFF' > \"$out\"\necho 'Invalid data found when processing input' >&2\nexit 1",
        );

        let extractor = FfmpegExtractor::new(script.to_string_lossy(), 16000, 1);
        let err = extractor.extract(&path).await.unwrap_err();

        assert!(matches!(err, MediaMindError::AudioExtraction(ref msg) if msg.contains("Invalid data")));
        assert!(!audio_path_for(&path).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_extraction_hands_over_the_guard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"not a video").unwrap();
        let source = dir.path().join("source.wav");
        write_wav(&source, 16000, 16000);
        let script = fake_ffmpeg(dir.path(), &format!("cp '{}' \"$out\"", source.display()));

        let extractor = FfmpegExtractor::new(script.to_string_lossy(), 16000, 1);
        let audio = extractor.extract(&path).await.unwrap();

        assert_eq!(audio.path(), audio_path_for(&path).as_path());
        assert!(audio.path().exists());
        drop(audio);
        assert!(!audio_path_for(&path).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancelled_extraction_stops_ffmpeg_and_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mov");
        std::fs::write(&path, b"not a video").unwrap();
        let script = fake_ffmpeg(dir.path(), "sleep 1\nprintf 'RIFF' > \"$out\"");

        let extractor = FfmpegExtractor::new(script.to_string_lossy(), 16000, 1);
        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            extractor.extract(&path),
        )
        .await;
        assert!(outcome.is_err(), "extraction should still be running");

        tokio::time::sleep(std::time::Duration::from_millis(1800)).await;
        assert!(!audio_path_for(&path).exists());
    }

    #[tokio::test]
    async fn missing_ffmpeg_binary_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"not a video").unwrap();

        let extractor = FfmpegExtractor::new("mediamind-no-such-ffmpeg", 16000, 1);
        let err = extractor.extract(&path).await.unwrap_err();

        assert!(matches!(err, MediaMindError::AudioExtraction(_)));
        assert!(!audio_path_for(&path).exists());
    }
}
