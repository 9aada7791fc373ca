//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::BatchPolicy;
use crate::summary::SummaryHints;

/// Environment variables consulted for the backend credential, in order.
const API_KEY_ENV_VARS: [&str; 2] = ["MEDIAMIND_API_KEY", "OPENAI_API_KEY"];

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Audio extraction settings
    #[serde(default)]
    pub audio: AudioSettings,

    /// Transcription settings
    #[serde(default)]
    pub whisper: WhisperSettings,

    /// Summary backend settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Summarization tuning
    #[serde(default)]
    pub summary: SummarySettings,

    /// Directory batch behavior
    #[serde(default)]
    pub batch: BatchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Directory where markdown output is written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// ffmpeg binary used for audio extraction
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    /// Sample rate of the extracted audio (16000 for Whisper compatibility)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Number of audio channels in the extracted audio
    #[serde(default = "default_channels")]
    pub channels: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSettings {
    /// Transcription backend (openai, local)
    #[serde(default = "default_whisper_backend")]
    pub backend: String,

    /// Local Whisper model to use (tiny, base, small, medium, large)
    #[serde(default = "default_model")]
    pub model: String,

    /// Path to local model files directory
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Model name for the hosted transcription API
    #[serde(default = "default_api_model")]
    pub api_model: String,

    /// Language for transcription (empty = auto-detect)
    #[serde(default)]
    pub language: String,

    /// Number of threads for local inference (0 = auto)
    #[serde(default)]
    pub threads: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Summary backend provider (openai, gemini)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key, shared by the hosted transcription backend
    #[serde(default)]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per request
    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySettings {
    /// Token budget for one transcript chunk
    #[serde(default = "default_max_chunk_tokens")]
    pub max_chunk_tokens: usize,

    /// Target number of key points (unset = no limit)
    #[serde(default)]
    pub max_points: Option<u32>,

    /// Free-form style descriptor (e.g. concise, detailed)
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Keep processing remaining files after one fails
    #[serde(default = "default_true")]
    pub continue_on_error: bool,
}

// Default value functions

fn default_output_dir() -> PathBuf {
    PathBuf::from("transcripts")
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "mediamind", "mediamind")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/mediamind"))
}

fn default_models_dir() -> PathBuf {
    default_data_dir().join("models")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_channels() -> u16 {
    1
}

fn default_true() -> bool {
    true
}

fn default_whisper_backend() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "base".to_string()
}

fn default_api_model() -> String {
    "whisper-1".to_string()
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_completion_tokens() -> u32 {
    16000
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_chunk_tokens() -> usize {
    // Roughly three quarters of a 128k context, leaving room for prompt and completion.
    96_000
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            backend: default_whisper_backend(),
            model: default_model(),
            models_dir: default_models_dir(),
            api_model: default_api_model(),
            language: String::new(),
            threads: 0,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: String::new(),
            temperature: default_temperature(),
            max_completion_tokens: default_max_completion_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            max_chunk_tokens: default_max_chunk_tokens(),
            max_points: None,
            style: None,
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            continue_on_error: true,
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        Self::load_from(&config_path)
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if !self.llm.api_key.trim().is_empty() {
            return;
        }

        for var in API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    self.llm.api_key = key;
                    return;
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "mediamind", "mediamind")
            .context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to a local whisper model file
    pub fn model_path(&self) -> PathBuf {
        self.whisper
            .models_dir
            .join(format!("ggml-{}.bin", self.whisper.model))
    }

    /// Transcription language, if one is pinned
    pub fn language(&self) -> Option<String> {
        let language = self.whisper.language.trim();
        (!language.is_empty()).then(|| language.to_string())
    }

    /// Summary hints derived from the `[summary]` section
    pub fn summary_hints(&self) -> SummaryHints {
        SummaryHints {
            max_points: self.summary.max_points,
            style: self.summary.style.clone(),
        }
    }

    /// Batch failure policy derived from the `[batch]` section
    pub fn batch_policy(&self) -> BatchPolicy {
        if self.batch.continue_on_error {
            BatchPolicy::ContinueOnError
        } else {
            BatchPolicy::FailFast
        }
    }
}
