//! Configuration settings for Sayso.

use super::Prompts;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcript: TranscriptSettings,
    pub audio: AudioSettings,
    pub recognition: RecognitionSettings,
    pub search: SearchSettings,
    pub summarization: SummarizationSettings,
    pub server: ServerSettings,
    pub prompts: Prompts,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary files (downloaded audio).
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/sayso".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Transcript acquisition settings.
///
/// Tiers are always tried in the same order; the toggles only remove a tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Language tag for the timed-text endpoint.
    pub language: String,
    /// Base URL of the public timed-text endpoint.
    pub timedtext_url: String,
    /// Preferred languages for the transcript service, in order.
    pub service_languages: Vec<String>,
    /// Timeout for the timed-text request.
    pub request_timeout_seconds: u64,
    /// Enable the timed-text tier.
    pub timedtext: bool,
    /// Enable the transcript service tier.
    pub service: bool,
    /// Enable the download + speech recognition tier.
    pub offline: bool,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            timedtext_url: "https://www.youtube.com/api/timedtext".to_string(),
            service_languages: vec!["en".to_string()],
            request_timeout_seconds: 30,
            timedtext: true,
            service: true,
            offline: true,
        }
    }
}

/// Audio download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Downloader executable.
    pub downloader: String,
    /// Audio format requested from the downloader.
    pub format: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            downloader: "yt-dlp".to_string(),
            format: "mp3".to_string(),
        }
    }
}

/// Speech recognition provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionProvider {
    /// OpenAI Whisper API (default).
    #[default]
    Api,
    /// Local whisper.cpp model (requires the `local-whisper` feature).
    Local,
}

impl std::str::FromStr for RecognitionProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "api" | "openai" => Ok(RecognitionProvider::Api),
            "local" | "whisper-cpp" => Ok(RecognitionProvider::Local),
            _ => Err(format!("Unknown recognition provider: {}", s)),
        }
    }
}

impl std::fmt::Display for RecognitionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognitionProvider::Api => write!(f, "api"),
            RecognitionProvider::Local => write!(f, "local"),
        }
    }
}

/// Speech recognition settings (offline tier).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    /// Recognition provider (api, local).
    pub provider: RecognitionProvider,
    /// Whisper API model.
    pub model: String,
    /// Path to a ggml model file (local provider).
    pub model_path: String,
    /// Language hint passed to the recognizer.
    pub language: Option<String>,
    /// Duration in seconds for splitting long audio before upload.
    pub chunk_duration_seconds: u32,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            provider: RecognitionProvider::Api,
            model: "whisper-1".to_string(),
            model_path: "~/.sayso/models/ggml-tiny.bin".to_string(),
            language: None,
            chunk_duration_seconds: 600,
        }
    }
}

/// Keyword search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Number of neighbouring segments included on each side of a match.
    pub window: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { window: 2 }
    }
}

/// Summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationSettings {
    /// LLM model used for summaries.
    pub model: String,
    /// Words per chunk when the input is long.
    pub chunk_words: usize,
    /// Inputs with fewer words than this are summarized in one call.
    pub short_text_words: usize,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens per call.
    pub max_tokens: u32,
}

impl Default for SummarizationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            chunk_words: 350,
            short_text_words: 120,
            temperature: 0.7,
            max_tokens: 200,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SaysoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sayso")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Get the expanded local model path.
    pub fn model_path(&self) -> PathBuf {
        Self::expand_path(&self.recognition.model_path)
    }
}
