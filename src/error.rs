//! Error types for Sayso.

use thiserror::Error;

/// Library-level error type for Sayso operations.
#[derive(Error, Debug)]
pub enum SaysoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid YouTube URL: could not extract video ID from '{0}'")]
    InvalidLocator(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Speech recognition failed: {0}")]
    Recognition(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),
}

/// Result type alias for Sayso operations.
pub type Result<T> = std::result::Result<T, SaysoError>;
