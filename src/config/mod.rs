//! Configuration module for Sayso.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::Prompts;
pub use settings::{
    AudioSettings, GeneralSettings, RecognitionProvider, RecognitionSettings, SearchSettings,
    ServerSettings, Settings, SummarizationSettings, TranscriptSettings,
};
