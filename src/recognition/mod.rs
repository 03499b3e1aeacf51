//! Speech recognition for the offline transcript tier.
//!
//! Two providers exist: the OpenAI Whisper API (default) and a local
//! whisper.cpp model behind the `local-whisper` feature.

#[cfg(feature = "local-whisper")]
mod local;
mod whisper_api;

#[cfg(feature = "local-whisper")]
pub use local::LocalWhisperRecognizer;
pub use whisper_api::WhisperApiRecognizer;

use crate::config::{RecognitionProvider, Settings};
use crate::error::Result;
#[cfg(not(feature = "local-whisper"))]
use crate::error::SaysoError;
use crate::transcript::TranscriptFragment;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// A recognized span of speech, using the recognizer's own segment boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl RecognizedSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Convert to a fragment. An end before the start yields zero duration.
    pub fn into_fragment(self) -> TranscriptFragment {
        let duration = (self.end - self.start).max(0.0);
        TranscriptFragment::new(self.text, self.start, duration)
    }
}

/// Turns an audio file into timestamped text.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, audio_path: &Path) -> Result<Vec<RecognizedSegment>>;
}

/// Build the recognizer selected in settings.
pub fn create_recognizer(settings: &Settings) -> Result<Arc<dyn SpeechRecognizer>> {
    let recognition = &settings.recognition;

    match recognition.provider {
        RecognitionProvider::Api => Ok(Arc::new(WhisperApiRecognizer::with_config(
            &recognition.model,
            recognition.chunk_duration_seconds,
            recognition.language.clone(),
            settings.temp_dir(),
        )?)),
        #[cfg(feature = "local-whisper")]
        RecognitionProvider::Local => Ok(Arc::new(LocalWhisperRecognizer::new(
            settings.model_path(),
            recognition.language.clone(),
        ))),
        #[cfg(not(feature = "local-whisper"))]
        RecognitionProvider::Local => Err(SaysoError::Config(
            "recognition provider 'local' requires building with the local-whisper feature"
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_fragment_converts_end_to_duration() {
        let fragment = RecognizedSegment::new(1.5, 4.0, "hello").into_fragment();
        assert_eq!(fragment.start, 1.5);
        assert_eq!(fragment.duration, 2.5);
        assert_eq!(fragment.text, "hello");
    }

    #[test]
    fn test_into_fragment_clamps_negative_duration() {
        let fragment = RecognizedSegment::new(4.0, 3.0, "skew").into_fragment();
        assert_eq!(fragment.duration, 0.0);
    }

    #[test]
    fn test_create_api_recognizer() {
        let settings = Settings::default();
        assert!(create_recognizer(&settings).is_ok());
    }

    #[cfg(not(feature = "local-whisper"))]
    #[test]
    fn test_local_provider_without_feature_is_config_error() {
        let mut settings = Settings::default();
        settings.recognition.provider = RecognitionProvider::Local;
        assert!(matches!(
            create_recognizer(&settings),
            Err(SaysoError::Config(_))
        ));
    }
}
