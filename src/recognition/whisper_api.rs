//! OpenAI Whisper API recognizer.

use super::{RecognizedSegment, SpeechRecognizer};
use crate::audio::split_audio;
use crate::error::{Result, SaysoError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Sends audio to the Whisper API, splitting long files into chunks.
pub struct WhisperApiRecognizer {
    client: Client<OpenAIConfig>,
    model: String,
    chunk_duration_seconds: u32,
    language: Option<String>,
    work_dir: PathBuf,
}

impl WhisperApiRecognizer {
    pub fn with_config(
        model: &str,
        chunk_duration_seconds: u32,
        language: Option<String>,
        work_dir: PathBuf,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            chunk_duration_seconds,
            language,
            work_dir,
        })
    }

    /// Transcribe a single file without splitting.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn recognize_single(&self, audio_path: &Path) -> Result<Vec<RecognizedSegment>> {
        let file_bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(file_name, file_bytes))
            .model(&self.model)
            .response_format(AudioResponseFormat::VerboseJson);

        if let Some(lang) = &self.language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| SaysoError::Recognition(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe_verbose_json(request)
            .await
            .map_err(|e| SaysoError::OpenAI(format!("Whisper API error: {}", e)))?;

        let segments = match response.segments {
            Some(segments) => segments
                .iter()
                .map(|s| RecognizedSegment::new(s.start as f64, s.end as f64, s.text.clone()))
                .collect(),
            // Whole file as one segment
            None => vec![RecognizedSegment::new(
                0.0,
                response.duration as f64,
                response.text,
            )],
        };

        debug!("Recognized {} segments", segments.len());
        Ok(segments)
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperApiRecognizer {
    async fn recognize(&self, audio_path: &Path) -> Result<Vec<RecognizedSegment>> {
        std::fs::create_dir_all(&self.work_dir)?;
        let chunk_dir = tempfile::Builder::new()
            .prefix("chunks-")
            .tempdir_in(&self.work_dir)?;

        let chunks = split_audio(audio_path, chunk_dir.path(), self.chunk_duration_seconds).await?;

        if chunks.len() == 1 {
            return self.recognize_single(audio_path).await;
        }

        info!("Processing {} audio chunks with {}", chunks.len(), self.model);

        let mut all_segments = Vec::new();
        for (idx, (chunk_path, offset)) in chunks.iter().enumerate() {
            let segments = self.recognize_single(chunk_path).await.map_err(|e| {
                SaysoError::Recognition(format!("Chunk {} at {:.0}s failed: {}", idx, offset, e))
            })?;

            all_segments.extend(offset_segments(segments, *offset));
        }

        Ok(all_segments)
    }
}

/// Shift chunk-relative segment times onto the timeline of the whole file.
fn offset_segments(segments: Vec<RecognizedSegment>, offset: f64) -> Vec<RecognizedSegment> {
    segments
        .into_iter()
        .map(|mut s| {
            s.start += offset;
            s.end += offset;
            s
        })
        .collect()
}
