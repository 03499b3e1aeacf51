//! Local whisper.cpp recognizer.

use super::{RecognizedSegment, SpeechRecognizer};
use crate::audio::convert_to_wav;
use crate::error::{Result, SaysoError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Runs a ggml Whisper model in-process.
///
/// The model is loaded on first use and kept for the life of the recognizer.
/// Each call gets its own inference state, so concurrent calls are safe.
pub struct LocalWhisperRecognizer {
    model_path: PathBuf,
    language: Option<String>,
    context: OnceCell<Arc<WhisperContext>>,
}

impl LocalWhisperRecognizer {
    pub fn new(model_path: PathBuf, language: Option<String>) -> Self {
        Self {
            model_path,
            language,
            context: OnceCell::new(),
        }
    }

    async fn context(&self) -> Result<Arc<WhisperContext>> {
        let context = self
            .context
            .get_or_try_init(|| async {
                let path = self.model_path.clone();
                info!("Loading Whisper model from {:?}", path);
                tokio::task::spawn_blocking(move || load_model(&path))
                    .await
                    .map_err(|e| SaysoError::Recognition(format!("model loader panicked: {}", e)))?
                    .map(Arc::new)
            })
            .await?;
        Ok(context.clone())
    }
}

fn load_model(path: &Path) -> Result<WhisperContext> {
    let path_str = path
        .to_str()
        .ok_or_else(|| SaysoError::Config(format!("model path is not UTF-8: {:?}", path)))?;

    if !path.exists() {
        return Err(SaysoError::Config(format!(
            "Whisper model not found at {}",
            path.display()
        )));
    }

    WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
        .map_err(|e| SaysoError::Recognition(format!("Failed to load Whisper model: {:?}", e)))
}

fn read_samples(wav_path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(wav_path)
        .map_err(|e| SaysoError::Recognition(format!("Cannot read WAV: {}", e)))?;

    reader
        .samples::<i16>()
        .map(|s| s.map(|v| v as f32 / 32768.0))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| SaysoError::Recognition(format!("Corrupt WAV data: {}", e)))
}

fn run_inference(
    context: &WhisperContext,
    samples: &[f32],
    language: Option<&str>,
) -> Result<Vec<RecognizedSegment>> {
    let mut state = context
        .create_state()
        .map_err(|e| SaysoError::Recognition(format!("Failed to create state: {:?}", e)))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(language);
    params.set_print_progress(false);
    params.set_print_realtime(false);

    state
        .full(params, samples)
        .map_err(|e| SaysoError::Recognition(format!("Inference failed: {:?}", e)))?;

    let mut segments = Vec::new();
    for i in 0..state.full_n_segments() {
        let Some(segment) = state.get_segment(i) else {
            continue;
        };
        let Ok(text) = segment.to_str_lossy() else {
            continue;
        };
        // Timestamps are in centiseconds
        segments.push(RecognizedSegment::new(
            segment.start_timestamp() as f64 / 100.0,
            segment.end_timestamp() as f64 / 100.0,
            text.into_owned(),
        ));
    }

    Ok(segments)
}

#[async_trait]
impl SpeechRecognizer for LocalWhisperRecognizer {
    async fn recognize(&self, audio_path: &Path) -> Result<Vec<RecognizedSegment>> {
        let context = self.context().await?;

        let wav_path = audio_path.with_extension("16k.wav");
        convert_to_wav(audio_path, &wav_path).await?;
        debug!("Converted audio to {:?}", wav_path);

        let language = self.language.clone();
        let segments = tokio::task::spawn_blocking(move || {
            let samples = read_samples(&wav_path)?;
            run_inference(&context, &samples, language.as_deref())
        })
        .await
        .map_err(|e| SaysoError::Recognition(format!("inference task panicked: {}", e)))??;

        debug!("Recognized {} segments locally", segments.len());
        Ok(segments)
    }
}
