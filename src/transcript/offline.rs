//! Offline tier: download the audio track and transcribe it locally or via API.

use super::{SourceMiss, TranscriptFragment, TranscriptRequest, TranscriptSource};
use crate::audio::AudioDownloader;
use crate::recognition::SpeechRecognizer;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Produces a transcript by speech recognition over downloaded audio.
///
/// Each fetch works in its own temporary directory, removed when the fetch ends.
pub struct OfflineSource {
    downloader: Arc<dyn AudioDownloader>,
    recognizer: Arc<dyn SpeechRecognizer>,
    work_dir: PathBuf,
}

impl OfflineSource {
    pub fn new(
        downloader: Arc<dyn AudioDownloader>,
        recognizer: Arc<dyn SpeechRecognizer>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            downloader,
            recognizer,
            work_dir,
        }
    }
}

#[async_trait]
impl TranscriptSource for OfflineSource {
    fn name(&self) -> &'static str {
        "offline recognition"
    }

    async fn fetch(
        &self,
        request: TranscriptRequest<'_>,
    ) -> std::result::Result<Vec<TranscriptFragment>, SourceMiss> {
        std::fs::create_dir_all(&self.work_dir)
            .map_err(|e| SourceMiss::Failed(format!("cannot create work directory: {}", e)))?;

        let scratch = tempfile::Builder::new()
            .prefix("sayso-")
            .tempdir_in(&self.work_dir)
            .map_err(|e| SourceMiss::Failed(format!("cannot create scratch directory: {}", e)))?;

        let audio = self
            .downloader
            .download(request.url, scratch.path(), request.video_id.as_str())
            .await
            .map_err(|e| SourceMiss::Download(e.to_string()))?;

        debug!("Audio saved to {:?}", audio);
        info!("Running speech recognition on {}", request.video_id);

        let segments = self
            .recognizer
            .recognize(&audio)
            .await
            .map_err(|e| SourceMiss::Failed(format!("recognition failed: {}", e)))?;

        Ok(segments.into_iter().map(|s| s.into_fragment()).collect())
    }
}
