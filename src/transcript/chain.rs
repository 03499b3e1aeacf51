//! Ordered fallback over transcript sources.

use super::{
    OfflineSource, SourceMiss, TimedTextSource, TranscriptFragment, TranscriptRequest,
    TranscriptServiceSource, TranscriptSource,
};
use crate::audio::YtDlpDownloader;
use crate::config::Settings;
use crate::error::Result;
use crate::recognition::create_recognizer;
use crate::video::{self, VideoId};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Tries each source in order and returns the first non-empty transcript.
pub struct TranscriptChain {
    sources: Vec<Box<dyn TranscriptSource>>,
}

impl TranscriptChain {
    /// Create a chain from sources, in the order they should be tried.
    pub fn new(sources: Vec<Box<dyn TranscriptSource>>) -> Self {
        Self { sources }
    }

    /// Build the standard chain (timed text, service, offline) from settings.
    ///
    /// A tier that cannot be constructed is left out with a warning, except the
    /// offline recognizer, whose configuration errors are reported.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut sources: Vec<Box<dyn TranscriptSource>> = Vec::new();
        let transcript = &settings.transcript;

        if transcript.timedtext {
            sources.push(Box::new(TimedTextSource::new(
                &transcript.timedtext_url,
                &transcript.language,
                Duration::from_secs(transcript.request_timeout_seconds),
            )?));
        }

        if transcript.service {
            match TranscriptServiceSource::new(transcript.service_languages.clone()) {
                Ok(source) => sources.push(Box::new(source)),
                Err(e) => warn!("Transcript service tier disabled: {}", e),
            }
        }

        if transcript.offline {
            let downloader = Arc::new(YtDlpDownloader::new(
                &settings.audio.downloader,
                &settings.audio.format,
            ));
            let recognizer = create_recognizer(settings)?;
            sources.push(Box::new(OfflineSource::new(
                downloader,
                recognizer,
                settings.temp_dir(),
            )));
        }

        Ok(Self::new(sources))
    }

    /// Names of the configured tiers, in order.
    pub fn tiers(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve the URL and acquire a transcript for it.
    ///
    /// Fails only for an unrecognized URL, before any network activity.
    /// `Ok(None)` means every tier missed.
    pub async fn acquire(&self, url: &str) -> Result<Option<Vec<TranscriptFragment>>> {
        let video_id = video::resolve(url)?;
        Ok(self.acquire_for(url, &video_id).await)
    }

    /// Acquire a transcript for an already resolved video.
    #[instrument(skip(self, url), fields(video_id = %video_id))]
    pub async fn acquire_for(
        &self,
        url: &str,
        video_id: &VideoId,
    ) -> Option<Vec<TranscriptFragment>> {
        let request = TranscriptRequest { url, video_id };

        for source in &self.sources {
            info!("Trying {}...", source.name());

            let attempt = AssertUnwindSafe(source.fetch(request)).catch_unwind().await;
            let outcome = match attempt {
                Ok(Ok(fragments)) if fragments.is_empty() => Err(SourceMiss::Empty),
                Ok(result) => result,
                Err(_) => Err(SourceMiss::Failed("source panicked".to_string())),
            };

            match outcome {
                Ok(fragments) => {
                    info!(
                        "Transcript found using {} ({} fragments)",
                        source.name(),
                        fragments.len()
                    );
                    return Some(fragments);
                }
                Err(miss) => info!("{} missed: {}", source.name(), miss),
            }
        }

        warn!("All transcript sources missed");
        None
    }
}
