//! Transcript acquisition.
//!
//! A transcript is fetched through an ordered chain of sources, cheapest first:
//!
//! 1. **Timed text**: YouTube's public timed-text endpoint.
//! 2. **Service**: the transcript service used by YouTube's own player.
//! 3. **Offline**: download the audio and run speech recognition on it.
//!
//! Every source reports failure as a [`SourceMiss`]. The chain logs the miss and
//! moves on; only running out of sources is visible to the caller.

mod chain;
mod format;
mod offline;
mod service;
mod timedtext;

pub use chain::TranscriptChain;
pub use format::{format_transcript, OutputFormat};
pub use offline::OfflineSource;
pub use service::TranscriptServiceSource;
pub use timedtext::{parse_timedtext, TimedTextSource};

use crate::video::VideoId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw timestamped piece of transcript text, as returned by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    /// Text as delivered by the source (not yet cleaned).
    pub text: String,
    /// Start offset in seconds.
    pub start: f64,
    /// Duration in seconds. Zero when the source does not report one.
    pub duration: f64,
}

impl TranscriptFragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    /// End offset in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// The video a transcript is requested for.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptRequest<'a> {
    /// URL as given by the user (the downloader needs it verbatim).
    pub url: &'a str,
    /// Identifier resolved from the URL.
    pub video_id: &'a VideoId,
}

/// Why a single source produced no transcript.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceMiss {
    #[error("source answered with HTTP {0}")]
    Status(u16),

    #[error("source returned an empty transcript")]
    Empty,

    #[error("malformed transcript: {0}")]
    Malformed(String),

    #[error("transcripts are disabled for this video")]
    Disabled,

    #[error("no transcript found in the requested languages")]
    NotFound,

    #[error("audio download failed: {0}")]
    Download(String),

    #[error("{0}")]
    Failed(String),
}

/// One tier of the acquisition chain.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to produce a transcript. Never panics on bad input from the network.
    async fn fetch(
        &self,
        request: TranscriptRequest<'_>,
    ) -> std::result::Result<Vec<TranscriptFragment>, SourceMiss>;
}
