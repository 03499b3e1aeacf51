//! Audio download boundary for the offline transcript tier.

mod downloader;

pub use downloader::{convert_to_wav, split_audio, YtDlpDownloader};

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Fetches the audio track of a video to local disk.
#[async_trait]
pub trait AudioDownloader: Send + Sync {
    /// Download audio for `url` into `output_dir`, naming the file after `stem`.
    ///
    /// Returns the path of the produced file.
    async fn download(&self, url: &str, output_dir: &Path, stem: &str) -> Result<PathBuf>;
}
