//! Audio download and processing utilities.
//!
//! Downloads audio with yt-dlp and reshapes it with ffmpeg/ffprobe.

use super::AudioDownloader;
use crate::error::{Result, SaysoError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Downloads best-available audio with yt-dlp.
pub struct YtDlpDownloader {
    program: String,
    format: String,
}

impl YtDlpDownloader {
    pub fn new(program: &str, format: &str) -> Self {
        Self {
            program: program.to_string(),
            format: format.to_string(),
        }
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new("yt-dlp", "mp3")
    }
}

#[async_trait]
impl AudioDownloader for YtDlpDownloader {
    #[instrument(skip(self, output_dir), fields(stem = %stem))]
    async fn download(&self, url: &str, output_dir: &Path, stem: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        info!("Downloading audio from {}", url);

        let template = output_dir.join(format!("{}.%(ext)s", stem));

        let result = Command::new(&self.program)
            .arg("-f").arg("bestaudio")
            .arg("--extract-audio")
            .arg("--audio-format").arg(&self.format)
            .arg("--output").arg(&template)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SaysoError::ToolNotFound(self.program.clone()));
            }
            Err(e) => {
                return Err(SaysoError::AudioDownload(format!(
                    "{} execution failed: {e}",
                    self.program
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SaysoError::AudioDownload(format!(
                "{} failed: {}",
                self.program,
                stderr.trim()
            )));
        }

        find_audio_file(output_dir, stem, &self.format)
    }
}

/// Locates a downloaded audio file by its stem.
fn find_audio_file(dir: &Path, stem: &str, preferred_ext: &str) -> Result<PathBuf> {
    let preferred = dir.join(format!("{}.{}", stem, preferred_ext));
    if preferred.exists() {
        return Ok(preferred);
    }

    // Formats yt-dlp falls back to when conversion is skipped
    for ext in &["mp3", "opus", "m4a", "webm", "ogg", "wav"] {
        let candidate = dir.join(format!("{}.{}", stem, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| SaysoError::AudioDownload(format!("Cannot read directory: {e}")))?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(stem) {
            return Ok(entry.path());
        }
    }

    Err(SaysoError::AudioDownload("Audio file not found after download".into()))
}

/// Converts audio to 16 kHz mono 16-bit PCM WAV, the input local Whisper expects.
pub async fn convert_to_wav(source: &Path, dest: &Path) -> Result<()> {
    debug!("Converting {:?} to 16 kHz WAV", source);

    let result = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i").arg(source)
        .arg("-vn")
        .arg("-acodec").arg("pcm_s16le")
        .arg("-ar").arg("16000")
        .arg("-ac").arg("1")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(SaysoError::ToolFailed(format!("ffmpeg conversion failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SaysoError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(SaysoError::ToolFailed(format!("ffmpeg error: {e}"))),
    }
}

/// Segments a long audio file into smaller chunks for upload.
///
/// Each chunk will be approximately `chunk_seconds` long. Returns tuples of
/// (chunk_path, offset_seconds) in playback order.
#[instrument(skip_all)]
pub async fn split_audio(
    source: &Path,
    output_dir: &Path,
    chunk_seconds: u32,
) -> Result<Vec<(PathBuf, f64)>> {
    std::fs::create_dir_all(output_dir)?;

    let total_duration = probe_duration(source).await?;
    info!("Total audio duration: {:.1}s", total_duration);

    let chunk_len = chunk_seconds.max(1) as f64;

    if total_duration <= chunk_len {
        return Ok(vec![(source.to_path_buf(), 0.0)]);
    }

    let base_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let extension = source
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("mp3");

    let mut segments = Vec::new();
    let mut offset = 0.0;
    let mut idx = 0u32;

    while offset < total_duration {
        let segment_path = output_dir.join(format!("{}_{:04}.{}", base_name, idx, extension));
        let segment_len = chunk_len.min(total_duration - offset);

        extract_segment(source, &segment_path, offset, segment_len).await?;

        debug!("Created segment {} at offset {:.1}s", idx, offset);
        segments.push((segment_path, offset));

        offset += chunk_len;
        idx += 1;
    }

    info!("Created {} audio segments", segments.len());
    Ok(segments)
}

/// Extracts a time segment from an audio file.
async fn extract_segment(source: &Path, dest: &Path, start: f64, length: f64) -> Result<()> {
    let copy_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("warning")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if let Ok(status) = copy_result {
        if status.success() && dest.exists() {
            return Ok(());
        }
    }

    warn!("Stream copy failed, re-encoding segment");

    let encode_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest.with_extension("mp3"))
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match encode_result {
        Ok(out) if out.status.success() => {
            if dest.extension().and_then(|e| e.to_str()) != Some("mp3") {
                std::fs::rename(dest.with_extension("mp3"), dest)?;
            }
            Ok(())
        }
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(SaysoError::ToolFailed(format!("Segment extraction failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SaysoError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(SaysoError::ToolFailed(format!("ffmpeg error: {e}"))),
    }
}

/// Queries the duration of an audio file using ffprobe with JSON output.
async fn probe_duration(path: &Path) -> Result<f64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SaysoError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(SaysoError::ToolFailed(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(SaysoError::ToolFailed("ffprobe returned error".into()));
    }

    parse_probe_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_duration(json_str: &str) -> Result<f64> {
    let parsed: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|_| SaysoError::ToolFailed("Invalid ffprobe output".into()))?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| SaysoError::ToolFailed("Could not determine audio duration".into()))
}
