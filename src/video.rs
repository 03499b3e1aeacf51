//! Video locator resolution.
//!
//! Turns a YouTube URL into the 11-character video identifier that every
//! transcript source is keyed by.

use crate::error::{Result, SaysoError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// URL shapes, in priority order: watch query parameter, short link, shorts path.
static LOCATOR_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"v=([a-zA-Z0-9_-]{11})").expect("valid watch pattern"),
        Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})").expect("valid short-link pattern"),
        Regex::new(r"shorts/([a-zA-Z0-9_-]{11})").expect("valid shorts pattern"),
    ]
});

/// An 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Plain watch URL.
    pub fn watch_url(&self) -> String {
        format!("https://youtube.com/watch?v={}", self.0)
    }

    /// Watch URL pointing at a specific second of the video.
    pub fn url_with_timestamp(&self, seconds: f64) -> String {
        format!("https://youtube.com/watch?v={}&t={}s", self.0, seconds as u32)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video identifier from a URL.
///
/// The first pattern that matches anywhere in the input wins. The identifier is
/// not checked against YouTube.
pub fn resolve(url: &str) -> Result<VideoId> {
    LOCATOR_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
        .ok_or_else(|| SaysoError::InvalidLocator(url.to_string()))
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
