//! Transcript export (JSON, SRT, VTT).

use super::TranscriptFragment;
use crate::text;
use crate::video::VideoId;
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Srt,
    Vtt,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "srt" => Ok(OutputFormat::Srt),
            "vtt" | "webvtt" => Ok(OutputFormat::Vtt),
            _ => Err(format!("Unknown format: {}. Use json, srt, or vtt.", s)),
        }
    }
}

#[derive(Debug, Serialize)]
struct TranscriptExport<'a> {
    video_id: &'a str,
    url: String,
    segments: Vec<CueExport>,
}

#[derive(Debug, Serialize)]
struct CueExport {
    text: String,
    start_seconds: f64,
    end_seconds: f64,
}

/// Render fragments in `format`. Cue text is whitespace-normalized.
pub fn format_transcript(
    video_id: &VideoId,
    fragments: &[TranscriptFragment],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => format_json(video_id, fragments),
        OutputFormat::Srt => format_cues(fragments, String::new(), ','),
        OutputFormat::Vtt => format_cues(fragments, String::from("WEBVTT\n\n"), '.'),
    }
}

fn format_json(video_id: &VideoId, fragments: &[TranscriptFragment]) -> String {
    let export = TranscriptExport {
        video_id: video_id.as_str(),
        url: video_id.watch_url(),
        segments: fragments
            .iter()
            .map(|f| CueExport {
                text: text::clean(&f.text),
                start_seconds: f.start,
                end_seconds: f.end(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&export).unwrap_or_else(|_| "{}".to_string())
}

fn format_cues(fragments: &[TranscriptFragment], mut output: String, separator: char) -> String {
    for (i, fragment) in fragments.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            cue_timestamp(fragment.start, separator),
            cue_timestamp(fragment.end(), separator)
        ));
        output.push_str(&text::clean(&fragment.text));
        output.push_str("\n\n");
    }

    output
}

/// `HH:MM:SS<sep>mmm`, with `,` for SRT and `.` for VTT.
fn cue_timestamp(seconds: f64, separator: char) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, secs, separator, ms)
}
