//! CLI output formatting utilities.

use crate::analysis::AnalysisResult;
use crate::video::{format_timestamp, VideoId};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one keyword match with a link to the moment in the video.
    pub fn mention(video_id: &VideoId, start: f64, context: &str) {
        println!(
            "\n{} {}",
            style(">>").green(),
            style(format_timestamp(start)).cyan().bold()
        );
        println!("   {}", content_preview(context, 300));
        println!("   {}", style(video_id.url_with_timestamp(start)).dim());
    }

    /// Print an analysis result for a human reader.
    pub fn analysis(video_id: &VideoId, result: &AnalysisResult) {
        match result {
            AnalysisResult::Error { message } => Self::error(message),
            AnalysisResult::NoMatch { message, .. } => Self::warning(message),
            AnalysisResult::Match {
                keyword,
                segments,
                summary,
            } => {
                Self::header(&format!("Mentions of '{}'", keyword));
                Self::kv("Video", video_id.as_str());
                Self::kv("Mentions", &segments.len().to_string());

                for segment in segments {
                    Self::mention(video_id, segment.start, &segment.context);
                }

                Self::header("Summary");
                println!("{}", summary);
            }
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    match content.char_indices().nth(max_chars) {
        None => content,
        Some((cut, _)) => format!("{}...", &content[..cut]),
    }
}
