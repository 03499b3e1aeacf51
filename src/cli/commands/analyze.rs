//! Analyze command implementation.

use crate::analysis::Analyzer;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::video;
use anyhow::{bail, Result};

/// Run the analyze command.
pub async fn run_analyze(
    url: &str,
    keyword: &str,
    window: Option<usize>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    if keyword.trim().is_empty() {
        bail!("Keyword must not be empty");
    }

    let video_id = video::resolve(url)?;

    for warning in preflight::check(Operation::Analyze, &settings) {
        Output::warning(&warning);
    }

    let analyzer = Analyzer::new(&settings)?;
    let window = window.unwrap_or_else(|| analyzer.window());

    let spinner = (!json).then(|| Output::spinner(&format!("Analyzing {}...", video_id)));
    let result = analyzer.analyze_with_window(url, keyword, window).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let result = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        Output::analysis(&video_id, &result);
    }

    if result.is_error() {
        std::process::exit(1);
    }

    Ok(())
}
