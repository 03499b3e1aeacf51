//! Transcript command - fetch and export a transcript without analysis.

use crate::analysis::TRANSCRIPT_UNAVAILABLE;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::transcript::{format_transcript, OutputFormat, TranscriptChain};
use crate::video;
use anyhow::{anyhow, bail, Result};

/// Run the transcript command.
pub async fn run_transcript(
    url: &str,
    format: &str,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let format: OutputFormat = format.parse().map_err(|e: String| anyhow!(e))?;
    let video_id = video::resolve(url)?;

    for warning in preflight::check(Operation::Transcript, &settings) {
        Output::warning(&warning);
    }

    let chain = TranscriptChain::from_settings(&settings)?;

    let spinner = Output::spinner(&format!("Fetching transcript for {}...", video_id));
    let fragments = chain.acquire_for(url, &video_id).await;
    spinner.finish_and_clear();

    let Some(fragments) = fragments else {
        bail!(TRANSCRIPT_UNAVAILABLE);
    };

    let rendered = format_transcript(&video_id, &fragments, format);

    match output {
        Some(path) => {
            let path = Settings::expand_path(&path);
            std::fs::write(&path, rendered)?;
            Output::success(&format!(
                "Wrote {} segments to {}",
                fragments.len(),
                path.display()
            ));
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
