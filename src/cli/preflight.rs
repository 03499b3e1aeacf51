//! Pre-flight checks before running an analysis.
//!
//! The caption tiers need no local tools or keys, so a missing requirement
//! here only disables later tiers. Findings are returned as warnings.

use crate::config::{RecognitionProvider, Settings};
use crate::openai::is_api_key_configured;
use std::process::Command;

/// Operations that can be checked.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Analyze (acquire, search and summarize).
    Analyze,
    /// Acquire a transcript only.
    Transcript,
}

/// Describe every missing requirement for `operation`.
pub fn check(operation: Operation, settings: &Settings) -> Vec<String> {
    let mut warnings = Vec::new();
    let offline = settings.transcript.offline;
    let api_recognition = settings.recognition.provider == RecognitionProvider::Api;

    let needs_key = match operation {
        Operation::Analyze => true,
        Operation::Transcript => offline && api_recognition,
    };

    if needs_key && !is_api_key_configured() {
        warnings.push(
            "OPENAI_API_KEY not set; summaries and API speech recognition will fail. \
             Set it with: export OPENAI_API_KEY='sk-...'"
                .to_string(),
        );
    }

    if offline {
        for tool in [settings.audio.downloader.as_str(), "ffmpeg", "ffprobe"] {
            if let Err(problem) = check_tool(tool) {
                warnings.push(format!(
                    "{}; videos without captions cannot be transcribed",
                    problem
                ));
            }
        }
    }

    warnings
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> std::result::Result<(), String> {
    // ffmpeg/ffprobe use -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(format!("{} is installed but not working correctly", name)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("{} not found in PATH", name))
        }
        Err(e) => Err(format!("{}: {}", name, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_without_offline_tier_needs_nothing() {
        let mut settings = Settings::default();
        settings.transcript.offline = false;
        assert!(check(Operation::Transcript, &settings).is_empty());
    }

    #[test]
    fn test_missing_tool_is_reported() {
        assert!(check_tool("sayso-no-such-tool").is_err());

        let mut settings = Settings::default();
        settings.audio.downloader = "sayso-no-such-tool".to_string();
        let warnings = check(Operation::Transcript, &settings);
        assert!(warnings.iter().any(|w| w.contains("sayso-no-such-tool")));
    }
}
