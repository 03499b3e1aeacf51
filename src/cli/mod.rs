//! CLI module for Sayso.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Sayso - what did they say about it?
///
/// Finds every mention of a keyword in a YouTube video's transcript and
/// summarizes what the speaker said around it.
#[derive(Parser, Debug)]
#[command(name = "sayso")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SAYSO_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find a keyword in a video and summarize what was said about it
    Analyze {
        /// YouTube URL (watch, youtu.be or shorts link)
        url: String,

        /// Keyword to look for (case-insensitive)
        keyword: String,

        /// Neighbouring segments to include on each side of a match
        #[arg(short, long)]
        window: Option<usize>,

        /// Print the result payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a video's transcript and export it
    Transcript {
        /// YouTube URL (watch, youtu.be or shorts link)
        url: String,

        /// Output format (json, srt, vtt)
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "sayso",
            "-vv",
            "analyze",
            "https://youtu.be/dQw4w9WgXcQ",
            "cats",
            "--window",
            "3",
            "--json",
        ]);

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Analyze {
                url,
                keyword,
                window,
                json,
            } => {
                assert_eq!(url, "https://youtu.be/dQw4w9WgXcQ");
                assert_eq!(keyword, "cats");
                assert_eq!(window, Some(3));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_transcript_defaults() {
        let cli = Cli::parse_from(["sayso", "transcript", "https://youtu.be/dQw4w9WgXcQ"]);
        match cli.command {
            Commands::Transcript { format, output, .. } => {
                assert_eq!(format, "json");
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
