//! Sayso - find what a speaker said about a topic in a video.
//!
//! Given a YouTube URL and a keyword, Sayso fetches a transcript, finds every
//! segment that mentions the keyword, gathers the surrounding context and
//! summarizes it.
//!
//! # Architecture
//!
//! - `video` - URL to video ID resolution
//! - `transcript` - tiered transcript acquisition (timed text, transcript
//!   service, offline speech recognition) and export formats
//! - `audio` - audio download and ffmpeg processing for the offline tier
//! - `recognition` - speech recognition providers
//! - `text` - whitespace normalization
//! - `search` - segment indexing, windowed keyword search, context merging
//! - `summarize` - chunked LLM summarization
//! - `analysis` - the end-to-end pipeline and its result payload
//! - `config` - configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use sayso::analysis::Analyzer;
//! use sayso::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let analyzer = Analyzer::new(&settings)?;
//!
//!     let result = analyzer
//!         .analyze("https://youtu.be/dQw4w9WgXcQ", "love")
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod recognition;
pub mod search;
pub mod summarize;
pub mod text;
pub mod transcript;
pub mod video;

pub use error::{Result, SaysoError};
