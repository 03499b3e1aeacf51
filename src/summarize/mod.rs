//! Summarization of merged keyword contexts.
//!
//! [`ChatSummarizer`] makes a single model call. [`ChunkedSummarizer`] wraps any
//! summarizer so long inputs are summarized piecewise and then recombined.

mod chat;
mod chunked;

pub use chat::ChatSummarizer;
pub use chunked::{chunk_words, ChunkedSummarizer};

use crate::config::Settings;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns a block of text into a short summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Build the configured summarizer: chat completion behind word chunking.
pub fn create_summarizer(settings: &Settings) -> Result<Arc<dyn Summarizer>> {
    let summarization = &settings.summarization;

    let chat = ChatSummarizer::new(
        &summarization.model,
        settings.prompts.summary_system.clone(),
        summarization.temperature,
        summarization.max_tokens,
    )?;

    Ok(Arc::new(ChunkedSummarizer::new(
        Arc::new(chat),
        summarization.chunk_words,
        summarization.short_text_words,
        settings.prompts.combine_directive.clone(),
    )))
}
