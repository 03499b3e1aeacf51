//! Word-chunked summarization for inputs longer than a model's window.

use super::Summarizer;
use crate::error::{Result, SaysoError};
use crate::text;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Summarizes long text chunk by chunk, then summarizes the summaries.
pub struct ChunkedSummarizer {
    inner: Arc<dyn Summarizer>,
    chunk_words: usize,
    short_text_words: usize,
    combine_directive: String,
}

impl ChunkedSummarizer {
    pub fn new(
        inner: Arc<dyn Summarizer>,
        chunk_words: usize,
        short_text_words: usize,
        combine_directive: String,
    ) -> Self {
        Self {
            inner,
            chunk_words: chunk_words.max(1),
            short_text_words,
            combine_directive,
        }
    }
}

/// Split text into consecutive chunks of at most `size` words.
pub fn chunk_words(text: &str, size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(size.max(1)).map(|c| c.join(" ")).collect()
}

#[async_trait]
impl Summarizer for ChunkedSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        if text::word_count(text) < self.short_text_words {
            return self.inner.summarize(text).await;
        }

        let chunks = chunk_words(text, self.chunk_words);
        info!("Summarizing {} chunks", chunks.len());

        let mut summaries = Vec::with_capacity(chunks.len());
        for (idx, chunk) in chunks.iter().enumerate() {
            match self.inner.summarize(chunk).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => warn!("Chunk {} summarization failed, dropping it: {}", idx, e),
            }
        }

        if summaries.is_empty() {
            return Err(SaysoError::Summarization(format!(
                "all {} chunks failed",
                chunks.len()
            )));
        }

        debug!("{} of {} chunks summarized", summaries.len(), chunks.len());

        let combined = format!("{}{}", self.combine_directive, summaries.join(" "));
        self.inner.summarize(&combined).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records inputs; fails any input containing `poison`.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Summarizer for Recording {
        async fn summarize(&self, text: &str) -> Result<String> {
            self.calls.lock().unwrap().push(text.to_string());
            if text.contains("poison") {
                return Err(SaysoError::Summarization("model refused".into()));
            }
            Ok(format!("S{}", self.calls.lock().unwrap().len()))
        }
    }

    fn words(n: usize, word: &str) -> String {
        vec![word; n].join(" ")
    }

    fn chunked(inner: Arc<Recording>) -> ChunkedSummarizer {
        ChunkedSummarizer::new(inner, 350, 120, "Summarize the following points: ".into())
    }

    #[test]
    fn test_chunk_words() {
        assert_eq!(chunk_words("a b c d e", 2), vec!["a b", "c d", "e"]);
        assert_eq!(chunk_words("  a\nb  ", 5), vec!["a b"]);
        assert!(chunk_words("", 3).is_empty());
    }

    #[tokio::test]
    async fn test_short_text_goes_straight_through() {
        let inner = Arc::new(Recording::default());
        let text = words(119, "w");

        let summary = chunked(inner.clone()).summarize(&text).await.unwrap();

        assert_eq!(summary, "S1");
        assert_eq!(*inner.calls.lock().unwrap(), vec![text]);
    }

    #[tokio::test]
    async fn test_long_text_is_chunked_then_combined() {
        let inner = Arc::new(Recording::default());
        let text = words(800, "w");

        let summary = chunked(inner.clone()).summarize(&text).await.unwrap();

        let calls = inner.calls.lock().unwrap();
        // 350 + 350 + 100 words, then the final pass
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[3], "Summarize the following points: S1 S2 S3");
        assert_eq!(summary, "S4");
    }

    #[tokio::test]
    async fn test_failed_chunk_is_dropped() {
        let inner = Arc::new(Recording::default());
        let text = format!("{} poison {}", words(349, "w"), words(200, "w"));

        let summary = chunked(inner.clone()).summarize(&text).await.unwrap();

        let calls = inner.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], "Summarize the following points: S2");
        assert_eq!(summary, "S3");
    }

    #[tokio::test]
    async fn test_all_chunks_failing_is_an_error() {
        let inner = Arc::new(Recording::default());
        let text = words(200, "poison");

        let result = chunked(inner).summarize(&text).await;
        assert!(matches!(result, Err(SaysoError::Summarization(_))));
    }
}
