//! Transcript service tier.
//!
//! Uses the caption tracks YouTube's own player loads. Disabled captions and
//! missing languages are ordinary misses, as is every other client failure.

use super::{SourceMiss, TranscriptFragment, TranscriptRequest, TranscriptSource};
use crate::error::{Result, SaysoError};
use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

/// Fetches transcripts through the `yt-transcript-rs` client.
pub struct TranscriptServiceSource {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl TranscriptServiceSource {
    /// Create a source that asks for `languages` in order of preference.
    pub fn new(languages: Vec<String>) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None).map_err(|e| {
            SaysoError::Config(format!("Failed to create transcript client: {}", e))
        })?;

        let languages = if languages.is_empty() {
            vec!["en".to_string()]
        } else {
            languages
        };

        Ok(Self { api, languages })
    }
}

#[async_trait]
impl TranscriptSource for TranscriptServiceSource {
    fn name(&self) -> &'static str {
        "transcript service"
    }

    async fn fetch(
        &self,
        request: TranscriptRequest<'_>,
    ) -> std::result::Result<Vec<TranscriptFragment>, SourceMiss> {
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        let transcript = self
            .api
            .fetch_transcript(request.video_id.as_str(), &languages, false)
            .await
            .map_err(classify)?;

        Ok(transcript
            .snippets
            .into_iter()
            .map(|snippet| TranscriptFragment::new(snippet.text, snippet.start, snippet.duration))
            .collect())
    }
}

fn classify(error: CouldNotRetrieveTranscript) -> SourceMiss {
    let message = error.to_string();
    match error.reason {
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled) => SourceMiss::Disabled,
        Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => SourceMiss::NotFound,
        _ => SourceMiss::Failed(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use yt_transcript_rs::transcript_list::TranscriptList;

    fn failure(reason: Option<CouldNotRetrieveTranscriptReason>) -> CouldNotRetrieveTranscript {
        CouldNotRetrieveTranscript {
            video_id: "dQw4w9WgXcQ".to_string(),
            reason,
        }
    }

    #[test]
    fn test_disabled_captions_are_disabled_miss() {
        let miss = classify(failure(Some(
            CouldNotRetrieveTranscriptReason::TranscriptsDisabled,
        )));
        assert!(matches!(miss, SourceMiss::Disabled));
    }

    #[test]
    fn test_missing_language_is_not_found_miss() {
        let available = TranscriptList::new(
            "dQw4w9WgXcQ".to_string(),
            HashMap::new(),
            HashMap::new(),
            Vec::new(),
        );
        let miss = classify(failure(Some(
            CouldNotRetrieveTranscriptReason::NoTranscriptFound {
                requested_language_codes: vec!["en".to_string()],
                transcript_data: available,
            },
        )));
        assert!(matches!(miss, SourceMiss::NotFound));
    }

    #[test]
    fn test_other_failures_are_generic_misses() {
        let miss = classify(failure(Some(CouldNotRetrieveTranscriptReason::VideoUnavailable)));
        assert!(matches!(miss, SourceMiss::Failed(_)));

        let miss = classify(failure(None));
        assert!(matches!(miss, SourceMiss::Failed(_)));
    }
}
