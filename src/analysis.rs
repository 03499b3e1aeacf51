//! Keyword analysis of a single video.
//!
//! Acquire a transcript, find the segments mentioning the keyword, and
//! summarize what was said around them. Acquisition failure and "no mention"
//! both end the run early; the summarizer only runs when there is something to
//! summarize.

use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::search::{self, KeywordMatch};
use crate::summarize::{create_summarizer, Summarizer};
use crate::text;
use crate::transcript::{TranscriptChain, TranscriptFragment};
use crate::video::{self, VideoId};
use serde::ser::{Serialize, Serializer};
use std::sync::Arc;
use tracing::{info, instrument};

/// Message reported when every transcript source missed.
pub const TRANSCRIPT_UNAVAILABLE: &str = "Transcript could not be extracted.";

/// Outcome of an analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Error {
        message: String,
    },
    NoMatch {
        keyword: String,
        message: String,
    },
    Match {
        keyword: String,
        segments: Vec<KeywordMatch>,
        summary: String,
    },
}

impl AnalysisResult {
    fn no_match(keyword: &str) -> Self {
        Self::NoMatch {
            keyword: keyword.to_string(),
            message: format!("Keyword '{}' not found in this video.", keyword),
        }
    }

    /// Number of matching segments.
    pub fn mentions(&self) -> usize {
        match self {
            Self::Match { segments, .. } => segments.len(),
            _ => 0,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Flat wire shape shared by the CLI `--json` output and the HTTP API.
#[derive(serde::Serialize)]
struct Payload<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword_found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mentions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segments: Option<&'a [KeywordMatch]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let payload = match self {
            Self::Error { message } => Payload {
                status: "error",
                keyword_found: None,
                keyword: None,
                mentions: None,
                message: Some(message.as_str()),
                segments: None,
                summary: None,
            },
            Self::NoMatch { keyword, message } => Payload {
                status: "success",
                keyword_found: Some(false),
                keyword: Some(keyword.as_str()),
                mentions: Some(0),
                message: Some(message.as_str()),
                segments: None,
                summary: None,
            },
            Self::Match {
                keyword,
                segments,
                summary,
            } => Payload {
                status: "success",
                keyword_found: Some(true),
                keyword: Some(keyword.as_str()),
                mentions: Some(segments.len()),
                message: None,
                segments: Some(segments.as_slice()),
                summary: Some(summary.as_str()),
            },
        };
        payload.serialize(serializer)
    }
}

/// Runs analyses. Holds no per-request state, so one instance can serve
/// concurrent requests.
pub struct Analyzer {
    chain: TranscriptChain,
    summarizer: Arc<dyn Summarizer>,
    prompts: Prompts,
    window: usize,
}

impl Analyzer {
    /// Build the standard pipeline from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self::with_components(
            TranscriptChain::from_settings(settings)?,
            create_summarizer(settings)?,
            settings.prompts.clone(),
            settings.search.window,
        ))
    }

    pub fn with_components(
        chain: TranscriptChain,
        summarizer: Arc<dyn Summarizer>,
        prompts: Prompts,
        window: usize,
    ) -> Self {
        Self {
            chain,
            summarizer,
            prompts,
            window,
        }
    }

    /// The configured context window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Analyze with the configured context window.
    pub async fn analyze(&self, url: &str, keyword: &str) -> Result<AnalysisResult> {
        self.analyze_with_window(url, keyword, self.window).await
    }

    /// Analyze a video for `keyword`.
    ///
    /// Fails for an unrecognized URL or a failed summarizer call. A transcript
    /// that could not be acquired is reported in the result.
    #[instrument(skip(self, url))]
    pub async fn analyze_with_window(
        &self,
        url: &str,
        keyword: &str,
        window: usize,
    ) -> Result<AnalysisResult> {
        let video_id = video::resolve(url)?;

        let Some(fragments) = self.chain.acquire_for(url, &video_id).await else {
            return Ok(AnalysisResult::Error {
                message: TRANSCRIPT_UNAVAILABLE.to_string(),
            });
        };

        let indexed = search::index(&fragments);
        info!("Transcript words: {}", indexed.word_count());

        let segments = search::find_keyword_segments(&indexed.segments, keyword, window);
        if segments.is_empty() {
            info!("No mentions of '{}'", keyword);
            return Ok(AnalysisResult::no_match(keyword));
        }

        let merged = search::merge_contexts(&segments);
        info!(
            "{} mentions, {} context words",
            segments.len(),
            text::word_count(&merged)
        );

        let prompt = format!("{}{}", self.prompts.keyword_directive_for(keyword), merged);
        let summary = self.summarizer.summarize(&prompt).await?;

        Ok(AnalysisResult::Match {
            keyword: keyword.to_string(),
            segments,
            summary,
        })
    }

    /// Acquire only the transcript. `Ok(None)` when every source missed.
    pub async fn transcript(
        &self,
        url: &str,
    ) -> Result<Option<(VideoId, Vec<TranscriptFragment>)>> {
        let video_id = video::resolve(url)?;
        Ok(self
            .chain
            .acquire_for(url, &video_id)
            .await
            .map(|fragments| (video_id, fragments)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaysoError;
    use crate::transcript::{SourceMiss, TranscriptRequest, TranscriptSource};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedSource(Option<Vec<TranscriptFragment>>);

    #[async_trait]
    impl TranscriptSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(
            &self,
            _request: TranscriptRequest<'_>,
        ) -> std::result::Result<Vec<TranscriptFragment>, SourceMiss> {
            self.0.clone().ok_or(SourceMiss::NotFound)
        }
    }

    #[derive(Default)]
    struct EchoSummarizer {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, text: &str) -> Result<String> {
            self.inputs.lock().unwrap().push(text.to_string());
            Ok("they like cats".to_string())
        }
    }

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    fn pets() -> Vec<TranscriptFragment> {
        vec![
            TranscriptFragment::new("cats are\ngreat", 0.0, 5.0),
            TranscriptFragment::new("dogs bark loud", 5.0, 5.0),
            TranscriptFragment::new("cats  sleep a lot", 10.0, 5.0),
        ]
    }

    fn analyzer(
        fragments: Option<Vec<TranscriptFragment>>,
        window: usize,
    ) -> (Analyzer, Arc<EchoSummarizer>) {
        let summarizer = Arc::new(EchoSummarizer::default());
        let sources: Vec<Box<dyn TranscriptSource>> = vec![Box::new(FixedSource(fragments))];
        let chain = TranscriptChain::new(sources);
        let analyzer =
            Analyzer::with_components(chain, summarizer.clone(), Prompts::default(), window);
        (analyzer, summarizer)
    }

    #[tokio::test]
    async fn test_match_summarizes_merged_context_once() {
        let (analyzer, summarizer) = analyzer(Some(pets()), 1);

        let result = analyzer.analyze(URL, "cats").await.unwrap();

        let AnalysisResult::Match {
            keyword,
            segments,
            summary,
        } = &result
        else {
            panic!("expected a match, got {:?}", result);
        };
        assert_eq!(keyword, "cats");
        assert_eq!(summary, "they like cats");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].context, "cats are great dogs bark loud");
        assert_eq!(segments[1].start, 10.0);
        assert_eq!(result.mentions(), 2);

        let inputs = summarizer.inputs.lock().unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(
            inputs[0],
            "Summarize what the speaker said about cats: \
             cats are great dogs bark loud dogs bark loud cats sleep a lot"
        );
    }

    #[tokio::test]
    async fn test_no_match_skips_summarizer() {
        let (analyzer, summarizer) = analyzer(Some(pets()), 1);

        let result = analyzer.analyze(URL, "parrots").await.unwrap();

        assert_eq!(
            result,
            AnalysisResult::NoMatch {
                keyword: "parrots".to_string(),
                message: "Keyword 'parrots' not found in this video.".to_string(),
            }
        );
        assert_eq!(result.mentions(), 0);
        assert!(summarizer.inputs.lock().unwrap().is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["keyword_found"], false);
        assert_eq!(json["mentions"], 0);
        assert!(json.get("summary").is_none());
        assert!(json.get("segments").is_none());
    }

    #[tokio::test]
    async fn test_exhausted_chain_is_error_result() {
        let (analyzer, summarizer) = analyzer(None, 1);

        let result = analyzer.analyze(URL, "cats").await.unwrap();

        assert!(result.is_error());
        assert!(summarizer.inputs.lock().unwrap().is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "Transcript could not be extracted."})
        );
    }

    #[tokio::test]
    async fn test_invalid_url_is_err() {
        let (analyzer, _) = analyzer(Some(pets()), 1);
        let result = analyzer.analyze("not a url", "cats").await;
        assert!(matches!(result, Err(SaysoError::InvalidLocator(_))));
    }

    #[tokio::test]
    async fn test_window_override() {
        let (analyzer, _) = analyzer(Some(pets()), 1);

        let result = analyzer
            .analyze_with_window(URL, "dogs", 0)
            .await
            .unwrap();

        let AnalysisResult::Match { segments, .. } = result else {
            panic!("expected a match");
        };
        assert_eq!(segments[0].context, "dogs bark loud");
    }

    #[test]
    fn test_match_payload_shape() {
        let result = AnalysisResult::Match {
            keyword: "cats".to_string(),
            segments: vec![KeywordMatch {
                start: 10.0,
                context: "cats sleep".to_string(),
            }],
            summary: "short".to_string(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "success",
                "keyword_found": true,
                "keyword": "cats",
                "mentions": 1,
                "segments": [{"start": 10.0, "context": "cats sleep"}],
                "summary": "short",
            })
        );
    }

    #[tokio::test]
    async fn test_transcript_only() {
        let (analyzer, _) = analyzer(Some(pets()), 1);
        let (id, fragments) = analyzer.transcript(URL).await.unwrap().unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(fragments.len(), 3);
    }
}
