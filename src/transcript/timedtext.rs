//! YouTube timed-text endpoint.
//!
//! The endpoint answers `GET ?v=<id>&lang=<tag>` with a small XML document:
//!
//! ```xml
//! <transcript>
//!   <text start="0.5" dur="2.1">hello there</text>
//! </transcript>
//! ```
//!
//! Any non-success status, empty body or unparsable document is a miss.

use super::{SourceMiss, TranscriptFragment, TranscriptRequest, TranscriptSource};
use crate::error::{Result, SaysoError};
use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fetches transcripts from the public timed-text endpoint.
pub struct TimedTextSource {
    client: reqwest::Client,
    base_url: Url,
    language: String,
}

impl TimedTextSource {
    pub fn new(base_url: &str, language: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            SaysoError::Config(format!("Invalid timed-text URL '{}': {}", base_url, e))
        })?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            language: language.to_string(),
        })
    }

    fn request_url(&self, video_id: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("v", video_id)
            .append_pair("lang", &self.language);
        url
    }
}

#[async_trait]
impl TranscriptSource for TimedTextSource {
    fn name(&self) -> &'static str {
        "timedtext"
    }

    async fn fetch(
        &self,
        request: TranscriptRequest<'_>,
    ) -> std::result::Result<Vec<TranscriptFragment>, SourceMiss> {
        let url = self.request_url(request.video_id.as_str());
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceMiss::Failed(format!("timed-text request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceMiss::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceMiss::Failed(format!("timed-text body unreadable: {}", e)))?;

        if body.trim().is_empty() {
            return Err(SourceMiss::Empty);
        }

        let fragments = parse_timedtext(&body)?;
        if fragments.is_empty() {
            return Err(SourceMiss::Empty);
        }

        Ok(fragments)
    }
}

/// Entry being read between `<text>` and `</text>`.
struct PendingEntry {
    start: f64,
    duration: f64,
    text: String,
}

/// Parse a timed-text document into fragments.
///
/// Only `<text>` elements directly under the root element are read. Text is
/// entity-unescaped but otherwise left as-is.
pub fn parse_timedtext(body: &str) -> std::result::Result<Vec<TranscriptFragment>, SourceMiss> {
    let mut reader = Reader::from_str(body);
    let mut fragments = Vec::new();
    let mut depth = 0usize;
    let mut pending: Option<PendingEntry> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SourceMiss::Malformed(e.to_string()))?;

        match event {
            Event::Start(element) => {
                depth += 1;
                if depth == 2 && element.name().as_ref() == b"text" {
                    let (start, duration) = entry_timing(&element)?;
                    pending = Some(PendingEntry {
                        start,
                        duration,
                        text: String::new(),
                    });
                }
            }
            Event::Empty(element) => {
                if depth == 1 && element.name().as_ref() == b"text" {
                    let (start, duration) = entry_timing(&element)?;
                    fragments.push(TranscriptFragment::new(String::new(), start, duration));
                }
            }
            Event::Text(text) if depth == 2 => {
                if let Some(entry) = pending.as_mut() {
                    let unescaped = text
                        .unescape()
                        .map_err(|e| SourceMiss::Malformed(e.to_string()))?;
                    entry.text.push_str(&unescaped);
                }
            }
            Event::CData(data) if depth == 2 => {
                if let Some(entry) = pending.as_mut() {
                    entry.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some(entry) = pending.take() {
                        fragments.push(TranscriptFragment::new(
                            entry.text,
                            entry.start,
                            entry.duration,
                        ));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fragments)
}

/// Read `start` and `dur`, defaulting missing attributes to zero.
fn entry_timing(element: &BytesStart<'_>) -> std::result::Result<(f64, f64), SourceMiss> {
    Ok((
        numeric_attribute(element, "start")?,
        numeric_attribute(element, "dur")?,
    ))
}

fn numeric_attribute(element: &BytesStart<'_>, name: &str) -> std::result::Result<f64, SourceMiss> {
    let attribute = element
        .try_get_attribute(name)
        .map_err(|e| SourceMiss::Malformed(e.to_string()))?;

    let Some(attribute) = attribute else {
        return Ok(0.0);
    };

    let value = attribute
        .unescape_value()
        .map_err(|e| SourceMiss::Malformed(e.to_string()))?;

    value.trim().parse::<f64>().map_err(|_| {
        SourceMiss::Malformed(format!("attribute {}=\"{}\" is not a number", name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.1">so today we&amp;#39;re
talking about cats</text><text start="2.6" dur="1.9">and dogs &amp; birds</text><text start="4.5">no duration</text><text dur="3">no start</text></transcript>"#;

    #[test]
    fn test_parse_sample() {
        let fragments = parse_timedtext(SAMPLE).unwrap();

        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[0].text, "so today we&#39;re\ntalking about cats");
        assert_eq!(fragments[0].start, 0.5);
        assert_eq!(fragments[0].duration, 2.1);
        assert_eq!(fragments[1].text, "and dogs & birds");
        assert_eq!(fragments[2].duration, 0.0);
        assert_eq!(fragments[3].start, 0.0);
        assert_eq!(fragments[3].duration, 3.0);
    }

    #[test]
    fn test_parse_keeps_source_order() {
        let body = r#"<transcript><text start="9">late</text><text start="1">early</text></transcript>"#;
        let fragments = parse_timedtext(body).unwrap();
        assert_eq!(fragments[0].text, "late");
        assert_eq!(fragments[1].text, "early");
    }

    #[test]
    fn test_parse_empty_and_self_closing_entries() {
        let body = r#"<transcript><text start="1" dur="1"/><text start="2" dur="1"></text></transcript>"#;
        let fragments = parse_timedtext(body).unwrap();
        assert_eq!(fragments.len(), 2);
        assert!(fragments.iter().all(|f| f.text.is_empty()));
    }

    #[test]
    fn test_parse_ignores_nested_text_elements() {
        let body = r#"<transcript><body><text start="1">nested</text></body></transcript>"#;
        assert!(parse_timedtext(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_timedtext("<transcript><text start=\"1\">open</transcript>"),
            Err(SourceMiss::Malformed(_))
        ));
        assert!(matches!(
            parse_timedtext("<transcript><text start=\"abc\">bad</text></transcript>"),
            Err(SourceMiss::Malformed(_))
        ));
    }

    fn source_for(server: &MockServer) -> TimedTextSource {
        TimedTextSource::new(
            &format!("{}/api/timedtext", server.uri()),
            "en",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    async fn fetch_from(server: &MockServer) -> std::result::Result<Vec<TranscriptFragment>, SourceMiss> {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        let video_id = video::resolve(url).unwrap();
        source_for(server)
            .fetch(TranscriptRequest {
                url,
                video_id: &video_id,
            })
            .await
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .and(query_param("v", "dQw4w9WgXcQ"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
            .mount(&server)
            .await;

        let fragments = fetch_from(&server).await.unwrap();
        assert_eq!(fragments.len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(fetch_from(&server).await, Err(SourceMiss::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_blank_body_is_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n "))
            .mount(&server)
            .await;

        assert_eq!(fetch_from(&server).await, Err(SourceMiss::Empty));
    }

    #[tokio::test]
    async fn test_fetch_document_without_entries_is_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<transcript></transcript>"))
            .mount(&server)
            .await;

        assert_eq!(fetch_from(&server).await, Err(SourceMiss::Empty));
    }

    #[tokio::test]
    async fn test_fetch_malformed_is_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<transcript><text>unclosed</transcript>"),
            )
            .mount(&server)
            .await;

        assert!(matches!(
            fetch_from(&server).await,
            Err(SourceMiss::Malformed(_))
        ));
    }
}
