//! HTTP API server.
//!
//! `POST /analyze` takes `{"url": .., "keyword": .., "window": ..}` and answers
//! with the same payload `sayso analyze --json` prints.

use crate::analysis::Analyzer;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::SaysoError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
struct AppState {
    analyzer: Analyzer,
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    for warning in preflight::check(Operation::Analyze, &settings) {
        Output::warning(&warning);
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let state = Arc::new(AppState {
        analyzer: Analyzer::new(&settings)?,
    });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Sayso API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Analyze", "POST /analyze");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize, Default)]
struct AnalyzeRequest {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default)]
    window: Option<usize>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn analyze(State(state): State<Arc<AppState>>, Json(req): Json<AnalyzeRequest>) -> Response {
    let url = req.url.as_deref().map(str::trim).unwrap_or_default();
    let keyword = req.keyword.as_deref().unwrap_or_default();

    if url.is_empty() || keyword.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "URL and keyword are required!");
    }

    let window = req.window.unwrap_or_else(|| state.analyzer.window());
    info!("POST /analyze keyword='{}' window={}", keyword, window);

    match state.analyzer.analyze_with_window(url, keyword, window).await {
        Ok(result) => Json(result).into_response(),
        Err(e @ SaysoError::InvalidLocator(_)) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::error::Result;
    use crate::summarize::Summarizer;
    use crate::transcript::{
        SourceMiss, TranscriptChain, TranscriptFragment, TranscriptRequest, TranscriptSource,
    };
    use async_trait::async_trait;

    struct CannedSource;

    #[async_trait]
    impl TranscriptSource for CannedSource {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn fetch(
            &self,
            _request: TranscriptRequest<'_>,
        ) -> std::result::Result<Vec<TranscriptFragment>, SourceMiss> {
            Ok(vec![
                TranscriptFragment::new("my cats are great", 0.0, 5.0),
                TranscriptFragment::new("dogs bark loud", 5.0, 5.0),
                TranscriptFragment::new("we concatenate strings", 10.0, 5.0),
            ])
        }
    }

    struct FixedSummary;

    #[async_trait]
    impl Summarizer for FixedSummary {
        async fn summarize(&self, _text: &str) -> Result<String> {
            Ok("cats are praised".to_string())
        }
    }

    fn state() -> Arc<AppState> {
        let sources: Vec<Box<dyn TranscriptSource>> = vec![Box::new(CannedSource)];
        Arc::new(AppState {
            analyzer: Analyzer::with_components(
                TranscriptChain::new(sources),
                Arc::new(FixedSummary),
                Prompts::default(),
                1,
            ),
        })
    }

    async fn call(req: AnalyzeRequest) -> (StatusCode, serde_json::Value) {
        let response = analyze(State(state()), Json(req)).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let (status, body) = call(AnalyzeRequest {
            url: Some("https://youtu.be/dQw4w9WgXcQ".into()),
            keyword: Some("   ".into()),
            window: None,
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL and keyword are required!");

        let (status, _) = call(AnalyzeRequest::default()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_url_is_bad_request() {
        let (status, body) = call(AnalyzeRequest {
            url: Some("https://example.com/video".into()),
            keyword: Some("cats".into()),
            window: None,
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid YouTube URL"));
    }

    #[tokio::test]
    async fn test_analyze_returns_payload() {
        let (status, body) = call(AnalyzeRequest {
            url: Some("https://youtu.be/dQw4w9WgXcQ".into()),
            keyword: Some("cats".into()),
            window: Some(0),
        })
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["keyword_found"], true);
        assert_eq!(body["mentions"], 1);
        assert_eq!(body["segments"][0]["context"], "my cats are great");
        assert_eq!(body["summary"], "cats are praised");
    }

    #[tokio::test]
    async fn test_keyword_is_searched_verbatim() {
        let request = |keyword: &str| AnalyzeRequest {
            url: Some("https://youtu.be/dQw4w9WgXcQ".into()),
            keyword: Some(keyword.into()),
            window: Some(0),
        };

        let (status, bare) = call(request("cat")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bare["mentions"], 2);

        let (status, padded) = call(request(" cat")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(padded["keyword"], " cat");
        assert_eq!(padded["mentions"], 1);
        assert_eq!(padded["segments"][0]["context"], "my cats are great");
    }

    #[tokio::test]
    async fn test_router_builds() {
        let _ = router(state());
    }
}
