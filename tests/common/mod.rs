//! Shared test utilities for triage integration tests.
//!
//! Provides a mock OpenAI-compatible completion server, configuration and
//! app builders, and a fixed retriever.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::Service;
use triage::api::{create_router, AppState};
use triage::config::{LlmProvider, TriageConfig};
use triage::retrieval::{Document, RetrievalError, Retriever, ScoredDocument};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Prompt fragments used to route mock completions
// =============================================================================

pub const CLASSIFY_PROMPT: &str = "classifies support tickets";
pub const ANSWER_PROMPT: &str = "Use the provided context";
pub const QUALITY_PROMPT: &str = "support QA evaluator";
pub const ROUTING_PROMPT: &str = "Respond with either";
pub const FALLBACK_PROMPT: &str = "Continue the conversation";

/// An OpenAI chat completion whose single choice carries `content`.
pub fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
}

/// Answer every completion whose prompt contains `fragment` with `content`.
pub async fn mount_completion(server: &MockServer, fragment: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(fragment))
        .respond_with(completion(content))
        .mount(server)
        .await;
}

// =============================================================================
// Configuration and app builders
// =============================================================================

/// Configuration pointing the language model at `llm_uri`.
pub fn test_config(llm_uri: &str) -> TriageConfig {
    let mut config = TriageConfig::default();
    config.llm.provider = LlmProvider::OpenAI;
    config.llm.model = "gpt-4o-mini".to_string();
    config.llm.base_url = Some(llm_uri.to_string());
    config.llm.api_key_env = "TRIAGE_TEST_UNSET_API_KEY".to_string();
    config.llm.timeout_seconds = 5;
    config.tickets.sample_path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_tickets.json");
    config
}

pub fn create_test_app(
    config: TriageConfig,
    retriever: Option<Arc<dyn Retriever>>,
) -> axum::Router {
    let state = AppState::from_config(Arc::new(config), retriever).unwrap();
    create_router(Arc::new(state))
}

/// Send a request and decode the JSON response body.
pub async fn send(app: &mut axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn post_json(app: &mut axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &mut axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

// =============================================================================
// Retrieval
// =============================================================================

pub fn scored(content: &str, source: &str, score: f64) -> ScoredDocument {
    ScoredDocument {
        document: Document {
            content: content.to_string(),
            source: source.to_string(),
        },
        score,
    }
}

/// Retriever returning fixed documents, honouring `min_score` and `max_docs`.
pub struct StaticRetriever(pub Vec<ScoredDocument>);

#[async_trait]
impl Retriever for StaticRetriever {
    async fn search(
        &self,
        _query: &str,
        min_score: f64,
        max_docs: usize,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        Ok(self
            .0
            .iter()
            .filter(|d| d.score >= min_score)
            .take(max_docs)
            .cloned()
            .collect())
    }
}

pub fn sso_retriever() -> Arc<dyn Retriever> {
    Arc::new(StaticRetriever(vec![
        scored("Open Admin > SSO and choose SAML 2.0.", "data/docs/sso.md", 0.91),
        scored("Upload the IdP metadata XML and save.", "data/docs/sso.md", 0.84),
        scored("Lineage is computed nightly.", "data/docs/lineage.md", 0.05),
    ]))
}
