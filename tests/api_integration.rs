//! Integration tests for the support API.
//!
//! The language model is a wiremock OpenAI-compatible server; completions are
//! routed by a fragment of the prompt they answer.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CRITICAL_CLASSIFICATION: &str =
    r#"{"topic": "Sensitive data", "sentiment": "Angry", "priority": "P0"}"#;
const SSO_CLASSIFICATION: &str =
    "```json\n{\"topic\": \"SSO\", \"sentiment\": \"Neutral\", \"priority\": \"P2\"}\n```";

#[tokio::test]
async fn test_health_reports_healthy() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = get(&mut app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["message"], "Backend API is running");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_tickets_lists_samples() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = get(&mut app, "/api/tickets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tickets"].as_array().unwrap().len(), 6);
    assert_eq!(body["created"], json!([]));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_tickets_missing_sample_file_is_not_an_error_status() {
    let llm = MockServer::start().await;
    let mut config = test_config(&llm.uri());
    config.tickets.sample_path = "/nonexistent/sample_tickets.json".into();
    let mut app = create_test_app(config, None);

    let (status, body) = get(&mut app, "/api/tickets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tickets"], json!([]));
    assert_eq!(body["error"], "Sample tickets file not found");
}

#[tokio::test]
async fn test_classify_missing_text() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(&mut app, "/api/classify", json!({"ticket": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing 'text' field in request"}));
}

#[tokio::test]
async fn test_classify_non_json_body() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let request = Request::builder()
        .method("POST")
        .uri("/api/classify")
        .header("content-type", "text/plain")
        .body(Body::from("hello"))
        .unwrap();
    let (status, body) = send(&mut app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'text' field in request");
}

#[tokio::test]
async fn test_classify_fenced_json() {
    let llm = MockServer::start().await;
    mount_completion(&llm, CLASSIFY_PROMPT, SSO_CLASSIFICATION).await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(
        &mut app,
        "/api/classify",
        json!({"text": "How do I configure SAML SSO?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["classification"],
        json!({"topic": "SSO", "sentiment": "Neutral", "priority": "P2"})
    );
    assert_eq!(body["confidence"], 95);
    assert!(body["processing_time"].is_u64());
}

#[tokio::test]
async fn test_classify_upstream_failure_is_bad_gateway() {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&llm)
        .await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(&mut app, "/api/classify", json!({"text": "help"})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_chat_escalates_critical_ticket() {
    let llm = MockServer::start().await;
    mount_completion(&llm, CLASSIFY_PROMPT, CRITICAL_CLASSIFICATION).await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let query = "Our client PII is exposed in a public dashboard!";
    let (status, body) = post_json(&mut app, "/api/chat", json!({"query": query})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], query);
    assert_eq!(body["type"], "escalation");
    assert!((body["escalation_score"].as_f64().unwrap() - 0.82).abs() < 1e-9);
    assert_eq!(
        body["reasoning"],
        json!(["Low retrieval confidence", "High urgency/sentiment", "Critical topic"])
    );
    assert_eq!(
        body["response"],
        "Your query requires attention from a human support agent. Reasons: \
         Low retrieval confidence, High urgency/sentiment, Critical topic (Score: 0.82)"
    );
    assert_eq!(body["sources"], json!([]));
    assert_eq!(body["confidence"], 90);
    assert_eq!(body["agents_used"], json!(["rag_agent", "classifier"]));
    assert_eq!(
        body["analysis_details"],
        "Query classified as Sensitive data with Angry sentiment. Escalation score: 0.82."
    );

    let ticket_id = body["ticket_id"].as_str().unwrap().to_string();
    assert!(ticket_id.starts_with("TICK-"));

    let (_, tickets) = get(&mut app, "/api/tickets").await;
    let created = tickets["created"].as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["ticket_id"], ticket_id.as_str());
    assert_eq!(created[0]["escalation_info"]["should_escalate"], true);
}

#[tokio::test]
async fn test_chat_missing_query() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(&mut app, "/api/chat", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'query' field in request");
}

#[tokio::test]
async fn test_rag_answers_from_documentation() {
    let llm = MockServer::start().await;
    mount_completion(&llm, CLASSIFY_PROMPT, SSO_CLASSIFICATION).await;
    mount_completion(
        &llm,
        ANSWER_PROMPT,
        "Open Admin > SSO, choose SAML 2.0 and upload the IdP metadata XML.",
    )
    .await;
    let mut app = create_test_app(test_config(&llm.uri()), Some(sso_retriever()));

    let (status, body) = post_json(
        &mut app,
        "/api/rag",
        json!({"query": "How do I configure SAML SSO?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "ai_response");
    assert_eq!(
        body["content"],
        "Open Admin > SSO, choose SAML 2.0 and upload the IdP metadata XML."
    );
    assert_eq!(body["sources"], json!(["data/docs/sso.md"]));
    assert!(body["escalation_score"].as_f64().unwrap() < 0.6);
    assert!(body.get("ticket_id").is_none());
    assert!(body["processing_time"].is_u64());
}

#[tokio::test]
async fn test_rag_threshold_override_escalates() {
    let llm = MockServer::start().await;
    mount_completion(&llm, CLASSIFY_PROMPT, SSO_CLASSIFICATION).await;
    mount_completion(&llm, ANSWER_PROMPT, "Open Admin > SSO.").await;
    let mut app = create_test_app(test_config(&llm.uri()), Some(sso_retriever()));

    let (status, body) = post_json(
        &mut app,
        "/api/rag",
        json!({"query": "How do I configure SAML SSO?", "escalation_threshold": 0.05}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "escalation");
    assert!(body["ticket_id"].as_str().unwrap().starts_with("TICK-"));

    // The override applies to that call only.
    let (_, body) = post_json(
        &mut app,
        "/api/rag",
        json!({"query": "How do I configure SAML SSO?"}),
    )
    .await;
    assert_eq!(body["type"], "ai_response");
}

#[tokio::test]
async fn test_rag_without_index_routes_to_support() {
    let llm = MockServer::start().await;
    mount_completion(&llm, CLASSIFY_PROMPT, SSO_CLASSIFICATION).await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(&mut app, "/api/rag", json!({"query": "Where is SSO"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "ai_response");
    assert_eq!(
        body["content"],
        "No relevant information found in the documentation. \
         This ticket should be routed to the support team."
    );
}

#[tokio::test]
async fn test_mquery_greeting_then_fallback() {
    let llm = MockServer::start().await;
    mount_completion(&llm, ROUTING_PROMPT, "NO_RAG").await;
    mount_completion(&llm, FALLBACK_PROMPT, "Glad to help with anything else!").await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(&mut app, "/api/mquery", json!({"query": "hello"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Hello! How can I help you today?");
    assert_eq!(body["agent"], "mquery");
    let session_id = body["session_id"].as_str().unwrap().to_string();
    assert!(!session_id.is_empty());

    let (status, body) = post_json(
        &mut app,
        "/api/mquery",
        json!({"query": "thanks, that is all", "session_id": session_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Glad to help with anything else!");
    assert_eq!(body["session_id"], session_id.as_str());
}

#[tokio::test]
async fn test_escalation_endpoint_scores_without_model() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(
        &mut app,
        "/api/escalation",
        json!({
            "query": "Our client PII is exposed in a public dashboard!",
            "classification": {"topic": "Sensitive data", "sentiment": "Angry", "priority": "P0"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["should_escalate"], true);
    assert!((body["escalation_score"].as_f64().unwrap() - 0.82).abs() < 1e-9);
    assert_eq!(body["factors"]["retrieval_confidence"], 1.0);
    assert!(llm.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_escalation_endpoint_lenient_classification_and_threshold() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(
        &mut app,
        "/api/escalation",
        json!({
            "query": "Where is the lineage graph",
            "classification": {"topic": "Billing", "sentiment": 7},
            "similarity_scores": [0.9, 0.85, 0.8],
            "escalation_threshold": 0.0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["factors"]["topic_criticality"], 0.2);
    assert_eq!(body["factors"]["sentiment_urgency"], 0.0);
    assert_eq!(body["should_escalate"], true);
    assert_eq!(body["reasoning"], json!([]));
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);
    let query = "a".repeat(1_100_000);

    for uri in ["/api/chat", "/api/rag", "/api/escalation", "/api/quality"] {
        let (status, body) =
            post_json(&mut app, uri, json!({"query": query, "response": "ok"})).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{uri}");
        assert!(body["error"].is_string(), "{uri}: {body}");
        assert_ne!(body["error"], "Missing 'query' field in request");
    }
    assert!(llm.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_escalation_endpoint_missing_query() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(&mut app, "/api/escalation", json!({"classification": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'query' field in request");
}

#[tokio::test]
async fn test_quality_normalizes_reasoning() {
    let llm = MockServer::start().await;
    mount_completion(
        &llm,
        QUALITY_PROMPT,
        r#"{"response_quality": 0.4, "should_escalate": true, "reasoning": "No useful context"}"#,
    )
    .await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, body) = post_json(
        &mut app,
        "/api/quality",
        json!({"query": "How do I rotate keys?", "response": "I am not sure.", "context_found": false}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response_quality"], 0.4);
    assert_eq!(body["should_escalate"], true);
    assert_eq!(body["reasoning"], json!(["No useful context"]));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = tower::Service::call(&mut app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_router_returns_404_unknown() {
    let llm = MockServer::start().await;
    let mut app = create_test_app(test_config(&llm.uri()), None);

    let (status, _) = get(&mut app, "/unknown/path").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
