//! Classification, pipeline and conversation endpoint handlers.

use crate::api::{
    elapsed_ms, observe, read_body, required, ApiError, AppState, ChatRequest, ChatResponse,
    ClassifyRequest, ClassifyResponse, MqueryRequest, MqueryResponse, RagRequest, RagResponse,
};
use crate::logging::{generate_request_id, query_preview};
use crate::pipeline::{PipelineResponse, QueryOverrides};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// POST /api/classify - Classify ticket text.
pub async fn classify(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let start = Instant::now();
    let result = match read_body(body) {
        Ok(request) => classify_ticket(&state, request, start).await,
        Err(e) => Err(e),
    };
    observe(&state, "classify", start, result)
}

async fn classify_ticket(
    state: &AppState,
    request: ClassifyRequest,
    start: Instant,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let text = required(request.text, "text")?;
    let classification = state.classifier.classify(&text).await?;

    info!(topic = %classification.topic, priority = %classification.priority, "ticket classified");
    Ok(Json(ClassifyResponse {
        classification,
        processing_time: elapsed_ms(start),
        confidence: 95,
    }))
}

/// Run the pipeline for one query, recording the escalation decision.
async fn run_pipeline(
    state: &AppState,
    endpoint: &'static str,
    query: &str,
    overrides: QueryOverrides,
) -> Result<PipelineResponse, ApiError> {
    let request_id = generate_request_id();
    info!(
        request_id = %request_id,
        endpoint,
        query_preview = query_preview(query, state.config.logging.enable_content_logging)
            .as_deref()
            .unwrap_or(""),
        "support query received"
    );

    let result = state
        .pipeline
        .process_query(query, overrides)
        .await
        .map_err(|e| {
            warn!(request_id = %request_id, error = %e, "support query failed");
            ApiError::from(e)
        })?;

    state.metrics_collector.record_escalation(
        result.classification.topic.label(),
        result.is_escalation(),
        result.escalation_score,
    );
    info!(
        request_id = %request_id,
        escalation_score = result.escalation_score,
        ticket_id = result.ticket_id.as_deref().unwrap_or(""),
        "support query answered"
    );
    Ok(result)
}

/// POST /api/chat - Pipeline result with dashboard analysis fields.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let start = Instant::now();
    let result = match read_body(body).and_then(|request| required(request.query, "query")) {
        Ok(query) => run_pipeline(&state, "chat", &query, QueryOverrides::default())
            .await
            .map(|result| Json(ChatResponse::new(query, result, elapsed_ms(start)))),
        Err(e) => Err(e),
    };
    observe(&state, "chat", start, result)
}

/// POST /api/rag - Pipeline result with per-call overrides.
pub async fn rag(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RagRequest>, JsonRejection>,
) -> Result<Json<RagResponse>, ApiError> {
    let start = Instant::now();
    let result = match read_body(body)
        .and_then(|request| Ok((required(request.query, "query")?, request.overrides)))
    {
        Ok((query, overrides)) => run_pipeline(&state, "rag", &query, overrides)
            .await
            .map(|result| {
                Json(RagResponse {
                    result,
                    processing_time: elapsed_ms(start),
                })
            }),
        Err(e) => Err(e),
    };
    observe(&state, "rag", start, result)
}

/// POST /api/mquery - One turn of a multi-turn conversation.
pub async fn mquery(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MqueryRequest>, JsonRejection>,
) -> Result<Json<MqueryResponse>, ApiError> {
    let start = Instant::now();
    let result = match read_body(body) {
        Ok(request) => converse(&state, request, start).await,
        Err(e) => Err(e),
    };
    observe(&state, "mquery", start, result)
}

async fn converse(
    state: &AppState,
    request: MqueryRequest,
    start: Instant,
) -> Result<Json<MqueryResponse>, ApiError> {
    let query = required(request.query, "query")?;
    let reply = state
        .conversation
        .respond(request.session_id.as_deref(), &query)
        .await?;

    Ok(Json(MqueryResponse {
        query,
        response: reply.response,
        session_id: reply.session_id,
        processing_time: elapsed_ms(start),
        agent: "mquery",
    }))
}
