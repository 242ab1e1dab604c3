//! Escalation scoring and answer-quality endpoint handlers.

use crate::api::{elapsed_ms, observe, read_body, required, ApiError, AppState, EscalationRequest, QualityRequest};
use crate::classify::Classification;
use crate::escalation::EscalationDecision;
use crate::quality::QualityAssessment;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// POST /api/escalation - Score a ticket without calling any model.
pub async fn escalation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EscalationRequest>, JsonRejection>,
) -> Result<Json<EscalationDecision>, ApiError> {
    let start = Instant::now();
    let result = read_body(body).and_then(|request| score(&state, request));
    observe(&state, "escalation", start, result)
}

fn score(state: &AppState, request: EscalationRequest) -> Result<Json<EscalationDecision>, ApiError> {
    let query = request.query.ok_or_else(|| ApiError::missing_field("query"))?;
    let classification = request
        .classification
        .as_ref()
        .map(Classification::from_value)
        .unwrap_or_default();

    if let Some(threshold) = request.escalation_threshold {
        if !threshold.is_finite() {
            return Err(ApiError::bad_request(
                "'escalation_threshold' must be a finite number",
            ));
        }
    }

    let engine = request
        .escalation_threshold
        .map_or(state.pipeline.engine(), |t| state.pipeline.engine().with_threshold(t));
    let decision = engine.score(
        &query,
        &classification,
        request.similarity_scores.as_deref(),
        request.draft_answer.as_deref(),
    );

    state.metrics_collector.record_escalation(
        classification.topic.label(),
        decision.should_escalate,
        decision.escalation_score,
    );
    info!(
        escalation_score = decision.escalation_score,
        should_escalate = decision.should_escalate,
        "escalation scored"
    );
    Ok(Json(decision))
}

/// POST /api/quality - Judge a drafted answer.
pub async fn quality(
    State(state): State<Arc<AppState>>,
    body: Result<Json<QualityRequest>, JsonRejection>,
) -> Result<Json<QualityAssessment>, ApiError> {
    let start = Instant::now();
    let result = match read_body(body) {
        Ok(request) => evaluate(&state, request).await,
        Err(e) => Err(e),
    };
    if let Ok(assessment) = &result {
        info!(
            response_quality = assessment.response_quality,
            elapsed_ms = elapsed_ms(start),
            "answer evaluated"
        );
    }
    observe(&state, "quality", start, result)
}

async fn evaluate(
    state: &AppState,
    request: QualityRequest,
) -> Result<Json<QualityAssessment>, ApiError> {
    let query = required(request.query, "query")?;
    let response = required(request.response, "response")?;
    let assessment = state
        .quality
        .evaluate(&query, &response, request.context_found)
        .await?;
    Ok(Json(assessment))
}
