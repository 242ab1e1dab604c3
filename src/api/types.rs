//! Request and response types for the support API.
//!
//! Request bodies use optional fields so a missing field is reported with the
//! API's own `{"error": ...}` envelope instead of an extractor rejection.

use crate::agent::AgentError;
use crate::classify::Classification;
use crate::escalation::{EscalationFactors, EscalationReason};
use crate::pipeline::{PipelineResponse, QueryOverrides, ResponseType};
use crate::tickets::Ticket;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// `POST /api/classify`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassifyRequest {
    pub text: Option<String>,
}

/// `POST /api/chat`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    pub query: Option<String>,
}

/// `POST /api/rag`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RagRequest {
    pub query: Option<String>,
    #[serde(flatten)]
    pub overrides: QueryOverrides,
}

/// `POST /api/mquery`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MqueryRequest {
    pub query: Option<String>,
    pub session_id: Option<String>,
}

/// `POST /api/escalation`
///
/// The classification is read leniently: missing or unknown labels fall back
/// to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EscalationRequest {
    pub query: Option<String>,
    pub classification: Option<serde_json::Value>,
    pub similarity_scores: Option<Vec<f64>>,
    pub draft_answer: Option<String>,
    pub escalation_threshold: Option<f64>,
}

/// `POST /api/quality`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QualityRequest {
    pub query: Option<String>,
    pub response: Option<String>,
    pub context_found: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketsResponse {
    /// Sample tickets for the dashboard
    pub tickets: Vec<serde_json::Value>,
    /// Tickets escalated by this server, newest first
    pub created: Vec<Ticket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyResponse {
    pub classification: Classification,
    /// Milliseconds
    pub processing_time: u64,
    pub confidence: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub query: String,
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub response: String,
    pub classification: Classification,
    pub escalation_score: f64,
    pub factors: EscalationFactors,
    pub reasoning: Vec<EscalationReason>,
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub processing_time: u64,
    pub confidence: u8,
    pub agents_used: Vec<&'static str>,
    pub analysis_details: String,
}

impl ChatResponse {
    pub fn new(query: String, result: PipelineResponse, processing_time: u64) -> Self {
        let analysis_details = format!(
            "Query classified as {} with {} sentiment. Escalation score: {:.2}.",
            result.classification.topic, result.classification.sentiment, result.escalation_score
        );

        Self {
            query,
            response_type: result.response_type,
            response: result.content,
            classification: result.classification,
            escalation_score: result.escalation_score,
            factors: result.factors,
            reasoning: result.reasoning,
            sources: result.sources,
            ticket_id: result.ticket_id,
            processing_time,
            confidence: 90,
            agents_used: vec!["rag_agent", "classifier"],
            analysis_details,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    #[serde(flatten)]
    pub result: PipelineResponse,
    pub processing_time: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MqueryResponse {
    pub query: String,
    pub response: String,
    pub session_id: String,
    pub processing_time: u64,
    pub agent: &'static str,
}

/// Error envelope: `{"error": "..."}` with a matching status code.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: message.into(),
        }
    }

    /// Create a bad request error (400).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 400 for a required request field that is absent or blank.
    pub fn missing_field(field: &str) -> Self {
        Self::bad_request(format!("Missing '{}' field in request", field))
    }

    /// Create a bad gateway error (502).
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    /// Create a service unavailable error (503).
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Create a gateway timeout error (504).
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AgentError> for ApiError {
    fn from(error: AgentError) -> Self {
        let message = error.to_string();
        match error {
            AgentError::Timeout(_) => ApiError::gateway_timeout(message),
            AgentError::Configuration(_) => ApiError::service_unavailable(message),
            AgentError::Network(_)
            | AgentError::Upstream { .. }
            | AgentError::InvalidResponse(_) => ApiError::bad_gateway(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Request body, or an empty one when the JSON could not be read so the
/// caller reports the missing field. Oversized bodies keep their 413.
pub(crate) fn read_body<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, rejection.body_text()))
        }
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "unreadable request body");
            Ok(T::default())
        }
    }
}

/// Unwrap a required text field, rejecting absent and blank values.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing_field(field))
}
