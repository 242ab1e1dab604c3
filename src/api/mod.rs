//! # Support API
//!
//! JSON endpoints consumed by the support dashboard.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Liveness and uptime
//! - `GET /api/tickets` - Sample tickets plus tickets escalated by this server
//! - `POST /api/classify` - Classify ticket text
//! - `POST /api/chat` - Full pipeline with dashboard analysis fields
//! - `POST /api/rag` - Full pipeline with per-call overrides
//! - `POST /api/mquery` - Multi-turn conversational agent
//! - `POST /api/escalation` - Score a ticket with the escalation engine only
//! - `POST /api/quality` - Judge a drafted answer
//! - `GET /metrics` - Prometheus metrics
//!
//! ## Example
//!
//! ```no_run
//! use triage::api::{create_router, AppState};
//! use triage::config::TriageConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(TriageConfig::default());
//! let state = Arc::new(AppState::from_config(config, None)?);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Errors are returned as `{"error": "..."}`. Missing fields give 400;
//! language-model failures give 502, 503 or 504.

mod escalation;
mod health;
mod support;
mod tickets;
pub mod types;

pub use types::*;
pub(crate) use types::{read_body, required};

use crate::agent::{create_agent, AgentError, CompletionAgent};
use crate::classify::{Classifier, LlmClassifier};
use crate::config::TriageConfig;
use crate::conversation::ConversationAgent;
use crate::metrics::MetricsCollector;
use crate::pipeline::SupportPipeline;
use crate::quality::QualityEvaluator;
use crate::retrieval::Retriever;
use crate::tickets::TicketStore;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (1 MB).
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<TriageConfig>,
    pub classifier: Arc<dyn Classifier>,
    pub pipeline: SupportPipeline,
    pub conversation: ConversationAgent,
    pub quality: QualityEvaluator,
    pub tickets: Arc<TicketStore>,
    /// Metrics collector for observability
    pub metrics_collector: Arc<MetricsCollector>,
}

impl AppState {
    /// Wire the collaborators together.
    ///
    /// `agent` serves classification, drafting and quality judging;
    /// `conversation_agent` serves the multi-turn endpoint, which runs at a
    /// higher temperature.
    pub fn new(
        config: Arc<TriageConfig>,
        agent: Arc<dyn CompletionAgent>,
        conversation_agent: Arc<dyn CompletionAgent>,
        retriever: Option<Arc<dyn Retriever>>,
    ) -> Self {
        let start_time = Instant::now();
        let tickets = Arc::new(TicketStore::new());
        let classifier: Arc<dyn Classifier> = Arc::new(LlmClassifier::new(Arc::clone(&agent)));

        let mut pipeline = SupportPipeline::new(
            Arc::clone(&classifier),
            Arc::clone(&agent),
            config.escalation.engine(),
            Arc::clone(&tickets),
        )
        .with_retrieval_limits(config.retrieval.min_score, config.retrieval.max_docs);

        let mut conversation = ConversationAgent::new(conversation_agent)
            .with_documents(config.retrieval.conversation_docs);

        if let Some(retriever) = retriever {
            pipeline = pipeline.with_retriever(Arc::clone(&retriever));
            conversation = conversation.with_retriever(retriever);
        }

        // Only the first state in a process installs the global recorder;
        // later ones (tests) render from a detached recorder.
        let prometheus_handle = crate::metrics::setup_metrics().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "metrics recorder already installed");
            crate::metrics::PrometheusBuilder::new()
                .build_recorder()
                .handle()
        });
        let metrics_collector = Arc::new(MetricsCollector::new(start_time, prometheus_handle));

        Self {
            quality: QualityEvaluator::new(agent),
            config,
            classifier,
            pipeline,
            conversation,
            tickets,
            metrics_collector,
        }
    }

    /// Build the language-model agents described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Configuration`] when the HTTP client cannot be
    /// built or the provider's API key is missing.
    pub fn from_config(
        config: Arc<TriageConfig>,
        retriever: Option<Arc<dyn Retriever>>,
    ) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.server.request_timeout_seconds))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AgentError::Configuration(format!("HTTP client: {}", e)))?;
        let client = Arc::new(client);

        let agent = create_agent(&config.llm, config.llm.temperature, Arc::clone(&client))?;
        let conversation_agent =
            create_agent(&config.llm, config.llm.conversation_temperature, client)?;

        tracing::info!(agent = agent.name(), "language model configured");
        Ok(Self::new(config, agent, conversation_agent, retriever))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create the main API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/api/health", get(health::handle))
        .route("/api/tickets", get(tickets::handle))
        .route("/api/classify", post(support::classify))
        .route("/api/chat", post(support::chat))
        .route("/api/rag", post(support::rag))
        .route("/api/mquery", post(support::mquery))
        .route("/api/escalation", post(escalation::escalation))
        .route("/api/quality", post(escalation::quality))
        .route("/metrics", get(health::metrics))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Record request metrics for a finished handler and pass the result through.
pub(crate) fn observe<T>(
    state: &AppState,
    endpoint: &'static str,
    start: Instant,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status().as_u16(),
    };
    state
        .metrics_collector
        .record_request(endpoint, status, start.elapsed());
    result
}

/// Milliseconds since `start`, as reported in `processing_time`.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
