//! # Support pipeline
//!
//! Straight-line processing of one support query:
//!
//! 1. Retrieve documentation once (failures degrade to no documentation)
//! 2. Classify the query
//! 3. Draft an answer when documentation was found
//! 4. Score the ticket with the [`EscalationEngine`]
//! 5. Either open a ticket for a human agent or return the drafted answer
//!
//! Collaborators are injected, so the pipeline holds no global state and a
//! per-call threshold override never leaks into other requests.

pub mod prompts;

pub use prompts::assistant_prompt;

use crate::agent::{AgentError, CompletionAgent};
use crate::classify::{Classification, Classifier};
use crate::escalation::{EscalationDecision, EscalationEngine, EscalationFactors, EscalationReason};
use crate::retrieval::{self, Retriever};
use crate::tickets::TicketStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Answer returned when no documentation matched the query.
pub const NO_CONTEXT_ANSWER: &str = "No relevant information found in the documentation. \
                                     This ticket should be routed to the support team.";

/// Reason shown when a ticket escalates without any individual trigger firing.
pub const THRESHOLD_FALLBACK_REASON: &str = "Threshold exceeded";

/// Per-call overrides of the pipeline defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOverrides {
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_docs: Option<usize>,
    #[serde(default)]
    pub escalation_threshold: Option<f64>,
}

/// Whether the query was answered or handed to a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Escalation,
    AiResponse,
}

/// Result of processing one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub content: String,
    pub classification: Classification,
    pub escalation_score: f64,
    pub factors: EscalationFactors,
    pub reasoning: Vec<EscalationReason>,
    /// Distinct documentation sources backing an AI answer
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

impl PipelineResponse {
    pub fn is_escalation(&self) -> bool {
        self.response_type == ResponseType::Escalation
    }
}

/// Customer-facing message for an escalated ticket.
pub fn escalation_message(decision: &EscalationDecision) -> String {
    format!(
        "Your query requires attention from a human support agent. Reasons: {} (Score: {:.2})",
        decision.reasons_summary(THRESHOLD_FALLBACK_REASON),
        decision.escalation_score
    )
}

/// Retrieval, classification, drafting and escalation for single queries.
pub struct SupportPipeline {
    classifier: Arc<dyn Classifier>,
    agent: Arc<dyn CompletionAgent>,
    retriever: Option<Arc<dyn Retriever>>,
    engine: EscalationEngine,
    tickets: Arc<TicketStore>,
    min_score: f64,
    max_docs: usize,
}

impl SupportPipeline {
    /// Create a pipeline without retrieval; every query is treated as having
    /// no matching documentation until [`SupportPipeline::with_retriever`].
    pub fn new(
        classifier: Arc<dyn Classifier>,
        agent: Arc<dyn CompletionAgent>,
        engine: EscalationEngine,
        tickets: Arc<TicketStore>,
    ) -> Self {
        Self {
            classifier,
            agent,
            retriever: None,
            engine,
            tickets,
            min_score: 0.1,
            max_docs: 5,
        }
    }

    pub fn with_retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Default retrieval limits applied when a call does not override them.
    pub fn with_retrieval_limits(mut self, min_score: f64, max_docs: usize) -> Self {
        self.min_score = min_score;
        self.max_docs = max_docs;
        self
    }

    pub fn engine(&self) -> EscalationEngine {
        self.engine
    }

    pub fn tickets(&self) -> &Arc<TicketStore> {
        &self.tickets
    }

    pub fn has_retriever(&self) -> bool {
        self.retriever.is_some()
    }

    /// Process one query end to end.
    ///
    /// # Errors
    ///
    /// Classification and drafting failures are returned as [`AgentError`].
    /// Retrieval failures are not errors: the query proceeds without
    /// documentation.
    pub async fn process_query(
        &self,
        query: &str,
        overrides: QueryOverrides,
    ) -> Result<PipelineResponse, AgentError> {
        let min_score = overrides.min_score.unwrap_or(self.min_score);
        let max_docs = overrides.max_docs.unwrap_or(self.max_docs);
        let engine = overrides
            .escalation_threshold
            .map_or(self.engine, |threshold| self.engine.with_threshold(threshold));

        let docs =
            retrieval::search_or_empty(self.retriever.as_deref(), query, min_score, max_docs).await;
        let similarity_scores = retrieval::similarity_scores(&docs);

        let classification = self.classifier.classify(query).await?;

        let context = retrieval::format_context(&docs);
        let draft_answer = if context.is_empty() {
            None
        } else {
            let draft = self
                .agent
                .complete(&assistant_prompt(&context, query))
                .await?;
            Some(draft.trim().to_string())
        };

        let decision = engine.score(
            query,
            &classification,
            Some(similarity_scores.as_slice()),
            draft_answer.as_deref(),
        );

        tracing::info!(
            topic = %classification.topic,
            documents = docs.len(),
            escalation_score = decision.escalation_score,
            should_escalate = decision.should_escalate,
            "query processed"
        );

        if decision.should_escalate {
            let content = escalation_message(&decision);
            let ticket_id = self.tickets.create_ticket(
                query,
                classification,
                &content,
                Some(decision.clone()),
            );

            return Ok(PipelineResponse {
                response_type: ResponseType::Escalation,
                content,
                classification,
                escalation_score: decision.escalation_score,
                factors: decision.factors,
                reasoning: decision.reasoning,
                sources: Vec::new(),
                ticket_id: Some(ticket_id),
            });
        }

        let content = draft_answer
            .filter(|draft| !draft.is_empty())
            .unwrap_or_else(|| NO_CONTEXT_ANSWER.to_string());

        Ok(PipelineResponse {
            response_type: ResponseType::AiResponse,
            content,
            classification,
            escalation_score: decision.escalation_score,
            factors: decision.factors,
            reasoning: decision.reasoning,
            sources: retrieval::distinct_sources(&docs),
            ticket_id: None,
        })
    }
}
