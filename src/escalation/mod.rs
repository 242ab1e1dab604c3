//! # Escalation Decision Engine
//!
//! Deterministic scoring of whether a support ticket should be routed to a
//! human agent.
//!
//! Five normalized factors are computed from the query, its classification,
//! retrieval similarity scores and an optional draft answer. They are combined
//! with a fixed [`WeightScheme`] into a single score; the ticket escalates when
//! that score is strictly greater than the threshold.
//!
//! ## Example
//!
//! ```
//! use triage::classify::{Classification, Priority, Sentiment, Topic};
//! use triage::escalation::EscalationEngine;
//!
//! let engine = EscalationEngine::default();
//! let classification = Classification::new(Topic::Unknown, Sentiment::Neutral, Priority::P2);
//!
//! let decision = engine.score("How do I log in?", &classification, Some(&[0.9, 0.85, 0.8][..]), None);
//! assert!(!decision.should_escalate);
//! ```

mod decision;
pub mod factors;
mod weights;

pub use decision::{EscalationDecision, EscalationFactors, EscalationReason};
pub use weights::{FactorWeights, WeightScheme};

use crate::classify::Classification;

/// Default escalation threshold.
pub const DEFAULT_ESCALATION_THRESHOLD: f64 = 0.6;

/// Stateless escalation scorer.
///
/// Cheap to copy; holds only the threshold and the chosen weighting scheme.
/// Per-call threshold overrides go through [`EscalationEngine::with_threshold`]
/// on a copy, so a shared engine is never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscalationEngine {
    threshold: f64,
    scheme: WeightScheme,
}

impl Default for EscalationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ESCALATION_THRESHOLD)
    }
}

impl EscalationEngine {
    /// Engine using the retrieval-aware weighting scheme.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            scheme: WeightScheme::RetrievalAware,
        }
    }

    /// Return a copy using a different weighting scheme.
    pub fn with_scheme(mut self, scheme: WeightScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Return a copy using a different threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn scheme(&self) -> WeightScheme {
        self.scheme
    }

    /// Compute the raw factors without weighting.
    pub fn factors(
        &self,
        query: &str,
        classification: &Classification,
        similarity_scores: Option<&[f64]>,
        draft_answer: Option<&str>,
    ) -> EscalationFactors {
        let confidence = factors::retrieval_confidence(similarity_scores.unwrap_or(&[]));

        EscalationFactors {
            retrieval_confidence: 1.0 - confidence,
            complexity: factors::complexity(query),
            sentiment_urgency: factors::sentiment_urgency(classification),
            topic_criticality: factors::topic_criticality(classification.topic.label()),
            response_quality: factors::response_quality(draft_answer),
        }
    }

    /// Score a ticket.
    ///
    /// Total over its input domain: absent or empty similarity scores count as
    /// zero retrieval confidence, and classification fields are already
    /// normalized to their fallbacks.
    pub fn score(
        &self,
        query: &str,
        classification: &Classification,
        similarity_scores: Option<&[f64]>,
        draft_answer: Option<&str>,
    ) -> EscalationDecision {
        let factors = self.factors(query, classification, similarity_scores, draft_answer);
        let escalation_score = self.scheme.weights().apply(&factors);
        let should_escalate = escalation_score > self.threshold;
        let reasoning = EscalationReason::collect(&factors);

        tracing::debug!(
            escalation_score,
            threshold = self.threshold,
            should_escalate,
            retrieval_confidence = factors.retrieval_confidence,
            complexity = factors.complexity,
            sentiment_urgency = factors.sentiment_urgency,
            topic_criticality = factors.topic_criticality,
            response_quality = factors.response_quality,
            "escalation scored"
        );

        EscalationDecision {
            should_escalate,
            escalation_score,
            factors,
            reasoning,
        }
    }
}
