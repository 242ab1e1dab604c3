//! Escalation decision types
//!
//! Final output of the engine. Field names and reason strings are part of the
//! wire format consumed by the dashboard and ticket records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized escalation pressure per signal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EscalationFactors {
    /// Inverted retrieval confidence (`1 - confidence`)
    pub retrieval_confidence: f64,
    pub complexity: f64,
    pub sentiment_urgency: f64,
    pub topic_criticality: f64,
    pub response_quality: f64,
}

/// Human-readable reason for escalation, emitted in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscalationReason {
    #[serde(rename = "Low retrieval confidence")]
    LowRetrievalConfidence,
    #[serde(rename = "Complex query")]
    ComplexQuery,
    #[serde(rename = "High urgency/sentiment")]
    HighUrgency,
    #[serde(rename = "Critical topic")]
    CriticalTopic,
    #[serde(rename = "Low answer quality")]
    LowAnswerQuality,
}

impl EscalationReason {
    pub fn message(&self) -> &'static str {
        match self {
            EscalationReason::LowRetrievalConfidence => "Low retrieval confidence",
            EscalationReason::ComplexQuery => "Complex query",
            EscalationReason::HighUrgency => "High urgency/sentiment",
            EscalationReason::CriticalTopic => "Critical topic",
            EscalationReason::LowAnswerQuality => "Low answer quality",
        }
    }

    /// Collect the reasons whose trigger fires, in fixed order.
    ///
    /// Triggers are independent of the weighting scheme.
    pub fn collect(factors: &EscalationFactors) -> Vec<EscalationReason> {
        let checks = [
            (factors.retrieval_confidence > 0.5, Self::LowRetrievalConfidence),
            (factors.complexity > 0.3, Self::ComplexQuery),
            (factors.sentiment_urgency > 0.7, Self::HighUrgency),
            (factors.topic_criticality > 0.7, Self::CriticalTopic),
            (factors.response_quality > 0.3, Self::LowAnswerQuality),
        ];

        checks
            .into_iter()
            .filter_map(|(fired, reason)| fired.then_some(reason))
            .collect()
    }
}

impl fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of scoring a single ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationDecision {
    pub should_escalate: bool,
    pub escalation_score: f64,
    pub factors: EscalationFactors,
    pub reasoning: Vec<EscalationReason>,
}

impl EscalationDecision {
    /// Reasons joined for display, or `fallback` when none fired.
    pub fn reasons_summary(&self, fallback: &str) -> String {
        if self.reasoning.is_empty() {
            fallback.to_string()
        } else {
            self.reasoning
                .iter()
                .map(EscalationReason::message)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}
