//! Factor weighting schemes.

use super::decision::EscalationFactors;
use serde::{Deserialize, Serialize};

/// Fixed per-factor weights for the escalation score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub retrieval_confidence: f64,
    pub complexity: f64,
    pub sentiment_urgency: f64,
    pub topic_criticality: f64,
    pub response_quality: f64,
}

/// The two weighting schemes. They score the same inputs differently and are
/// never blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    /// Retrieval signal carries the largest single weight.
    #[default]
    RetrievalAware,
    /// For deployments without a retriever; retrieval confidence is ignored.
    RetrievalAgnostic,
}

impl WeightScheme {
    pub fn weights(&self) -> FactorWeights {
        match self {
            WeightScheme::RetrievalAware => FactorWeights {
                retrieval_confidence: 0.3,
                complexity: 0.2,
                sentiment_urgency: 0.2,
                topic_criticality: 0.2,
                response_quality: 0.1,
            },
            WeightScheme::RetrievalAgnostic => FactorWeights {
                retrieval_confidence: 0.0,
                complexity: 0.3,
                sentiment_urgency: 0.3,
                topic_criticality: 0.3,
                response_quality: 0.1,
            },
        }
    }
}

impl FactorWeights {
    /// Weighted sum of the factors.
    pub fn apply(&self, factors: &EscalationFactors) -> f64 {
        factors.retrieval_confidence * self.retrieval_confidence
            + factors.complexity * self.complexity
            + factors.sentiment_urgency * self.sentiment_urgency
            + factors.topic_criticality * self.topic_criticality
            + factors.response_quality * self.response_quality
    }

    pub fn total(&self) -> f64 {
        self.retrieval_confidence
            + self.complexity
            + self.sentiment_urgency
            + self.topic_criticality
            + self.response_quality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_schemes_sum_to_one() {
        for scheme in [WeightScheme::RetrievalAware, WeightScheme::RetrievalAgnostic] {
            assert!((scheme.weights().total() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn agnostic_scheme_ignores_retrieval() {
        let factors = EscalationFactors {
            retrieval_confidence: 1.0,
            ..EscalationFactors::default()
        };
        assert_eq!(WeightScheme::RetrievalAgnostic.weights().apply(&factors), 0.0);
        assert!((WeightScheme::RetrievalAware.weights().apply(&factors) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn scheme_serde_names() {
        let json = serde_json::to_string(&WeightScheme::RetrievalAgnostic).unwrap();
        assert_eq!(json, "\"retrieval_agnostic\"");
    }
}
