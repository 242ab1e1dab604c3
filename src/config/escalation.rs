//! Escalation configuration

use crate::escalation::{EscalationEngine, DEFAULT_ESCALATION_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Escalation engine configuration.
///
/// The threshold is the only tunable; weights and triggers are fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    pub threshold: f64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ESCALATION_THRESHOLD,
        }
    }
}

impl EscalationConfig {
    pub fn engine(&self) -> EscalationEngine {
        EscalationEngine::new(self.threshold)
    }
}
