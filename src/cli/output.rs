//! Output formatting helpers for CLI commands

use crate::escalation::{EscalationDecision, EscalationEngine, FactorWeights};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Format a decision as a factor table followed by the verdict.
pub fn format_decision_table(decision: &EscalationDecision, engine: &EscalationEngine) -> String {
    let weights: FactorWeights = engine.scheme().weights();
    let factors = &decision.factors;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Factor", "Value", "Weight", "Contribution"]);

    let rows = [
        ("Retrieval confidence", factors.retrieval_confidence, weights.retrieval_confidence),
        ("Complexity", factors.complexity, weights.complexity),
        ("Sentiment/urgency", factors.sentiment_urgency, weights.sentiment_urgency),
        ("Topic criticality", factors.topic_criticality, weights.topic_criticality),
        ("Response quality", factors.response_quality, weights.response_quality),
    ];
    for (name, value, weight) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.3}", value)),
            Cell::new(format!("{:.1}", weight)),
            Cell::new(format!("{:.3}", value * weight)),
        ]);
    }

    let verdict = if decision.should_escalate {
        "ESCALATE".red().bold().to_string()
    } else {
        "AUTO-RESPOND".green().bold().to_string()
    };
    let reasons = if decision.reasoning.is_empty() {
        "none".dimmed().to_string()
    } else {
        decision.reasons_summary("")
    };

    format!(
        "{}\nScore: {:.3} (threshold {:.2})  {}\nReasons: {}",
        table,
        decision.escalation_score,
        engine.threshold(),
        verdict,
        reasons
    )
}

/// Format a decision as pretty JSON, including the threshold it was judged against.
pub fn format_decision_json(
    decision: &EscalationDecision,
    engine: &EscalationEngine,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "should_escalate": decision.should_escalate,
        "escalation_score": decision.escalation_score,
        "threshold": engine.threshold(),
        "factors": decision.factors,
        "reasoning": decision.reasoning,
    }))
}
