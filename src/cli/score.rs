//! Score command implementation

use crate::classify::{Classification, Priority, Sentiment, Topic};
use crate::cli::{output, SchemeArg, ScoreArgs};
use crate::escalation::{EscalationEngine, WeightScheme};

impl From<SchemeArg> for WeightScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::RetrievalAware => WeightScheme::RetrievalAware,
            SchemeArg::RetrievalAgnostic => WeightScheme::RetrievalAgnostic,
        }
    }
}

/// Handle `triage score` command
///
/// Runs the escalation engine offline. The threshold comes from `--threshold`,
/// else `ESCALATION_THRESHOLD`, else the configuration file. Unknown labels
/// fall back to their defaults exactly as classifier output does.
pub fn handle_score(args: &ScoreArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = super::load_config(&args.config)?;
    let threshold = args.threshold.unwrap_or(config.escalation.threshold);
    if !threshold.is_finite() {
        return Err("threshold must be a finite number".into());
    }

    let engine = EscalationEngine::new(threshold).with_scheme(args.scheme.into());
    let classification = Classification::new(
        Topic::from_label(&args.topic),
        Sentiment::from_label(&args.sentiment),
        Priority::from_label(&args.priority),
    );

    let decision = engine.score(
        &args.query,
        &classification,
        Some(args.scores.as_slice()),
        args.draft.as_deref(),
    );

    if args.json {
        Ok(output::format_decision_json(&decision, &engine)?)
    } else {
        Ok(output::format_decision_table(&decision, &engine))
    }
}
