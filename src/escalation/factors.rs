//! Individual escalation factor computations.
//!
//! Each function is pure and total. Higher values always mean more reason to
//! hand the ticket to a human.

use crate::classify::{Classification, Priority, Sentiment};

/// Similarity above which a retrieved document counts as a good match.
pub const GOOD_MATCH_SIMILARITY: f64 = 0.6;

/// Fixed divisor for the good-match count. Caps the contribution so that more
/// than five good matches cannot push confidence past 1.0.
pub const GOOD_MATCH_CAP: f64 = 5.0;

/// Word count above which a query is considered long.
pub const LONG_QUERY_WORDS: usize = 50;

/// Draft answers shorter than this many words are considered thin.
pub const SHORT_ANSWER_WORDS: usize = 20;

/// Tokens that mark a query as involving setup or integration work.
pub const COMPLEX_TOKENS: [&str; 4] = ["integrate", "custom", "setup", "troubleshoot"];

/// Phrase that drafting prompts produce when the context was not useful.
pub const NO_INFORMATION_PHRASE: &str = "no relevant information";

/// Topic severity table, keyed by topic label.
pub const CRITICAL_TOPICS: [(&str, f64); 6] = [
    ("Sensitive data", 0.9),
    ("Security", 0.8),
    ("Compliance", 0.8),
    ("Billing", 0.7),
    ("Custom", 0.7),
    ("Integration", 0.6),
];

/// Criticality for topics missing from [`CRITICAL_TOPICS`].
pub const DEFAULT_TOPIC_CRITICALITY: f64 = 0.2;

/// Composite confidence that documentation covers the query.
///
/// `0.5 * max + 0.3 * mean + 0.2 * (good_matches / 5)`; an empty slice gives 0.
pub fn retrieval_confidence(similarity_scores: &[f64]) -> f64 {
    if similarity_scores.is_empty() {
        return 0.0;
    }

    let max = similarity_scores
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let mean = similarity_scores.iter().sum::<f64>() / similarity_scores.len() as f64;
    let good = similarity_scores
        .iter()
        .filter(|&&s| s > GOOD_MATCH_SIMILARITY)
        .count() as f64;

    0.5 * max + 0.3 * mean + 0.2 * (good / GOOD_MATCH_CAP)
}

/// Structural complexity of the query text. Unclamped, at most 0.7.
pub fn complexity(query: &str) -> f64 {
    let mut score = 0.0;

    // More than one '?'-delimited segment.
    if query.split('?').count() > 1 {
        score += 0.3;
    }
    if query.split_whitespace().count() > LONG_QUERY_WORDS {
        score += 0.2;
    }
    let lowered = query.to_lowercase();
    if COMPLEX_TOKENS.iter().any(|token| lowered.contains(token)) {
        score += 0.2;
    }

    score
}

/// Combined sentiment and priority pressure. The two bonuses stack, up to 1.7.
///
/// Summed in tenths so the stacked maximum is exactly `1.7`.
pub fn sentiment_urgency(classification: &Classification) -> f64 {
    let sentiment_tenths = match classification.sentiment {
        Sentiment::Angry => 9,
        Sentiment::Frustrated => 7,
        _ => 0,
    };
    let priority_tenths = match classification.priority {
        Priority::P0 => 8,
        Priority::P1 => 4,
        Priority::P2 => 0,
    };

    f64::from(sentiment_tenths + priority_tenths) / 10.0
}

/// Look up the severity of a topic label.
pub fn topic_criticality(topic_label: &str) -> f64 {
    CRITICAL_TOPICS
        .iter()
        .find(|(label, _)| *label == topic_label)
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_TOPIC_CRITICALITY)
}

/// Weakness signals in a draft answer. Absent or empty drafts score 0.
pub fn response_quality(draft_answer: Option<&str>) -> f64 {
    let Some(draft) = draft_answer.filter(|d| !d.is_empty()) else {
        return 0.0;
    };

    let mut score = 0.0;
    if draft.split_whitespace().count() < SHORT_ANSWER_WORDS {
        score += 0.2;
    }
    if draft.to_lowercase().contains(NO_INFORMATION_PHRASE) {
        score += 0.4;
    }

    score
}
