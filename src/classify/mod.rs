//! Ticket classification.
//!
//! A [`Classifier`] turns raw ticket text into a [`Classification`]. The
//! production implementation, [`LlmClassifier`], prompts a completion agent
//! for a JSON object and parses it leniently: the only hard failure is an
//! empty completion.

pub mod parse;
pub mod sentiment;
pub mod types;

pub use types::*;

use crate::agent::{AgentError, CompletionAgent};
use async_trait::async_trait;
use std::sync::Arc;

/// Assigns topic, sentiment and priority to a support ticket.
#[async_trait]
pub trait Classifier: Send + Sync + 'static {
    async fn classify(&self, text: &str) -> Result<Classification, AgentError>;
}

/// Build the classification prompt for a ticket.
pub fn classification_prompt(ticket_text: &str) -> String {
    fn quoted<T>(labels: impl IntoIterator<Item = T>, label: fn(&T) -> &'static str) -> String {
        labels
            .into_iter()
            .map(|l| format!("'{}'", label(&l)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    format!(
        "You are a Customer Support Copilot that classifies support tickets.\n\
         For the given ticket, return a JSON object with these fields:\n \
         - topic: one of [{topics}]\n \
         - sentiment: one of [{sentiments}]\n \
         - priority: one of [{priorities}]\n\n\
         Ticket: {ticket_text}\n\n\
         Return ONLY the JSON object. If unsure, use 'Unknown' for topic, \
         'Neutral' for sentiment, and 'P2' for priority.",
        topics = quoted(Topic::VOCABULARY, Topic::label),
        sentiments = quoted(Sentiment::VOCABULARY, Sentiment::label),
        priorities = quoted(Priority::VOCABULARY, Priority::label),
    )
}

/// Classifier backed by a completion agent.
pub struct LlmClassifier {
    agent: Arc<dyn CompletionAgent>,
}

impl LlmClassifier {
    pub fn new(agent: Arc<dyn CompletionAgent>) -> Self {
        Self { agent }
    }

    /// Interpret a raw completion for `ticket_text`.
    ///
    /// Unparseable output yields the default classification. The sentiment
    /// label is refined with keywords from the ticket.
    pub fn interpret(ticket_text: &str, completion: &str) -> Classification {
        let mut classification = match parse::parse_json_object(completion) {
            Some(value) => Classification::from_value(&value),
            None => {
                tracing::warn!(
                    completion_len = completion.len(),
                    "classifier returned invalid JSON, using default classification"
                );
                Classification::default()
            }
        };

        classification.sentiment = sentiment::refine(classification.sentiment, ticket_text);
        classification
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, AgentError> {
        let completion = self.agent.complete(&classification_prompt(text)).await?;
        if completion.trim().is_empty() {
            return Err(AgentError::InvalidResponse(
                "Classifier returned an empty response".to_string(),
            ));
        }

        let classification = Self::interpret(text, &completion);
        tracing::debug!(
            agent = self.agent.name(),
            topic = %classification.topic,
            sentiment = %classification.sentiment,
            priority = %classification.priority,
            "ticket classified"
        );
        Ok(classification)
    }
}
