//! Answer quality evaluation.
//!
//! An LLM judge rates a final answer for a query. Off-topic queries are rated
//! high and never escalated; relevant queries without supporting context are
//! rated low and escalated.

use crate::agent::{AgentError, CompletionAgent};
use crate::classify::parse::parse_json_object;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Judge verdict for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// 0.0 (useless) to 1.0 (complete)
    pub response_quality: f64,
    pub should_escalate: bool,
    pub reasoning: Vec<String>,
}

impl QualityAssessment {
    /// Verdict used when the judge output cannot be parsed.
    pub fn fallback(context_found: bool) -> Self {
        Self {
            response_quality: 0.5,
            should_escalate: !context_found,
            reasoning: vec!["Fallback evaluation".to_string()],
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Reasoning {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct RawAssessment {
    response_quality: f64,
    should_escalate: bool,
    #[serde(default)]
    reasoning: Option<Reasoning>,
}

impl From<RawAssessment> for QualityAssessment {
    fn from(raw: RawAssessment) -> Self {
        let reasoning = match raw.reasoning {
            Some(Reasoning::One(reason)) => vec![reason],
            Some(Reasoning::Many(reasons)) => reasons,
            None => Vec::new(),
        };
        Self {
            response_quality: raw.response_quality,
            should_escalate: raw.should_escalate,
            reasoning,
        }
    }
}

pub fn quality_prompt(query: &str, response: &str, context_found: bool) -> String {
    let context_found = if context_found { "True" } else { "False" };
    format!(
        r#"You are a support QA evaluator.

Task:
1. Judge if the user's query is relevant to the Atlan support/product domain.
2. If the query is irrelevant (e.g., "What's the login criteria of Google"),
   mark quality as HIGH (1.0) and escalation = False, regardless of context.
3. If the query is relevant but no useful context was found,
   quality = LOW (0.4) and escalation = True.
4. If the query is relevant and the response contains sufficient details,
   quality = GOOD (0.7-1.0) and escalation = False.

User Query:
{query}

Final AI Response:
{response}

Context Found: {context_found}

Respond strictly in JSON with:
{{
  "response_quality": float,
  "should_escalate": bool,
  "reasoning": ["short explanation"]
}}"#
    )
}

/// LLM-backed quality judge.
pub struct QualityEvaluator {
    agent: Arc<dyn CompletionAgent>,
}

impl QualityEvaluator {
    pub fn new(agent: Arc<dyn CompletionAgent>) -> Self {
        Self { agent }
    }

    /// Interpret a judge completion, falling back when it is not a valid verdict.
    pub fn interpret(completion: &str, context_found: bool) -> QualityAssessment {
        parse_json_object(completion)
            .and_then(|value| serde_json::from_value::<RawAssessment>(value).ok())
            .map(QualityAssessment::from)
            .unwrap_or_else(|| {
                tracing::warn!("quality judge returned an unusable verdict, using fallback");
                QualityAssessment::fallback(context_found)
            })
    }

    pub async fn evaluate(
        &self,
        query: &str,
        response: &str,
        context_found: bool,
    ) -> Result<QualityAssessment, AgentError> {
        let completion = self
            .agent
            .complete(&quality_prompt(query, response, context_found))
            .await?;
        let assessment = Self::interpret(&completion, context_found);

        tracing::debug!(
            response_quality = assessment.response_quality,
            should_escalate = assessment.should_escalate,
            "answer quality evaluated"
        );
        Ok(assessment)
    }
}
