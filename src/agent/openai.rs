//! OpenAI-compatible agent implementation.

use super::{AgentError, CompletionAgent};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// OpenAI agent.
///
/// Works against OpenAI and any server exposing `POST /v1/chat/completions`
/// with Bearer authentication (vLLM, LM Studio, Ollama).
pub struct OpenAIAgent {
    name: String,
    /// Base URL (e.g., "https://api.openai.com")
    base_url: String,
    model: String,
    /// API key for Bearer authentication; empty sends no header
    api_key: String,
    temperature: f32,
    timeout: Duration,
    /// Shared HTTP client for connection pooling
    client: Arc<Client>,
}

impl OpenAIAgent {
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
        temperature: f32,
        timeout: Duration,
        client: Arc<Client>,
    ) -> Self {
        Self {
            name: format!("openai:{}", model),
            base_url,
            model,
            api_key,
            temperature,
            timeout,
            client,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionAgent for OpenAIAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let timeout_ms = self.timeout.as_millis() as u64;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let mut builder = self
            .client
            .post(&url)
            .json(&request)
            .timeout(self.timeout);
        if !self.api_key.is_empty() {
            builder = builder.header("authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AgentError::from_send(e, timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                agent = %self.name,
                status = status.as_u16(),
                "completion request failed"
            );
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            AgentError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                AgentError::InvalidResponse("Completion response contained no choices".to_string())
            })
    }
}
