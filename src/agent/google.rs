//! Google Gemini agent implementation.

use super::{AgentError, CompletionAgent};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Gemini agent.
///
/// Sends prompts to the Generative Language API:
/// `POST /v1beta/models/{model}:generateContent?key={key}`
pub struct GeminiAgent {
    /// Name used in logs
    name: String,
    /// Base URL (e.g., "https://generativelanguage.googleapis.com")
    base_url: String,
    model: String,
    /// API key for query parameter authentication
    api_key: String,
    temperature: f32,
    timeout: Duration,
    /// Shared HTTP client for connection pooling
    client: Arc<Client>,
}

impl GeminiAgent {
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
        temperature: f32,
        timeout: Duration,
        client: Arc<Client>,
    ) -> Self {
        Self {
            name: format!("gemini:{}", model),
            base_url,
            model,
            api_key,
            temperature,
            timeout,
            client,
        }
    }

    fn build_request(&self, prompt: &str) -> GoogleRequest {
        GoogleRequest {
            contents: vec![GoogleContent {
                role: "user".to_string(),
                parts: vec![GooglePart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GoogleGenerationConfig {
                temperature: Some(self.temperature),
            }),
        }
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: GoogleResponse) -> Result<String, AgentError> {
        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            AgentError::InvalidResponse("Gemini response contained no candidates".to_string())
        })?;

        Ok(candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<String>>()
                    .join("")
            })
            .unwrap_or_default())
    }
}

/// Google Generative AI request format
#[derive(Debug, Serialize)]
struct GoogleRequest {
    contents: Vec<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "generationConfig")]
    generation_config: Option<GoogleGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GoogleContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GooglePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GooglePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GoogleGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Google Generative AI response format
#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Debug, Deserialize)]
struct GoogleCandidate {
    content: Option<GoogleContent>,
}

#[async_trait]
impl CompletionAgent for GeminiAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let timeout_ms = self.timeout.as_millis() as u64;

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.build_request(prompt))
            .timeout(self.timeout)
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

        let body: GoogleResponse = response.json().await.map_err(|e| {
            AgentError::InvalidResponse(format!("Failed to parse Gemini response: {}", e))
        })?;

        tracing::debug!(
            agent = %self.name,
            latency_ms = start.elapsed().as_millis() as u64,
            "completion received"
        );

        Self::extract_text(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_agent(base_url: String) -> GeminiAgent {
        GeminiAgent::new(
            base_url,
            "gemini-2.5-flash".to_string(),
            "test-key".to_string(),
            0.0,
            Duration::from_secs(5),
            Arc::new(Client::new()),
        )
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::Regex(r#""text":"Hello""#.to_string()))
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi "},{"text":"there"}]},"finishReason":"STOP"}]}"#,
            )
            .create_async()
            .await;

        let agent = test_agent(server.url());
        let text = agent.complete("Hello").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn test_complete_upstream_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("API key not valid")
            .create_async()
            .await;

        let agent = test_agent(server.url());
        let err = agent.complete("Hello").await.unwrap_err();

        match err {
            AgentError::Upstream { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("API key"));
            }
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_no_candidates() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let agent = test_agent(server.url());
        let err = agent.complete("Hello").await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_network_error() {
        let agent = test_agent("http://invalid.invalid:9999".to_string());
        let result = agent.complete("Hello").await;
        assert!(matches!(result, Err(AgentError::Network(_)) | Err(AgentError::Timeout(_))));
    }

    #[test]
    fn test_name_includes_model() {
        let agent = test_agent("http://localhost".to_string());
        assert_eq!(agent.name(), "gemini:gemini-2.5-flash");
    }
}
