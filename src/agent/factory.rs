//! Agent factory for creating `CompletionAgent` trait objects from configuration.

use super::{AgentError, CompletionAgent, GeminiAgent, OpenAIAgent};
use crate::config::{LlmConfig, LlmProvider};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Create an agent from the language-model configuration.
///
/// The API key is read from the environment variable named by
/// `config.api_key_env`. Gemini requires a key; OpenAI-compatible servers may
/// run without one (local vLLM, Ollama).
///
/// # Examples
///
/// ```
/// use triage::agent::create_agent;
/// use triage::config::{LlmConfig, LlmProvider};
/// use reqwest::Client;
/// use std::sync::Arc;
///
/// let config = LlmConfig {
///     provider: LlmProvider::OpenAI,
///     api_key_env: "TRIAGE_DOCTEST_UNSET_KEY".to_string(),
///     base_url: Some("http://localhost:8000".to_string()),
///     ..LlmConfig::default()
/// };
///
/// let agent = create_agent(&config, config.temperature, Arc::new(Client::new())).unwrap();
/// assert!(agent.name().starts_with("openai:"));
/// ```
pub fn create_agent(
    config: &LlmConfig,
    temperature: f32,
    client: Arc<Client>,
) -> Result<Arc<dyn CompletionAgent>, AgentError> {
    let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
    let base_url = config.resolved_base_url();
    let timeout = Duration::from_secs(config.timeout_seconds);

    let agent: Arc<dyn CompletionAgent> = match config.provider {
        LlmProvider::Google => {
            if api_key.is_empty() {
                return Err(AgentError::Configuration(format!(
                    "{} is not set in the environment",
                    config.api_key_env
                )));
            }
            Arc::new(GeminiAgent::new(
                base_url,
                config.model.clone(),
                api_key,
                temperature,
                timeout,
                client,
            ))
        }
        LlmProvider::OpenAI => Arc::new(OpenAIAgent::new(
            base_url,
            config.model.clone(),
            api_key,
            temperature,
            timeout,
            client,
        )),
    };

    tracing::debug!(agent = agent.name(), "created completion agent");
    Ok(agent)
}
