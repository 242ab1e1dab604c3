//! Language-model provider configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hosted completion API flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Generative Language API (Gemini)
    #[default]
    Google,
    /// Any OpenAI-compatible `/v1/chat/completions` endpoint
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "gemini" => Ok(LlmProvider::Google),
            "openai" => Ok(LlmProvider::OpenAI),
            _ => Err(format!("Invalid LLM provider: {}", s)),
        }
    }
}

/// Language-model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// Override the provider's default API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Temperature for classification, drafting and evaluation
    pub temperature: f32,
    /// Temperature for free-form conversational replies
    pub conversation_temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Google,
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
            api_key_env: "GOOGLE_API_KEY".to_string(),
            temperature: 0.0,
            conversation_temperature: 0.3,
            timeout_seconds: 60,
        }
    }
}

impl LlmConfig {
    /// Base URL to use, falling back to the provider default.
    pub fn resolved_base_url(&self) -> String {
        match (&self.base_url, self.provider) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, LlmProvider::Google) => "https://generativelanguage.googleapis.com".to_string(),
            (None, LlmProvider::OpenAI) => "https://api.openai.com".to_string(),
        }
    }
}
