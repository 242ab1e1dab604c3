//! Language-model agent abstraction.
//!
//! The copilot treats the hosted model as a black box mapping a formatted
//! prompt to a text completion. [`CompletionAgent`] is that seam; concrete
//! agents translate it to a provider's HTTP protocol.

use async_trait::async_trait;

pub mod error;
pub mod factory;
pub mod google;
pub mod openai;

pub use error::AgentError;
pub use factory::create_agent;
pub use google::GeminiAgent;
pub use openai::OpenAIAgent;

/// Unified interface for hosted text-completion models.
///
/// # Object Safety
///
/// Object-safe and designed to be shared as `Arc<dyn CompletionAgent>`.
///
/// # Cancellation Safety
///
/// Dropping the returned future aborts the in-flight HTTP request.
#[async_trait]
pub trait CompletionAgent: Send + Sync + 'static {
    /// Human-readable name for logging (e.g., "gemini:gemini-2.5-flash").
    fn name(&self) -> &str;

    /// Send a single prompt and return the model's text.
    ///
    /// # Returns
    ///
    /// - `Ok(String)` with the completion text (may be empty)
    /// - `Err(AgentError::Upstream)` if the provider returned 4xx/5xx
    /// - `Err(AgentError::Network)` if the connection failed
    /// - `Err(AgentError::Timeout)` if the request exceeded its deadline
    /// - `Err(AgentError::InvalidResponse)` if the body could not be parsed
    async fn complete(&self, prompt: &str) -> Result<String, AgentError>;
}
