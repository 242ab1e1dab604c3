//! Configuration module for the triage copilot
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TRIAGE_*`, `ESCALATION_THRESHOLD`, `RAG_MAX_DOCS`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use triage::config::TriageConfig;
//!
//! let config = TriageConfig::default();
//! assert_eq!(config.escalation.threshold, 0.6);
//!
//! let toml = r#"
//! [escalation]
//! threshold = 0.7
//! "#;
//! let config: TriageConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.escalation.threshold, 0.7);
//! ```

pub mod error;
pub mod escalation;
pub mod llm;
pub mod logging;
pub mod retrieval;
pub mod server;
pub mod tickets;

pub use error::ConfigError;
pub use escalation::EscalationConfig;
pub use llm::{LlmConfig, LlmProvider};
pub use logging::{LogFormat, LoggingConfig, LOG_LEVELS};
pub use retrieval::{EmbeddingConfig, RetrievalConfig};
pub use server::ServerConfig;
pub use tickets::TicketsConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the triage service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TriageConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Escalation engine threshold
    pub escalation: EscalationConfig,
    /// Documentation retrieval and embedding settings
    pub retrieval: RetrievalConfig,
    /// Hosted language model
    pub llm: LlmConfig,
    /// Ticket dashboard data
    pub tickets: TicketsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl TriageConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("TRIAGE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("TRIAGE_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("TRIAGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TRIAGE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(threshold) = std::env::var("ESCALATION_THRESHOLD") {
            if let Ok(t) = threshold.parse() {
                self.escalation.threshold = t;
            }
        }
        if let Ok(max_docs) = std::env::var("RAG_MAX_DOCS") {
            if let Ok(n) = max_docs.parse() {
                self.retrieval.max_docs = n;
            }
        }

        if let Ok(provider) = std::env::var("TRIAGE_LLM_PROVIDER") {
            if let Ok(p) = provider.parse() {
                self.llm.provider = p;
            }
        }
        if let Ok(model) = std::env::var("TRIAGE_LLM_MODEL") {
            self.llm.model = model;
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::validation("server.port", "port must be non-zero"));
        }

        if !self.escalation.threshold.is_finite() {
            return Err(ConfigError::validation(
                "escalation.threshold",
                "threshold must be a finite number",
            ));
        }

        let retrieval = &self.retrieval;
        if !(0.0..=1.0).contains(&retrieval.min_score) {
            return Err(ConfigError::validation(
                "retrieval.min_score",
                "must be between 0.0 and 1.0",
            ));
        }
        if retrieval.max_docs == 0 {
            return Err(ConfigError::validation(
                "retrieval.max_docs",
                "must be at least 1",
            ));
        }
        if retrieval.chunk_size == 0 || retrieval.chunk_overlap >= retrieval.chunk_size {
            return Err(ConfigError::validation(
                "retrieval.chunk_overlap",
                format!(
                    "overlap ({}) must be smaller than chunk_size ({})",
                    retrieval.chunk_overlap, retrieval.chunk_size
                ),
            ));
        }
        if retrieval.embedding.batch_size == 0 {
            return Err(ConfigError::validation(
                "retrieval.embedding.batch_size",
                "must be at least 1",
            ));
        }

        if self.llm.model.is_empty() {
            return Err(ConfigError::validation("llm.model", "model cannot be empty"));
        }

        self.logging.validate()?;

        Ok(())
    }
}
