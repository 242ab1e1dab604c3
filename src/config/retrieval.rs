//! Documentation retrieval configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Minimum similarity for a document to be returned
    pub min_score: f64,
    /// Maximum documents per pipeline query
    pub max_docs: usize,
    /// Documents fetched for conversational answers
    pub conversation_docs: usize,
    /// Persisted vector index
    pub index_path: PathBuf,
    /// Source documents for `index build`
    pub data_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub embedding: EmbeddingConfig,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            min_score: 0.1,
            max_docs: 5,
            conversation_docs: 3,
            index_path: PathBuf::from("rag/index.json"),
            data_dir: PathBuf::from("data/docs"),
            chunk_size: 1000,
            chunk_overlap: 200,
            embedding: EmbeddingConfig::default(),
        }
    }
}

/// Embedding endpoint (OpenAI-compatible `/v1/embeddings`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            api_key_env: None,
            batch_size: 32,
        }
    }
}
