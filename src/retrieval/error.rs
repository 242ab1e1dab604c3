//! Error types for retrieval operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, loading or searching the vector index.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// No index is loaded or the index cannot serve queries.
    #[error("Vector database not available: {0}")]
    Unavailable(String),

    /// The embedding endpoint failed or returned a malformed body.
    #[error("Embedding request failed: {0}")]
    Embedding(String),

    /// Source directory does not exist.
    #[error("Document directory not found: {0}")]
    NotFound(PathBuf),

    /// Source directory contains no indexable documents.
    #[error("No .txt or .md documents found in {0}")]
    EmptyCorpus(PathBuf),

    /// Vector length differs from the index dimensionality.
    #[error("Embedding dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index format error: {0}")]
    Format(#[from] serde_json::Error),
}
