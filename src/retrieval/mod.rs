//! # Documentation retrieval
//!
//! Semantic search over the product documentation. Documents are split into
//! overlapping chunks ([`chunk_text`]), embedded through an OpenAI-compatible
//! endpoint ([`HttpEmbedder`]) and stored in a JSON-persisted
//! [`VectorIndex`]. At query time a [`Retriever`] returns the best chunks
//! with their cosine similarity, which feeds both the drafted answer and the
//! escalation engine's retrieval-confidence factor.
//!
//! ## Example
//!
//! ```
//! use triage::retrieval::{format_context, Document, ScoredDocument};
//!
//! let docs = vec![
//!     ScoredDocument {
//!         document: Document { content: "Enable SAML in Settings.".into(), source: "sso.md".into() },
//!         score: 0.82,
//!     },
//!     ScoredDocument {
//!         document: Document { content: "Assign the admin role.".into(), source: "sso.md".into() },
//!         score: 0.64,
//!     },
//! ];
//!
//! assert_eq!(format_context(&docs), "Enable SAML in Settings.\n\nAssign the admin role.");
//! ```

pub mod chunker;
pub mod embedder;
pub mod error;
pub mod index;

pub use chunker::chunk_text;
pub use embedder::{Embedder, HttpEmbedder};
pub use error::RetrievalError;
pub use index::{cosine_similarity, VectorIndex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A chunk of documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    /// Path of the file the chunk came from
    pub source: String,
}

/// A retrieved chunk and its similarity to the query, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// Semantic search over documentation.
#[async_trait]
pub trait Retriever: Send + Sync + 'static {
    /// Documents with `score >= min_score`, sorted by descending score,
    /// at most `max_docs`.
    async fn search(
        &self,
        query: &str,
        min_score: f64,
        max_docs: usize,
    ) -> Result<Vec<ScoredDocument>, RetrievalError>;
}

/// Search, degrading a missing retriever or any failure to an empty result.
pub async fn search_or_empty(
    retriever: Option<&dyn Retriever>,
    query: &str,
    min_score: f64,
    max_docs: usize,
) -> Vec<ScoredDocument> {
    let Some(retriever) = retriever else {
        tracing::warn!("vector database not available, continuing without documentation");
        return Vec::new();
    };

    match retriever.search(query, min_score, max_docs).await {
        Ok(docs) => docs,
        Err(e) => {
            tracing::warn!(error = %e, "retrieval failed, continuing without documentation");
            Vec::new()
        }
    }
}

/// Join chunk contents with a blank line. Empty input gives an empty string.
pub fn format_context(docs: &[ScoredDocument]) -> String {
    docs.iter()
        .map(|d| d.document.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Similarity scores in retrieval order.
pub fn similarity_scores(docs: &[ScoredDocument]) -> Vec<f64> {
    docs.iter().map(|d| d.score).collect()
}

/// Distinct document sources in first-seen order.
pub fn distinct_sources(docs: &[ScoredDocument]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for doc in docs {
        if !sources.contains(&doc.document.source) {
            sources.push(doc.document.source.clone());
        }
    }
    sources
}

/// Retriever that embeds the query and scans a [`VectorIndex`].
pub struct VectorRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<VectorIndex>,
}

impl VectorRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<VectorIndex>) -> Self {
        Self { embedder, index }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn search(
        &self,
        query: &str,
        min_score: f64,
        max_docs: usize,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        if self.index.is_empty() {
            return Err(RetrievalError::Unavailable("index is empty".to_string()));
        }

        let vectors = self.embedder.embed(&[query.to_string()]).await?;
        let query_vector = vectors.into_iter().next().ok_or_else(|| {
            RetrievalError::Embedding("no embedding returned for query".to_string())
        })?;

        if query_vector.len() != self.index.dimensions() {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.index.dimensions(),
                actual: query_vector.len(),
            });
        }

        let results = self.index.search(&query_vector, min_score, max_docs);
        tracing::debug!(
            results = results.len(),
            top_score = results.first().map(|r| r.score).unwrap_or(0.0),
            "documentation retrieved"
        );
        Ok(results)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    pub(crate) fn scored(content: &str, source: &str, score: f64) -> ScoredDocument {
        ScoredDocument {
            document: Document {
                content: content.to_string(),
                source: source.to_string(),
            },
            score,
        }
    }

    /// Retriever returning a fixed result and recording requested limits.
    pub(crate) struct StaticRetriever {
        pub results: Result<Vec<ScoredDocument>, String>,
        pub requests: Mutex<Vec<(f64, usize)>>,
    }

    impl StaticRetriever {
        pub(crate) fn new(results: Vec<ScoredDocument>) -> Self {
            Self {
                results: Ok(results),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                results: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Retriever for StaticRetriever {
        async fn search(
            &self,
            _query: &str,
            min_score: f64,
            max_docs: usize,
        ) -> Result<Vec<ScoredDocument>, RetrievalError> {
            self.requests.lock().unwrap().push((min_score, max_docs));
            match &self.results {
                Ok(docs) => Ok(docs.iter().take(max_docs).cloned().collect()),
                Err(message) => Err(RetrievalError::Unavailable(message.clone())),
            }
        }
    }

    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        fn model(&self) -> &str {
            "fixed"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            Ok(texts.iter().map(|_| self.0.clone()).collect())
        }
    }

    fn index() -> Arc<VectorIndex> {
        let mut index = VectorIndex::new("fixed");
        index
            .insert(
                Document {
                    content: "SSO setup".to_string(),
                    source: "sso.md".to_string(),
                },
                vec![1.0, 0.0],
            )
            .unwrap();
        index
            .insert(
                Document {
                    content: "Lineage graph".to_string(),
                    source: "lineage.md".to_string(),
                },
                vec![0.0, 1.0],
            )
            .unwrap();
        Arc::new(index)
    }

    #[test]
    fn test_format_context_and_sources() {
        let docs = vec![
            scored("a", "one.md", 0.9),
            scored("b", "two.md", 0.8),
            scored("c", "one.md", 0.7),
        ];
        assert_eq!(format_context(&docs), "a\n\nb\n\nc");
        assert_eq!(distinct_sources(&docs), vec!["one.md", "two.md"]);
        assert_eq!(similarity_scores(&docs), vec![0.9, 0.8, 0.7]);
        assert_eq!(format_context(&[]), "");
    }

    #[tokio::test]
    async fn test_search_or_empty_degrades() {
        assert!(search_or_empty(None, "q", 0.1, 5).await.is_empty());

        let failing = StaticRetriever::failing("index missing");
        assert!(search_or_empty(Some(&failing), "q", 0.1, 5).await.is_empty());

        let working = StaticRetriever::new(vec![scored("a", "a.md", 0.9)]);
        assert_eq!(search_or_empty(Some(&working), "q", 0.1, 5).await.len(), 1);
    }

    #[tokio::test]
    async fn test_vector_retriever_search() {
        let retriever = VectorRetriever::new(Arc::new(FixedEmbedder(vec![1.0, 0.0])), index());

        let results = retriever.search("how do I set up SSO", 0.1, 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.source, "sso.md");
        assert!((results[0].score - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_vector_retriever_dimension_mismatch() {
        let retriever =
            VectorRetriever::new(Arc::new(FixedEmbedder(vec![1.0, 0.0, 0.0])), index());

        let err = retriever.search("q", 0.1, 5).await.unwrap_err();
        assert!(matches!(err, RetrievalError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_vector_retriever_empty_index() {
        let retriever = VectorRetriever::new(
            Arc::new(FixedEmbedder(vec![1.0])),
            Arc::new(VectorIndex::new("fixed")),
        );

        let err = retriever.search("q", 0.1, 5).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Unavailable(_)));
    }
}
