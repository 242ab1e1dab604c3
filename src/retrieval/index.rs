//! In-memory vector index with JSON persistence.

use super::{chunk_text, Document, Embedder, RetrievalError, ScoredDocument};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// File extensions picked up by [`VectorIndex::build_from_dir`].
pub const INDEXED_EXTENSIONS: [&str; 2] = ["txt", "md"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    content: String,
    source: String,
    embedding: Vec<f32>,
}

/// Document chunks and their embeddings.
///
/// Search is a linear cosine scan, which is adequate for documentation
/// corpora of a few thousand chunks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Embedding model that produced the vectors
    model: String,
    /// Vector length, fixed by the first insertion
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

/// Cosine similarity clamped to `[0, 1]`. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

impl VectorIndex {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            dimensions: 0,
            entries: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a chunk with its embedding.
    pub fn insert(&mut self, document: Document, embedding: Vec<f32>) -> Result<(), RetrievalError> {
        if self.entries.is_empty() && self.dimensions == 0 {
            self.dimensions = embedding.len();
        } else if embedding.len() != self.dimensions {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        self.entries.push(IndexEntry {
            content: document.content,
            source: document.source,
            embedding,
        });
        Ok(())
    }

    /// Chunks with `score >= min_score`, best first, at most `max_docs`.
    /// Equal scores keep insertion order.
    pub fn search(&self, query: &[f32], min_score: f64, max_docs: usize) -> Vec<ScoredDocument> {
        let mut scored: Vec<ScoredDocument> = self
            .entries
            .iter()
            .map(|entry| ScoredDocument {
                document: Document {
                    content: entry.content.clone(),
                    source: entry.source.clone(),
                },
                score: cosine_similarity(query, &entry.embedding),
            })
            .filter(|doc| doc.score >= min_score)
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(max_docs);
        scored
    }

    pub fn save(&self, path: &Path) -> Result<(), RetrievalError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, RetrievalError> {
        if !path.exists() {
            return Err(RetrievalError::Unavailable(format!(
                "index file {} does not exist",
                path.display()
            )));
        }
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Chunk and embed every `.txt`/`.md` file under `data_dir`.
    pub async fn build_from_dir(
        data_dir: &Path,
        embedder: &dyn Embedder,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self, RetrievalError> {
        let documents = collect_documents(data_dir)?;

        let chunks: Vec<Document> = documents
            .into_iter()
            .flat_map(|doc| {
                chunk_text(&doc.content, chunk_size, chunk_overlap)
                    .into_iter()
                    .map(move |content| Document {
                        content,
                        source: doc.source.clone(),
                    })
            })
            .collect();

        if chunks.is_empty() {
            return Err(RetrievalError::EmptyCorpus(data_dir.to_path_buf()));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = embedder.embed(&texts).await?;

        let mut index = VectorIndex::new(embedder.model());
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            index.insert(chunk, vector)?;
        }

        tracing::info!(
            chunks = index.len(),
            dimensions = index.dimensions(),
            data_dir = %data_dir.display(),
            "vector index built"
        );
        Ok(index)
    }
}

/// Read every indexable file under `dir`, recursively, in path order.
pub fn collect_documents(dir: &Path) -> Result<Vec<Document>, RetrievalError> {
    if !dir.is_dir() {
        return Err(RetrievalError::NotFound(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    walk(dir, &mut paths)?;
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            continue;
        }
        documents.push(Document {
            content,
            source: path.display().to_string(),
        });
    }

    if documents.is_empty() {
        return Err(RetrievalError::EmptyCorpus(dir.to_path_buf()));
    }
    Ok(documents)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RetrievalError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| INDEXED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        {
            out.push(path);
        }
    }
    Ok(())
}
