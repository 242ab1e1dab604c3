//! Text embedding clients.

use super::RetrievalError;
use crate::config::EmbeddingConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maps texts to dense vectors.
#[async_trait]
pub trait Embedder: Send + Sync + 'static {
    /// Model identifier stored alongside an index.
    fn model(&self) -> &str;

    /// Embed `texts`, returning one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError>;
}

/// Client for an OpenAI-compatible `POST /v1/embeddings` endpoint.
pub struct HttpEmbedder {
    base_url: String,
    model: String,
    api_key: Option<String>,
    batch_size: usize,
    client: Arc<Client>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingObject>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingObject {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

impl HttpEmbedder {
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
        batch_size: usize,
        client: Arc<Client>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            batch_size: batch_size.max(1),
            client,
        }
    }

    /// Build from configuration, reading the API key from the configured
    /// environment variable when one is named.
    pub fn from_config(config: &EmbeddingConfig, client: Arc<Client>) -> Self {
        let api_key = config
            .api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty());

        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            api_key,
            config.batch_size,
            client,
        )
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let mut builder = self.client.post(&url).json(&EmbeddingRequest {
            model: &self.model,
            input: batch,
        });
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Embedding(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("invalid response body: {}", e)))?;

        if parsed.data.len() != batch.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} embeddings, got {}",
                batch.len(),
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|object| object.index);
        Ok(parsed.data.into_iter().map(|object| object.embedding).collect())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn embedder(url: String, batch_size: usize) -> HttpEmbedder {
        HttpEmbedder::new(
            url,
            "all-minilm".to_string(),
            None,
            batch_size,
            Arc::new(Client::new()),
        )
    }

    #[tokio::test]
    async fn test_embed_orders_by_index() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/embeddings")
            .match_body(Matcher::Regex(r#""model":"all-minilm""#.to_string()))
            .with_status(200)
            .with_body(
                r#"{"object":"list","data":[
                    {"object":"embedding","embedding":[0.0,1.0],"index":1},
                    {"object":"embedding","embedding":[1.0,0.0],"index":0}
                ],"model":"all-minilm"}"#,
            )
            .create_async()
            .await;

        let vectors = embedder(server.url(), 32)
            .embed(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_embed_splits_batches() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/embeddings")
            .with_status(200)
            .with_body(r#"{"data":[{"embedding":[0.5],"index":0}]}"#)
            .expect(3)
            .create_async()
            .await;

        let texts: Vec<String> = (0..3).map(|i| format!("doc {}", i)).collect();
        let vectors = embedder(server.url(), 1).embed(&texts).await.unwrap();

        mock.assert_async().await;
        assert_eq!(vectors.len(), 3);
    }

    #[tokio::test]
    async fn test_embed_http_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/embeddings")
            .with_status(404)
            .with_body("model not found")
            .create_async()
            .await;

        let err = embedder(server.url(), 32)
            .embed(&["q".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(ref msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_embed_count_mismatch() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/embeddings")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let err = embedder(server.url(), 32)
            .embed(&["q".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let config = EmbeddingConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..EmbeddingConfig::default()
        };
        let embedder = HttpEmbedder::from_config(&config, Arc::new(Client::new()));
        assert_eq!(embedder.base_url, "http://localhost:11434");
        assert_eq!(embedder.model(), "all-minilm");
    }
}
