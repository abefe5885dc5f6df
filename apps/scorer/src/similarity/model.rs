//! Client for a sentence-embedding model served behind an OpenAI-compatible
//! `/embeddings` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EmbeddingError, Embedder, SimilarityBackend};

/// Inputs are cut to this many characters after whitespace collapsing.
const MAX_INPUT_CHARS: usize = 512;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Clone)]
pub struct ModelEmbedder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
}

impl ModelEmbedder {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        model: String,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            api_key,
            model,
            dimension,
        })
    }

    /// Collapses whitespace and truncates to the model's input budget.
    pub fn preprocess(text: &str) -> String {
        text.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(MAX_INPUT_CHARS)
            .collect()
    }

    /// Orders the response by input index and checks its shape against the
    /// request.
    fn validate(
        &self,
        mut response: EmbeddingResponse,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        response.data.sort_by_key(|entry| entry.index);
        if response.data.len() != expected {
            return Err(EmbeddingError::Malformed(format!(
                "expected {expected} embeddings, got {}",
                response.data.len()
            )));
        }
        if let Some(bad) = response
            .data
            .iter()
            .find(|entry| entry.embedding.len() != self.dimension)
        {
            return Err(EmbeddingError::Malformed(format!(
                "expected dimension {}, got {}",
                self.dimension,
                bad.embedding.len()
            )));
        }
        Ok(response.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

#[async_trait]
impl Embedder for ModelEmbedder {
    fn backend(&self) -> SimilarityBackend {
        SimilarityBackend::Model
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Retries on 429 and 5xx with exponential backoff.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let input: Vec<String> = texts.iter().map(|t| Self::preprocess(t)).collect();
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: &input,
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 500ms, 1s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Embedding request attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.endpoint).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding server returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let parsed: EmbeddingResponse = response.json().await?;
            let vectors = self.validate(parsed, texts.len())?;
            debug!("Embedded {} texts with {}", vectors.len(), self.model);
            return Ok(vectors);
        }

        Err(last_error.unwrap_or(EmbeddingError::RetriesExhausted {
            retries: MAX_RETRIES,
        }))
    }
}
