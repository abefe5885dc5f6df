//! Similarity Engine: dense embeddings for resume and JD text plus cosine
//! similarity between them.
//!
//! The embedding strategy is chosen once at startup. With an embedding server
//! configured and answering, every request uses the model; otherwise every
//! request uses the deterministic fallback. A model failure mid-request
//! degrades that request to the fallback and is logged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

pub mod fallback;
pub mod model;

pub use fallback::FallbackEmbedder;
pub use model::ModelEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding server error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed embedding response: {0}")]
    Malformed(String),

    #[error("Embedding server unavailable after {retries} retries")]
    RetriesExhausted { retries: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityBackend {
    Model,
    Fallback,
}

impl SimilarityBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityBackend::Model => "model",
            SimilarityBackend::Fallback => "fallback",
        }
    }
}

/// A strategy that turns texts into fixed-length vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn backend(&self) -> SimilarityBackend;
    fn model_name(&self) -> &str;
    fn dimension(&self) -> usize;
    /// One vector per input, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub embedding_dimension: usize,
    /// `"loaded"` for the model strategy, `"fallback"` otherwise.
    pub status: String,
}

/// Cosine similarity clamped to `[-1, 1]`. Mismatched lengths, zero-norm
/// vectors and non-finite results all give `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_finite() {
        similarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Similarity between two texts and the backend that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    pub score: f64,
    pub backend: SimilarityBackend,
}

#[derive(Clone)]
pub struct SimilarityEngine {
    embedder: Arc<dyn Embedder>,
}

impl SimilarityEngine {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn fallback_only() -> Self {
        Self::new(Arc::new(FallbackEmbedder))
    }

    /// Selects the strategy for the process lifetime: the configured model if
    /// it answers a probe, the fallback otherwise.
    pub async fn load(config: &Config) -> Self {
        let Some(url) = config.embedding_url.as_deref() else {
            info!("No embedding server configured, using fallback text features");
            return Self::fallback_only();
        };

        let embedder = match ModelEmbedder::new(
            url,
            config.embedding_api_key.clone(),
            config.model_name.clone(),
            config.embedding_dimension,
            Duration::from_secs(config.embedding_timeout_secs),
        ) {
            Ok(embedder) => embedder,
            Err(e) => {
                warn!("Failed to build embedding client: {e}, using fallback text features");
                return Self::fallback_only();
            }
        };

        match embedder.embed(&["probe".to_string()]).await {
            Ok(_) => {
                info!(
                    "Embedding model loaded: {} (dimension {})",
                    config.model_name, config.embedding_dimension
                );
                Self::new(Arc::new(embedder))
            }
            Err(e) => {
                warn!("Embedding model unavailable: {e}, using fallback text features");
                Self::fallback_only()
            }
        }
    }

    pub fn backend(&self) -> SimilarityBackend {
        self.embedder.backend()
    }

    pub fn model_info(&self) -> ModelInfo {
        let status = match self.embedder.backend() {
            SimilarityBackend::Model => "loaded",
            SimilarityBackend::Fallback => "fallback",
        };
        ModelInfo {
            model_name: self.embedder.model_name().to_string(),
            embedding_dimension: self.embedder.dimension(),
            status: status.to_string(),
        }
    }

    /// Embeds `texts` with the selected strategy, re-encoding the whole batch
    /// with the fallback if the model fails.
    pub async fn embed(&self, texts: &[String]) -> (Vec<Vec<f32>>, SimilarityBackend) {
        match self.embedder.embed(texts).await {
            Ok(vectors) => (vectors, self.embedder.backend()),
            Err(e) => {
                warn!("Embedding failed: {e}, similarity degraded to fallback text features");
                (FallbackEmbedder::embed_all(texts), SimilarityBackend::Fallback)
            }
        }
    }

    /// Embeds both texts concurrently and compares them. Never fails; when only
    /// one side degraded, both are re-encoded with the fallback so the vectors
    /// stay comparable.
    pub async fn compare(&self, text_a: &str, text_b: &str) -> SimilarityScore {
        let batch_a = [text_a.to_string()];
        let batch_b = [text_b.to_string()];
        let ((a, backend_a), (b, backend_b)) =
            tokio::join!(self.embed(&batch_a), self.embed(&batch_b));

        let (a, b, backend) = if backend_a == backend_b {
            (a, b, backend_a)
        } else {
            let texts = [text_a.to_string(), text_b.to_string()];
            let mut vectors = FallbackEmbedder::embed_all(&texts).into_iter();
            (
                vectors.next().into_iter().collect(),
                vectors.next().into_iter().collect(),
                SimilarityBackend::Fallback,
            )
        };

        let score = match (a.first(), b.first()) {
            (Some(a), Some(b)) => cosine_similarity(a, b),
            _ => 0.0,
        };
        SimilarityScore { score, backend }
    }
}
