//! Deterministic text-feature embedder used when no embedding model is
//! reachable. Scores from this backend are comparable with each other only.

use async_trait::async_trait;

use super::{EmbeddingError, Embedder, SimilarityBackend};

/// Presence flags, one vector component each, in this order.
const FEATURE_KEYWORDS: &[&str] = &["python", "javascript", "java", "react", "node", "sql", "aws"];
const NORM_EPSILON: f32 = 1e-8;

pub const FALLBACK_MODEL_NAME: &str = "text-features";
pub const FALLBACK_DIMENSION: usize = 3 + FEATURE_KEYWORDS.len();

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEmbedder;

impl FallbackEmbedder {
    /// `[chars, words, chars excluding spaces, keyword flags...]`, scaled to
    /// (almost) unit length.
    pub fn features(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();

        let mut features = Vec::with_capacity(FALLBACK_DIMENSION);
        features.push(text.chars().count() as f32);
        features.push(text.split_whitespace().count() as f32);
        features.push(text.chars().filter(|c| *c != ' ').count() as f32);
        features.extend(
            FEATURE_KEYWORDS
                .iter()
                .map(|kw| if lower.contains(kw) { 1.0 } else { 0.0 }),
        );

        let norm = features.iter().map(|x| x * x).sum::<f32>().sqrt();
        features.iter_mut().for_each(|x| *x /= norm + NORM_EPSILON);
        features
    }

    pub fn embed_all(texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| Self::features(t)).collect()
    }
}

#[async_trait]
impl Embedder for FallbackEmbedder {
    fn backend(&self) -> SimilarityBackend {
        SimilarityBackend::Fallback
    }

    fn model_name(&self) -> &str {
        FALLBACK_MODEL_NAME
    }

    fn dimension(&self) -> usize {
        FALLBACK_DIMENSION
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(Self::embed_all(texts))
    }
}
