use crate::core::embeddings::providers::EmbeddingError;
use crate::core::embeddings::service::EmbeddingProvider;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Deterministic mock embedding provider
///
/// Produces hash-seeded pseudo-random unit vectors, so identical text always
/// embeds identically. Serves tests and keyless runtime, where it stands in
/// for the external provider.
pub struct MockEmbeddingProvider {
    dimension: usize,
    fail_always: bool,
}

impl MockEmbeddingProvider {
    /// Create a mock provider with the default dimension
    pub fn new() -> Self {
        Self {
            dimension: 1536,
            fail_always: false,
        }
    }

    /// Create a mock provider with a custom dimension
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            fail_always: false,
        }
    }

    /// Create a mock provider that fails every call, for exercising the
    /// degraded path
    pub fn failing() -> Self {
        Self {
            dimension: 1536,
            fail_always: true,
        }
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut rng = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        for _ in 0..self.dimension {
            // Linear congruential step keeps the output reproducible
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            let value = ((rng >> 16) as u16 as f32 / 32768.0) - 1.0;
            embedding.push(value * 0.1);
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        embedding
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if self.fail_always {
            return Err(EmbeddingError::Api("simulated provider outage".to_string()));
        }

        debug!("Generating {} mock embeddings", texts.len());
        Ok(texts.iter().map(|t| self.generate(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_embeddings_are_deterministic() {
        let provider = MockEmbeddingProvider::with_dimension(64);
        let texts = vec!["same text".to_string()];

        let first = provider.embed(&texts).await.unwrap();
        let second = provider.embed(&texts).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].len(), 64);
    }

    #[tokio::test]
    async fn different_texts_embed_differently() {
        let provider = MockEmbeddingProvider::with_dimension(64);
        let texts = vec!["first".to_string(), "second".to_string()];

        let embeddings = provider.embed(&texts).await.unwrap();
        assert_ne!(embeddings[0], embeddings[1]);
    }

    #[tokio::test]
    async fn failing_mock_errors_on_every_call() {
        let provider = MockEmbeddingProvider::failing();
        assert!(provider.embed(&["x".to_string()]).await.is_err());
    }
}
