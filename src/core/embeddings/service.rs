use crate::core::embeddings::providers::EmbeddingError;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Trait for embedding providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Generate one vector per input text, order-preserving
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Embedding service that never fails
///
/// Wraps a provider with a bounded timeout. When the provider errors or
/// times out, [`EmbeddingService::embed`] returns the same cardinality of
/// deterministic low-magnitude vectors instead: downstream similarity code
/// sees no dimension mismatch, scores stay low and uncorrelated, and the
/// fallback ladder takes over. No availability state is cached; the next
/// call attempts the provider fresh, so the system recovers on its own.
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    timeout: Duration,
}

/// Amplitude of the degraded vectors; small, fixed, and never zero
const DEGRADED_AMPLITUDE: f32 = 0.05;

impl EmbeddingService {
    /// Create a service with the default provider timeout
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_timeout(provider, Duration::from_secs(10))
    }

    /// Create a service with a custom provider timeout
    pub fn with_timeout(provider: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// Embed a batch, degrading to deterministic placeholder vectors on any
    /// provider failure. The second element reports whether degradation
    /// happened.
    pub async fn embed(&self, texts: &[String]) -> (Vec<Vec<f32>>, bool) {
        match self.try_embed(texts).await {
            Ok(embeddings) => (embeddings, false),
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Embedding provider failed, returning degraded vectors"
                );
                let dimension = self.provider.dimension();
                (
                    texts.iter().map(|t| degraded_vector(t, dimension)).collect(),
                    true,
                )
            }
        }
    }

    /// Embed a batch, surfacing provider failures to the caller
    ///
    /// The ingestion path uses this so failed chunks are stored without an
    /// embedding rather than with a placeholder one.
    pub async fn try_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = tokio::time::timeout(self.timeout, self.provider.embed(texts))
            .await
            .map_err(|_| EmbeddingError::Timeout(self.timeout))??;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::Api(format!(
                "provider returned {} vectors for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }

        debug!(
            provider = self.provider.name(),
            count = embeddings.len(),
            "Embedded batch"
        );
        Ok(embeddings)
    }
}

/// Deterministic low-magnitude vector for the degraded path
///
/// Hash-seeded so repeated calls with the same text agree, with values in
/// (-DEGRADED_AMPLITUDE, DEGRADED_AMPLITUDE) and never all zeros, which
/// would collapse every cosine similarity to 0/undefined.
fn degraded_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    // Offset the seed so the degraded vector differs from the mock
    // provider's output for the same text
    let mut rng = hasher.finish().wrapping_add(0x9E3779B97F4A7C15);

    let mut vector = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let unit = ((rng >> 32) as u32 as f32 / u32::MAX as f32) * 2.0 - 1.0;
        let value = unit * DEGRADED_AMPLITUDE;
        // Keep the guarantee even where the generator lands on zero
        vector.push(if value == 0.0 { DEGRADED_AMPLITUDE / 2.0 } else { value });
    }

    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::embeddings::providers::MockEmbeddingProvider;

    #[tokio::test]
    async fn degrades_to_same_cardinality_on_failure() {
        let service = EmbeddingService::new(Arc::new(MockEmbeddingProvider::failing()));
        let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];

        let (vectors, degraded) = service.embed(&texts).await;
        assert!(degraded);
        assert_eq!(vectors.len(), 3);
        assert!(vectors.iter().all(|v| v.len() == 1536));
        assert!(vectors.iter().all(|v| v.iter().any(|&x| x != 0.0)));
        assert!(vectors
            .iter()
            .all(|v| v.iter().all(|&x| x.abs() <= DEGRADED_AMPLITUDE)));
    }

    #[tokio::test]
    async fn degraded_vectors_are_deterministic() {
        let service = EmbeddingService::new(Arc::new(MockEmbeddingProvider::failing()));
        let texts = vec!["stable input".to_string()];

        let (first, _) = service.embed(&texts).await;
        let (second, _) = service.embed(&texts).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn healthy_provider_is_not_degraded() {
        let service = EmbeddingService::new(Arc::new(MockEmbeddingProvider::with_dimension(32)));
        let (vectors, degraded) = service.embed(&["hello".to_string()]).await;
        assert!(!degraded);
        assert_eq!(vectors[0].len(), 32);
    }

    #[tokio::test]
    async fn try_embed_surfaces_failures() {
        let service = EmbeddingService::new(Arc::new(MockEmbeddingProvider::failing()));
        assert!(service.try_embed(&["x".to_string()]).await.is_err());
    }
}
