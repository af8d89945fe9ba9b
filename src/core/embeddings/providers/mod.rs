pub mod mock;
pub mod openai;

pub use mock::MockEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

/// Errors raised by embedding providers
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl From<EmbeddingError> for crate::utils::Error {
    fn from(err: EmbeddingError) -> Self {
        crate::utils::Error::embedding(err.to_string())
    }
}
