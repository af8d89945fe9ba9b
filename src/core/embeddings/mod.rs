pub mod providers;
pub mod service;

// Re-export core types and traits
pub use providers::{EmbeddingError, MockEmbeddingProvider, OpenAiEmbeddingProvider};
pub use service::{EmbeddingProvider, EmbeddingService};
