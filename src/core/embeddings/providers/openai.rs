use crate::core::embeddings::providers::EmbeddingError;
use crate::core::embeddings::service::EmbeddingProvider;
use async_openai::{config::OpenAIConfig, types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use tracing::{info, warn};

/// OpenAI embedding provider
pub struct OpenAiEmbeddingProvider {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl OpenAiEmbeddingProvider {
    /// Create a new OpenAI provider with the default embedding model
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, "text-embedding-3-small".to_string())
    }

    /// Create a new OpenAI provider with a specific model
    pub fn with_model(api_key: String, model: String) -> Self {
        let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));

        let dimension = match model.as_str() {
            "text-embedding-ada-002" => 1536,
            "text-embedding-3-small" => 1536,
            "text-embedding-3-large" => 3072,
            _ => {
                warn!("Unknown OpenAI embedding model: {}, assuming 1536 dims", model);
                1536
            }
        };

        Self {
            client,
            model,
            dimension,
        }
    }

    fn classify_error(message: String) -> EmbeddingError {
        let lowered = message.to_lowercase();
        if lowered.contains("rate limit") || lowered.contains("rate_limit") {
            EmbeddingError::RateLimited(message)
        } else if lowered.contains("unauthorized")
            || lowered.contains("authentication")
            || lowered.contains("invalid api key")
        {
            EmbeddingError::Auth(message)
        } else {
            EmbeddingError::Api(message)
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        info!("Requesting {} OpenAI embeddings", texts.len());

        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(texts.to_vec())
            .build()
            .map_err(|e| EmbeddingError::Api(format!("failed to build request: {e}")))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| Self::classify_error(format!("OpenAI API error: {e}")))?;

        if response.data.len() != texts.len() {
            return Err(EmbeddingError::Api(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        let mut embeddings: Vec<(u32, Vec<f32>)> = response
            .data
            .into_iter()
            .map(|item| (item.index, item.embedding))
            .collect();
        // Restore input order by the index field
        embeddings.sort_by_key(|(index, _)| *index);

        Ok(embeddings.into_iter().map(|(_, v)| v).collect())
    }
}
