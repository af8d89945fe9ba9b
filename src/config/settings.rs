use serde::Deserialize;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub log: LogSettings,
    pub openai: OpenAiSettings,
    pub qa: QaSettings,
}

/// Server-related settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Logging settings
#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// OpenAI-related settings
///
/// An absent API key is a valid runtime state: the composition root then
/// installs the deterministic mock embedding provider and every request
/// exercises the documented fallback ladder.
#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
}

/// Question-answering policy settings
#[derive(Debug, Deserialize, Clone)]
pub struct QaSettings {
    /// Minimum cosine similarity for a semantic hit
    pub similarity_threshold: f32,
    /// Maximum chunks handed to the answer composer
    pub max_chunks: usize,
    /// Whether an empty department scope may widen to general/IT/policy
    /// documents before giving up on retrieval
    pub widen_empty_scope: bool,
}

impl Settings {
    /// Load settings from environment with default values
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Ok(Settings {
            server: ServerSettings {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .unwrap_or(8000),
            },
            log: LogSettings {
                level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            openai: OpenAiSettings {
                api_key: std::env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                chat_model: std::env::var("OPENAI_CHAT_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                embedding_model: std::env::var("OPENAI_EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            },
            qa: QaSettings {
                similarity_threshold: std::env::var("QA_SIMILARITY_THRESHOLD")
                    .unwrap_or_else(|_| "0.7".to_string())
                    .parse()
                    .unwrap_or(0.7),
                max_chunks: std::env::var("QA_MAX_CHUNKS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                widen_empty_scope: std::env::var("QA_WIDEN_EMPTY_SCOPE")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .unwrap_or(true),
            },
        })
    }
}
