use deskrag::api::{create_api_router, AppState};
use deskrag::config::Settings;
use deskrag::core::{
    AnswerComposer, ChatCompleter, DocumentProcessor, EmbeddingProvider, EmbeddingService,
    MockEmbeddingProvider, OpenAiChatCompleter, OpenAiEmbeddingProvider, QaConfig, QaService,
    TicketRouter, UnavailableChatCompleter,
};
use deskrag::storage::{MemoryStorage, Storage};
use deskrag::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    logging::init_tracing_with_config(&settings)
        .map_err(|e| format!("Failed to initialize logging: {e}"))?;

    info!("Starting DeskRAG server v{}", deskrag::VERSION);

    // Provider selection is the composition root's job: a missing API key is
    // a handled runtime state, not a startup failure
    let (embedding_provider, chat): (Arc<dyn EmbeddingProvider>, Arc<dyn ChatCompleter>) =
        match &settings.openai.api_key {
            Some(key) => (
                Arc::new(OpenAiEmbeddingProvider::with_model(
                    key.clone(),
                    settings.openai.embedding_model.clone(),
                )),
                Arc::new(OpenAiChatCompleter::new(
                    key.clone(),
                    settings.openai.chat_model.clone(),
                )),
            ),
            None => {
                warn!("OPENAI_API_KEY not set; using mock embeddings and fallback answers");
                (
                    Arc::new(MockEmbeddingProvider::new()),
                    Arc::new(UnavailableChatCompleter),
                )
            }
        };

    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let embeddings = Arc::new(EmbeddingService::new(embedding_provider));

    let qa = Arc::new(QaService::with_config(
        storage.clone(),
        embeddings.clone(),
        AnswerComposer::new(chat.clone()),
        QaConfig {
            similarity_threshold: settings.qa.similarity_threshold,
            max_chunks: settings.qa.max_chunks,
            widen_empty_scope: settings.qa.widen_empty_scope,
        },
    ));
    let ticket_router = Arc::new(TicketRouter::new(storage.clone(), chat.clone()));
    let composer = Arc::new(AnswerComposer::new(chat));
    let processor = Arc::new(DocumentProcessor::new(storage.clone(), embeddings));

    let state = AppState {
        qa,
        ticket_router,
        composer,
        processor,
        storage,
    };
    let app = create_api_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    info!("DeskRAG API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
