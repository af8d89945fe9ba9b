pub mod answer;
pub mod chunker;
pub mod document_processor;
pub mod embeddings;
pub mod keyword;
pub mod qa_service;
pub mod routing;
pub mod similarity;

pub use answer::{AnswerComposer, ChatCompleter, OpenAiChatCompleter, UnavailableChatCompleter};
pub use chunker::TextChunker;
pub use document_processor::{DocumentProcessor, IngestReport};
pub use embeddings::{EmbeddingProvider, EmbeddingService, MockEmbeddingProvider, OpenAiEmbeddingProvider};
pub use keyword::{KeywordMatcher, KeywordTables};
pub use qa_service::{QaConfig, QaService};
pub use routing::TicketRouter;
pub use similarity::{cosine_similarity, rank_chunks, ScoredChunk};
