use crate::core::chunker::TextChunker;
use crate::core::embeddings::EmbeddingService;
use crate::models::{Document, DocumentChunk};
use crate::storage::Storage;
use crate::utils::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of ingesting one document
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub document_id: Uuid,
    pub chunks_created: usize,
    pub total_tokens: usize,
}

/// Document ingestion pipeline: chunk, embed, persist
///
/// Chunk rows are inserted independently; when the embedding provider is
/// down the chunks are stored without embeddings (scored 0.0 at query time)
/// so ingestion itself never depends on provider availability.
pub struct DocumentProcessor {
    storage: Arc<dyn Storage>,
    embeddings: Arc<EmbeddingService>,
    chunker: TextChunker,
}

impl DocumentProcessor {
    pub fn new(storage: Arc<dyn Storage>, embeddings: Arc<EmbeddingService>) -> Self {
        Self {
            storage,
            embeddings,
            chunker: TextChunker::new(),
        }
    }

    pub fn with_chunker(
        storage: Arc<dyn Storage>,
        embeddings: Arc<EmbeddingService>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            storage,
            embeddings,
            chunker,
        }
    }

    /// Ingest a text document into the library
    pub async fn ingest(
        &self,
        title: String,
        department: Option<String>,
        text: &str,
    ) -> Result<IngestReport> {
        if text.trim().is_empty() {
            return Err(Error::document_processing("document text is empty"));
        }

        let chunk_texts = self.chunker.chunk(text);
        if chunk_texts.is_empty() {
            return Err(Error::document_processing(
                "document produced no chunks after sentence splitting",
            ));
        }

        let embeddings = match self.embeddings.try_embed(&chunk_texts).await {
            Ok(vectors) => vectors.into_iter().map(Some).collect(),
            Err(e) => {
                warn!(error = %e, "Embedding provider unavailable, storing chunks without embeddings");
                vec![None; chunk_texts.len()]
            }
        };

        let document = Document::new(title, department);
        let document_id = document.id;
        self.storage.create_document(document).await?;

        for (index, (content, embedding)) in
            chunk_texts.iter().zip(embeddings.into_iter()).enumerate()
        {
            let chunk = match embedding {
                Some(vector) => DocumentChunk::new_with_embedding(
                    document_id,
                    index as i32,
                    content.clone(),
                    vector,
                ),
                None => DocumentChunk::new(document_id, index as i32, content.clone()),
            };
            self.storage.create_chunk(chunk).await?;
        }

        let total_tokens = text.split_whitespace().count();
        info!(
            %document_id,
            chunks = chunk_texts.len(),
            total_tokens,
            "Document ingested"
        );

        Ok(IngestReport {
            document_id,
            chunks_created: chunk_texts.len(),
            total_tokens,
        })
    }
}
