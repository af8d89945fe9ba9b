use deskrag::core::{
    AnswerComposer, DocumentProcessor, EmbeddingService, MockEmbeddingProvider, QaService,
    UnavailableChatCompleter,
};
use deskrag::models::RetrievalStrategy;
use deskrag::storage::MemoryStorage;
use std::sync::Arc;

const VPN_GUIDE: &str = "VPN connection troubleshooting steps are documented here. \
    Restart the VPN client first. If the tunnel still drops, check the network \
    adapter settings. Contact the service desk when both steps fail.";

fn pipeline(storage: Arc<MemoryStorage>) -> (DocumentProcessor, QaService) {
    let embeddings = Arc::new(EmbeddingService::new(Arc::new(
        MockEmbeddingProvider::with_dimension(128),
    )));
    let processor = DocumentProcessor::new(storage.clone(), embeddings.clone());
    let qa = QaService::new(
        storage,
        embeddings,
        AnswerComposer::new(Arc::new(UnavailableChatCompleter)),
    );
    (processor, qa)
}

#[tokio::test]
async fn uploaded_document_is_found_by_keyword_fallback() {
    let storage = Arc::new(MemoryStorage::new());
    let (processor, qa) = pipeline(storage);

    let report = processor
        .ingest("VPN Guide".to_string(), Some("it".to_string()), VPN_GUIDE)
        .await
        .unwrap();
    assert!(report.chunks_created >= 1);

    // Mock embeddings of different texts are uncorrelated, so the semantic
    // stage finds nothing and the keyword stage recovers the chunk
    let result = qa
        .ask("Why does my VPN keep disconnecting?", Some("it"), None)
        .await;

    assert_eq!(result.strategy, RetrievalStrategy::Keyword);
    assert!(result.answer.contains("VPN"));
    assert!(!result.sources.is_empty());
    assert_eq!(result.sources[0].document_title, "VPN Guide");
}

#[tokio::test]
async fn identical_text_is_a_semantic_hit_with_deterministic_embeddings() {
    let storage = Arc::new(MemoryStorage::new());
    let (processor, qa) = pipeline(storage);

    let sentence = "Printer toner is stocked in the supply room on floor two.";
    processor
        .ingest("Printer Guide".to_string(), Some("it".to_string()), sentence)
        .await
        .unwrap();

    // The same text embeds to the same vector, so similarity is exactly 1.0
    let result = qa.ask(sentence, Some("it"), None).await;

    assert_eq!(result.strategy, RetrievalStrategy::Semantic);
    assert_eq!(result.confidence, 100);
    assert!((result.sources[0].similarity - 1.0).abs() < 1e-5);
}
