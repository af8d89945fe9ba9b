pub mod memory;

pub use memory::MemoryStorage;

use crate::models::{
    Department, Document, DocumentChunk, QaHistoryRecord, RoutingRule, Ticket,
};
use crate::utils::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence operations the core depends on
///
/// The orchestrators hold this as `Arc<dyn Storage>`; production wires a
/// database-backed implementation, tests and keyless demo runs use
/// [`MemoryStorage`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// All documents in the library
    async fn all_documents(&self) -> Result<Vec<Document>>;

    /// Documents belonging to a department (case-insensitive match)
    async fn documents_by_department(&self, department: &str) -> Result<Vec<Document>>;

    /// Chunks of one document, in chunk order
    async fn chunks_by_document(&self, document_id: Uuid) -> Result<Vec<DocumentChunk>>;

    /// Persist a document
    async fn create_document(&self, document: Document) -> Result<()>;

    /// Persist a chunk
    async fn create_chunk(&self, chunk: DocumentChunk) -> Result<()>;

    /// Persist a question-answering history record
    async fn create_qa_history(&self, record: QaHistoryRecord) -> Result<()>;

    /// Persist a ticket
    async fn create_ticket(&self, ticket: Ticket) -> Result<()>;

    /// Fetch a ticket by id
    async fn ticket(&self, id: Uuid) -> Result<Option<Ticket>>;

    /// Record the department a ticket was routed to
    async fn update_ticket_department(&self, id: Uuid, department: Department) -> Result<()>;

    /// Active routing rules, highest priority first
    async fn active_routing_rules(&self) -> Result<Vec<RoutingRule>>;

    /// Fetch a routing rule by id
    async fn routing_rule(&self, id: Uuid) -> Result<Option<RoutingRule>>;

    /// Replace a routing rule (used for accuracy feedback)
    async fn update_routing_rule(&self, rule: RoutingRule) -> Result<()>;

    /// All persisted history records, oldest first
    async fn qa_history(&self) -> Result<Vec<QaHistoryRecord>>;
}
