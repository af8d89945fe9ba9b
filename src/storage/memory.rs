use crate::models::{
    Department, Document, DocumentChunk, QaHistoryRecord, RoutingRule, Ticket,
};
use crate::storage::Storage;
use crate::utils::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory storage backend
///
/// Backs tests and keyless demo runs. Chunk rows are inserted independently,
/// matching the ingestion write path of the production store.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    documents: Vec<Document>,
    chunks: HashMap<Uuid, Vec<DocumentChunk>>,
    history: Vec<QaHistoryRecord>,
    tickets: HashMap<Uuid, Ticket>,
    rules: Vec<RoutingRule>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document together with its chunks (test convenience)
    pub async fn seed_document(&self, document: Document, chunks: Vec<DocumentChunk>) {
        let mut inner = self.inner.write().await;
        inner.chunks.insert(document.id, chunks);
        inner.documents.push(document);
    }

    /// Seed a routing rule (test convenience)
    pub async fn seed_rule(&self, rule: RoutingRule) {
        self.inner.write().await.rules.push(rule);
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn all_documents(&self) -> Result<Vec<Document>> {
        Ok(self.inner.read().await.documents.clone())
    }

    async fn documents_by_department(&self, department: &str) -> Result<Vec<Document>> {
        let wanted = department.trim().to_lowercase();
        Ok(self
            .inner
            .read()
            .await
            .documents
            .iter()
            .filter(|d| {
                d.department
                    .as_deref()
                    .map(|dep| dep.trim().to_lowercase() == wanted)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn chunks_by_document(&self, document_id: Uuid) -> Result<Vec<DocumentChunk>> {
        Ok(self
            .inner
            .read()
            .await
            .chunks
            .get(&document_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_document(&self, document: Document) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.chunks.entry(document.id).or_default();
        inner.documents.push(document);
        Ok(())
    }

    async fn create_chunk(&self, chunk: DocumentChunk) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.chunks.entry(chunk.document_id).or_default().push(chunk);
        Ok(())
    }

    async fn create_qa_history(&self, record: QaHistoryRecord) -> Result<()> {
        self.inner.write().await.history.push(record);
        Ok(())
    }

    async fn create_ticket(&self, ticket: Ticket) -> Result<()> {
        self.inner.write().await.tickets.insert(ticket.id, ticket);
        Ok(())
    }

    async fn ticket(&self, id: Uuid) -> Result<Option<Ticket>> {
        Ok(self.inner.read().await.tickets.get(&id).cloned())
    }

    async fn update_ticket_department(&self, id: Uuid, department: Department) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.tickets.get_mut(&id) {
            Some(ticket) => {
                ticket.department = Some(department);
                Ok(())
            }
            None => Err(Error::not_found(format!("ticket {id}"))),
        }
    }

    async fn active_routing_rules(&self) -> Result<Vec<RoutingRule>> {
        let mut rules: Vec<RoutingRule> = self
            .inner
            .read()
            .await
            .rules
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect();
        rules.sort_by_key(|r| std::cmp::Reverse(r.priority));
        Ok(rules)
    }

    async fn routing_rule(&self, id: Uuid) -> Result<Option<RoutingRule>> {
        Ok(self
            .inner
            .read()
            .await
            .rules
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn update_routing_rule(&self, rule: RoutingRule) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => {
                *existing = rule;
                Ok(())
            }
            None => Err(Error::not_found(format!("routing rule {}", rule.id))),
        }
    }

    async fn qa_history(&self) -> Result<Vec<QaHistoryRecord>> {
        Ok(self.inner.read().await.history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn department_lookup_is_case_insensitive() {
        let storage = MemoryStorage::new();
        storage
            .seed_document(Document::new("VPN guide".to_string(), Some("IT".to_string())), Vec::new())
            .await;

        let found = storage.documents_by_department("it").await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(storage.documents_by_department("hr").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inactive_rules_are_filtered() {
        let storage = MemoryStorage::new();
        let mut off = RoutingRule::new("off", "x", Department::It);
        off.is_active = false;
        storage.seed_rule(off).await;
        storage.seed_rule(RoutingRule::new("on", "y", Department::Hr)).await;

        let rules = storage.active_routing_rules().await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "on");
    }
}
