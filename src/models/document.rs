use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document model representing an uploaded knowledge-base document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    /// Department the document belongs to; scoping unit for retrieval
    pub department: Option<String>,
    /// Role required to see the document, if restricted
    pub access_role: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

/// Document chunk for retrieval
///
/// Immutable once created. A chunk whose embedding is missing or has the
/// wrong dimension scores 0.0 in similarity computation instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_index: i32,
    pub content: String,
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document
    pub fn new(title: String, department: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            department,
            access_role: None,
            version: 1,
            created_at: Utc::now(),
        }
    }
}

impl DocumentChunk {
    /// Create a new document chunk
    pub fn new(document_id: Uuid, chunk_index: i32, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            chunk_index,
            content,
            embedding: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new document chunk with embedding
    pub fn new_with_embedding(
        document_id: Uuid,
        chunk_index: i32,
        content: String,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            chunk_index,
            content,
            embedding: Some(embedding),
            created_at: Utc::now(),
        }
    }
}
