use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which stage of the fallback ladder produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStrategy {
    /// Embedding similarity cleared the semantic threshold
    Semantic,
    /// Multilingual keyword overlap recovered the chunks
    Keyword,
    /// No chunk matched at all; a hand-authored topic answer was used
    Canned,
}

/// A source citation attached to an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSource {
    pub document_id: Uuid,
    pub document_title: String,
    pub excerpt: String,
    pub similarity: f32,
}

/// Result of one question-answering call (ephemeral, not persisted as-is)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaResult {
    pub answer: String,
    /// 0..=100; the UI treats values below 50 as "consider contacting support"
    pub confidence: u8,
    pub sources: Vec<AnswerSource>,
    pub response_time_ms: u64,
    pub strategy: RetrievalStrategy,
}

/// Persisted question-answering history record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaHistoryRecord {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub question: String,
    pub answer: String,
    /// Always >= 1 when persisted
    pub response_time_ms: u64,
    /// Always 0..=100 when persisted
    pub confidence: u8,
    pub department: Option<String>,
    pub source_document_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl QaHistoryRecord {
    /// Build a history record from a QA result, enforcing the persistence
    /// invariants: `response_time_ms >= 1` and `confidence <= 100`.
    pub fn from_result(
        question: &str,
        result: &QaResult,
        department: Option<&str>,
        user_id: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.map(str::to_string),
            question: question.to_string(),
            answer: result.answer.clone(),
            response_time_ms: result.response_time_ms.max(1),
            confidence: result.confidence.min(100),
            department: department.map(str::to_string),
            source_document_ids: result.sources.iter().map(|s| s.document_id).collect(),
            created_at: Utc::now(),
        }
    }
}

/// Clamp a raw confidence fraction (0.0..=1.0 expected, anything accepted)
/// to the 0..=100 scale. NaN and out-of-range inputs land on the bounds.
pub fn clamp_confidence(fraction: f32) -> u8 {
    if fraction.is_nan() {
        return 0;
    }
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_guards_nan_and_range() {
        assert_eq!(clamp_confidence(f32::NAN), 0);
        assert_eq!(clamp_confidence(-0.3), 0);
        assert_eq!(clamp_confidence(0.82), 82);
        assert_eq!(clamp_confidence(7.5), 100);
    }

    #[test]
    fn history_record_enforces_invariants() {
        let result = QaResult {
            answer: "ok".to_string(),
            confidence: 100,
            sources: Vec::new(),
            response_time_ms: 0,
            strategy: RetrievalStrategy::Canned,
        };
        let record = QaHistoryRecord::from_result("q", &result, Some("it"), None);
        assert_eq!(record.response_time_ms, 1);
        assert!(record.confidence <= 100);
    }
}
