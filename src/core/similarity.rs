use crate::models::DocumentChunk;

/// A chunk together with the similarity score that ranked it
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub similarity: f32,
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 on length mismatch or when either vector has zero magnitude;
/// never NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Rank chunks against a query vector
///
/// Scores every chunk (a missing or mismatched embedding scores 0.0), keeps
/// those at or above `threshold`, sorts descending with a deterministic
/// tie-break on chunk id, and truncates to `limit`. An empty result is the
/// designed trigger for the keyword fallback, not an error.
pub fn rank_chunks(
    query: &[f32],
    chunks: &[DocumentChunk],
    limit: usize,
    threshold: f32,
) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = chunks
        .iter()
        .map(|chunk| {
            let similarity = chunk
                .embedding
                .as_deref()
                .map(|embedding| cosine_similarity(query, embedding))
                .unwrap_or(0.0);
            ScoredChunk {
                chunk: chunk.clone(),
                similarity,
            }
        })
        .filter(|scored| scored.similarity >= threshold)
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });
    scored.truncate(limit);

    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn chunk_with_embedding(embedding: Option<Vec<f32>>) -> DocumentChunk {
        let mut chunk = DocumentChunk::new(Uuid::new_v4(), 0, "content".to_string());
        chunk.embedding = embedding;
        chunk
    }

    #[test]
    fn identical_vectors_score_one() {
        let v = vec![0.3, -0.5, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero_not_nan() {
        let v = vec![1.0, 2.0, 3.0];
        let zero = vec![0.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = vec![0.2, 0.9, -0.1];
        let b = vec![-0.4, 0.3, 0.7];
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn dimension_mismatch_scores_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn ranking_respects_threshold_order_and_limit() {
        let query = vec![1.0, 0.0];
        let chunks = vec![
            chunk_with_embedding(Some(vec![1.0, 0.0])),      // 1.0
            chunk_with_embedding(Some(vec![0.9, 0.4359])),   // ~0.9
            chunk_with_embedding(Some(vec![0.75, 0.6614])),  // ~0.75
            chunk_with_embedding(Some(vec![0.0, 1.0])),      // 0.0
            chunk_with_embedding(None),                      // missing -> 0.0
        ];

        let ranked = rank_chunks(&query, &chunks, 2, 0.7);
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].similarity >= ranked[1].similarity);
        assert!(ranked.iter().all(|s| s.similarity >= 0.7));
    }

    #[test]
    fn no_chunk_above_threshold_yields_empty() {
        let query = vec![1.0, 0.0];
        let chunks = vec![chunk_with_embedding(Some(vec![0.0, 1.0]))];
        assert!(rank_chunks(&query, &chunks, 5, 0.7).is_empty());
    }

    #[test]
    fn missing_embedding_never_panics() {
        let query = vec![1.0, 0.0];
        let chunks = vec![chunk_with_embedding(None), chunk_with_embedding(Some(vec![]))];
        let ranked = rank_chunks(&query, &chunks, 5, 0.0);
        assert!(ranked.iter().all(|s| s.similarity == 0.0));
    }
}
