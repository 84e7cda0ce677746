//! Brute-force cosine similarity ranking.
//!
//! Exact ranking over every stored embedding. A personal collection is on
//! the order of thousands of records, so a linear scan stays well under
//! interactive latency and no approximate index is kept.

use crate::{Error, Result};

/// Ranks candidates by cosine similarity to the query vector.
///
/// Pure function over `(query, candidates)`: no state, no I/O. Loading and
/// decoding stored vectors is the job of
/// [`PromptStore::similarity_search`](crate::storage::PromptStore::similarity_search).
///
/// Candidates are sorted by score descending; equal scores are broken by
/// ascending id so the ranking is deterministic. The result is truncated to
/// `limit` entries.
///
/// A zero-norm query or candidate has undefined cosine similarity; it is
/// scored `0.0` here, ranking with orthogonal candidates and below any
/// positive match. A non-finite score (a vector carrying NaN or infinite
/// components) ranks below every finite score. An empty candidate set
/// returns an empty ranking.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if a candidate vector's length differs
/// from the query's. The store rejects mismatched embeddings at write time,
/// so this only triggers on a query vector from a differently-sized model.
pub fn rank_by_similarity(
    query: &[f32],
    candidates: &[(i64, Vec<f32>)],
    limit: usize,
) -> Result<Vec<i64>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored: Vec<(i64, f32)> = Vec::with_capacity(candidates.len());
    for (id, vector) in candidates {
        if vector.len() != query.len() {
            return Err(Error::InvalidInput(format!(
                "Embedding dimension mismatch: expected {}, got {} for prompt {id}",
                query.len(),
                vector.len()
            )));
        }
        let score = cosine_similarity(query, vector);
        // Clamp non-finite scores so the sort comparator stays a total order.
        let score = if score.is_finite() {
            score
        } else {
            f32::NEG_INFINITY
        };
        scored.push((*id, score));
    }

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    Ok(scored.into_iter().take(limit).map(|(id, _)| id).collect())
}

/// Computes cosine similarity between two equal-length vectors.
///
/// Ranges over [-1, 1]. Returns `0.0` when either vector has zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let candidates = vec![
            (1, vec![0.0, 1.0, 0.0]),
            (2, vec![1.0, 0.0, 0.0]),
        ];
        let ranked = rank_by_similarity(&[0.9, 0.1, 0.0], &candidates, 10).unwrap();
        assert_eq!(ranked, vec![2, 1]);
    }

    #[test]
    fn test_rank_ties_broken_by_ascending_id() {
        // Parallel vectors all score exactly 1.0 against the query.
        let candidates = vec![
            (9, vec![2.0, 0.0]),
            (3, vec![1.0, 0.0]),
            (7, vec![0.5, 0.0]),
        ];
        let ranked = rank_by_similarity(&[1.0, 0.0], &candidates, 10).unwrap();
        assert_eq!(ranked, vec![3, 7, 9]);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let candidates = vec![
            (4, vec![0.2, 0.8]),
            (1, vec![0.8, 0.2]),
            (3, vec![0.5, 0.5]),
        ];
        let first = rank_by_similarity(&[1.0, 0.0], &candidates, 10).unwrap();
        let second = rank_by_similarity(&[1.0, 0.0], &candidates, 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_zero_norm_candidate_sorts_with_orthogonal() {
        let candidates = vec![
            (1, vec![0.0, 0.0]),
            (2, vec![1.0, 0.0]),
            (3, vec![0.0, 1.0]),
        ];
        let ranked = rank_by_similarity(&[1.0, 0.0], &candidates, 10).unwrap();
        // Candidate 2 scores 1.0; candidates 1 (degenerate) and 3
        // (orthogonal) both score 0.0 and fall back to id order.
        assert_eq!(ranked, vec![2, 1, 3]);
    }

    #[test]
    fn test_rank_zero_norm_query_orders_by_id() {
        let candidates = vec![(5, vec![1.0, 0.0]), (2, vec![0.0, 1.0])];
        let ranked = rank_by_similarity(&[0.0, 0.0], &candidates, 10).unwrap();
        assert_eq!(ranked, vec![2, 5]);
    }

    #[test]
    fn test_rank_negative_scores_sort_below_orthogonal() {
        let candidates = vec![(1, vec![-1.0, 0.0]), (2, vec![0.0, 1.0])];
        let ranked = rank_by_similarity(&[1.0, 0.0], &candidates, 10).unwrap();
        assert_eq!(ranked, vec![2, 1]);
    }

    #[test]
    fn test_rank_non_finite_candidates_sort_last() {
        let candidates = vec![
            (1, vec![f32::NAN, 0.0, 0.0]),
            (2, vec![1.0, 0.0, 0.0]),
            (3, vec![f32::INFINITY, 0.0, 0.0]),
            (4, vec![0.0, 0.0, 0.0]),
        ];
        let ranked = rank_by_similarity(&[1.0, 0.0, 0.0], &candidates, 10).unwrap();
        // The exact match leads, the zero-norm candidate scores 0.0, and
        // the NaN and infinite vectors fall to the bottom in id order.
        assert_eq!(ranked, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_rank_nan_candidate_keeps_finite_order() {
        let candidates = vec![
            (1, vec![0.9, 0.1]),
            (2, vec![f32::NAN, 1.0]),
            (3, vec![0.1, 0.9]),
        ];
        let ranked = rank_by_similarity(&[1.0, 0.0], &candidates, 10).unwrap();
        assert_eq!(ranked, vec![1, 3, 2]);
    }

    #[test]
    fn test_rank_nan_query_orders_by_id() {
        let candidates = vec![(5, vec![1.0, 0.0]), (2, vec![0.0, 1.0])];
        let ranked = rank_by_similarity(&[f32::NAN, 0.0], &candidates, 10).unwrap();
        assert_eq!(ranked, vec![2, 5]);
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let candidates: Vec<(i64, Vec<f32>)> =
            (1..=20).map(|id| (id, vec![1.0, 0.0])).collect();
        let ranked = rank_by_similarity(&[1.0, 0.0], &candidates, 5).unwrap();
        assert_eq!(ranked, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_rank_empty_candidates() {
        let ranked = rank_by_similarity(&[1.0, 0.0], &[], 10).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_dimension_mismatch_is_error() {
        let candidates = vec![(1, vec![1.0, 0.0, 0.0])];
        let result = rank_by_similarity(&[1.0, 0.0], &candidates, 10);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
