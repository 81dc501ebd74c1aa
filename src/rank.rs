//! Similarity-ranked retrieval over stored snippets.
//!
//! Scoring is plain cosine similarity between the query vector and each
//! candidate's embedding; it is the sole ranking signal. Ties keep the
//! candidates' original scan order.

use crate::models::{RankedSnippet, StoredSnippet};

/// Score candidates against a query vector and return the top `top_n`
/// by cosine similarity, descending.
///
/// An empty candidate list yields an empty result, the caller's signal for
/// "no knowledge available", not an error. Candidates whose embedding
/// dimensionality differs from the query's score `0.0` and sink to the
/// bottom rather than failing the ranking.
pub fn rank(query_vec: &[f32], candidates: Vec<StoredSnippet>, top_n: usize) -> Vec<RankedSnippet> {
    let mut ranked: Vec<RankedSnippet> = candidates
        .into_iter()
        .map(|snippet| {
            let similarity = cosine_similarity(query_vec, &snippet.embedding) as f64;
            RankedSnippet {
                snippet,
                similarity,
            }
        })
        .collect();

    // Stable sort: equal scores keep scan order.
    ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(top_n);

    ranked
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `0.0` for empty vectors, zero-magnitude vectors, or vectors of
/// different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnippetKind;

    fn make_stored(id: i64, embedding: Vec<f32>) -> StoredSnippet {
        StoredSnippet {
            id,
            file: format!("src/file{id}.js"),
            name: Some(format!("fn{id}")),
            kind: SnippetKind::FunctionDeclaration,
            code: String::new(),
            tags: Vec::new(),
            embedding,
        }
    }

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_empty() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_different_lengths() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_rank_empty_candidates() {
        let result = rank(&[1.0, 0.0], Vec::new(), 5);
        assert!(result.is_empty());
    }

    #[test]
    fn test_rank_orders_descending() {
        let candidates = vec![
            make_stored(1, vec![0.0, 1.0]),
            make_stored(2, vec![1.0, 0.0]),
            make_stored(3, vec![1.0, 1.0]),
        ];
        let result = rank(&[1.0, 0.0], candidates, 5);
        assert_eq!(result.len(), 3);
        let ids: Vec<i64> = result.iter().map(|r| r.snippet.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!((result[0].similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rank_truncates_to_top_n() {
        let candidates = (0..10).map(|i| make_stored(i, vec![1.0, 0.0])).collect();
        let result = rank(&[1.0, 0.0], candidates, 3);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_rank_ties_keep_scan_order() {
        let candidates = vec![
            make_stored(7, vec![1.0, 0.0]),
            make_stored(8, vec![2.0, 0.0]),
            make_stored(9, vec![3.0, 0.0]),
        ];
        let result = rank(&[1.0, 0.0], candidates, 5);
        let ids: Vec<i64> = result.iter().map(|r| r.snippet.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn test_rank_mismatched_dims_score_zero() {
        let candidates = vec![
            make_stored(1, vec![1.0, 0.0, 0.0]),
            make_stored(2, vec![1.0, 0.0]),
        ];
        let result = rank(&[1.0, 0.0], candidates, 5);
        assert_eq!(result[0].snippet.id, 2);
        assert_eq!(result[1].similarity, 0.0);
    }
}
