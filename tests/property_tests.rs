//! Property-based tests for the vector codec and similarity ranking.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Embedding encode/decode round-trips bit-for-bit
//! - Blob length is always four bytes per element
//! - Truncated blobs are always rejected
//! - Ranking is deterministic and bounded by the limit
//! - Score ties resolve by ascending id
//! - Variable extraction deduplicates in order of first appearance

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use promptvault::models::{extract_variables, substitute_variables};
use promptvault::{decode_embedding, encode_embedding, rank_by_similarity};
use proptest::prelude::*;
use std::collections::HashMap;

proptest! {
    /// Property: decoding an encoded vector restores every bit pattern.
    #[test]
    fn prop_codec_round_trips_exactly(vector in prop::collection::vec(any::<f32>(), 0..64)) {
        let blob = encode_embedding(&vector);
        let decoded = decode_embedding(&blob).unwrap();

        prop_assert_eq!(decoded.len(), vector.len());
        for (restored, original) in decoded.iter().zip(&vector) {
            prop_assert_eq!(restored.to_bits(), original.to_bits());
        }
    }

    /// Property: the blob is exactly four bytes per element.
    #[test]
    fn prop_blob_length_is_four_bytes_per_element(
        vector in prop::collection::vec(any::<f32>(), 0..64),
    ) {
        prop_assert_eq!(encode_embedding(&vector).len(), vector.len() * 4);
    }

    /// Property: blobs whose length is not a multiple of four never decode.
    #[test]
    fn prop_truncated_blobs_are_rejected(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assume!(bytes.len() % 4 != 0);
        prop_assert!(decode_embedding(&bytes).is_err());
    }

    /// Property: ranking the same pool twice yields the same order.
    #[test]
    fn prop_ranking_is_deterministic(
        vectors in prop::collection::vec(
            prop::collection::vec(-10.0f32..10.0, 3),
            0..20,
        ),
        query in prop::collection::vec(-10.0f32..10.0, 3),
        limit in 0usize..25,
    ) {
        #[allow(clippy::cast_possible_wrap)]
        let candidates: Vec<(i64, Vec<f32>)> = vectors
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as i64, v))
            .collect();

        let first = rank_by_similarity(&query, &candidates, limit).unwrap();
        let second = rank_by_similarity(&query, &candidates, limit).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), candidates.len().min(limit));
        for id in &first {
            prop_assert!(candidates.iter().any(|(cid, _)| cid == id));
        }
    }

    /// Property: identical vectors tie on score, so ids come back ascending.
    #[test]
    fn prop_score_ties_resolve_by_ascending_id(count in 1usize..20, limit in 1usize..25) {
        #[allow(clippy::cast_possible_wrap)]
        let candidates: Vec<(i64, Vec<f32>)> = (0..count)
            .map(|i| (i as i64, vec![1.0, 0.0, 0.0]))
            .collect();

        let ranked = rank_by_similarity(&[1.0, 0.0, 0.0], &candidates, limit).unwrap();
        #[allow(clippy::cast_possible_wrap)]
        let expected: Vec<i64> = (0..count.min(limit) as i64).collect();
        prop_assert_eq!(ranked, expected);
    }

    /// Property: content without placeholders passes through substitution untouched.
    #[test]
    fn prop_plain_content_is_untouched(content in "[a-zA-Z0-9 .,!?]{0,80}") {
        let mut values = HashMap::new();
        values.insert("anything".to_string(), "value".to_string());
        prop_assert_eq!(substitute_variables(&content, &values), content);
    }

    /// Property: extraction reports each name once, at its first appearance.
    #[test]
    fn prop_extraction_deduplicates_in_order(names in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let mut content = String::new();
        for name in names.iter().chain(names.iter()) {
            content.push_str(&format!("{{{{{name}}}}} and "));
        }

        let mut expected = Vec::new();
        for name in &names {
            if !expected.contains(name) {
                expected.push(name.clone());
            }
        }

        prop_assert_eq!(extract_variables(&content), expected);
    }
}
