//! Embedding vector codec.
//!
//! Stored embeddings are contiguous little-endian IEEE-754 single-precision
//! arrays with no header. Dimensionality is not self-describing; the store
//! guarantees every persisted vector shares one dimensionality.

use crate::{Error, Result};

/// Encodes a float vector into its on-disk BLOB form.
///
/// Produces `4 × vector.len()` bytes, little-endian, no length prefix. No
/// compression or quantization is applied; precision is full float32.
#[must_use]
pub fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decodes an on-disk BLOB back into a float vector.
///
/// Exact inverse of [`encode_embedding`]: `decode(encode(v)) == v`
/// element-wise for every finite `v`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the byte length is not a multiple of 4.
pub fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::InvalidInput(format!(
            "embedding blob length {} is not a multiple of 4",
            bytes.len()
        )));
    }

    let mut vector = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        vector.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use test_case::test_case;

    #[test]
    fn test_encode_produces_four_bytes_per_element() {
        let blob = encode_embedding(&[1.0, -2.5, 0.0]);
        assert_eq!(blob.len(), 12);
    }

    #[test]
    fn test_encode_is_little_endian() {
        let blob = encode_embedding(&[1.0]);
        assert_eq!(blob, vec![0x00, 0x00, 0x80, 0x3f]);
    }

    #[test]
    fn test_round_trip_exact() {
        let vector = vec![0.0, 1.0, -1.0, 0.5, -0.25, 3.141_592_7, f32::MIN, f32::MAX];
        let decoded = decode_embedding(&encode_embedding(&vector)).unwrap();
        assert_eq!(decoded, vector);
    }

    #[test]
    fn test_round_trip_empty() {
        let decoded = decode_embedding(&encode_embedding(&[])).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_empty_blob() {
        let decoded = decode_embedding(&[]).unwrap();
        assert!(decoded.is_empty());
    }

    #[test_case(1)]
    #[test_case(2)]
    #[test_case(3)]
    #[test_case(5)]
    #[test_case(7)]
    fn test_decode_rejects_truncated_blob(len: usize) {
        let result = decode_embedding(&vec![0u8; len]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_decode_error_names_length() {
        let err = decode_embedding(&[0u8; 7]).unwrap_err();
        assert!(err.to_string().contains('7'));
    }
}
