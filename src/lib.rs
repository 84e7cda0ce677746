//! # Promptvault
//!
//! A personal knowledge store for reusable prompt templates.
//!
//! Promptvault keeps titled text templates with `{{variable}}` placeholders,
//! a tag vocabulary, an append-only revision history per prompt, and an
//! optional embedding vector per prompt used for semantic retrieval.
//!
//! ## Features
//!
//! - SQLite-backed relational store with cascading deletes
//! - Append-only revision log recorded on every save
//! - Deduplicated tags with all-or-nothing tag replacement
//! - Exact brute-force cosine ranking over stored embeddings
//! - Additive schema migrations applied at open
//!
//! ## Example
//!
//! ```rust,ignore
//! use promptvault::storage::PromptStore;
//!
//! let store = PromptStore::new("~/.config/promptvault/vault.db")?;
//! let id = store.create_prompt("Greeting", "Hello {{name}}!")?;
//! store.replace_tags(id, &["smalltalk".to_string()])?;
//! let hits = store.search_by_title_or_tag("greet")?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod embedding;
pub mod llm;
pub mod models;
pub mod search;
pub mod storage;
pub mod vector;

// Re-exports for convenience
pub use config::VaultConfig;
pub use embedding::{Embedder, HttpEmbedder};
pub use llm::{ChatProvider, HttpChatClient};
pub use models::{Prompt, PromptSummary, Revision};
pub use search::rank_by_similarity;
pub use storage::PromptStore;
pub use vector::{decode_embedding, encode_embedding};

/// Error type for promptvault operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotFound` | Updating or reading a prompt/revision id that does not exist |
/// | `InvalidInput` | Embedding blob length not a multiple of 4, dimensionality mismatch |
/// | `OperationFailed` | `SQLite` queries fail, config cannot be read, provider API errors |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A referenced record does not exist.
    ///
    /// Raised when:
    /// - `update_prompt` targets a prompt id with no row
    /// - `get_prompt` or `get_revision_content` misses
    ///
    /// Deletes swallow this case and succeed (idempotent delete).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - An embedding blob's byte length is not a multiple of 4
    /// - A written embedding's length differs from the store's established
    ///   dimensionality
    /// - A search query vector's length differs from the candidate vectors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` database operations fail
    /// - Filesystem I/O errors occur
    /// - The config file cannot be read or parsed
    /// - The embeddings or chat API returns a transport or status error
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for promptvault operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Uses `SystemTime::now()` with fallback to 0 if the system clock is before
/// the Unix epoch.
///
/// # Examples
///
/// ```rust
/// use promptvault::current_timestamp;
///
/// let ts = current_timestamp();
/// assert!(ts > 0);
/// ```
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("prompt 42".to_string());
        assert_eq!(err.to_string(), "not found: prompt 42");

        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "test".to_string(),
            cause: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'test' failed: failed");
    }
}
