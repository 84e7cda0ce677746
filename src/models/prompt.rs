//! Prompt, revision, and template variable models.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;
use std::sync::LazyLock;

/// Creates a compile-time verified regex wrapped in [`LazyLock`].
///
/// # Safety
///
/// The regex pattern is verified at compile time and cannot fail at runtime.
/// The `unreachable!()` branch exists only for type checking.
macro_rules! lazy_regex {
    ($pattern:expr) => {
        LazyLock::new(|| Regex::new($pattern).unwrap_or_else(|_| unreachable!()))
    };
}

/// Regex pattern for template variables: `{{variable_name}}`.
static VARIABLE_PATTERN: LazyLock<Regex> = lazy_regex!(r"\{\{(\w+)\}\}");

/// A stored prompt template.
///
/// The root of the aggregate: revisions and tag associations belong to a
/// prompt and are deleted with it. The embedding is absent until first
/// computed by an external provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Store-assigned identity.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Template body, may contain `{{variable}}` placeholders.
    pub content: String,
    /// Optional embedding vector; all stored vectors share one length.
    pub embedding: Option<Vec<f32>>,
    /// Last update timestamp (Unix epoch seconds).
    pub updated_at: u64,
}

/// A listing row returned by title/tag search and batch lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSummary {
    /// Store-assigned identity.
    pub id: i64,
    /// Display title.
    pub title: String,
}

/// An immutable snapshot of a prompt's content.
///
/// Appended on every save of the owning prompt and never modified; the
/// revision log only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Store-assigned identity.
    pub id: i64,
    /// Owning prompt id.
    pub prompt_id: i64,
    /// Content snapshot at save time.
    pub content: String,
    /// Save timestamp (Unix epoch seconds).
    pub saved_at: u64,
}

/// Extracts variable names from template content.
///
/// Variables are identified by the pattern `{{variable_name}}` where
/// `variable_name` consists of alphanumeric characters and underscores.
///
/// # Returns
///
/// Names in order of first appearance, deduplicated.
#[must_use]
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();

    for cap in VARIABLE_PATTERN.captures_iter(content) {
        if let Some(name_match) = cap.get(1) {
            let name = name_match.as_str().to_string();
            if seen.insert(name.clone()) {
                variables.push(name);
            }
        }
    }

    variables
}

/// Substitutes variables in template content.
///
/// Every `{{name}}` occurrence with a value in `values` is replaced;
/// placeholders without a value are left intact so the caller can report
/// them (see [`extract_variables`]).
#[must_use]
pub fn substitute_variables<S: BuildHasher>(
    content: &str,
    values: &HashMap<String, String, S>,
) -> String {
    VARIABLE_PATTERN
        .replace_all(content, |caps: &regex::Captures| {
            caps.get(1)
                .and_then(|m| values.get(m.as_str()))
                .map_or_else(|| caps[0].to_string(), String::clone)
        })
        .into_owned()
}
