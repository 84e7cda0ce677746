//! Data models for promptvault.
//!
//! This module contains the core data structures used throughout the system.

mod prompt;

pub use prompt::{Prompt, PromptSummary, Revision, extract_variables, substitute_variables};
