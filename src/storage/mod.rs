//! Storage layer.
//!
//! A single `SQLite` database holds the relational tables and the embedding
//! blobs. [`PromptStore`] is the one entry point; schema evolution lives in
//! [`migrations`].

// Allow significant_drop_tightening - dropping database connections slightly early
// provides no meaningful benefit.
#![allow(clippy::significant_drop_tightening)]

mod connection;
pub mod migrations;
mod sqlite;

pub use sqlite::PromptStore;
