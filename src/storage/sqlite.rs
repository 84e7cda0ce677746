//! `SQLite` prompt store.
//!
//! Owns the four relational tables (`prompts`, `prompt_versions`, `tags`,
//! `prompt_tags`) and every operation on them. One logical writer at a time:
//! the connection sits behind a mutex and each mutating operation runs as a
//! single `BEGIN IMMEDIATE` transaction, fully applied or fully rolled back.

use super::connection::{acquire_lock, configure_connection};
use super::migrations::{MIGRATIONS, MigrationRunner};
use crate::models::{Prompt, PromptSummary, Revision};
use crate::vector::{decode_embedding, encode_embedding};
use crate::{Error, Result, current_timestamp, search};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// `SQLite`-backed store for prompts, revisions, and tags.
pub struct PromptStore {
    /// Connection to the `SQLite` database.
    conn: Mutex<Connection>,
    /// Path to the `SQLite` database.
    db_path: PathBuf,
}

impl PromptStore {
    /// Opens (or creates) a store at the given path.
    ///
    /// Parent directories are created as needed. Pending schema migrations
    /// are applied before the store is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, configured, or
    /// migrated.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_store_dir".to_string(),
                cause: e.to_string(),
            })?;
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::OperationFailed {
            operation: "open_store".to_string(),
            cause: e.to_string(),
        })?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        store.initialize()?;
        Ok(store)
    }

    /// Creates an in-memory store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::OperationFailed {
            operation: "open_store_memory".to_string(),
            cause: e.to_string(),
        })?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        };

        store.initialize()?;
        Ok(store)
    }

    /// Returns the default user-scope database path.
    ///
    /// Resolves to `~/.config/promptvault/vault.db` on Unix systems, or the
    /// platform-specific config directory.
    #[must_use]
    pub fn default_user_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|d| d.config_dir().join("promptvault").join("vault.db"))
    }

    /// Returns the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Configures the connection and applies pending migrations.
    fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        configure_connection(&conn)?;
        MigrationRunner::new(&conn).run(MIGRATIONS)
    }

    /// Creates a prompt and its initial revision.
    ///
    /// The prompt starts with a null embedding; the first revision snapshots
    /// the initial content. Both rows land in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_prompt(&self, title: &str, content: &str) -> Result<i64> {
        let conn = acquire_lock(&self.conn);

        conn.execute("BEGIN IMMEDIATE", [])
            .map_err(|e| Error::OperationFailed {
                operation: "begin_transaction".to_string(),
                cause: e.to_string(),
            })?;

        let result = (|| {
            #[allow(clippy::cast_possible_wrap)]
            let now = current_timestamp() as i64;

            conn.execute(
                "INSERT INTO prompts (title, content, updated_at) VALUES (?1, ?2, ?3)",
                params![title, content, now],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "insert_prompt".to_string(),
                cause: e.to_string(),
            })?;

            let id = conn.last_insert_rowid();

            conn.execute(
                "INSERT INTO prompt_versions (prompt_id, content, saved_at) VALUES (?1, ?2, ?3)",
                params![id, content, now],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "insert_initial_revision".to_string(),
                cause: e.to_string(),
            })?;

            Ok(id)
        })();

        finish_transaction(&conn, result.is_ok())?;

        if let Ok(id) = &result {
            tracing::debug!(id, title, "Created prompt");
        }
        result
    }

    /// Overwrites a prompt and appends a revision of the new content.
    ///
    /// Title, content, embedding, and timestamp are all replaced; passing
    /// `None` clears the stored embedding, so callers preserving a vector
    /// must pass the current one back in. Every update appends a revision,
    /// including saves that only change the title.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist, and
    /// [`Error::InvalidInput`] if the embedding's length differs from the
    /// dimensionality established by the other stored vectors. Either way
    /// the row is left untouched.
    pub fn update_prompt(
        &self,
        id: i64,
        title: &str,
        content: &str,
        embedding: Option<&[f32]>,
    ) -> Result<()> {
        let conn = acquire_lock(&self.conn);

        conn.execute("BEGIN IMMEDIATE", [])
            .map_err(|e| Error::OperationFailed {
                operation: "begin_transaction".to_string(),
                cause: e.to_string(),
            })?;

        let result = (|| {
            let exists: Option<i64> = conn
                .query_row("SELECT id FROM prompts WHERE id = ?1", params![id], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(|e| Error::OperationFailed {
                    operation: "check_prompt_exists".to_string(),
                    cause: e.to_string(),
                })?;
            if exists.is_none() {
                return Err(Error::NotFound(format!("prompt {id}")));
            }

            if let Some(vector) = embedding {
                check_pool_dimensions(&conn, id, vector)?;
            }

            #[allow(clippy::cast_possible_wrap)]
            let now = current_timestamp() as i64;
            let blob = embedding.map(encode_embedding);

            conn.execute(
                "UPDATE prompts SET title = ?1, content = ?2, embedding = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![title, content, blob, now, id],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "update_prompt".to_string(),
                cause: e.to_string(),
            })?;

            conn.execute(
                "INSERT INTO prompt_versions (prompt_id, content, saved_at) VALUES (?1, ?2, ?3)",
                params![id, content, now],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "insert_revision".to_string(),
                cause: e.to_string(),
            })?;

            Ok(())
        })();

        finish_transaction(&conn, result.is_ok())?;

        if result.is_ok() {
            tracing::debug!(id, "Updated prompt");
        }
        result
    }

    /// Sets or clears a prompt's embedding without touching its content.
    ///
    /// The revision log records content changes only, so backfilling a
    /// vector after creation or import leaves history and `updated_at`
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist, and
    /// [`Error::InvalidInput`] if the vector's length differs from the
    /// dimensionality established by the other stored vectors.
    pub fn set_embedding(&self, id: i64, embedding: Option<&[f32]>) -> Result<()> {
        let conn = acquire_lock(&self.conn);

        if let Some(vector) = embedding {
            check_pool_dimensions(&conn, id, vector)?;
        }

        let blob = embedding.map(encode_embedding);
        let updated = conn
            .execute(
                "UPDATE prompts SET embedding = ?1 WHERE id = ?2",
                params![blob, id],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "set_embedding".to_string(),
                cause: e.to_string(),
            })?;

        if updated == 0 {
            return Err(Error::NotFound(format!("prompt {id}")));
        }
        Ok(())
    }

    /// Deletes a prompt and, through cascades, its revisions and tag
    /// associations.
    ///
    /// Idempotent: deleting an id that does not exist is not an error.
    /// Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_prompt(&self, id: i64) -> Result<bool> {
        let conn = acquire_lock(&self.conn);

        let deleted = conn
            .execute("DELETE FROM prompts WHERE id = ?1", params![id])
            .map_err(|e| Error::OperationFailed {
                operation: "delete_prompt".to_string(),
                cause: e.to_string(),
            })?;

        if deleted > 0 {
            tracing::debug!(id, "Deleted prompt");
        }
        Ok(deleted > 0)
    }

    /// Finds prompts whose title or any associated tag name contains the
    /// query, case-insensitively.
    ///
    /// Results are deduplicated by prompt id and ordered most recently
    /// updated first. An empty query returns every prompt in the same
    /// order. `%`, `_`, and `\` in the query match literally.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_by_title_or_tag(&self, query: &str) -> Result<Vec<PromptSummary>> {
        let conn = acquire_lock(&self.conn);

        if query.is_empty() {
            let mut stmt = conn
                .prepare("SELECT id, title FROM prompts ORDER BY updated_at DESC")
                .map_err(|e| Error::OperationFailed {
                    operation: "prepare_list_prompts".to_string(),
                    cause: e.to_string(),
                })?;
            let rows = stmt
                .query_map([], summary_from_row)
                .map_err(|e| Error::OperationFailed {
                    operation: "list_prompts".to_string(),
                    cause: e.to_string(),
                })?;
            return collect_summaries(rows);
        }

        let pattern = format!("%{}%", escape_like_wildcards(query));
        let mut stmt = conn
            .prepare(
                "SELECT p.id, p.title
                 FROM prompts p
                 LEFT JOIN prompt_tags pt ON p.id = pt.prompt_id
                 LEFT JOIN tags t ON pt.tag_id = t.id
                 WHERE p.title LIKE ?1 ESCAPE '\\' OR t.name LIKE ?1 ESCAPE '\\'
                 GROUP BY p.id
                 ORDER BY p.updated_at DESC",
            )
            .map_err(|e| Error::OperationFailed {
                operation: "prepare_search_prompts".to_string(),
                cause: e.to_string(),
            })?;
        let rows = stmt
            .query_map(params![pattern], summary_from_row)
            .map_err(|e| Error::OperationFailed {
                operation: "search_prompts".to_string(),
                cause: e.to_string(),
            })?;
        collect_summaries(rows)
    }

    /// Fetches the full record for a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist.
    pub fn get_prompt(&self, id: i64) -> Result<Prompt> {
        let conn = acquire_lock(&self.conn);

        let row = conn
            .query_row(
                "SELECT id, title, content, embedding, updated_at FROM prompts WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<Vec<u8>>>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| Error::OperationFailed {
                operation: "get_prompt".to_string(),
                cause: e.to_string(),
            })?;

        let Some((id, title, content, blob, updated_at)) = row else {
            return Err(Error::NotFound(format!("prompt {id}")));
        };

        let embedding = blob.as_deref().map(decode_embedding).transpose()?;
        #[allow(clippy::cast_sign_loss)]
        let updated_at = updated_at as u64;

        Ok(Prompt {
            id,
            title,
            content,
            embedding,
            updated_at,
        })
    }

    /// Fetches summaries for a list of ids, preserving the caller's order.
    ///
    /// Ids that no longer exist are silently dropped. This is how ranked
    /// search results are materialized without re-sorting by relevance.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_prompts_by_ids(&self, ids: &[i64]) -> Result<Vec<PromptSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = acquire_lock(&self.conn);

        let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!("SELECT id, title FROM prompts WHERE id IN ({placeholders})");

        let mut stmt = conn.prepare(&sql).map_err(|e| Error::OperationFailed {
            operation: "prepare_get_by_ids".to_string(),
            cause: e.to_string(),
        })?;

        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids.iter()), summary_from_row)
            .map_err(|e| Error::OperationFailed {
                operation: "get_by_ids".to_string(),
                cause: e.to_string(),
            })?;

        let mut by_id: HashMap<i64, PromptSummary> = HashMap::new();
        for row in rows {
            let summary = row.map_err(|e| Error::OperationFailed {
                operation: "read_prompt_row".to_string(),
                cause: e.to_string(),
            })?;
            by_id.insert(summary.id, summary);
        }

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Lists a prompt's revisions, most recent first.
    ///
    /// Ordered by save time descending, then id descending so saves landing
    /// in the same second keep append order. A prompt with no rows (deleted
    /// or never created) yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_revisions(&self, prompt_id: i64) -> Result<Vec<Revision>> {
        let conn = acquire_lock(&self.conn);

        let mut stmt = conn
            .prepare(
                "SELECT id, prompt_id, content, saved_at FROM prompt_versions
                 WHERE prompt_id = ?1 ORDER BY saved_at DESC, id DESC",
            )
            .map_err(|e| Error::OperationFailed {
                operation: "prepare_list_revisions".to_string(),
                cause: e.to_string(),
            })?;

        let rows = stmt
            .query_map(params![prompt_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })
            .map_err(|e| Error::OperationFailed {
                operation: "list_revisions".to_string(),
                cause: e.to_string(),
            })?;

        let mut revisions = Vec::new();
        for row in rows {
            let (id, prompt_id, content, saved_at) = row.map_err(|e| Error::OperationFailed {
                operation: "read_revision_row".to_string(),
                cause: e.to_string(),
            })?;
            #[allow(clippy::cast_sign_loss)]
            let saved_at = saved_at as u64;
            revisions.push(Revision {
                id,
                prompt_id,
                content,
                saved_at,
            });
        }

        Ok(revisions)
    }

    /// Fetches the content snapshot of a single revision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the revision id does not exist.
    pub fn get_revision_content(&self, revision_id: i64) -> Result<String> {
        let conn = acquire_lock(&self.conn);

        conn.query_row(
            "SELECT content FROM prompt_versions WHERE id = ?1",
            params![revision_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "get_revision_content".to_string(),
            cause: e.to_string(),
        })?
        .ok_or_else(|| Error::NotFound(format!("revision {revision_id}")))
    }

    /// Looks up a tag id by exact name, inserting the name if absent.
    ///
    /// Idempotent: repeated calls with one name return one id and leave a
    /// single row.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or insert fails.
    pub fn get_or_create_tag_id(&self, name: &str) -> Result<i64> {
        let conn = acquire_lock(&self.conn);
        get_or_create_tag_id(&conn, name)
    }

    /// Replaces a prompt's tag set wholesale.
    ///
    /// The only mutation path for associations: existing rows are deleted
    /// and one association inserted per distinct name, all inside a single
    /// transaction. On any failure the prior associations are restored.
    /// Duplicate names in the input produce one association.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the prompt does not exist.
    pub fn replace_tags(&self, prompt_id: i64, names: &[String]) -> Result<()> {
        let conn = acquire_lock(&self.conn);

        conn.execute("BEGIN IMMEDIATE", [])
            .map_err(|e| Error::OperationFailed {
                operation: "begin_transaction".to_string(),
                cause: e.to_string(),
            })?;

        let result = (|| {
            let exists: Option<i64> = conn
                .query_row(
                    "SELECT id FROM prompts WHERE id = ?1",
                    params![prompt_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| Error::OperationFailed {
                    operation: "check_prompt_exists".to_string(),
                    cause: e.to_string(),
                })?;
            if exists.is_none() {
                return Err(Error::NotFound(format!("prompt {prompt_id}")));
            }

            conn.execute(
                "DELETE FROM prompt_tags WHERE prompt_id = ?1",
                params![prompt_id],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "clear_prompt_tags".to_string(),
                cause: e.to_string(),
            })?;

            let mut seen = HashSet::new();
            for name in names {
                if !seen.insert(name.as_str()) {
                    continue;
                }
                let tag_id = get_or_create_tag_id(&conn, name)?;
                conn.execute(
                    "INSERT INTO prompt_tags (prompt_id, tag_id) VALUES (?1, ?2)",
                    params![prompt_id, tag_id],
                )
                .map_err(|e| Error::OperationFailed {
                    operation: "insert_prompt_tag".to_string(),
                    cause: e.to_string(),
                })?;
            }

            Ok(())
        })();

        finish_transaction(&conn, result.is_ok())?;

        if result.is_ok() {
            tracing::debug!(prompt_id, count = names.len(), "Replaced tags");
        }
        result
    }

    /// Returns the tag names associated with a prompt, sorted by name.
    ///
    /// A prompt with no rows yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_tag_names(&self, prompt_id: i64) -> Result<Vec<String>> {
        let conn = acquire_lock(&self.conn);

        let mut stmt = conn
            .prepare(
                "SELECT t.name FROM tags t
                 JOIN prompt_tags pt ON t.id = pt.tag_id
                 WHERE pt.prompt_id = ?1
                 ORDER BY t.name",
            )
            .map_err(|e| Error::OperationFailed {
                operation: "prepare_get_tag_names".to_string(),
                cause: e.to_string(),
            })?;

        let rows = stmt
            .query_map(params![prompt_id], |row| row.get::<_, String>(0))
            .map_err(|e| Error::OperationFailed {
                operation: "get_tag_names".to_string(),
                cause: e.to_string(),
            })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::OperationFailed {
                operation: "read_tag_row".to_string(),
                cause: e.to_string(),
            })
    }

    /// Ranks stored prompts by cosine similarity to a query vector.
    ///
    /// Loads every prompt with a non-null embedding and delegates to
    /// [`search::rank_by_similarity`]; see there for tie-break and
    /// degenerate-vector semantics. An empty pool yields an empty ranking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the query vector's length differs
    /// from the stored pool's dimensionality.
    pub fn similarity_search(&self, query: &[f32], limit: usize) -> Result<Vec<i64>> {
        let candidates = {
            let conn = acquire_lock(&self.conn);

            let mut stmt = conn
                .prepare("SELECT id, embedding FROM prompts WHERE embedding IS NOT NULL")
                .map_err(|e| Error::OperationFailed {
                    operation: "prepare_load_embeddings".to_string(),
                    cause: e.to_string(),
                })?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?))
                })
                .map_err(|e| Error::OperationFailed {
                    operation: "load_embeddings".to_string(),
                    cause: e.to_string(),
                })?;

            let mut candidates = Vec::new();
            for row in rows {
                let (id, blob) = row.map_err(|e| Error::OperationFailed {
                    operation: "read_embedding_row".to_string(),
                    cause: e.to_string(),
                })?;
                candidates.push((id, decode_embedding(&blob)?));
            }
            candidates
        };

        search::rank_by_similarity(query, &candidates, limit)
    }
}

/// Commits on success, rolls back otherwise.
fn finish_transaction(conn: &Connection, ok: bool) -> Result<()> {
    if ok {
        conn.execute("COMMIT", [])
            .map_err(|e| Error::OperationFailed {
                operation: "commit_transaction".to_string(),
                cause: e.to_string(),
            })?;
    } else {
        let _ = conn.execute("ROLLBACK", []);
    }
    Ok(())
}

/// Looks up or inserts a tag by exact name on an already-locked connection.
///
/// Callers inside a transaction share its atomicity; standalone calls are a
/// single-statement pair and need no explicit transaction under the store's
/// one-writer model.
fn get_or_create_tag_id(conn: &Connection, name: &str) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM tags WHERE name = ?1", params![name], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "lookup_tag".to_string(),
            cause: e.to_string(),
        })?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute("INSERT INTO tags (name) VALUES (?1)", params![name])
        .map_err(|e| Error::OperationFailed {
            operation: "insert_tag".to_string(),
            cause: e.to_string(),
        })?;

    Ok(conn.last_insert_rowid())
}

/// Rejects an embedding whose length differs from the pool's.
///
/// The pool dimensionality is the length of any stored vector on another
/// prompt; the row being overwritten does not count against itself, so the
/// sole embedded prompt may change size.
fn check_pool_dimensions(conn: &Connection, id: i64, vector: &[f32]) -> Result<()> {
    let established: Option<i64> = conn
        .query_row(
            "SELECT LENGTH(embedding) FROM prompts
             WHERE embedding IS NOT NULL AND id != ?1 LIMIT 1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "check_pool_dimensions".to_string(),
            cause: e.to_string(),
        })?;

    if let Some(bytes) = established {
        #[allow(clippy::cast_sign_loss)]
        let dimensions = bytes as usize / 4;
        if vector.len() != dimensions {
            return Err(Error::InvalidInput(format!(
                "Embedding dimension mismatch: expected {dimensions}, got {}",
                vector.len()
            )));
        }
    }

    Ok(())
}

/// Maps a (id, title) row to a summary.
fn summary_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PromptSummary> {
    Ok(PromptSummary {
        id: row.get(0)?,
        title: row.get(1)?,
    })
}

/// Drains a row iterator into summaries.
fn collect_summaries<I>(rows: I) -> Result<Vec<PromptSummary>>
where
    I: Iterator<Item = rusqlite::Result<PromptSummary>>,
{
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::OperationFailed {
            operation: "read_prompt_row".to_string(),
            cause: e.to_string(),
        })
}

/// Escapes SQL LIKE wildcards in a string.
///
/// `SQLite` LIKE patterns treat `%` as "any characters" and `_` as "single
/// character". User input containing these characters must match literally.
/// Uses `\` as the escape character (requires `ESCAPE '\'` in LIKE clause).
fn escape_like_wildcards(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' | '_' | '\\' => {
                result.push('\\');
                result.push(c);
            },
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn store() -> PromptStore {
        PromptStore::in_memory().unwrap()
    }

    fn count_rows(store: &PromptStore, sql: &str, id: i64) -> i64 {
        let conn = acquire_lock(&store.conn);
        conn.query_row(sql, params![id], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_create_assigns_distinct_ids() {
        let store = store();
        let a = store.create_prompt("First", "one").unwrap();
        let b = store.create_prompt("Second", "two").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_create_appends_initial_revision() {
        let store = store();
        let id = store.create_prompt("Title", "initial body").unwrap();

        let revisions = store.list_revisions(id).unwrap();
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].content, "initial body");
        assert_eq!(revisions[0].prompt_id, id);
    }

    #[test]
    fn test_get_prompt_round_trip() {
        let store = store();
        let id = store.create_prompt("Title", "body").unwrap();

        let prompt = store.get_prompt(id).unwrap();
        assert_eq!(prompt.id, id);
        assert_eq!(prompt.title, "Title");
        assert_eq!(prompt.content, "body");
        assert!(prompt.embedding.is_none());
        assert!(prompt.updated_at > 0);
    }

    #[test]
    fn test_get_prompt_not_found() {
        let store = store();
        let result = store.get_prompt(999);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_update_overwrites_and_appends_revision() {
        let store = store();
        let id = store.create_prompt("Title", "A").unwrap();

        store
            .update_prompt(id, "Title 2", "B", Some(&[1.0, 0.0]))
            .unwrap();

        let prompt = store.get_prompt(id).unwrap();
        assert_eq!(prompt.title, "Title 2");
        assert_eq!(prompt.content, "B");
        assert_eq!(prompt.embedding, Some(vec![1.0, 0.0]));

        let revisions = store.list_revisions(id).unwrap();
        assert_eq!(revisions.len(), 2);
    }

    #[test]
    fn test_update_appends_revision_for_title_only_save() {
        let store = store();
        let id = store.create_prompt("Old title", "same body").unwrap();

        store
            .update_prompt(id, "New title", "same body", None)
            .unwrap();

        let revisions = store.list_revisions(id).unwrap();
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0].content, "same body");
    }

    #[test]
    fn test_update_none_clears_embedding() {
        let store = store();
        let id = store.create_prompt("T", "a").unwrap();
        store.update_prompt(id, "T", "a", Some(&[0.5, 0.5])).unwrap();

        store.update_prompt(id, "T", "b", None).unwrap();

        assert!(store.get_prompt(id).unwrap().embedding.is_none());
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let store = store();
        let result = store.update_prompt(42, "T", "c", None);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_update_rejects_mismatched_dimensions() {
        let store = store();
        let a = store.create_prompt("A", "a").unwrap();
        let b = store.create_prompt("B", "b").unwrap();
        store
            .update_prompt(a, "A", "a", Some(&[1.0, 0.0, 0.0]))
            .unwrap();

        let result = store.update_prompt(b, "B changed", "b changed", Some(&[1.0, 0.0]));
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // The rejected update left the row and its revision log untouched.
        let prompt = store.get_prompt(b).unwrap();
        assert_eq!(prompt.title, "B");
        assert_eq!(prompt.content, "b");
        assert_eq!(store.list_revisions(b).unwrap().len(), 1);
    }

    #[test]
    fn test_sole_embedded_prompt_may_change_dimensions() {
        let store = store();
        let id = store.create_prompt("A", "a").unwrap();
        store
            .update_prompt(id, "A", "a", Some(&[1.0, 0.0, 0.0]))
            .unwrap();

        store.update_prompt(id, "A", "a", Some(&[1.0, 0.0])).unwrap();

        assert_eq!(
            store.get_prompt(id).unwrap().embedding,
            Some(vec![1.0, 0.0])
        );
    }

    #[test]
    fn test_set_embedding_leaves_history_alone() {
        let store = store();
        let id = store.create_prompt("T", "body").unwrap();

        store.set_embedding(id, Some(&[0.1, 0.2])).unwrap();

        assert_eq!(store.get_prompt(id).unwrap().embedding, Some(vec![0.1, 0.2]));
        assert_eq!(store.list_revisions(id).unwrap().len(), 1);

        store.set_embedding(id, None).unwrap();
        assert!(store.get_prompt(id).unwrap().embedding.is_none());
    }

    #[test]
    fn test_set_embedding_rejects_mismatched_dimensions() {
        let store = store();
        let a = store.create_prompt("A", "a").unwrap();
        let b = store.create_prompt("B", "b").unwrap();
        store.set_embedding(a, Some(&[1.0, 0.0, 0.0])).unwrap();

        let result = store.set_embedding(b, Some(&[1.0, 0.0]));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_set_embedding_missing_prompt_is_not_found() {
        let store = store();
        let result = store.set_embedding(404, Some(&[1.0]));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = store();
        let id = store.create_prompt("T", "c").unwrap();

        assert!(store.delete_prompt(id).unwrap());
        assert!(!store.delete_prompt(id).unwrap());
        assert!(!store.delete_prompt(9999).unwrap());
    }

    #[test]
    fn test_delete_cascades_to_revisions_and_tags() {
        let store = store();
        let id = store.create_prompt("T", "c").unwrap();
        store.update_prompt(id, "T", "c2", None).unwrap();
        store
            .replace_tags(id, &["alpha".to_string(), "beta".to_string()])
            .unwrap();

        store.delete_prompt(id).unwrap();

        assert!(store.list_revisions(id).unwrap().is_empty());
        assert!(store.get_tag_names(id).unwrap().is_empty());
        assert_eq!(
            count_rows(
                &store,
                "SELECT COUNT(*) FROM prompt_tags WHERE prompt_id = ?1",
                id
            ),
            0
        );
        assert_eq!(
            count_rows(
                &store,
                "SELECT COUNT(*) FROM prompt_versions WHERE prompt_id = ?1",
                id
            ),
            0
        );

        // Orphan tags stay in the vocabulary.
        assert!(store.get_or_create_tag_id("alpha").is_ok());
    }

    #[test]
    fn test_search_matches_title_case_insensitive() {
        let store = store();
        store.create_prompt("Code Review Checklist", "c").unwrap();
        store.create_prompt("Daily Standup", "c").unwrap();

        let hits = store.search_by_title_or_tag("review").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Code Review Checklist");
    }

    #[test]
    fn test_search_matches_tag_name() {
        let store = store();
        let id = store.create_prompt("Untitled", "c").unwrap();
        store.create_prompt("Other", "c").unwrap();
        store.replace_tags(id, &["rust".to_string()]).unwrap();

        let hits = store.search_by_title_or_tag("rus").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, id);
    }

    #[test]
    fn test_search_deduplicates_title_and_tag_match() {
        let store = store();
        let id = store.create_prompt("rust tips", "c").unwrap();
        store.replace_tags(id, &["rust".to_string()]).unwrap();

        let hits = store.search_by_title_or_tag("rust").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_search_empty_query_returns_all() {
        let store = store();
        store.create_prompt("One", "c").unwrap();
        store.create_prompt("Two", "c").unwrap();

        let hits = store.search_by_title_or_tag("").unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let store = store();
        store.create_prompt("One", "c").unwrap();
        assert!(store.search_by_title_or_tag("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_search_wildcards_match_literally() {
        let store = store();
        store.create_prompt("100% coverage", "c").unwrap();
        store.create_prompt("100x speedup", "c").unwrap();

        let hits = store.search_by_title_or_tag("100%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "100% coverage");

        let hits = store.search_by_title_or_tag("_").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_get_prompts_by_ids_preserves_caller_order() {
        let store = store();
        // Insertion order differs from the lookup order on purpose.
        let ids: Vec<i64> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|t| store.create_prompt(t, "c").unwrap())
            .collect();

        let request = vec![ids[4], ids[1], ids[3]];
        let hits = store.get_prompts_by_ids(&request).unwrap();
        let got: Vec<i64> = hits.iter().map(|p| p.id).collect();
        assert_eq!(got, request);
        assert_eq!(hits[0].title, "E");
        assert_eq!(hits[1].title, "B");
        assert_eq!(hits[2].title, "D");
    }

    #[test]
    fn test_get_prompts_by_ids_drops_missing() {
        let store = store();
        let id = store.create_prompt("Only", "c").unwrap();

        let hits = store.get_prompts_by_ids(&[777, id, 888]).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, id);
    }

    #[test]
    fn test_get_prompts_by_ids_empty_input() {
        let store = store();
        assert!(store.get_prompts_by_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_revision_history_most_recent_first() {
        let store = store();
        let id = store.create_prompt("T", "A").unwrap();
        store.update_prompt(id, "T", "B", None).unwrap();
        store.update_prompt(id, "T", "C", None).unwrap();

        let revisions = store.list_revisions(id).unwrap();
        let contents: Vec<&str> = revisions.iter().map(|r| r.content.as_str()).collect();
        // Saves land within the same second here, so this also exercises
        // the id tie-break.
        assert_eq!(contents, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_get_revision_content() {
        let store = store();
        let id = store.create_prompt("T", "original").unwrap();
        let revisions = store.list_revisions(id).unwrap();

        let content = store.get_revision_content(revisions[0].id).unwrap();
        assert_eq!(content, "original");
    }

    #[test]
    fn test_get_revision_content_not_found() {
        let store = store();
        let result = store.get_revision_content(12345);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_restore_appends_rather_than_rewinds() {
        let store = store();
        let id = store.create_prompt("T", "A").unwrap();
        store.update_prompt(id, "T", "B", None).unwrap();

        // Read-then-write restore of the oldest snapshot.
        let oldest = store.list_revisions(id).unwrap().pop().unwrap();
        let content = store.get_revision_content(oldest.id).unwrap();
        store.update_prompt(id, "T", &content, None).unwrap();

        let contents: Vec<String> = store
            .list_revisions(id)
            .unwrap()
            .into_iter()
            .map(|r| r.content)
            .collect();
        assert_eq!(contents, vec!["A", "B", "A"]);
        assert_eq!(store.get_prompt(id).unwrap().content, "A");
    }

    #[test]
    fn test_tag_creation_is_idempotent() {
        let store = store();
        let first = store.get_or_create_tag_id("foo").unwrap();
        let second = store.get_or_create_tag_id("foo").unwrap();
        assert_eq!(first, second);

        let conn = acquire_lock(&store.conn);
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM tags WHERE name = 'foo'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_tag_names_are_case_sensitive() {
        let store = store();
        let lower = store.get_or_create_tag_id("rust").unwrap();
        let upper = store.get_or_create_tag_id("Rust").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_replace_tags_swaps_set() {
        let store = store();
        let id = store.create_prompt("T", "c").unwrap();

        store
            .replace_tags(id, &["old".to_string(), "shared".to_string()])
            .unwrap();
        store
            .replace_tags(id, &["shared".to_string(), "new".to_string()])
            .unwrap();

        assert_eq!(store.get_tag_names(id).unwrap(), vec!["new", "shared"]);
    }

    #[test]
    fn test_replace_tags_deduplicates_input() {
        let store = store();
        let id = store.create_prompt("T", "c").unwrap();

        store
            .replace_tags(id, &["dup".to_string(), "dup".to_string()])
            .unwrap();

        assert_eq!(store.get_tag_names(id).unwrap(), vec!["dup"]);
        assert_eq!(
            count_rows(
                &store,
                "SELECT COUNT(*) FROM prompt_tags WHERE prompt_id = ?1",
                id
            ),
            1
        );
    }

    #[test]
    fn test_replace_tags_with_empty_set_clears() {
        let store = store();
        let id = store.create_prompt("T", "c").unwrap();
        store.replace_tags(id, &["a".to_string()]).unwrap();

        store.replace_tags(id, &[]).unwrap();

        assert!(store.get_tag_names(id).unwrap().is_empty());
    }

    #[test]
    fn test_replace_tags_missing_prompt_is_not_found() {
        let store = store();
        let result = store.replace_tags(404, &["a".to_string()]);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_similarity_search_ranks_closest_first() {
        let store = store();
        let greeting = store.create_prompt("Greeting", "Hello {{name}}").unwrap();
        let farewell = store.create_prompt("Farewell", "Bye {{name}}").unwrap();
        store
            .update_prompt(greeting, "Greeting", "Hello {{name}}", Some(&[1.0, 0.0, 0.0]))
            .unwrap();
        store
            .update_prompt(farewell, "Farewell", "Bye {{name}}", Some(&[0.0, 1.0, 0.0]))
            .unwrap();

        let ranked = store.similarity_search(&[0.9, 0.1, 0.0], 10).unwrap();
        assert_eq!(ranked, vec![greeting, farewell]);
    }

    #[test]
    fn test_similarity_search_ranks_nan_vectors_last() {
        let store = store();
        let poisoned = store.create_prompt("Poisoned", "a").unwrap();
        let exact = store.create_prompt("Exact", "b").unwrap();
        store
            .set_embedding(poisoned, Some(&[f32::NAN, 0.0, 0.0]))
            .unwrap();
        store.set_embedding(exact, Some(&[1.0, 0.0, 0.0])).unwrap();

        let ranked = store.similarity_search(&[1.0, 0.0, 0.0], 10).unwrap();
        assert_eq!(ranked, vec![exact, poisoned]);
    }

    #[test]
    fn test_similarity_search_empty_pool() {
        let store = store();
        store.create_prompt("No vector", "c").unwrap();
        let ranked = store.similarity_search(&[1.0, 0.0], 10).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_similarity_search_query_dimension_mismatch() {
        let store = store();
        let id = store.create_prompt("T", "c").unwrap();
        store
            .update_prompt(id, "T", "c", Some(&[1.0, 0.0, 0.0]))
            .unwrap();

        let result = store.similarity_search(&[1.0, 0.0], 10);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_on_disk_store_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("vault.db");

        let id = {
            let store = PromptStore::new(&path).unwrap();
            let id = store.create_prompt("Persisted", "body").unwrap();
            store.replace_tags(id, &["keep".to_string()]).unwrap();
            id
        };

        let store = PromptStore::new(&path).unwrap();
        let prompt = store.get_prompt(id).unwrap();
        assert_eq!(prompt.title, "Persisted");
        assert_eq!(store.get_tag_names(id).unwrap(), vec!["keep"]);
    }
}
