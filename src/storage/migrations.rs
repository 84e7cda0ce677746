//! Additive schema migrations for the `SQLite` store.
//!
//! Schema changes are versioned steps applied in order at open and recorded
//! in `schema_migrations`. A database created by an older build is upgraded
//! in place; nothing is ever dropped. Version 1 predates embeddings, so a
//! store from before the semantic-search column gains it through the version
//! 2 step with all rows intact.

use crate::{Error, Result, current_timestamp};
use rusqlite::{Connection, params};

/// A single migration with version and SQL.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Migration version (sequential, starting at 1).
    pub version: i32,
    /// Human-readable description.
    pub description: &'static str,
    /// SQL to apply (may contain multiple statements separated by semicolons).
    pub sql: &'static str,
}

/// The store schema, one additive step per version.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "base tables for prompts, revisions, and tags",
        sql: "
            CREATE TABLE IF NOT EXISTS prompts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS prompt_versions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                prompt_id INTEGER NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
                content TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS prompt_tags (
                prompt_id INTEGER NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_prompt_versions_prompt ON prompt_versions(prompt_id);
            CREATE INDEX IF NOT EXISTS idx_prompt_tags_prompt ON prompt_tags(prompt_id);
            CREATE INDEX IF NOT EXISTS idx_prompt_tags_tag ON prompt_tags(tag_id)
        ",
    },
    Migration {
        version: 2,
        description: "embedding column on prompts",
        sql: "ALTER TABLE prompts ADD COLUMN embedding BLOB",
    },
];

/// Runs migrations on a `SQLite` connection.
pub struct MigrationRunner<'a> {
    conn: &'a Connection,
}

impl<'a> MigrationRunner<'a> {
    /// Creates a new migration runner.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Runs all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails. A failed migration is rolled
    /// back whole, leaving the database at the previous version.
    pub fn run(&self, migrations: &[Migration]) -> Result<()> {
        self.ensure_migrations_table()?;

        let current_version = self.get_current_version()?;

        for migration in migrations {
            if migration.version > current_version {
                self.apply_migration(migration)?;
            }
        }

        Ok(())
    }

    /// Returns the current schema version (0 for a fresh database).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn current_version(&self) -> Result<i32> {
        let exists: bool = self
            .conn
            .query_row(
                "SELECT EXISTS (
                    SELECT 1 FROM sqlite_master
                    WHERE type = 'table' AND name = 'schema_migrations'
                )",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::OperationFailed {
                operation: "check_migrations_table".to_string(),
                cause: e.to_string(),
            })?;

        if !exists {
            return Ok(0);
        }

        self.get_current_version()
    }

    /// Ensures the `schema_migrations` table exists.
    fn ensure_migrations_table(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS schema_migrations (
                    version INTEGER PRIMARY KEY,
                    description TEXT NOT NULL,
                    applied_at INTEGER NOT NULL
                )",
                [],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "create_migrations_table".to_string(),
                cause: e.to_string(),
            })?;

        Ok(())
    }

    /// Gets the current schema version.
    fn get_current_version(&self) -> Result<i32> {
        self.conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::OperationFailed {
                operation: "get_schema_version".to_string(),
                cause: e.to_string(),
            })
    }

    /// Applies a single migration within a transaction.
    ///
    /// All migration statements and the version record execute within one
    /// transaction. If any statement fails, the entire migration is rolled
    /// back, so the database never holds a partial schema update.
    fn apply_migration(&self, migration: &Migration) -> Result<()> {
        self.conn
            .execute("BEGIN IMMEDIATE", [])
            .map_err(|e| Error::OperationFailed {
                operation: format!("migration_v{}_begin", migration.version),
                cause: e.to_string(),
            })?;

        let result = (|| {
            for statement in migration.sql.split(';') {
                let statement = statement.trim();
                if statement.is_empty() {
                    continue;
                }

                self.conn
                    .execute(statement, [])
                    .map_err(|e| Error::OperationFailed {
                        operation: format!(
                            "migration_v{}: {}",
                            migration.version, migration.description
                        ),
                        cause: e.to_string(),
                    })?;
            }

            #[allow(clippy::cast_possible_wrap)]
            let applied_at = current_timestamp() as i64;
            self.conn
                .execute(
                    "INSERT INTO schema_migrations (version, description, applied_at)
                     VALUES (?1, ?2, ?3)",
                    params![migration.version, migration.description, applied_at],
                )
                .map_err(|e| Error::OperationFailed {
                    operation: "record_migration".to_string(),
                    cause: e.to_string(),
                })?;

            Ok(())
        })();

        if result.is_ok() {
            self.conn
                .execute("COMMIT", [])
                .map_err(|e| Error::OperationFailed {
                    operation: format!("migration_v{}_commit", migration.version),
                    cause: e.to_string(),
                })?;
        } else {
            let _ = self.conn.execute("ROLLBACK", []);
        }

        result?;

        tracing::info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );

        Ok(())
    }
}
