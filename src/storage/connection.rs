//! Shared connection handling for the `SQLite` store.
//!
//! Provides mutex handling with poison recovery and connection pragma
//! configuration.

use crate::{Error, Result};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};

/// Helper to acquire the connection lock with poison recovery.
///
/// If the mutex is poisoned (a panic in a previous critical section), the
/// inner value is recovered and a warning is logged. The connection state
/// itself stays valid because every statement either committed or rolled
/// back before the panic propagated.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            poisoned.into_inner()
        },
    }
}

/// Configures a `SQLite` connection for this store.
///
/// # Configuration Applied
///
/// - **WAL mode**: Write-Ahead Logging for better concurrent read performance
/// - **NORMAL synchronous**: balances durability with performance
/// - **`busy_timeout`**: 5-second timeout to handle lock contention gracefully
/// - **`foreign_keys`**: enforced, required for cascading deletes of
///   revisions and tag associations
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if foreign key enforcement cannot be
/// enabled. The performance pragmas are best-effort: `journal_mode` returns
/// a string result that would trip `execute_batch`, so their results are
/// ignored.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    let _ = conn.pragma_update(None, "busy_timeout", "5000");

    // Cascading deletes depend on this pragma; it is per-connection and off
    // by default in SQLite.
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| Error::OperationFailed {
            operation: "enable_foreign_keys".to_string(),
            cause: e.to_string(),
        })?;

    Ok(())
}
