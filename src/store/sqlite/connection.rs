//! Connection management for SqliteStore.

use super::SqliteStore;
use super::transaction::Transaction;
use crate::infra::{Clock, SystemClock};
use crate::store::{StoreError, StoreResult, create_schema};
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Registers `fold(text)`: Unicode lowercase for case-insensitive matching.
///
/// SQLite's own `lower()` only folds ASCII.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

fn prepare(conn: Connection) -> StoreResult<SqliteStore> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    register_functions(&conn)?;
    create_schema(&conn)?;
    Ok(SqliteStore {
        conn,
        clock: Box::new(SystemClock),
    })
}

impl SqliteStore {
    // ===========================================
    // Opening
    // ===========================================

    /// Opens an in-memory database with the schema in place.
    pub fn open_in_memory() -> StoreResult<Self> {
        prepare(Connection::open_in_memory()?)
    }

    /// Opens or creates a database file, creating parent directories.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!(path = %path.display(), "opening database");
        prepare(Connection::open(path)?)
    }

    /// Replaces the clock used for timestamps and "today".
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ===========================================
    // Accessors
    // ===========================================

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // ===========================================
    // Transaction Support
    // ===========================================

    /// Begins a transaction that rolls back on drop unless committed.
    pub fn transaction(&self) -> StoreResult<Transaction<'_>> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(Transaction::new(&self.conn))
    }
}
