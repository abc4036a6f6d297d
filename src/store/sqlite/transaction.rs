//! RAII-based transaction support for SQLite.

use crate::store::StoreResult;
use rusqlite::Connection;

/// A database transaction with RAII-based automatic rollback.
///
/// Dropping the transaction without calling `commit()` rolls it back, so
/// an early `?` return undoes every write made through it.
pub struct Transaction<'a> {
    conn: &'a Connection,
    finished: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            finished: false,
        }
    }

    /// Returns the connection the transaction runs on.
    pub(crate) fn conn(&self) -> &'a Connection {
        self.conn
    }

    /// Commits the transaction.
    pub fn commit(mut self) -> StoreResult<()> {
        self.conn.execute_batch("COMMIT")?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            // Errors cannot surface from drop
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}
