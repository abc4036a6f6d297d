//! SQLite-backed store implementation.
//!
//! Every public operation runs in a single transaction. Internal helpers
//! take a `&Connection` and never open transactions of their own, so they
//! compose inside whichever operation calls them.

mod audio;
mod block_refs;
mod blocks;
mod connection;
mod links;
mod pages;
mod rows;
mod transaction;


use crate::infra::Clock;
use rusqlite::Connection;

pub use transaction::Transaction;

// ===========================================
// SqliteStore Struct
// ===========================================

/// SQLite-backed outline store.
///
/// Implements the page, block, link, block reference and audio
/// repositories over one connection. Timestamps come from the configured
/// [`Clock`].
pub struct SqliteStore {
    pub(crate) conn: Connection,
    clock: Box<dyn Clock>,
}
