//! Persistent storage: repository traits and the SQLite implementation

mod error;
mod repository;
mod schema;
mod sqlite;

pub use error::{Entity, ErrorKind, StoreError, StoreResult};
pub use repository::{
    AudioRepository, BlockRefRepository, BlockRepository, DeleteSummary, LinkRepository,
    LinkedReference, PageRepository, ReindexOutcome,
};
pub use schema::{SCHEMA_VERSION, create_schema, get_schema_version};
pub use sqlite::{SqliteStore, Transaction};
