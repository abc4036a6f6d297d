//! Store error taxonomy.

use crate::domain::{InvalidRecording, ParsePageIdError, TreeError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Page,
    Block,
    Link,
    BlockRef,
    Recording,
    Alignment,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Page => "page",
            Entity::Block => "block",
            Entity::Link => "link",
            Entity::BlockRef => "block reference",
            Entity::Recording => "recording",
            Entity::Alignment => "alignment",
        })
    }
}

/// Coarse classification callers map onto their own responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    PreconditionFailed,
    Validation,
    StorageFailure,
}

/// Errors returned by store operations.
///
/// Any error aborts the whole operation; its transaction is rolled back.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    /// A unique key is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The entity is not in a state that allows the operation.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Conflict(_) => ErrorKind::Conflict,
            StoreError::PreconditionFailed(_) => ErrorKind::PreconditionFailed,
            StoreError::Validation { .. } => ErrorKind::Validation,
            StoreError::Database(_) | StoreError::Io { .. } => ErrorKind::StorageFailure,
        }
    }
}

impl From<TreeError> for StoreError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::UnknownBlock(id) => StoreError::not_found(Entity::Block, id),
            TreeError::OrderTaken(_) => StoreError::Conflict(err.to_string()),
            TreeError::InvalidOrder(_) => StoreError::validation("order", err.to_string()),
            TreeError::FirstSibling(_)
            | TreeError::AlreadyRoot(_)
            | TreeError::Cycle { .. }
            | TreeError::ForeignParent(_) => StoreError::PreconditionFailed(err.to_string()),
        }
    }
}

impl From<ParsePageIdError> for StoreError {
    fn from(err: ParsePageIdError) -> Self {
        StoreError::validation("title", err.to_string())
    }
}

impl From<InvalidRecording> for StoreError {
    fn from(err: InvalidRecording) -> Self {
        StoreError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockId, PageId};
    use pretty_assertions::assert_eq;

    #[test]
    fn tree_errors_map_to_kinds() {
        let id = BlockId::new();
        assert_eq!(
            StoreError::from(TreeError::FirstSibling(id.clone())).kind(),
            ErrorKind::PreconditionFailed
        );
        assert_eq!(
            StoreError::from(TreeError::AlreadyRoot(id.clone())).kind(),
            ErrorKind::PreconditionFailed
        );
        assert_eq!(
            StoreError::from(TreeError::OrderTaken(1.0)).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            StoreError::from(TreeError::UnknownBlock(id)).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn database_errors_are_storage_failures() {
        let err = StoreError::from(rusqlite::Error::InvalidQuery);
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
    }

    #[test]
    fn unresolvable_title_is_validation() {
        let err = StoreError::from(PageId::from_title("!!!").unwrap_err());
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("!!!"));
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = StoreError::not_found(Entity::Recording, "01ABC");
        assert_eq!(err.to_string(), "recording not found: 01ABC");
    }
}
