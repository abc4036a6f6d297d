//! Blocks: units of content nested under a page.

use crate::domain::{BlockId, PageId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A unit of content within a page.
///
/// Structure is entirely the `(parent, order)` pair: `parent == None` means
/// top-level, and `order` sorts the block among siblings that share its
/// page and parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    id: BlockId,
    page_id: PageId,
    parent_id: Option<BlockId>,
    content: String,
    order: f64,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl Block {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BlockId,
        page_id: PageId,
        parent_id: Option<BlockId>,
        content: impl Into<String>,
        order: f64,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            page_id,
            parent_id,
            content: content.into(),
            order,
            created,
            updated,
        }
    }

    /// Returns the block's identifier.
    pub fn id(&self) -> &BlockId {
        &self.id
    }

    /// Returns the owning page.
    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    /// Returns the parent block, or `None` for top-level blocks.
    pub fn parent_id(&self) -> Option<&BlockId> {
        self.parent_id.as_ref()
    }

    /// Returns the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the sibling order key.
    pub fn order(&self) -> f64 {
        self.order
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// True when the block sits directly under its page.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns a copy placed at `(parent, order)`.
    pub fn placed(&self, parent_id: Option<BlockId>, order: f64) -> Self {
        Self {
            parent_id,
            order,
            ..self.clone()
        }
    }
}

/// A partial update to a block.
///
/// `parent` uses a nested option: `Some(None)` moves the block to the top
/// level, `None` leaves the parent untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPatch {
    pub content: Option<String>,
    pub parent: Option<Option<BlockId>>,
    pub order: Option<f64>,
}

impl BlockPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// True when the patch changes the block's position.
    pub fn is_structural(&self) -> bool {
        self.parent.is_some() || self.order.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && !self.is_structural()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-05-18T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample() -> Block {
        Block::new(
            BlockId::new(),
            PageId::from_title("Inbox").unwrap(),
            None,
            "hello",
            0.0,
            at(),
            at(),
        )
    }

    #[test]
    fn new_block_is_root_without_parent() {
        assert!(sample().is_root());
    }

    #[test]
    fn placed_changes_only_position() {
        let block = sample();
        let parent = BlockId::new();
        let moved = block.placed(Some(parent.clone()), 3.5);
        assert_eq!(moved.parent_id(), Some(&parent));
        assert_eq!(moved.order(), 3.5);
        assert_eq!(moved.id(), block.id());
        assert_eq!(moved.content(), "hello");
    }

    #[test]
    fn patch_structural_detection() {
        assert!(!BlockPatch::content("x").is_structural());
        let to_root = BlockPatch {
            parent: Some(None),
            ..BlockPatch::default()
        };
        assert!(to_root.is_structural());
        assert!(BlockPatch::default().is_empty());
    }
}
