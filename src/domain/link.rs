//! Link edges from blocks to the pages they reference, and manual
//! references between blocks.

use crate::domain::{BlockId, BlockRefId, LinkId, PageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a link came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Derived from a `[[Page]]` reference in the block's content.
    /// Replaced wholesale whenever the content is reindexed.
    Reference,
    /// Created through the manual link API; survives content edits.
    Explicit,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Reference => "reference",
            LinkKind::Explicit => "explicit",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown link kind.
#[derive(Debug, Clone)]
pub struct ParseLinkKindError(String);

impl fmt::Display for ParseLinkKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown link kind '{}': expected 'reference' or 'explicit'",
            self.0
        )
    }
}

impl std::error::Error for ParseLinkKindError {}

impl FromStr for LinkKind {
    type Err = ParseLinkKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reference" => Ok(LinkKind::Reference),
            "explicit" => Ok(LinkKind::Explicit),
            _ => Err(ParseLinkKindError(s.to_string())),
        }
    }
}

/// A directed edge from a block to a page.
///
/// At most one link exists per `(source_block, target_page)` pair, and a
/// block never links to the page it lives on. `source_page` is the page
/// owning the source block, carried along for page-level graph queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    id: LinkId,
    source_block: BlockId,
    source_page: PageId,
    target_page: PageId,
    kind: LinkKind,
    created: DateTime<Utc>,
}

impl Link {
    pub fn new(
        id: LinkId,
        source_block: BlockId,
        source_page: PageId,
        target_page: PageId,
        kind: LinkKind,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            source_block,
            source_page,
            target_page,
            kind,
            created,
        }
    }

    pub fn id(&self) -> &LinkId {
        &self.id
    }

    /// Returns the block owning this edge.
    pub fn source_block(&self) -> &BlockId {
        &self.source_block
    }

    /// Returns the page containing the source block.
    pub fn source_page(&self) -> &PageId {
        &self.source_page
    }

    pub fn target_page(&self) -> &PageId {
        &self.target_page
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

/// A manual reference from one block to another.
///
/// Unlike [`Link`] it is never derived from content; it exists until it is
/// deleted or either block goes away.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRef {
    pub id: BlockRefId,
    pub source: BlockId,
    pub target: BlockId,
    pub created: DateTime<Utc>,
}
