//! Repository traits and result types.

use crate::domain::{
    AlignmentEntry, AlignmentId, Block, BlockId, BlockPatch, BlockRef, BlockRefId, BlockTree, Link,
    LinkId, NewRecording, Page, PageGraph, PageId, Recording, RecordingId, RecordingPatch,
};
use crate::store::StoreResult;
use chrono::NaiveDate;
use serde::Serialize;

/// A link seen from its target: the referencing block and its page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedReference {
    pub link: Link,
    pub block: Block,
    pub page: Page,
}

/// Rows removed by a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub blocks: usize,
    pub links: usize,
    pub block_refs: usize,
    pub alignments: usize,
}

impl std::ops::AddAssign for DeleteSummary {
    fn add_assign(&mut self, other: Self) {
        self.blocks += other.blocks;
        self.links += other.links;
        self.block_refs += other.block_refs;
        self.alignments += other.alignments;
    }
}

/// Result of recomputing a block's reference links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReindexOutcome {
    /// Distinct pages the block now references, in order of first mention.
    pub targets: Vec<PageId>,
    /// Pages created because a reference named them for the first time.
    pub created_pages: Vec<PageId>,
}

/// Page registry, daily notes and page-level queries.
pub trait PageRepository {
    /// Returns the page `name` resolves to, creating it if needed.
    ///
    /// Lookup goes by page key first, then by exact title, so daily notes
    /// are found by their display title.
    fn get_or_create_page(&mut self, name: &str) -> StoreResult<Page>;

    /// Creates a page, failing with `Conflict` if the title is taken.
    fn create_page(&mut self, title: &str) -> StoreResult<Page>;

    fn get_page(&self, id: &PageId) -> StoreResult<Option<Page>>;

    /// Resolves a page by key or exact title without creating it.
    fn find_page(&self, name: &str) -> StoreResult<Option<Page>>;

    /// Changes a regular page's title. The id stays stable.
    fn rename_page(&mut self, id: &PageId, title: &str) -> StoreResult<Page>;

    /// Deletes a page with its blocks, their links and alignment entries,
    /// and every link pointing at it.
    fn delete_page(&mut self, id: &PageId) -> StoreResult<DeleteSummary>;

    /// Lists pages, most recently updated first, optionally filtered by a
    /// case-insensitive title substring.
    fn list_pages(&self, filter: Option<&str>) -> StoreResult<Vec<Page>>;

    fn recent_pages(&self, limit: usize) -> StoreResult<Vec<Page>>;

    /// Pages whose title or block content contains `query`.
    fn search(&self, query: &str) -> StoreResult<Vec<Page>>;

    /// Returns the daily note for `date`, creating it if needed.
    fn ensure_daily_note(&mut self, date: NaiveDate) -> StoreResult<Page>;

    /// Returns today's daily note according to the store clock.
    fn ensure_today_note(&mut self) -> StoreResult<Page>;

    /// Days of `month` that have a daily note.
    fn daily_calendar(&self, year: i32, month: u32) -> StoreResult<Vec<NaiveDate>>;
}

/// Block hierarchy and content.
pub trait BlockRepository {
    /// Creates a block and indexes its references.
    ///
    /// Without an order the block is appended after its siblings.
    fn create_block(
        &mut self,
        page: &PageId,
        content: &str,
        parent: Option<&BlockId>,
        order: Option<f64>,
    ) -> StoreResult<Block>;

    fn get_block(&self, id: &BlockId) -> StoreResult<Option<Block>>;

    /// Finds blocks whose id starts with `prefix` (case-insensitive).
    fn find_blocks_by_prefix(&self, prefix: &str) -> StoreResult<Vec<Block>>;

    /// Applies content and position changes in one transaction.
    fn update_block(&mut self, id: &BlockId, patch: &BlockPatch) -> StoreResult<Block>;

    /// Moves a block under `parent` (top level for `None`). Rejects cycles.
    fn move_block(
        &mut self,
        id: &BlockId,
        parent: Option<&BlockId>,
        order: Option<f64>,
    ) -> StoreResult<Block>;

    fn indent_block(&mut self, id: &BlockId) -> StoreResult<Block>;

    fn outdent_block(&mut self, id: &BlockId) -> StoreResult<Block>;

    /// Deletes a block and its descendants with their links and alignments.
    fn delete_block(&mut self, id: &BlockId) -> StoreResult<DeleteSummary>;

    /// Loads every block of a page.
    fn page_tree(&self, page: &PageId) -> StoreResult<BlockTree>;
}

/// The link graph.
pub trait LinkRepository {
    /// Recomputes a block's reference links from its current content.
    fn reindex_links(&mut self, block: &BlockId) -> StoreResult<ReindexOutcome>;

    /// Links targeting `page`, each with its source block and page.
    fn backlinks(&self, page: &PageId) -> StoreResult<Vec<LinkedReference>>;

    fn page_graph(&self, page: &PageId) -> StoreResult<PageGraph>;

    fn list_links(&self) -> StoreResult<Vec<Link>>;

    /// Outgoing links of one block.
    fn block_links(&self, block: &BlockId) -> StoreResult<Vec<Link>>;

    fn get_link(&self, id: &LinkId) -> StoreResult<Option<Link>>;

    /// Adds a manual link. Fails with `Conflict` if the pair is linked.
    fn create_link(&mut self, source: &BlockId, target: &PageId) -> StoreResult<Link>;

    /// Removes a link.
    ///
    /// Deleting an explicit link reindexes its source block, so a `[[ref]]`
    /// to the same page in the block's content gets its reference edge back.
    fn delete_link(&mut self, id: &LinkId) -> StoreResult<()>;
}

/// Manual references between blocks.
pub trait BlockRefRepository {
    /// Lists references in creation order, optionally only those touching
    /// `block` as source or target.
    fn list_block_refs(&self, block: Option<&BlockId>) -> StoreResult<Vec<BlockRef>>;

    fn get_block_ref(&self, id: &BlockRefId) -> StoreResult<Option<BlockRef>>;

    /// Adds a reference. Both blocks must exist; a pair already referenced
    /// fails with `Conflict`.
    fn create_block_ref(&mut self, source: &BlockId, target: &BlockId) -> StoreResult<BlockRef>;

    fn delete_block_ref(&mut self, id: &BlockRefId) -> StoreResult<()>;
}

/// Recordings and the alignment ledger.
pub trait AudioRepository {
    fn create_recording(&mut self, recording: NewRecording) -> StoreResult<Recording>;

    fn get_recording(&self, id: &RecordingId) -> StoreResult<Option<Recording>>;

    /// Lists recordings by start time, optionally for one page.
    fn list_recordings(&self, page: Option<&PageId>) -> StoreResult<Vec<Recording>>;

    fn update_recording(&mut self, id: &RecordingId, patch: &RecordingPatch)
    -> StoreResult<Recording>;

    /// Removes a recording and its alignments, returning the removed row so
    /// the caller can delete the audio file.
    fn delete_recording(&mut self, id: &RecordingId) -> StoreResult<Recording>;

    /// Records where `block` was written in `recording`.
    ///
    /// Re-aligning an existing pair updates its offset and content in place.
    fn align(
        &mut self,
        recording: &RecordingId,
        block: &BlockId,
        offset_ms: i64,
        content: Option<&str>,
    ) -> StoreResult<AlignmentEntry>;

    fn get_alignment(&self, id: &AlignmentId) -> StoreResult<Option<AlignmentEntry>>;

    fn update_alignment(&mut self, id: &AlignmentId, offset_ms: i64)
    -> StoreResult<AlignmentEntry>;

    fn delete_alignment(&mut self, id: &AlignmentId) -> StoreResult<()>;

    /// Entries of a recording in insertion order.
    fn alignments_for_recording(&self, id: &RecordingId) -> StoreResult<Vec<AlignmentEntry>>;

    /// Entries of a block in insertion order.
    fn alignments_for_block(&self, id: &BlockId) -> StoreResult<Vec<AlignmentEntry>>;
}
