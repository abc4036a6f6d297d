//! Block tree persistence.

use super::SqliteStore;
use super::rows::{self, BLOCK_COLUMNS, encode_time};
use super::{links, pages};
use crate::domain::{Block, BlockId, BlockPatch, BlockTree, PageId, Placement};
use crate::store::{BlockRepository, DeleteSummary, Entity, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

// ===========================================
// Connection-level helpers
// ===========================================

pub(super) fn load(conn: &Connection, id: &BlockId) -> StoreResult<Option<Block>> {
    let sql = format!("SELECT {BLOCK_COLUMNS} FROM blocks b WHERE b.id = ?1");
    Ok(conn
        .query_row(&sql, [id.to_string()], rows::block)
        .optional()?)
}

pub(super) fn require(conn: &Connection, id: &BlockId) -> StoreResult<Block> {
    load(conn, id)?.ok_or_else(|| StoreError::not_found(Entity::Block, id))
}

pub(super) fn load_tree(conn: &Connection, page: &PageId) -> StoreResult<BlockTree> {
    let sql = format!("SELECT {BLOCK_COLUMNS} FROM blocks b WHERE b.page_id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let blocks = stmt
        .query_map([page.as_str()], rows::block)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BlockTree::new(page.clone(), blocks))
}

/// A parent must exist and live on the same page as its children.
fn check_parent(conn: &Connection, tree: &BlockTree, parent: Option<&BlockId>) -> StoreResult<()> {
    let Some(parent) = parent else {
        return Ok(());
    };
    if tree.contains(parent) {
        return Ok(());
    }
    let other = require(conn, parent)?;
    Err(StoreError::PreconditionFailed(format!(
        "parent block {} belongs to page {}, not {}",
        parent,
        other.page_id(),
        tree.page_id()
    )))
}

fn insert(conn: &Connection, block: &Block) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO blocks (id, page_id, parent_id, content, sort_order, created, updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            block.id().to_string(),
            block.page_id().as_str(),
            block.parent_id().map(|p| p.to_string()),
            block.content(),
            block.order(),
            encode_time(block.created()),
            encode_time(block.updated()),
        ],
    )?;
    Ok(())
}

/// Writes the sibling keys a placement respaced.
fn renumber(conn: &Connection, placement: &Placement) -> StoreResult<()> {
    if placement.renumber.is_empty() {
        return Ok(());
    }
    warn!(
        block = %placement.block,
        siblings = placement.renumber.len(),
        "order keys exhausted, respacing sibling group"
    );
    let mut stmt = conn.prepare_cached("UPDATE blocks SET sort_order = ?2 WHERE id = ?1")?;
    for (sibling, order) in &placement.renumber {
        stmt.execute(params![sibling.to_string(), order])?;
    }
    Ok(())
}

fn apply(conn: &Connection, placement: &Placement, now: DateTime<Utc>) -> StoreResult<Block> {
    conn.execute(
        "UPDATE blocks SET parent_id = ?2, sort_order = ?3, updated = ?4 WHERE id = ?1",
        params![
            placement.block.to_string(),
            placement.parent.as_ref().map(|p| p.to_string()),
            placement.order,
            encode_time(now),
        ],
    )?;
    renumber(conn, placement)?;
    debug!(
        block = %placement.block,
        parent = ?placement.parent,
        order = placement.order,
        "placed block"
    );
    require(conn, &placement.block)
}

/// Removes one block's rows. Children must already be gone.
fn delete_rows(conn: &Connection, id: &BlockId) -> StoreResult<DeleteSummary> {
    let key = id.to_string();
    let alignments = conn.execute("DELETE FROM alignments WHERE block_id = ?1", [&key])?;
    let links = conn.execute("DELETE FROM links WHERE source_block_id = ?1", [&key])?;
    let block_refs = conn.execute(
        "DELETE FROM block_refs WHERE source_block_id = ?1 OR target_block_id = ?1",
        [&key],
    )?;
    conn.execute(
        "UPDATE recordings SET context_block_id = NULL WHERE context_block_id = ?1",
        [&key],
    )?;
    let blocks = conn.execute("DELETE FROM blocks WHERE id = ?1", [&key])?;
    Ok(DeleteSummary {
        blocks,
        links,
        block_refs,
        alignments,
    })
}

// ===========================================
// BlockRepository
// ===========================================

impl BlockRepository for SqliteStore {
    fn create_block(
        &mut self,
        page: &PageId,
        content: &str,
        parent: Option<&BlockId>,
        order: Option<f64>,
    ) -> StoreResult<Block> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        pages::require(conn, page)?;
        let tree = load_tree(conn, page)?;
        check_parent(conn, &tree, parent)?;
        let placement = tree.plan_insert(&BlockId::new(), parent, order)?;

        let block = Block::new(
            placement.block.clone(),
            page.clone(),
            parent.cloned(),
            content,
            placement.order,
            now,
            now,
        );
        insert(conn, &block)?;
        renumber(conn, &placement)?;
        links::reindex(conn, &block, now)?;
        pages::touch(conn, page, now)?;
        tx.commit()?;

        info!(block = %block.id(), page = %page, order = block.order(), "created block");
        Ok(block)
    }

    fn get_block(&self, id: &BlockId) -> StoreResult<Option<Block>> {
        load(&self.conn, id)
    }

    fn find_blocks_by_prefix(&self, prefix: &str) -> StoreResult<Vec<Block>> {
        let prefix = prefix.trim().to_uppercase();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {BLOCK_COLUMNS} FROM blocks b WHERE b.id LIKE ?1 ORDER BY b.id");
        let mut stmt = self.conn.prepare(&sql)?;
        let blocks = stmt
            .query_map([format!("{prefix}%")], rows::block)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks)
    }

    fn update_block(&mut self, id: &BlockId, patch: &BlockPatch) -> StoreResult<Block> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        let mut block = require(conn, id)?;
        if patch.is_empty() {
            return Ok(block);
        }

        if patch.is_structural() {
            let tree = load_tree(conn, block.page_id())?;
            let parent = match &patch.parent {
                Some(parent) => parent.clone(),
                None => block.parent_id().cloned(),
            };
            check_parent(conn, &tree, parent.as_ref())?;
            let placement = tree.plan_move(id, parent.as_ref(), patch.order)?;
            block = apply(conn, &placement, now)?;
        }

        if let Some(content) = &patch.content {
            conn.execute(
                "UPDATE blocks SET content = ?2, updated = ?3 WHERE id = ?1",
                params![id.to_string(), content, encode_time(now)],
            )?;
            block = require(conn, id)?;
            links::reindex(conn, &block, now)?;
        }

        pages::touch(conn, block.page_id(), now)?;
        tx.commit()?;
        info!(block = %id, "updated block");
        Ok(block)
    }

    fn move_block(
        &mut self,
        id: &BlockId,
        parent: Option<&BlockId>,
        order: Option<f64>,
    ) -> StoreResult<Block> {
        let patch = BlockPatch {
            parent: Some(parent.cloned()),
            order,
            ..BlockPatch::default()
        };
        self.update_block(id, &patch)
    }

    fn indent_block(&mut self, id: &BlockId) -> StoreResult<Block> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        let block = require(conn, id)?;
        let tree = load_tree(conn, block.page_id())?;
        let placement = tree.plan_indent(id)?;
        let block = apply(conn, &placement, now)?;
        pages::touch(conn, block.page_id(), now)?;
        tx.commit()?;

        info!(block = %id, parent = ?placement.parent, "indented block");
        Ok(block)
    }

    fn outdent_block(&mut self, id: &BlockId) -> StoreResult<Block> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        let block = require(conn, id)?;
        let tree = load_tree(conn, block.page_id())?;
        let placement = tree.plan_outdent(id)?;
        let block = apply(conn, &placement, now)?;
        pages::touch(conn, block.page_id(), now)?;
        tx.commit()?;

        info!(block = %id, parent = ?placement.parent, "outdented block");
        Ok(block)
    }

    fn delete_block(&mut self, id: &BlockId) -> StoreResult<DeleteSummary> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        let block = require(conn, id)?;
        let tree = load_tree(conn, block.page_id())?;
        let mut summary = DeleteSummary::default();
        for doomed in tree.subtree_post_order(id) {
            summary += delete_rows(conn, &doomed)?;
        }
        pages::touch(conn, block.page_id(), now)?;
        tx.commit()?;

        info!(block = %id, ?summary, "deleted block");
        Ok(summary)
    }

    fn page_tree(&self, page: &PageId) -> StoreResult<BlockTree> {
        pages::require(&self.conn, page)?;
        load_tree(&self.conn, page)
    }
}
