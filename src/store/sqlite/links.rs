//! Link graph maintenance and queries.

use super::SqliteStore;
use super::rows::{
    self, BLOCK_COLUMNS, BLOCK_WIDTH, LINK_COLUMNS, LINK_WIDTH, PAGE_COLUMNS, encode_time,
};
use super::{blocks, pages};
use crate::domain::{
    Block, BlockId, Link, LinkId, LinkKind, Page, PageGraph, PageId, distinct_references,
};
use crate::infra::page_key;
use crate::store::{
    Entity, LinkRepository, LinkedReference, ReindexOutcome, StoreError, StoreResult,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

// ===========================================
// Reindexing
// ===========================================

/// Pages a block's content references, resolved and created as needed.
///
/// Unresolvable names and references to the block's own page are dropped.
fn resolve_targets(
    conn: &Connection,
    block: &Block,
    now: DateTime<Utc>,
) -> StoreResult<ReindexOutcome> {
    let mut outcome = ReindexOutcome::default();
    for name in distinct_references(block.content()) {
        if page_key(&name).is_none() {
            debug!(block = %block.id(), name, "skipping unresolvable reference");
            continue;
        }
        let (page, created) = pages::get_or_create(conn, &name, now)?;
        if created {
            outcome.created_pages.push(page.id().clone());
        }
        if page.id() == block.page_id() || outcome.targets.contains(page.id()) {
            continue;
        }
        outcome.targets.push(page.id().clone());
    }
    Ok(outcome)
}

/// Replaces a block's reference links with those its content implies.
///
/// Three phases: parse the content, resolve or create the named pages,
/// then swap the edge set. Explicit links are left alone and a reference
/// to an explicitly linked page does not add a second edge.
pub(super) fn reindex(
    conn: &Connection,
    block: &Block,
    now: DateTime<Utc>,
) -> StoreResult<ReindexOutcome> {
    let outcome = resolve_targets(conn, block, now)?;

    let removed = conn.execute(
        "DELETE FROM links WHERE source_block_id = ?1 AND kind = ?2",
        params![block.id().to_string(), LinkKind::Reference.as_str()],
    )?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO links (id, source_block_id, target_page_id, kind, created)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(source_block_id, target_page_id) DO NOTHING",
    )?;
    for target in &outcome.targets {
        stmt.execute(params![
            LinkId::new().to_string(),
            block.id().to_string(),
            target.as_str(),
            LinkKind::Reference.as_str(),
            encode_time(now),
        ])?;
    }

    debug!(
        block = %block.id(),
        removed,
        targets = outcome.targets.len(),
        created_pages = outcome.created_pages.len(),
        "reindexed links"
    );
    Ok(outcome)
}

// ===========================================
// Queries
// ===========================================

fn link_select(filter: &str) -> String {
    format!(
        "SELECT {LINK_COLUMNS} FROM links l JOIN blocks b ON b.id = l.source_block_id {filter}"
    )
}

fn collect_links(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> StoreResult<Vec<Link>> {
    let mut stmt = conn.prepare(sql)?;
    let links = stmt
        .query_map(params, rows::link)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(links)
}

fn load(conn: &Connection, id: &LinkId) -> StoreResult<Option<Link>> {
    Ok(conn
        .query_row(
            &link_select("WHERE l.id = ?1"),
            [id.to_string()],
            rows::link,
        )
        .optional()?)
}

fn linked_pages(conn: &Connection, sql: &str, page: &PageId) -> StoreResult<Vec<Page>> {
    let mut stmt = conn.prepare(sql)?;
    let pages = stmt
        .query_map([page.as_str()], rows::page)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(pages)
}

// ===========================================
// LinkRepository
// ===========================================

impl LinkRepository for SqliteStore {
    fn reindex_links(&mut self, block: &BlockId) -> StoreResult<ReindexOutcome> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let block = blocks::require(tx.conn(), block)?;
        let outcome = reindex(tx.conn(), &block, now)?;
        tx.commit()?;
        Ok(outcome)
    }

    fn backlinks(&self, page: &PageId) -> StoreResult<Vec<LinkedReference>> {
        pages::require(&self.conn, page)?;
        let sql = format!(
            "SELECT {LINK_COLUMNS}, {BLOCK_COLUMNS}, {PAGE_COLUMNS}
             FROM links l
             JOIN blocks b ON b.id = l.source_block_id
             JOIN pages p ON p.id = b.page_id
             WHERE l.target_page_id = ?1
             ORDER BY p.updated DESC, p.id, b.sort_order, l.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let refs = stmt
            .query_map([page.as_str()], |row| {
                Ok(LinkedReference {
                    link: rows::link(row)?,
                    block: rows::block_at(row, LINK_WIDTH)?,
                    page: rows::page_at(row, LINK_WIDTH + BLOCK_WIDTH)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(refs)
    }

    fn page_graph(&self, page: &PageId) -> StoreResult<PageGraph> {
        let current = pages::require(&self.conn, page)?;
        let outgoing = linked_pages(
            &self.conn,
            &format!(
                "SELECT {PAGE_COLUMNS} FROM links l
                 JOIN blocks b ON b.id = l.source_block_id
                 JOIN pages p ON p.id = l.target_page_id
                 WHERE b.page_id = ?1
                 ORDER BY l.rowid"
            ),
            page,
        )?;
        let incoming = linked_pages(
            &self.conn,
            &format!(
                "SELECT {PAGE_COLUMNS} FROM links l
                 JOIN blocks b ON b.id = l.source_block_id
                 JOIN pages p ON p.id = b.page_id
                 WHERE l.target_page_id = ?1
                 ORDER BY l.rowid"
            ),
            page,
        )?;
        Ok(PageGraph::assemble(&current, &outgoing, &incoming))
    }

    fn list_links(&self) -> StoreResult<Vec<Link>> {
        collect_links(&self.conn, &link_select("ORDER BY l.rowid"), [])
    }

    fn block_links(&self, block: &BlockId) -> StoreResult<Vec<Link>> {
        blocks::require(&self.conn, block)?;
        collect_links(
            &self.conn,
            &link_select("WHERE l.source_block_id = ?1 ORDER BY l.rowid"),
            [block.to_string()],
        )
    }

    fn get_link(&self, id: &LinkId) -> StoreResult<Option<Link>> {
        load(&self.conn, id)
    }

    fn create_link(&mut self, source: &BlockId, target: &PageId) -> StoreResult<Link> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        let block = blocks::require(conn, source)?;
        pages::require(conn, target)?;
        if block.page_id() == target {
            return Err(StoreError::validation(
                "target",
                format!("block {} already lives on page {}", source, target),
            ));
        }
        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM links WHERE source_block_id = ?1 AND target_page_id = ?2",
                params![source.to_string(), target.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(existing) = existing {
            return Err(StoreError::Conflict(format!(
                "block {} already links to {} ({})",
                source, target, existing
            )));
        }

        let id = LinkId::new();
        conn.execute(
            "INSERT INTO links (id, source_block_id, target_page_id, kind, created)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id.to_string(),
                source.to_string(),
                target.as_str(),
                LinkKind::Explicit.as_str(),
                encode_time(now),
            ],
        )?;
        let link = load(conn, &id)?.ok_or_else(|| StoreError::not_found(Entity::Link, &id))?;
        tx.commit()?;
        info!(link = %id, source = %source, target = %target, "created link");
        Ok(link)
    }

    fn delete_link(&mut self, id: &LinkId) -> StoreResult<()> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        let link = load(conn, id)?.ok_or_else(|| StoreError::not_found(Entity::Link, id))?;
        conn.execute("DELETE FROM links WHERE id = ?1", [id.to_string()])?;
        // An explicit link may have suppressed a reference edge to the same page.
        if link.kind() == LinkKind::Explicit {
            let block = blocks::require(conn, link.source_block())?;
            reindex(conn, &block, now)?;
        }
        tx.commit()?;

        info!(link = %id, kind = %link.kind(), "deleted link");
        Ok(())
    }
}
