//! Page registry, daily notes and page queries.

use super::SqliteStore;
use super::rows::{self, PAGE_COLUMNS, encode_time};
use crate::domain::{Page, PageId, daily_title};
use crate::store::{DeleteSummary, Entity, PageRepository, StoreError, StoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

/// Queries shorter than this match everything and are rejected.
const MIN_SEARCH_CHARS: usize = 2;

// ===========================================
// Connection-level helpers
// ===========================================

pub(super) fn load(conn: &Connection, id: &PageId) -> StoreResult<Option<Page>> {
    let sql = format!("SELECT {PAGE_COLUMNS} FROM pages p WHERE p.id = ?1");
    Ok(conn
        .query_row(&sql, [id.as_str()], rows::page)
        .optional()?)
}

pub(super) fn require(conn: &Connection, id: &PageId) -> StoreResult<Page> {
    load(conn, id)?.ok_or_else(|| StoreError::not_found(Entity::Page, id))
}

fn by_title(conn: &Connection, title: &str) -> StoreResult<Option<Page>> {
    let sql = format!(
        "SELECT {PAGE_COLUMNS} FROM pages p WHERE p.title = ?1 ORDER BY p.is_daily ASC LIMIT 1"
    );
    Ok(conn.query_row(&sql, [title], rows::page).optional()?)
}

/// Resolves by page key, then by exact title.
pub(super) fn find(conn: &Connection, name: &str) -> StoreResult<Option<Page>> {
    let name = name.trim();
    if let Ok(id) = PageId::from_title(name)
        && let Some(page) = load(conn, &id)?
    {
        return Ok(Some(page));
    }
    by_title(conn, name)
}

fn insert(conn: &Connection, page: &Page) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO pages (id, title, is_daily, created, updated) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            page.id().as_str(),
            page.title(),
            page.is_daily(),
            encode_time(page.created()),
            encode_time(page.updated()),
        ],
    )?;
    Ok(())
}

/// Returns the page for `name`, creating it when nothing matches.
///
/// The flag is true when the page was created by this call.
pub(super) fn get_or_create(
    conn: &Connection,
    name: &str,
    now: DateTime<Utc>,
) -> StoreResult<(Page, bool)> {
    let name = name.trim();
    if let Some(page) = find(conn, name)? {
        return Ok((page, false));
    }
    let page = Page::new(PageId::from_title(name)?, name, false, now, now);
    insert(conn, &page)?;
    info!(page = %page.id(), title = page.title(), "created page");
    Ok((page, true))
}

/// Marks a page as changed.
pub(super) fn touch(conn: &Connection, id: &PageId, now: DateTime<Utc>) -> StoreResult<()> {
    conn.execute(
        "UPDATE pages SET updated = ?2 WHERE id = ?1",
        params![id.as_str(), encode_time(now)],
    )?;
    Ok(())
}

fn title_taken(conn: &Connection, title: &str, except: Option<&PageId>) -> StoreResult<bool> {
    let taken: Option<String> = conn
        .query_row(
            "SELECT id FROM pages WHERE title = ?1 AND is_daily = 0 AND id != ?2 LIMIT 1",
            params![title, except.map(PageId::as_str).unwrap_or("")],
            |row| row.get(0),
        )
        .optional()?;
    Ok(taken.is_some())
}

fn collect(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> StoreResult<Vec<Page>> {
    let mut stmt = conn.prepare(sql)?;
    let pages = stmt
        .query_map(params, rows::page)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(pages)
}

fn ensure_daily(conn: &Connection, date: NaiveDate, now: DateTime<Utc>) -> StoreResult<Page> {
    let id = PageId::daily(date);
    if let Some(page) = load(conn, &id)? {
        return Ok(page);
    }
    let page = Page::new(id, daily_title(date), true, now, now);
    insert(conn, &page)?;
    info!(page = %page.id(), "created daily note");
    Ok(page)
}

// ===========================================
// PageRepository
// ===========================================

impl PageRepository for SqliteStore {
    fn get_or_create_page(&mut self, name: &str) -> StoreResult<Page> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let (page, _) = get_or_create(tx.conn(), name, now)?;
        tx.commit()?;
        Ok(page)
    }

    fn create_page(&mut self, title: &str) -> StoreResult<Page> {
        let title = title.trim();
        let id = PageId::from_title(title)?;
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        if let Some(existing) = load(conn, &id)? {
            return Err(StoreError::Conflict(format!(
                "page '{}' already exists as '{}'",
                title,
                existing.title()
            )));
        }
        if title_taken(conn, title, None)? {
            return Err(StoreError::Conflict(format!("title '{title}' is taken")));
        }

        let page = Page::new(id, title, false, now, now);
        insert(conn, &page)?;
        tx.commit()?;
        info!(page = %page.id(), title = page.title(), "created page");
        Ok(page)
    }

    fn get_page(&self, id: &PageId) -> StoreResult<Option<Page>> {
        load(&self.conn, id)
    }

    fn find_page(&self, name: &str) -> StoreResult<Option<Page>> {
        find(&self.conn, name)
    }

    fn rename_page(&mut self, id: &PageId, title: &str) -> StoreResult<Page> {
        let title = title.trim();
        let key = PageId::from_title(title)?;
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        let page = require(conn, id)?;
        if page.is_daily() {
            return Err(StoreError::PreconditionFailed(format!(
                "daily note {} is named by its date",
                id
            )));
        }
        if &key != id && load(conn, &key)?.is_some() {
            return Err(StoreError::Conflict(format!(
                "title '{title}' resolves to existing page {key}"
            )));
        }
        if title_taken(conn, title, Some(id))? {
            return Err(StoreError::Conflict(format!("title '{title}' is taken")));
        }

        conn.execute(
            "UPDATE pages SET title = ?2, updated = ?3 WHERE id = ?1",
            params![id.as_str(), title, encode_time(now)],
        )?;
        let renamed = require(conn, id)?;
        tx.commit()?;
        info!(page = %id, from = page.title(), to = title, "renamed page");
        Ok(renamed)
    }

    fn delete_page(&mut self, id: &PageId) -> StoreResult<DeleteSummary> {
        let tx = self.transaction()?;
        let conn = tx.conn();
        require(conn, id)?;

        let blocks: i64 = conn.query_row(
            "SELECT COUNT(*) FROM blocks WHERE page_id = ?1",
            [id.as_str()],
            |row| row.get(0),
        )?;
        let links = conn.execute(
            "DELETE FROM links
             WHERE target_page_id = ?1
                OR source_block_id IN (SELECT id FROM blocks WHERE page_id = ?1)",
            [id.as_str()],
        )?;
        let block_refs = conn.execute(
            "DELETE FROM block_refs
             WHERE source_block_id IN (SELECT id FROM blocks WHERE page_id = ?1)
                OR target_block_id IN (SELECT id FROM blocks WHERE page_id = ?1)",
            [id.as_str()],
        )?;
        let alignments = conn.execute(
            "DELETE FROM alignments WHERE block_id IN (SELECT id FROM blocks WHERE page_id = ?1)",
            [id.as_str()],
        )?;
        conn.execute(
            "UPDATE recordings SET context_block_id = NULL
             WHERE context_block_id IN (SELECT id FROM blocks WHERE page_id = ?1)",
            [id.as_str()],
        )?;
        conn.execute(
            "UPDATE recordings SET page_id = NULL WHERE page_id = ?1",
            [id.as_str()],
        )?;
        conn.execute("DELETE FROM blocks WHERE page_id = ?1", [id.as_str()])?;
        conn.execute("DELETE FROM pages WHERE id = ?1", [id.as_str()])?;
        tx.commit()?;

        let summary = DeleteSummary {
            blocks: blocks as usize,
            links,
            block_refs,
            alignments,
        };
        info!(page = %id, ?summary, "deleted page");
        Ok(summary)
    }

    fn list_pages(&self, filter: Option<&str>) -> StoreResult<Vec<Page>> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        match filter {
            None => collect(
                &self.conn,
                &format!("SELECT {PAGE_COLUMNS} FROM pages p ORDER BY p.updated DESC, p.id"),
                [],
            ),
            Some(filter) => collect(
                &self.conn,
                &format!(
                    "SELECT {PAGE_COLUMNS} FROM pages p
                     WHERE instr(fold(p.title), ?1) > 0
                     ORDER BY p.updated DESC, p.id"
                ),
                [filter.to_lowercase()],
            ),
        }
    }

    fn recent_pages(&self, limit: usize) -> StoreResult<Vec<Page>> {
        collect(
            &self.conn,
            &format!("SELECT {PAGE_COLUMNS} FROM pages p ORDER BY p.updated DESC, p.id LIMIT ?1"),
            [limit as i64],
        )
    }

    fn search(&self, query: &str) -> StoreResult<Vec<Page>> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_CHARS {
            debug!(query, "search query too short");
            return Ok(Vec::new());
        }
        collect(
            &self.conn,
            &format!(
                "SELECT {PAGE_COLUMNS} FROM pages p
                 WHERE instr(fold(p.title), ?1) > 0
                    OR EXISTS (
                        SELECT 1 FROM blocks b
                        WHERE b.page_id = p.id AND instr(fold(b.content), ?1) > 0
                    )
                 ORDER BY p.updated DESC, p.id"
            ),
            [query.to_lowercase()],
        )
    }

    fn ensure_daily_note(&mut self, date: NaiveDate) -> StoreResult<Page> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let page = ensure_daily(tx.conn(), date, now)?;
        tx.commit()?;
        Ok(page)
    }

    fn ensure_today_note(&mut self) -> StoreResult<Page> {
        let today = self.clock().today();
        self.ensure_daily_note(today)
    }

    fn daily_calendar(&self, year: i32, month: u32) -> StoreResult<Vec<NaiveDate>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            StoreError::validation("month", format!("{year}-{month} is not a calendar month"))
        })?;
        // "daily/2025-05-01" -> "daily/2025-05-%"
        let first_id = PageId::daily(first);
        let pattern = format!("{}%", &first_id.as_str()[..first_id.as_str().len() - 2]);

        let mut stmt = self
            .conn
            .prepare("SELECT id FROM pages WHERE is_daily = 1 AND id LIKE ?1 ORDER BY id")?;
        let ids = stmt
            .query_map([pattern], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids
            .iter()
            .filter_map(|id| id.parse::<PageId>().ok())
            .filter_map(|id| id.daily_date())
            .collect())
    }
}
