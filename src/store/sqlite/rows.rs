//! Column lists and row mappers shared by the store modules.
//!
//! Each mapper takes the index of its first column so joined queries can
//! decode several entities from one row.

use crate::domain::{AlignmentEntry, Block, BlockRef, Link, Page, Recording};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use std::path::PathBuf;
use std::str::FromStr;

pub(super) const PAGE_COLUMNS: &str = "p.id, p.title, p.is_daily, p.created, p.updated";

pub(super) const BLOCK_COLUMNS: &str =
    "b.id, b.page_id, b.parent_id, b.content, b.sort_order, b.created, b.updated";

/// Links always join their source block to expose the source page.
pub(super) const LINK_COLUMNS: &str =
    "l.id, l.source_block_id, b.page_id, l.target_page_id, l.kind, l.created";

pub(super) const RECORDING_COLUMNS: &str = "r.id, r.file_name, r.file_path, r.mime_type, \
     r.page_id, r.context_block_id, r.mic_device, r.system_device, r.quality, \
     r.started, r.ended, r.duration_ms, r.size_bytes, r.created";

pub(super) const ALIGNMENT_COLUMNS: &str =
    "a.id, a.recording_id, a.block_id, a.offset_ms, a.content, a.authored_at";

pub(super) const BLOCK_WIDTH: usize = 7;
pub(super) const LINK_WIDTH: usize = 6;

pub(super) const BLOCK_REF_COLUMNS: &str =
    "r.id, r.source_block_id, r.target_block_id, r.created";

/// Fixed-width RFC 3339 so text ordering matches time ordering.
pub(super) fn encode_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parsed<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parsed_opt<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn time(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn time_opt(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<String>>(idx)? {
        None => Ok(None),
        Some(_) => time(row, idx).map(Some),
    }
}

pub(super) fn page_at(row: &Row<'_>, at: usize) -> rusqlite::Result<Page> {
    Ok(Page::new(
        parsed(row, at)?,
        row.get::<_, String>(at + 1)?,
        row.get::<_, bool>(at + 2)?,
        time(row, at + 3)?,
        time(row, at + 4)?,
    ))
}

pub(super) fn page(row: &Row<'_>) -> rusqlite::Result<Page> {
    page_at(row, 0)
}

pub(super) fn block_at(row: &Row<'_>, at: usize) -> rusqlite::Result<Block> {
    Ok(Block::new(
        parsed(row, at)?,
        parsed(row, at + 1)?,
        parsed_opt(row, at + 2)?,
        row.get::<_, String>(at + 3)?,
        row.get::<_, f64>(at + 4)?,
        time(row, at + 5)?,
        time(row, at + 6)?,
    ))
}

pub(super) fn block(row: &Row<'_>) -> rusqlite::Result<Block> {
    block_at(row, 0)
}

pub(super) fn link(row: &Row<'_>) -> rusqlite::Result<Link> {
    Ok(Link::new(
        parsed(row, 0)?,
        parsed(row, 1)?,
        parsed(row, 2)?,
        parsed(row, 3)?,
        parsed(row, 4)?,
        time(row, 5)?,
    ))
}

pub(super) fn block_ref(row: &Row<'_>) -> rusqlite::Result<BlockRef> {
    Ok(BlockRef {
        id: parsed(row, 0)?,
        source: parsed(row, 1)?,
        target: parsed(row, 2)?,
        created: time(row, 3)?,
    })
}

pub(super) fn recording(row: &Row<'_>) -> rusqlite::Result<Recording> {
    Ok(Recording {
        id: parsed(row, 0)?,
        file_name: row.get(1)?,
        file_path: PathBuf::from(row.get::<_, String>(2)?),
        mime_type: row.get(3)?,
        page_id: parsed_opt(row, 4)?,
        context_block: parsed_opt(row, 5)?,
        mic_device: row.get(6)?,
        system_device: row.get(7)?,
        quality: row.get(8)?,
        started: time(row, 9)?,
        ended: time_opt(row, 10)?,
        duration_ms: row.get(11)?,
        size_bytes: row.get(12)?,
        created: time(row, 13)?,
    })
}

pub(super) fn alignment(row: &Row<'_>) -> rusqlite::Result<AlignmentEntry> {
    Ok(AlignmentEntry {
        id: parsed(row, 0)?,
        recording_id: parsed(row, 1)?,
        block_id: parsed(row, 2)?,
        offset_ms: row.get(3)?,
        content: row.get(4)?,
        authored_at: time(row, 5)?,
    })
}
