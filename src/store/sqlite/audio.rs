//! Recordings and the alignment ledger.

use super::SqliteStore;
use super::rows::{self, ALIGNMENT_COLUMNS, RECORDING_COLUMNS, encode_time};
use super::{blocks, pages};
use crate::domain::{
    AlignmentEntry, AlignmentId, BlockId, NewRecording, PageId, Recording, RecordingId,
    RecordingPatch, duration_between,
};
use crate::store::{AudioRepository, Entity, StoreError, StoreResult};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

fn load(conn: &Connection, id: &RecordingId) -> StoreResult<Option<Recording>> {
    let sql = format!("SELECT {RECORDING_COLUMNS} FROM recordings r WHERE r.id = ?1");
    Ok(conn
        .query_row(&sql, [id.to_string()], rows::recording)
        .optional()?)
}

fn require(conn: &Connection, id: &RecordingId) -> StoreResult<Recording> {
    load(conn, id)?.ok_or_else(|| StoreError::not_found(Entity::Recording, id))
}

fn load_alignment(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> StoreResult<Option<AlignmentEntry>> {
    let sql = format!("SELECT {ALIGNMENT_COLUMNS} FROM alignments a {filter}");
    Ok(conn.query_row(&sql, params, rows::alignment).optional()?)
}

fn collect_alignments(
    conn: &Connection,
    filter: &str,
    key: String,
) -> StoreResult<Vec<AlignmentEntry>> {
    let sql = format!("SELECT {ALIGNMENT_COLUMNS} FROM alignments a {filter} ORDER BY a.rowid");
    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map([key], rows::alignment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

fn check_offset(offset_ms: i64) -> StoreResult<()> {
    if offset_ms < 0 {
        return Err(StoreError::validation(
            "offset_ms",
            format!("must not be negative, got {offset_ms}"),
        ));
    }
    Ok(())
}

impl AudioRepository for SqliteStore {
    fn create_recording(&mut self, new: NewRecording) -> StoreResult<Recording> {
        new.validate()?;
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        if let Some(page) = &new.page_id {
            pages::require(conn, page)?;
        }
        if let Some(block) = &new.context_block {
            blocks::require(conn, block)?;
        }

        let started = new.started.unwrap_or(now);
        if let Some(ended) = new.ended
            && ended < started
        {
            return Err(StoreError::validation(
                "ended",
                "recording ends before it starts",
            ));
        }
        let recording = Recording {
            id: RecordingId::new(),
            duration_ms: new.duration_ms.or_else(|| duration_between(started, new.ended)),
            file_name: new.file_name,
            file_path: new.file_path,
            mime_type: new.mime_type,
            page_id: new.page_id,
            context_block: new.context_block,
            mic_device: new.mic_device,
            system_device: new.system_device,
            quality: new.quality,
            started,
            ended: new.ended,
            size_bytes: new.size_bytes,
            created: now,
        };

        conn.execute(
            "INSERT INTO recordings (id, file_name, file_path, mime_type, page_id, context_block_id,
                 mic_device, system_device, quality, started, ended, duration_ms, size_bytes, created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                recording.id.to_string(),
                recording.file_name,
                recording.file_path.to_string_lossy(),
                recording.mime_type,
                recording.page_id.as_ref().map(PageId::as_str),
                recording.context_block.as_ref().map(|b| b.to_string()),
                recording.mic_device,
                recording.system_device,
                recording.quality,
                encode_time(recording.started),
                recording.ended.map(encode_time),
                recording.duration_ms,
                recording.size_bytes,
                encode_time(recording.created),
            ],
        )?;
        tx.commit()?;

        info!(recording = %recording.id, file = %recording.file_path.display(), "registered recording");
        Ok(recording)
    }

    fn get_recording(&self, id: &RecordingId) -> StoreResult<Option<Recording>> {
        load(&self.conn, id)
    }

    fn list_recordings(&self, page: Option<&PageId>) -> StoreResult<Vec<Recording>> {
        if let Some(page) = page {
            pages::require(&self.conn, page)?;
        }
        let sql = format!(
            "SELECT {RECORDING_COLUMNS} FROM recordings r
             WHERE ?1 IS NULL OR r.page_id = ?1
             ORDER BY r.started, r.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let recordings = stmt
            .query_map([page.map(PageId::as_str)], rows::recording)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recordings)
    }

    fn update_recording(
        &mut self,
        id: &RecordingId,
        patch: &RecordingPatch,
    ) -> StoreResult<Recording> {
        let tx = self.transaction()?;
        let conn = tx.conn();

        let current = require(conn, id)?;
        if let Some(Some(page)) = &patch.page_id {
            pages::require(conn, page)?;
        }
        if let Some(Some(block)) = &patch.context_block {
            blocks::require(conn, block)?;
        }
        let next = patch.apply(&current)?;

        conn.execute(
            "UPDATE recordings SET page_id = ?2, context_block_id = ?3, ended = ?4,
                 duration_ms = ?5, mic_device = ?6, system_device = ?7, quality = ?8
             WHERE id = ?1",
            params![
                id.to_string(),
                next.page_id.as_ref().map(PageId::as_str),
                next.context_block.as_ref().map(|b| b.to_string()),
                next.ended.map(encode_time),
                next.duration_ms,
                next.mic_device,
                next.system_device,
                next.quality,
            ],
        )?;
        tx.commit()?;

        debug!(recording = %id, "updated recording");
        Ok(next)
    }

    fn delete_recording(&mut self, id: &RecordingId) -> StoreResult<Recording> {
        let tx = self.transaction()?;
        let conn = tx.conn();

        let recording = require(conn, id)?;
        let alignments = conn.execute(
            "DELETE FROM alignments WHERE recording_id = ?1",
            [id.to_string()],
        )?;
        conn.execute("DELETE FROM recordings WHERE id = ?1", [id.to_string()])?;
        tx.commit()?;

        info!(recording = %id, alignments, "deleted recording");
        Ok(recording)
    }

    fn align(
        &mut self,
        recording: &RecordingId,
        block: &BlockId,
        offset_ms: i64,
        content: Option<&str>,
    ) -> StoreResult<AlignmentEntry> {
        check_offset(offset_ms)?;
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        require(conn, recording)?;
        blocks::require(conn, block)?;

        // Re-aligning keeps the entry id and its original authored time.
        conn.execute(
            "INSERT INTO alignments (id, recording_id, block_id, offset_ms, content, authored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(recording_id, block_id) DO UPDATE SET
                 offset_ms = excluded.offset_ms,
                 content = COALESCE(excluded.content, alignments.content)",
            params![
                AlignmentId::new().to_string(),
                recording.to_string(),
                block.to_string(),
                offset_ms,
                content,
                encode_time(now),
            ],
        )?;
        let entry = load_alignment(
            conn,
            "WHERE a.recording_id = ?1 AND a.block_id = ?2",
            params![recording.to_string(), block.to_string()],
        )?
        .ok_or_else(|| StoreError::not_found(Entity::Alignment, format!("{recording}/{block}")))?;
        tx.commit()?;

        debug!(recording = %recording, block = %block, offset_ms, "aligned block");
        Ok(entry)
    }

    fn get_alignment(&self, id: &AlignmentId) -> StoreResult<Option<AlignmentEntry>> {
        load_alignment(&self.conn, "WHERE a.id = ?1", [id.to_string()])
    }

    fn update_alignment(
        &mut self,
        id: &AlignmentId,
        offset_ms: i64,
    ) -> StoreResult<AlignmentEntry> {
        check_offset(offset_ms)?;
        let tx = self.transaction()?;
        let conn = tx.conn();

        let updated = conn.execute(
            "UPDATE alignments SET offset_ms = ?2 WHERE id = ?1",
            params![id.to_string(), offset_ms],
        )?;
        if updated == 0 {
            return Err(StoreError::not_found(Entity::Alignment, id));
        }
        let entry = load_alignment(conn, "WHERE a.id = ?1", [id.to_string()])?
            .ok_or_else(|| StoreError::not_found(Entity::Alignment, id))?;
        tx.commit()?;
        Ok(entry)
    }

    fn delete_alignment(&mut self, id: &AlignmentId) -> StoreResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM alignments WHERE id = ?1", [id.to_string()])?;
        if removed == 0 {
            return Err(StoreError::not_found(Entity::Alignment, id));
        }
        Ok(())
    }

    fn alignments_for_recording(&self, id: &RecordingId) -> StoreResult<Vec<AlignmentEntry>> {
        require(&self.conn, id)?;
        collect_alignments(&self.conn, "WHERE a.recording_id = ?1", id.to_string())
    }

    fn alignments_for_block(&self, id: &BlockId) -> StoreResult<Vec<AlignmentEntry>> {
        blocks::require(&self.conn, id)?;
        collect_alignments(&self.conn, "WHERE a.block_id = ?1", id.to_string())
    }
}
