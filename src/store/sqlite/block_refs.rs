//! Manual block-to-block references.

use super::SqliteStore;
use super::blocks;
use super::rows::{self, BLOCK_REF_COLUMNS, encode_time};
use crate::domain::{BlockId, BlockRef, BlockRefId};
use crate::store::{BlockRefRepository, Entity, StoreError, StoreResult};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

fn load(conn: &Connection, id: &BlockRefId) -> StoreResult<Option<BlockRef>> {
    let sql = format!("SELECT {BLOCK_REF_COLUMNS} FROM block_refs r WHERE r.id = ?1");
    Ok(conn
        .query_row(&sql, [id.to_string()], rows::block_ref)
        .optional()?)
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> StoreResult<Vec<BlockRef>> {
    let mut stmt = conn.prepare(sql)?;
    let refs = stmt
        .query_map(params, rows::block_ref)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(refs)
}

impl BlockRefRepository for SqliteStore {
    fn list_block_refs(&self, block: Option<&BlockId>) -> StoreResult<Vec<BlockRef>> {
        match block {
            None => collect(
                &self.conn,
                &format!("SELECT {BLOCK_REF_COLUMNS} FROM block_refs r ORDER BY r.rowid"),
                [],
            ),
            Some(block) => {
                blocks::require(&self.conn, block)?;
                collect(
                    &self.conn,
                    &format!(
                        "SELECT {BLOCK_REF_COLUMNS} FROM block_refs r
                         WHERE r.source_block_id = ?1 OR r.target_block_id = ?1
                         ORDER BY r.rowid"
                    ),
                    [block.to_string()],
                )
            }
        }
    }

    fn get_block_ref(&self, id: &BlockRefId) -> StoreResult<Option<BlockRef>> {
        load(&self.conn, id)
    }

    fn create_block_ref(&mut self, source: &BlockId, target: &BlockId) -> StoreResult<BlockRef> {
        let now = self.clock().now();
        let tx = self.transaction()?;
        let conn = tx.conn();

        blocks::require(conn, source)?;
        blocks::require(conn, target)?;
        if source == target {
            return Err(StoreError::validation(
                "target",
                format!("block {} cannot reference itself", source),
            ));
        }
        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM block_refs WHERE source_block_id = ?1 AND target_block_id = ?2",
                params![source.to_string(), target.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(existing) = existing {
            return Err(StoreError::Conflict(format!(
                "block {} already references {} ({})",
                source, target, existing
            )));
        }

        let id = BlockRefId::new();
        conn.execute(
            "INSERT INTO block_refs (id, source_block_id, target_block_id, created)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                source.to_string(),
                target.to_string(),
                encode_time(now),
            ],
        )?;
        let reference =
            load(conn, &id)?.ok_or_else(|| StoreError::not_found(Entity::BlockRef, &id))?;
        tx.commit()?;
        info!(reference = %id, source = %source, target = %target, "created block reference");
        Ok(reference)
    }

    fn delete_block_ref(&mut self, id: &BlockRefId) -> StoreResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM block_refs WHERE id = ?1", [id.to_string()])?;
        if removed == 0 {
            return Err(StoreError::not_found(Entity::BlockRef, id));
        }
        info!(reference = %id, "deleted block reference");
        Ok(())
    }
}
