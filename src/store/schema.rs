//! SQLite schema creation for the outline store.

use rusqlite::Connection;

/// Version recorded in `schema_version` by [`create_schema`].
pub const SCHEMA_VERSION: i64 = 1;

/// Creates the database schema.
///
/// Idempotent: calling it on an existing database is a no-op.
///
/// # Tables Created
/// - `pages` - Titled documents, regular and daily
/// - `blocks` - Content units with parent pointer and sibling order
/// - `links` - Block-to-page edges, unique per (block, page)
/// - `block_refs` - Manual block-to-block references, unique per pair
/// - `recordings` - Audio recording metadata
/// - `alignments` - Recording offsets per block, unique per (recording, block)
/// - `schema_version` - Schema version tracking
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // ===========================================
    // Pages
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS pages (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            is_daily INTEGER NOT NULL DEFAULT 0,
            created TEXT NOT NULL,
            updated TEXT NOT NULL
        );",
    )?;

    // ===========================================
    // Blocks
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS blocks (
            id TEXT PRIMARY KEY,
            page_id TEXT NOT NULL REFERENCES pages(id) ON DELETE CASCADE,
            parent_id TEXT REFERENCES blocks(id) ON DELETE CASCADE,
            content TEXT NOT NULL DEFAULT '',
            sort_order REAL NOT NULL,
            created TEXT NOT NULL,
            updated TEXT NOT NULL
        );",
    )?;

    // ===========================================
    // Links
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS links (
            id TEXT PRIMARY KEY,
            source_block_id TEXT NOT NULL REFERENCES blocks(id) ON DELETE CASCADE,
            target_page_id TEXT NOT NULL REFERENCES pages(id) ON DELETE CASCADE,
            kind TEXT NOT NULL CHECK (kind IN ('reference', 'explicit')),
            created TEXT NOT NULL,
            UNIQUE(source_block_id, target_page_id)
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS block_refs (
            id TEXT PRIMARY KEY,
            source_block_id TEXT NOT NULL REFERENCES blocks(id) ON DELETE CASCADE,
            target_block_id TEXT NOT NULL REFERENCES blocks(id) ON DELETE CASCADE,
            created TEXT NOT NULL,
            UNIQUE(source_block_id, target_block_id)
        );",
    )?;

    // ===========================================
    // Audio
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS recordings (
            id TEXT PRIMARY KEY,
            file_name TEXT NOT NULL,
            file_path TEXT NOT NULL,
            mime_type TEXT,
            page_id TEXT REFERENCES pages(id) ON DELETE SET NULL,
            context_block_id TEXT REFERENCES blocks(id) ON DELETE SET NULL,
            mic_device TEXT,
            system_device TEXT,
            quality TEXT,
            started TEXT NOT NULL,
            ended TEXT,
            duration_ms INTEGER,
            size_bytes INTEGER,
            created TEXT NOT NULL
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS alignments (
            id TEXT PRIMARY KEY,
            recording_id TEXT NOT NULL REFERENCES recordings(id) ON DELETE CASCADE,
            block_id TEXT NOT NULL REFERENCES blocks(id) ON DELETE CASCADE,
            offset_ms INTEGER NOT NULL CHECK (offset_ms >= 0),
            content TEXT,
            authored_at TEXT NOT NULL,
            UNIQUE(recording_id, block_id)
        );",
    )?;

    // ===========================================
    // Indexes
    // ===========================================
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_pages_title ON pages(title);
         CREATE INDEX IF NOT EXISTS idx_pages_updated ON pages(updated);
         CREATE INDEX IF NOT EXISTS idx_blocks_group ON blocks(page_id, parent_id, sort_order);
         CREATE INDEX IF NOT EXISTS idx_links_target ON links(target_page_id);
         CREATE INDEX IF NOT EXISTS idx_block_refs_target ON block_refs(target_block_id);
         CREATE INDEX IF NOT EXISTS idx_recordings_page ON recordings(page_id);
         CREATE INDEX IF NOT EXISTS idx_recordings_started ON recordings(started);
         CREATE INDEX IF NOT EXISTS idx_alignments_block ON alignments(block_id);",
    )?;

    // ===========================================
    // Schema Version
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

/// Returns the current schema version.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get(0)
    })
}
