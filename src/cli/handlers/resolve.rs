//! Block and page resolution utilities.

use anyhow::{Context, Result, bail};
use std::str::FromStr;

use crate::domain::{Block, BlockId, Page, PageId};
use crate::store::{BlockRepository, PageRepository};

/// Shortest id prefix accepted for block lookup.
const MIN_PREFIX_LEN: usize = 4;

/// Result of resolving a block identifier.
#[derive(Debug)]
pub enum ResolveResult {
    /// Exactly one block matched.
    Unique(Block),
    /// Multiple blocks matched (ambiguous).
    Ambiguous(Vec<Block>),
    /// No blocks matched.
    NotFound,
}

/// Prints the candidates of an ambiguous prefix to help pick one.
pub(crate) fn print_ambiguous_blocks(identifier: &str, blocks: &[Block]) {
    eprintln!("Ambiguous: '{}' matches {} blocks:", identifier, blocks.len());
    for block in blocks {
        eprintln!("  {}  {}", block.id(), block.page_id());
        eprintln!("      {}", super::truncate_str(block.content(), 60));
    }
    eprintln!();
    eprintln!("Use a longer id prefix to specify which block you mean.");
}

/// Resolves a block identifier to a unique block.
///
/// A complete ULID is looked up directly. Anything else is treated as an
/// id prefix (case-insensitive, at least four characters).
pub fn resolve_block<R: BlockRepository>(store: &R, identifier: &str) -> Result<ResolveResult> {
    let identifier = identifier.trim();

    if let Ok(id) = identifier.parse::<BlockId>() {
        let block = store
            .get_block(&id)
            .with_context(|| format!("failed to look up block {}", id))?;
        return Ok(block.map_or(ResolveResult::NotFound, ResolveResult::Unique));
    }

    if identifier.chars().count() < MIN_PREFIX_LEN {
        return Ok(ResolveResult::NotFound);
    }

    let mut matches = store
        .find_blocks_by_prefix(identifier)
        .with_context(|| "failed to search by ID prefix")?;

    match matches.len() {
        0 => Ok(ResolveResult::NotFound),
        1 => Ok(matches
            .pop()
            .map_or(ResolveResult::NotFound, ResolveResult::Unique)),
        _ => Ok(ResolveResult::Ambiguous(matches)),
    }
}

/// Resolves a block identifier, failing unless exactly one block matches.
pub fn require_block<R: BlockRepository>(store: &R, identifier: &str) -> Result<Block> {
    match resolve_block(store, identifier)? {
        ResolveResult::Unique(block) => Ok(block),
        ResolveResult::Ambiguous(blocks) => {
            print_ambiguous_blocks(identifier, &blocks);
            bail!("ambiguous block identifier: '{}'", identifier);
        }
        ResolveResult::NotFound => bail!("block not found: '{}'", identifier),
    }
}

/// Resolves a page by id (`project-ideas`, `daily/2025-05-18`), key or title.
pub fn resolve_page<R: PageRepository>(store: &R, identifier: &str) -> Result<Option<Page>> {
    let identifier = identifier.trim();

    if let Ok(id) = identifier.parse::<PageId>()
        && let Some(page) = store
            .get_page(&id)
            .with_context(|| format!("failed to look up page {}", id))?
    {
        return Ok(Some(page));
    }

    store
        .find_page(identifier)
        .with_context(|| format!("failed to look up page '{}'", identifier))
}

/// Resolves a page, failing when nothing matches.
pub fn require_page<R: PageRepository>(store: &R, identifier: &str) -> Result<Page> {
    match resolve_page(store, identifier)? {
        Some(page) => Ok(page),
        None => bail!("page not found: '{}'", identifier),
    }
}

/// Parses an id argument, naming what was expected on failure.
pub fn parse_id<T>(raw: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid {} id: '{}'", what, raw))
}
