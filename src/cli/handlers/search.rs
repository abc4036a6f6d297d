//! Search and recent-page handlers.

use anyhow::{Context, Result};

use super::pages::print_pages;
use crate::cli::{RecentArgs, SearchArgs};
use crate::store::{PageRepository, SqliteStore};

pub fn handle_search(args: &SearchArgs, store: &SqliteStore) -> Result<()> {
    let pages = store
        .search(&args.query)
        .with_context(|| format!("search failed for query: {}", args.query))?;
    print_pages(&pages, args.format)
}

pub fn handle_recent(args: &RecentArgs, store: &SqliteStore) -> Result<()> {
    let pages = store
        .recent_pages(args.limit)
        .with_context(|| "failed to list recent pages")?;
    print_pages(&pages, args.format)
}
