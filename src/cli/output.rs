//! Output format types for CLI commands.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{AlignmentEntry, Block, OutlineEntry, Page, Recording};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Prints `data` wrapped as `{"data": ...}`.
pub fn print_json<T: Serialize>(data: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&Output::new(data))?);
    Ok(())
}

/// A page with its outline, as shown by `page show` and `daily`.
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub page: &'a Page,
    pub outline: &'a [OutlineEntry],
}

/// A block with what hangs off it, as shown by `block show`.
#[derive(Debug, Serialize)]
pub struct BlockView<'a, L: Serialize> {
    pub block: &'a Block,
    pub links: &'a [L],
    pub alignments: &'a [AlignmentEntry],
}

/// A recording with its alignment marks, as shown by `audio show`.
#[derive(Debug, Serialize)]
pub struct RecordingView<'a> {
    pub recording: &'a Recording,
    pub alignments: &'a [AlignmentEntry],
}

/// Days of a month that have a daily note.
#[derive(Debug, Serialize)]
pub struct CalendarListing {
    pub year: i32,
    pub month: u32,
    pub days: Vec<u32>,
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// Formats a millisecond offset as `m:ss.mmm`.
pub(crate) fn format_offset(offset_ms: i64) -> String {
    let total_secs = offset_ms / 1000;
    format!(
        "{}:{:02}.{:03}",
        total_secs / 60,
        total_secs % 60,
        offset_ms % 1000
    )
}

/// Prints a page table with one row per page.
pub(crate) fn print_page_table(pages: &[Page]) {
    println!("{:<32}  {:<40}  {:>10}", "ID", "Title", "Updated");
    println!(
        "{:<32}  {:<40}  {:>10}",
        "-".repeat(32),
        "-".repeat(40),
        "----------"
    );
    for page in pages {
        println!(
            "{:<32}  {:<40}  {:>10}",
            truncate_str(page.id().as_str(), 32),
            truncate_str(page.title(), 40),
            page.updated().format("%Y-%m-%d")
        );
    }
}

/// Prints an outline indented two spaces per level.
pub(crate) fn print_outline(outline: &[OutlineEntry]) {
    for entry in outline {
        println!(
            "{}- {}  [{}]",
            "  ".repeat(entry.depth),
            entry.block.content(),
            entry.block.id()
        );
    }
}
