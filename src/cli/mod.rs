//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// loam - an outliner with linked pages and audio-aligned notes
#[derive(Parser, Debug)]
#[command(name = "loam", version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides LOAM_DB and the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, inspect and remove pages
    #[command(subcommand)]
    Page(PageCommand),

    /// Edit the block outline of a page
    #[command(subcommand)]
    Block(BlockCommand),

    /// Inspect and manage links between blocks and pages
    #[command(subcommand)]
    Link(LinkCommand),

    /// Register recordings and align blocks with them
    #[command(subcommand)]
    Audio(AudioCommand),

    /// Show (and create if needed) the daily note for a date
    Daily(DailyArgs),

    /// List the days of a month that have a daily note
    Calendar(CalendarArgs),

    /// Find pages by title or block content
    Search(SearchArgs),

    /// List recently updated pages
    Recent(RecentArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ===========================================
// page
// ===========================================

#[derive(Subcommand, Debug)]
pub enum PageCommand {
    /// Create a new page
    New(PageNewArgs),

    /// Show a page and its outline
    Show(PageArgs),

    /// List pages, optionally filtered by title
    Ls(PageListArgs),

    /// Change a page's title
    Rename(PageRenameArgs),

    /// Delete a page with its blocks and links
    Rm(PageArgs),

    /// Show the pages linked to and from a page
    Graph(PageArgs),

    /// Show the blocks that reference a page
    Backlinks(PageArgs),
}

/// Arguments for `page new`
#[derive(Parser, Debug)]
pub struct PageNewArgs {
    /// Page title
    pub title: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for page commands that take a single page
#[derive(Parser, Debug)]
pub struct PageArgs {
    /// Page title or id
    pub page: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `page ls`
#[derive(Parser, Debug)]
pub struct PageListArgs {
    /// Only list pages whose title contains this text
    pub filter: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `page rename`
#[derive(Parser, Debug)]
pub struct PageRenameArgs {
    /// Page title or id
    pub page: String,

    /// New title
    pub title: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

// ===========================================
// block
// ===========================================

#[derive(Subcommand, Debug)]
pub enum BlockCommand {
    /// Add a block to a page
    Add(BlockAddArgs),

    /// Show a block with its links and audio marks
    Show(BlockArgs),

    /// Change a block's content or position
    Edit(BlockEditArgs),

    /// Make a block the last child of its previous sibling
    Indent(BlockArgs),

    /// Move a block up one level, right after its parent
    Outdent(BlockArgs),

    /// Delete a block and everything nested under it
    Rm(BlockArgs),

    /// List the recordings a block is aligned with
    Audio(BlockArgs),

    /// Manage manual references between blocks
    #[command(subcommand)]
    Ref(BlockRefCommand),
}

/// Arguments for `block add`
#[derive(Parser, Debug)]
pub struct BlockAddArgs {
    /// Page title or id
    pub page: String,

    /// Block text; [[Page]] references are linked automatically
    pub content: String,

    /// Parent block id or id prefix
    #[arg(short, long)]
    pub parent: Option<String>,

    /// Explicit sort key among siblings (appends when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub order: Option<f64>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for block commands that take a single block
#[derive(Parser, Debug)]
pub struct BlockArgs {
    /// Block id or id prefix
    pub block: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `block edit`
#[derive(Parser, Debug)]
pub struct BlockEditArgs {
    /// Block id or id prefix
    pub block: String,

    /// New block text
    #[arg(short, long)]
    pub content: Option<String>,

    /// New parent block id or id prefix
    #[arg(short, long, conflicts_with = "root")]
    pub parent: Option<String>,

    /// Move the block to the top level of its page
    #[arg(long)]
    pub root: bool,

    /// New sort key among siblings
    #[arg(long, allow_negative_numbers = true)]
    pub order: Option<f64>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum BlockRefCommand {
    /// List block references, optionally only those touching one block
    Ls(BlockRefListArgs),

    /// Show a single block reference
    Show(BlockRefArgs),

    /// Reference one block from another
    Add(BlockRefAddArgs),

    /// Remove a block reference
    Rm(BlockRefArgs),
}

/// Arguments for `block ref ls`
#[derive(Parser, Debug)]
pub struct BlockRefListArgs {
    /// Only list references from or to this block
    #[arg(short, long)]
    pub block: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for block reference commands that take a reference id
#[derive(Parser, Debug)]
pub struct BlockRefArgs {
    /// Block reference id
    pub reference: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `block ref add`
#[derive(Parser, Debug)]
pub struct BlockRefAddArgs {
    /// Referencing block id or id prefix
    pub source: String,

    /// Referenced block id or id prefix
    pub target: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

// ===========================================
// link
// ===========================================

#[derive(Subcommand, Debug)]
pub enum LinkCommand {
    /// List links, optionally only those of one block
    Ls(LinkListArgs),

    /// Show a single link
    Show(LinkArgs),

    /// Link a block to a page explicitly
    Add(LinkAddArgs),

    /// Remove a link
    Rm(LinkArgs),
}

/// Arguments for `link ls`
#[derive(Parser, Debug)]
pub struct LinkListArgs {
    /// Only list links whose source is this block
    #[arg(short, long)]
    pub block: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for link commands that take a link id
#[derive(Parser, Debug)]
pub struct LinkArgs {
    /// Link id
    pub link: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `link add`
#[derive(Parser, Debug)]
pub struct LinkAddArgs {
    /// Source block id or id prefix
    pub block: String,

    /// Target page title or id
    pub page: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

// ===========================================
// audio
// ===========================================

#[derive(Subcommand, Debug)]
pub enum AudioCommand {
    /// Register a recording file
    Add(AudioAddArgs),

    /// List recordings
    Ls(AudioListArgs),

    /// Show a recording with its alignment marks
    Show(AudioArgs),

    /// Change a recording's metadata
    Update(AudioUpdateArgs),

    /// Delete a recording, its marks and (unless kept) its file
    Rm(AudioRemoveArgs),

    /// Mark where in a recording a block was written
    Align(AudioAlignArgs),

    /// List a recording's alignment marks in the order they were made
    Marks(AudioArgs),

    /// Remove an alignment mark
    Unalign(AudioUnalignArgs),
}

/// Arguments for `audio add`
#[derive(Parser, Debug)]
pub struct AudioAddArgs {
    /// Path to the audio file (mp3, wav, ogg or webm)
    pub path: PathBuf,

    /// Page the recording belongs to
    #[arg(long)]
    pub page: Option<String>,

    /// Block that was being edited when recording started
    #[arg(long)]
    pub block: Option<String>,

    /// Microphone device name
    #[arg(long)]
    pub mic: Option<String>,

    /// System audio device name
    #[arg(long)]
    pub system: Option<String>,

    /// Recording quality label
    #[arg(long)]
    pub quality: Option<String>,

    /// Start time (RFC 3339, defaults to now)
    #[arg(long)]
    pub started: Option<DateTime<Utc>>,

    /// End time (RFC 3339)
    #[arg(long)]
    pub ended: Option<DateTime<Utc>>,

    /// Duration in milliseconds (derived from start and end when omitted)
    #[arg(long)]
    pub duration_ms: Option<i64>,

    /// File size in bytes (read from the file when omitted)
    #[arg(long)]
    pub size_bytes: Option<i64>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `audio ls`
#[derive(Parser, Debug)]
pub struct AudioListArgs {
    /// Only list recordings attached to this page
    #[arg(long)]
    pub page: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for audio commands that take a recording id
#[derive(Parser, Debug)]
pub struct AudioArgs {
    /// Recording id
    pub recording: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `audio update`
#[derive(Parser, Debug)]
pub struct AudioUpdateArgs {
    /// Recording id
    pub recording: String,

    /// Attach the recording to a page
    #[arg(long, conflicts_with = "clear_page")]
    pub page: Option<String>,

    /// Detach the recording from its page
    #[arg(long)]
    pub clear_page: bool,

    /// Set the context block
    #[arg(long, conflicts_with = "clear_block")]
    pub block: Option<String>,

    /// Clear the context block
    #[arg(long)]
    pub clear_block: bool,

    /// End time (RFC 3339); the duration is re-derived
    #[arg(long)]
    pub ended: Option<DateTime<Utc>>,

    /// Duration in milliseconds
    #[arg(long)]
    pub duration_ms: Option<i64>,

    /// Microphone device name
    #[arg(long)]
    pub mic: Option<String>,

    /// System audio device name
    #[arg(long)]
    pub system: Option<String>,

    /// Recording quality label
    #[arg(long)]
    pub quality: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `audio rm`
#[derive(Parser, Debug)]
pub struct AudioRemoveArgs {
    /// Recording id
    pub recording: String,

    /// Leave the audio file on disk
    #[arg(long)]
    pub keep_file: bool,
}

/// Arguments for `audio align`
#[derive(Parser, Debug)]
pub struct AudioAlignArgs {
    /// Recording id
    pub recording: String,

    /// Block id or id prefix
    pub block: String,

    /// Offset into the recording in milliseconds
    pub offset_ms: i64,

    /// Snapshot of the block text at alignment time
    #[arg(long)]
    pub content: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `audio unalign`
#[derive(Parser, Debug)]
pub struct AudioUnalignArgs {
    /// Alignment mark id
    pub alignment: String,
}

// ===========================================
// Top-level commands
// ===========================================

/// Arguments for the `daily` command
#[derive(Parser, Debug)]
pub struct DailyArgs {
    /// Date (YYYY-MM-DD, defaults to today)
    pub date: Option<NaiveDate>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `calendar` command
#[derive(Parser, Debug)]
pub struct CalendarArgs {
    /// Year
    pub year: i32,

    /// Month (1-12)
    pub month: u32,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search query (at least two characters)
    pub query: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `recent` command
#[derive(Parser, Debug)]
pub struct RecentArgs {
    /// Maximum number of pages to show
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
