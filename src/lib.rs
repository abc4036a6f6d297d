//! loam - an outliner backend with linked pages and audio-aligned notes

pub mod cli;
pub mod domain;
pub mod infra;
pub mod store;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Command,
    config::{Config, DB_ENV_VAR},
    handlers::{
        handle_audio, handle_block, handle_calendar, handle_completions, handle_daily,
        handle_link, handle_page, handle_recent, handle_search,
    },
};
use store::SqliteStore;

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Completions(args) = &cli.command {
        return handle_completions(args);
    }

    let config = Config::load()?;
    init_tracing(&config, cli.verbose);

    let db_path = config.database_path(
        cli.db.as_deref(),
        std::env::var_os(DB_ENV_VAR).map(Into::into),
    );
    debug!(path = %db_path.display(), "opening database");
    let mut store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    match &cli.command {
        Command::Page(command) => handle_page(command, &mut store),
        Command::Block(command) => handle_block(command, &mut store),
        Command::Link(command) => handle_link(command, &mut store),
        Command::Audio(command) => handle_audio(command, &mut store),
        Command::Daily(args) => handle_daily(args, &mut store),
        Command::Calendar(args) => handle_calendar(args, &store),
        Command::Search(args) => handle_search(args, &store),
        Command::Recent(args) => handle_recent(args, &store),
        Command::Completions(args) => handle_completions(args),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing(config: &Config, verbose: u8) {
    let directive = config.log_filter(std::env::var("RUST_LOG").ok(), verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    // Ignored when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
