//! Command handlers for the CLI.

mod audio;
mod block_refs;
mod blocks;
mod daily;
mod links;
mod pages;
mod resolve;
mod search;

#[cfg(test)]
pub(crate) mod tests;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionsArgs};

// Re-export public items
pub use audio::handle_audio;
pub use blocks::handle_block;
pub use daily::{handle_calendar, handle_daily};
pub use links::handle_link;
pub use pages::handle_page;
pub use resolve::{
    ResolveResult, parse_id, require_block, require_page, resolve_block, resolve_page,
};
pub use search::{handle_recent, handle_search};

pub(crate) use crate::cli::output::truncate_str;

/// Writes a completion script for `args.shell` to stdout.
pub fn handle_completions(args: &CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(args.shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
