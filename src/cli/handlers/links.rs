//! Link-related command handlers (ls, show, add, rm).

use anyhow::{Context, Result, bail};

use super::resolve::{parse_id, require_block, require_page};
use crate::cli::LinkCommand;
use crate::cli::output::{OutputFormat, print_json};
use crate::domain::{Link, LinkId};
use crate::store::{LinkRepository, SqliteStore};

pub fn handle_link(command: &LinkCommand, store: &mut SqliteStore) -> Result<()> {
    match command {
        LinkCommand::Ls(args) => {
            let links = match &args.block {
                Some(block) => {
                    let block = require_block(store, block)?;
                    store.block_links(block.id())?
                }
                None => store.list_links().with_context(|| "failed to list links")?,
            };
            match args.format {
                OutputFormat::Human => {
                    if links.is_empty() {
                        println!("No links found.");
                    } else {
                        println!(
                            "{:<26}  {:<24}  {:<24}  {:<9}",
                            "ID", "From", "To", "Kind"
                        );
                        println!(
                            "{:<26}  {:<24}  {:<24}  {:<9}",
                            "-".repeat(26),
                            "-".repeat(24),
                            "-".repeat(24),
                            "---------"
                        );
                        for link in &links {
                            println!(
                                "{:<26}  {:<24}  {:<24}  {:<9}",
                                link.id().to_string(),
                                link.source_page().as_str(),
                                link.target_page().as_str(),
                                link.kind().as_str()
                            );
                        }
                        println!();
                        println!("{} link(s)", links.len());
                    }
                }
                OutputFormat::Json => print_json(&links)?,
            }
            Ok(())
        }
        LinkCommand::Show(args) => {
            let id: LinkId = parse_id(&args.link, "link")?;
            let Some(link) = store.get_link(&id)? else {
                bail!("link not found: {}", id);
            };
            match args.format {
                OutputFormat::Human => print_link(&link),
                OutputFormat::Json => print_json(&link)?,
            }
            Ok(())
        }
        LinkCommand::Add(args) => {
            let block = require_block(store, &args.block)?;
            let page = require_page(store, &args.page)?;
            let link = store
                .create_link(block.id(), page.id())
                .with_context(|| format!("failed to link block {} to '{}'", block.id(), page.title()))?;
            match args.format {
                OutputFormat::Human => {
                    println!("Linked {} -> {} ({})", block.id(), page.title(), link.id())
                }
                OutputFormat::Json => print_json(&link)?,
            }
            Ok(())
        }
        LinkCommand::Rm(args) => {
            let id: LinkId = parse_id(&args.link, "link")?;
            store
                .delete_link(&id)
                .with_context(|| format!("failed to remove link {}", id))?;
            match args.format {
                OutputFormat::Human => println!("Removed link {}", id),
                OutputFormat::Json => print_json(&id)?,
            }
            Ok(())
        }
    }
}

fn print_link(link: &Link) {
    println!("id:      {}", link.id());
    println!("kind:    {}", link.kind());
    println!("block:   {}", link.source_block());
    println!("from:    {}", link.source_page());
    println!("to:      {}", link.target_page());
    println!("created: {}", link.created().format("%Y-%m-%d %H:%M"));
}
