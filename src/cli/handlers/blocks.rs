//! Block command handlers.

use anyhow::{Context, Result, bail};

use super::block_refs::handle_block_ref;
use super::pages::print_summary;
use super::resolve::{require_block, require_page};
use crate::cli::output::{BlockView, OutputFormat, format_offset, print_json};
use crate::cli::{BlockCommand, BlockEditArgs};
use crate::domain::{Block, BlockPatch};
use crate::store::{AudioRepository, BlockRepository, LinkRepository, SqliteStore};

pub fn handle_block(command: &BlockCommand, store: &mut SqliteStore) -> Result<()> {
    match command {
        BlockCommand::Add(args) => {
            let page = require_page(store, &args.page)?;
            let parent = match &args.parent {
                Some(parent) => Some(require_block(store, parent)?),
                None => None,
            };
            let block = store
                .create_block(
                    page.id(),
                    &args.content,
                    parent.as_ref().map(Block::id),
                    args.order,
                )
                .with_context(|| format!("failed to add block to '{}'", page.title()))?;
            print_block(&block, args.format, "Added")
        }
        BlockCommand::Show(args) => {
            let block = require_block(store, &args.block)?;
            let links = store.block_links(block.id())?;
            let alignments = store.alignments_for_block(block.id())?;
            match args.format {
                OutputFormat::Human => {
                    println!("{}", block.content());
                    println!();
                    println!("id:      {}", block.id());
                    println!("page:    {}", block.page_id());
                    if let Some(parent) = block.parent_id() {
                        println!("parent:  {}", parent);
                    }
                    println!("order:   {}", block.order());
                    println!("updated: {}", block.updated().format("%Y-%m-%d %H:%M"));
                    for link in &links {
                        println!("link:    -> {} ({})", link.target_page(), link.kind());
                    }
                    for entry in &alignments {
                        println!(
                            "audio:   {} @ {}",
                            entry.recording_id,
                            format_offset(entry.offset_ms)
                        );
                    }
                }
                OutputFormat::Json => print_json(BlockView {
                    block: &block,
                    links: &links,
                    alignments: &alignments,
                })?,
            }
            Ok(())
        }
        BlockCommand::Edit(args) => {
            let block = require_block(store, &args.block)?;
            let patch = build_patch(store, args)?;
            if patch.is_empty() {
                bail!("nothing to change: pass --content, --parent, --root or --order");
            }
            let updated = store
                .update_block(block.id(), &patch)
                .with_context(|| format!("failed to edit block {}", block.id()))?;
            print_block(&updated, args.format, "Updated")
        }
        BlockCommand::Indent(args) => {
            let block = require_block(store, &args.block)?;
            let moved = store
                .indent_block(block.id())
                .with_context(|| format!("failed to indent block {}", block.id()))?;
            print_block(&moved, args.format, "Indented")
        }
        BlockCommand::Outdent(args) => {
            let block = require_block(store, &args.block)?;
            let moved = store
                .outdent_block(block.id())
                .with_context(|| format!("failed to outdent block {}", block.id()))?;
            print_block(&moved, args.format, "Outdented")
        }
        BlockCommand::Rm(args) => {
            let block = require_block(store, &args.block)?;
            let summary = store
                .delete_block(block.id())
                .with_context(|| format!("failed to delete block {}", block.id()))?;
            match args.format {
                OutputFormat::Human => {
                    println!("Deleted block {}", block.id());
                    print_summary(&summary);
                }
                OutputFormat::Json => print_json(summary)?,
            }
            Ok(())
        }
        BlockCommand::Audio(args) => {
            let block = require_block(store, &args.block)?;
            let alignments = store.alignments_for_block(block.id())?;
            match args.format {
                OutputFormat::Human => {
                    if alignments.is_empty() {
                        println!("No recordings aligned with this block.");
                    }
                    for entry in &alignments {
                        println!(
                            "{}  {:>12}  [{}]",
                            entry.recording_id,
                            format_offset(entry.offset_ms),
                            entry.id
                        );
                    }
                }
                OutputFormat::Json => print_json(&alignments)?,
            }
            Ok(())
        }
        BlockCommand::Ref(command) => handle_block_ref(command, store),
    }
}

fn build_patch(store: &SqliteStore, args: &BlockEditArgs) -> Result<BlockPatch> {
    let parent = if args.root {
        Some(None)
    } else {
        match &args.parent {
            Some(parent) => Some(Some(require_block(store, parent)?.id().clone())),
            None => None,
        }
    };
    Ok(BlockPatch {
        content: args.content.clone(),
        parent,
        order: args.order,
    })
}

fn print_block(block: &Block, format: OutputFormat, verb: &str) -> Result<()> {
    match format {
        OutputFormat::Human => {
            let parent = block
                .parent_id()
                .map_or_else(|| "top level".to_string(), |p| format!("under {}", p));
            println!(
                "{} block {} on {} ({}, order {})",
                verb,
                block.id(),
                block.page_id(),
                parent,
                block.order()
            );
        }
        OutputFormat::Json => print_json(block)?,
    }
    Ok(())
}
