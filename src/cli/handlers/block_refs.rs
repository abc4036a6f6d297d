//! Block reference handlers (block ref ls, show, add, rm).

use anyhow::{Context, Result, bail};

use super::resolve::{parse_id, require_block};
use crate::cli::BlockRefCommand;
use crate::cli::output::{OutputFormat, print_json};
use crate::domain::{BlockRef, BlockRefId};
use crate::store::{BlockRefRepository, SqliteStore};

pub fn handle_block_ref(command: &BlockRefCommand, store: &mut SqliteStore) -> Result<()> {
    match command {
        BlockRefCommand::Ls(args) => {
            let refs = match &args.block {
                Some(block) => {
                    let block = require_block(store, block)?;
                    store.list_block_refs(Some(block.id()))?
                }
                None => store
                    .list_block_refs(None)
                    .with_context(|| "failed to list block references")?,
            };
            match args.format {
                OutputFormat::Human => {
                    if refs.is_empty() {
                        println!("No block references found.");
                    } else {
                        println!("{:<26}  {:<26}  {:<26}", "ID", "From", "To");
                        let rule = "-".repeat(26);
                        println!("{:<26}  {:<26}  {:<26}", rule, rule, rule);
                        for reference in &refs {
                            println!(
                                "{:<26}  {:<26}  {:<26}",
                                reference.id.to_string(),
                                reference.source.to_string(),
                                reference.target.to_string()
                            );
                        }
                        println!();
                        println!("{} block reference(s)", refs.len());
                    }
                }
                OutputFormat::Json => print_json(&refs)?,
            }
            Ok(())
        }
        BlockRefCommand::Show(args) => {
            let id: BlockRefId = parse_id(&args.reference, "block reference")?;
            let Some(reference) = store.get_block_ref(&id)? else {
                bail!("block reference not found: {}", id);
            };
            match args.format {
                OutputFormat::Human => print_block_ref(&reference),
                OutputFormat::Json => print_json(&reference)?,
            }
            Ok(())
        }
        BlockRefCommand::Add(args) => {
            let source = require_block(store, &args.source)?;
            let target = require_block(store, &args.target)?;
            let reference = store
                .create_block_ref(source.id(), target.id())
                .with_context(|| {
                    format!("failed to reference block {} from {}", target.id(), source.id())
                })?;
            match args.format {
                OutputFormat::Human => println!(
                    "Referenced {} -> {} ({})",
                    source.id(),
                    target.id(),
                    reference.id
                ),
                OutputFormat::Json => print_json(&reference)?,
            }
            Ok(())
        }
        BlockRefCommand::Rm(args) => {
            let id: BlockRefId = parse_id(&args.reference, "block reference")?;
            store
                .delete_block_ref(&id)
                .with_context(|| format!("failed to remove block reference {}", id))?;
            match args.format {
                OutputFormat::Human => println!("Removed block reference {}", id),
                OutputFormat::Json => print_json(&id)?,
            }
            Ok(())
        }
    }
}

fn print_block_ref(reference: &BlockRef) {
    println!("id:      {}", reference.id);
    println!("from:    {}", reference.source);
    println!("to:      {}", reference.target);
    println!("created: {}", reference.created.format("%Y-%m-%d %H:%M"));
}
