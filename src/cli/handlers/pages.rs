//! Page command handlers (new, show, ls, rename, rm, graph, backlinks).

use anyhow::{Context, Result};

use super::resolve::require_page;
use super::truncate_str;
use crate::cli::PageCommand;
use crate::cli::output::{OutputFormat, PageView, print_json, print_outline, print_page_table};
use crate::domain::{EdgeDirection, NodeRole, Page};
use crate::store::{
    BlockRepository, DeleteSummary, LinkRepository, PageRepository, SqliteStore,
};

pub fn handle_page(command: &PageCommand, store: &mut SqliteStore) -> Result<()> {
    match command {
        PageCommand::New(args) => {
            let page = store
                .create_page(&args.title)
                .with_context(|| format!("failed to create page '{}'", args.title))?;
            match args.format {
                OutputFormat::Human => println!("Created page {} ({})", page.title(), page.id()),
                OutputFormat::Json => print_json(&page)?,
            }
            Ok(())
        }
        PageCommand::Show(args) => {
            let page = require_page(store, &args.page)?;
            show_page(store, &page, args.format)
        }
        PageCommand::Ls(args) => {
            let pages = store
                .list_pages(args.filter.as_deref())
                .with_context(|| "failed to list pages")?;
            print_pages(&pages, args.format)
        }
        PageCommand::Rename(args) => {
            let page = require_page(store, &args.page)?;
            let renamed = store
                .rename_page(page.id(), &args.title)
                .with_context(|| format!("failed to rename page '{}'", page.title()))?;
            match args.format {
                OutputFormat::Human => println!(
                    "Renamed '{}' to '{}' ({})",
                    page.title(),
                    renamed.title(),
                    renamed.id()
                ),
                OutputFormat::Json => print_json(&renamed)?,
            }
            Ok(())
        }
        PageCommand::Rm(args) => {
            let page = require_page(store, &args.page)?;
            let summary = store
                .delete_page(page.id())
                .with_context(|| format!("failed to delete page '{}'", page.title()))?;
            match args.format {
                OutputFormat::Human => {
                    println!("Deleted page {}", page.title());
                    print_summary(&summary);
                }
                OutputFormat::Json => print_json(summary)?,
            }
            Ok(())
        }
        PageCommand::Graph(args) => {
            let page = require_page(store, &args.page)?;
            let graph = store
                .page_graph(page.id())
                .with_context(|| "failed to assemble page graph")?;
            match args.format {
                OutputFormat::Human => {
                    for node in &graph.nodes {
                        let marker = match node.role {
                            NodeRole::Current => "*",
                            NodeRole::Outgoing => "->",
                            NodeRole::Incoming => "<-",
                        };
                        println!("{:<2} {} ({})", marker, node.title, node.id);
                    }
                    let outgoing = graph
                        .edges
                        .iter()
                        .filter(|e| e.direction == EdgeDirection::Outgoing)
                        .count();
                    println!();
                    println!(
                        "{} outgoing, {} incoming",
                        outgoing,
                        graph.edges.len() - outgoing
                    );
                }
                OutputFormat::Json => print_json(&graph)?,
            }
            Ok(())
        }
        PageCommand::Backlinks(args) => {
            let page = require_page(store, &args.page)?;
            let refs = store
                .backlinks(page.id())
                .with_context(|| "failed to query backlinks")?;
            match args.format {
                OutputFormat::Human => {
                    if refs.is_empty() {
                        println!("No backlinks found.");
                    } else {
                        for r in &refs {
                            println!(
                                "{:<30}  {}  [{}]",
                                truncate_str(r.page.title(), 30),
                                truncate_str(r.block.content(), 60),
                                r.block.id()
                            );
                        }
                        println!();
                        println!("{} backlink(s)", refs.len());
                    }
                }
                OutputFormat::Json => print_json(&refs)?,
            }
            Ok(())
        }
    }
}

/// Prints a page and its outline.
pub(crate) fn show_page(store: &SqliteStore, page: &Page, format: OutputFormat) -> Result<()> {
    let outline = store
        .page_tree(page.id())
        .with_context(|| format!("failed to load blocks of '{}'", page.title()))?
        .outline();
    match format {
        OutputFormat::Human => {
            println!("# {}", page.title());
            println!();
            if outline.is_empty() {
                println!("(no blocks)");
            } else {
                print_outline(&outline);
            }
        }
        OutputFormat::Json => print_json(PageView {
            page,
            outline: &outline,
        })?,
    }
    Ok(())
}

/// Prints a list of pages in the requested format.
pub(crate) fn print_pages(pages: &[Page], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if pages.is_empty() {
                println!("No pages found.");
            } else {
                print_page_table(pages);
                println!();
                println!("{} page(s)", pages.len());
            }
        }
        OutputFormat::Json => print_json(pages)?,
    }
    Ok(())
}

pub(crate) fn print_summary(summary: &DeleteSummary) {
    println!(
        "  removed {} block(s), {} link(s), {} block reference(s), {} alignment mark(s)",
        summary.blocks, summary.links, summary.block_refs, summary.alignments
    );
}
