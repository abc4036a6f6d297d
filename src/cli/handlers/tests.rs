use super::*;
use crate::cli::output::OutputFormat;
use crate::cli::{
    BlockArgs, BlockCommand, BlockEditArgs, BlockRefAddArgs, BlockRefCommand, DailyArgs,
    LinkAddArgs, LinkCommand, PageArgs, PageCommand, PageRenameArgs,
};
use crate::domain::{BlockId, PageId};
use crate::infra::FixedClock;
use crate::store::{
    BlockRefRepository, BlockRepository, LinkRepository, PageRepository, SqliteStore,
};
use chrono::{DateTime, NaiveDate, Utc};
use pretty_assertions::assert_eq;

// Test helpers
fn test_datetime() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-05-18T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn test_store() -> SqliteStore {
    SqliteStore::open_in_memory()
        .unwrap()
        .with_clock(FixedClock::new(test_datetime()))
}

fn block_args(block: &BlockId) -> BlockArgs {
    BlockArgs {
        block: block.to_string(),
        format: OutputFormat::Human,
    }
}

fn page_args(page: &str) -> PageArgs {
    PageArgs {
        page: page.to_string(),
        format: OutputFormat::Json,
    }
}

// ===========================================
// resolve_page tests
// ===========================================

#[test]
fn resolve_page_by_title_key_and_id() {
    let mut store = test_store();
    let page = store.create_page("Reading List").unwrap();

    for identifier in ["Reading List", "reading list", "reading-list", "  Reading List "] {
        let found = resolve_page(&store, identifier).unwrap().unwrap();
        assert_eq!(found.id(), page.id());
    }
}

#[test]
fn resolve_page_finds_daily_notes_by_id_and_title() {
    let mut store = test_store();
    store
        .ensure_daily_note(NaiveDate::from_ymd_opt(2025, 5, 18).unwrap())
        .unwrap();

    let by_id = resolve_page(&store, "daily/2025-05-18").unwrap().unwrap();
    let by_title = resolve_page(&store, "May 18th, 2025").unwrap().unwrap();
    assert_eq!(by_id, by_title);
}

#[test]
fn require_page_fails_for_unknown_page() {
    let store = test_store();
    let err = require_page(&store, "Nowhere").unwrap_err();
    assert!(err.to_string().contains("page not found"));
}

// ===========================================
// resolve_block tests
// ===========================================

#[test]
fn resolve_block_by_full_id_and_prefix() {
    let mut store = test_store();
    let page = store.create_page("P").unwrap();
    let block = store.create_block(page.id(), "x", None, None).unwrap();
    let full = block.id().to_string();

    match resolve_block(&store, &full).unwrap() {
        ResolveResult::Unique(found) => assert_eq!(found.id(), block.id()),
        other => panic!("expected unique match, got {:?}", other),
    }
    match resolve_block(&store, &full[..16].to_lowercase()).unwrap() {
        ResolveResult::Unique(found) => assert_eq!(found.id(), block.id()),
        other => panic!("expected unique match, got {:?}", other),
    }
}

#[test]
fn resolve_block_rejects_short_prefixes() {
    let mut store = test_store();
    let page = store.create_page("P").unwrap();
    let block = store.create_block(page.id(), "x", None, None).unwrap();

    let short = &block.id().to_string()[..3];
    assert!(matches!(
        resolve_block(&store, short).unwrap(),
        ResolveResult::NotFound
    ));
}

#[test]
fn resolve_block_reports_ambiguous_prefix() {
    let mut store = test_store();
    let page = store.create_page("P").unwrap();
    let a = store.create_block(page.id(), "a", None, None).unwrap();
    let b = store.create_block(page.id(), "b", None, None).unwrap();

    let a_str = a.id().to_string();
    let b_str = b.id().to_string();
    let shared = a_str
        .chars()
        .zip(b_str.chars())
        .take_while(|(x, y)| x == y)
        .count();
    if shared < 4 {
        // Generated in different milliseconds far enough apart; nothing to test.
        return;
    }
    match resolve_block(&store, &a_str[..shared]).unwrap() {
        ResolveResult::Ambiguous(blocks) => assert_eq!(blocks.len(), 2),
        other => panic!("expected ambiguous match, got {:?}", other),
    }
}

#[test]
fn require_block_fails_for_unknown_id() {
    let store = test_store();
    let err = require_block(&store, &BlockId::new().to_string()).unwrap_err();
    assert!(err.to_string().contains("block not found"));
}

#[test]
fn parse_id_names_the_kind() {
    let err = parse_id::<BlockId>("not-a-ulid", "block").unwrap_err();
    assert!(err.to_string().contains("invalid block id"));
    assert!(parse_id::<PageId>("daily/2025-05-18", "page").is_ok());
}

// ===========================================
// handler tests
// ===========================================

#[test]
fn handle_page_rename_keeps_id() {
    let mut store = test_store();
    let page = store.create_page("Draft").unwrap();

    let command = PageCommand::Rename(PageRenameArgs {
        page: "Draft".to_string(),
        title: "Final".to_string(),
        format: OutputFormat::Json,
    });
    handle_page(&command, &mut store).unwrap();

    let renamed = store.get_page(page.id()).unwrap().unwrap();
    assert_eq!(renamed.title(), "Final");
}

#[test]
fn handle_page_rm_removes_page() {
    let mut store = test_store();
    store.create_page("Scratch").unwrap();

    handle_page(&PageCommand::Rm(page_args("Scratch")), &mut store).unwrap();
    assert!(store.find_page("Scratch").unwrap().is_none());
}

#[test]
fn handle_page_show_fails_for_missing_page() {
    let mut store = test_store();
    assert!(handle_page(&PageCommand::Show(page_args("Missing")), &mut store).is_err());
}

#[test]
fn handle_block_indent_and_outdent() {
    let mut store = test_store();
    let page = store.create_page("P").unwrap();
    let x = store.create_block(page.id(), "X", None, None).unwrap();
    let y = store.create_block(page.id(), "Y", None, None).unwrap();

    handle_block(&BlockCommand::Indent(block_args(y.id())), &mut store).unwrap();
    let indented = store.get_block(y.id()).unwrap().unwrap();
    assert_eq!(indented.parent_id(), Some(x.id()));

    handle_block(&BlockCommand::Outdent(block_args(y.id())), &mut store).unwrap();
    assert!(store.get_block(y.id()).unwrap().unwrap().is_root());
}

#[test]
fn handle_block_edit_requires_a_change() {
    let mut store = test_store();
    let page = store.create_page("P").unwrap();
    let block = store.create_block(page.id(), "X", None, None).unwrap();

    let command = BlockCommand::Edit(BlockEditArgs {
        block: block.id().to_string(),
        content: None,
        parent: None,
        root: false,
        order: None,
        format: OutputFormat::Human,
    });
    let err = handle_block(&command, &mut store).unwrap_err();
    assert!(err.to_string().contains("nothing to change"));
}

#[test]
fn handle_block_edit_reindexes_content() {
    let mut store = test_store();
    let page = store.create_page("P").unwrap();
    let block = store.create_block(page.id(), "X", None, None).unwrap();

    let command = BlockCommand::Edit(BlockEditArgs {
        block: block.id().to_string(),
        content: Some("see [[Elsewhere]]".to_string()),
        parent: None,
        root: false,
        order: None,
        format: OutputFormat::Json,
    });
    handle_block(&command, &mut store).unwrap();

    let links = store.block_links(block.id()).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target_page().as_str(), "elsewhere");
}

#[test]
fn handle_link_add_creates_explicit_link() {
    let mut store = test_store();
    let page = store.create_page("P").unwrap();
    store.create_page("Target").unwrap();
    let block = store.create_block(page.id(), "X", None, None).unwrap();

    let command = LinkCommand::Add(LinkAddArgs {
        block: block.id().to_string(),
        page: "Target".to_string(),
        format: OutputFormat::Human,
    });
    handle_link(&command, &mut store).unwrap();
    assert_eq!(store.block_links(block.id()).unwrap().len(), 1);

    // Adding the same pair again conflicts.
    assert!(handle_link(&command, &mut store).is_err());
}

#[test]
fn handle_block_ref_add_resolves_both_blocks() {
    let mut store = test_store();
    let page = store.create_page("P").unwrap();
    let source = store.create_block(page.id(), "a", None, None).unwrap();
    let target = store.create_block(page.id(), "b", None, None).unwrap();

    let command = BlockCommand::Ref(BlockRefCommand::Add(BlockRefAddArgs {
        source: source.id().to_string(),
        target: target.id().to_string()[..20].to_string(),
        format: OutputFormat::Json,
    }));
    handle_block(&command, &mut store).unwrap();

    let refs = store.list_block_refs(Some(source.id())).unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(&refs[0].target, target.id());

    // Same pair again conflicts.
    assert!(handle_block(&command, &mut store).is_err());
}

#[test]
fn handle_daily_creates_note_for_date() {
    let mut store = test_store();
    let args = DailyArgs {
        date: NaiveDate::from_ymd_opt(2025, 1, 2),
        format: OutputFormat::Json,
    };
    handle_daily(&args, &mut store).unwrap();

    let page = store.find_page("January 2nd, 2025").unwrap().unwrap();
    assert_eq!(page.id().as_str(), "daily/2025-01-02");
}
