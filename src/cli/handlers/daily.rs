//! Daily note and calendar handlers.

use anyhow::{Context, Result};
use chrono::Datelike;

use super::pages::show_page;
use crate::cli::output::{CalendarListing, OutputFormat, print_json};
use crate::cli::{CalendarArgs, DailyArgs};
use crate::store::{PageRepository, SqliteStore};

pub fn handle_daily(args: &DailyArgs, store: &mut SqliteStore) -> Result<()> {
    let page = match args.date {
        Some(date) => store.ensure_daily_note(date),
        None => store.ensure_today_note(),
    }
    .with_context(|| "failed to open daily note")?;
    show_page(store, &page, args.format)
}

pub fn handle_calendar(args: &CalendarArgs, store: &SqliteStore) -> Result<()> {
    let dates = store
        .daily_calendar(args.year, args.month)
        .with_context(|| format!("failed to read calendar for {}-{:02}", args.year, args.month))?;
    let listing = CalendarListing {
        year: args.year,
        month: args.month,
        days: dates.iter().map(|d| d.day()).collect(),
    };

    match args.format {
        OutputFormat::Human => {
            if listing.days.is_empty() {
                println!("No daily notes in {}-{:02}.", args.year, args.month);
            } else {
                for date in &dates {
                    println!("{}", date.format("%Y-%m-%d"));
                }
            }
        }
        OutputFormat::Json => print_json(&listing)?,
    }
    Ok(())
}
