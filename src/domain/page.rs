//! Pages and daily-note naming.

use crate::domain::PageId;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

/// A titled document holding a tree of blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    id: PageId,
    title: String,
    is_daily: bool,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl Page {
    pub fn new(
        id: PageId,
        title: impl Into<String>,
        is_daily: bool,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            is_daily,
            created,
            updated,
        }
    }

    /// Returns the page's stable identifier.
    pub fn id(&self) -> &PageId {
        &self.id
    }

    /// Returns the human-readable title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// True for date-keyed daily notes.
    pub fn is_daily(&self) -> bool {
        self.is_daily
    }

    /// Returns when the page was created.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Returns when the page or one of its blocks last changed.
    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }
}

/// Formats the title of a daily note, e.g. `May 18th, 2025`.
pub fn daily_title(date: NaiveDate) -> String {
    let day = date.day();
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        day,
        ordinal_suffix(day),
        date.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
