//! Slug-based page identifier with a date-derived form for daily notes.

use crate::infra::page_key;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DAILY_PREFIX: &str = "daily/";
const DAILY_FORMAT: &str = "%Y-%m-%d";

/// Stable identifier of a page.
///
/// Regular pages are keyed by the slug of their title, so two titles that
/// normalize to the same key address the same page. Daily notes are keyed
/// by their calendar date as `daily/YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use loam::domain::PageId;
///
/// let id = PageId::from_title("Project Ideas").unwrap();
/// assert_eq!(id.as_str(), "project-ideas");
///
/// let daily = PageId::daily(NaiveDate::from_ymd_opt(2025, 5, 18).unwrap());
/// assert_eq!(daily.as_str(), "daily/2025-05-18");
/// assert!(daily.is_daily());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(String);

/// Error returned when a title or id cannot name a page.
#[derive(Debug, Clone)]
pub struct ParsePageIdError {
    value: String,
    reason: &'static str,
}

impl ParsePageIdError {
    /// Returns the rejected input.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParsePageIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid page id '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ParsePageIdError {}

impl PageId {
    /// Derives the page id for a title.
    ///
    /// # Errors
    ///
    /// Fails when the title has no alphanumeric characters.
    pub fn from_title(title: &str) -> Result<Self, ParsePageIdError> {
        page_key(title).map(Self).ok_or_else(|| ParsePageIdError {
            value: title.to_string(),
            reason: "title must contain at least one letter or digit",
        })
    }

    /// The id of the daily note for `date`.
    pub fn daily(date: NaiveDate) -> Self {
        Self(format!("{}{}", DAILY_PREFIX, date.format(DAILY_FORMAT)))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for daily-note ids.
    pub fn is_daily(&self) -> bool {
        self.0.starts_with(DAILY_PREFIX)
    }

    /// The calendar date of a daily-note id.
    pub fn daily_date(&self) -> Option<NaiveDate> {
        let raw = self.0.strip_prefix(DAILY_PREFIX)?;
        NaiveDate::parse_from_str(raw, DAILY_FORMAT).ok()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageId(\"{}\")", self.0)
    }
}

/// Parses an already-normalized id.
///
/// Unlike [`PageId::from_title`] this does not slugify: `"Foo Bar"` is
/// rejected, `"foo-bar"` and `"daily/2025-05-18"` are accepted.
impl FromStr for PageId {
    type Err = ParsePageIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = s.strip_prefix(DAILY_PREFIX) {
            return NaiveDate::parse_from_str(raw, DAILY_FORMAT)
                .map(Self::daily)
                .map_err(|_| ParsePageIdError {
                    value: s.to_string(),
                    reason: "daily ids must look like daily/YYYY-MM-DD",
                });
        }

        match page_key(s) {
            Some(key) if key == s => Ok(Self(key)),
            _ => Err(ParsePageIdError {
                value: s.to_string(),
                reason: "not a normalized page key",
            }),
        }
    }
}

impl Serialize for PageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
