//! `[[Page Name]]` reference extraction.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Non-greedy: the first `]]` after an opening `[[` closes the reference.
static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\[(.*?)\]\]").expect("reference pattern is valid"));

/// Extracts every `[[name]]` reference from `text`.
///
/// Names are returned verbatim in order of appearance, duplicates included.
/// Text without references yields an empty vector.
///
/// # Examples
///
/// ```
/// use loam::domain::extract_references;
///
/// let refs = extract_references("See [[B]] and [[B]], then [[C D]]");
/// assert_eq!(refs, vec!["B", "B", "C D"]);
/// ```
pub fn extract_references(text: &str) -> Vec<String> {
    REFERENCE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Distinct, trimmed, non-blank reference names in order of first appearance.
///
/// This is the parse phase of link reindexing: no page lookups happen here.
/// Names that differ only by case or punctuation stay distinct at this
/// point and collapse later when resolved to page keys.
pub fn distinct_references(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_references(text)
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
