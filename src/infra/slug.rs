//! Slug keys for page titles.

/// Converts a page title to its lookup key.
///
/// - Lowercases (unicode-aware)
/// - Whitespace, hyphens and underscores become hyphens
/// - Keeps only alphanumeric characters and hyphens
/// - Collapses consecutive hyphens
/// - Trims leading/trailing hyphens
///
/// Returns `None` when nothing is left, so titles such as `"!!!"` never
/// collapse onto a shared placeholder key.
///
/// # Examples
///
/// ```
/// use loam::infra::page_key;
///
/// assert_eq!(page_key("Project Ideas").as_deref(), Some("project-ideas"));
/// assert_eq!(page_key("  Hello,  World! ").as_deref(), Some("hello-world"));
/// assert_eq!(page_key("???"), None);
/// ```
pub fn page_key(title: &str) -> Option<String> {
    let mut key = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_hyphen && !key.is_empty() {
                key.push('-');
            }
            pending_hyphen = false;
            key.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
        // Punctuation is dropped without introducing a separator
    }

    if key.is_empty() { None } else { Some(key) }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===========================================
    // Basic Transformations
    // ===========================================

    #[test]
    fn page_key_lowercases() {
        assert_eq!(page_key("API Design").as_deref(), Some("api-design"));
        assert_eq!(page_key("CamelCase").as_deref(), Some("camelcase"));
    }

    #[test]
    fn page_key_replaces_separators_with_hyphens() {
        assert_eq!(page_key("foo bar_baz-qux").as_deref(), Some("foo-bar-baz-qux"));
        assert_eq!(page_key("tab\tseparated").as_deref(), Some("tab-separated"));
    }

    #[test]
    fn page_key_collapses_and_trims_hyphens() {
        assert_eq!(page_key("--a -- b--").as_deref(), Some("a-b"));
        assert_eq!(page_key("   spaced   out   ").as_deref(), Some("spaced-out"));
    }

    #[test]
    fn page_key_drops_punctuation() {
        assert_eq!(page_key("What's new?").as_deref(), Some("whats-new"));
        assert_eq!(page_key("C++ (lang)").as_deref(), Some("c-lang"));
    }

    // ===========================================
    // Unicode and Edge Cases
    // ===========================================

    #[test]
    fn page_key_keeps_unicode_letters() {
        assert_eq!(page_key("Café Notes").as_deref(), Some("café-notes"));
        assert_eq!(page_key("日本語").as_deref(), Some("日本語"));
    }

    #[test]
    fn page_key_distinguishes_unicode_titles() {
        assert_ne!(page_key("日本"), page_key("中国"));
    }

    #[test]
    fn page_key_is_none_without_alphanumerics() {
        assert_eq!(page_key(""), None);
        assert_eq!(page_key("   "), None);
        assert_eq!(page_key("!!! ---"), None);
    }

    #[test]
    fn page_key_is_case_insensitive() {
        assert_eq!(page_key("Foo"), page_key("FOO"));
        assert_eq!(page_key("Foo"), page_key("foo"));
    }

    #[test]
    fn page_key_does_not_truncate() {
        let title = "word ".repeat(40);
        let key = page_key(&title).unwrap();
        assert_eq!(key.split('-').count(), 40);
    }
}
