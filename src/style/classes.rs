//! Ordered, duplicate-free class lists with utility-group merging.
//!
//! Class tokens are plain strings ("menu-item", "pad-2"). A token whose last
//! `-` segment is a value (a number or a scale word like `sm`/`full`) belongs
//! to a utility group named by the stem: `pad-2` and `pad-4` are both `pad`.
//! Merging a token into a list replaces an earlier member of the same group
//! in place, so later config wins without reordering or duplication.

// ---------------------------------------------------------------------------
// Utility groups
// ---------------------------------------------------------------------------

/// Scale words that count as a value segment alongside plain numbers.
const SCALE_WORDS: &[&str] = &[
    "xs", "sm", "md", "lg", "xl", "2xl", "full", "half", "auto", "none",
];

fn is_value_segment(segment: &str) -> bool {
    if segment.is_empty() {
        return false;
    }
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    SCALE_WORDS.contains(&segment)
}

/// The utility group of a class token, if it has one.
///
/// `pad-2` → `Some("pad")`, `w-full` → `Some("w")`, `accent` → `None`,
/// `menu-item` → `None` (the trailing segment is not a value).
pub fn utility_group(token: &str) -> Option<&str> {
    let (stem, last) = token.rsplit_once('-')?;
    if stem.is_empty() || !is_value_segment(last) {
        return None;
    }
    Some(stem)
}

// ---------------------------------------------------------------------------
// ClassList
// ---------------------------------------------------------------------------

/// An ordered set of class tokens.
///
/// Exact duplicates are never stored twice. [`ClassList::merge`] additionally
/// collapses utility-group conflicts so callers can append config classes
/// without inspecting what a component already set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Create an empty class list.
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Parse a whitespace-separated class string, merging left to right.
    pub fn parse(classes: &str) -> Self {
        let mut list = Self::new();
        list.merge(classes);
        list
    }

    /// Append a single token if it is not already present.
    ///
    /// Returns `true` if the token was added. This is the exact-duplicate
    /// check only; use [`merge`](Self::merge) for group-aware insertion.
    pub fn add(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if token.is_empty() || self.contains(&token) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Remove a token. Returns `true` if it was present.
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Add the token if absent, remove it if present. Returns the new
    /// presence state.
    pub fn toggle(&mut self, token: &str) -> bool {
        if self.remove(token) {
            false
        } else {
            self.tokens.push(token.to_string());
            true
        }
    }

    /// Whether the exact token is present.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Merge a whitespace-separated class string into the list.
    ///
    /// For each incoming token: an exact duplicate is dropped; a token whose
    /// utility group matches an existing member replaces that member in
    /// place; anything else appends.
    pub fn merge(&mut self, classes: &str) {
        for token in classes.split_whitespace() {
            if self.contains(token) {
                continue;
            }
            if let Some(group) = utility_group(token) {
                if let Some(slot) = self
                    .tokens
                    .iter()
                    .position(|t| utility_group(t) == Some(group))
                {
                    self.tokens[slot] = token.to_string();
                    continue;
                }
            }
            self.tokens.push(token.to_string());
        }
    }

    /// Iterate tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.as_str())
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the list has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for token in &self.tokens {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
            first = false;
        }
        Ok(())
    }
}

/// Merge two class strings into one, later classes winning group conflicts.
pub fn merge_classes(base: &str, extra: &str) -> ClassList {
    let mut list = ClassList::parse(base);
    list.merge(extra);
    list
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Utility groups
    // -----------------------------------------------------------------------

    #[test]
    fn group_numeric_value() {
        assert_eq!(utility_group("pad-2"), Some("pad"));
        assert_eq!(utility_group("gap-12"), Some("gap"));
    }

    #[test]
    fn group_scale_value() {
        assert_eq!(utility_group("w-full"), Some("w"));
        assert_eq!(utility_group("text-sm"), Some("text"));
        assert_eq!(utility_group("rounded-2xl"), Some("rounded"));
    }

    #[test]
    fn group_multi_segment_stem() {
        assert_eq!(utility_group("min-w-10"), Some("min-w"));
    }

    #[test]
    fn no_group_for_structural_tokens() {
        assert_eq!(utility_group("accent"), None);
        assert_eq!(utility_group("menu-item"), None);
        assert_eq!(utility_group("empty-state"), None);
    }

    #[test]
    fn no_group_for_bare_or_dangling() {
        assert_eq!(utility_group("pad-"), None);
        assert_eq!(utility_group("-2"), None);
    }

    // -----------------------------------------------------------------------
    // ClassList — add/remove/toggle
    // -----------------------------------------------------------------------

    #[test]
    fn add_rejects_duplicates() {
        let mut list = ClassList::new();
        assert!(list.add("accent"));
        assert!(!list.add("accent"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn add_rejects_empty() {
        let mut list = ClassList::new();
        assert!(!list.add(""));
        assert!(list.is_empty());
    }

    #[test]
    fn remove_reports_presence() {
        let mut list = ClassList::parse("a b c");
        assert!(list.remove("b"));
        assert!(!list.remove("b"));
        assert_eq!(list.to_string(), "a c");
    }

    #[test]
    fn toggle_roundtrip() {
        let mut list = ClassList::new();
        assert!(list.toggle("open"));
        assert!(list.contains("open"));
        assert!(!list.toggle("open"));
        assert!(!list.contains("open"));
    }

    // -----------------------------------------------------------------------
    // ClassList — merge semantics
    // -----------------------------------------------------------------------

    #[test]
    fn parse_dedups_exact_tokens() {
        let list = ClassList::parse("btn btn accent");
        assert_eq!(list.to_string(), "btn accent");
    }

    #[test]
    fn merge_replaces_group_member_in_place() {
        let mut list = ClassList::parse("menu-item pad-2 accent");
        list.merge("pad-4");
        assert_eq!(list.to_string(), "menu-item pad-4 accent");
    }

    #[test]
    fn merge_appends_unrelated_tokens() {
        let mut list = ClassList::parse("pad-2");
        list.merge("accent w-full");
        assert_eq!(list.to_string(), "pad-2 accent w-full");
    }

    #[test]
    fn merge_scale_over_numeric() {
        let mut list = ClassList::parse("w-10");
        list.merge("w-full");
        assert_eq!(list.to_string(), "w-full");
    }

    #[test]
    fn merge_keeps_structural_lookalikes() {
        // "menu-item" has no value segment, so "menu-2" must not replace it
        // and vice versa.
        let mut list = ClassList::parse("menu-item");
        list.merge("menu-2");
        assert_eq!(list.to_string(), "menu-item menu-2");
    }

    #[test]
    fn merge_classes_helper() {
        let merged = merge_classes("btn pad-2", "pad-6 ghost");
        assert_eq!(merged.to_string(), "btn pad-6 ghost");
    }

    #[test]
    fn display_empty_list() {
        assert_eq!(ClassList::new().to_string(), "");
    }
}
