//! Attribute maps and shared presentation options.
//!
//! Every component accepts an [`Appearance`] (variant, size, extra classes
//! and attributes) alongside its own options. The functions here turn those
//! values into concrete class/attribute data; there is no trait dispatch and
//! no fallback lookup, just structs in and maps out.

use crate::style::classes::ClassList;

// ---------------------------------------------------------------------------
// AttrMap
// ---------------------------------------------------------------------------

/// An insertion-ordered attribute map with last-wins assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttrMap {
    entries: Vec<(String, String)>,
}

impl AttrMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up an attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Remove an attribute. Returns `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    /// Merge `other` into `self`, later values winning.
    pub fn merge(&mut self, other: &AttrMap) {
        for (name, value) in &other.entries {
            self.set(name.clone(), value.clone());
        }
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for AttrMap {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut map = AttrMap::new();
        for (name, value) in iter {
            map.set(name, value);
        }
        map
    }
}

// ---------------------------------------------------------------------------
// Variants and sizes
// ---------------------------------------------------------------------------

/// Visual variant shared across the catalog.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Default,
    Accent,
    Outline,
    Ghost,
    Destructive,
}

impl Variant {
    /// The class token this variant contributes, if any.
    pub fn class(self) -> Option<&'static str> {
        match self {
            Variant::Default => None,
            Variant::Accent => Some("accent"),
            Variant::Outline => Some("outline"),
            Variant::Ghost => Some("ghost"),
            Variant::Destructive => Some("destructive"),
        }
    }
}

/// Control sizing shared across the catalog.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ControlSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl ControlSize {
    /// The class token this size contributes, if any.
    pub fn class(self) -> Option<&'static str> {
        match self {
            ControlSize::Sm => Some("size-sm"),
            ControlSize::Md => None,
            ControlSize::Lg => Some("size-lg"),
        }
    }
}

// ---------------------------------------------------------------------------
// Appearance
// ---------------------------------------------------------------------------

/// Presentation options every component recognizes.
///
/// `class` and `attrs` are free-form extras merged after the component's own
/// values, so callers win class-group conflicts and attribute collisions.
#[derive(Clone, Debug, Default)]
pub struct Appearance {
    pub variant: Variant,
    pub size: ControlSize,
    pub class: String,
    pub attrs: Vec<(String, String)>,
}

impl Appearance {
    /// Default appearance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the visual variant.
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the control size.
    pub fn size(mut self, size: ControlSize) -> Self {
        self.size = size;
        self
    }

    /// Append extra classes (whitespace-separated).
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if self.class.is_empty() {
            self.class = class;
        } else {
            self.class.push(' ');
            self.class.push_str(&class);
        }
        self
    }

    /// Append an extra attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Assemble the class list for a component part.
///
/// Order: the part's base classes, then variant/size tokens, then the
/// caller's extras, each stage merged with group dedup.
pub fn part_classes(base: &str, appearance: &Appearance) -> ClassList {
    let mut classes = ClassList::parse(base);
    if let Some(token) = appearance.variant.class() {
        classes.merge(token);
    }
    if let Some(token) = appearance.size.class() {
        classes.merge(token);
    }
    classes.merge(&appearance.class);
    classes
}

/// Assemble the attribute map binding a node to its controller.
///
/// `controller` names the owning controller kind, `part` the node's role
/// within it (trigger, content, item, ...). Caller extras apply last.
pub fn part_attrs(controller: &str, part: &str, appearance: &Appearance) -> AttrMap {
    let mut attrs = AttrMap::new();
    attrs.set("controller", controller);
    attrs.set("part", part);
    for (name, value) in &appearance.attrs {
        attrs.set(name.clone(), value.clone());
    }
    attrs
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // AttrMap
    // -----------------------------------------------------------------------

    #[test]
    fn set_inserts_and_replaces_in_place() {
        let mut attrs = AttrMap::new();
        attrs.set("part", "trigger");
        attrs.set("role", "button");
        attrs.set("part", "content");
        assert_eq!(attrs.get("part"), Some("content"));
        let order: Vec<_> = attrs.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["part", "role"]);
    }

    #[test]
    fn remove_reports_presence() {
        let mut attrs = AttrMap::new();
        attrs.set("role", "menu");
        assert!(attrs.remove("role"));
        assert!(!attrs.remove("role"));
        assert!(attrs.is_empty());
    }

    #[test]
    fn merge_later_wins() {
        let mut base: AttrMap = [("part", "item"), ("role", "menuitem")].into_iter().collect();
        let extra: AttrMap = [("role", "option"), ("title", "Cut")].into_iter().collect();
        base.merge(&extra);
        assert_eq!(base.get("role"), Some("option"));
        assert_eq!(base.get("title"), Some("Cut"));
        assert_eq!(base.len(), 3);
    }

    // -----------------------------------------------------------------------
    // Variants
    // -----------------------------------------------------------------------

    #[test]
    fn variant_class_tokens() {
        assert_eq!(Variant::Default.class(), None);
        assert_eq!(Variant::Ghost.class(), Some("ghost"));
        assert_eq!(Variant::Destructive.class(), Some("destructive"));
    }

    #[test]
    fn size_class_tokens() {
        assert_eq!(ControlSize::Md.class(), None);
        assert_eq!(ControlSize::Sm.class(), Some("size-sm"));
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    #[test]
    fn part_classes_orders_stages() {
        let appearance = Appearance::new()
            .variant(Variant::Outline)
            .size(ControlSize::Sm)
            .class("pad-4");
        let classes = part_classes("btn pad-2", &appearance);
        assert_eq!(classes.to_string(), "btn pad-4 outline size-sm");
    }

    #[test]
    fn part_classes_default_appearance_is_base_only() {
        let classes = part_classes("menu-item", &Appearance::new());
        assert_eq!(classes.to_string(), "menu-item");
    }

    #[test]
    fn part_attrs_user_extras_win() {
        let appearance = Appearance::new().attr("part", "override").attr("role", "menu");
        let attrs = part_attrs("dropdown-menu", "content", &appearance);
        assert_eq!(attrs.get("controller"), Some("dropdown-menu"));
        assert_eq!(attrs.get("part"), Some("override"));
        assert_eq!(attrs.get("role"), Some("menu"));
    }

    #[test]
    fn appearance_class_builder_accumulates() {
        let appearance = Appearance::new().class("a").class("b c");
        assert_eq!(appearance.class, "a b c");
    }
}
