//! Node types: NodeId, NodeData, DataMap.

use slotmap::new_key_type;

use crate::style::{AttrMap, ClassList};

new_key_type! {
    /// Unique identifier for a tree node. Copy, lightweight (u64).
    pub struct NodeId;
}

// ---------------------------------------------------------------------------
// DataMap
// ---------------------------------------------------------------------------

/// Named finite-state markers on a node (`state=open`, `checked=true`,
/// `side=bottom`, ...). Hosts read these for styling; controllers and tests
/// read them for behavior queries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataMap {
    entries: Vec<(String, String)>,
}

impl DataMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Set a marker, replacing an existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up a marker value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a marker. Returns `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    /// Whether the marker is present with exactly this value.
    pub fn is(&self, name: &str, value: &str) -> bool {
        self.get(name) == Some(value)
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// NodeData
// ---------------------------------------------------------------------------

/// Data associated with a single tree node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Element kind (e.g. "dropdown-menu", "menu-item").
    pub kind: String,
    /// Optional unique id.
    pub id: Option<String>,
    /// Class tokens.
    pub classes: ClassList,
    /// Controller-binding and free-form attributes.
    pub attrs: AttrMap,
    /// Finite-state markers (open/closed, checked, side, ...).
    pub data: DataMap,
    /// Text content (labels, values).
    pub text: Option<String>,
    /// Whether this node is visible.
    pub visible: bool,
    /// Whether this node can receive focus.
    pub focusable: bool,
    /// Whether this node is disabled.
    pub disabled: bool,
    /// Whether focusing this node starts text editing (inputs).
    pub accepts_text: bool,
}

impl NodeData {
    /// Create a new `NodeData` with the given kind and sensible defaults.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            classes: ClassList::new(),
            attrs: AttrMap::new(),
            data: DataMap::new(),
            text: None,
            visible: true,
            focusable: false,
            disabled: false,
            accepts_text: false,
        }
    }

    /// Set the unique id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Merge classes from a whitespace-separated string (builder).
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.merge(class);
        self
    }

    /// Replace the class list (builder).
    pub fn with_classes(mut self, classes: ClassList) -> Self {
        self.classes = classes;
        self
    }

    /// Set an attribute (builder).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.set(name, value);
        self
    }

    /// Replace the attribute map (builder).
    pub fn with_attrs(mut self, attrs: AttrMap) -> Self {
        self.attrs = attrs;
        self
    }

    /// Set a data marker (builder).
    pub fn with_data(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.set(name, value);
        self
    }

    /// Set the text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set whether this node can receive focus (builder).
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Set whether this node is disabled (builder).
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Mark this node as a text-editing target (builder).
    pub fn accepts_text(mut self, accepts_text: bool) -> Self {
        self.accepts_text = accepts_text;
        self
    }

    /// Check whether this node has a given class token.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Look up a data marker.
    pub fn data(&self, name: &str) -> Option<&str> {
        self.data.get(name)
    }

    /// Set a data marker.
    pub fn set_data(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.data.set(name, value);
    }

    /// Whether a data marker has exactly this value.
    pub fn data_is(&self, name: &str, value: &str) -> bool {
        self.data.is(name, value)
    }

    /// Text content, or an empty string when unset.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults() {
        let data = NodeData::new("menu-item");
        assert_eq!(data.kind, "menu-item");
        assert!(data.id.is_none());
        assert!(data.classes.is_empty());
        assert!(data.attrs.is_empty());
        assert!(data.data.is_empty());
        assert!(data.text.is_none());
        assert!(data.visible);
        assert!(!data.focusable);
        assert!(!data.disabled);
        assert!(!data.accepts_text);
    }

    #[test]
    fn builder_with_id() {
        let data = NodeData::new("dialog").with_id("confirm");
        assert_eq!(data.id.as_deref(), Some("confirm"));
    }

    #[test]
    fn builder_with_class_merges() {
        let data = NodeData::new("btn").with_class("pad-2").with_class("pad-4 accent");
        assert_eq!(data.classes.to_string(), "pad-4 accent");
    }

    #[test]
    fn builder_with_attr() {
        let data = NodeData::new("x").with_attr("part", "trigger");
        assert_eq!(data.attrs.get("part"), Some("trigger"));
    }

    #[test]
    fn builder_flags() {
        let data = NodeData::new("input").focusable(true).disabled(true).accepts_text(true);
        assert!(data.focusable);
        assert!(data.disabled);
        assert!(data.accepts_text);
    }

    #[test]
    fn data_markers() {
        let mut data = NodeData::new("content").with_data("state", "closed");
        assert!(data.data_is("state", "closed"));
        data.set_data("state", "open");
        assert_eq!(data.data("state"), Some("open"));
        assert!(!data.data_is("state", "closed"));
    }

    #[test]
    fn data_map_remove() {
        let mut map = DataMap::new();
        map.set("side", "bottom");
        assert!(map.remove("side"));
        assert!(!map.remove("side"));
        assert_eq!(map.get("side"), None);
    }

    #[test]
    fn data_map_set_replaces_in_place() {
        let mut map = DataMap::new();
        map.set("state", "closed");
        map.set("checked", "true");
        map.set("state", "open");
        let order: Vec<_> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["state", "checked"]);
        assert!(map.is("state", "open"));
    }

    #[test]
    fn text_accessor_defaults_empty() {
        let data = NodeData::new("label");
        assert_eq!(data.text(), "");
        let data = data.with_text("Cut");
        assert_eq!(data.text(), "Cut");
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
