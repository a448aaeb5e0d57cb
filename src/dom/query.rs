//! Tree queries: by id, class, kind, data marker; generic predicate matching.
//!
//! Arena-wide queries iterate in slotmap order; the `_in` variants walk a
//! subtree depth-first, which is the order controllers and tests care about.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// Find the first node whose `id` field matches the given string.
    ///
    /// Iterates all nodes in the arena (not just the tree rooted at `root`).
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        self.iter_nodes()
            .find(|(_, data)| data.id.as_deref() == Some(id))
            .map(|(node_id, _)| node_id)
    }

    /// Find all nodes that have the given class token.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| data.has_class(class))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Find all nodes of the given kind.
    pub fn query_by_kind(&self, kind: &str) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| data.kind == kind)
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Find all nodes whose data marker `name` equals `value`.
    pub fn query_by_data(&self, name: &str, value: &str) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| data.data_is(name, value))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Find all nodes matching an arbitrary predicate.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Find all nodes in the subtree rooted at `root` (inclusive) matching a
    /// predicate, in depth-first order.
    pub fn query_in(&self, root: NodeId, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.walk_depth_first(root)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(|data| predicate(data)))
            .collect()
    }

    /// Find all nodes of the given kind within a subtree, depth-first.
    pub fn query_kind_in(&self, root: NodeId, kind: &str) -> Vec<NodeId> {
        self.query_in(root, |data| data.kind == kind)
    }

    /// Find the first node within a subtree carrying the given `part`
    /// attribute, depth-first.
    pub fn query_part_in(&self, root: NodeId, part: &str) -> Option<NodeId> {
        self.walk_depth_first(root)
            .into_iter()
            .find(|&id| {
                self.get(id)
                    .is_some_and(|data| data.attrs.get("part") == Some(part))
            })
    }

    /// Iterate over all `(NodeId, &NodeData)` pairs in the arena.
    ///
    /// This is a helper used by the query methods. It iterates in slotmap
    /// insertion order, which is deterministic but not tree-order.
    fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::node::NodeData;
    use crate::dom::tree::Dom;

    /// Build a test tree for queries:
    /// ```text
    ///       root (shell #root)
    ///      /    \
    ///  menu      panel
    /// (#edit     (#main
    ///  .surface)  .content)
    ///   / \
    /// cut  copy
    /// (menu-item  (menu-item
    ///  #cut        #copy
    ///  .accent)    state=checked)
    /// ```
    fn build_query_tree() -> Dom {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("shell").with_id("root"));
        let menu = dom.insert_child(
            root,
            NodeData::new("menu")
                .with_id("edit")
                .with_class("surface")
                .with_attr("part", "content"),
        );
        let _panel = dom.insert_child(
            root,
            NodeData::new("panel")
                .with_id("main")
                .with_class("content"),
        );
        let _cut = dom.insert_child(
            menu,
            NodeData::new("menu-item")
                .with_id("cut")
                .with_class("accent")
                .with_attr("part", "item"),
        );
        let _copy = dom.insert_child(
            menu,
            NodeData::new("menu-item")
                .with_id("copy")
                .with_data("state", "checked")
                .with_attr("part", "item"),
        );
        dom
    }

    #[test]
    fn query_by_id_found() {
        let dom = build_query_tree();
        let id = dom.query_by_id("edit");
        assert!(id.is_some());
        assert_eq!(dom.get(id.unwrap()).unwrap().kind, "menu");
    }

    #[test]
    fn query_by_id_not_found() {
        let dom = build_query_tree();
        assert!(dom.query_by_id("nonexistent").is_none());
    }

    #[test]
    fn query_by_class_single() {
        let dom = build_query_tree();
        let surfaces = dom.query_by_class("surface");
        assert_eq!(surfaces.len(), 1);
        assert_eq!(dom.get(surfaces[0]).unwrap().id.as_deref(), Some("edit"));
    }

    #[test]
    fn query_by_kind() {
        let dom = build_query_tree();
        assert_eq!(dom.query_by_kind("menu-item").len(), 2);
        assert_eq!(dom.query_by_kind("menu").len(), 1);
        assert!(dom.query_by_kind("slider").is_empty());
    }

    #[test]
    fn query_by_data() {
        let dom = build_query_tree();
        let checked = dom.query_by_data("state", "checked");
        assert_eq!(checked.len(), 1);
        assert_eq!(dom.get(checked[0]).unwrap().id.as_deref(), Some("copy"));
        assert!(dom.query_by_data("state", "open").is_empty());
    }

    #[test]
    fn query_all_custom_predicate() {
        let dom = build_query_tree();
        let results = dom.query_all(|data| {
            data.id.as_ref().is_some_and(|id| id.starts_with('c'))
        });
        // "cut" and "copy"
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn query_in_scopes_to_subtree() {
        let dom = build_query_tree();
        let menu = dom.query_by_id("edit").unwrap();
        let items = dom.query_in(menu, |data| data.kind == "menu-item");
        assert_eq!(items.len(), 2);
        // Depth-first order: cut before copy.
        assert_eq!(dom.get(items[0]).unwrap().id.as_deref(), Some("cut"));

        let panel = dom.query_by_id("main").unwrap();
        assert!(dom.query_kind_in(panel, "menu-item").is_empty());
    }

    #[test]
    fn query_part_in_finds_first_depth_first() {
        let dom = build_query_tree();
        let root = dom.root().unwrap();
        let content = dom.query_part_in(root, "content").unwrap();
        assert_eq!(dom.get(content).unwrap().id.as_deref(), Some("edit"));
        let item = dom.query_part_in(root, "item").unwrap();
        assert_eq!(dom.get(item).unwrap().id.as_deref(), Some("cut"));
        assert!(dom.query_part_in(root, "trigger").is_none());
    }

    #[test]
    fn query_on_empty_dom() {
        let dom = Dom::new();
        assert!(dom.query_by_id("x").is_none());
        assert!(dom.query_by_class("x").is_empty());
        assert!(dom.query_by_kind("x").is_empty());
        assert!(dom.query_all(|_| true).is_empty());
    }
}
