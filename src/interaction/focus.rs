//! Focus order and focus trapping.
//!
//! [`FocusOrder`] maintains the tab order of focusable, shown, non-disabled
//! nodes, rebuilt from the tree while preserving the current focus.
//! [`FocusTrap`] scopes that order to a container so Tab and Shift+Tab cycle
//! inside an open overlay, and remembers where focus came from so it can be
//! restored on deactivation.

use crate::dom::{Dom, NodeId};

// ---------------------------------------------------------------------------
// FocusOrder
// ---------------------------------------------------------------------------

/// Ordered list of focusable nodes for tab navigation.
///
/// Rebuilt from the tree whenever it changes; focus cycles forward (Tab)
/// and backward (BackTab), wrapping at both ends.
#[derive(Debug, Default)]
pub struct FocusOrder {
    /// Focusable nodes in tab order (depth-first).
    nodes: Vec<NodeId>,
    /// Index of the currently focused node, or `None` if no focus.
    current: Option<usize>,
}

impl FocusOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the whole tree. See [`FocusOrder::rebuild_within`].
    pub fn rebuild(&mut self, dom: &Dom) {
        match dom.root() {
            Some(root) => self.rebuild_within(dom, root),
            None => {
                self.nodes.clear();
                self.current = None;
            }
        }
    }

    /// Rebuild from the subtree under `scope`.
    ///
    /// Collects nodes that are focusable, not disabled, and shown (every
    /// ancestor visible). If the previously focused node is still present
    /// focus is preserved, otherwise it is cleared.
    pub fn rebuild_within(&mut self, dom: &Dom, scope: NodeId) {
        let previous = self.current();

        self.nodes.clear();
        self.current = None;

        for id in dom.walk_depth_first(scope) {
            if let Some(data) = dom.get(id) {
                if data.focusable && !data.disabled && dom.is_shown(id) {
                    self.nodes.push(id);
                }
            }
        }

        if let Some(old) = previous {
            if let Some(pos) = self.nodes.iter().position(|&n| n == old) {
                self.current = Some(pos);
            }
        }
    }

    /// The currently focused node, if any.
    pub fn current(&self) -> Option<NodeId> {
        self.current.and_then(|idx| self.nodes.get(idx).copied())
    }

    /// Move focus forward, wrapping last to first. `None` when empty.
    pub fn next(&mut self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(idx) => (idx + 1) % self.nodes.len(),
            None => 0,
        };
        self.current = Some(next);
        self.nodes.get(next).copied()
    }

    /// Move focus backward, wrapping first to last. `None` when empty.
    pub fn previous(&mut self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.nodes.len() - 1,
            Some(idx) => idx - 1,
        };
        self.current = Some(prev);
        self.nodes.get(prev).copied()
    }

    /// Focus a specific node. Returns `false` if it is not in the order.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if let Some(pos) = self.nodes.iter().position(|&n| n == id) {
            self.current = Some(pos);
            true
        } else {
            false
        }
    }

    /// Clear focus without touching the order.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// First node in the order, optionally skipping text-input nodes.
    ///
    /// With `skip_text_inputs`, nodes that accept free text are passed over
    /// so focusing a surface does not start capturing keystrokes; if every
    /// candidate accepts text, nothing is returned.
    pub fn first_eligible(&self, dom: &Dom, skip_text_inputs: bool) -> Option<NodeId> {
        if !skip_text_inputs {
            return self.nodes.first().copied();
        }
        self.nodes
            .iter()
            .copied()
            .find(|&id| dom.get(id).is_some_and(|data| !data.accepts_text))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FocusTrap
// ---------------------------------------------------------------------------

/// Activation options for a [`FocusTrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapOptions {
    /// Focus the first eligible element on activation.
    pub auto_focus: bool,
    /// During auto-focus, skip nodes that accept free text.
    pub skip_text_inputs: bool,
}

impl Default for TrapOptions {
    fn default() -> Self {
        Self { auto_focus: true, skip_text_inputs: false }
    }
}

/// Constrains tab cycling to the subtree under a container.
///
/// Traps nest: the runtime keeps a stack and routes Tab to the innermost
/// active trap. An empty focusable set is a no-op, never an error.
#[derive(Debug)]
pub struct FocusTrap {
    container: NodeId,
    options: TrapOptions,
    order: FocusOrder,
    prior: Option<NodeId>,
    active: bool,
}

impl FocusTrap {
    pub fn new(container: NodeId, options: TrapOptions) -> Self {
        Self {
            container,
            options,
            order: FocusOrder::new(),
            prior: None,
            active: false,
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate the trap, recording `prior` as the node to restore focus to.
    ///
    /// Returns the auto-focused node, if the options ask for one and an
    /// eligible node exists.
    pub fn activate(&mut self, dom: &Dom, prior: Option<NodeId>) -> Option<NodeId> {
        self.prior = prior;
        self.active = true;
        self.order.rebuild_within(dom, self.container);

        if !self.options.auto_focus {
            return None;
        }
        let first = self
            .order
            .first_eligible(dom, self.options.skip_text_inputs)?;
        self.order.focus(first);
        Some(first)
    }

    /// Deactivate and return the node focus should move back to: the
    /// explicit override when given, otherwise the node recorded at
    /// activation. Idempotent.
    pub fn deactivate(&mut self, restore_to: Option<NodeId>) -> Option<NodeId> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.order.clear();
        restore_to.or(self.prior.take())
    }

    /// The node currently focused inside the trap.
    pub fn current(&self) -> Option<NodeId> {
        self.order.current()
    }

    /// Cycle forward within the container, wrapping last to first.
    pub fn next(&mut self, dom: &Dom) -> Option<NodeId> {
        self.order.rebuild_within(dom, self.container);
        self.order.next()
    }

    /// Cycle backward within the container, wrapping first to last.
    pub fn previous(&mut self, dom: &Dom) -> Option<NodeId> {
        self.order.rebuild_within(dom, self.container);
        self.order.previous()
    }

    /// Focus a specific node inside the trap.
    pub fn focus(&mut self, dom: &Dom, id: NodeId) -> bool {
        self.order.rebuild_within(dom, self.container);
        self.order.focus(id)
    }

    /// Whether `node` lives inside the trapped subtree.
    pub fn contains(&self, dom: &Dom, node: NodeId) -> bool {
        dom.is_within(node, self.container)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeData;

    fn item(kind: &str) -> NodeData {
        NodeData::new(kind).focusable(true)
    }

    // ── FocusOrder ───────────────────────────────────────────────────

    #[test]
    fn rebuild_collects_focusable_nodes_in_tree_order() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("shell"));
        dom.set_root(root);
        let a = dom.insert_child(root, item("button"));
        let _label = dom.insert_child(root, NodeData::new("label"));
        let b = dom.insert_child(root, item("button"));

        let mut order = FocusOrder::new();
        order.rebuild(&dom);
        assert_eq!(order.len(), 2);
        assert!(order.current().is_none());
        assert_eq!(order.next(), Some(a));
        assert_eq!(order.next(), Some(b));
    }

    #[test]
    fn rebuild_preserves_current_focus() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("shell"));
        dom.set_root(root);
        let _a = dom.insert_child(root, item("button"));
        let b = dom.insert_child(root, item("button"));

        let mut order = FocusOrder::new();
        order.rebuild(&dom);
        order.next();
        order.next();
        assert_eq!(order.current(), Some(b));

        dom.insert_child(root, item("button"));
        order.rebuild(&dom);
        assert_eq!(order.current(), Some(b));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn rebuild_skips_disabled_and_hidden() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("shell"));
        dom.set_root(root);
        let _a = dom.insert_child(root, item("button"));
        let _b = dom.insert_child(root, item("button").disabled(true));
        let hidden_panel = dom.insert_child(root, NodeData::new("panel"));
        let _c = dom.insert_child(hidden_panel, item("button"));
        dom.set_visible(hidden_panel, false);

        let mut order = FocusOrder::new();
        order.rebuild(&dom);
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("shell"));
        dom.set_root(root);
        let a = dom.insert_child(root, item("button"));
        let b = dom.insert_child(root, item("button"));

        let mut order = FocusOrder::new();
        order.rebuild(&dom);
        assert_eq!(order.next(), Some(a));
        assert_eq!(order.next(), Some(b));
        assert_eq!(order.next(), Some(a));
        assert_eq!(order.previous(), Some(b));
        assert_eq!(order.previous(), Some(a));
    }

    #[test]
    fn previous_with_no_focus_goes_to_last() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("shell"));
        dom.set_root(root);
        let _a = dom.insert_child(root, item("button"));
        let b = dom.insert_child(root, item("button"));

        let mut order = FocusOrder::new();
        order.rebuild(&dom);
        assert_eq!(order.previous(), Some(b));
    }

    #[test]
    fn empty_order_cycles_to_nothing() {
        let mut order = FocusOrder::new();
        assert!(order.next().is_none());
        assert!(order.previous().is_none());
        assert!(order.is_empty());
    }

    #[test]
    fn first_eligible_can_skip_text_inputs() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("form"));
        dom.set_root(root);
        let _search = dom.insert_child(root, item("input").accepts_text(true));
        let button = dom.insert_child(root, item("button"));

        let mut order = FocusOrder::new();
        order.rebuild(&dom);
        assert_eq!(order.first_eligible(&dom, true), Some(button));
    }

    #[test]
    fn first_eligible_empty_when_everything_accepts_text() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("form"));
        dom.set_root(root);
        let input = dom.insert_child(root, item("input").accepts_text(true));

        let mut order = FocusOrder::new();
        order.rebuild(&dom);
        assert_eq!(order.first_eligible(&dom, true), None);
        assert_eq!(order.first_eligible(&dom, false), Some(input));
    }

    // ── FocusTrap ────────────────────────────────────────────────────

    fn dialog_tree() -> (Dom, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("shell"));
        dom.set_root(root);
        let outside = dom.insert_child(root, item("button"));
        let dialog = dom.insert_child(root, NodeData::new("dialog"));
        let confirm = dom.insert_child(dialog, item("button"));
        let cancel = dom.insert_child(dialog, item("button"));
        (dom, outside, dialog, confirm, cancel)
    }

    #[test]
    fn activate_auto_focuses_and_records_prior() {
        let (dom, outside, dialog, confirm, cancel) = dialog_tree();
        let mut trap = FocusTrap::new(dialog, TrapOptions::default());

        assert_eq!(trap.activate(&dom, Some(outside)), Some(confirm));
        assert!(trap.is_active());
        assert_eq!(trap.current(), Some(confirm));

        let _ = cancel;
        assert_eq!(trap.deactivate(None), Some(outside));
        assert!(!trap.is_active());
    }

    #[test]
    fn tab_cycles_only_inside_the_container() {
        let (dom, _outside, dialog, confirm, cancel) = dialog_tree();
        let mut trap = FocusTrap::new(dialog, TrapOptions::default());
        trap.activate(&dom, None);

        assert_eq!(trap.next(&dom), Some(cancel));
        assert_eq!(trap.next(&dom), Some(confirm));
        assert_eq!(trap.previous(&dom), Some(cancel));
    }

    #[test]
    fn deactivate_override_wins_over_recorded_prior() {
        let (dom, outside, dialog, confirm, _cancel) = dialog_tree();
        let mut trap = FocusTrap::new(dialog, TrapOptions::default());
        trap.activate(&dom, Some(outside));
        assert_eq!(trap.deactivate(Some(confirm)), Some(confirm));
    }

    #[test]
    fn deactivate_twice_restores_once() {
        let (dom, outside, dialog, _confirm, _cancel) = dialog_tree();
        let mut trap = FocusTrap::new(dialog, TrapOptions::default());
        trap.activate(&dom, Some(outside));
        assert_eq!(trap.deactivate(None), Some(outside));
        assert_eq!(trap.deactivate(None), None);
    }

    #[test]
    fn auto_focus_skips_text_inputs_when_asked() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("shell"));
        dom.set_root(root);
        let dialog = dom.insert_child(root, NodeData::new("dialog"));
        let _filter = dom.insert_child(dialog, item("input").accepts_text(true));
        let apply = dom.insert_child(dialog, item("button"));

        let options = TrapOptions { auto_focus: true, skip_text_inputs: true };
        let mut trap = FocusTrap::new(dialog, options);
        assert_eq!(trap.activate(&dom, None), Some(apply));
    }

    #[test]
    fn empty_container_activates_as_a_no_op() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("shell"));
        dom.set_root(root);
        let dialog = dom.insert_child(root, NodeData::new("dialog"));

        let mut trap = FocusTrap::new(dialog, TrapOptions::default());
        assert_eq!(trap.activate(&dom, None), None);
        assert!(trap.is_active());
        assert_eq!(trap.next(&dom), None);
    }

    #[test]
    fn contains_matches_the_subtree() {
        let (dom, outside, dialog, confirm, _cancel) = dialog_tree();
        let trap = FocusTrap::new(dialog, TrapOptions::default());
        assert!(trap.contains(&dom, confirm));
        assert!(trap.contains(&dom, dialog));
        assert!(!trap.contains(&dom, outside));
    }
}
