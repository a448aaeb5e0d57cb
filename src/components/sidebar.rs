//! Sidebar: a collapsible navigation rail.
//!
//! Expanded it shows icon + label rows; collapsed it keeps the icon rail
//! and hides the labels, so every row stays reachable. Ctrl+B toggles the
//! state whenever focus is anywhere inside the sidebar, as does the toggle
//! affordance in its header. Arrow keys rove across rows and wrap.

use tracing::trace;

use crate::controller::{Controller, Handled};
use crate::dom::{Dom, NodeData, NodeId};
use crate::event::{Key, KeyEvent, Modifiers, MouseEvent};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

/// One navigation row.
#[derive(Clone, Debug)]
pub struct SidebarItem {
    icon: String,
    label: String,
    disabled: bool,
}

impl SidebarItem {
    pub fn new(icon: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Configuration for a [`Sidebar`].
#[derive(Clone, Debug, Default)]
pub struct SidebarConfig {
    items: Vec<SidebarItem>,
    collapsed: bool,
    appearance: Appearance,
    id: Option<String>,
}

impl SidebarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, item: SidebarItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = SidebarItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

struct Row {
    button: NodeId,
    label: NodeId,
}

/// Collapsible navigation rail.
pub struct Sidebar {
    config: SidebarConfig,
    root: NodeId,
    toggle: NodeId,
    rows: Vec<Row>,
    collapsed: bool,
    selected: Option<usize>,
}

impl Sidebar {
    pub fn new(config: SidebarConfig) -> Self {
        let collapsed = config.collapsed;
        Self {
            config,
            root: NodeId::default(),
            toggle: NodeId::default(),
            rows: Vec::new(),
            collapsed,
            selected: None,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected.map(|i| self.config.items[i].label.as_str())
    }

    pub fn toggle_button(&self) -> NodeId {
        self.toggle
    }

    pub fn item(&self, index: usize) -> NodeId {
        self.rows[index].button
    }

    // ── Collapse / expand ────────────────────────────────────────────

    fn set_collapsed(&mut self, ctx: &mut Ctx<'_>, collapsed: bool) {
        trace!(collapsed, "sidebar toggled");
        self.collapsed = collapsed;
        ctx.dom
            .set_data(self.root, "state", if collapsed { "collapsed" } else { "expanded" });
        ctx.dom.set_text(self.toggle, if collapsed { "»" } else { "«" });
        for row in &self.rows {
            ctx.dom.set_visible(row.label, !collapsed);
        }
    }

    // ── Rows ─────────────────────────────────────────────────────────

    fn row_index(&self, dom: &Dom, node: NodeId) -> Option<usize> {
        self.rows.iter().position(|row| dom.is_within(node, row.button))
    }

    fn enabled(&self, dom: &Dom) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| dom.get(row.button).is_some_and(|d| !d.disabled))
            .map(|(i, _)| i)
            .collect()
    }

    /// Wrap across enabled rows.
    fn move_focus(&mut self, ctx: &mut Ctx<'_>, from: usize, delta: i32) {
        let enabled = self.enabled(ctx.dom);
        if enabled.is_empty() {
            return;
        }
        let at = enabled.iter().position(|&i| i == from).unwrap_or(0);
        let next = (at as i32 + delta).rem_euclid(enabled.len() as i32) as usize;
        ctx.focus(self.rows[enabled[next]].button);
    }

    fn select(&mut self, ctx: &mut Ctx<'_>, index: usize) {
        let button = self.rows[index].button;
        if ctx.dom.get(button).is_some_and(|d| d.disabled) {
            return;
        }
        trace!(label = %self.config.items[index].label, "sidebar row selected");
        if let Some(old) = self.selected {
            ctx.dom.remove_data(self.rows[old].button, "selected");
        }
        self.selected = Some(index);
        ctx.dom.set_data(button, "selected", "true");
    }
}

impl Controller for Sidebar {
    fn kind(&self) -> &'static str {
        "sidebar"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("sidebar")
            .with_classes(part_classes("border-r", &self.config.appearance))
            .with_attrs(part_attrs("sidebar", "root", &self.config.appearance))
            .with_data("state", "expanded");
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        self.root = ctx.dom.insert_child(parent, root_data);

        let header = ctx.dom.insert_child(
            self.root,
            NodeData::new("group")
                .with_attrs(part_attrs("sidebar", "header", &Appearance::default())),
        );
        self.toggle = ctx.dom.insert_child(
            header,
            NodeData::new("button")
                .with_attrs(part_attrs("sidebar", "toggle", &Appearance::default()))
                .with_text("«")
                .focusable(true),
        );

        let nav = ctx.dom.insert_child(
            self.root,
            NodeData::new("nav")
                .with_attrs(part_attrs("sidebar", "content", &Appearance::default())),
        );
        for item in &self.config.items {
            let button = ctx.dom.insert_child(
                nav,
                NodeData::new("button")
                    .with_attrs(part_attrs("sidebar", "item", &Appearance::default()))
                    .focusable(true)
                    .disabled(item.disabled),
            );
            ctx.dom.insert_child(
                button,
                NodeData::new("text").with_text(&item.icon),
            );
            let label = ctx.dom.insert_child(
                button,
                NodeData::new("text").with_text(&item.label),
            );
            self.rows.push(Row { button, label });
        }

        if self.config.collapsed {
            self.set_collapsed(ctx, true);
        }
        self.root
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        // Ctrl+B toggles from anywhere inside the sidebar.
        if event.code == Key::Char('b') && event.modifiers.contains(Modifiers::CTRL) {
            let next = !self.collapsed;
            self.set_collapsed(ctx, next);
            return Handled::Yes;
        }
        let Some(focused) = ctx.focused() else {
            return Handled::No;
        };
        if focused == self.toggle && matches!(event.code, Key::Enter | Key::Char(' ')) {
            let next = !self.collapsed;
            self.set_collapsed(ctx, next);
            return Handled::Yes;
        }
        let Some(index) = self.row_index(ctx.dom, focused) else {
            return Handled::No;
        };
        match event.code {
            Key::Down => {
                self.move_focus(ctx, index, 1);
                Handled::Yes
            }
            Key::Up => {
                self.move_focus(ctx, index, -1);
                Handled::Yes
            }
            Key::Home => {
                if let Some(&first) = self.enabled(ctx.dom).first() {
                    ctx.focus(self.rows[first].button);
                }
                Handled::Yes
            }
            Key::End => {
                if let Some(&last) = self.enabled(ctx.dom).last() {
                    ctx.focus(self.rows[last].button);
                }
                Handled::Yes
            }
            Key::Enter | Key::Char(' ') => {
                self.select(ctx, index);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if event.is_press() {
            if ctx.dom.is_within(target, self.root) {
                return Handled::Yes;
            }
            return Handled::No;
        }
        if event.is_release() {
            if ctx.dom.is_within(target, self.toggle) {
                let next = !self.collapsed;
                self.set_collapsed(ctx, next);
                return Handled::Yes;
            }
            if let Some(index) = self.row_index(ctx.dom, target) {
                self.select(ctx, index);
                return Handled::Yes;
            }
        }
        Handled::No
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;
    use crate::geometry::Region;
    use crate::ui::Ui;

    fn shell() -> (Ui, NodeId) {
        let mut ui = Ui::new(Region::new(0, 0, 80, 24));
        let root = ui.dom.insert(NodeData::new("shell"));
        ui.dom.set_root(root);
        (ui, root)
    }

    fn mounted(ui: &mut Ui, root: NodeId) -> crate::controller::Mounted<Sidebar> {
        let config = SidebarConfig::new()
            .item(SidebarItem::new("⌂", "Home"))
            .item(SidebarItem::new("⚙", "Settings").disabled(true))
            .item(SidebarItem::new("✉", "Inbox"));
        let handle = ui.mount(Sidebar::new(config), root);
        let (toggle_button, items) = {
            let s = ui.controller(&handle).unwrap();
            (s.toggle_button(), [s.item(0), s.item(1), s.item(2)])
        };
        ui.regions.set(toggle_button, Region::new(0, 0, 2, 1));
        for (i, item) in items.into_iter().enumerate() {
            ui.regions.set(item, Region::new(0, 2 + i as i32, 20, 1));
        }
        handle
    }

    fn key(ui: &mut Ui, code: Key) {
        ui.handle_input(InputEvent::Key(KeyEvent::plain(code)));
    }

    fn ctrl_b(ui: &mut Ui) {
        ui.handle_input(InputEvent::Key(KeyEvent::new(Key::Char('b'), Modifiers::CTRL)));
    }

    #[test]
    fn ctrl_b_toggles_while_focus_is_inside() {
        let (mut ui, root) = shell();
        let outside = ui
            .dom
            .insert_child(root, NodeData::new("button").with_text("Elsewhere").focusable(true));
        let sidebar = mounted(&mut ui, root);
        let s = ui.controller(&sidebar).unwrap();
        let (home, node) = (s.item(0), sidebar.root());
        ui.focus(home);

        ctrl_b(&mut ui);
        let s = ui.controller(&sidebar).unwrap();
        assert!(s.is_collapsed());
        assert!(ui.dom.data_is(node, "state", "collapsed"));

        ctrl_b(&mut ui);
        assert!(!ui.controller(&sidebar).unwrap().is_collapsed());

        // From outside the subtree the shortcut goes nowhere.
        ui.focus(outside);
        ctrl_b(&mut ui);
        assert!(!ui.controller(&sidebar).unwrap().is_collapsed());
    }

    #[test]
    fn collapsing_hides_labels_but_keeps_the_icon_rail() {
        let (mut ui, root) = shell();
        let sidebar = mounted(&mut ui, root);
        let s = ui.controller(&sidebar).unwrap();
        let home = s.item(0);
        let label = *ui.dom.children(home).last().unwrap();
        let icon = ui.dom.children(home)[0];
        ui.focus(home);

        ctrl_b(&mut ui);
        assert!(!ui.dom.is_shown(label));
        assert!(ui.dom.is_shown(icon));

        // Rows still select while collapsed.
        key(&mut ui, Key::Down);
        key(&mut ui, Key::Enter);
        assert_eq!(ui.controller(&sidebar).unwrap().selected_label(), Some("Inbox"));

        ctrl_b(&mut ui);
        assert!(ui.dom.is_shown(label));
    }

    #[test]
    fn the_toggle_affordance_collapses_and_expands() {
        let (mut ui, root) = shell();
        let sidebar = mounted(&mut ui, root);
        let toggle = ui.controller(&sidebar).unwrap().toggle_button();

        ui.handle_input(InputEvent::Mouse(MouseEvent::down(0, 0)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(0, 0)));
        assert!(ui.controller(&sidebar).unwrap().is_collapsed());
        assert_eq!(ui.dom.text(toggle), "»");

        ui.handle_input(InputEvent::Mouse(MouseEvent::down(0, 0)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(0, 0)));
        assert!(!ui.controller(&sidebar).unwrap().is_collapsed());
        assert_eq!(ui.dom.text(toggle), "«");
    }

    #[test]
    fn arrows_rove_across_enabled_rows_and_wrap() {
        let (mut ui, root) = shell();
        let sidebar = mounted(&mut ui, root);
        let s = ui.controller(&sidebar).unwrap();
        let (home, inbox) = (s.item(0), s.item(2));
        ui.focus(home);

        key(&mut ui, Key::Down); // skips the disabled row
        assert_eq!(ui.focused(), Some(inbox));
        key(&mut ui, Key::Down); // wraps
        assert_eq!(ui.focused(), Some(home));
        key(&mut ui, Key::Up);
        assert_eq!(ui.focused(), Some(inbox));
        key(&mut ui, Key::Home);
        assert_eq!(ui.focused(), Some(home));
    }

    #[test]
    fn selection_is_exclusive_and_clicks_select() {
        let (mut ui, root) = shell();
        let sidebar = mounted(&mut ui, root);
        let s = ui.controller(&sidebar).unwrap();
        let (home, inbox) = (s.item(0), s.item(2));
        ui.focus(home);

        key(&mut ui, Key::Enter);
        assert!(ui.dom.data_is(home, "selected", "true"));

        ui.handle_input(InputEvent::Mouse(MouseEvent::down(0, 4)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(0, 4)));
        let s = ui.controller(&sidebar).unwrap();
        assert_eq!(s.selected_label(), Some("Inbox"));
        assert!(ui.dom.data_is(inbox, "selected", "true"));
        assert_eq!(ui.dom.data(home, "selected"), None);
    }

    #[test]
    fn a_sidebar_can_start_collapsed() {
        let (mut ui, root) = shell();
        let config = SidebarConfig::new()
            .item(SidebarItem::new("⌂", "Home"))
            .collapsed(true);
        let sidebar = ui.mount(Sidebar::new(config), root);
        let s = ui.controller(&sidebar).unwrap();
        assert!(s.is_collapsed());
        assert!(ui.dom.data_is(sidebar.root(), "state", "collapsed"));
        assert_eq!(ui.dom.text(s.toggle_button()), "»");
    }
}
