//! Toggle and ToggleGroup: pressed/unpressed buttons.
//!
//! A lone toggle flips between `on` and `off`. A group in single mode keeps
//! at most one member on, unpressing the previous one; multiple mode leaves
//! members independent. Disabled members ignore input entirely.

use crate::controller::{Controller, Handled};
use crate::dom::{Dom, NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseEvent};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

/// Configuration for a [`Toggle`].
#[derive(Clone, Debug)]
pub struct ToggleConfig {
    label: String,
    pressed: bool,
    disabled: bool,
    appearance: Appearance,
    id: Option<String>,
}

impl ToggleConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pressed: false,
            disabled: false,
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn pressed(mut self, pressed: bool) -> Self {
        self.pressed = pressed;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
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

/// Two-state button; the root node is the control.
pub struct Toggle {
    config: ToggleConfig,
    root: NodeId,
    pressed: bool,
}

impl Toggle {
    pub fn new(config: ToggleConfig) -> Self {
        let pressed = config.pressed;
        Self { config, root: NodeId::default(), pressed }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn flip(&mut self, ctx: &mut Ctx<'_>) {
        self.pressed = !self.pressed;
        let state = if self.pressed { "on" } else { "off" };
        ctx.dom.set_data(self.root, "state", state);
    }

    fn disabled(&self, dom: &Dom) -> bool {
        dom.get(self.root).is_some_and(|d| d.disabled)
    }
}

impl Controller for Toggle {
    fn kind(&self) -> &'static str {
        "toggle"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut data = NodeData::new("button")
            .with_classes(part_classes("border rounded pad-x-1", &self.config.appearance))
            .with_attrs(part_attrs("toggle", "root", &self.config.appearance))
            .with_text(&self.config.label)
            .focusable(true)
            .disabled(self.config.disabled)
            .with_data("state", if self.pressed { "on" } else { "off" });
        if let Some(id) = &self.config.id {
            data = data.with_id(id.clone());
        }
        self.root = ctx.dom.insert_child(parent, data);
        self.root
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        if ctx.focused() != Some(self.root) || self.disabled(ctx.dom) {
            return Handled::No;
        }
        match event.code {
            Key::Enter | Key::Char(' ') => {
                self.flip(ctx);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if !ctx.dom.is_within(target, self.root) || self.disabled(ctx.dom) {
            return Handled::No;
        }
        if event.is_press() {
            return Handled::Yes;
        }
        if event.is_release() {
            self.flip(ctx);
            return Handled::Yes;
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

// ---------------------------------------------------------------------------
// ToggleGroup
// ---------------------------------------------------------------------------

/// How many members of a group may be on at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleMode {
    /// At most one member on; pressing it again turns it off.
    Single,
    /// Members toggle independently.
    Multiple,
}

/// One member of a [`ToggleGroup`].
#[derive(Clone, Debug)]
pub struct ToggleGroupItem {
    label: String,
    pressed: bool,
    disabled: bool,
}

impl ToggleGroupItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), pressed: false, disabled: false }
    }

    pub fn pressed(mut self, pressed: bool) -> Self {
        self.pressed = pressed;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Configuration for a [`ToggleGroup`].
#[derive(Clone, Debug)]
pub struct ToggleGroupConfig {
    mode: ToggleMode,
    items: Vec<ToggleGroupItem>,
    appearance: Appearance,
    id: Option<String>,
}

impl ToggleGroupConfig {
    pub fn new(mode: ToggleMode) -> Self {
        Self {
            mode,
            items: Vec::new(),
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn item(mut self, item: ToggleGroupItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: Vec<ToggleGroupItem>) -> Self {
        self.items = items;
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

/// Row of toggles with optional mutual exclusion.
pub struct ToggleGroup {
    config: ToggleGroupConfig,
    items: Vec<NodeId>,
    pressed: Vec<bool>,
}

impl ToggleGroup {
    pub fn new(config: ToggleGroupConfig) -> Self {
        let pressed = config.items.iter().map(|i| i.pressed).collect();
        Self { config, items: Vec::new(), pressed }
    }

    pub fn mode(&self) -> ToggleMode {
        self.config.mode
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    pub fn is_pressed(&self, index: usize) -> bool {
        self.pressed.get(index).copied().unwrap_or(false)
    }

    /// Indices of the members currently on.
    pub fn pressed_indices(&self) -> Vec<usize> {
        self.pressed
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(i, _)| i)
            .collect()
    }

    fn set_pressed(&mut self, ctx: &mut Ctx<'_>, index: usize, on: bool) {
        let Some(&node) = self.items.get(index) else {
            return;
        };
        self.pressed[index] = on;
        ctx.dom.set_data(node, "state", if on { "on" } else { "off" });
    }

    fn toggle(&mut self, ctx: &mut Ctx<'_>, index: usize) {
        let was_on = self.pressed[index];
        if self.config.mode == ToggleMode::Single && !was_on {
            // Turning a member on turns the previous one off.
            for i in 0..self.pressed.len() {
                if self.pressed[i] {
                    self.set_pressed(ctx, i, false);
                }
            }
        }
        self.set_pressed(ctx, index, !was_on);
    }

    fn index_of(&self, node: NodeId) -> Option<usize> {
        self.items.iter().position(|&i| i == node)
    }

    fn enabled_indices(&self, dom: &Dom) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, &item)| dom.get(item).is_some_and(|d| !d.disabled))
            .map(|(i, _)| i)
            .collect()
    }

    /// Move focus to the neighboring enabled member, wrapping.
    fn move_focus(&mut self, ctx: &mut Ctx<'_>, from: usize, delta: i64) {
        let enabled = self.enabled_indices(ctx.dom);
        if enabled.is_empty() {
            return;
        }
        let pos = enabled.iter().position(|&i| i == from).unwrap_or(0);
        let next = enabled[(pos as i64 + delta).rem_euclid(enabled.len() as i64) as usize];
        if let Some(&node) = self.items.get(next) {
            ctx.focus(node);
        }
    }
}

impl Controller for ToggleGroup {
    fn kind(&self) -> &'static str {
        "toggle-group"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("toggle-group")
            .with_classes(part_classes("row gap-1", &self.config.appearance))
            .with_attrs(part_attrs("toggle-group", "root", &self.config.appearance))
            .with_data(
                "mode",
                match self.config.mode {
                    ToggleMode::Single => "single",
                    ToggleMode::Multiple => "multiple",
                },
            );
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        for (index, item) in self.config.items.iter().enumerate() {
            let node = ctx.dom.insert_child(
                root,
                NodeData::new("button")
                    .with_classes(part_classes("border pad-x-1", &Appearance::default()))
                    .with_attrs(part_attrs("toggle-group", "item", &Appearance::default()))
                    .with_text(&item.label)
                    .focusable(true)
                    .disabled(item.disabled)
                    .with_data("state", if self.pressed[index] { "on" } else { "off" }),
            );
            self.items.push(node);
        }
        root
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        let Some(focused) = ctx.focused() else {
            return Handled::No;
        };
        let Some(index) = self.index_of(focused) else {
            return Handled::No;
        };
        match event.code {
            Key::Enter | Key::Char(' ') => {
                if !ctx.dom.get(focused).is_some_and(|d| d.disabled) {
                    self.toggle(ctx, index);
                }
                Handled::Yes
            }
            Key::Left => {
                self.move_focus(ctx, index, -1);
                Handled::Yes
            }
            Key::Right => {
                self.move_focus(ctx, index, 1);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        let Some(index) = self.index_of(target) else {
            return Handled::No;
        };
        if ctx.dom.get(target).is_some_and(|d| d.disabled) {
            return Handled::No;
        }
        if event.is_press() {
            return Handled::Yes;
        }
        if event.is_release() {
            self.toggle(ctx, index);
            return Handled::Yes;
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

    fn key(ui: &mut Ui, code: Key) {
        ui.handle_input(InputEvent::Key(KeyEvent::plain(code)));
    }

    // ── Toggle ───────────────────────────────────────────────────────

    #[test]
    fn activating_twice_returns_to_the_original_state() {
        let (mut ui, root) = shell();
        let toggle = ui.mount(Toggle::new(ToggleConfig::new("Bold")), root);
        let node = ui.controller(&toggle).unwrap().root();
        ui.focus(node);
        assert!(ui.dom.data_is(node, "state", "off"));

        key(&mut ui, Key::Enter);
        assert!(ui.dom.data_is(node, "state", "on"));
        assert!(ui.controller(&toggle).unwrap().is_pressed());

        key(&mut ui, Key::Enter);
        assert!(ui.dom.data_is(node, "state", "off"));
        assert!(!ui.controller(&toggle).unwrap().is_pressed());
    }

    #[test]
    fn click_toggles_on_release() {
        let (mut ui, root) = shell();
        let toggle = ui.mount(Toggle::new(ToggleConfig::new("Italic")), root);
        let node = ui.controller(&toggle).unwrap().root();
        ui.regions.set(node, Region::new(2, 1, 8, 1));

        ui.handle_input(InputEvent::Mouse(MouseEvent::down(3, 1)));
        assert!(!ui.controller(&toggle).unwrap().is_pressed());
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(3, 1)));
        assert!(ui.controller(&toggle).unwrap().is_pressed());
    }

    #[test]
    fn disabled_toggle_ignores_input() {
        let (mut ui, root) = shell();
        let toggle =
            ui.mount(Toggle::new(ToggleConfig::new("Locked").disabled(true)), root);
        let node = ui.controller(&toggle).unwrap().root();
        ui.regions.set(node, Region::new(2, 1, 8, 1));
        ui.focus(node);

        key(&mut ui, Key::Enter);
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(3, 1)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(3, 1)));
        assert!(!ui.controller(&toggle).unwrap().is_pressed());
    }

    // ── ToggleGroup ──────────────────────────────────────────────────

    fn group_config(mode: ToggleMode) -> ToggleGroupConfig {
        ToggleGroupConfig::new(mode)
            .item(ToggleGroupItem::new("Left"))
            .item(ToggleGroupItem::new("Center"))
            .item(ToggleGroupItem::new("Right"))
    }

    #[test]
    fn single_mode_keeps_at_most_one_on() {
        let (mut ui, root) = shell();
        let group = ui.mount(ToggleGroup::new(group_config(ToggleMode::Single)), root);
        let first = ui.controller(&group).unwrap().item(0).unwrap();
        ui.focus(first);

        key(&mut ui, Key::Enter);
        assert_eq!(ui.controller(&group).unwrap().pressed_indices(), vec![0]);

        key(&mut ui, Key::Right);
        key(&mut ui, Key::Enter);
        let g = ui.controller(&group).unwrap();
        assert_eq!(g.pressed_indices(), vec![1]);
        assert!(ui.dom.data_is(g.item(0).unwrap(), "state", "off"));
        assert!(ui.dom.data_is(g.item(1).unwrap(), "state", "on"));
    }

    #[test]
    fn single_mode_pressing_the_on_member_turns_it_off() {
        let (mut ui, root) = shell();
        let group = ui.mount(ToggleGroup::new(group_config(ToggleMode::Single)), root);
        let first = ui.controller(&group).unwrap().item(0).unwrap();
        ui.focus(first);

        key(&mut ui, Key::Enter);
        key(&mut ui, Key::Enter);
        assert!(ui.controller(&group).unwrap().pressed_indices().is_empty());
    }

    #[test]
    fn multiple_mode_members_are_independent() {
        let (mut ui, root) = shell();
        let group = ui.mount(ToggleGroup::new(group_config(ToggleMode::Multiple)), root);
        let first = ui.controller(&group).unwrap().item(0).unwrap();
        ui.focus(first);

        key(&mut ui, Key::Enter);
        key(&mut ui, Key::Right);
        key(&mut ui, Key::Enter);
        assert_eq!(ui.controller(&group).unwrap().pressed_indices(), vec![0, 1]);
    }

    #[test]
    fn arrows_skip_disabled_members_and_wrap() {
        let (mut ui, root) = shell();
        let config = ToggleGroupConfig::new(ToggleMode::Single)
            .item(ToggleGroupItem::new("A"))
            .item(ToggleGroupItem::new("B").disabled(true))
            .item(ToggleGroupItem::new("C"));
        let group = ui.mount(ToggleGroup::new(config), root);
        let g = ui.controller(&group).unwrap();
        let a = g.item(0).unwrap();
        let c = g.item(2).unwrap();
        ui.focus(a);

        key(&mut ui, Key::Right);
        assert_eq!(ui.focused(), Some(c));
        key(&mut ui, Key::Right);
        assert_eq!(ui.focused(), Some(a));
        key(&mut ui, Key::Left);
        assert_eq!(ui.focused(), Some(c));
    }
}
