//! Checkbox and RadioGroup.
//!
//! A checkbox flips its `checked` marker. A radio group keeps exactly one
//! member checked: arrows move the selection to the neighboring enabled
//! member (wrapping), clicks and Space select directly, and a new selection
//! always unchecks the previous one.

use crate::controller::{Controller, Handled};
use crate::dom::{Dom, NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseEvent};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

// ---------------------------------------------------------------------------
// Checkbox
// ---------------------------------------------------------------------------

/// Configuration for a [`Checkbox`].
#[derive(Clone, Debug)]
pub struct CheckboxConfig {
    label: String,
    checked: bool,
    disabled: bool,
    appearance: Appearance,
    id: Option<String>,
}

impl CheckboxConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
            disabled: false,
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
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

/// Two-state checkbox with an attached label.
pub struct Checkbox {
    config: CheckboxConfig,
    root: NodeId,
    checked: bool,
}

impl Checkbox {
    pub fn new(config: CheckboxConfig) -> Self {
        let checked = config.checked;
        Self { config, root: NodeId::default(), checked }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn flip(&mut self, ctx: &mut Ctx<'_>) {
        self.checked = !self.checked;
        ctx.dom
            .set_data(self.root, "checked", if self.checked { "true" } else { "false" });
    }

    fn disabled(&self, dom: &Dom) -> bool {
        dom.get(self.root).is_some_and(|d| d.disabled)
    }
}

impl Controller for Checkbox {
    fn kind(&self) -> &'static str {
        "checkbox"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut data = NodeData::new("checkbox")
            .with_classes(part_classes("row gap-1", &self.config.appearance))
            .with_attrs(part_attrs("checkbox", "root", &self.config.appearance))
            .focusable(true)
            .disabled(self.config.disabled)
            .with_data("checked", if self.checked { "true" } else { "false" });
        if let Some(id) = &self.config.id {
            data = data.with_id(id.clone());
        }
        self.root = ctx.dom.insert_child(parent, data);
        ctx.dom.insert_child(
            self.root,
            NodeData::new("label")
                .with_attrs(part_attrs("checkbox", "label", &Appearance::default()))
                .with_text(&self.config.label),
        );
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
// RadioGroup
// ---------------------------------------------------------------------------

/// One member of a [`RadioGroup`].
#[derive(Clone, Debug)]
pub struct RadioItem {
    label: String,
    disabled: bool,
}

impl RadioItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), disabled: false }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Configuration for a [`RadioGroup`].
#[derive(Clone, Debug)]
pub struct RadioGroupConfig {
    items: Vec<RadioItem>,
    selected: usize,
    appearance: Appearance,
    id: Option<String>,
}

impl RadioGroupConfig {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn item(mut self, item: RadioItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: Vec<RadioItem>) -> Self {
        self.items = items;
        self
    }

    /// Index checked at mount; the group always has exactly one.
    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
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

impl Default for RadioGroupConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive choice among labeled members.
pub struct RadioGroup {
    config: RadioGroupConfig,
    items: Vec<NodeId>,
    selected: usize,
}

impl RadioGroup {
    pub fn new(config: RadioGroupConfig) -> Self {
        let selected = config.selected.min(config.items.len().saturating_sub(1));
        Self { config, items: Vec::new(), selected }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_label<'a>(&self, dom: &'a Dom) -> Option<&'a str> {
        self.items.get(self.selected).map(|&item| dom.text(item))
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    fn select(&mut self, ctx: &mut Ctx<'_>, index: usize) {
        if index == self.selected || index >= self.items.len() {
            return;
        }
        if let Some(&old) = self.items.get(self.selected) {
            ctx.dom.set_data(old, "checked", "false");
        }
        self.selected = index;
        if let Some(&new) = self.items.get(index) {
            ctx.dom.set_data(new, "checked", "true");
        }
    }

    fn enabled_indices(&self, dom: &Dom) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, &item)| dom.get(item).is_some_and(|d| !d.disabled))
            .map(|(i, _)| i)
            .collect()
    }

    /// Arrows move checked state and focus together, wrapping.
    fn move_selection(&mut self, ctx: &mut Ctx<'_>, delta: i64) {
        let enabled = self.enabled_indices(ctx.dom);
        if enabled.is_empty() {
            return;
        }
        let pos = enabled.iter().position(|&i| i == self.selected).unwrap_or(0);
        let next = enabled[(pos as i64 + delta).rem_euclid(enabled.len() as i64) as usize];
        self.select(ctx, next);
        if let Some(&node) = self.items.get(next) {
            ctx.focus(node);
        }
    }

    fn index_of(&self, node: NodeId) -> Option<usize> {
        self.items.iter().position(|&i| i == node)
    }
}

impl Controller for RadioGroup {
    fn kind(&self) -> &'static str {
        "radio-group"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("radio-group")
            .with_classes(part_classes("column gap-0", &self.config.appearance))
            .with_attrs(part_attrs("radio-group", "root", &self.config.appearance));
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        for (index, item) in self.config.items.iter().enumerate() {
            let node = ctx.dom.insert_child(
                root,
                NodeData::new("radio")
                    .with_attrs(part_attrs("radio-group", "item", &Appearance::default()))
                    .with_text(&item.label)
                    .focusable(true)
                    .disabled(item.disabled)
                    .with_data("checked", if index == self.selected { "true" } else { "false" }),
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
            Key::Down | Key::Right => {
                self.move_selection(ctx, 1);
                Handled::Yes
            }
            Key::Up | Key::Left => {
                self.move_selection(ctx, -1);
                Handled::Yes
            }
            Key::Enter | Key::Char(' ') => {
                if !ctx.dom.get(focused).is_some_and(|d| d.disabled) {
                    self.select(ctx, index);
                }
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
            self.select(ctx, index);
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
