//! Select: a single-select listbox under a trigger button.
//!
//! The trigger keeps focus the whole time; the floating listbox is keyboard
//! driven. Committing an option moves the `selected` marker exclusively and
//! rewrites the trigger text. Typing while open jumps the highlight to the
//! first option whose label starts with the typed prefix.

use std::time::Duration;

use tracing::trace;

use crate::controller::{Controller, Handled};
use crate::dom::{Dom, NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseAction, MouseEvent};
use crate::geometry::Size;
use crate::interaction::dismiss::{BindingId, DismissReason, EscapeOptions, OutsideClickOptions};
use crate::interaction::intent::{FiredTimer, TimerId};
use crate::interaction::positioner::{Placement, PositionConfig};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

const DISMISS_TOKEN: u32 = 0;
const TYPEAHEAD_TOKEN: u32 = 1;

/// The typeahead buffer resets this long after the last keystroke.
const TYPEAHEAD_RESET: Duration = Duration::from_millis(500);

/// One option of a [`Select`].
#[derive(Clone, Debug)]
pub struct SelectOption {
    label: String,
    disabled: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), disabled: false }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Configuration for a [`Select`].
#[derive(Clone, Debug)]
pub struct SelectConfig {
    placeholder: String,
    options: Vec<SelectOption>,
    position: PositionConfig,
    appearance: Appearance,
    id: Option<String>,
}

impl SelectConfig {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            options: Vec::new(),
            position: PositionConfig::new(Placement::BOTTOM_START),
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn position(mut self, position: PositionConfig) -> Self {
        self.position = position;
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

/// Single-select listbox.
pub struct Select {
    config: SelectConfig,
    trigger: NodeId,
    surface: NodeId,
    items: Vec<NodeId>,
    highlight: Option<usize>,
    selected: Option<usize>,
    open: bool,
    outside: Option<BindingId>,
    escape: Option<BindingId>,
    typeahead: String,
    typeahead_timer: Option<TimerId>,
}

impl Select {
    pub fn new(config: SelectConfig) -> Self {
        Self {
            config,
            trigger: NodeId::default(),
            surface: NodeId::default(),
            items: Vec::new(),
            highlight: None,
            selected: None,
            open: false,
            outside: None,
            escape: None,
            typeahead: String::new(),
            typeahead_timer: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Label of the committed option.
    pub fn value<'a>(&self, dom: &'a Dom) -> Option<&'a str> {
        self.selected
            .and_then(|i| self.items.get(i).copied())
            .map(|item| dom.text(item))
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn content(&self) -> NodeId {
        self.surface
    }

    // ── Open / close ─────────────────────────────────────────────────

    fn open(&mut self, ctx: &mut Ctx<'_>) {
        if self.open {
            return;
        }
        trace!("select opened");
        self.open = true;
        ctx.dom.set_visible(self.surface, true);
        ctx.dom.set_data(self.surface, "state", "open");
        ctx.dom.set_data(self.trigger, "state", "open");
        let size = self.measure(ctx.dom);
        ctx.start_positioning(self.trigger, self.surface, size, self.config.position);
        ctx.push_overlay(self.surface);
        self.outside = Some(ctx.attach_outside_click(
            DISMISS_TOKEN,
            vec![self.trigger, self.surface],
            OutsideClickOptions::new(),
        ));
        self.escape = Some(ctx.attach_escape(
            DISMISS_TOKEN,
            EscapeOptions::new().stop_propagation(true),
        ));
        // Reopening highlights the committed option.
        let start = self.selected.or_else(|| self.first_eligible(ctx.dom));
        self.set_highlight(ctx, start);
    }

    fn close(&mut self, ctx: &mut Ctx<'_>) {
        if !self.open {
            return;
        }
        self.open = false;
        self.set_highlight(ctx, None);
        ctx.dom.set_visible(self.surface, false);
        ctx.dom.set_data(self.surface, "state", "closed");
        ctx.dom.set_data(self.trigger, "state", "closed");
        ctx.stop_positioning(self.surface);
        ctx.pop_overlay(self.surface);
        ctx.regions.remove(self.surface);
        if let Some(id) = self.outside.take() {
            ctx.detach_outside_click(id);
        }
        if let Some(id) = self.escape.take() {
            ctx.detach_escape(id);
        }
        self.reset_typeahead(ctx);
    }

    fn measure(&self, dom: &Dom) -> Size {
        let widest = self
            .items
            .iter()
            .map(|&item| dom.text(item).chars().count())
            .max()
            .unwrap_or(0);
        Size::new((widest as i32 + 4).max(12), self.items.len() as i32 + 2)
    }

    // ── Highlight / commit ───────────────────────────────────────────

    fn eligible(&self, dom: &Dom) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, &item)| dom.get(item).is_some_and(|d| !d.disabled))
            .map(|(i, _)| i)
            .collect()
    }

    fn first_eligible(&self, dom: &Dom) -> Option<usize> {
        self.eligible(dom).first().copied()
    }

    fn set_highlight(&mut self, ctx: &mut Ctx<'_>, index: Option<usize>) {
        if self.highlight == index {
            return;
        }
        if let Some(old) = self.highlight {
            if let Some(&item) = self.items.get(old) {
                ctx.dom.remove_data(item, "highlighted");
            }
        }
        self.highlight = index;
        if let Some(new) = index {
            if let Some(&item) = self.items.get(new) {
                ctx.dom.set_data(item, "highlighted", "true");
            }
        }
    }

    /// Clamp-move like a menu: stop at the ends, skip disabled options.
    fn move_highlight(&mut self, ctx: &mut Ctx<'_>, delta: i32) {
        let eligible = self.eligible(ctx.dom);
        if eligible.is_empty() {
            return;
        }
        let next = match self.highlight {
            None => {
                if delta >= 0 {
                    eligible[0]
                } else {
                    eligible[eligible.len() - 1]
                }
            }
            Some(cur) if delta >= 0 => {
                eligible.iter().copied().find(|&i| i > cur).unwrap_or(cur)
            }
            Some(cur) => eligible
                .iter()
                .copied()
                .rev()
                .find(|&i| i < cur)
                .unwrap_or(cur),
        };
        self.set_highlight(ctx, Some(next));
    }

    fn commit(&mut self, ctx: &mut Ctx<'_>, index: usize) {
        let Some(&item) = self.items.get(index) else {
            return;
        };
        if ctx.dom.get(item).is_some_and(|d| d.disabled) {
            return;
        }
        if let Some(old) = self.selected {
            if let Some(&prev) = self.items.get(old) {
                ctx.dom.remove_data(prev, "selected");
            }
        }
        self.selected = Some(index);
        ctx.dom.set_data(item, "selected", "true");
        let label = ctx.dom.text(item).to_string();
        trace!(option = %label, "select committed");
        ctx.dom.set_text(self.trigger, &label);
        self.close(ctx);
    }

    // ── Typeahead ────────────────────────────────────────────────────

    fn typeahead_push(&mut self, ctx: &mut Ctx<'_>, ch: char) {
        if let Some(id) = self.typeahead_timer.take() {
            ctx.cancel_timer(id);
        }
        self.typeahead.extend(ch.to_lowercase());
        self.typeahead_timer = Some(ctx.schedule(TYPEAHEAD_TOKEN, TYPEAHEAD_RESET));

        let needle = self.typeahead.clone();
        let hit = self.eligible(ctx.dom).into_iter().find(|&i| {
            let label = ctx.dom.text(self.items[i]).to_lowercase();
            label.starts_with(&needle)
        });
        if let Some(index) = hit {
            self.set_highlight(ctx, Some(index));
        }
    }

    fn reset_typeahead(&mut self, ctx: &mut Ctx<'_>) {
        self.typeahead.clear();
        if let Some(id) = self.typeahead_timer.take() {
            ctx.cancel_timer(id);
        }
    }
}

impl Controller for Select {
    fn kind(&self) -> &'static str {
        "select"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("select")
            .with_attrs(part_attrs("select", "root", &self.config.appearance))
            .with_data("state", "closed");
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        self.trigger = ctx.dom.insert_child(
            root,
            NodeData::new("button")
                .with_classes(part_classes("border rounded pad-x-2", &self.config.appearance))
                .with_attrs(part_attrs("select", "trigger", &self.config.appearance))
                .with_text(&self.config.placeholder)
                .focusable(true)
                .with_data("state", "closed")
                .with_data("placeholder", "true"),
        );

        let mut surface_data = NodeData::new("listbox")
            .with_classes(part_classes("border rounded pad-1", &Appearance::default()))
            .with_attrs(part_attrs("select", "content", &Appearance::default()))
            .with_data("state", "closed");
        surface_data.visible = false;
        self.surface = ctx.dom.insert_child(root, surface_data);

        for option in &self.config.options {
            let item = ctx.dom.insert_child(
                self.surface,
                NodeData::new("option")
                    .with_attrs(part_attrs("select", "item", &Appearance::default()))
                    .with_text(&option.label)
                    .disabled(option.disabled),
            );
            self.items.push(item);
        }
        root
    }

    fn unmount(&mut self, ctx: &mut Ctx<'_>) {
        self.close(ctx);
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        if !self.open {
            if ctx.focused() != Some(self.trigger) {
                return Handled::No;
            }
            return match event.code {
                Key::Enter | Key::Char(' ') | Key::Down | Key::Up => {
                    let disabled = ctx.dom.get(self.trigger).is_some_and(|d| d.disabled);
                    if !disabled {
                        self.open(ctx);
                    }
                    Handled::Yes
                }
                _ => Handled::No,
            };
        }

        match event.code {
            Key::Down => {
                self.move_highlight(ctx, 1);
                Handled::Yes
            }
            Key::Up => {
                self.move_highlight(ctx, -1);
                Handled::Yes
            }
            Key::Home => {
                let first = self.first_eligible(ctx.dom);
                self.set_highlight(ctx, first);
                Handled::Yes
            }
            Key::End => {
                let last = self.eligible(ctx.dom).last().copied();
                self.set_highlight(ctx, last);
                Handled::Yes
            }
            Key::Enter => {
                if let Some(index) = self.highlight {
                    self.commit(ctx, index);
                }
                Handled::Yes
            }
            Key::Char(' ') if self.typeahead.is_empty() => {
                if let Some(index) = self.highlight {
                    self.commit(ctx, index);
                }
                Handled::Yes
            }
            Key::Char(ch) if !ch.is_control() => {
                self.typeahead_push(ctx, ch);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if event.is_press() {
            if ctx.dom.is_within(target, self.trigger) {
                let disabled = ctx.dom.get(self.trigger).is_some_and(|d| d.disabled);
                if disabled {
                    return Handled::Yes;
                }
                if self.open {
                    self.close(ctx);
                } else {
                    self.open(ctx);
                }
                return Handled::Yes;
            }
            if self.open && ctx.dom.is_within(target, self.surface) {
                return Handled::Yes;
            }
            return Handled::No;
        }

        if event.is_release() {
            if self.open {
                if let Some(index) = self.items.iter().position(|&i| i == target) {
                    self.commit(ctx, index);
                    return Handled::Yes;
                }
            }
            return Handled::No;
        }

        if event.kind == MouseAction::Moved && self.open {
            if let Some(index) = self.items.iter().position(|&i| i == target) {
                if !ctx.dom.get(target).is_some_and(|d| d.disabled) {
                    self.set_highlight(ctx, Some(index));
                }
            }
        }
        Handled::No
    }

    fn on_timer(&mut self, _ctx: &mut Ctx<'_>, timer: FiredTimer) {
        if timer.token == TYPEAHEAD_TOKEN && self.typeahead_timer == Some(timer.id) {
            self.typeahead_timer = None;
            self.typeahead.clear();
        }
    }

    fn on_dismiss(&mut self, ctx: &mut Ctx<'_>, _reason: DismissReason, _token: u32) {
        self.close(ctx);
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
