//! Combobox: a filterable option list inside an anchored popover.
//!
//! Opening moves focus into the filter input; every keystroke narrows the
//! visible options by case-insensitive substring. Enter commits the
//! highlighted match back onto the trigger. Reopening always starts from an
//! empty filter.

use tracing::trace;

use crate::controller::{Controller, Handled};
use crate::dom::{Dom, NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseAction, MouseEvent};
use crate::geometry::Size;
use crate::interaction::dismiss::{BindingId, DismissReason, EscapeOptions, OutsideClickOptions};
use crate::interaction::positioner::{Placement, PositionConfig};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

const DISMISS_TOKEN: u32 = 0;

/// Configuration for a [`Combobox`].
#[derive(Clone, Debug)]
pub struct ComboboxConfig {
    placeholder: String,
    options: Vec<String>,
    position: PositionConfig,
    appearance: Appearance,
    id: Option<String>,
}

impl ComboboxConfig {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            options: Vec::new(),
            position: PositionConfig::new(Placement::BOTTOM_START),
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn option(mut self, label: impl Into<String>) -> Self {
        self.options.push(label.into());
        self
    }

    pub fn options(mut self, options: Vec<String>) -> Self {
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

/// Filterable single-select popover.
pub struct Combobox {
    config: ComboboxConfig,
    trigger: NodeId,
    panel: NodeId,
    input: NodeId,
    options: Vec<NodeId>,
    open: bool,
    filter: String,
    highlight: Option<usize>,
    value: Option<String>,
    outside: Option<BindingId>,
    escape: Option<BindingId>,
}

impl Combobox {
    pub fn new(config: ComboboxConfig) -> Self {
        Self {
            config,
            trigger: NodeId::default(),
            panel: NodeId::default(),
            input: NodeId::default(),
            options: Vec::new(),
            open: false,
            filter: String::new(),
            highlight: None,
            value: None,
            outside: None,
            escape: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Label committed by the last Enter or click.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn content(&self) -> NodeId {
        self.panel
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Indices of the options still visible under the current filter.
    fn visible(&self, dom: &Dom) -> Vec<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, &opt)| dom.get(opt).is_some_and(|d| d.visible))
            .map(|(i, _)| i)
            .collect()
    }

    // ── Open / close ─────────────────────────────────────────────────

    fn open(&mut self, ctx: &mut Ctx<'_>) {
        if self.open {
            return;
        }
        trace!("combobox opened");
        self.open = true;
        ctx.dom.set_visible(self.panel, true);
        ctx.dom.set_data(self.panel, "state", "open");
        ctx.dom.set_data(self.trigger, "state", "open");
        let size = self.measure(ctx.dom);
        ctx.start_positioning(self.trigger, self.panel, size, self.config.position);
        ctx.push_overlay(self.panel);
        self.outside = Some(ctx.attach_outside_click(
            DISMISS_TOKEN,
            vec![self.trigger, self.panel],
            OutsideClickOptions::new(),
        ));
        self.escape = Some(ctx.attach_escape(
            DISMISS_TOKEN,
            EscapeOptions::new().stop_propagation(true),
        ));
        // A fresh open starts unfiltered with the input focused.
        self.filter.clear();
        self.apply_filter(ctx);
        ctx.focus(self.input);
    }

    fn close(&mut self, ctx: &mut Ctx<'_>) {
        if !self.open {
            return;
        }
        self.open = false;
        self.set_highlight(ctx, None);
        ctx.dom.set_visible(self.panel, false);
        ctx.dom.set_data(self.panel, "state", "closed");
        ctx.dom.set_data(self.trigger, "state", "closed");
        ctx.stop_positioning(self.panel);
        ctx.pop_overlay(self.panel);
        ctx.regions.remove(self.panel);
        if let Some(id) = self.outside.take() {
            ctx.detach_outside_click(id);
        }
        if let Some(id) = self.escape.take() {
            ctx.detach_escape(id);
        }
    }

    fn measure(&self, dom: &Dom) -> Size {
        let widest = self
            .options
            .iter()
            .map(|&opt| dom.text(opt).chars().count())
            .max()
            .unwrap_or(0);
        Size::new((widest as i32 + 4).max(16), self.options.len() as i32 + 3)
    }

    // ── Filter / highlight ───────────────────────────────────────────

    /// Re-evaluate visibility against the filter and highlight the first
    /// surviving option.
    fn apply_filter(&mut self, ctx: &mut Ctx<'_>) {
        ctx.dom.set_text(self.input, &self.filter);
        let needle = self.filter.to_lowercase();
        for &opt in &self.options {
            let matches =
                needle.is_empty() || ctx.dom.text(opt).to_lowercase().contains(&needle);
            ctx.dom.set_visible(opt, matches);
        }
        let first = self.visible(ctx.dom).first().copied();
        self.set_highlight(ctx, first);
    }

    fn set_highlight(&mut self, ctx: &mut Ctx<'_>, index: Option<usize>) {
        if self.highlight == index {
            return;
        }
        if let Some(old) = self.highlight {
            if let Some(&opt) = self.options.get(old) {
                ctx.dom.remove_data(opt, "highlighted");
            }
        }
        self.highlight = index;
        if let Some(new) = index {
            if let Some(&opt) = self.options.get(new) {
                ctx.dom.set_data(opt, "highlighted", "true");
            }
        }
    }

    fn move_highlight(&mut self, ctx: &mut Ctx<'_>, delta: i32) {
        let visible = self.visible(ctx.dom);
        if visible.is_empty() {
            return;
        }
        let next = match self.highlight {
            None => {
                if delta >= 0 {
                    visible[0]
                } else {
                    visible[visible.len() - 1]
                }
            }
            Some(cur) if delta >= 0 => {
                visible.iter().copied().find(|&i| i > cur).unwrap_or(cur)
            }
            Some(cur) => visible
                .iter()
                .copied()
                .rev()
                .find(|&i| i < cur)
                .unwrap_or(cur),
        };
        self.set_highlight(ctx, Some(next));
    }

    fn commit(&mut self, ctx: &mut Ctx<'_>, index: usize) {
        let Some(&opt) = self.options.get(index) else {
            return;
        };
        for &other in &self.options {
            ctx.dom.remove_data(other, "selected");
        }
        ctx.dom.set_data(opt, "selected", "true");
        let label = ctx.dom.text(opt).to_string();
        trace!(option = %label, "combobox committed");
        ctx.dom.set_text(self.trigger, &label);
        self.value = Some(label);
        self.close(ctx);
        ctx.focus(self.trigger);
    }
}

impl Controller for Combobox {
    fn kind(&self) -> &'static str {
        "combobox"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("combobox")
            .with_attrs(part_attrs("combobox", "root", &self.config.appearance))
            .with_data("state", "closed");
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        self.trigger = ctx.dom.insert_child(
            root,
            NodeData::new("button")
                .with_classes(part_classes("border rounded pad-x-2", &self.config.appearance))
                .with_attrs(part_attrs("combobox", "trigger", &self.config.appearance))
                .with_text(&self.config.placeholder)
                .focusable(true)
                .with_data("state", "closed"),
        );

        let mut panel_data = NodeData::new("popover")
            .with_classes(part_classes("border rounded pad-1", &Appearance::default()))
            .with_attrs(part_attrs("combobox", "content", &Appearance::default()))
            .with_data("state", "closed");
        panel_data.visible = false;
        self.panel = ctx.dom.insert_child(root, panel_data);

        self.input = ctx.dom.insert_child(
            self.panel,
            NodeData::new("input")
                .with_classes(part_classes("border-b", &Appearance::default()))
                .with_attrs(part_attrs("combobox", "input", &Appearance::default()))
                .focusable(true)
                .accepts_text(true),
        );

        for label in &self.config.options {
            let opt = ctx.dom.insert_child(
                self.panel,
                NodeData::new("option")
                    .with_attrs(part_attrs("combobox", "item", &Appearance::default()))
                    .with_text(label),
            );
            self.options.push(opt);
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
                Key::Enter | Key::Char(' ') | Key::Down => {
                    self.open(ctx);
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
            Key::Enter => {
                if let Some(index) = self.highlight {
                    self.commit(ctx, index);
                }
                Handled::Yes
            }
            Key::Backspace => {
                if self.filter.pop().is_some() {
                    self.apply_filter(ctx);
                }
                Handled::Yes
            }
            Key::Char(ch) if !ch.is_control() => {
                self.filter.push(ch);
                self.apply_filter(ctx);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if event.is_press() {
            if ctx.dom.is_within(target, self.trigger) {
                if self.open {
                    self.close(ctx);
                } else {
                    self.open(ctx);
                }
                return Handled::Yes;
            }
            if self.open && ctx.dom.is_within(target, self.panel) {
                // Pressing the input keeps focus there; pressing an option
                // consumes so the release can commit.
                return Handled::Yes;
            }
            return Handled::No;
        }

        if event.is_release() {
            if self.open {
                if let Some(index) = self.options.iter().position(|&o| o == target) {
                    self.commit(ctx, index);
                    return Handled::Yes;
                }
            }
            return Handled::No;
        }

        if event.kind == MouseAction::Moved && self.open {
            if let Some(index) = self.options.iter().position(|&o| o == target) {
                self.set_highlight(ctx, Some(index));
            }
        }
        Handled::No
    }

    fn on_dismiss(&mut self, ctx: &mut Ctx<'_>, reason: DismissReason, _token: u32) {
        self.close(ctx);
        // Escape returns focus to the trigger; an outside click leaves focus
        // wherever the click put it.
        if reason == DismissReason::Escape {
            ctx.focus(self.trigger);
        }
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
