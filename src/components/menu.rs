//! Dropdown menu: trigger, floating item surface, and nested submenus.
//!
//! The item surface logic lives in [`MenuCore`] so the menubar can reuse it
//! verbatim: one core drives one trigger/surface pair, including every
//! submenu hanging off its items. Submenu surfaces are built hidden inside
//! their parent item's subtree, which keeps outside-click containment a
//! plain tree test no matter where the positioner floats them.

use tracing::trace;

use crate::controller::{Controller, Handled};
use crate::dom::{Dom, NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseAction, MouseEvent};
use crate::geometry::Size;
use crate::interaction::dismiss::{
    BindingId, DismissReason, EscapeOptions, OutsideClickOptions,
};
use crate::interaction::intent::{FiredTimer, HoverFired, HoverIntent};
use crate::interaction::positioner::{Placement, PositionConfig};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

pub(crate) const HOVER_TOKEN: u32 = 1;
const DISMISS_TOKEN: u32 = 0;

// ---------------------------------------------------------------------------
// Item configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum ItemKind {
    Plain,
    Checkbox { checked: bool },
    Radio { group: String, checked: bool },
    Submenu { items: Vec<MenuItem> },
}

/// One entry of a menu surface.
#[derive(Clone, Debug)]
pub struct MenuItem {
    label: String,
    kind: ItemKind,
    disabled: bool,
}

impl MenuItem {
    /// A plain action item.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::Plain,
            disabled: false,
        }
    }

    /// A checkable item with an independent on/off state.
    pub fn checkbox(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::Checkbox { checked },
            disabled: false,
        }
    }

    /// A radio item; at most one item per `group` stays checked.
    pub fn radio(label: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::Radio { group: group.into(), checked: false },
            disabled: false,
        }
    }

    /// An item that opens a nested surface.
    pub fn submenu(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::Submenu { items },
            disabled: false,
        }
    }

    /// Start out checked (radio items).
    pub fn checked(mut self, checked: bool) -> Self {
        match &mut self.kind {
            ItemKind::Checkbox { checked: c } | ItemKind::Radio { checked: c, .. } => {
                *c = checked;
            }
            _ => {}
        }
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

// ---------------------------------------------------------------------------
// Surface construction
// ---------------------------------------------------------------------------

fn item_kind_name(kind: &ItemKind) -> &'static str {
    match kind {
        ItemKind::Plain => "plain",
        ItemKind::Checkbox { .. } => "checkbox",
        ItemKind::Radio { .. } => "radio",
        ItemKind::Submenu { .. } => "submenu",
    }
}

/// Build a hidden item surface under `parent`.
pub(crate) fn build_surface(
    dom: &mut Dom,
    parent: NodeId,
    controller: &'static str,
    items: &[MenuItem],
) -> NodeId {
    let mut data = NodeData::new("menu")
        .with_classes(part_classes("border rounded pad-1", &Appearance::default()))
        .with_attrs(part_attrs(controller, "content", &Appearance::default()))
        .with_data("state", "closed");
    data.visible = false;
    let surface = dom.insert_child(parent, data);

    for item in items {
        let node = dom.insert_child(
            surface,
            NodeData::new("menu-item")
                .with_attrs(part_attrs(controller, "item", &Appearance::default()))
                .with_attr("item-kind", item_kind_name(&item.kind))
                .with_text(&item.label)
                .disabled(item.disabled),
        );
        match &item.kind {
            ItemKind::Checkbox { checked } => {
                dom.set_data(node, "checked", if *checked { "true" } else { "false" });
            }
            ItemKind::Radio { group, checked } => {
                if let Some(data) = dom.get_mut(node) {
                    data.attrs.set("radio-group", group.clone());
                }
                dom.set_data(node, "checked", if *checked { "true" } else { "false" });
            }
            ItemKind::Submenu { items } => {
                build_surface(dom, node, controller, items);
            }
            ItemKind::Plain => {}
        }
    }
    surface
}

fn item_nodes(dom: &Dom, surface: NodeId) -> Vec<NodeId> {
    dom.children(surface)
        .iter()
        .copied()
        .filter(|&c| dom.get(c).is_some_and(|d| d.kind == "menu-item"))
        .collect()
}

fn submenu_surface(dom: &Dom, item: NodeId) -> Option<NodeId> {
    dom.children(item)
        .iter()
        .copied()
        .find(|&c| dom.get(c).is_some_and(|d| d.kind == "menu"))
}

/// Content size for the positioner: widest label plus mark and border
/// columns, one row per item plus the border.
fn measure_surface(dom: &Dom, items: &[NodeId]) -> Size {
    let widest = items
        .iter()
        .filter_map(|&i| dom.get(i))
        .map(|d| d.text().chars().count() as i32)
        .max()
        .unwrap_or(0);
    Size::new((widest + 6).max(12), items.len() as i32 + 2)
}

// ---------------------------------------------------------------------------
// MenuCore
// ---------------------------------------------------------------------------

/// What a key or click did, beyond being handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum MenuSignal {
    None,
    /// An item was activated; the whole tree closed.
    Selected(String),
    /// ArrowLeft at the root surface: a menubar moves to the previous menu.
    PrevTop,
    /// ArrowRight on an item without a submenu: next menubar menu.
    NextTop,
}

struct OpenSurface {
    surface: NodeId,
    items: Vec<NodeId>,
    highlight: Option<usize>,
}

/// One trigger/surface pair and its open submenu stack.
pub(crate) struct MenuCore {
    controller: &'static str,
    trigger: NodeId,
    surface: NodeId,
    position: PositionConfig,
    stack: Vec<OpenSurface>,
    outside: Option<BindingId>,
    escape: Option<BindingId>,
    hover: HoverIntent,
    pending_submenu: Option<NodeId>,
    last_hover: Option<NodeId>,
}

impl MenuCore {
    pub(crate) fn new(
        controller: &'static str,
        trigger: NodeId,
        surface: NodeId,
        position: PositionConfig,
    ) -> Self {
        Self {
            controller,
            trigger,
            surface,
            position,
            stack: Vec::new(),
            outside: None,
            escape: None,
            hover: HoverIntent::default(),
            pending_submenu: None,
            last_hover: None,
        }
    }

    pub(crate) fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub(crate) fn surface(&self) -> NodeId {
        self.surface
    }

    pub(crate) fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Label of the highlighted item on the deepest open surface.
    pub(crate) fn highlighted_label<'a>(&self, dom: &'a Dom) -> Option<&'a str> {
        let top = self.stack.last()?;
        let idx = top.highlight?;
        Some(dom.text(*top.items.get(idx)?))
    }

    // ── Open / close ─────────────────────────────────────────────────

    pub(crate) fn open(&mut self, ctx: &mut Ctx<'_>) {
        if self.is_open() {
            return;
        }
        trace!(controller = self.controller, "menu opened");
        self.show(ctx, self.surface, self.trigger, self.position);
        ctx.dom.set_data(self.trigger, "state", "open");
        self.outside = Some(ctx.attach_outside_click(
            DISMISS_TOKEN,
            vec![self.trigger, self.surface],
            OutsideClickOptions::new(),
        ));
        self.escape = Some(ctx.attach_escape(
            DISMISS_TOKEN,
            EscapeOptions::new().stop_propagation(true),
        ));
    }

    pub(crate) fn close_all(&mut self, ctx: &mut Ctx<'_>) {
        while self.stack.len() > 1 {
            self.close_deepest(ctx);
        }
        if let Some(root) = self.stack.pop() {
            self.hide(ctx, root);
            ctx.dom.set_data(self.trigger, "state", "closed");
        }
        if let Some(id) = self.outside.take() {
            ctx.detach_outside_click(id);
        }
        if let Some(id) = self.escape.take() {
            ctx.detach_escape(id);
        }
        ctx.hover_cancel(&mut self.hover);
        self.pending_submenu = None;
        self.last_hover = None;
    }

    fn show(&mut self, ctx: &mut Ctx<'_>, surface: NodeId, anchor: NodeId, position: PositionConfig) {
        ctx.dom.set_visible(surface, true);
        ctx.dom.set_data(surface, "state", "open");
        let items = item_nodes(ctx.dom, surface);
        let size = measure_surface(ctx.dom, &items);
        ctx.start_positioning(anchor, surface, size, position);
        ctx.push_overlay(surface);
        self.stack.push(OpenSurface { surface, items, highlight: None });
    }

    fn close_deepest(&mut self, ctx: &mut Ctx<'_>) {
        let Some(top) = self.stack.pop() else {
            return;
        };
        self.hide(ctx, top);
    }

    fn hide(&mut self, ctx: &mut Ctx<'_>, open: OpenSurface) {
        if let Some(idx) = open.highlight {
            if let Some(&item) = open.items.get(idx) {
                ctx.dom.remove_data(item, "highlighted");
            }
        }
        ctx.dom.set_visible(open.surface, false);
        ctx.dom.set_data(open.surface, "state", "closed");
        ctx.stop_positioning(open.surface);
        ctx.pop_overlay(open.surface);
        ctx.regions.remove(open.surface);
        // Parent item of a submenu drops its open marker.
        if let Some(parent) = ctx.dom.parent(open.surface) {
            if ctx.dom.get(parent).is_some_and(|d| d.kind == "menu-item") {
                ctx.dom.set_data(parent, "state", "closed");
            }
        }
    }

    // ── Highlight ────────────────────────────────────────────────────

    fn set_highlight(&mut self, ctx: &mut Ctx<'_>, index: Option<usize>) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if top.highlight == index {
            return;
        }
        if let Some(old) = top.highlight {
            if let Some(&item) = top.items.get(old) {
                ctx.dom.remove_data(item, "highlighted");
            }
        }
        top.highlight = index;
        if let Some(new) = index {
            if let Some(&item) = top.items.get(new) {
                ctx.dom.set_data(item, "highlighted", "true");
            }
        }
    }

    fn eligible(&self, dom: &Dom) -> Vec<usize> {
        let Some(top) = self.stack.last() else {
            return Vec::new();
        };
        top.items
            .iter()
            .enumerate()
            .filter(|(_, &item)| dom.get(item).is_some_and(|d| !d.disabled))
            .map(|(i, _)| i)
            .collect()
    }

    /// Move the highlight on the deepest surface; clamps at the ends.
    fn move_highlight(&mut self, ctx: &mut Ctx<'_>, delta: i32) {
        let eligible = self.eligible(ctx.dom);
        if eligible.is_empty() {
            return;
        }
        let current = self.stack.last().and_then(|t| t.highlight);
        let next = match current {
            None => {
                if delta >= 0 {
                    eligible[0]
                } else {
                    eligible[eligible.len() - 1]
                }
            }
            Some(cur) if delta >= 0 => eligible
                .iter()
                .copied()
                .find(|&i| i > cur)
                .unwrap_or(cur),
            Some(cur) => eligible
                .iter()
                .copied()
                .rev()
                .find(|&i| i < cur)
                .unwrap_or(cur),
        };
        self.set_highlight(ctx, Some(next));
    }

    pub(crate) fn highlight_first(&mut self, ctx: &mut Ctx<'_>) {
        let first = self.eligible(ctx.dom).first().copied();
        self.set_highlight(ctx, first);
    }

    fn highlight_last(&mut self, ctx: &mut Ctx<'_>) {
        let last = self.eligible(ctx.dom).last().copied();
        self.set_highlight(ctx, last);
    }

    /// `(depth, index)` of an item node within the open stack.
    fn locate(&self, target: NodeId) -> Option<(usize, usize)> {
        for (depth, open) in self.stack.iter().enumerate() {
            if let Some(idx) = open.items.iter().position(|&i| i == target) {
                return Some((depth, idx));
            }
        }
        None
    }

    // ── Submenus ─────────────────────────────────────────────────────

    fn open_submenu(&mut self, ctx: &mut Ctx<'_>, item: NodeId) {
        let Some(sub) = submenu_surface(ctx.dom, item) else {
            return;
        };
        if self.stack.iter().any(|open| open.surface == sub) {
            return;
        }
        // Unwind deeper levels that no longer contain the source item.
        while let Some(top) = self.stack.last() {
            if ctx.dom.is_within(item, top.surface) {
                break;
            }
            self.close_deepest(ctx);
        }
        ctx.dom.set_data(item, "state", "open");
        self.show(ctx, sub, item, PositionConfig::new(Placement::RIGHT_START));
    }

    /// Close submenu levels until the last hovered node is on the deepest
    /// surface. Runs when the hover close delay expires.
    fn close_to_hover(&mut self, ctx: &mut Ctx<'_>) {
        match self.last_hover {
            Some(node) => {
                while self.stack.len() > 1 {
                    let Some(top) = self.stack.last() else {
                        break;
                    };
                    if ctx.dom.is_within(node, top.surface) {
                        break;
                    }
                    self.close_deepest(ctx);
                }
            }
            None => {
                while self.stack.len() > 1 {
                    self.close_deepest(ctx);
                }
            }
        }
    }

    // ── Activation ───────────────────────────────────────────────────

    fn activate(&mut self, ctx: &mut Ctx<'_>) -> MenuSignal {
        let Some(top) = self.stack.last() else {
            return MenuSignal::None;
        };
        let Some(idx) = top.highlight else {
            return MenuSignal::None;
        };
        let Some(&item) = top.items.get(idx) else {
            return MenuSignal::None;
        };
        let Some(data) = ctx.dom.get(item) else {
            return MenuSignal::None;
        };
        if data.disabled {
            return MenuSignal::None;
        }

        match data.attrs.get("item-kind") {
            Some("submenu") => {
                self.open_submenu(ctx, item);
                self.highlight_first(ctx);
                MenuSignal::None
            }
            Some("checkbox") => {
                let label = data.text().to_string();
                let checked = ctx.dom.data_is(item, "checked", "true");
                ctx.dom
                    .set_data(item, "checked", if checked { "false" } else { "true" });
                self.close_all(ctx);
                MenuSignal::Selected(label)
            }
            Some("radio") => {
                let label = data.text().to_string();
                let group = data.attrs.get("radio-group").map(str::to_string);
                let surface = top.surface;
                if let Some(group) = group {
                    let siblings = item_nodes(ctx.dom, surface);
                    for sibling in siblings {
                        if ctx
                            .dom
                            .get(sibling)
                            .and_then(|d| d.attrs.get("radio-group"))
                            == Some(group.as_str())
                        {
                            ctx.dom.set_data(sibling, "checked", "false");
                        }
                    }
                }
                ctx.dom.set_data(item, "checked", "true");
                self.close_all(ctx);
                MenuSignal::Selected(label)
            }
            _ => {
                let label = data.text().to_string();
                self.close_all(ctx);
                MenuSignal::Selected(label)
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────────

    pub(crate) fn on_key(&mut self, ctx: &mut Ctx<'_>, key: KeyEvent) -> (Handled, MenuSignal) {
        if !self.is_open() {
            return match key.code {
                Key::Enter | Key::Char(' ') | Key::Down => {
                    self.open(ctx);
                    self.highlight_first(ctx);
                    (Handled::Yes, MenuSignal::None)
                }
                Key::Up => {
                    self.open(ctx);
                    self.highlight_last(ctx);
                    (Handled::Yes, MenuSignal::None)
                }
                _ => (Handled::No, MenuSignal::None),
            };
        }

        match key.code {
            Key::Down => {
                self.move_highlight(ctx, 1);
                (Handled::Yes, MenuSignal::None)
            }
            Key::Up => {
                self.move_highlight(ctx, -1);
                (Handled::Yes, MenuSignal::None)
            }
            Key::Home => {
                self.highlight_first(ctx);
                (Handled::Yes, MenuSignal::None)
            }
            Key::End => {
                self.highlight_last(ctx);
                (Handled::Yes, MenuSignal::None)
            }
            Key::Right => {
                let item = self.highlighted_item();
                match item {
                    Some(item) if has_submenu(ctx.dom, item) => {
                        self.open_submenu(ctx, item);
                        self.highlight_first(ctx);
                        (Handled::Yes, MenuSignal::None)
                    }
                    _ => (Handled::Yes, MenuSignal::NextTop),
                }
            }
            Key::Left => {
                if self.stack.len() > 1 {
                    self.close_deepest(ctx);
                    (Handled::Yes, MenuSignal::None)
                } else {
                    (Handled::Yes, MenuSignal::PrevTop)
                }
            }
            Key::Enter | Key::Char(' ') => {
                let signal = self.activate(ctx);
                (Handled::Yes, signal)
            }
            _ => (Handled::No, MenuSignal::None),
        }
    }

    fn highlighted_item(&self) -> Option<NodeId> {
        let top = self.stack.last()?;
        let idx = top.highlight?;
        top.items.get(idx).copied()
    }

    pub(crate) fn on_mouse(
        &mut self,
        ctx: &mut Ctx<'_>,
        target: NodeId,
        event: MouseEvent,
    ) -> (Handled, MenuSignal) {
        if event.is_press() {
            if ctx.dom.is_within(target, self.trigger) {
                if self.is_open() {
                    self.close_all(ctx);
                } else {
                    let disabled = ctx
                        .dom
                        .get(self.trigger)
                        .is_some_and(|d| d.disabled);
                    if !disabled {
                        self.open(ctx);
                    }
                }
                return (Handled::Yes, MenuSignal::None);
            }
            if self.locate(target).is_some() {
                return (Handled::Yes, MenuSignal::None);
            }
            return (Handled::No, MenuSignal::None);
        }

        if event.is_release() {
            if let Some((depth, idx)) = self.locate(target) {
                while self.stack.len() > depth + 1 {
                    self.close_deepest(ctx);
                }
                self.set_highlight(ctx, Some(idx));
                let signal = self.activate(ctx);
                return (Handled::Yes, signal);
            }
            return (Handled::No, MenuSignal::None);
        }

        if event.kind == MouseAction::Moved && self.is_open() {
            self.pointer_over(ctx, target);
        }
        (Handled::No, MenuSignal::None)
    }

    /// Hover tracking: highlight follows the pointer, submenu items arm an
    /// open intent, and leaving an open submenu's item arms a close intent
    /// instead of closing outright.
    fn pointer_over(&mut self, ctx: &mut Ctx<'_>, target: NodeId) {
        self.last_hover = Some(target);

        if let Some((depth, idx)) = self.locate(target) {
            // Highlight at the hovered level when it is the deepest one.
            if depth + 1 == self.stack.len() {
                let disabled = ctx.dom.get(target).is_some_and(|d| d.disabled);
                if !disabled {
                    self.set_highlight(ctx, Some(idx));
                }
            }
            let deeper_open = depth + 1 < self.stack.len();
            if ctx.dom.data_is(target, "state", "open") {
                // Back on the item owning the open submenu: the pending
                // close is off.
                self.pending_submenu = None;
                ctx.hover_enter(&mut self.hover, HOVER_TOKEN);
            } else if has_submenu(ctx.dom, target)
                && !ctx.dom.get(target).is_some_and(|d| d.disabled)
            {
                self.pending_submenu = Some(target);
                ctx.hover_enter(&mut self.hover, HOVER_TOKEN);
            } else if deeper_open {
                // Crossing a sibling of the item owning the open submenu.
                ctx.hover_leave(&mut self.hover, HOVER_TOKEN);
            }
            return;
        }

        // Not on an item: surface padding or the submenu surface itself.
        self.pending_submenu = None;
        let in_deepest = self
            .stack
            .last()
            .is_some_and(|top| ctx.dom.is_within(target, top.surface));
        if in_deepest || self.stack.len() < 2 {
            ctx.hover_enter(&mut self.hover, HOVER_TOKEN);
        } else {
            ctx.hover_leave(&mut self.hover, HOVER_TOKEN);
        }
    }

    pub(crate) fn pointer_left(&mut self, ctx: &mut Ctx<'_>) {
        if !self.is_open() {
            return;
        }
        self.last_hover = None;
        if self.stack.len() > 1 {
            ctx.hover_leave(&mut self.hover, HOVER_TOKEN);
        }
    }

    pub(crate) fn on_timer(&mut self, ctx: &mut Ctx<'_>, timer: FiredTimer) {
        if timer.token != HOVER_TOKEN {
            return;
        }
        match self.hover.resolve(timer.id) {
            Some(HoverFired::Open) => {
                if let Some(item) = self.pending_submenu.take() {
                    if self.is_open() {
                        self.open_submenu(ctx, item);
                    }
                }
            }
            Some(HoverFired::Close) => self.close_to_hover(ctx),
            None => {}
        }
    }
}

fn has_submenu(dom: &Dom, item: NodeId) -> bool {
    submenu_surface(dom, item).is_some()
}

// ---------------------------------------------------------------------------
// DropdownMenu
// ---------------------------------------------------------------------------

/// Configuration for a [`DropdownMenu`].
#[derive(Clone, Debug)]
pub struct DropdownMenuConfig {
    label: String,
    items: Vec<MenuItem>,
    position: PositionConfig,
    appearance: Appearance,
    disabled: bool,
    id: Option<String>,
}

impl DropdownMenuConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            items: Vec::new(),
            position: PositionConfig::new(Placement::BOTTOM_START),
            appearance: Appearance::default(),
            disabled: false,
            id: None,
        }
    }

    pub fn item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: Vec<MenuItem>) -> Self {
        self.items = items;
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

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Trigger button plus a floating menu of plain, checkbox, radio, and
/// submenu items.
pub struct DropdownMenu {
    config: DropdownMenuConfig,
    core: Option<MenuCore>,
    selection: Option<String>,
}

impl DropdownMenu {
    pub fn new(config: DropdownMenuConfig) -> Self {
        Self { config, core: None, selection: None }
    }

    pub fn is_open(&self) -> bool {
        self.core.as_ref().is_some_and(MenuCore::is_open)
    }

    /// Label of the last activated item.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn trigger(&self) -> Option<NodeId> {
        self.core.as_ref().map(MenuCore::trigger)
    }

    pub fn content(&self) -> Option<NodeId> {
        self.core.as_ref().map(MenuCore::surface)
    }
}

impl Controller for DropdownMenu {
    fn kind(&self) -> &'static str {
        "dropdown-menu"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("dropdown-menu")
            .with_attrs(part_attrs("dropdown-menu", "root", &Appearance::default()))
            .with_data("state", "closed");
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        let trigger = ctx.dom.insert_child(
            root,
            NodeData::new("button")
                .with_classes(part_classes("menu-trigger pad-x-2", &self.config.appearance))
                .with_attrs(part_attrs("dropdown-menu", "trigger", &self.config.appearance))
                .with_text(&self.config.label)
                .focusable(!self.config.disabled)
                .disabled(self.config.disabled)
                .with_data("state", "closed"),
        );
        let surface = build_surface(ctx.dom, root, "dropdown-menu", &self.config.items);
        self.core = Some(MenuCore::new(
            "dropdown-menu",
            trigger,
            surface,
            self.config.position,
        ));
        root
    }

    fn unmount(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(core) = self.core.as_mut() {
            core.close_all(ctx);
        }
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        let Some(core) = self.core.as_mut() else {
            return Handled::No;
        };
        let (handled, signal) = core.on_key(ctx, event);
        if let MenuSignal::Selected(label) = signal {
            self.selection = Some(label);
        }
        handled
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        let Some(core) = self.core.as_mut() else {
            return Handled::No;
        };
        let (handled, signal) = core.on_mouse(ctx, target, event);
        if let MenuSignal::Selected(label) = signal {
            self.selection = Some(label);
        }
        handled
    }

    fn on_pointer_left(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(core) = self.core.as_mut() {
            core.pointer_left(ctx);
        }
    }

    fn on_timer(&mut self, ctx: &mut Ctx<'_>, timer: FiredTimer) {
        if let Some(core) = self.core.as_mut() {
            core.on_timer(ctx, timer);
        }
    }

    fn on_dismiss(&mut self, ctx: &mut Ctx<'_>, _reason: DismissReason, _token: u32) {
        if let Some(core) = self.core.as_mut() {
            core.close_all(ctx);
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
