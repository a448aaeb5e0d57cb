//! Menubar: a row of triggers sharing the menu surface machinery.
//!
//! Exactly one menu is open at a time; opening any trigger closes the
//! previous one first. With a menu open, ArrowLeft/ArrowRight at the root
//! surface move across the bar, and hovering another trigger switches
//! without a delay.

use crate::controller::{Controller, Handled};
use crate::dom::{NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseAction, MouseEvent};
use crate::interaction::dismiss::DismissReason;
use crate::interaction::intent::FiredTimer;
use crate::interaction::positioner::{Placement, PositionConfig};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

use super::menu::{build_surface, MenuCore, MenuItem, MenuSignal};

/// One top-level menu of a [`Menubar`].
#[derive(Clone, Debug)]
pub struct MenubarMenu {
    label: String,
    items: Vec<MenuItem>,
}

impl MenubarMenu {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), items: Vec::new() }
    }

    pub fn item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: Vec<MenuItem>) -> Self {
        self.items = items;
        self
    }
}

/// Configuration for a [`Menubar`].
#[derive(Clone, Debug, Default)]
pub struct MenubarConfig {
    menus: Vec<MenubarMenu>,
    appearance: Appearance,
    id: Option<String>,
}

impl MenubarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu(mut self, menu: MenubarMenu) -> Self {
        self.menus.push(menu);
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

/// Horizontal bar of mutually exclusive menus.
pub struct Menubar {
    config: MenubarConfig,
    cores: Vec<MenuCore>,
    active: Option<usize>,
    selection: Option<String>,
}

impl Menubar {
    pub fn new(config: MenubarConfig) -> Self {
        Self {
            config,
            cores: Vec::new(),
            active: None,
            selection: None,
        }
    }

    /// Index of the open menu, if any.
    pub fn open_menu(&self) -> Option<usize> {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Label of the last activated item across all menus.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn trigger(&self, index: usize) -> Option<NodeId> {
        self.cores.get(index).map(MenuCore::trigger)
    }

    pub fn content(&self, index: usize) -> Option<NodeId> {
        self.cores.get(index).map(MenuCore::surface)
    }

    fn open_at(&mut self, ctx: &mut Ctx<'_>, index: usize) {
        if let Some(old) = self.active.take() {
            if old != index {
                if let Some(core) = self.cores.get_mut(old) {
                    core.close_all(ctx);
                }
            }
        }
        if let Some(core) = self.cores.get_mut(index) {
            core.open(ctx);
            ctx.focus(core.trigger());
            self.active = Some(index);
        }
    }

    fn close_active(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(index) = self.active.take() {
            if let Some(core) = self.cores.get_mut(index) {
                core.close_all(ctx);
            }
        }
    }

    /// Close the open menu and open its neighbor, wrapping at the ends.
    fn cycle(&mut self, ctx: &mut Ctx<'_>, from: usize, delta: i64) {
        let n = self.cores.len();
        if n == 0 {
            return;
        }
        let next = (from as i64 + delta).rem_euclid(n as i64) as usize;
        self.open_at(ctx, next);
        if let Some(core) = self.cores.get_mut(next) {
            core.highlight_first(ctx);
        }
    }

    fn trigger_index(&self, node: NodeId) -> Option<usize> {
        self.cores.iter().position(|c| c.trigger() == node)
    }

    fn apply_signal(&mut self, ctx: &mut Ctx<'_>, from: usize, signal: MenuSignal) {
        match signal {
            MenuSignal::Selected(label) => {
                self.selection = Some(label);
                self.active = None;
            }
            MenuSignal::PrevTop => self.cycle(ctx, from, -1),
            MenuSignal::NextTop => self.cycle(ctx, from, 1),
            MenuSignal::None => {}
        }
    }
}

impl Controller for Menubar {
    fn kind(&self) -> &'static str {
        "menubar"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("menubar")
            .with_classes(part_classes("row gap-1 border-b", &self.config.appearance))
            .with_attrs(part_attrs("menubar", "root", &self.config.appearance));
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        for menu in &self.config.menus {
            let trigger = ctx.dom.insert_child(
                root,
                NodeData::new("button")
                    .with_classes(part_classes("menu-trigger pad-x-1", &Appearance::default()))
                    .with_attrs(part_attrs("menubar", "trigger", &Appearance::default()))
                    .with_text(&menu.label)
                    .focusable(true)
                    .with_data("state", "closed"),
            );
            let surface = build_surface(ctx.dom, root, "menubar", &menu.items);
            self.cores.push(MenuCore::new(
                "menubar",
                trigger,
                surface,
                PositionConfig::new(Placement::BOTTOM_START),
            ));
        }
        root
    }

    fn unmount(&mut self, ctx: &mut Ctx<'_>) {
        self.close_active(ctx);
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        if let Some(index) = self.active {
            let Some(core) = self.cores.get_mut(index) else {
                return Handled::No;
            };
            let (handled, signal) = core.on_key(ctx, event);
            self.apply_signal(ctx, index, signal);
            return handled;
        }

        // Closed: keys act on the focused trigger.
        let Some(focused) = ctx.focused() else {
            return Handled::No;
        };
        let Some(index) = self.trigger_index(focused) else {
            return Handled::No;
        };
        match event.code {
            Key::Enter | Key::Char(' ') | Key::Down | Key::Up => {
                let Some(core) = self.cores.get_mut(index) else {
                    return Handled::No;
                };
                let (handled, signal) = core.on_key(ctx, event);
                if core.is_open() {
                    self.active = Some(index);
                }
                self.apply_signal(ctx, index, signal);
                handled
            }
            Key::Left | Key::Right => {
                let n = self.cores.len();
                if n == 0 {
                    return Handled::No;
                }
                let delta: i64 = if event.code == Key::Right { 1 } else { -1 };
                let next = (index as i64 + delta).rem_euclid(n as i64) as usize;
                if let Some(core) = self.cores.get(next) {
                    ctx.focus(core.trigger());
                }
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if let Some(index) = self.trigger_index(target) {
            if event.is_press() {
                match self.active {
                    Some(open) if open == index => self.close_active(ctx),
                    _ => self.open_at(ctx, index),
                }
                return Handled::Yes;
            }
            if event.kind == MouseAction::Moved {
                // Hovering a sibling trigger while the bar is open switches
                // menus immediately.
                if let Some(open) = self.active {
                    if open != index {
                        self.open_at(ctx, index);
                    }
                }
            }
            return Handled::No;
        }

        if let Some(index) = self.active {
            let Some(core) = self.cores.get_mut(index) else {
                return Handled::No;
            };
            let (handled, signal) = core.on_mouse(ctx, target, event);
            self.apply_signal(ctx, index, signal);
            return handled;
        }
        Handled::No
    }

    fn on_pointer_left(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(index) = self.active {
            if let Some(core) = self.cores.get_mut(index) {
                core.pointer_left(ctx);
            }
        }
    }

    fn on_timer(&mut self, ctx: &mut Ctx<'_>, timer: FiredTimer) {
        if let Some(index) = self.active {
            if let Some(core) = self.cores.get_mut(index) {
                core.on_timer(ctx, timer);
            }
        }
    }

    fn on_dismiss(&mut self, ctx: &mut Ctx<'_>, _reason: DismissReason, _token: u32) {
        self.close_active(ctx);
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

    fn bar_config() -> MenubarConfig {
        MenubarConfig::new()
            .menu(MenubarMenu::new("File").item(MenuItem::new("Open")).item(MenuItem::new("Save")))
            .menu(MenubarMenu::new("Edit").item(MenuItem::new("Undo")))
            .menu(MenubarMenu::new("View").item(MenuItem::new("Zoom")))
    }

    fn mounted(ui: &mut Ui, root: NodeId) -> crate::controller::Mounted<Menubar> {
        let handle = ui.mount(Menubar::new(bar_config()), root);
        for i in 0..3 {
            let trigger = ui.controller(&handle).and_then(|b| b.trigger(i)).unwrap();
            ui.regions.set(trigger, Region::new(1 + i as i32 * 8, 0, 6, 1));
        }
        handle
    }

    #[test]
    fn opening_one_menu_closes_the_other() {
        let (mut ui, root) = shell();
        let bar = mounted(&mut ui, root);

        ui.handle_input(InputEvent::Mouse(MouseEvent::down(2, 0)));
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), Some(0));
        let file_surface = ui.controller(&bar).and_then(|b| b.content(0)).unwrap();
        assert!(ui.dom.data_is(file_surface, "state", "open"));

        ui.handle_input(InputEvent::Mouse(MouseEvent::down(10, 0)));
        let b = ui.controller(&bar).unwrap();
        assert_eq!(b.open_menu(), Some(1));
        assert!(ui.dom.data_is(file_surface, "state", "closed"));
        let edit_surface = b.content(1).unwrap();
        assert!(ui.dom.data_is(edit_surface, "state", "open"));
    }

    #[test]
    fn pressing_the_open_trigger_closes_the_bar() {
        let (mut ui, root) = shell();
        let bar = mounted(&mut ui, root);
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(2, 0)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(2, 0)));
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), None);
    }

    #[test]
    fn arrows_move_across_open_menus_and_wrap() {
        let (mut ui, root) = shell();
        let bar = mounted(&mut ui, root);
        let trigger = ui.controller(&bar).and_then(|b| b.trigger(0)).unwrap();
        ui.focus(trigger);
        key(&mut ui, Key::Enter);
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), Some(0));

        // "Open" has no submenu: ArrowRight advances the bar.
        key(&mut ui, Key::Right);
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), Some(1));
        key(&mut ui, Key::Right);
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), Some(2));
        key(&mut ui, Key::Right);
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), Some(0));
        key(&mut ui, Key::Left);
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), Some(2));
    }

    #[test]
    fn closed_bar_arrows_move_focus_between_triggers() {
        let (mut ui, root) = shell();
        let bar = mounted(&mut ui, root);
        let t0 = ui.controller(&bar).and_then(|b| b.trigger(0)).unwrap();
        let t1 = ui.controller(&bar).and_then(|b| b.trigger(1)).unwrap();
        ui.focus(t0);

        key(&mut ui, Key::Right);
        assert_eq!(ui.focused(), Some(t1));
        assert!(!ui.controller(&bar).unwrap().is_open());

        key(&mut ui, Key::Left);
        assert_eq!(ui.focused(), Some(t0));
    }

    #[test]
    fn hovering_a_sibling_trigger_switches_when_open() {
        let (mut ui, root) = shell();
        let bar = mounted(&mut ui, root);
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(2, 0)));
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), Some(0));

        ui.handle_input(InputEvent::Mouse(MouseEvent::moved(10, 0)));
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), Some(1));

        // Hovering with everything closed does nothing.
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(70, 20)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::moved(2, 0)));
        assert_eq!(ui.controller(&bar).unwrap().open_menu(), None);
    }

    #[test]
    fn selection_in_any_menu_records_the_label_and_closes() {
        let (mut ui, root) = shell();
        let bar = mounted(&mut ui, root);
        let trigger = ui.controller(&bar).and_then(|b| b.trigger(0)).unwrap();
        ui.focus(trigger);
        key(&mut ui, Key::Enter);
        key(&mut ui, Key::Down);
        key(&mut ui, Key::Enter);

        let b = ui.controller(&bar).unwrap();
        assert_eq!(b.selection(), Some("Save"));
        assert!(!b.is_open());
    }

    #[test]
    fn escape_closes_the_open_menu() {
        let (mut ui, root) = shell();
        let bar = mounted(&mut ui, root);
        let trigger = ui.controller(&bar).and_then(|b| b.trigger(2)).unwrap();
        ui.focus(trigger);
        key(&mut ui, Key::Enter);
        key(&mut ui, Key::Escape);
        assert!(!ui.controller(&bar).unwrap().is_open());
    }
}
