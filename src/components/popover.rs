//! Popover: a non-modal anchored surface with a host-filled body.
//!
//! No focus trap and no scroll lock; the page behind stays interactive.
//! Outside clicks and Escape dismiss it.

use crate::controller::{Controller, Handled};
use crate::dom::{NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseEvent};
use crate::geometry::Size;
use crate::interaction::dismiss::{BindingId, DismissReason, EscapeOptions, OutsideClickOptions};
use crate::interaction::positioner::{Placement, PositionConfig};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

const DISMISS_TOKEN: u32 = 0;

/// Configuration for a [`Popover`].
#[derive(Clone, Debug)]
pub struct PopoverConfig {
    trigger_label: String,
    title: Option<String>,
    size: Size,
    position: PositionConfig,
    appearance: Appearance,
    id: Option<String>,
}

impl PopoverConfig {
    pub fn new(trigger_label: impl Into<String>) -> Self {
        Self {
            trigger_label: trigger_label.into(),
            title: None,
            size: Size::new(24, 8),
            position: PositionConfig::new(Placement::BOTTOM_CENTER),
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Content size; popover bodies are host-filled, so it cannot be
    /// measured from children.
    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
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

/// Non-modal floating surface.
pub struct Popover {
    config: PopoverConfig,
    trigger: NodeId,
    surface: NodeId,
    body: NodeId,
    open: bool,
    outside: Option<BindingId>,
    escape: Option<BindingId>,
}

impl Popover {
    pub fn new(config: PopoverConfig) -> Self {
        Self {
            config,
            trigger: NodeId::default(),
            surface: NodeId::default(),
            body: NodeId::default(),
            open: false,
            outside: None,
            escape: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn content(&self) -> NodeId {
        self.surface
    }

    /// Slot for host content.
    pub fn body(&self) -> NodeId {
        self.body
    }

    fn open(&mut self, ctx: &mut Ctx<'_>) {
        if self.open {
            return;
        }
        self.open = true;
        ctx.dom.set_visible(self.surface, true);
        ctx.dom.set_data(self.surface, "state", "open");
        ctx.dom.set_data(self.trigger, "state", "open");
        ctx.start_positioning(self.trigger, self.surface, self.config.size, self.config.position);
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
    }

    fn close(&mut self, ctx: &mut Ctx<'_>) {
        if !self.open {
            return;
        }
        self.open = false;
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
    }
}

impl Controller for Popover {
    fn kind(&self) -> &'static str {
        "popover"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("popover")
            .with_attrs(part_attrs("popover", "root", &self.config.appearance))
            .with_data("state", "closed");
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        self.trigger = ctx.dom.insert_child(
            root,
            NodeData::new("button")
                .with_classes(part_classes("border rounded pad-x-2", &self.config.appearance))
                .with_attrs(part_attrs("popover", "trigger", &self.config.appearance))
                .with_text(&self.config.trigger_label)
                .focusable(true)
                .with_data("state", "closed"),
        );

        let mut surface_data = NodeData::new("surface")
            .with_classes(part_classes("border rounded pad-1", &Appearance::default()))
            .with_attrs(part_attrs("popover", "content", &Appearance::default()))
            .with_data("state", "closed");
        surface_data.visible = false;
        self.surface = ctx.dom.insert_child(root, surface_data);

        if let Some(title) = &self.config.title {
            ctx.dom.insert_child(
                self.surface,
                NodeData::new("heading")
                    .with_attrs(part_attrs("popover", "title", &Appearance::default()))
                    .with_text(title),
            );
        }
        self.body = ctx.dom.insert_child(
            self.surface,
            NodeData::new("group")
                .with_attrs(part_attrs("popover", "body", &Appearance::default())),
        );
        root
    }

    fn unmount(&mut self, ctx: &mut Ctx<'_>) {
        self.close(ctx);
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        if ctx.focused() != Some(self.trigger) {
            return Handled::No;
        }
        match event.code {
            Key::Enter | Key::Char(' ') => {
                if self.open {
                    self.close(ctx);
                } else {
                    self.open(ctx);
                }
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if !event.is_press() {
            return Handled::No;
        }
        if ctx.dom.is_within(target, self.trigger) {
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
        Handled::No
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;
    use crate::geometry::Region;
    use crate::ui::Ui;

    fn shell() -> (Ui, NodeId, NodeId) {
        let mut ui = Ui::new(Region::new(0, 0, 80, 24));
        let root = ui.dom.insert(NodeData::new("shell"));
        ui.dom.set_root(root);
        let aside = ui
            .dom
            .insert_child(root, NodeData::new("button").with_text("Other").focusable(true));
        ui.regions.set(aside, Region::new(60, 20, 8, 1));
        (ui, root, aside)
    }

    fn key(ui: &mut Ui, code: Key) {
        ui.handle_input(InputEvent::Key(KeyEvent::plain(code)));
    }

    fn mounted(ui: &mut Ui, root: NodeId) -> crate::controller::Mounted<Popover> {
        let config = PopoverConfig::new("Dimensions").title("Layout");
        let handle = ui.mount(Popover::new(config), root);
        let trigger = ui.controller(&handle).unwrap().trigger();
        ui.regions.set(trigger, Region::new(4, 2, 12, 1));
        ui.focus(trigger);
        handle
    }

    #[test]
    fn trigger_toggles_and_the_surface_floats_below() {
        let (mut ui, root, _aside) = shell();
        let popover = mounted(&mut ui, root);

        key(&mut ui, Key::Enter);
        let p = ui.controller(&popover).unwrap();
        assert!(p.is_open());
        let region = ui.regions.get(p.content()).unwrap();
        assert_eq!(region.y, 3); // directly under the trigger row
        assert!(ui.dom.data_is(p.content(), "state", "open"));

        key(&mut ui, Key::Enter);
        let p = ui.controller(&popover).unwrap();
        assert!(!p.is_open());
        assert_eq!(ui.regions.get(p.content()), None);
    }

    #[test]
    fn stays_non_modal_while_open() {
        let (mut ui, root, aside) = shell();
        let popover = mounted(&mut ui, root);
        key(&mut ui, Key::Enter);

        // Scroll is not locked and the click lands on the background button,
        // which also dismisses the popover.
        assert!(!ui.is_scroll_locked());
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(61, 20)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(61, 20)));
        assert_eq!(ui.focused(), Some(aside));
        assert!(!ui.controller(&popover).unwrap().is_open());
    }

    #[test]
    fn escape_dismisses() {
        let (mut ui, root, _aside) = shell();
        let popover = mounted(&mut ui, root);
        key(&mut ui, Key::Enter);
        key(&mut ui, Key::Escape);
        assert!(!ui.controller(&popover).unwrap().is_open());
    }
}
