//! Tooltip: a hover-intent bubble anchored to its trigger.
//!
//! Opens after the hover delay, closes after the leave delay, and crossing
//! away and back within the close delay never flickers it shut. The bubble
//! is never focusable and never participates in tab order.

use std::time::Duration;

use crate::controller::{Controller, Handled};
use crate::dom::{NodeData, NodeId};
use crate::event::{KeyEvent, MouseAction, MouseEvent};
use crate::geometry::Size;
use crate::interaction::dismiss::{BindingId, DismissReason, EscapeOptions};
use crate::interaction::intent::{FiredTimer, HoverFired, HoverIntent};
use crate::interaction::positioner::{Placement, PositionConfig};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

const DISMISS_TOKEN: u32 = 0;
const HOVER_TOKEN: u32 = 1;

/// Configuration for a [`Tooltip`].
#[derive(Clone, Debug)]
pub struct TooltipConfig {
    trigger_label: String,
    text: String,
    position: PositionConfig,
    open_delay: Duration,
    close_delay: Duration,
    appearance: Appearance,
    id: Option<String>,
}

impl TooltipConfig {
    pub fn new(trigger_label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            trigger_label: trigger_label.into(),
            text: text.into(),
            position: PositionConfig::new(Placement::TOP_CENTER),
            open_delay: HoverIntent::DEFAULT_OPEN_DELAY,
            close_delay: HoverIntent::DEFAULT_CLOSE_DELAY,
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn position(mut self, position: PositionConfig) -> Self {
        self.position = position;
        self
    }

    pub fn open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    pub fn close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
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

/// Hover bubble around a trigger.
pub struct Tooltip {
    config: TooltipConfig,
    trigger: NodeId,
    bubble: NodeId,
    visible: bool,
    hover: HoverIntent,
    escape: Option<BindingId>,
}

impl Tooltip {
    pub fn new(config: TooltipConfig) -> Self {
        let hover = HoverIntent::new(config.open_delay, config.close_delay);
        Self {
            config,
            trigger: NodeId::default(),
            bubble: NodeId::default(),
            visible: false,
            hover,
            escape: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn bubble(&self) -> NodeId {
        self.bubble
    }

    fn show(&mut self, ctx: &mut Ctx<'_>) {
        if self.visible {
            return;
        }
        self.visible = true;
        ctx.dom.set_visible(self.bubble, true);
        ctx.dom.set_data(self.bubble, "state", "open");
        ctx.dom.set_data(self.trigger, "state", "open");
        let width = self.config.text.chars().count() as i32 + 2;
        ctx.start_positioning(
            self.trigger,
            self.bubble,
            Size::new(width, 1),
            self.config.position,
        );
        ctx.push_overlay(self.bubble);
        self.escape = Some(ctx.attach_escape(DISMISS_TOKEN, EscapeOptions::new()));
    }

    fn hide(&mut self, ctx: &mut Ctx<'_>) {
        if !self.visible {
            return;
        }
        self.visible = false;
        ctx.dom.set_visible(self.bubble, false);
        ctx.dom.set_data(self.bubble, "state", "closed");
        ctx.dom.set_data(self.trigger, "state", "closed");
        ctx.stop_positioning(self.bubble);
        ctx.pop_overlay(self.bubble);
        ctx.regions.remove(self.bubble);
        if let Some(id) = self.escape.take() {
            ctx.detach_escape(id);
        }
        ctx.hover_cancel(&mut self.hover);
    }
}

impl Controller for Tooltip {
    fn kind(&self) -> &'static str {
        "tooltip"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("tooltip")
            .with_attrs(part_attrs("tooltip", "root", &self.config.appearance));
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        self.trigger = ctx.dom.insert_child(
            root,
            NodeData::new("label")
                .with_classes(part_classes("underline-dotted", &self.config.appearance))
                .with_attrs(part_attrs("tooltip", "trigger", &self.config.appearance))
                .with_text(&self.config.trigger_label)
                .with_data("state", "closed"),
        );

        let mut bubble_data = NodeData::new("bubble")
            .with_classes(part_classes("rounded pad-x-1 inverted", &Appearance::default()))
            .with_attrs(part_attrs("tooltip", "content", &Appearance::default()))
            .with_text(&self.config.text)
            .with_data("state", "closed");
        bubble_data.visible = false;
        self.bubble = ctx.dom.insert_child(root, bubble_data);
        root
    }

    fn unmount(&mut self, ctx: &mut Ctx<'_>) {
        self.hide(ctx);
    }

    fn on_key(&mut self, _ctx: &mut Ctx<'_>, _event: KeyEvent) -> Handled {
        Handled::No
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if event.kind != MouseAction::Moved {
            return Handled::No;
        }
        // Hovering the bubble itself counts as staying on the trigger.
        if ctx.dom.is_within(target, self.trigger) || ctx.dom.is_within(target, self.bubble) {
            ctx.hover_enter(&mut self.hover, HOVER_TOKEN);
        }
        Handled::No
    }

    fn on_pointer_left(&mut self, ctx: &mut Ctx<'_>) {
        ctx.hover_leave(&mut self.hover, HOVER_TOKEN);
    }

    fn on_timer(&mut self, ctx: &mut Ctx<'_>, timer: FiredTimer) {
        if timer.token != HOVER_TOKEN {
            return;
        }
        match self.hover.resolve(timer.id) {
            Some(HoverFired::Open) => self.show(ctx),
            Some(HoverFired::Close) => self.hide(ctx),
            None => {}
        }
    }

    fn on_dismiss(&mut self, ctx: &mut Ctx<'_>, _reason: DismissReason, _token: u32) {
        self.hide(ctx);
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
