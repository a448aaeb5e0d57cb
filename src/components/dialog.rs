//! Dialog: a centered modal panel over a viewport-sized backdrop.
//!
//! Opening locks background scroll, traps focus inside the panel, and
//! stacks backdrop + panel as overlays. The backdrop consumes every pointer
//! event that misses the panel, so nothing behind the dialog can react
//! while it is open. Closing restores focus to where it was.

use tracing::trace;

use crate::controller::{Controller, Handled};
use crate::dom::{NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseEvent};
use crate::geometry::{Region, Size};
use crate::interaction::dismiss::{BindingId, DismissReason, EscapeOptions, OutsideClickOptions};
use crate::interaction::focus::TrapOptions;
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

const DISMISS_TOKEN: u32 = 0;

/// Configuration for a [`Dialog`].
#[derive(Clone, Debug)]
pub struct DialogConfig {
    trigger_label: String,
    title: String,
    description: Option<String>,
    size: Size,
    /// Escape and outside clicks are ignored while open.
    persistent: bool,
    appearance: Appearance,
    id: Option<String>,
}

impl DialogConfig {
    pub fn new(trigger_label: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            trigger_label: trigger_label.into(),
            title: title.into(),
            description: None,
            size: Size::new(40, 10),
            persistent: false,
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
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

/// Modal dialog with scroll lock, focus trap, and backdrop.
pub struct Dialog {
    config: DialogConfig,
    trigger: NodeId,
    backdrop: NodeId,
    panel: NodeId,
    body: NodeId,
    close_button: NodeId,
    open: bool,
    escape: Option<BindingId>,
    outside: Option<BindingId>,
}

impl Dialog {
    pub fn new(config: DialogConfig) -> Self {
        Self {
            config,
            trigger: NodeId::default(),
            backdrop: NodeId::default(),
            panel: NodeId::default(),
            body: NodeId::default(),
            close_button: NodeId::default(),
            open: false,
            escape: None,
            outside: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn panel(&self) -> NodeId {
        self.panel
    }

    pub fn backdrop(&self) -> NodeId {
        self.backdrop
    }

    /// Slot for host content between title and the close affordance.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn close_button(&self) -> NodeId {
        self.close_button
    }

    // ── Open / close ─────────────────────────────────────────────────

    fn open(&mut self, ctx: &mut Ctx<'_>) {
        if self.open {
            return;
        }
        trace!(title = %self.config.title, "dialog opened");
        self.open = true;
        ctx.dom.set_visible(self.backdrop, true);
        ctx.dom.set_visible(self.panel, true);
        ctx.dom.set_data(self.panel, "state", "open");
        ctx.dom.set_data(self.trigger, "state", "open");
        self.place(ctx);
        ctx.lock_scroll();
        ctx.push_overlay(self.backdrop);
        ctx.push_overlay(self.panel);
        ctx.activate_trap(self.panel, TrapOptions::default());
        self.escape = Some(ctx.attach_escape(
            DISMISS_TOKEN,
            EscapeOptions::new().stop_propagation(true),
        ));
        if !self.config.persistent {
            self.outside = Some(ctx.attach_outside_click(
                DISMISS_TOKEN,
                vec![self.panel],
                OutsideClickOptions::new(),
            ));
        }
    }

    fn close(&mut self, ctx: &mut Ctx<'_>) {
        if !self.open {
            return;
        }
        self.open = false;
        ctx.deactivate_trap(self.panel);
        ctx.unlock_scroll();
        ctx.pop_overlay(self.panel);
        ctx.pop_overlay(self.backdrop);
        ctx.dom.set_visible(self.backdrop, false);
        ctx.dom.set_visible(self.panel, false);
        ctx.dom.set_data(self.panel, "state", "closed");
        ctx.dom.set_data(self.trigger, "state", "closed");
        ctx.regions.remove(self.backdrop);
        ctx.regions.remove(self.panel);
        ctx.regions.remove(self.close_button);
        if let Some(id) = self.escape.take() {
            ctx.detach_escape(id);
        }
        if let Some(id) = self.outside.take() {
            ctx.detach_outside_click(id);
        }
    }

    /// Backdrop covers the viewport; the panel centers inside it.
    fn place(&self, ctx: &mut Ctx<'_>) {
        let vp = ctx.viewport();
        ctx.regions.set(self.backdrop, vp);
        let width = self.config.size.width.min(vp.width);
        let height = self.config.size.height.min(vp.height);
        let panel = Region::new(
            vp.x + (vp.width - width) / 2,
            vp.y + (vp.height - height) / 2,
            width,
            height,
        );
        ctx.regions.set(self.panel, panel);
        ctx.regions.set(
            self.close_button,
            Region::new(panel.x + panel.width - 2, panel.y, 1, 1),
        );
    }
}

impl Controller for Dialog {
    fn kind(&self) -> &'static str {
        "dialog"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("dialog")
            .with_attrs(part_attrs("dialog", "root", &self.config.appearance))
            .with_data("state", "closed");
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        self.trigger = ctx.dom.insert_child(
            root,
            NodeData::new("button")
                .with_classes(part_classes("border rounded pad-x-2", &self.config.appearance))
                .with_attrs(part_attrs("dialog", "trigger", &self.config.appearance))
                .with_text(&self.config.trigger_label)
                .focusable(true)
                .with_data("state", "closed"),
        );

        let mut backdrop_data = NodeData::new("backdrop")
            .with_class("dim")
            .with_attrs(part_attrs("dialog", "backdrop", &Appearance::default()));
        backdrop_data.visible = false;
        self.backdrop = ctx.dom.insert_child(root, backdrop_data);

        let mut panel_data = NodeData::new("panel")
            .with_classes(part_classes("border rounded pad-2", &Appearance::default()))
            .with_attrs(part_attrs("dialog", "content", &Appearance::default()))
            .with_data("state", "closed");
        panel_data.visible = false;
        self.panel = ctx.dom.insert_child(root, panel_data);

        ctx.dom.insert_child(
            self.panel,
            NodeData::new("heading")
                .with_attrs(part_attrs("dialog", "title", &Appearance::default()))
                .with_text(&self.config.title),
        );
        if let Some(description) = &self.config.description {
            ctx.dom.insert_child(
                self.panel,
                NodeData::new("text")
                    .with_class("muted")
                    .with_attrs(part_attrs("dialog", "description", &Appearance::default()))
                    .with_text(description),
            );
        }
        self.body = ctx.dom.insert_child(
            self.panel,
            NodeData::new("group")
                .with_attrs(part_attrs("dialog", "body", &Appearance::default())),
        );
        self.close_button = ctx.dom.insert_child(
            self.panel,
            NodeData::new("button")
                .with_attrs(part_attrs("dialog", "close", &Appearance::default()))
                .with_text("x")
                .focusable(true),
        );
        root
    }

    fn unmount(&mut self, ctx: &mut Ctx<'_>) {
        self.close(ctx);
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        if self.open {
            // Enter on the close affordance closes; everything else inside
            // the panel belongs to the host content.
            if event.code == Key::Enter && ctx.focused() == Some(self.close_button) {
                self.close(ctx);
                return Handled::Yes;
            }
            return Handled::No;
        }
        if ctx.focused() != Some(self.trigger) {
            return Handled::No;
        }
        match event.code {
            Key::Enter | Key::Char(' ') => {
                self.open(ctx);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if event.is_press() {
            if !self.open && ctx.dom.is_within(target, self.trigger) {
                self.open(ctx);
                return Handled::Yes;
            }
            if self.open && ctx.dom.is_within(target, self.backdrop) {
                // Modality: the press never reaches anything underneath.
                return Handled::Yes;
            }
            if self.open && ctx.dom.is_within(target, self.panel) {
                return Handled::Yes;
            }
            return Handled::No;
        }

        if event.is_release() && self.open {
            if ctx.dom.is_within(target, self.close_button) {
                self.close(ctx);
                return Handled::Yes;
            }
            if ctx.dom.is_within(target, self.backdrop) {
                return Handled::Yes;
            }
        }
        Handled::No
    }

    fn on_resize(&mut self, ctx: &mut Ctx<'_>, _viewport: Region) {
        if self.open {
            self.place(ctx);
        }
    }

    fn on_dismiss(&mut self, ctx: &mut Ctx<'_>, _reason: DismissReason, _token: u32) {
        if self.config.persistent {
            return;
        }
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
