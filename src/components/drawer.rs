//! Drawer: a modal sheet that rises from the bottom edge.
//!
//! The sheet opens at the first of its snap points, each a fraction of the
//! viewport height. Arrow keys on the grip step between snap points;
//! stepping below the first one closes. Dragging the grip resizes the sheet
//! live, and release settles on the nearest snap point, or closes when the
//! nearest resting place is fully shut.

use tracing::trace;

use crate::controller::{Controller, Handled};
use crate::dom::{NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseAction, MouseEvent};
use crate::geometry::Region;
use crate::interaction::dismiss::{BindingId, DismissReason, EscapeOptions, OutsideClickOptions};
use crate::interaction::focus::TrapOptions;
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

const DISMISS_TOKEN: u32 = 0;

/// Configuration for a [`Drawer`].
#[derive(Clone, Debug)]
pub struct DrawerConfig {
    trigger_label: String,
    title: Option<String>,
    /// Resting heights as fractions of the viewport, low to high.
    snap_points: Vec<f64>,
    appearance: Appearance,
    id: Option<String>,
}

impl DrawerConfig {
    pub fn new(trigger_label: impl Into<String>) -> Self {
        Self {
            trigger_label: trigger_label.into(),
            title: None,
            snap_points: vec![0.5],
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn snap_points(mut self, points: &[f64]) -> Self {
        self.snap_points = points.to_vec();
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

/// Bottom sheet with snap points and drag resizing.
pub struct Drawer {
    config: DrawerConfig,
    trigger: NodeId,
    backdrop: NodeId,
    panel: NodeId,
    grip: NodeId,
    body: NodeId,
    open: bool,
    snap: usize,
    dragging: bool,
    escape: Option<BindingId>,
    outside: Option<BindingId>,
}

impl Drawer {
    pub fn new(config: DrawerConfig) -> Self {
        let mut config = config;
        let mut points: Vec<f64> = config
            .snap_points
            .iter()
            .copied()
            .filter(|p| p.is_finite() && *p > 0.0 && *p <= 1.0)
            .collect();
        points.sort_by(f64::total_cmp);
        points.dedup();
        if points.is_empty() {
            points.push(0.5);
        }
        config.snap_points = points;
        Self {
            config,
            trigger: NodeId::default(),
            backdrop: NodeId::default(),
            panel: NodeId::default(),
            grip: NodeId::default(),
            body: NodeId::default(),
            open: false,
            snap: 0,
            dragging: false,
            escape: None,
            outside: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Index into the snap points the sheet is resting at.
    pub fn snap_index(&self) -> usize {
        self.snap
    }

    pub fn snap_fraction(&self) -> f64 {
        self.config.snap_points[self.snap]
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn panel(&self) -> NodeId {
        self.panel
    }

    pub fn grip(&self) -> NodeId {
        self.grip
    }

    /// Slot for host content below the grip and title.
    pub fn body(&self) -> NodeId {
        self.body
    }

    // ── Open / close ─────────────────────────────────────────────────

    fn open(&mut self, ctx: &mut Ctx<'_>) {
        if self.open {
            return;
        }
        trace!(fraction = self.config.snap_points[0], "drawer opened");
        self.open = true;
        self.snap = 0;
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
        self.outside = Some(ctx.attach_outside_click(
            DISMISS_TOKEN,
            vec![self.panel],
            OutsideClickOptions::new(),
        ));
    }

    fn close(&mut self, ctx: &mut Ctx<'_>) {
        if !self.open {
            return;
        }
        self.open = false;
        self.dragging = false;
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
        ctx.regions.remove(self.grip);
        if let Some(id) = self.escape.take() {
            ctx.detach_escape(id);
        }
        if let Some(id) = self.outside.take() {
            ctx.detach_outside_click(id);
        }
    }

    /// Pin the sheet to the bottom edge at the current snap height.
    fn place(&self, ctx: &mut Ctx<'_>) {
        let fraction = self.config.snap_points[self.snap];
        let vp = ctx.viewport();
        ctx.regions.set(self.backdrop, vp);
        self.place_at_height(ctx, height_for(vp, fraction));
        ctx.dom.set_data(self.panel, "snap", &fraction.to_string());
    }

    fn place_at_height(&self, ctx: &mut Ctx<'_>, height: i32) {
        let vp = ctx.viewport();
        let top = vp.y + vp.height - height;
        ctx.regions.set(self.panel, Region::new(vp.x, top, vp.width, height));
        ctx.regions.set(self.grip, Region::new(vp.x, top, vp.width, 1));
    }

    fn fraction_from_y(&self, ctx: &Ctx<'_>, y: i32) -> f64 {
        let vp = ctx.viewport();
        let height = (vp.y + vp.height - y).clamp(1, vp.height);
        height as f64 / vp.height as f64
    }

    /// Rest at whichever snap point is nearest to the released height,
    /// treating fully shut as one more candidate.
    fn settle(&mut self, ctx: &mut Ctx<'_>, y: i32) {
        let fraction = self.fraction_from_y(ctx, y);
        let mut nearest = None;
        let mut best = fraction; // distance to fully shut
        for (i, &point) in self.config.snap_points.iter().enumerate() {
            let distance = (fraction - point).abs();
            if distance <= best {
                best = distance;
                nearest = Some(i);
            }
        }
        match nearest {
            Some(index) => {
                trace!(fraction = self.config.snap_points[index], "drawer settled");
                self.snap = index;
                self.place(ctx);
            }
            None => self.close(ctx),
        }
    }
}

impl Controller for Drawer {
    fn kind(&self) -> &'static str {
        "drawer"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("drawer")
            .with_attrs(part_attrs("drawer", "root", &self.config.appearance))
            .with_data("state", "closed");
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        self.trigger = ctx.dom.insert_child(
            root,
            NodeData::new("button")
                .with_classes(part_classes("border rounded pad-x-2", &self.config.appearance))
                .with_attrs(part_attrs("drawer", "trigger", &self.config.appearance))
                .with_text(&self.config.trigger_label)
                .focusable(true)
                .with_data("state", "closed"),
        );

        let mut backdrop_data = NodeData::new("backdrop")
            .with_class("dim")
            .with_attrs(part_attrs("drawer", "backdrop", &Appearance::default()));
        backdrop_data.visible = false;
        self.backdrop = ctx.dom.insert_child(root, backdrop_data);

        let mut panel_data = NodeData::new("panel")
            .with_classes(part_classes("border-t pad-x-2", &Appearance::default()))
            .with_attrs(part_attrs("drawer", "content", &Appearance::default()))
            .with_data("state", "closed");
        panel_data.visible = false;
        self.panel = ctx.dom.insert_child(root, panel_data);

        self.grip = ctx.dom.insert_child(
            self.panel,
            NodeData::new("grip")
                .with_attrs(part_attrs("drawer", "grip", &Appearance::default()))
                .with_text("──────")
                .focusable(true),
        );
        if let Some(title) = &self.config.title {
            ctx.dom.insert_child(
                self.panel,
                NodeData::new("heading")
                    .with_attrs(part_attrs("drawer", "title", &Appearance::default()))
                    .with_text(title),
            );
        }
        self.body = ctx.dom.insert_child(
            self.panel,
            NodeData::new("group")
                .with_attrs(part_attrs("drawer", "body", &Appearance::default())),
        );
        root
    }

    fn unmount(&mut self, ctx: &mut Ctx<'_>) {
        self.close(ctx);
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        if self.open {
            if ctx.focused() != Some(self.grip) {
                return Handled::No;
            }
            match event.code {
                Key::Up => {
                    if self.snap + 1 < self.config.snap_points.len() {
                        self.snap += 1;
                        self.place(ctx);
                    }
                    Handled::Yes
                }
                Key::Down => {
                    if self.snap == 0 {
                        self.close(ctx);
                    } else {
                        self.snap -= 1;
                        self.place(ctx);
                    }
                    Handled::Yes
                }
                _ => Handled::No,
            }
        } else {
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
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if event.is_press() {
            if !self.open && ctx.dom.is_within(target, self.trigger) {
                self.open(ctx);
                return Handled::Yes;
            }
            if self.open && ctx.dom.is_within(target, self.grip) {
                self.dragging = true;
                return Handled::Yes;
            }
            if self.open
                && (ctx.dom.is_within(target, self.panel)
                    || ctx.dom.is_within(target, self.backdrop))
            {
                // Modality: presses that miss the sheet stop here.
                return Handled::Yes;
            }
            return Handled::No;
        }

        if matches!(event.kind, MouseAction::Drag(_)) && self.dragging {
            let vp = ctx.viewport();
            let height = (vp.y + vp.height - event.y as i32).clamp(1, vp.height);
            self.place_at_height(ctx, height);
            return Handled::Yes;
        }

        if event.is_release() && self.open {
            if self.dragging {
                self.dragging = false;
                self.settle(ctx, event.y as i32);
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
        self.close(ctx);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

fn height_for(vp: Region, fraction: f64) -> i32 {
    ((vp.height as f64 * fraction).round() as i32).clamp(1, vp.height)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;
    use crate::ui::Ui;

    fn shell() -> (Ui, NodeId, NodeId) {
        let mut ui = Ui::new(Region::new(0, 0, 80, 24));
        let root = ui.dom.insert(NodeData::new("shell"));
        ui.dom.set_root(root);
        let aside = ui
            .dom
            .insert_child(root, NodeData::new("button").with_text("Behind").focusable(true));
        ui.regions.set(aside, Region::new(1, 1, 10, 1));
        (ui, root, aside)
    }

    fn key(ui: &mut Ui, code: Key) {
        ui.handle_input(InputEvent::Key(KeyEvent::plain(code)));
    }

    fn mounted(ui: &mut Ui, root: NodeId) -> crate::controller::Mounted<Drawer> {
        let config = DrawerConfig::new("Open drawer").snap_points(&[0.25, 0.5, 0.9]);
        let handle = ui.mount(Drawer::new(config), root);
        let trigger = ui.controller(&handle).unwrap().trigger();
        ui.regions.set(trigger, Region::new(2, 1, 13, 1));
        ui.focus(trigger);
        handle
    }

    #[test]
    fn opening_rises_to_the_first_snap_point() {
        let (mut ui, root, _aside) = shell();
        let drawer = mounted(&mut ui, root);

        key(&mut ui, Key::Enter);
        let d = ui.controller(&drawer).unwrap();
        assert!(d.is_open());
        assert!(ui.is_scroll_locked());
        // 0.25 of 24 rows is 6, pinned to the bottom.
        assert_eq!(ui.regions.get(d.panel()), Some(Region::new(0, 18, 80, 6)));
        assert!(ui.dom.data_is(d.panel(), "snap", "0.25"));
        // The trap auto-focused the grip.
        assert_eq!(ui.focused(), Some(d.grip()));
    }

    #[test]
    fn arrows_step_through_snap_points_and_close_below_the_first() {
        let (mut ui, root, _aside) = shell();
        let drawer = mounted(&mut ui, root);
        let trigger = ui.controller(&drawer).unwrap().trigger();
        key(&mut ui, Key::Enter);

        key(&mut ui, Key::Up);
        let d = ui.controller(&drawer).unwrap();
        assert_eq!(ui.regions.get(d.panel()), Some(Region::new(0, 12, 80, 12)));
        key(&mut ui, Key::Up);
        let d = ui.controller(&drawer).unwrap();
        assert_eq!(d.snap_fraction(), 0.9);
        key(&mut ui, Key::Up); // already at the top snap
        assert_eq!(ui.controller(&drawer).unwrap().snap_fraction(), 0.9);

        key(&mut ui, Key::Down);
        key(&mut ui, Key::Down);
        assert_eq!(ui.controller(&drawer).unwrap().snap_index(), 0);
        key(&mut ui, Key::Down); // below the first: closes
        let d = ui.controller(&drawer).unwrap();
        assert!(!d.is_open());
        assert!(!ui.is_scroll_locked());
        assert_eq!(ui.focused(), Some(trigger));
    }

    #[test]
    fn dragging_settles_on_the_nearest_snap_point() {
        let (mut ui, root, _aside) = shell();
        let drawer = mounted(&mut ui, root);
        key(&mut ui, Key::Enter);

        // Grab the grip at row 18 and pull it up to row 10.
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(40, 18)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::drag(40, 10)));
        let d = ui.controller(&drawer).unwrap();
        // Live height while dragging, not yet snapped.
        assert_eq!(ui.regions.get(d.panel()), Some(Region::new(0, 10, 80, 14)));

        // 14 of 24 rows is nearest the 0.5 snap.
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(40, 10)));
        let d = ui.controller(&drawer).unwrap();
        assert!(d.is_open());
        assert_eq!(d.snap_fraction(), 0.5);
        assert_eq!(ui.regions.get(d.panel()), Some(Region::new(0, 12, 80, 12)));
        assert!(ui.dom.data_is(d.panel(), "snap", "0.5"));
    }

    #[test]
    fn dragging_most_of_the_way_down_closes() {
        let (mut ui, root, _aside) = shell();
        let drawer = mounted(&mut ui, root);
        key(&mut ui, Key::Enter);

        ui.handle_input(InputEvent::Mouse(MouseEvent::down(40, 18)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::drag(40, 23)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(40, 23)));
        let d = ui.controller(&drawer).unwrap();
        assert!(!d.is_open());
        assert!(!ui.is_scroll_locked());
    }

    #[test]
    fn backdrop_click_closes_and_shields_what_is_underneath() {
        let (mut ui, root, aside) = shell();
        let drawer = mounted(&mut ui, root);
        key(&mut ui, Key::Enter);

        ui.handle_input(InputEvent::Mouse(MouseEvent::down(1, 1)));
        assert_ne!(ui.focused(), Some(aside));
        assert!(ui.controller(&drawer).unwrap().is_open());

        ui.handle_input(InputEvent::Mouse(MouseEvent::up(1, 1)));
        assert!(!ui.controller(&drawer).unwrap().is_open());
    }

    #[test]
    fn escape_slides_the_drawer_away() {
        let (mut ui, root, _aside) = shell();
        let drawer = mounted(&mut ui, root);
        key(&mut ui, Key::Enter);
        key(&mut ui, Key::Escape);
        assert!(!ui.controller(&drawer).unwrap().is_open());
    }

    #[test]
    fn resize_keeps_the_sheet_pinned_to_the_bottom() {
        let (mut ui, root, _aside) = shell();
        let drawer = mounted(&mut ui, root);
        key(&mut ui, Key::Enter);
        key(&mut ui, Key::Up); // 0.5 snap

        ui.handle_input(InputEvent::Resize { width: 60, height: 20 });
        let d = ui.controller(&drawer).unwrap();
        assert_eq!(ui.regions.get(d.panel()), Some(Region::new(0, 10, 60, 10)));
    }
}
