//! Pilot: programmatic interaction with a headless [`Ui`].
//!
//! The `Pilot` owns a [`Ui`] with no terminal attached and plays the part of
//! the host: it mounts controllers under a shell node, assigns regions with a
//! deterministic stacking placer so hit-testing works, and simulates key,
//! mouse, clock, and resize input.

use std::time::Duration;

use slotmap::SecondaryMap;
use tracing::warn;

use crate::controller::{Controller, Mounted};
use crate::dom::{NodeData, NodeId};
use crate::event::{InputEvent, Key, KeyEvent, Modifiers, MouseEvent};
use crate::geometry::{Offset, Region};
use crate::service::ServiceBridge;
use crate::ui::Ui;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless driver for testing.
///
/// Every visible node the placer owns gets a full-width row band, stacked in
/// document order inside its parent's frame. Regions written by controllers
/// (floating surfaces, thumbs, modal panels) are left alone and flowed
/// around, so component-positioned geometry survives replacement. The placer
/// runs again after every simulated event, the way a host redraws after
/// input.
///
/// # Examples
///
/// ```ignore
/// use plinth_tui::components::{Toggle, ToggleConfig};
/// use plinth_tui::testing::Pilot;
///
/// let mut pilot = Pilot::new(80, 24);
/// let toggle = pilot.mount(Toggle::new(ToggleConfig::new("Mute")));
/// pilot.click_node(toggle.root());
/// assert!(pilot.controller(&toggle).unwrap().is_pressed());
/// ```
pub struct Pilot {
    ui: Ui,
    shell: NodeId,
    auto: SecondaryMap<NodeId, Region>,
}

impl Pilot {
    /// Create a headless driver with the given viewport size.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_ui(Ui::new(Region::new(0, 0, width as i32, height as i32)))
    }

    /// Create a headless driver whose runtime talks to a service bridge.
    pub fn with_service(width: u16, height: u16, bridge: ServiceBridge) -> Self {
        Self::with_ui(Ui::with_service(
            Region::new(0, 0, width as i32, height as i32),
            bridge,
        ))
    }

    fn with_ui(mut ui: Ui) -> Self {
        let shell = ui.dom.insert(NodeData::new("shell"));
        ui.dom.set_root(shell);
        let mut pilot = Self { ui, shell, auto: SecondaryMap::new() };
        pilot.place();
        pilot
    }

    // ── Mounting ─────────────────────────────────────────────────────

    /// Mount a controller under the shell and lay the tree out.
    pub fn mount<C: Controller + 'static>(&mut self, controller: C) -> Mounted<C> {
        let handle = self.ui.mount(controller, self.shell);
        self.settle();
        handle
    }

    /// Unmount a controller and reflow what remains.
    pub fn unmount<C>(&mut self, handle: Mounted<C>) {
        self.ui.unmount(handle);
        self.settle();
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.input(InputEvent::Key(KeyEvent::plain(key)));
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Type each character of `text` as an unmodified key press.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Left-button press at a cell.
    pub fn press(&mut self, x: u16, y: u16) {
        self.input(InputEvent::Mouse(MouseEvent::down(x, y)));
    }

    /// Left-button release at a cell.
    pub fn release(&mut self, x: u16, y: u16) {
        self.input(InputEvent::Mouse(MouseEvent::up(x, y)));
    }

    /// Press and release at the same cell.
    pub fn click(&mut self, x: u16, y: u16) {
        self.press(x, y);
        self.release(x, y);
    }

    /// Left-button drag through a cell.
    pub fn drag(&mut self, x: u16, y: u16) {
        self.input(InputEvent::Mouse(MouseEvent::drag(x, y)));
    }

    /// Pointer motion with no button held.
    pub fn hover(&mut self, x: u16, y: u16) {
        self.input(InputEvent::Mouse(MouseEvent::moved(x, y)));
    }

    /// Press at the center of a node's region.
    pub fn press_node(&mut self, node: NodeId) {
        if let Some((x, y)) = self.aim(node) {
            self.press(x, y);
        }
    }

    /// Release at the center of a node's region.
    pub fn release_node(&mut self, node: NodeId) {
        if let Some((x, y)) = self.aim(node) {
            self.release(x, y);
        }
    }

    /// Click the center of a node's region.
    pub fn click_node(&mut self, node: NodeId) {
        if let Some((x, y)) = self.aim(node) {
            self.press(x, y);
            self.release(x, y);
        }
    }

    /// Move the pointer onto the center of a node's region.
    pub fn hover_node(&mut self, node: NodeId) {
        if let Some((x, y)) = self.aim(node) {
            self.hover(x, y);
        }
    }

    /// Simulate a viewport resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.input(InputEvent::Resize { width, height });
    }

    fn input(&mut self, event: InputEvent) {
        self.ui.handle_input(event);
        self.place();
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Advance the clock: fire due timers, deliver service replies.
    pub fn advance(&mut self, elapsed: Duration) {
        self.ui.tick(elapsed);
        self.place();
    }

    /// Pump pending work without advancing the clock.
    pub fn tick(&mut self) {
        self.advance(Duration::ZERO);
    }

    // ── Placement ────────────────────────────────────────────────────

    /// Reassign the stacked regions for everything the placer owns.
    pub fn place(&mut self) {
        let viewport = self.ui.viewport();
        self.claim(self.shell, viewport);
        self.place_into(self.shell);
    }

    /// Lay out, let controllers place their own parts, and lay out again.
    ///
    /// The in-between resize carries the current dimensions; it exists so
    /// controllers that position on [`Controller::on_resize`] see the regions
    /// the first pass assigned.
    pub fn settle(&mut self) {
        self.place();
        let viewport = self.ui.viewport();
        self.ui.handle_input(InputEvent::Resize {
            width: viewport.width.max(0) as u16,
            height: viewport.height.max(0) as u16,
        });
        self.place();
    }

    fn claim(&mut self, node: NodeId, region: Region) {
        self.ui.regions.set(node, region);
        self.auto.insert(node, region);
    }

    /// Whether the node's current region is one the placer assigned. A
    /// controller overwriting the region disowns it.
    fn owns(&self, node: NodeId) -> bool {
        match (self.auto.get(node), self.ui.regions.get(node)) {
            (Some(auto), Some(current)) => *auto == current,
            _ => false,
        }
    }

    fn anchored(&self, node: NodeId) -> bool {
        self.ui.regions.get(node).is_some() && !self.owns(node)
    }

    /// Rows a stacked subtree occupies: leaves take one, containers the sum
    /// of their flowing children.
    fn rows(&self, node: NodeId) -> i32 {
        let Some(data) = self.ui.dom.get(node) else {
            return 0;
        };
        if !data.visible {
            return 0;
        }
        let mut total = 0;
        for &child in self.ui.dom.children(node) {
            if self.anchored(child) {
                continue;
            }
            total += self.rows(child);
        }
        total.max(1)
    }

    fn place_into(&mut self, node: NodeId) {
        let Some(frame) = self.ui.regions.get(node) else {
            return;
        };
        let children: Vec<NodeId> = self.ui.dom.children(node).to_vec();
        let mut y = frame.y;
        for child in children {
            let shown = self.ui.dom.get(child).is_some_and(|d| d.visible);
            if !shown {
                continue;
            }
            if self.anchored(child) {
                // Flow past anchored children sitting in the band; floating
                // ones keep their own frame either way.
                if let Some(region) = self.ui.regions.get(child) {
                    if region.overlaps(frame) && region.y >= y {
                        y = y.max(region.bottom());
                    }
                }
                self.place_into(child);
                continue;
            }
            let height = self.rows(child);
            self.claim(child, Region::new(frame.x, y, frame.width, height));
            y += height;
            self.place_into(child);
        }
    }

    fn aim(&self, node: NodeId) -> Option<(u16, u16)> {
        let Some(at) = self.center(node) else {
            warn!(?node, "no region to aim at");
            return None;
        };
        Some((at.x.max(0) as u16, at.y.max(0) as u16))
    }

    // ── Query ────────────────────────────────────────────────────────

    /// The node every mount hangs off.
    pub fn shell(&self) -> NodeId {
        self.shell
    }

    /// Borrow the underlying runtime immutably.
    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// Borrow the underlying runtime mutably.
    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// Borrow a mounted controller.
    pub fn controller<C: Controller + 'static>(&self, handle: &Mounted<C>) -> Option<&C> {
        self.ui.controller(handle)
    }

    /// Borrow a mounted controller mutably.
    pub fn controller_mut<C: Controller + 'static>(
        &mut self,
        handle: &Mounted<C>,
    ) -> Option<&mut C> {
        self.ui.controller_mut(handle)
    }

    /// The node holding keyboard focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.ui.focused()
    }

    /// Move keyboard focus to a node.
    pub fn focus(&mut self, node: NodeId) {
        self.ui.focus(node);
    }

    /// Center cell of a node's region, if it has one with any area.
    pub fn center(&self, node: NodeId) -> Option<Offset> {
        let region = self.ui.regions.get(node)?;
        if region.width <= 0 || region.height <= 0 {
            return None;
        }
        Some(Offset::new(
            region.x + region.width / 2,
            region.y + region.height / 2,
        ))
    }

    /// Outline of the whole shell tree.
    pub fn outline(&self) -> String {
        super::outline::outline(&self.ui.dom, self.shell)
    }

    /// Outline of one subtree.
    pub fn outline_of(&self, node: NodeId) -> String {
        super::outline::outline(&self.ui.dom, node)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        Popover, PopoverConfig, Slider, SliderConfig, Toggle, ToggleConfig, Tooltip,
        TooltipConfig,
    };

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn mounts_stack_into_full_width_rows() {
        let mut pilot = Pilot::new(80, 24);
        let first = pilot.mount(Toggle::new(ToggleConfig::new("Mute")));
        let second = pilot.mount(Toggle::new(ToggleConfig::new("Loop")));

        assert_eq!(pilot.ui().dom.root(), Some(pilot.shell()));
        assert_eq!(
            pilot.ui().regions.get(first.root()),
            Some(Region::new(0, 0, 80, 1))
        );
        assert_eq!(
            pilot.ui().regions.get(second.root()),
            Some(Region::new(0, 1, 80, 1))
        );
    }

    #[test]
    fn click_node_lands_on_the_component() {
        let mut pilot = Pilot::new(80, 24);
        let toggle = pilot.mount(Toggle::new(ToggleConfig::new("Mute")));

        pilot.click_node(toggle.root());
        assert!(pilot.controller(&toggle).unwrap().is_pressed());

        // A node with no region is a warning, not a panic.
        pilot.click_node(NodeId::default());
        assert!(pilot.controller(&toggle).unwrap().is_pressed());
    }

    #[test]
    fn controller_placed_regions_survive_replacement() {
        let mut pilot = Pilot::new(80, 24);
        let slider = pilot.mount(Slider::new(SliderConfig::new().value(50.0)));
        let thumb = pilot.controller(&slider).unwrap().thumb();

        // Pressing makes the slider take over its thumb cell.
        pilot.press(40, 0);
        pilot.release(40, 0);
        assert_eq!(pilot.controller(&slider).unwrap().value(), 51.0);
        assert_eq!(pilot.ui().regions.get(thumb), Some(Region::new(40, 0, 1, 1)));

        // Later passes flow around it instead of reclaiming it.
        pilot.tick();
        assert_eq!(pilot.ui().regions.get(thumb), Some(Region::new(40, 0, 1, 1)));
    }

    #[test]
    fn hidden_surfaces_are_placed_only_once_they_float() {
        let mut pilot = Pilot::new(80, 24);
        let popover = pilot.mount(Popover::new(PopoverConfig::new("Dimensions")));
        let (trigger, content) = {
            let p = pilot.controller(&popover).unwrap();
            (p.trigger(), p.content())
        };
        assert_eq!(pilot.ui().regions.get(content), None);

        pilot.click_node(trigger);
        assert!(pilot.controller(&popover).unwrap().is_open());
        assert!(pilot.ui().regions.get(content).is_some());
    }

    #[test]
    fn advance_fires_scheduled_timers() {
        let mut pilot = Pilot::new(80, 24);
        let tip = pilot.mount(Tooltip::new(TooltipConfig::new("hint", "Add to library")));
        let trigger = pilot.controller(&tip).unwrap().trigger();

        pilot.hover_node(trigger);
        assert!(!pilot.controller(&tip).unwrap().is_visible());
        pilot.advance(MS(100));
        assert!(pilot.controller(&tip).unwrap().is_visible());
    }

    #[test]
    fn resize_reflows_the_stack() {
        let mut pilot = Pilot::new(80, 24);
        let toggle = pilot.mount(Toggle::new(ToggleConfig::new("Mute")));

        pilot.resize(100, 30);
        assert_eq!(pilot.ui().viewport(), Region::new(0, 0, 100, 30));
        assert_eq!(
            pilot.ui().regions.get(pilot.shell()),
            Some(Region::new(0, 0, 100, 30))
        );
        assert_eq!(
            pilot.ui().regions.get(toggle.root()),
            Some(Region::new(0, 0, 100, 1))
        );
    }
}
