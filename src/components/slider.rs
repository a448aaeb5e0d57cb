//! Slider: a horizontal value control.
//!
//! Arrow keys step, Home/End jump to the ends, PageUp/PageDown take ten
//! steps. A press anywhere on the track sets the value from the x position
//! and captures the pointer, so dragging keeps adjusting until release.
//! Values snap to the step grid and clamp to `[min, max]`.

use crate::controller::{Controller, Handled};
use crate::dom::{Dom, NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseAction, MouseEvent};
use crate::geometry::Region;
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

/// Configuration for a [`Slider`].
#[derive(Clone, Debug)]
pub struct SliderConfig {
    min: f64,
    max: f64,
    step: f64,
    value: f64,
    disabled: bool,
    appearance: Appearance,
    id: Option<String>,
}

impl SliderConfig {
    pub fn new() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            value: 0.0,
            disabled: false,
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
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

impl Default for SliderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Horizontal value control.
pub struct Slider {
    config: SliderConfig,
    root: NodeId,
    track: NodeId,
    thumb: NodeId,
    value: f64,
}

impl Slider {
    pub fn new(config: SliderConfig) -> Self {
        let value = snap(config.value, config.min, config.max, config.step);
        Self {
            config,
            root: NodeId::default(),
            track: NodeId::default(),
            thumb: NodeId::default(),
            value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn percent(&self) -> f64 {
        if self.config.max <= self.config.min {
            return 0.0;
        }
        (self.value - self.config.min) / (self.config.max - self.config.min) * 100.0
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn track(&self) -> NodeId {
        self.track
    }

    pub fn thumb(&self) -> NodeId {
        self.thumb
    }

    fn disabled(&self, dom: &Dom) -> bool {
        dom.get(self.root).is_some_and(|d| d.disabled)
    }

    fn set_value(&mut self, ctx: &mut Ctx<'_>, value: f64) {
        let next = snap(value, self.config.min, self.config.max, self.config.step);
        self.value = next;
        ctx.dom.set_data(self.root, "value", &next.to_string());
        ctx.dom
            .set_data(self.root, "percent", &(self.percent().round() as i64).to_string());
        self.place_thumb(ctx);
    }

    /// Derive the thumb cell from the value once the track has a region.
    fn place_thumb(&self, ctx: &mut Ctx<'_>) {
        let Some(track) = ctx.regions.get(self.track) else {
            return;
        };
        if track.width <= 1 {
            return;
        }
        let ratio = self.percent() / 100.0;
        let x = track.x + (ratio * (track.width - 1) as f64).round() as i32;
        ctx.regions.set(self.thumb, Region::new(x, track.y, 1, track.height));
    }

    fn value_from_x(&self, ctx: &Ctx<'_>, x: i32) -> Option<f64> {
        let region = ctx.regions.get(self.track).or_else(|| ctx.regions.get(self.root))?;
        if region.width <= 1 {
            return None;
        }
        let ratio = (x - region.x) as f64 / (region.width - 1) as f64;
        let ratio = ratio.clamp(0.0, 1.0);
        Some(self.config.min + ratio * (self.config.max - self.config.min))
    }
}

fn snap(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let clamped = value.clamp(min, max);
    if step <= 0.0 {
        return clamped;
    }
    let snapped = min + ((clamped - min) / step).round() * step;
    snapped.clamp(min, max)
}

impl Controller for Slider {
    fn kind(&self) -> &'static str {
        "slider"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut data = NodeData::new("slider")
            .with_classes(part_classes("row", &self.config.appearance))
            .with_attrs(part_attrs("slider", "root", &self.config.appearance))
            .focusable(true)
            .disabled(self.config.disabled)
            .with_data("value", &self.value.to_string())
            .with_data("percent", &(self.percent().round() as i64).to_string());
        if let Some(id) = &self.config.id {
            data = data.with_id(id.clone());
        }
        self.root = ctx.dom.insert_child(parent, data);
        self.track = ctx.dom.insert_child(
            self.root,
            NodeData::new("track")
                .with_class("rounded")
                .with_attrs(part_attrs("slider", "track", &Appearance::default())),
        );
        self.thumb = ctx.dom.insert_child(
            self.track,
            NodeData::new("thumb")
                .with_attrs(part_attrs("slider", "thumb", &Appearance::default())),
        );
        self.root
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        if ctx.focused() != Some(self.root) || self.disabled(ctx.dom) {
            return Handled::No;
        }
        let step = self.config.step;
        let value = self.value;
        match event.code {
            Key::Left | Key::Down => {
                self.set_value(ctx, value - step);
                Handled::Yes
            }
            Key::Right | Key::Up => {
                self.set_value(ctx, value + step);
                Handled::Yes
            }
            Key::Home => {
                self.set_value(ctx, self.config.min);
                Handled::Yes
            }
            Key::End => {
                self.set_value(ctx, self.config.max);
                Handled::Yes
            }
            Key::PageUp => {
                self.set_value(ctx, value + step * 10.0);
                Handled::Yes
            }
            Key::PageDown => {
                self.set_value(ctx, value - step * 10.0);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if self.disabled(ctx.dom) {
            return Handled::No;
        }
        let dragging = matches!(event.kind, MouseAction::Drag(_));
        if !(event.is_press() || event.is_release() || dragging) {
            return Handled::No;
        }
        // Presses must start on the slider; drag and release follow capture
        // wherever the pointer goes.
        if event.is_press() && !ctx.dom.is_within(target, self.root) {
            return Handled::No;
        }
        if let Some(value) = self.value_from_x(ctx, event.x as i32) {
            self.set_value(ctx, value);
        }
        Handled::Yes
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

    fn mounted(ui: &mut Ui, root: NodeId, config: SliderConfig) -> crate::controller::Mounted<Slider> {
        let handle = ui.mount(Slider::new(config), root);
        let s = ui.controller(&handle).unwrap();
        let (slider_root, track) = (s.root(), s.track());
        // 21 cells: one per unit of 0..=100 in steps of 5.
        ui.regions.set(slider_root, Region::new(10, 5, 21, 1));
        ui.regions.set(track, Region::new(10, 5, 21, 1));
        ui.focus(slider_root);
        handle
    }

    #[test]
    fn keys_step_and_jump_within_the_range() {
        let (mut ui, root) = shell();
        let slider = mounted(&mut ui, root, SliderConfig::new().step(5.0).value(50.0));

        key(&mut ui, Key::Right);
        assert_eq!(ui.controller(&slider).unwrap().value(), 55.0);
        key(&mut ui, Key::Left);
        key(&mut ui, Key::Left);
        assert_eq!(ui.controller(&slider).unwrap().value(), 45.0);

        key(&mut ui, Key::End);
        assert_eq!(ui.controller(&slider).unwrap().value(), 100.0);
        key(&mut ui, Key::Right);
        assert_eq!(ui.controller(&slider).unwrap().value(), 100.0);

        key(&mut ui, Key::Home);
        assert_eq!(ui.controller(&slider).unwrap().value(), 0.0);
        key(&mut ui, Key::PageUp);
        assert_eq!(ui.controller(&slider).unwrap().value(), 50.0);
        key(&mut ui, Key::PageDown);
        assert_eq!(ui.controller(&slider).unwrap().value(), 0.0);
    }

    #[test]
    fn press_sets_from_the_x_position_and_drag_keeps_adjusting() {
        let (mut ui, root) = shell();
        let slider = mounted(&mut ui, root, SliderConfig::new().step(5.0));

        // Track spans x = 10..=30; x = 20 is the midpoint.
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(20, 5)));
        assert_eq!(ui.controller(&slider).unwrap().value(), 50.0);

        // Dragging off the end clamps to max, even outside the track.
        ui.handle_input(InputEvent::Mouse(MouseEvent::drag(75, 5)));
        assert_eq!(ui.controller(&slider).unwrap().value(), 100.0);

        ui.handle_input(InputEvent::Mouse(MouseEvent::drag(10, 5)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(10, 5)));
        assert_eq!(ui.controller(&slider).unwrap().value(), 0.0);
    }

    #[test]
    fn values_snap_to_the_step_grid() {
        let (mut ui, root) = shell();
        let slider = mounted(&mut ui, root, SliderConfig::new().step(25.0));

        // x = 14 is ratio 4/20 = 0.2 -> raw 20, snapped to 25.
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(14, 5)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(14, 5)));
        assert_eq!(ui.controller(&slider).unwrap().value(), 25.0);
    }

    #[test]
    fn state_markers_track_the_value() {
        let (mut ui, root) = shell();
        let slider = mounted(&mut ui, root, SliderConfig::new().step(5.0).value(40.0));
        let s = ui.controller(&slider).unwrap();
        let node = s.root();
        assert!(ui.dom.data_is(node, "value", "40"));
        assert!(ui.dom.data_is(node, "percent", "40"));

        key(&mut ui, Key::Right);
        assert!(ui.dom.data_is(node, "value", "45"));
        assert!(ui.dom.data_is(node, "percent", "45"));
        // Thumb cell follows: 45% of 20 usable cells is cell 9.
        let thumb = ui.controller(&slider).unwrap().thumb();
        assert_eq!(ui.regions.get(thumb), Some(Region::new(19, 5, 1, 1)));
    }

    #[test]
    fn disabled_slider_ignores_everything() {
        let (mut ui, root) = shell();
        let slider = mounted(&mut ui, root, SliderConfig::new().disabled(true).value(30.0));

        key(&mut ui, Key::Right);
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(20, 5)));
        assert_eq!(ui.controller(&slider).unwrap().value(), 30.0);
    }
}
