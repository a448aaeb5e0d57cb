//! Semantic drivers over mounted components.
//!
//! A model pairs a [`Pilot`] with one [`Mounted`] handle and speaks the
//! vocabulary of the component it wraps: `menu.select("Save")` instead of
//! a coordinate click, `drawer.raise()` instead of a focus shuffle and an
//! arrow key. Models find their targets in the live DOM, so they stay
//! correct when a component moves or re-renders. Handles are `Copy`;
//! tests can drop a model, poke the pilot directly, and rebuild it.

use std::time::Duration;

use chrono::NaiveDate;

use crate::components::{
    Accordion, Calendar, Checkbox, Combobox, DatePicker, Dialog, Drawer, DropdownMenu, Menubar,
    Popover, RadioGroup, Select, Sidebar, Slider, Toggle, ToggleGroup, Tooltip,
};
use crate::controller::Mounted;
use crate::dom::{Dom, NodeId};
use crate::event::{Key, Modifiers};
use crate::geometry::Region;

use super::pilot::Pilot;

/// Whether a node and every ancestor up to the root are visible.
fn shown(dom: &Dom, node: NodeId) -> bool {
    let mut cursor = Some(node);
    while let Some(id) = cursor {
        let Some(data) = dom.get(id) else {
            return false;
        };
        if !data.visible {
            return false;
        }
        cursor = dom.parent(id);
    }
    true
}

/// First shown node under `root` of `kind` whose text equals `label`.
fn labeled(dom: &Dom, root: NodeId, kind: &str, label: &str) -> Option<NodeId> {
    dom.query_in(root, |d| d.kind == kind && d.text() == label)
        .into_iter()
        .find(|&id| shown(dom, id))
}

// ---------------------------------------------------------------------------
// Accordion
// ---------------------------------------------------------------------------

pub struct AccordionModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Accordion>,
}

impl<'p> AccordionModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Accordion>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.accordion().is_some_and(|a| a.is_open(index))
    }

    pub fn open_indices(&self) -> Vec<usize> {
        self.accordion()
            .map(Accordion::open_indices)
            .unwrap_or_default()
    }

    /// Click the section header, flipping it open or shut.
    pub fn toggle(&mut self, index: usize) {
        let Some(header) = self.accordion().and_then(|a| a.header(index)) else {
            return;
        };
        self.pilot.click_node(header);
    }

    pub fn focus_header(&mut self, index: usize) {
        let Some(header) = self.accordion().and_then(|a| a.header(index)) else {
            return;
        };
        self.pilot.focus(header);
    }

    fn accordion(&self) -> Option<&Accordion> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Month navigation and day picking go through the date service, so every
/// mutating operation pumps the reply queue before returning.
pub struct CalendarModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Calendar>,
}

impl<'p> CalendarModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Calendar>) -> Self {
        Self { pilot, handle }
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.calendar().and_then(Calendar::selected)
    }

    pub fn focused_day(&self) -> Option<NaiveDate> {
        self.calendar().map(Calendar::focused_day)
    }

    pub fn month(&self) -> Option<(i32, u32)> {
        self.calendar().map(Calendar::month)
    }

    /// Heading text, e.g. `"August 2026"`.
    pub fn title(&self) -> String {
        let Some(node) = self.calendar().map(Calendar::title) else {
            return String::new();
        };
        self.pilot.ui().dom.text(node).to_string()
    }

    pub fn next_month(&mut self) {
        let Some(button) = self.calendar().map(Calendar::next_button) else {
            return;
        };
        self.pilot.click_node(button);
        self.pilot.tick();
    }

    pub fn prev_month(&mut self) {
        let Some(button) = self.calendar().map(Calendar::prev_button) else {
            return;
        };
        self.pilot.click_node(button);
        self.pilot.tick();
    }

    /// Click the cell for `date` in the displayed grid.
    pub fn pick(&mut self, date: NaiveDate) {
        let Some(cell) = self.day_cell(date) else {
            return;
        };
        self.pilot.click_node(cell);
        self.pilot.tick();
    }

    fn day_cell(&self, date: NaiveDate) -> Option<NodeId> {
        let grid = self.calendar().map(Calendar::grid)?;
        let iso = date.format("%Y-%m-%d").to_string();
        self.pilot
            .ui()
            .dom
            .query_in(grid, |d| d.kind == "day" && d.data_is("date", &iso))
            .first()
            .copied()
    }

    fn calendar(&self) -> Option<&Calendar> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// DatePicker
// ---------------------------------------------------------------------------

pub struct DatePickerModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<DatePicker>,
}

impl<'p> DatePickerModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<DatePicker>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_open(&self) -> bool {
        self.picker().is_some_and(DatePicker::is_open)
    }

    pub fn value(&self) -> Option<NaiveDate> {
        self.picker().and_then(DatePicker::value)
    }

    /// Trigger text: the formatted value, or the placeholder.
    pub fn display(&self) -> String {
        let Some(trigger) = self.picker().map(DatePicker::trigger) else {
            return String::new();
        };
        self.pilot.ui().dom.text(trigger).to_string()
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        let Some(trigger) = self.picker().map(DatePicker::trigger) else {
            return;
        };
        self.pilot.click_node(trigger);
        self.pilot.tick();
    }

    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        let Some(trigger) = self.picker().map(DatePicker::trigger) else {
            return;
        };
        self.pilot.click_node(trigger);
    }

    /// Open if needed, click the day cell, and pump the format reply.
    pub fn pick(&mut self, date: NaiveDate) {
        self.open();
        let Some(cell) = self.day_cell(date) else {
            return;
        };
        self.pilot.click_node(cell);
        self.pilot.tick();
    }

    fn day_cell(&self, date: NaiveDate) -> Option<NodeId> {
        let grid = self.picker().map(DatePicker::grid)?;
        let iso = date.format("%Y-%m-%d").to_string();
        self.pilot
            .ui()
            .dom
            .query_in(grid, |d| d.kind == "day" && d.data_is("date", &iso))
            .first()
            .copied()
    }

    fn picker(&self) -> Option<&DatePicker> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Checkbox
// ---------------------------------------------------------------------------

pub struct CheckboxModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Checkbox>,
}

impl<'p> CheckboxModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Checkbox>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_checked(&self) -> bool {
        self.pilot
            .controller(&self.handle)
            .is_some_and(Checkbox::is_checked)
    }

    pub fn toggle(&mut self) {
        let Some(root) = self.pilot.controller(&self.handle).map(Checkbox::root) else {
            return;
        };
        self.pilot.click_node(root);
    }
}

// ---------------------------------------------------------------------------
// RadioGroup
// ---------------------------------------------------------------------------

pub struct RadioGroupModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<RadioGroup>,
}

impl<'p> RadioGroupModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<RadioGroup>) -> Self {
        Self { pilot, handle }
    }

    pub fn selected(&self) -> Option<String> {
        let ui = self.pilot.ui();
        ui.controller(&self.handle)
            .and_then(|g| g.selected_label(&ui.dom))
            .map(str::to_string)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.group().map(RadioGroup::selected_index)
    }

    pub fn choose(&mut self, label: &str) {
        let Some(item) = labeled(&self.pilot.ui().dom, self.handle.root(), "radio", label) else {
            return;
        };
        self.pilot.click_node(item);
    }

    pub fn choose_index(&mut self, index: usize) {
        let Some(item) = self.group().and_then(|g| g.item(index)) else {
            return;
        };
        self.pilot.click_node(item);
    }

    fn group(&self) -> Option<&RadioGroup> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Combobox
// ---------------------------------------------------------------------------

pub struct ComboboxModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Combobox>,
}

impl<'p> ComboboxModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Combobox>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_open(&self) -> bool {
        self.combobox().is_some_and(Combobox::is_open)
    }

    pub fn value(&self) -> Option<String> {
        self.combobox()
            .and_then(Combobox::value)
            .map(str::to_string)
    }

    pub fn filter(&self) -> String {
        self.combobox()
            .map(|c| c.filter().to_string())
            .unwrap_or_default()
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        let Some(trigger) = self.combobox().map(Combobox::trigger) else {
            return;
        };
        self.pilot.click_node(trigger);
    }

    /// Open if needed and type into the filter field.
    pub fn search(&mut self, text: &str) {
        self.open();
        self.pilot.type_text(text);
    }

    /// Labels of the options still matching the filter.
    pub fn visible_options(&self) -> Vec<String> {
        let Some(content) = self.combobox().map(Combobox::content) else {
            return Vec::new();
        };
        let dom = &self.pilot.ui().dom;
        dom.query_in(content, |d| d.kind == "option" && d.visible)
            .into_iter()
            .map(|option| dom.text(option).to_string())
            .collect()
    }

    /// Commit the highlighted match with Enter.
    pub fn commit(&mut self) {
        self.pilot.press_key(Key::Enter);
    }

    pub fn select(&mut self, label: &str) {
        self.open();
        let Some(content) = self.combobox().map(Combobox::content) else {
            return;
        };
        let Some(option) = labeled(&self.pilot.ui().dom, content, "option", label) else {
            return;
        };
        self.pilot.click_node(option);
    }

    fn combobox(&self) -> Option<&Combobox> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Dialog
// ---------------------------------------------------------------------------

pub struct DialogModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Dialog>,
}

impl<'p> DialogModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Dialog>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_open(&self) -> bool {
        self.dialog().is_some_and(Dialog::is_open)
    }

    /// Open from the keyboard; once the backdrop is up it covers the
    /// trigger cell, so a pointer click cannot reach it anyway.
    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        let Some(trigger) = self.dialog().map(Dialog::trigger) else {
            return;
        };
        self.pilot.focus(trigger);
        self.pilot.press_key(Key::Enter);
    }

    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        let Some(button) = self.dialog().map(Dialog::close_button) else {
            return;
        };
        self.pilot.click_node(button);
    }

    /// Click the top-left backdrop cell, completing an outside click.
    pub fn click_outside(&mut self) {
        self.pilot.click(0, 0);
    }

    fn dialog(&self) -> Option<&Dialog> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Drawer
// ---------------------------------------------------------------------------

pub struct DrawerModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Drawer>,
}

impl<'p> DrawerModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Drawer>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_open(&self) -> bool {
        self.drawer().is_some_and(Drawer::is_open)
    }

    pub fn snap_index(&self) -> Option<usize> {
        self.drawer()
            .filter(|d| d.is_open())
            .map(Drawer::snap_index)
    }

    pub fn snap_fraction(&self) -> Option<f64> {
        self.drawer()
            .filter(|d| d.is_open())
            .map(Drawer::snap_fraction)
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        let Some(trigger) = self.drawer().map(Drawer::trigger) else {
            return;
        };
        self.pilot.focus(trigger);
        self.pilot.press_key(Key::Enter);
    }

    /// One snap point up.
    pub fn raise(&mut self) {
        self.grip_key(Key::Up);
    }

    /// One snap point down; at the lowest snap this closes the drawer.
    pub fn lower(&mut self) {
        self.grip_key(Key::Down);
    }

    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.pilot.press_key(Key::Escape);
    }

    /// Grab the grip and drag it to terminal row `y`, then let go. The
    /// sheet settles on the nearest snap point, or closes below the
    /// lowest one.
    pub fn drag_to(&mut self, y: u16) {
        let Some(grip) = self.drawer().map(Drawer::grip) else {
            return;
        };
        let Some(center) = self.pilot.center(grip) else {
            return;
        };
        let x = center.x.max(0) as u16;
        let from = center.y.max(0) as u16;
        self.pilot.press(x, from);
        self.pilot.drag(x, y);
        self.pilot.release(x, y);
    }

    fn grip_key(&mut self, key: Key) {
        if !self.is_open() {
            return;
        }
        let Some(grip) = self.drawer().map(Drawer::grip) else {
            return;
        };
        self.pilot.focus(grip);
        self.pilot.press_key(key);
    }

    fn drawer(&self) -> Option<&Drawer> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// DropdownMenu
// ---------------------------------------------------------------------------

pub struct MenuModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<DropdownMenu>,
}

impl<'p> MenuModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<DropdownMenu>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_open(&self) -> bool {
        self.menu().is_some_and(DropdownMenu::is_open)
    }

    pub fn selection(&self) -> Option<String> {
        self.menu()
            .and_then(DropdownMenu::selection)
            .map(str::to_string)
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.click_trigger();
    }

    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.click_trigger();
    }

    /// Open if needed, then click the item with this label. Items inside
    /// unopened submenus are not reachable; hover their parent first.
    pub fn select(&mut self, label: &str) {
        self.open();
        let Some(item) = self.item(label) else {
            return;
        };
        self.pilot.click_node(item);
    }

    pub fn hover_item(&mut self, label: &str) {
        let Some(item) = self.item(label) else {
            return;
        };
        self.pilot.hover_node(item);
    }

    /// Label of the highlighted item on the deepest open surface.
    pub fn highlighted(&self) -> Option<String> {
        let content = self.menu().and_then(DropdownMenu::content)?;
        let dom = &self.pilot.ui().dom;
        dom.query_in(content, |d| {
            d.kind == "menu-item" && d.data_is("highlighted", "true")
        })
        .into_iter()
        .rev()
        .find(|&item| shown(dom, item))
        .map(|item| dom.text(item).to_string())
    }

    /// Checked state of a checkbox or radio item, readable while closed.
    pub fn is_checked(&self, label: &str) -> bool {
        let Some(content) = self.menu().and_then(DropdownMenu::content) else {
            return false;
        };
        let dom = &self.pilot.ui().dom;
        !dom.query_in(content, |d| {
            d.kind == "menu-item" && d.text() == label && d.data_is("checked", "true")
        })
        .is_empty()
    }

    fn item(&self, label: &str) -> Option<NodeId> {
        let content = self.menu().and_then(DropdownMenu::content)?;
        labeled(&self.pilot.ui().dom, content, "menu-item", label)
    }

    fn click_trigger(&mut self) {
        let Some(trigger) = self.menu().and_then(DropdownMenu::trigger) else {
            return;
        };
        self.pilot.click_node(trigger);
    }

    fn menu(&self) -> Option<&DropdownMenu> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Menubar
// ---------------------------------------------------------------------------

pub struct MenubarModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Menubar>,
}

impl<'p> MenubarModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Menubar>) -> Self {
        Self { pilot, handle }
    }

    pub fn open_menu(&self) -> Option<usize> {
        self.menubar().and_then(Menubar::open_menu)
    }

    pub fn selection(&self) -> Option<String> {
        self.menubar()
            .and_then(Menubar::selection)
            .map(str::to_string)
    }

    pub fn open(&mut self, index: usize) {
        if self.open_menu() == Some(index) {
            return;
        }
        let Some(trigger) = self.menubar().and_then(|m| m.trigger(index)) else {
            return;
        };
        self.pilot.click_node(trigger);
    }

    /// Clicking the open menu's own trigger shuts it.
    pub fn close(&mut self) {
        let Some(index) = self.open_menu() else {
            return;
        };
        let Some(trigger) = self.menubar().and_then(|m| m.trigger(index)) else {
            return;
        };
        self.pilot.click_node(trigger);
    }

    pub fn hover_trigger(&mut self, index: usize) {
        let Some(trigger) = self.menubar().and_then(|m| m.trigger(index)) else {
            return;
        };
        self.pilot.hover_node(trigger);
    }

    /// Click an item by label in whichever menu is open.
    pub fn select(&mut self, label: &str) {
        let Some(index) = self.open_menu() else {
            return;
        };
        let Some(content) = self.menubar().and_then(|m| m.content(index)) else {
            return;
        };
        let Some(item) = labeled(&self.pilot.ui().dom, content, "menu-item", label) else {
            return;
        };
        self.pilot.click_node(item);
    }

    fn menubar(&self) -> Option<&Menubar> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Popover
// ---------------------------------------------------------------------------

pub struct PopoverModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Popover>,
}

impl<'p> PopoverModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Popover>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_open(&self) -> bool {
        self.popover().is_some_and(Popover::is_open)
    }

    pub fn toggle(&mut self) {
        let Some(trigger) = self.popover().map(Popover::trigger) else {
            return;
        };
        self.pilot.click_node(trigger);
    }

    pub fn open(&mut self) {
        if !self.is_open() {
            self.toggle();
        }
    }

    pub fn close(&mut self) {
        if self.is_open() {
            self.toggle();
        }
    }

    /// Click the bottom-right viewport corner, away from the surface.
    pub fn dismiss_outside(&mut self) {
        let vp = self.pilot.ui().viewport();
        let x = (vp.width - 1).max(0) as u16;
        let y = (vp.height - 1).max(0) as u16;
        self.pilot.click(x, y);
    }

    fn popover(&self) -> Option<&Popover> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Select
// ---------------------------------------------------------------------------

pub struct SelectModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Select>,
}

impl<'p> SelectModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Select>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_open(&self) -> bool {
        self.select().is_some_and(Select::is_open)
    }

    pub fn value(&self) -> Option<String> {
        let ui = self.pilot.ui();
        ui.controller(&self.handle)
            .and_then(|s| s.value(&ui.dom))
            .map(str::to_string)
    }

    pub fn highlighted(&self) -> Option<String> {
        let content = self.select().map(Select::content)?;
        let dom = &self.pilot.ui().dom;
        dom.query_in(content, |d| {
            d.kind == "option" && d.data_is("highlighted", "true")
        })
        .first()
        .map(|&option| dom.text(option).to_string())
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        let Some(trigger) = self.select().map(Select::trigger) else {
            return;
        };
        self.pilot.click_node(trigger);
    }

    /// Open if needed and click the option with this label.
    pub fn choose(&mut self, label: &str) {
        self.open();
        let Some(content) = self.select().map(Select::content) else {
            return;
        };
        let Some(option) = labeled(&self.pilot.ui().dom, content, "option", label) else {
            return;
        };
        self.pilot.click_node(option);
    }

    /// Open if needed and feed characters to the typeahead buffer.
    pub fn type_ahead(&mut self, text: &str) {
        self.open();
        self.pilot.type_text(text);
    }

    fn select(&self) -> Option<&Select> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Sidebar
// ---------------------------------------------------------------------------

pub struct SidebarModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Sidebar>,
}

impl<'p> SidebarModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Sidebar>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_collapsed(&self) -> bool {
        self.sidebar().is_some_and(Sidebar::is_collapsed)
    }

    pub fn selected(&self) -> Option<String> {
        self.sidebar()
            .and_then(Sidebar::selected_label)
            .map(str::to_string)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.sidebar().and_then(Sidebar::selected_index)
    }

    pub fn toggle(&mut self) {
        let Some(button) = self.sidebar().map(Sidebar::toggle_button) else {
            return;
        };
        self.pilot.click_node(button);
    }

    /// Ctrl+B from inside the sidebar.
    pub fn shortcut_toggle(&mut self) {
        let Some(button) = self.sidebar().map(Sidebar::toggle_button) else {
            return;
        };
        self.pilot.focus(button);
        self.pilot.press_key_with(Key::Char('b'), Modifiers::CTRL);
    }

    /// Click a row by its label text. Labels are hidden while collapsed.
    pub fn select(&mut self, label: &str) {
        let Some(item) = labeled(&self.pilot.ui().dom, self.handle.root(), "text", label) else {
            return;
        };
        self.pilot.click_node(item);
    }

    fn sidebar(&self) -> Option<&Sidebar> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Slider
// ---------------------------------------------------------------------------

pub struct SliderModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Slider>,
}

impl<'p> SliderModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Slider>) -> Self {
        Self { pilot, handle }
    }

    pub fn value(&self) -> Option<f64> {
        self.slider().map(Slider::value)
    }

    pub fn focus(&mut self) {
        self.pilot.focus(self.handle.root());
    }

    pub fn increment(&mut self) {
        self.focus();
        self.pilot.press_key(Key::Right);
    }

    pub fn decrement(&mut self) {
        self.focus();
        self.pilot.press_key(Key::Left);
    }

    pub fn to_min(&mut self) {
        self.focus();
        self.pilot.press_key(Key::Home);
    }

    pub fn to_max(&mut self) {
        self.focus();
        self.pilot.press_key(Key::End);
    }

    /// Click column `x` on the track, jumping the value there.
    pub fn click_track(&mut self, x: u16) {
        let Some(track) = self.track_region() else {
            return;
        };
        let y = track.y.max(0) as u16;
        self.pilot.click(x, y);
    }

    /// Grab the thumb and drag it to column `x`.
    pub fn drag_to(&mut self, x: u16) {
        let Some(track) = self.track_region() else {
            return;
        };
        let y = track.y.max(0) as u16;
        let from = self.grab_x().unwrap_or(track.x.max(0) as u16);
        self.pilot.press(from, y);
        self.pilot.drag(x, y);
        self.pilot.release(x, y);
    }

    fn track_region(&self) -> Option<Region> {
        let track = self.slider().map(Slider::track)?;
        self.pilot.ui().regions.get(track)
    }

    /// Column the thumb currently sits on, from the percent marker.
    fn grab_x(&self) -> Option<u16> {
        let track = self.track_region()?;
        let percent: f64 = self
            .pilot
            .ui()
            .dom
            .data(self.handle.root(), "percent")
            .and_then(|p| p.parse().ok())?;
        let x = track.x as f64 + (percent / 100.0) * (track.width - 1).max(0) as f64;
        Some(x.round().max(0.0) as u16)
    }

    fn slider(&self) -> Option<&Slider> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

pub struct ToggleModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Toggle>,
}

impl<'p> ToggleModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Toggle>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_pressed(&self) -> bool {
        self.pilot
            .controller(&self.handle)
            .is_some_and(Toggle::is_pressed)
    }

    pub fn toggle(&mut self) {
        let Some(root) = self.pilot.controller(&self.handle).map(Toggle::root) else {
            return;
        };
        self.pilot.click_node(root);
    }
}

// ---------------------------------------------------------------------------
// ToggleGroup
// ---------------------------------------------------------------------------

pub struct ToggleGroupModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<ToggleGroup>,
}

impl<'p> ToggleGroupModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<ToggleGroup>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_pressed(&self, index: usize) -> bool {
        self.group().is_some_and(|g| g.is_pressed(index))
    }

    pub fn pressed_indices(&self) -> Vec<usize> {
        self.group()
            .map(ToggleGroup::pressed_indices)
            .unwrap_or_default()
    }

    pub fn toggle(&mut self, label: &str) {
        let Some(item) = labeled(&self.pilot.ui().dom, self.handle.root(), "button", label)
        else {
            return;
        };
        self.pilot.click_node(item);
    }

    pub fn toggle_index(&mut self, index: usize) {
        let Some(item) = self.group().and_then(|g| g.item(index)) else {
            return;
        };
        self.pilot.click_node(item);
    }

    fn group(&self) -> Option<&ToggleGroup> {
        self.pilot.controller(&self.handle)
    }
}

// ---------------------------------------------------------------------------
// Tooltip
// ---------------------------------------------------------------------------

pub struct TooltipModel<'p> {
    pilot: &'p mut Pilot,
    handle: Mounted<Tooltip>,
}

impl<'p> TooltipModel<'p> {
    pub fn new(pilot: &'p mut Pilot, handle: Mounted<Tooltip>) -> Self {
        Self { pilot, handle }
    }

    pub fn is_visible(&self) -> bool {
        self.pilot
            .controller(&self.handle)
            .is_some_and(Tooltip::is_visible)
    }

    pub fn hover(&mut self) {
        let Some(trigger) = self.pilot.controller(&self.handle).map(Tooltip::trigger) else {
            return;
        };
        self.pilot.hover_node(trigger);
    }

    /// Move the pointer to the bottom-right corner, off the trigger.
    pub fn leave(&mut self) {
        let vp = self.pilot.ui().viewport();
        let x = (vp.width - 1).max(0) as u16;
        let y = (vp.height - 1).max(0) as u16;
        self.pilot.hover(x, y);
    }

    /// Let hover-intent timers run.
    pub fn advance(&mut self, elapsed: Duration) {
        self.pilot.advance(elapsed);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        CheckboxConfig, ComboboxConfig, DialogConfig, DrawerConfig, DropdownMenuConfig, MenuItem,
        RadioGroupConfig, RadioItem, SelectConfig, SelectOption, SliderConfig, TooltipConfig,
    };

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn menu_model_selects_by_label() {
        let mut pilot = Pilot::new(80, 24);
        let handle = pilot.mount(DropdownMenu::new(
            DropdownMenuConfig::new("File")
                .item(MenuItem::new("Open"))
                .item(MenuItem::new("Save")),
        ));
        let mut menu = MenuModel::new(&mut pilot, handle);

        menu.select("Save");
        assert!(!menu.is_open());
        assert_eq!(menu.selection().as_deref(), Some("Save"));
    }

    #[test]
    fn select_model_reads_the_committed_value() {
        let mut pilot = Pilot::new(80, 24);
        let handle = pilot.mount(Select::new(
            SelectConfig::new("Fruit")
                .option(SelectOption::new("Apple"))
                .option(SelectOption::new("Banana")),
        ));
        let mut select = SelectModel::new(&mut pilot, handle);

        assert_eq!(select.value(), None);
        select.choose("Banana");
        assert_eq!(select.value().as_deref(), Some("Banana"));
        assert!(!select.is_open());
    }

    #[test]
    fn combobox_model_filters_then_commits() {
        let mut pilot = Pilot::new(80, 24);
        let handle = pilot.mount(Combobox::new(ComboboxConfig::new("Search fruit").options(
            vec!["Apple".into(), "Banana".into(), "Cherry".into()],
        )));
        let mut combo = ComboboxModel::new(&mut pilot, handle);

        combo.search("an");
        assert_eq!(combo.visible_options(), vec!["Banana".to_string()]);
        combo.commit();
        assert_eq!(combo.value().as_deref(), Some("Banana"));
        assert!(!combo.is_open());
    }

    #[test]
    fn dialog_model_opens_from_the_keyboard_and_dismisses_outside() {
        let mut pilot = Pilot::new(80, 24);
        let handle = pilot.mount(Dialog::new(DialogConfig::new("Delete", "Confirm deletion")));
        let mut dialog = DialogModel::new(&mut pilot, handle);

        dialog.open();
        assert!(dialog.is_open());
        dialog.click_outside();
        assert!(!dialog.is_open());
    }

    #[test]
    fn drawer_model_walks_the_snap_ladder() {
        let mut pilot = Pilot::new(80, 24);
        let handle = pilot.mount(Drawer::new(
            DrawerConfig::new("Filters").snap_points(&[0.3, 0.6, 0.9]),
        ));
        let mut drawer = DrawerModel::new(&mut pilot, handle);

        drawer.open();
        assert_eq!(drawer.snap_index(), Some(0));
        drawer.raise();
        assert_eq!(drawer.snap_index(), Some(1));
        drawer.close();
        assert!(!drawer.is_open());
        assert_eq!(drawer.snap_index(), None);
    }

    #[test]
    fn radio_model_chooses_by_label() {
        let mut pilot = Pilot::new(80, 24);
        let handle = pilot.mount(RadioGroup::new(
            RadioGroupConfig::new()
                .item(RadioItem::new("Comfortable"))
                .item(RadioItem::new("Compact")),
        ));
        let mut radios = RadioGroupModel::new(&mut pilot, handle);

        radios.choose("Compact");
        assert_eq!(radios.selected().as_deref(), Some("Compact"));
        assert_eq!(radios.selected_index(), Some(1));
    }

    #[test]
    fn checkbox_model_round_trips() {
        let mut pilot = Pilot::new(80, 24);
        let handle = pilot.mount(Checkbox::new(CheckboxConfig::new("Remember me")));
        let mut checkbox = CheckboxModel::new(&mut pilot, handle);

        assert!(!checkbox.is_checked());
        checkbox.toggle();
        assert!(checkbox.is_checked());
        checkbox.toggle();
        assert!(!checkbox.is_checked());
    }

    #[test]
    fn slider_model_tracks_clicks_and_keys() {
        let mut pilot = Pilot::new(80, 24);
        let handle = pilot.mount(Slider::new(SliderConfig::new().value(50.0)));
        let mut slider = SliderModel::new(&mut pilot, handle);

        slider.click_track(79);
        assert_eq!(slider.value(), Some(100.0));
        slider.decrement();
        assert_eq!(slider.value(), Some(99.0));
        slider.to_min();
        assert_eq!(slider.value(), Some(0.0));
    }

    #[test]
    fn tooltip_model_waits_out_the_hover_delays() {
        let mut pilot = Pilot::new(80, 24);
        let handle = pilot.mount(Tooltip::new(TooltipConfig::new("Save", "Write to disk")));
        let mut tip = TooltipModel::new(&mut pilot, handle);

        tip.hover();
        assert!(!tip.is_visible());
        tip.advance(MS(100));
        assert!(tip.is_visible());
        tip.leave();
        tip.advance(MS(300));
        assert!(!tip.is_visible());
    }
}
