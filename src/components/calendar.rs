//! Calendar and date picker, fed by the date service.
//!
//! Neither component computes a month grid itself. Every navigation sends a
//! [`MonthRequest`] and the grid subtree is replaced wholesale when the
//! reply arrives; committed dates are rendered through a [`FormatRequest`]
//! the same way. A request that fails produces no reply, so the view simply
//! keeps showing the last month it was given.
//!
//! [`CalendarCore`] owns the header, the grid, and the roving focused day;
//! [`Calendar`] mounts it inline, [`DatePicker`] floats it under a trigger
//! and commits the picked day onto the trigger label.

use chrono::{Datelike, Duration as ChronoDuration, Months, NaiveDate};
use tracing::trace;

use crate::controller::{Controller, Handled};
use crate::dom::{Dom, NodeData, NodeId};
use crate::event::{Key, KeyEvent, MouseEvent};
use crate::geometry::Size;
use crate::interaction::dismiss::{BindingId, DismissReason, EscapeOptions, OutsideClickOptions};
use crate::interaction::positioner::{Placement, PositionConfig};
use crate::service::{FormatRequest, MonthGrid, MonthRequest, ServiceReply, ServiceRequest};
use crate::style::{part_attrs, part_classes, Appearance};
use crate::ui::Ctx;

const DISMISS_TOKEN: u32 = 0;

// ---------------------------------------------------------------------------
// CalendarCore
// ---------------------------------------------------------------------------

/// What a key or click inside the grid amounted to.
enum CalendarSignal {
    None,
    /// A day was committed.
    Picked(NaiveDate),
}

/// Header, weekday strip, and grid, plus the roving focused day.
///
/// The displayed year and month only change when a reply is applied; the
/// focused day is runtime state and moves immediately.
struct CalendarCore {
    controller: &'static str,
    container: NodeId,
    prev: NodeId,
    next: NodeId,
    title: NodeId,
    grid: NodeId,
    year: i32,
    month: u32,
    weeks: u8,
    focused: NaiveDate,
    selected: Option<NaiveDate>,
}

impl CalendarCore {
    fn new(controller: &'static str, initial: NaiveDate, selected: Option<NaiveDate>, weeks: u8) -> Self {
        let focused = selected.unwrap_or(initial);
        Self {
            controller,
            container: NodeId::default(),
            prev: NodeId::default(),
            next: NodeId::default(),
            title: NodeId::default(),
            grid: NodeId::default(),
            year: focused.year(),
            month: focused.month(),
            weeks,
            focused,
            selected,
        }
    }

    fn build(
        &mut self,
        dom: &mut Dom,
        parent: NodeId,
        part: &'static str,
        appearance: &Appearance,
        id: Option<&str>,
    ) -> NodeId {
        let mut data = NodeData::new("calendar")
            .with_classes(part_classes("border rounded pad-1", appearance))
            .with_attrs(part_attrs(self.controller, part, appearance));
        if let Some(id) = id {
            data = data.with_id(id);
        }
        self.container = dom.insert_child(parent, data);

        let header = dom.insert_child(
            self.container,
            NodeData::new("group")
                .with_attrs(part_attrs(self.controller, "header", &Appearance::default())),
        );
        self.prev = dom.insert_child(
            header,
            NodeData::new("button")
                .with_attrs(part_attrs(self.controller, "prev", &Appearance::default()))
                .with_text("<")
                .focusable(true),
        );
        self.title = dom.insert_child(
            header,
            NodeData::new("heading")
                .with_attrs(part_attrs(self.controller, "title", &Appearance::default())),
        );
        self.next = dom.insert_child(
            header,
            NodeData::new("button")
                .with_attrs(part_attrs(self.controller, "next", &Appearance::default()))
                .with_text(">")
                .focusable(true),
        );

        dom.insert_child(
            self.container,
            NodeData::new("text")
                .with_class("muted")
                .with_text("Su Mo Tu We Th Fr Sa"),
        );
        self.grid = dom.insert_child(
            self.container,
            NodeData::new("grid")
                .with_attrs(part_attrs(self.controller, "grid", &Appearance::default()))
                .focusable(true),
        );
        self.container
    }

    // ── Service round-trip ───────────────────────────────────────────

    fn request_month(&self, ctx: &mut Ctx<'_>, year: i32, month: u32, jump: i32) {
        let mut request = MonthRequest::new(year, month);
        request.weeks = self.weeks;
        request.focused = Some(self.focused);
        request.jump_amount = jump;
        request.selected_value = self.selected;
        ctx.request(ServiceRequest::Month(request));
    }

    /// Replace the grid with a rendered month.
    fn apply(&mut self, ctx: &mut Ctx<'_>, grid: &MonthGrid) {
        self.year = grid.year;
        self.month = grid.month;
        ctx.dom.set_text(self.title, &grid.title);
        ctx.dom.remove_children(self.grid);
        for week in &grid.weeks {
            let row = ctx.dom.insert_child(self.grid, NodeData::new("week"));
            for cell in week {
                let mut data = NodeData::new("day")
                    .with_text(&cell.label)
                    .with_data("date", cell.date.to_string());
                if !cell.in_month {
                    data = data.with_class("muted");
                }
                if cell.selected {
                    data = data.with_data("selected", "true");
                }
                if cell.focused {
                    data = data.with_data("focused", "true");
                }
                ctx.dom.insert_child(row, data);
            }
        }
    }

    // ── Focus and selection ──────────────────────────────────────────

    fn focus_day(&mut self, ctx: &mut Ctx<'_>, date: NaiveDate) {
        self.focused = date;
        self.request_month(ctx, date.year(), date.month(), 0);
    }

    fn move_focus_days(&mut self, ctx: &mut Ctx<'_>, days: i64) {
        if let Some(next) = self.focused.checked_add_signed(ChronoDuration::days(days)) {
            self.focus_day(ctx, next);
        }
    }

    fn move_focus_months(&mut self, ctx: &mut Ctx<'_>, months: i32) {
        let next = if months < 0 {
            self.focused.checked_sub_months(Months::new(1))
        } else {
            self.focused.checked_add_months(Months::new(1))
        };
        if let Some(next) = next {
            self.focus_day(ctx, next);
        }
    }

    fn select(&mut self, ctx: &mut Ctx<'_>, date: NaiveDate) {
        trace!(%date, "day selected");
        self.selected = Some(date);
        self.focused = date;
        self.request_month(ctx, date.year(), date.month(), 0);
    }

    /// The day a pointer event landed on, read back off the cell.
    fn day_under(&self, dom: &Dom, target: NodeId) -> Option<NaiveDate> {
        if !dom.is_within(target, self.grid) {
            return None;
        }
        let data = dom.get(target)?;
        if data.kind != "day" {
            return None;
        }
        NaiveDate::parse_from_str(dom.data(target, "date")?, "%Y-%m-%d").ok()
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Keys while the grid itself holds focus.
    fn handle_key(&mut self, ctx: &mut Ctx<'_>, event: &KeyEvent) -> (Handled, CalendarSignal) {
        match event.code {
            Key::Left => {
                self.move_focus_days(ctx, -1);
                (Handled::Yes, CalendarSignal::None)
            }
            Key::Right => {
                self.move_focus_days(ctx, 1);
                (Handled::Yes, CalendarSignal::None)
            }
            Key::Up => {
                self.move_focus_days(ctx, -7);
                (Handled::Yes, CalendarSignal::None)
            }
            Key::Down => {
                self.move_focus_days(ctx, 7);
                (Handled::Yes, CalendarSignal::None)
            }
            Key::Home => {
                let back = self.focused.weekday().num_days_from_sunday() as i64;
                self.move_focus_days(ctx, -back);
                (Handled::Yes, CalendarSignal::None)
            }
            Key::End => {
                let ahead = 6 - self.focused.weekday().num_days_from_sunday() as i64;
                self.move_focus_days(ctx, ahead);
                (Handled::Yes, CalendarSignal::None)
            }
            Key::PageUp => {
                self.move_focus_months(ctx, -1);
                (Handled::Yes, CalendarSignal::None)
            }
            Key::PageDown => {
                self.move_focus_months(ctx, 1);
                (Handled::Yes, CalendarSignal::None)
            }
            Key::Enter | Key::Char(' ') => {
                let date = self.focused;
                self.select(ctx, date);
                (Handled::Yes, CalendarSignal::Picked(date))
            }
            _ => (Handled::No, CalendarSignal::None),
        }
    }

    /// Enter or Space on a focused header button.
    fn header_key(&mut self, ctx: &mut Ctx<'_>, focused: Option<NodeId>, event: &KeyEvent) -> Handled {
        if !matches!(event.code, Key::Enter | Key::Char(' ')) {
            return Handled::No;
        }
        let (year, month) = (self.year, self.month);
        if focused == Some(self.prev) {
            self.request_month(ctx, year, month, -1);
            return Handled::Yes;
        }
        if focused == Some(self.next) {
            self.request_month(ctx, year, month, 1);
            return Handled::Yes;
        }
        Handled::No
    }

    fn handle_mouse(
        &mut self,
        ctx: &mut Ctx<'_>,
        target: NodeId,
        event: &MouseEvent,
    ) -> (Handled, CalendarSignal) {
        if event.is_press() {
            if ctx.dom.is_within(target, self.container) {
                return (Handled::Yes, CalendarSignal::None);
            }
            return (Handled::No, CalendarSignal::None);
        }
        if event.is_release() {
            let (year, month) = (self.year, self.month);
            if ctx.dom.is_within(target, self.prev) {
                self.request_month(ctx, year, month, -1);
                return (Handled::Yes, CalendarSignal::None);
            }
            if ctx.dom.is_within(target, self.next) {
                self.request_month(ctx, year, month, 1);
                return (Handled::Yes, CalendarSignal::None);
            }
            if let Some(date) = self.day_under(ctx.dom, target) {
                self.select(ctx, date);
                return (Handled::Yes, CalendarSignal::Picked(date));
            }
        }
        (Handled::No, CalendarSignal::None)
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Configuration for a [`Calendar`].
#[derive(Clone, Debug)]
pub struct CalendarConfig {
    initial: NaiveDate,
    selected: Option<NaiveDate>,
    weeks: u8,
    appearance: Appearance,
    id: Option<String>,
}

impl CalendarConfig {
    pub fn new() -> Self {
        Self {
            initial: chrono::Local::now().date_naive(),
            selected: None,
            weeks: 6,
            appearance: Appearance::default(),
            id: None,
        }
    }

    /// Day the view opens on when nothing is selected yet.
    pub fn initial(mut self, initial: NaiveDate) -> Self {
        self.initial = initial;
        self
    }

    pub fn selected(mut self, selected: NaiveDate) -> Self {
        self.selected = Some(selected);
        self
    }

    pub fn weeks(mut self, weeks: u8) -> Self {
        self.weeks = weeks;
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

impl Default for CalendarConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Inline month view with service-rendered grids.
pub struct Calendar {
    config: CalendarConfig,
    core: CalendarCore,
}

impl Calendar {
    pub fn new(config: CalendarConfig) -> Self {
        let core = CalendarCore::new("calendar", config.initial, config.selected, config.weeks);
        Self { config, core }
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.core.selected
    }

    /// Day the roving focus sits on.
    pub fn focused_day(&self) -> NaiveDate {
        self.core.focused
    }

    /// Displayed `(year, month)`, as of the last applied reply.
    pub fn month(&self) -> (i32, u32) {
        (self.core.year, self.core.month)
    }

    pub fn grid(&self) -> NodeId {
        self.core.grid
    }

    pub fn title(&self) -> NodeId {
        self.core.title
    }

    pub fn prev_button(&self) -> NodeId {
        self.core.prev
    }

    pub fn next_button(&self) -> NodeId {
        self.core.next
    }
}

impl Controller for Calendar {
    fn kind(&self) -> &'static str {
        "calendar"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let id = self.config.id.clone();
        let root = self
            .core
            .build(ctx.dom, parent, "root", &self.config.appearance, id.as_deref());
        let (year, month) = (self.core.year, self.core.month);
        self.core.request_month(ctx, year, month, 0);
        root
    }

    fn on_key(&mut self, ctx: &mut Ctx<'_>, event: KeyEvent) -> Handled {
        let focused = ctx.focused();
        if focused == Some(self.core.grid) {
            return self.core.handle_key(ctx, &event).0;
        }
        self.core.header_key(ctx, focused, &event)
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        self.core.handle_mouse(ctx, target, &event).0
    }

    fn on_reply(&mut self, ctx: &mut Ctx<'_>, reply: ServiceReply) {
        if let ServiceReply::Month(grid) = reply {
            self.core.apply(ctx, &grid);
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

// ---------------------------------------------------------------------------
// DatePicker
// ---------------------------------------------------------------------------

/// Configuration for a [`DatePicker`].
#[derive(Clone, Debug)]
pub struct DatePickerConfig {
    placeholder: String,
    initial: NaiveDate,
    weeks: u8,
    position: PositionConfig,
    appearance: Appearance,
    id: Option<String>,
}

impl DatePickerConfig {
    pub fn new() -> Self {
        Self {
            placeholder: "Pick a date".to_string(),
            initial: chrono::Local::now().date_naive(),
            weeks: 6,
            position: PositionConfig::new(Placement::BOTTOM_START),
            appearance: Appearance::default(),
            id: None,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn initial(mut self, initial: NaiveDate) -> Self {
        self.initial = initial;
        self
    }

    pub fn weeks(mut self, weeks: u8) -> Self {
        self.weeks = weeks;
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

impl Default for DatePickerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Trigger plus floating calendar; the committed day is formatted by the
/// service before it lands on the trigger.
pub struct DatePicker {
    config: DatePickerConfig,
    trigger: NodeId,
    surface: NodeId,
    core: CalendarCore,
    open: bool,
    value: Option<NaiveDate>,
    outside: Option<BindingId>,
    escape: Option<BindingId>,
}

impl DatePicker {
    pub fn new(config: DatePickerConfig) -> Self {
        let core = CalendarCore::new("date-picker", config.initial, None, config.weeks);
        Self {
            config,
            trigger: NodeId::default(),
            surface: NodeId::default(),
            core,
            open: false,
            value: None,
            outside: None,
            escape: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The committed day, regardless of whether its label arrived yet.
    pub fn value(&self) -> Option<NaiveDate> {
        self.value
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn content(&self) -> NodeId {
        self.surface
    }

    pub fn grid(&self) -> NodeId {
        self.core.grid
    }

    // ── Open / close ─────────────────────────────────────────────────

    fn open(&mut self, ctx: &mut Ctx<'_>) {
        if self.open {
            return;
        }
        trace!("date picker opened");
        self.open = true;
        ctx.dom.set_visible(self.surface, true);
        ctx.dom.set_data(self.surface, "state", "open");
        ctx.dom.set_data(self.trigger, "state", "open");
        // Grid contents are text cells of fixed width; the surface size only
        // depends on the week count.
        let size = Size::new(24, self.config.weeks as i32 + 5);
        ctx.start_positioning(self.trigger, self.surface, size, self.config.position);
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
        ctx.focus(self.core.grid);
        let (year, month) = (self.core.year, self.core.month);
        self.core.request_month(ctx, year, month, 0);
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

    fn commit(&mut self, ctx: &mut Ctx<'_>, date: NaiveDate) {
        self.value = Some(date);
        ctx.request(ServiceRequest::Format(FormatRequest { value: date }));
        self.close(ctx);
        ctx.focus(self.trigger);
    }
}

impl Controller for DatePicker {
    fn kind(&self) -> &'static str {
        "date-picker"
    }

    fn mount(&mut self, ctx: &mut Ctx<'_>, parent: NodeId) -> NodeId {
        let mut root_data = NodeData::new("date-picker")
            .with_attrs(part_attrs("date-picker", "root", &self.config.appearance));
        if let Some(id) = &self.config.id {
            root_data = root_data.with_id(id.clone());
        }
        let root = ctx.dom.insert_child(parent, root_data);

        self.trigger = ctx.dom.insert_child(
            root,
            NodeData::new("button")
                .with_classes(part_classes("border rounded pad-x-2", &self.config.appearance))
                .with_attrs(part_attrs("date-picker", "trigger", &self.config.appearance))
                .with_text(&self.config.placeholder)
                .focusable(true)
                .with_data("state", "closed")
                .with_data("placeholder", "true"),
        );

        let mut surface_data = NodeData::new("popover")
            .with_classes(part_classes("border rounded", &Appearance::default()))
            .with_attrs(part_attrs("date-picker", "content", &Appearance::default()))
            .with_data("state", "closed");
        surface_data.visible = false;
        self.surface = ctx.dom.insert_child(root, surface_data);

        self.core
            .build(ctx.dom, self.surface, "calendar", &Appearance::default(), None);
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
        let focused = ctx.focused();
        if focused == Some(self.core.grid) {
            let (handled, signal) = self.core.handle_key(ctx, &event);
            if let CalendarSignal::Picked(date) = signal {
                self.commit(ctx, date);
            }
            return handled;
        }
        self.core.header_key(ctx, focused, &event)
    }

    fn on_mouse(&mut self, ctx: &mut Ctx<'_>, target: NodeId, event: MouseEvent) -> Handled {
        if event.is_press() && ctx.dom.is_within(target, self.trigger) {
            if self.open {
                self.close(ctx);
            } else {
                self.open(ctx);
            }
            return Handled::Yes;
        }
        if !self.open {
            return Handled::No;
        }
        let (handled, signal) = self.core.handle_mouse(ctx, target, &event);
        if let CalendarSignal::Picked(date) = signal {
            self.commit(ctx, date);
        }
        handled
    }

    fn on_dismiss(&mut self, ctx: &mut Ctx<'_>, reason: DismissReason, _token: u32) {
        self.close(ctx);
        if reason == DismissReason::Escape {
            ctx.focus(self.trigger);
        }
    }

    fn on_reply(&mut self, ctx: &mut Ctx<'_>, reply: ServiceReply) {
        match reply {
            ServiceReply::Month(grid) => self.core.apply(ctx, &grid),
            ServiceReply::Format(format) => {
                ctx.dom.set_text(self.trigger, &format.value);
                ctx.dom.set_data(self.trigger, "placeholder", "false");
            }
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

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::event::InputEvent;
    use crate::geometry::Region;
    use crate::service::{DateService, FormatReply, LocalDateService, ServiceBridge, ServiceError};
    use crate::ui::Ui;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service_ui(bridge: ServiceBridge) -> (Ui, NodeId) {
        let mut ui = Ui::with_service(Region::new(0, 0, 80, 24), bridge);
        let root = ui.dom.insert(NodeData::new("shell"));
        ui.dom.set_root(root);
        (ui, root)
    }

    fn local_ui() -> (Ui, NodeId) {
        service_ui(ServiceBridge::inline(LocalDateService::new()))
    }

    fn pump(ui: &mut Ui) {
        ui.tick(Duration::ZERO);
    }

    fn key(ui: &mut Ui, code: Key) {
        ui.handle_input(InputEvent::Key(KeyEvent::plain(code)));
    }

    fn day(ui: &Ui, grid: NodeId, iso: &str) -> Option<NodeId> {
        ui.dom
            .query_in(grid, |d| d.kind == "day" && d.data_is("date", iso))
            .first()
            .copied()
    }

    /// Month requests succeed once, then nothing answers.
    struct FlakyMonths {
        calls: Cell<u32>,
    }

    impl DateService for FlakyMonths {
        fn month(&self, request: &MonthRequest) -> Result<MonthGrid, ServiceError> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n == 0 {
                LocalDateService::new().month(request)
            } else {
                Err(ServiceError::OutOfRange)
            }
        }

        fn format(&self, request: &FormatRequest) -> Result<FormatReply, ServiceError> {
            LocalDateService::new().format(request)
        }
    }

    /// Formatting never answers.
    struct NoFormat;

    impl DateService for NoFormat {
        fn month(&self, request: &MonthRequest) -> Result<MonthGrid, ServiceError> {
            LocalDateService::new().month(request)
        }

        fn format(&self, _request: &FormatRequest) -> Result<FormatReply, ServiceError> {
            Err(ServiceError::OutOfRange)
        }
    }

    // ── Calendar ─────────────────────────────────────────────────────

    fn mounted(ui: &mut Ui, root: NodeId) -> crate::controller::Mounted<Calendar> {
        let config = CalendarConfig::new().initial(date(2026, 8, 21));
        let handle = ui.mount(Calendar::new(config), root);
        pump(ui); // initial month reply
        let grid = ui.controller(&handle).unwrap().grid();
        ui.focus(grid);
        handle
    }

    #[test]
    fn the_initial_month_arrives_from_the_service() {
        let (mut ui, root) = local_ui();
        let calendar = mounted(&mut ui, root);
        let c = ui.controller(&calendar).unwrap();

        assert_eq!(ui.dom.text(c.title()), "August 2026");
        assert_eq!(ui.dom.children(c.grid()).len(), 6);
        for &week in ui.dom.children(c.grid()) {
            assert_eq!(ui.dom.children(week).len(), 7);
        }

        // Grid starts on the previous Sunday; the filler day is muted.
        let filler = day(&ui, c.grid(), "2026-07-26").unwrap();
        assert!(ui.dom.get(filler).unwrap().has_class("muted"));
        let focused = day(&ui, c.grid(), "2026-08-21").unwrap();
        assert!(ui.dom.data_is(focused, "focused", "true"));
    }

    #[test]
    fn arrows_move_the_focused_day_across_month_edges() {
        let (mut ui, root) = local_ui();
        let calendar = mounted(&mut ui, root);

        key(&mut ui, Key::Right);
        assert_eq!(ui.controller(&calendar).unwrap().focused_day(), date(2026, 8, 22));
        pump(&mut ui);
        let grid = ui.controller(&calendar).unwrap().grid();
        let cell = day(&ui, grid, "2026-08-22").unwrap();
        assert!(ui.dom.data_is(cell, "focused", "true"));

        // Home backs up to Sunday.
        key(&mut ui, Key::Home);
        assert_eq!(ui.controller(&calendar).unwrap().focused_day(), date(2026, 8, 16));

        // Three weeks down walks into September and the view follows.
        key(&mut ui, Key::Down);
        key(&mut ui, Key::Down);
        key(&mut ui, Key::Down);
        pump(&mut ui);
        let c = ui.controller(&calendar).unwrap();
        assert_eq!(c.focused_day(), date(2026, 9, 6));
        assert_eq!(c.month(), (2026, 9));
        assert_eq!(ui.dom.text(c.title()), "September 2026");
    }

    #[test]
    fn page_keys_jump_whole_months() {
        let (mut ui, root) = local_ui();
        let calendar = mounted(&mut ui, root);

        key(&mut ui, Key::PageDown);
        pump(&mut ui);
        let c = ui.controller(&calendar).unwrap();
        assert_eq!(c.focused_day(), date(2026, 9, 21));
        assert_eq!(ui.dom.text(c.title()), "September 2026");

        key(&mut ui, Key::PageUp);
        key(&mut ui, Key::PageUp);
        pump(&mut ui);
        let c = ui.controller(&calendar).unwrap();
        assert_eq!(c.focused_day(), date(2026, 7, 21));
        assert_eq!(ui.dom.text(c.title()), "July 2026");
    }

    #[test]
    fn enter_selects_the_focused_day() {
        let (mut ui, root) = local_ui();
        let calendar = mounted(&mut ui, root);

        key(&mut ui, Key::Enter);
        let c = ui.controller(&calendar).unwrap();
        assert_eq!(c.selected(), Some(date(2026, 8, 21)));

        pump(&mut ui);
        let grid = ui.controller(&calendar).unwrap().grid();
        let cell = day(&ui, grid, "2026-08-21").unwrap();
        assert!(ui.dom.data_is(cell, "selected", "true"));
    }

    #[test]
    fn clicking_a_day_selects_it() {
        let (mut ui, root) = local_ui();
        let calendar = mounted(&mut ui, root);
        let grid = ui.controller(&calendar).unwrap().grid();

        let cell = day(&ui, grid, "2026-08-05").unwrap();
        ui.regions.set(cell, Region::new(10, 8, 2, 1));
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(10, 8)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(10, 8)));

        assert_eq!(ui.controller(&calendar).unwrap().selected(), Some(date(2026, 8, 5)));
        pump(&mut ui);
        let grid = ui.controller(&calendar).unwrap().grid();
        let cell = day(&ui, grid, "2026-08-05").unwrap();
        assert!(ui.dom.data_is(cell, "selected", "true"));
    }

    #[test]
    fn header_buttons_step_the_displayed_month() {
        let (mut ui, root) = local_ui();
        let calendar = mounted(&mut ui, root);
        let (prev_button, next_button) = {
            let c = ui.controller(&calendar).unwrap();
            (c.prev_button(), c.next_button())
        };
        ui.regions.set(prev_button, Region::new(2, 2, 1, 1));
        ui.regions.set(next_button, Region::new(20, 2, 1, 1));

        ui.handle_input(InputEvent::Mouse(MouseEvent::down(20, 2)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(20, 2)));
        pump(&mut ui);
        let c = ui.controller(&calendar).unwrap();
        assert_eq!(c.month(), (2026, 9));
        // Stepping the view does not move the focused day.
        assert_eq!(c.focused_day(), date(2026, 8, 21));

        // Each step is relative to the month the view is showing, so the
        // reply has to land before the next step moves from it.
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(2, 2)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(2, 2)));
        pump(&mut ui);
        assert_eq!(ui.controller(&calendar).unwrap().month(), (2026, 8));
        ui.handle_input(InputEvent::Mouse(MouseEvent::down(2, 2)));
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(2, 2)));
        pump(&mut ui);
        assert_eq!(ui.controller(&calendar).unwrap().month(), (2026, 7));
    }

    #[test]
    fn a_failed_request_leaves_the_view_unchanged() {
        let (mut ui, root) = service_ui(ServiceBridge::inline(FlakyMonths { calls: Cell::new(0) }));
        let calendar = mounted(&mut ui, root);

        key(&mut ui, Key::PageDown); // this request fails
        pump(&mut ui);
        let c = ui.controller(&calendar).unwrap();
        assert_eq!(c.month(), (2026, 8));
        assert_eq!(ui.dom.text(c.title()), "August 2026");
        assert!(day(&ui, c.grid(), "2026-08-21").is_some());
    }

    // ── DatePicker ───────────────────────────────────────────────────

    fn picker(ui: &mut Ui, root: NodeId) -> crate::controller::Mounted<DatePicker> {
        let config = DatePickerConfig::new().initial(date(2026, 8, 21));
        let handle = ui.mount(DatePicker::new(config), root);
        let trigger = ui.controller(&handle).unwrap().trigger();
        ui.regions.set(trigger, Region::new(2, 2, 14, 1));
        ui.focus(trigger);
        handle
    }

    #[test]
    fn opening_floats_the_grid_below_and_focuses_it() {
        let (mut ui, root) = local_ui();
        let picker = picker(&mut ui, root);

        key(&mut ui, Key::Enter);
        pump(&mut ui);
        let p = ui.controller(&picker).unwrap();
        assert!(p.is_open());
        assert_eq!(ui.focused(), Some(p.grid()));
        let surface = ui.regions.get(p.content()).unwrap();
        assert_eq!((surface.x, surface.y), (2, 3));
        assert!(day(&ui, p.grid(), "2026-08-21").is_some());
    }

    #[test]
    fn picking_a_day_commits_through_the_formatter() {
        let (mut ui, root) = local_ui();
        let picker = picker(&mut ui, root);
        let trigger = ui.controller(&picker).unwrap().trigger();

        key(&mut ui, Key::Enter);
        pump(&mut ui);
        key(&mut ui, Key::Enter); // commit the focused day

        // Closed at once; the label waits for the format reply.
        let p = ui.controller(&picker).unwrap();
        assert!(!p.is_open());
        assert_eq!(p.value(), Some(date(2026, 8, 21)));
        assert_eq!(ui.focused(), Some(trigger));
        assert_eq!(ui.dom.text(trigger), "Pick a date");

        pump(&mut ui);
        assert_eq!(ui.dom.text(trigger), "August 21, 2026");
        assert!(ui.dom.data_is(trigger, "placeholder", "false"));
    }

    #[test]
    fn reopening_marks_the_committed_day() {
        let (mut ui, root) = local_ui();
        let picker = picker(&mut ui, root);

        key(&mut ui, Key::Enter);
        pump(&mut ui);
        key(&mut ui, Key::Enter);
        pump(&mut ui);

        key(&mut ui, Key::Enter); // reopen from the trigger
        pump(&mut ui);
        let p = ui.controller(&picker).unwrap();
        let cell = day(&ui, p.grid(), "2026-08-21").unwrap();
        assert!(ui.dom.data_is(cell, "selected", "true"));
    }

    #[test]
    fn escape_refocuses_the_trigger_but_outside_click_does_not() {
        let (mut ui, root) = local_ui();
        let picker = picker(&mut ui, root);
        let trigger = ui.controller(&picker).unwrap().trigger();

        key(&mut ui, Key::Enter);
        pump(&mut ui);
        key(&mut ui, Key::Escape);
        assert!(!ui.controller(&picker).unwrap().is_open());
        assert_eq!(ui.focused(), Some(trigger));
        assert_eq!(ui.controller(&picker).unwrap().value(), None);

        key(&mut ui, Key::Enter);
        pump(&mut ui);
        ui.handle_input(InputEvent::Mouse(MouseEvent::up(70, 20)));
        assert!(!ui.controller(&picker).unwrap().is_open());
        assert_ne!(ui.focused(), Some(trigger));
    }

    #[test]
    fn a_failed_format_leaves_the_trigger_label_alone() {
        let (mut ui, root) = service_ui(ServiceBridge::inline(NoFormat));
        let picker = picker(&mut ui, root);
        let trigger = ui.controller(&picker).unwrap().trigger();

        key(&mut ui, Key::Enter);
        pump(&mut ui);
        key(&mut ui, Key::Enter);
        pump(&mut ui);

        let p = ui.controller(&picker).unwrap();
        assert_eq!(p.value(), Some(date(2026, 8, 21)));
        assert_eq!(ui.dom.text(trigger), "Pick a date");
        assert!(ui.dom.data_is(trigger, "placeholder", "true"));
    }
}
