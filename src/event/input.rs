//! Input event types wrapping crossterm for decoupling.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types.
//! Crossterm events are converted via `From` impls so the rest of the
//! toolkit never depends on terminal types, and tests can synthesize events
//! without a terminal at all.

use std::ops::{BitAnd, BitOr};

use crate::geometry::Offset;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key event with no modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    /// Whether this is exactly `code` with no modifiers held.
    pub fn is(&self, code: Key) -> bool {
        self.code == code && self.modifiers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MouseBtn / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// Mouse action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Up(MouseBtn),
    Drag(MouseBtn),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse event with action, position, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a new mouse event.
    pub fn new(kind: MouseAction, x: u16, y: u16) -> Self {
        Self { kind, x, y, modifiers: Modifiers::NONE }
    }

    /// Left button press at a position.
    pub fn down(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down(MouseBtn::Left), x, y)
    }

    /// Left button release at a position.
    pub fn up(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up(MouseBtn::Left), x, y)
    }

    /// Pointer motion with no button held.
    pub fn moved(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Moved, x, y)
    }

    /// Left button drag at a position.
    pub fn drag(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Drag(MouseBtn::Left), x, y)
    }

    /// The position as an [`Offset`] for region hit-testing.
    pub fn position(&self) -> Offset {
        Offset::new(self.x as i32, self.y as i32)
    }

    /// Whether this is a left-button press.
    pub fn is_press(&self) -> bool {
        self.kind == MouseAction::Down(MouseBtn::Left)
    }

    /// Whether this is a left-button release.
    pub fn is_release(&self) -> bool {
        self.kind == MouseAction::Up(MouseBtn::Left)
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
    FocusGained,
    FocusLost,
    Paste(String),
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        let code = match ct.code {
            crossterm::event::KeyCode::Char(c) => Key::Char(c),
            crossterm::event::KeyCode::Enter => Key::Enter,
            crossterm::event::KeyCode::Esc => Key::Escape,
            crossterm::event::KeyCode::Tab => Key::Tab,
            crossterm::event::KeyCode::BackTab => Key::BackTab,
            crossterm::event::KeyCode::Backspace => Key::Backspace,
            crossterm::event::KeyCode::Delete => Key::Delete,
            crossterm::event::KeyCode::Left => Key::Left,
            crossterm::event::KeyCode::Right => Key::Right,
            crossterm::event::KeyCode::Up => Key::Up,
            crossterm::event::KeyCode::Down => Key::Down,
            crossterm::event::KeyCode::Home => Key::Home,
            crossterm::event::KeyCode::End => Key::End,
            crossterm::event::KeyCode::PageUp => Key::PageUp,
            crossterm::event::KeyCode::PageDown => Key::PageDown,
            crossterm::event::KeyCode::F(n) => Key::F(n),
            // Map unsupported key codes to Escape as a fallback.
            _ => Key::Escape,
        };
        let modifiers = convert_modifiers(ct.modifiers);
        KeyEvent { code, modifiers }
    }
}

/// Convert a crossterm mouse button to our `MouseBtn`.
fn convert_mouse_button(b: crossterm::event::MouseButton) -> MouseBtn {
    match b {
        crossterm::event::MouseButton::Left => MouseBtn::Left,
        crossterm::event::MouseButton::Right => MouseBtn::Right,
        crossterm::event::MouseButton::Middle => MouseBtn::Middle,
    }
}

impl From<crossterm::event::Event> for InputEvent {
    fn from(ct: crossterm::event::Event) -> Self {
        match ct {
            crossterm::event::Event::Key(ke) => InputEvent::Key(KeyEvent::from(ke)),
            crossterm::event::Event::Mouse(me) => {
                let modifiers = convert_modifiers(me.modifiers);
                let kind = match me.kind {
                    crossterm::event::MouseEventKind::Down(b) => {
                        MouseAction::Down(convert_mouse_button(b))
                    }
                    crossterm::event::MouseEventKind::Up(b) => {
                        MouseAction::Up(convert_mouse_button(b))
                    }
                    crossterm::event::MouseEventKind::Drag(b) => {
                        MouseAction::Drag(convert_mouse_button(b))
                    }
                    crossterm::event::MouseEventKind::Moved => MouseAction::Moved,
                    crossterm::event::MouseEventKind::ScrollUp => MouseAction::ScrollUp,
                    crossterm::event::MouseEventKind::ScrollDown => MouseAction::ScrollDown,
                    // Map any other scroll variants to ScrollDown.
                    _ => MouseAction::ScrollDown,
                };
                InputEvent::Mouse(MouseEvent {
                    kind,
                    x: me.column,
                    y: me.row,
                    modifiers,
                })
            }
            crossterm::event::Event::Resize(w, h) => InputEvent::Resize {
                width: w,
                height: h,
            },
            crossterm::event::Event::FocusGained => InputEvent::FocusGained,
            crossterm::event::Event::FocusLost => InputEvent::FocusLost,
            crossterm::event::Event::Paste(s) => InputEvent::Paste(s),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_none_is_empty() {
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn modifiers_single_flag() {
        assert!(Modifiers::CTRL.contains(Modifiers::CTRL));
        assert!(!Modifiers::CTRL.contains(Modifiers::SHIFT));
        assert!(!Modifiers::CTRL.is_empty());
    }

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
    }

    #[test]
    fn modifiers_bitand() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    // ── KeyEvent ─────────────────────────────────────────────────────

    #[test]
    fn key_event_plain() {
        let ke = KeyEvent::plain(Key::Enter);
        assert_eq!(ke.code, Key::Enter);
        assert!(ke.modifiers.is_empty());
    }

    #[test]
    fn key_event_is_ignores_modified_keys() {
        assert!(KeyEvent::plain(Key::Escape).is(Key::Escape));
        assert!(!KeyEvent::new(Key::Escape, Modifiers::CTRL).is(Key::Escape));
        assert!(!KeyEvent::plain(Key::Enter).is(Key::Escape));
    }

    // ── MouseEvent ───────────────────────────────────────────────────

    #[test]
    fn mouse_constructors() {
        assert!(MouseEvent::down(3, 4).is_press());
        assert!(MouseEvent::up(3, 4).is_release());
        assert_eq!(MouseEvent::moved(1, 2).kind, MouseAction::Moved);
        assert_eq!(
            MouseEvent::drag(1, 2).kind,
            MouseAction::Drag(MouseBtn::Left)
        );
    }

    #[test]
    fn mouse_position_as_offset() {
        let me = MouseEvent::down(10, 5);
        assert_eq!(me.position(), Offset::new(10, 5));
    }

    #[test]
    fn press_and_release_are_left_only() {
        let right = MouseEvent::new(MouseAction::Down(MouseBtn::Right), 0, 0);
        assert!(!right.is_press());
        assert!(!right.is_release());
    }

    // ── From<crossterm> conversions ──────────────────────────────────

    #[test]
    fn from_crossterm_key_char_with_ctrl() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('c'),
            crossterm::event::KeyModifiers::CONTROL,
        );
        let ke = KeyEvent::from(ct);
        assert_eq!(ke.code, Key::Char('c'));
        assert!(ke.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn from_crossterm_key_navigation() {
        for (ct_code, expected) in [
            (crossterm::event::KeyCode::Enter, Key::Enter),
            (crossterm::event::KeyCode::Esc, Key::Escape),
            (crossterm::event::KeyCode::Tab, Key::Tab),
            (crossterm::event::KeyCode::BackTab, Key::BackTab),
            (crossterm::event::KeyCode::Left, Key::Left),
            (crossterm::event::KeyCode::Right, Key::Right),
            (crossterm::event::KeyCode::Up, Key::Up),
            (crossterm::event::KeyCode::Down, Key::Down),
            (crossterm::event::KeyCode::Home, Key::Home),
            (crossterm::event::KeyCode::End, Key::End),
            (crossterm::event::KeyCode::PageUp, Key::PageUp),
            (crossterm::event::KeyCode::PageDown, Key::PageDown),
        ] {
            let ct = crossterm::event::KeyEvent::new(
                ct_code,
                crossterm::event::KeyModifiers::NONE,
            );
            assert_eq!(KeyEvent::from(ct).code, expected);
        }
    }

    #[test]
    fn from_crossterm_event_resize() {
        let ct = crossterm::event::Event::Resize(120, 40);
        assert_eq!(
            InputEvent::from(ct),
            InputEvent::Resize { width: 120, height: 40 }
        );
    }

    #[test]
    fn from_crossterm_event_paste() {
        let ct = crossterm::event::Event::Paste("apple".to_string());
        assert_eq!(InputEvent::from(ct), InputEvent::Paste("apple".to_string()));
    }

    #[test]
    fn mouse_event_from_crossterm() {
        let ct = crossterm::event::Event::Mouse(crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            column: 10,
            row: 5,
            modifiers: crossterm::event::KeyModifiers::NONE,
        });
        match InputEvent::from(ct) {
            InputEvent::Mouse(me) => {
                assert_eq!(me.kind, MouseAction::Down(MouseBtn::Left));
                assert_eq!(me.position(), Offset::new(10, 5));
            }
            other => panic!("expected Mouse event, got {other:?}"),
        }
    }

    #[test]
    fn mouse_scroll_from_crossterm() {
        let ct = crossterm::event::Event::Mouse(crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: crossterm::event::KeyModifiers::NONE,
        });
        match InputEvent::from(ct) {
            InputEvent::Mouse(me) => assert_eq!(me.kind, MouseAction::ScrollUp),
            other => panic!("expected Mouse event, got {other:?}"),
        }
    }
}
