//! Input events, decoupled from the terminal backend.

pub mod input;

pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
