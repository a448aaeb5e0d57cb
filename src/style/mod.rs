//! Class and attribute construction.
//!
//! Components describe their appearance as plain data: an ordered,
//! duplicate-free class list with utility-group merging, and an
//! insertion-ordered attribute map. Both are produced by small pure
//! functions over explicit config values; hosts consume them when drawing.

pub mod attrs;
pub mod classes;

pub use attrs::{part_attrs, part_classes, AttrMap, Appearance, ControlSize, Variant};
pub use classes::ClassList;
