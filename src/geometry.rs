//! Core geometry types: Offset, Size, Region.
//!
//! Cell-coordinate primitives used for anchored placement, viewport collision
//! handling, and pointer hit-testing. The toolkit does no general layout;
//! regions are assigned by the host and consumed by these types.

use std::ops::{Add, Neg, Sub};

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// A 2D position or displacement in terminal cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    /// Create a new offset.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Offset;
    #[inline]
    fn add(self, rhs: Offset) -> Offset {
        Offset { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Offset {
    type Output = Offset;
    #[inline]
    fn sub(self, rhs: Offset) -> Offset {
        Offset { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Offset {
    type Output = Offset;
    #[inline]
    fn neg(self) -> Offset {
        Offset { x: -self.x, y: -self.y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D size in terminal cells (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0, height: 0 };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Whether the point (x, y) is inside `0..width` and `0..height`.
    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Convert to a [`Region`] positioned at the origin.
    #[inline]
    pub const fn to_region(self) -> Region {
        Region { x: 0, y: 0, width: self.width, height: self.height }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A rectangular region in terminal cells defined by position and size.
///
/// The most heavily-used geometry type: anchors, floating surfaces, and the
/// viewport are all regions. Edges are exclusive, so a region never contains
/// its own `right()`/`bottom()` coordinates and zero-size regions contain
/// nothing at all.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// An empty region at the origin.
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    /// Create a new region.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// The top-left corner as an [`Offset`].
    #[inline]
    pub const fn offset(self) -> Offset {
        Offset { x: self.x, y: self.y }
    }

    /// The dimensions as a [`Size`].
    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Whether the point (x, y) lies inside this region.
    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` is entirely contained within this region.
    #[inline]
    pub const fn contains_region(self, other: Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether `other` overlaps this region (non-zero intersection area).
    #[inline]
    pub const fn overlaps(self, other: Region) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Translate the region by an [`Offset`].
    #[inline]
    pub const fn translate(self, offset: Offset) -> Region {
        Region { x: self.x + offset.x, y: self.y + offset.y, width: self.width, height: self.height }
    }

    /// Slide the region horizontally until it lies within `bounds`, keeping
    /// its size. If it is wider than `bounds` it is pinned to the left edge.
    #[inline]
    pub const fn clamp_x(self, bounds: Region) -> Region {
        let max_x = bounds.right() - self.width;
        let x = if self.x > max_x { max_x } else { self.x };
        let x = if x < bounds.x { bounds.x } else { x };
        Region { x, y: self.y, width: self.width, height: self.height }
    }

    /// Slide the region vertically until it lies within `bounds`, keeping
    /// its size. If it is taller than `bounds` it is pinned to the top edge.
    #[inline]
    pub const fn clamp_y(self, bounds: Region) -> Region {
        let max_y = bounds.bottom() - self.height;
        let y = if self.y > max_y { max_y } else { self.y };
        let y = if y < bounds.y { bounds.y } else { y };
        Region { x: self.x, y, width: self.width, height: self.height }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Offset
    // -----------------------------------------------------------------------

    #[test]
    fn offset_new_and_default() {
        assert_eq!(Offset::new(3, -7), Offset { x: 3, y: -7 });
        assert_eq!(Offset::default(), Offset { x: 0, y: 0 });
    }

    #[test]
    fn offset_add_sub() {
        let a = Offset::new(1, 2);
        let b = Offset::new(3, 4);
        assert_eq!(a + b, Offset::new(4, 6));
        assert_eq!(b - a, Offset::new(2, 2));
    }

    #[test]
    fn offset_neg() {
        assert_eq!(-Offset::new(5, -3), Offset::new(-5, 3));
    }

    // -----------------------------------------------------------------------
    // Size
    // -----------------------------------------------------------------------

    #[test]
    fn size_new_and_constants() {
        assert_eq!(Size::new(80, 24), Size { width: 80, height: 24 });
        assert_eq!(Size::ZERO, Size { width: 0, height: 0 });
        assert_eq!(Size::default(), Size::ZERO);
    }

    #[test]
    fn size_contains() {
        let s = Size::new(10, 5);
        assert!(s.contains(0, 0));
        assert!(s.contains(9, 4));
        assert!(!s.contains(10, 0));
        assert!(!s.contains(0, 5));
        assert!(!s.contains(-1, 0));
    }

    #[test]
    fn size_to_region() {
        assert_eq!(Size::new(80, 24).to_region(), Region::new(0, 0, 80, 24));
    }

    // -----------------------------------------------------------------------
    // Region — basic properties
    // -----------------------------------------------------------------------

    #[test]
    fn region_new_and_empty() {
        let r = Region::new(1, 2, 3, 4);
        assert_eq!(r.x, 1);
        assert_eq!(r.y, 2);
        assert_eq!(r.width, 3);
        assert_eq!(r.height, 4);
        assert_eq!(Region::EMPTY, Region::new(0, 0, 0, 0));
        assert_eq!(Region::default(), Region::EMPTY);
    }

    #[test]
    fn region_right_bottom() {
        let r = Region::new(5, 10, 20, 30);
        assert_eq!(r.right(), 25);
        assert_eq!(r.bottom(), 40);
    }

    #[test]
    fn region_offset_size() {
        let r = Region::new(5, 10, 20, 30);
        assert_eq!(r.offset(), Offset::new(5, 10));
        assert_eq!(r.size(), Size::new(20, 30));
    }

    // -----------------------------------------------------------------------
    // Region — containment & overlap
    // -----------------------------------------------------------------------

    #[test]
    fn region_contains_point() {
        let r = Region::new(5, 5, 10, 10);
        assert!(r.contains(5, 5));
        assert!(r.contains(14, 14));
        assert!(!r.contains(15, 5));
        assert!(!r.contains(5, 15));
        assert!(!r.contains(4, 5));
    }

    #[test]
    fn region_zero_size_contains_nothing() {
        let r = Region::new(5, 5, 0, 0);
        assert!(!r.contains(5, 5));
    }

    #[test]
    fn region_contains_region() {
        let outer = Region::new(0, 0, 100, 100);
        let inner = Region::new(10, 10, 20, 20);
        assert!(outer.contains_region(inner));
        assert!(!inner.contains_region(outer));
        assert!(outer.contains_region(outer)); // self-containment
    }

    #[test]
    fn region_overlaps() {
        let a = Region::new(0, 0, 10, 10);
        let b = Region::new(5, 5, 10, 10);
        assert!(a.overlaps(b));
        assert!(b.overlaps(a));

        // Adjacent but not overlapping.
        let c = Region::new(10, 0, 10, 10);
        assert!(!a.overlaps(c));
    }

    // -----------------------------------------------------------------------
    // Region — translate & clamp
    // -----------------------------------------------------------------------

    #[test]
    fn region_translate() {
        let r = Region::new(5, 10, 20, 30);
        let moved = r.translate(Offset::new(-5, 3));
        assert_eq!(moved, Region::new(0, 13, 20, 30));
    }

    #[test]
    fn region_clamp_x_right_overflow() {
        let bounds = Region::new(0, 0, 80, 24);
        let r = Region::new(75, 5, 10, 4);
        assert_eq!(r.clamp_x(bounds), Region::new(70, 5, 10, 4));
    }

    #[test]
    fn region_clamp_x_left_overflow() {
        let bounds = Region::new(0, 0, 80, 24);
        let r = Region::new(-3, 5, 10, 4);
        assert_eq!(r.clamp_x(bounds), Region::new(0, 5, 10, 4));
    }

    #[test]
    fn region_clamp_x_inside_is_identity() {
        let bounds = Region::new(0, 0, 80, 24);
        let r = Region::new(30, 5, 10, 4);
        assert_eq!(r.clamp_x(bounds), r);
    }

    #[test]
    fn region_clamp_x_wider_than_bounds_pins_left() {
        let bounds = Region::new(10, 0, 20, 24);
        let r = Region::new(0, 5, 50, 4);
        assert_eq!(r.clamp_x(bounds).x, 10);
    }

    #[test]
    fn region_clamp_y_bottom_overflow() {
        let bounds = Region::new(0, 0, 80, 24);
        let r = Region::new(5, 20, 10, 8);
        assert_eq!(r.clamp_y(bounds), Region::new(5, 16, 10, 8));
    }

    #[test]
    fn region_clamp_y_top_overflow() {
        let bounds = Region::new(0, 0, 80, 24);
        let r = Region::new(5, -2, 10, 8);
        assert_eq!(r.clamp_y(bounds), Region::new(5, 0, 10, 8));
    }

    // -----------------------------------------------------------------------
    // Trait derivation smoke tests
    // -----------------------------------------------------------------------

    #[test]
    fn types_are_copy() {
        let o = Offset::new(1, 2);
        let o2 = o; // Copy
        assert_eq!(o, o2);

        let r = Region::new(1, 2, 3, 4);
        let r2 = r;
        assert_eq!(r, r2);
    }

    #[test]
    fn types_implement_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Region::new(0, 0, 10, 10));
        set.insert(Region::new(0, 0, 10, 10));
        assert_eq!(set.len(), 1);
    }
}
