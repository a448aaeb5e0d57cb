//! Floating placement: anchoring a content region to a trigger region.
//!
//! [`resolve`] is pure geometry and always produces a region, flipping to
//! the opposite side or sliding along the cross axis only when the config
//! asks for collision handling. [`Positioner`] binds the result to live
//! tree nodes: it writes the region into the region map and the resolved
//! side and align onto the content node as data markers.

use tracing::trace;

use crate::dom::{Dom, NodeId, RegionMap};
use crate::geometry::{Region, Size};

// ---------------------------------------------------------------------------
// Side / Align / Placement
// ---------------------------------------------------------------------------

/// Which edge of the anchor the content attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// The opposite edge, used when flipping.
    pub const fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Whether the content extends horizontally from the anchor.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Cross-axis alignment against the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    Start,
    Center,
    End,
}

impl Align {
    pub const fn as_str(self) -> &'static str {
        match self {
            Align::Start => "start",
            Align::Center => "center",
            Align::End => "end",
        }
    }
}

/// Requested side and alignment, e.g. bottom-start for a dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub side: Side,
    pub align: Align,
}

impl Placement {
    pub const TOP_START: Placement = Placement::new(Side::Top, Align::Start);
    pub const TOP_CENTER: Placement = Placement::new(Side::Top, Align::Center);
    pub const TOP_END: Placement = Placement::new(Side::Top, Align::End);
    pub const BOTTOM_START: Placement = Placement::new(Side::Bottom, Align::Start);
    pub const BOTTOM_CENTER: Placement = Placement::new(Side::Bottom, Align::Center);
    pub const BOTTOM_END: Placement = Placement::new(Side::Bottom, Align::End);
    pub const LEFT_START: Placement = Placement::new(Side::Left, Align::Start);
    pub const LEFT_CENTER: Placement = Placement::new(Side::Left, Align::Center);
    pub const LEFT_END: Placement = Placement::new(Side::Left, Align::End);
    pub const RIGHT_START: Placement = Placement::new(Side::Right, Align::Start);
    pub const RIGHT_CENTER: Placement = Placement::new(Side::Right, Align::Center);
    pub const RIGHT_END: Placement = Placement::new(Side::Right, Align::End);

    pub const fn new(side: Side, align: Align) -> Self {
        Self { side, align }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Placement::BOTTOM_START
    }
}

// ---------------------------------------------------------------------------
// PositionConfig
// ---------------------------------------------------------------------------

/// Placement request with collision handling switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionConfig {
    pub placement: Placement,
    /// Gap between the anchor edge and the content, in cells.
    pub offset: i32,
    /// Flip to the opposite side when the requested side overflows the
    /// viewport and the opposite side has more room.
    pub flip: bool,
    /// Slide along the cross axis to stay inside the viewport.
    pub shift: bool,
}

impl PositionConfig {
    pub fn new(placement: Placement) -> Self {
        Self { placement, ..Self::default() }
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    pub fn flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    pub fn shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            offset: 0,
            flip: true,
            shift: true,
        }
    }
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

/// Outcome of a placement: the region plus the side and align that were
/// actually used after collision handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub region: Region,
    pub side: Side,
    pub align: Align,
}

/// Room between the anchor and the viewport edge on the given side, after
/// reserving the offset gap.
fn available(anchor: Region, viewport: Region, side: Side, offset: i32) -> i32 {
    match side {
        Side::Top => anchor.y - viewport.y - offset,
        Side::Bottom => viewport.bottom() - anchor.bottom() - offset,
        Side::Left => anchor.x - viewport.x - offset,
        Side::Right => viewport.right() - anchor.right() - offset,
    }
}

/// Lay the content against one anchor edge without collision handling.
fn place(anchor: Region, content: Size, side: Side, align: Align, offset: i32) -> Region {
    let (x, y) = if side.is_horizontal() {
        let x = match side {
            Side::Left => anchor.x - offset - content.width,
            _ => anchor.right() + offset,
        };
        let y = match align {
            Align::Start => anchor.y,
            Align::Center => anchor.y + (anchor.height - content.height) / 2,
            Align::End => anchor.bottom() - content.height,
        };
        (x, y)
    } else {
        let y = match side {
            Side::Top => anchor.y - offset - content.height,
            _ => anchor.bottom() + offset,
        };
        let x = match align {
            Align::Start => anchor.x,
            Align::Center => anchor.x + (anchor.width - content.width) / 2,
            Align::End => anchor.right() - content.width,
        };
        (x, y)
    };
    Region::new(x, y, content.width, content.height)
}

/// Resolve a floating region for `content` anchored to `anchor` inside
/// `viewport`. Always succeeds; when nothing fits the region is best
/// effort and may overflow on the main axis.
pub fn resolve(
    anchor: Region,
    content: Size,
    viewport: Region,
    config: &PositionConfig,
) -> Resolved {
    let mut side = config.placement.side;
    let align = config.placement.align;

    if config.flip {
        let main = if side.is_horizontal() { content.width } else { content.height };
        let room = available(anchor, viewport, side, config.offset);
        if main > room {
            let opposite = side.opposite();
            if available(anchor, viewport, opposite, config.offset) > room {
                side = opposite;
            }
        }
    }

    let mut region = place(anchor, content, side, align, config.offset);
    if config.shift {
        region = if side.is_horizontal() {
            region.clamp_y(viewport)
        } else {
            region.clamp_x(viewport)
        };
    }

    Resolved { region, side, align }
}

// ---------------------------------------------------------------------------
// Positioner
// ---------------------------------------------------------------------------

/// Live binding between an anchor node and a floating content node.
///
/// The runtime keeps one of these per started placement and re-applies it
/// on viewport resizes and scroll events until stopped.
#[derive(Debug, Clone)]
pub struct Positioner {
    anchor: NodeId,
    content: NodeId,
    content_size: Size,
    config: PositionConfig,
}

impl Positioner {
    pub fn new(anchor: NodeId, content: NodeId, content_size: Size, config: PositionConfig) -> Self {
        Self { anchor, content, content_size, config }
    }

    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    pub fn content(&self) -> NodeId {
        self.content
    }

    /// Replace the measured content size before the next apply.
    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    /// Compute the placement and write it into the tree: region into the
    /// region map, resolved side and align onto the content node as data
    /// markers. Returns `None` when either node is gone or the anchor has
    /// no region yet; stale bindings are silent no-ops.
    pub fn apply(
        &self,
        dom: &mut Dom,
        regions: &mut RegionMap,
        viewport: Region,
    ) -> Option<Resolved> {
        if !dom.contains(self.anchor) || !dom.contains(self.content) {
            return None;
        }
        let anchor = regions.get(self.anchor)?;
        let resolved = resolve(anchor, self.content_size, viewport, &self.config);
        regions.set(self.content, resolved.region);
        dom.set_data(self.content, "side", resolved.side.as_str());
        dom.set_data(self.content, "align", resolved.align.as_str());
        trace!(
            side = resolved.side.as_str(),
            align = resolved.align.as_str(),
            x = resolved.region.x,
            y = resolved.region.y,
            "positioned floating content"
        );
        Some(resolved)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
