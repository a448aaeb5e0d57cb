//! Host-assigned node regions and pointer hit-testing.
//!
//! The toolkit does no layout of its own: whoever draws the tree (an
//! application, or the pilot in tests) records where each node landed.
//! Hit-testing walks a subtree in painter's order (depth-first, later nodes
//! in front), so an item inside a surface wins over the surface itself.

use slotmap::SecondaryMap;

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::geometry::Region;

/// Per-node screen regions.
///
/// Only nodes that are shown (visible along their whole ancestor chain) and
/// have a non-zero region participate in hit-testing.
#[derive(Default)]
pub struct RegionMap {
    regions: SecondaryMap<NodeId, Region>,
}

impl RegionMap {
    /// Create an empty region map.
    pub fn new() -> Self {
        Self {
            regions: SecondaryMap::new(),
        }
    }

    /// Record where a node was placed.
    pub fn set(&mut self, id: NodeId, region: Region) {
        self.regions.insert(id, region);
    }

    /// The recorded region for a node, if any.
    pub fn get(&self, id: NodeId) -> Option<Region> {
        self.regions.get(id).copied()
    }

    /// Forget a node's region. No-op if absent.
    pub fn remove(&mut self, id: NodeId) {
        self.regions.remove(id);
    }

    /// Forget the regions of an entire subtree.
    pub fn remove_subtree(&mut self, dom: &Dom, root: NodeId) {
        for id in dom.walk_depth_first(root) {
            self.regions.remove(id);
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Number of recorded regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no regions are recorded.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The frontmost shown node at `(x, y)` within the subtree rooted at
    /// `root`, or `None` if the point misses everything.
    ///
    /// Painter's order: the last hit in depth-first order is frontmost.
    pub fn hit_in(&self, dom: &Dom, root: NodeId, x: i32, y: i32) -> Option<NodeId> {
        let mut front = None;
        for id in dom.walk_depth_first(root) {
            if !dom.is_shown(id) {
                continue;
            }
            if let Some(region) = self.regions.get(id) {
                if region.contains(x, y) {
                    front = Some(id);
                }
            }
        }
        front
    }

    /// Whether `(x, y)` lands on any shown node of the subtree.
    pub fn contains_point(&self, dom: &Dom, root: NodeId, x: i32, y: i32) -> bool {
        self.hit_in(dom, root, x, y).is_some()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
