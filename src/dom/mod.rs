//! Element tree: slotmap-backed arena with class/id/data queries and a
//! host-assigned region map for pointer hit-testing.

pub mod node;
pub mod query;
pub mod region;
pub mod tree;

pub use node::{DataMap, NodeData, NodeId};
pub use region::RegionMap;
pub use tree::Dom;
