//! Bounds-checked access to a rectangular region of live voxel data.
//!
//! The storage engine is external; schematic capture and placement talk to
//! it through [`VoxelRegion`]. [`VoxelManip`] is a plain in-memory buffer
//! implementing the trait, used by tools and tests.

use glam::IVec3;

use crate::area::VoxelArea;
use crate::node::MapNode;

/// Read/write access to a loaded box of voxels.
///
/// Out-of-area reads return [`MapNode::IGNORE`]; out-of-area writes are
/// dropped. Both log a warning.
pub trait VoxelRegion {
    /// The box this region covers.
    fn area(&self) -> VoxelArea;

    fn get(&self, pos: IVec3) -> MapNode;

    fn set(&mut self, pos: IVec3, node: MapNode);
}

/// A dense in-memory region. Nodes are stored X fastest, then Y, then Z.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelManip {
    area: VoxelArea,
    nodes: Vec<MapNode>,
    /// Number of successful `set` calls.
    version: u64,
}

impl VoxelManip {
    /// Creates a region over `area` filled with `fill`.
    pub fn new_filled(area: VoxelArea, fill: MapNode) -> Self {
        Self {
            area,
            nodes: vec![fill; area.volume()],
            version: 0,
        }
    }

    /// Creates a region over `area` filled with air.
    pub fn new(area: VoxelArea) -> Self {
        Self::new_filled(area, MapNode::AIR)
    }

    /// Raw node buffer in storage order.
    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    /// Returns the number of writes applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl VoxelRegion for VoxelManip {
    fn area(&self) -> VoxelArea {
        self.area
    }

    fn get(&self, pos: IVec3) -> MapNode {
        match self.area.index(pos) {
            Some(i) => self.nodes[i],
            None => {
                tracing::warn!("VoxelManip::get out of bounds: {}", pos);
                MapNode::IGNORE
            }
        }
    }

    fn set(&mut self, pos: IVec3, node: MapNode) {
        match self.area.index(pos) {
            Some(i) => {
                self.nodes[i] = node;
                self.version += 1;
            }
            None => tracing::warn!("VoxelManip::set out of bounds: {}", pos),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
