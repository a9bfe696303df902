//! Axis-aligned inclusive voxel boxes.

use glam::{IVec3, U16Vec3};
use serde::{Deserialize, Serialize};

/// Returns `(min, max)` with every component ordered, so any two opposite
/// corners describe the same box.
pub fn sort_box_vertices(a: IVec3, b: IVec3) -> (IVec3, IVec3) {
    (a.min(b), a.max(b))
}

/// An inclusive box `[min_edge, max_edge]` of voxel positions.
///
/// Linear indices run X fastest, then Y, then Z, matching how live regions
/// store their nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelArea {
    pub min_edge: IVec3,
    pub max_edge: IVec3,
}

impl VoxelArea {
    /// Builds an area from two opposite corners in any order.
    pub fn new(a: IVec3, b: IVec3) -> Self {
        let (min_edge, max_edge) = sort_box_vertices(a, b);
        Self { min_edge, max_edge }
    }

    /// An area anchored at `origin` spanning `size` voxels per axis.
    ///
    /// `size` must be non-zero on every axis.
    pub fn from_origin_size(origin: IVec3, size: U16Vec3) -> Self {
        let ext = size.as_ivec3() - IVec3::ONE;
        Self {
            min_edge: origin,
            max_edge: origin + ext.max(IVec3::ZERO),
        }
    }

    /// Number of voxels along each axis.
    pub fn extent(&self) -> IVec3 {
        self.max_edge - self.min_edge + IVec3::ONE
    }

    /// Total number of voxels.
    pub fn volume(&self) -> usize {
        let e = self.extent();
        e.x as usize * e.y as usize * e.z as usize
    }

    pub fn contains(&self, pos: IVec3) -> bool {
        pos.cmpge(self.min_edge).all() && pos.cmple(self.max_edge).all()
    }

    /// `true` if `other` lies entirely inside `self`.
    pub fn contains_area(&self, other: &VoxelArea) -> bool {
        self.contains(other.min_edge) && self.contains(other.max_edge)
    }

    /// Linear index of `pos`, or `None` if it is outside the area.
    pub fn index(&self, pos: IVec3) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let e = self.extent();
        let rel = pos - self.min_edge;
        Some(rel.x as usize + rel.y as usize * e.x as usize + rel.z as usize * (e.x * e.y) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_box_vertices_orders_each_axis() {
        let (lo, hi) = sort_box_vertices(IVec3::new(5, -2, 3), IVec3::new(1, 4, 3));
        assert_eq!(lo, IVec3::new(1, -2, 3));
        assert_eq!(hi, IVec3::new(5, 4, 3));
    }

    #[test]
    fn test_extent_and_volume_inclusive() {
        let area = VoxelArea::new(IVec3::ZERO, IVec3::new(1, 2, 3));
        assert_eq!(area.extent(), IVec3::new(2, 3, 4));
        assert_eq!(area.volume(), 24);
    }

    #[test]
    fn test_index_x_fastest_then_y_then_z() {
        let area = VoxelArea::new(IVec3::new(10, 10, 10), IVec3::new(12, 11, 11));
        assert_eq!(area.index(IVec3::new(10, 10, 10)), Some(0));
        assert_eq!(area.index(IVec3::new(11, 10, 10)), Some(1));
        assert_eq!(area.index(IVec3::new(10, 11, 10)), Some(3));
        assert_eq!(area.index(IVec3::new(10, 10, 11)), Some(6));
        assert_eq!(area.index(IVec3::new(13, 10, 10)), None);
    }

    #[test]
    fn test_contains_area() {
        let outer = VoxelArea::from_origin_size(IVec3::ZERO, U16Vec3::new(4, 4, 4));
        let inner = VoxelArea::new(IVec3::ONE, IVec3::new(3, 3, 3));
        let poking = VoxelArea::new(IVec3::ONE, IVec3::new(4, 3, 3));
        assert!(outer.contains_area(&inner));
        assert!(!outer.contains_area(&poking));
    }
}
