//! A single voxel cell and the quarter-turn rotations applied to it.

use glam::{IVec3, U16Vec3};
use serde::{Deserialize, Serialize};

use crate::content::{ContentId, Param2Kind};

/// Probability byte meaning "always place".
pub const PROB_ALWAYS: u8 = 255;
/// Probability byte meaning "never place".
pub const PROB_NEVER: u8 = 0;

/// One voxel cell: content id plus two auxiliary bytes.
///
/// Inside a schematic `param1` carries the placement probability. Inside a
/// live region it is light data and placement always writes 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapNode {
    pub content: ContentId,
    pub param1: u8,
    pub param2: u8,
}

impl MapNode {
    pub const AIR: MapNode = MapNode::new(ContentId::AIR);
    pub const IGNORE: MapNode = MapNode::new(ContentId::IGNORE);

    /// A node with both auxiliary bytes zeroed.
    pub const fn new(content: ContentId) -> Self {
        Self {
            content,
            param1: 0,
            param2: 0,
        }
    }

    pub const fn with_params(content: ContentId, param1: u8, param2: u8) -> Self {
        Self {
            content,
            param1,
            param2,
        }
    }

    /// `true` for air and ignore, the two contents placement may replace
    /// without `force`.
    pub fn is_replaceable(&self) -> bool {
        self.content == ContentId::AIR || self.content == ContentId::IGNORE
    }
}

impl Default for MapNode {
    fn default() -> Self {
        Self::AIR
    }
}

/// Clockwise quarter turns around the +Y axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Number of clockwise quarter turns (0..=3).
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// Builds a rotation from a number of quarter turns, wrapping modulo 4.
    pub fn from_quarter_turns(turns: u8) -> Self {
        Self::ALL[(turns % 4) as usize]
    }

    /// Parses "0", "90", "180" or "270". Anything else is `None`.
    pub fn from_degrees_str(s: &str) -> Option<Self> {
        match s.trim() {
            "0" => Some(Rotation::R0),
            "90" => Some(Rotation::R90),
            "180" => Some(Rotation::R180),
            "270" => Some(Rotation::R270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    /// Rotation that composes `self` then `other`.
    pub fn then(self, other: Rotation) -> Rotation {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// Extent of a box of `size` after this rotation. X and Z swap for 90/270.
    pub fn rotate_size(self, size: U16Vec3) -> U16Vec3 {
        match self {
            Rotation::R0 | Rotation::R180 => size,
            Rotation::R90 | Rotation::R270 => U16Vec3::new(size.z, size.y, size.x),
        }
    }

    /// Maps a local position inside a box of `size` (pre-rotation extent) to
    /// its position inside the rotated box.
    pub fn rotate_local(self, pos: IVec3, size: U16Vec3) -> IVec3 {
        let sx = size.x as i32;
        let sz = size.z as i32;
        match self {
            Rotation::R0 => pos,
            Rotation::R90 => IVec3::new(pos.z, pos.y, sx - 1 - pos.x),
            Rotation::R180 => IVec3::new(sx - 1 - pos.x, pos.y, sz - 1 - pos.z),
            Rotation::R270 => IVec3::new(sz - 1 - pos.z, pos.y, pos.x),
        }
    }

    /// Rotates an orientation byte according to how the node interprets it.
    pub fn rotate_param2(self, param2: u8, kind: Param2Kind) -> u8 {
        let turns = self.quarter_turns();
        match kind {
            Param2Kind::None => param2,
            Param2Kind::FaceDir => (param2 & !3) | ((param2.wrapping_add(turns)) & 3),
            Param2Kind::WallMounted => {
                let mut dir = param2 & 7;
                for _ in 0..turns {
                    dir = match dir {
                        2 => 5,
                        3 => 4,
                        4 => 2,
                        5 => 3,
                        other => other,
                    };
                }
                (param2 & !7) | dir
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_node_is_air() {
        assert_eq!(MapNode::default(), MapNode::AIR);
        assert!(MapNode::AIR.is_replaceable());
        assert!(MapNode::IGNORE.is_replaceable());
        assert!(!MapNode::new(ContentId(5)).is_replaceable());
    }

    #[test]
    fn test_rotate_size_swaps_xz_on_quarter_turns() {
        let size = U16Vec3::new(3, 4, 5);
        assert_eq!(Rotation::R0.rotate_size(size), size);
        assert_eq!(Rotation::R180.rotate_size(size), size);
        assert_eq!(Rotation::R90.rotate_size(size), U16Vec3::new(5, 4, 3));
        assert_eq!(Rotation::R270.rotate_size(size), U16Vec3::new(5, 4, 3));
    }

    #[test]
    fn test_rotate_local_stays_inside_rotated_box() {
        let size = U16Vec3::new(3, 2, 5);
        for rot in Rotation::ALL {
            let rs = rot.rotate_size(size);
            for z in 0..5 {
                for x in 0..3 {
                    let p = rot.rotate_local(IVec3::new(x, 1, z), size);
                    assert!(p.x >= 0 && p.x < rs.x as i32, "{rot:?} x out of range");
                    assert!(p.z >= 0 && p.z < rs.z as i32, "{rot:?} z out of range");
                    assert_eq!(p.y, 1);
                }
            }
        }
    }

    #[test]
    fn test_four_quarter_turns_restore_position() {
        let mut size = U16Vec3::new(4, 1, 7);
        let start = IVec3::new(1, 0, 5);
        let mut p = start;
        for _ in 0..4 {
            p = Rotation::R90.rotate_local(p, size);
            size = Rotation::R90.rotate_size(size);
        }
        assert_eq!(p, start);
    }

    #[test]
    fn test_facedir_keeps_upper_bits() {
        let p2 = 0b1010_0011;
        let rotated = Rotation::R90.rotate_param2(p2, Param2Kind::FaceDir);
        assert_eq!(rotated & !3, p2 & !3);
        assert_eq!(rotated & 3, 0);
    }

    #[test]
    fn test_wallmounted_cycle_and_vertical_fixed() {
        assert_eq!(Rotation::R90.rotate_param2(2, Param2Kind::WallMounted), 5);
        assert_eq!(Rotation::R180.rotate_param2(2, Param2Kind::WallMounted), 3);
        assert_eq!(Rotation::R0.rotate_param2(4, Param2Kind::WallMounted), 4);
        assert_eq!(Rotation::R270.rotate_param2(0, Param2Kind::WallMounted), 0);
        assert_eq!(Rotation::R90.rotate_param2(1, Param2Kind::WallMounted), 1);
    }

    #[test]
    fn test_param2_none_untouched() {
        assert_eq!(Rotation::R270.rotate_param2(77, Param2Kind::None), 77);
    }

    #[test]
    fn test_rotation_parse_and_compose() {
        assert_eq!(Rotation::from_degrees_str("90"), Some(Rotation::R90));
        assert_eq!(Rotation::from_degrees_str(" 270 "), Some(Rotation::R270));
        assert_eq!(Rotation::from_degrees_str("45"), None);
        assert_eq!(Rotation::R270.then(Rotation::R180), Rotation::R90);
        assert_eq!(Rotation::R180.degrees(), 180);
    }
}
