//! Writing a schematic into a live region.

use std::fmt;
use std::str::FromStr;

use glam::{IVec3, U16Vec3};
use mapgen_voxel::{ContentId, MapNode, PROB_ALWAYS, PROB_NEVER, Rotation, VoxelArea, VoxelRegion};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PlaceError;
use crate::schematic::{ContentRemap, Schematic};

/// A fixed rotation, or one drawn per placed instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RotationSpec {
    Fixed(Rotation),
    Random,
}

impl Default for RotationSpec {
    fn default() -> Self {
        RotationSpec::Fixed(Rotation::R0)
    }
}

impl RotationSpec {
    /// Picks the concrete rotation for one instance.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Rotation {
        match self {
            RotationSpec::Fixed(r) => r,
            RotationSpec::Random => Rotation::from_quarter_turns(rng.random_range(0..4u8)),
        }
    }
}

/// Error for a rotation string that is not "0", "90", "180", "270" or "random".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rotation '{0}'")]
pub struct UnknownRotation(pub String);

impl FromStr for RotationSpec {
    type Err = UnknownRotation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("random") {
            return Ok(RotationSpec::Random);
        }
        Rotation::from_degrees_str(s)
            .map(RotationSpec::Fixed)
            .ok_or_else(|| UnknownRotation(s.to_string()))
    }
}

impl TryFrom<String> for RotationSpec {
    type Error = UnknownRotation;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RotationSpec> for String {
    fn from(spec: RotationSpec) -> String {
        spec.to_string()
    }
}

impl fmt::Display for RotationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationSpec::Fixed(r) => write!(f, "{}", r.degrees()),
            RotationSpec::Random => f.write_str("random"),
        }
    }
}

/// Counters from one placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaceStats {
    /// Cells written to the target.
    pub written: usize,
    /// Cells skipped by their own or their layer's probability.
    pub skipped_by_chance: usize,
    /// Cells skipped because the destination was occupied and not forced.
    pub skipped_occupied: usize,
}

/// Area a schematic of `size` covers at `origin` after `rotation`.
pub fn footprint(origin: IVec3, size: U16Vec3, rotation: Rotation) -> VoxelArea {
    VoxelArea::from_origin_size(origin, rotation.rotate_size(size))
}

/// Draws a 1..=255 roll against a probability byte.
fn passes<R: Rng + ?Sized>(prob: u8, rng: &mut R) -> bool {
    match prob {
        PROB_NEVER => false,
        PROB_ALWAYS => true,
        p => rng.random_range(1..=255u8) <= p,
    }
}

impl Schematic {
    /// Writes the schematic into `target` with its minimum corner at `origin`.
    ///
    /// Each layer first draws against its slice probability; a failed draw
    /// skips the whole layer. Each cell then draws against its own
    /// probability. Cells mapping to ignore are never written. Without
    /// `force`, cells whose destination is not air or ignore are left alone.
    /// Written cells get `param1 = 0` and a rotated `param2`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::OutOfBounds`] before writing anything if the
    /// rotated footprint does not fit inside `target`.
    pub fn place<R: Rng + ?Sized>(
        &self,
        target: &mut dyn VoxelRegion,
        origin: IVec3,
        rotation: Rotation,
        force: bool,
        remap: &ContentRemap,
        rng: &mut R,
    ) -> Result<PlaceStats, PlaceError> {
        let size = self.size();
        let area = footprint(origin, size, rotation);
        let region = target.area();
        if !region.contains_area(&area) {
            return Err(PlaceError::OutOfBounds {
                footprint: area,
                region,
            });
        }

        let mut stats = PlaceStats::default();
        let layer_len = size.x as usize * size.z as usize;

        for y in 0..size.y as i32 {
            if !passes(self.slice_probs()[y as usize], rng) {
                stats.skipped_by_chance += layer_len;
                continue;
            }
            for z in 0..size.z as i32 {
                for x in 0..size.x as i32 {
                    let local = IVec3::new(x, y, z);
                    let Some(node) = self.get(local) else {
                        continue;
                    };
                    let content = remap.id(node.content.0);
                    if content == ContentId::IGNORE {
                        continue;
                    }
                    if !passes(node.param1, rng) {
                        stats.skipped_by_chance += 1;
                        continue;
                    }

                    let dest = origin + rotation.rotate_local(local, size);
                    if !force && !target.get(dest).is_replaceable() {
                        stats.skipped_occupied += 1;
                        continue;
                    }

                    let param2 = rotation.rotate_param2(node.param2, remap.param2_kind(node.content.0));
                    target.set(dest, MapNode::with_params(content, 0, param2));
                    stats.written += 1;
                }
            }
        }

        tracing::debug!(
            "placed schematic at {} ({:?}): {} written, {} by chance, {} occupied",
            origin,
            rotation,
            stats.written,
            stats.skipped_by_chance,
            stats.skipped_occupied
        );
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
