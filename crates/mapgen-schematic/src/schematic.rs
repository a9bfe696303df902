//! In-memory schematic grid.
//!
//! Cells are stored X fastest, then Z, then Y, so one horizontal layer is a
//! contiguous run of `X * Z` cells. A cell's `content` field holds a code into
//! the schematic's own name table rather than a session content id; the
//! table is mapped to real ids through a [`ContentRemap`] at placement time.
//! `param1` is the placement probability.

use std::collections::BTreeMap;

use glam::{IVec3, U16Vec3};
use mapgen_voxel::{
    ContentId, ContentTable, MapNode, NodeResolver, NodeSlot, PROB_ALWAYS, Param2Kind, Rotation,
    VoxelArea, VoxelRegion,
};
use rustc_hash::FxHashMap;

use crate::error::SchematicError;

/// A rectangular voxel blueprint with per-cell and per-layer probabilities.
#[derive(Clone, Debug)]
pub struct Schematic {
    size: U16Vec3,
    nodes: Vec<MapNode>,
    slice_probs: Vec<u8>,
    node_names: Vec<String>,
    /// Filled by [`request_content_ids`](Self::request_content_ids).
    resolved: Option<Vec<NodeSlot>>,
}

impl PartialEq for Schematic {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.nodes == other.nodes
            && self.slice_probs == other.slice_probs
            && self.node_names == other.node_names
    }
}

impl Default for Schematic {
    /// A 1x1x1 schematic holding a single ignore cell, which placement never writes.
    fn default() -> Self {
        Self {
            size: U16Vec3::ONE,
            nodes: vec![MapNode::with_params(ContentId(0), PROB_ALWAYS, 0)],
            slice_probs: vec![PROB_ALWAYS],
            node_names: vec!["ignore".to_string()],
            resolved: None,
        }
    }
}

impl Schematic {
    /// Builds a schematic from raw parts.
    ///
    /// # Errors
    ///
    /// Fails if a dimension is zero, `nodes` does not hold exactly
    /// `X * Y * Z` cells, `slice_probs` does not hold `Y` entries, or a cell
    /// references a code outside `node_names`.
    pub fn new(
        size: U16Vec3,
        node_names: Vec<String>,
        nodes: Vec<MapNode>,
        slice_probs: Vec<u8>,
    ) -> Result<Self, SchematicError> {
        if size.x == 0 || size.y == 0 || size.z == 0 {
            return Err(SchematicError::InvalidSize {
                x: size.x as i64,
                y: size.y as i64,
                z: size.z as i64,
            });
        }
        let volume = volume_of(size);
        if nodes.len() != volume {
            return Err(SchematicError::DataLength {
                expected: volume,
                actual: nodes.len(),
            });
        }
        if slice_probs.len() != size.y as usize {
            return Err(SchematicError::DataLength {
                expected: size.y as usize,
                actual: slice_probs.len(),
            });
        }
        if let Some(bad) = nodes
            .iter()
            .find(|n| n.content.0 as usize >= node_names.len())
        {
            return Err(SchematicError::InvalidNodeCode {
                code: bad.content.0,
                names: node_names.len(),
            });
        }

        Ok(Self {
            size,
            nodes,
            slice_probs,
            node_names,
            resolved: None,
        })
    }

    /// Captures the inclusive box between `p1` and `p2` (any corner order)
    /// from a live region. Every cell and layer gets probability "always".
    ///
    /// Cells whose content id is unknown to `table` are stored as `ignore`.
    ///
    /// # Errors
    ///
    /// Returns [`SchematicError::InvalidSize`] if the box does not fit in 16
    /// bits per axis.
    pub fn from_region(
        region: &dyn VoxelRegion,
        table: &dyn ContentTable,
        p1: IVec3,
        p2: IVec3,
    ) -> Result<Self, SchematicError> {
        let area = VoxelArea::new(p1, p2);
        let ext = area.extent();
        if ext.cmpgt(IVec3::splat(u16::MAX as i32)).any() {
            return Err(SchematicError::InvalidSize {
                x: ext.x as i64,
                y: ext.y as i64,
                z: ext.z as i64,
            });
        }
        let size = ext.as_u16vec3();

        let mut names = NameTable::default();
        let mut nodes = Vec::with_capacity(volume_of(size));
        for y in 0..ext.y {
            for z in 0..ext.z {
                for x in 0..ext.x {
                    let node = region.get(area.min_edge + IVec3::new(x, y, z));
                    let name = table.name_of(node.content).unwrap_or("ignore");
                    let code = names.code_for(name)?;
                    nodes.push(MapNode::with_params(ContentId(code), PROB_ALWAYS, node.param2));
                }
            }
        }

        tracing::debug!(
            "captured {}x{}x{} schematic with {} distinct nodes",
            size.x,
            size.y,
            size.z,
            names.names.len()
        );

        Self::new(
            size,
            names.names,
            nodes,
            vec![PROB_ALWAYS; size.y as usize],
        )
    }

    // -- Accessors -----------------------------------------------------------

    pub fn size(&self) -> U16Vec3 {
        self.size
    }

    pub fn volume(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_names(&self) -> &[String] {
        &self.node_names
    }

    /// Cells in storage order, with name-table codes as content.
    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    pub fn slice_probs(&self) -> &[u8] {
        &self.slice_probs
    }

    /// Storage index of a local position (X fastest, then Z, then Y).
    pub fn index(&self, pos: IVec3) -> Option<usize> {
        let s = self.size.as_ivec3();
        if pos.cmplt(IVec3::ZERO).any() || pos.cmpge(s).any() {
            return None;
        }
        Some((pos.x + pos.z * s.x + pos.y * s.x * s.z) as usize)
    }

    /// The cell at a local position.
    pub fn get(&self, pos: IVec3) -> Option<MapNode> {
        self.index(pos).map(|i| self.nodes[i])
    }

    /// Name of the node stored at a local position.
    pub fn name_at(&self, pos: IVec3) -> Option<&str> {
        self.get(pos)
            .and_then(|n| self.node_names.get(n.content.0 as usize))
            .map(String::as_str)
    }

    /// `true` once content ids have been requested from a resolver.
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    // -- Authoring -------------------------------------------------------------

    /// Overrides probabilities after a capture. Point positions and slice
    /// Y levels are in world coordinates relative to `origin`, the capture's
    /// minimum corner. Entries outside the grid are ignored.
    pub fn apply_probabilities(&mut self, origin: IVec3, points: &[(IVec3, u8)], slices: &[(i32, u8)]) {
        for &(pos, prob) in points {
            match self.index(pos - origin) {
                Some(i) => self.nodes[i].param1 = prob,
                None => tracing::debug!("probability point {} outside schematic", pos),
            }
        }
        for &(ypos, prob) in slices {
            let y = ypos - origin.y;
            if y >= 0 && (y as usize) < self.slice_probs.len() {
                self.slice_probs[y as usize] = prob;
            } else {
                tracing::debug!("slice probability y={} outside schematic", ypos);
            }
        }
    }

    /// Substitutes node names in the name table.
    ///
    /// Chains are followed to their end, so applying the same map twice
    /// gives the same table. Names on a cycle are left alone. Any earlier
    /// content-id request is discarded.
    pub fn apply_replacements(&mut self, replacements: &BTreeMap<String, String>) {
        if replacements.is_empty() {
            return;
        }
        for name in &mut self.node_names {
            if let Some(target) = follow_replacement(name, replacements) {
                tracing::debug!("schematic node '{}' replaced by '{}'", name, target);
                *name = target;
            }
        }
        self.resolved = None;
    }

    // -- Resolution ------------------------------------------------------------

    /// Enqueues every name-table entry on `resolver`. Names with no matching
    /// node resolve to ignore, which placement skips.
    pub fn request_content_ids(&mut self, resolver: &mut NodeResolver) {
        let slots: Vec<NodeSlot> = self
            .node_names
            .iter()
            .map(|name| {
                let slot = NodeSlot::new();
                resolver.add_node(name.as_str(), "", ContentId::IGNORE, &slot);
                slot
            })
            .collect();
        self.resolved = Some(slots);
    }

    /// Builds the code → content id map used by rotation and placement.
    ///
    /// Uses the resolver slots when [`request_content_ids`](Self::request_content_ids)
    /// was called, else looks every name up in `table` directly.
    pub fn content_remap(&self, table: &dyn ContentTable) -> ContentRemap {
        let ids: Vec<ContentId> = match &self.resolved {
            Some(slots) => slots.iter().map(NodeSlot::get).collect(),
            None => self
                .node_names
                .iter()
                .map(|n| table.lookup(n).unwrap_or(ContentId::IGNORE))
                .collect(),
        };
        ContentRemap::new(ids, table)
    }

    // -- Transforms ------------------------------------------------------------

    /// Rotates the grid in place around +Y. X and Z extents swap for quarter
    /// turns, and orientation bytes are remapped according to each node's
    /// `param2` kind.
    pub fn apply_rotation(&mut self, rotation: Rotation, remap: &ContentRemap) {
        if rotation == Rotation::R0 {
            return;
        }
        let old_size = self.size;
        let new_size = rotation.rotate_size(old_size);
        let mut rotated = vec![MapNode::AIR; self.nodes.len()];

        let (nx, nz) = (new_size.x as i32, new_size.z as i32);
        for y in 0..old_size.y as i32 {
            for z in 0..old_size.z as i32 {
                for x in 0..old_size.x as i32 {
                    let src = (x + z * old_size.x as i32 + y * (old_size.x * old_size.z) as i32) as usize;
                    let p = rotation.rotate_local(IVec3::new(x, y, z), old_size);
                    let dst = (p.x + p.z * nx + p.y * nx * nz) as usize;
                    let mut node = self.nodes[src];
                    node.param2 = rotation.rotate_param2(node.param2, remap.param2_kind(node.content.0));
                    rotated[dst] = node;
                }
            }
        }

        self.nodes = rotated;
        self.size = new_size;
    }
}

/// Follows `name` through `map` until it reaches a name with no entry.
/// `None` if `name` has no entry or sits on a cycle.
fn follow_replacement(name: &str, map: &BTreeMap<String, String>) -> Option<String> {
    let mut current = map.get(name)?;
    for _ in 0..map.len() {
        match map.get(current) {
            Some(next) => current = next,
            None => return Some(current.clone()),
        }
    }
    tracing::warn!("replacement chain for '{}' is cyclic, left unchanged", name);
    None
}

fn volume_of(size: U16Vec3) -> usize {
    size.x as usize * size.y as usize * size.z as usize
}

/// Name → code assignment in first-seen order.
#[derive(Default)]
pub(crate) struct NameTable {
    pub(crate) names: Vec<String>,
    codes: FxHashMap<String, u16>,
}

impl NameTable {
    pub(crate) fn code_for(&mut self, name: &str) -> Result<u16, SchematicError> {
        if let Some(&code) = self.codes.get(name) {
            return Ok(code);
        }
        let code = u16::try_from(self.names.len()).map_err(|_| SchematicError::TooManyNames)?;
        self.codes.insert(name.to_string(), code);
        self.names.push(name.to_string());
        Ok(code)
    }
}

// ---------------------------------------------------------------------------
// Remap
// ---------------------------------------------------------------------------

/// Session content ids and `param2` kinds for each name-table code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRemap {
    ids: Vec<ContentId>,
    kinds: Vec<Param2Kind>,
}

impl ContentRemap {
    /// Pairs each id with the `param2` kind `table` reports for it.
    pub fn new(ids: Vec<ContentId>, table: &dyn ContentTable) -> Self {
        let kinds = ids.iter().map(|&id| table.param2_kind(id)).collect();
        Self { ids, kinds }
    }

    /// Content id for a code; ignore for codes past the end.
    pub fn id(&self, code: u16) -> ContentId {
        self.ids
            .get(code as usize)
            .copied()
            .unwrap_or(ContentId::IGNORE)
    }

    pub fn param2_kind(&self, code: u16) -> Param2Kind {
        self.kinds
            .get(code as usize)
            .copied()
            .unwrap_or(Param2Kind::None)
    }

    pub fn ids(&self) -> &[ContentId] {
        &self.ids
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mapgen_voxel::{NodeDef, NodeDefTable, VoxelManip};

    pub(crate) fn test_table() -> NodeDefTable {
        let mut t = NodeDefTable::new();
        t.register_name("default:stone").unwrap();
        t.register_name("default:dirt").unwrap();
        t.register(NodeDef::with_param2("stairs:stair", Param2Kind::FaceDir))
            .unwrap();
        t.register(NodeDef::with_param2("default:torch", Param2Kind::WallMounted))
            .unwrap();
        t
    }

    /// 3x2x2 schematic with distinct param2 per cell and a mix of node kinds.
    pub(crate) fn sample() -> Schematic {
        let names = vec![
            "default:stone".to_string(),
            "stairs:stair".to_string(),
            "default:torch".to_string(),
        ];
        let size = U16Vec3::new(3, 2, 2);
        let nodes = (0..12u16)
            .map(|i| MapNode::with_params(ContentId(i % 3), 100 + i as u8, (i % 6) as u8))
            .collect();
        Schematic::new(size, names, nodes, vec![255, 128]).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_shapes() {
        let names = vec!["a".to_string()];
        let zero = Schematic::new(U16Vec3::new(0, 1, 1), names.clone(), vec![], vec![]);
        assert!(matches!(zero, Err(SchematicError::InvalidSize { .. })));

        let short = Schematic::new(U16Vec3::ONE * 2, names.clone(), vec![MapNode::AIR; 7], vec![255; 2]);
        assert!(matches!(
            short,
            Err(SchematicError::DataLength {
                expected: 8,
                actual: 7
            })
        ));

        let bad_code = Schematic::new(
            U16Vec3::ONE,
            names,
            vec![MapNode::new(ContentId(3))],
            vec![255],
        );
        assert!(matches!(bad_code, Err(SchematicError::InvalidNodeCode { code: 3, .. })));
    }

    #[test]
    fn test_index_x_then_z_then_y() {
        let s = sample();
        assert_eq!(s.index(IVec3::new(0, 0, 0)), Some(0));
        assert_eq!(s.index(IVec3::new(1, 0, 0)), Some(1));
        assert_eq!(s.index(IVec3::new(0, 0, 1)), Some(3));
        assert_eq!(s.index(IVec3::new(0, 1, 0)), Some(6));
        assert_eq!(s.index(IVec3::new(3, 0, 0)), None);
        assert_eq!(s.index(IVec3::new(0, -1, 0)), None);
    }

    #[test]
    fn test_from_region_captures_names_and_param2() {
        let t = test_table();
        let stone = t.lookup("default:stone").unwrap();
        let stair = t.lookup("stairs:stair").unwrap();
        let mut vm = VoxelManip::new(VoxelArea::new(IVec3::ZERO, IVec3::splat(7)));
        vm.set(IVec3::new(2, 3, 4), MapNode::with_params(stone, 9, 0));
        vm.set(IVec3::new(3, 3, 4), MapNode::with_params(stair, 0, 2));

        let s = Schematic::from_region(&vm, &t, IVec3::new(3, 4, 4), IVec3::new(2, 3, 4)).unwrap();
        assert_eq!(s.size(), U16Vec3::new(2, 2, 1));
        assert_eq!(s.name_at(IVec3::new(0, 0, 0)), Some("default:stone"));
        assert_eq!(s.name_at(IVec3::new(1, 0, 0)), Some("stairs:stair"));
        assert_eq!(s.name_at(IVec3::new(0, 1, 0)), Some("air"));
        assert_eq!(s.get(IVec3::new(1, 0, 0)).unwrap().param2, 2);
        // Light byte is replaced by the "always" probability.
        assert!(s.nodes().iter().all(|n| n.param1 == PROB_ALWAYS));
        assert_eq!(s.slice_probs(), &[PROB_ALWAYS, PROB_ALWAYS]);
    }

    #[test]
    fn test_apply_probabilities_world_coordinates() {
        let t = test_table();
        let vm = VoxelManip::new(VoxelArea::new(IVec3::ZERO, IVec3::splat(9)));
        let origin = IVec3::new(4, 5, 6);
        let mut s = Schematic::from_region(&vm, &t, origin, origin + IVec3::splat(2)).unwrap();

        s.apply_probabilities(
            origin,
            &[(IVec3::new(5, 5, 6), 17), (IVec3::new(100, 0, 0), 3)],
            &[(6, 0), (50, 1)],
        );
        assert_eq!(s.get(IVec3::new(1, 0, 0)).unwrap().param1, 17);
        assert_eq!(s.get(IVec3::new(0, 0, 0)).unwrap().param1, PROB_ALWAYS);
        assert_eq!(s.slice_probs(), &[PROB_ALWAYS, 0, PROB_ALWAYS]);
    }

    #[test]
    fn test_replacements_idempotent_and_chained() {
        let mut s = sample();
        let map: BTreeMap<String, String> = [
            ("default:stone", "default:dirt"),
            ("default:dirt", "default:sand"),
            ("stairs:stair", "stairs:slab"),
        ]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();

        s.apply_replacements(&map);
        let once = s.node_names().to_vec();
        assert_eq!(once, vec!["default:sand", "stairs:slab", "default:torch"]);

        s.apply_replacements(&map);
        assert_eq!(s.node_names(), once.as_slice());
    }

    #[test]
    fn test_cyclic_replacement_left_alone() {
        let mut s = sample();
        let map: BTreeMap<String, String> = [("default:stone", "x"), ("x", "default:stone")]
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        s.apply_replacements(&map);
        s.apply_replacements(&map);
        assert_eq!(s.node_names()[0], "default:stone");
    }

    #[test]
    fn test_request_content_ids_through_resolver() {
        let t = test_table();
        let mut s = sample();
        s.apply_replacements(
            &[("default:torch".to_string(), "missing:node".to_string())]
                .into_iter()
                .collect(),
        );
        let mut resolver = NodeResolver::new();
        s.request_content_ids(&mut resolver);
        assert!(s.is_resolved());
        assert_eq!(resolver.pending_len(), 3);
        resolver.flush(&t);

        let remap = s.content_remap(&t);
        assert_eq!(remap.id(0), t.lookup("default:stone").unwrap());
        assert_eq!(remap.id(1), t.lookup("stairs:stair").unwrap());
        assert_eq!(remap.id(2), ContentId::IGNORE);
        assert_eq!(remap.param2_kind(1), Param2Kind::FaceDir);
        assert_eq!(remap.id(99), ContentId::IGNORE);
    }

    #[test]
    fn test_rotate_90_swaps_extents_and_moves_cells() {
        let t = test_table();
        let mut s = sample();
        let remap = s.content_remap(&t);
        let before = s.get(IVec3::new(2, 1, 0)).unwrap();
        s.apply_rotation(Rotation::R90, &remap);
        assert_eq!(s.size(), U16Vec3::new(2, 2, 3));
        // (x, z) -> (z, sx - 1 - x)
        let after = s.get(IVec3::new(0, 1, 0)).unwrap();
        assert_eq!(after.content, before.content);
        assert_eq!(after.param1, before.param1);
    }

    #[test]
    fn test_rotate_90_four_times_is_identity() {
        let t = test_table();
        let original = sample();
        let mut s = original.clone();
        let remap = s.content_remap(&t);
        for _ in 0..4 {
            s.apply_rotation(Rotation::R90, &remap);
        }
        assert_eq!(s, original);
    }

    #[test]
    fn test_rotate_180_equals_two_quarter_turns() {
        let t = test_table();
        let mut a = sample();
        let mut b = sample();
        let remap = a.content_remap(&t);
        a.apply_rotation(Rotation::R180, &remap);
        b.apply_rotation(Rotation::R90, &remap);
        b.apply_rotation(Rotation::R90, &remap);
        assert_eq!(a, b);
    }
}
