//! Decoration records: plants, stacks and structures placed on the surface.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use glam::IVec3;
use mapgen_config::NoiseParams;
use mapgen_config::flags::{DECO_PLACE_CENTER_X, DECO_PLACE_CENTER_Y, DECO_PLACE_CENTER_Z};
use mapgen_schematic::{RotationSpec, Schematic};
use mapgen_voxel::{NodeListSlot, NodeResolver, Rotation};

use crate::biome::BiomeRegistry;
use crate::error::ValidationError;
use crate::registry::{FeatureId, FeatureKind, FeatureRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecorationType {
    Simple,
    Schematic,
    LSystem,
}

impl FeatureKind for DecorationType {
    const FIELD: &'static str = "deco_type";
    const ALL: &'static [Self] = &[
        DecorationType::Simple,
        DecorationType::Schematic,
        DecorationType::LSystem,
    ];

    fn name(self) -> &'static str {
        match self {
            DecorationType::Simple => "simple",
            DecorationType::Schematic => "schematic",
            DecorationType::LSystem => "lsystem",
        }
    }
}

/// A column of one of `c_decos`, optionally only next to `c_spawnby` nodes.
#[derive(Clone, Debug)]
pub struct DecoSimple {
    pub c_decos: NodeListSlot,
    pub deco_height: i16,
    /// When non-zero, the height is drawn from `deco_height..=deco_height_max`.
    pub deco_height_max: i16,
    pub c_spawnby: NodeListSlot,
    /// Neighbours from `c_spawnby` required; -1 disables the check.
    pub num_spawn_by: i16,
}

impl Default for DecoSimple {
    fn default() -> Self {
        Self {
            c_decos: NodeListSlot::new(),
            deco_height: 1,
            deco_height_max: 0,
            c_spawnby: NodeListSlot::new(),
            num_spawn_by: -1,
        }
    }
}

impl DecoSimple {
    /// Checks the simple-decoration fields and enqueues the node lists.
    ///
    /// # Errors
    ///
    /// Height must be positive, at least one decoration node must be named,
    /// and `spawn_by` must be given when `num_spawn_by` is not -1. Nothing is
    /// enqueued on error.
    pub fn configure<S: AsRef<str>>(
        &mut self,
        height: i16,
        height_max: i16,
        num_spawn_by: i16,
        decos: &[S],
        spawn_by: &[S],
        resolver: &mut NodeResolver,
    ) -> Result<(), ValidationError> {
        if height <= 0 {
            return Err(ValidationError::NotPositive {
                field: "height",
                value: height as i64,
            });
        }
        if decos.is_empty() {
            return Err(ValidationError::Missing("decoration"));
        }
        if num_spawn_by != -1 && spawn_by.is_empty() {
            return Err(ValidationError::Missing("spawn_by"));
        }

        self.deco_height = height;
        self.deco_height_max = height_max;
        self.num_spawn_by = num_spawn_by;
        for name in decos {
            resolver.add_node_list(name.as_ref(), &self.c_decos);
        }
        for name in spawn_by {
            resolver.add_node_list(name.as_ref(), &self.c_spawnby);
        }
        Ok(())
    }
}

/// A schematic stamped at the decoration position.
#[derive(Clone, Debug, Default)]
pub struct DecoSchematic {
    pub schematic: Schematic,
    pub rotation: RotationSpec,
    /// Bit set over `DECO_SCHEMATIC_FLAGS`.
    pub flags: u32,
}

impl DecoSchematic {
    /// Shifts `pos` so the schematic is centered on each axis whose
    /// `place_center_*` flag is set, using the extent after `rotation`.
    pub fn placement_origin(&self, pos: IVec3, rotation: Rotation) -> IVec3 {
        let s = rotation.rotate_size(self.schematic.size()).as_ivec3();
        let mut p = pos;
        if self.flags & DECO_PLACE_CENTER_X != 0 {
            p.x -= (s.x + 1) / 2;
        }
        if self.flags & DECO_PLACE_CENTER_Y != 0 {
            p.y -= (s.y + 1) / 2;
        }
        if self.flags & DECO_PLACE_CENTER_Z != 0 {
            p.z -= (s.z + 1) / 2;
        }
        p
    }
}

/// Placeholder for tree-grammar decorations; generation lives elsewhere.
#[derive(Clone, Debug, Default)]
pub struct DecoLSystem;

/// Type-specific decoration parameters.
#[derive(Clone, Debug)]
pub enum DecoParams {
    Simple(DecoSimple),
    Schematic(DecoSchematic),
    LSystem(DecoLSystem),
}

/// A registered decoration.
#[derive(Clone, Debug)]
pub struct Decoration {
    pub id: FeatureId,
    pub name: String,
    pub kind: DecorationType,

    /// Surface nodes the decoration may be placed on.
    pub c_place_on: NodeListSlot,
    /// Fraction of surface nodes decorated when no noise is given.
    pub fill_ratio: f32,
    /// Edge length of the square divisions the noise is sampled over.
    pub sidelen: i16,
    pub noise_params: Option<NoiseParams>,

    /// Biome names as registered; resolved once all biomes are known.
    pub biome_names: Vec<String>,
    biomes: OnceCell<BTreeSet<FeatureId>>,

    pub params: DecoParams,
}

impl FeatureRecord for Decoration {
    type Kind = DecorationType;
    const LABEL: &'static str = "decoration";

    fn create(kind: DecorationType) -> Self {
        let params = match kind {
            DecorationType::Simple => DecoParams::Simple(DecoSimple::default()),
            DecorationType::Schematic => DecoParams::Schematic(DecoSchematic::default()),
            DecorationType::LSystem => DecoParams::LSystem(DecoLSystem),
        };
        Self {
            id: FeatureId::INVALID,
            name: String::new(),
            kind,
            c_place_on: NodeListSlot::new(),
            fill_ratio: 0.02,
            sidelen: 8,
            noise_params: None,
            biome_names: Vec::new(),
            biomes: OnceCell::new(),
            params,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DecorationType {
        self.kind
    }

    fn id(&self) -> FeatureId {
        self.id
    }

    fn set_id(&mut self, id: FeatureId) {
        self.id = id;
    }
}

impl Decoration {
    /// # Errors
    ///
    /// Returns [`ValidationError::NotPositive`] unless `sidelen > 0`.
    pub fn set_sidelen(&mut self, sidelen: i16) -> Result<(), ValidationError> {
        if sidelen <= 0 {
            return Err(ValidationError::NotPositive {
                field: "sidelen",
                value: sidelen as i64,
            });
        }
        self.sidelen = sidelen;
        Ok(())
    }

    pub fn request_place_on<S: AsRef<str>>(&self, place_on: &[S], resolver: &mut NodeResolver) {
        for name in place_on {
            resolver.add_node_list(name.as_ref(), &self.c_place_on);
        }
    }

    /// Maps `biome_names` to ids. Runs once; later calls return `false`.
    /// Unknown names are skipped with a warning.
    pub fn resolve_biomes(&self, biomes: &BiomeRegistry) -> bool {
        if self.biomes.get().is_some() {
            return false;
        }
        let mut ids = BTreeSet::new();
        for name in &self.biome_names {
            match biomes.id_of(name) {
                Some(id) => {
                    ids.insert(id);
                }
                None => tracing::warn!(
                    "decoration '{}': unknown biome '{}' ignored",
                    self.name,
                    name
                ),
            }
        }
        self.biomes.set(ids).is_ok()
    }

    /// Resolved biome ids, `None` before [`resolve_biomes`](Self::resolve_biomes).
    pub fn biomes(&self) -> Option<&BTreeSet<FeatureId>> {
        self.biomes.get()
    }

    /// Whether the decoration may appear in `biome`. An empty biome list
    /// means every biome.
    pub fn applies_to_biome(&self, biome: FeatureId) -> bool {
        match self.biomes.get() {
            Some(ids) => ids.is_empty() || ids.contains(&biome),
            None => self.biome_names.is_empty(),
        }
    }

    pub fn as_simple(&self) -> Option<&DecoSimple> {
        match &self.params {
            DecoParams::Simple(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_schematic(&self) -> Option<&DecoSchematic> {
        match &self.params {
            DecoParams::Schematic(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
