//! `register_biome`, `register_ore` and `register_decoration`.
//!
//! Each call builds a record from its description, validates it and queues
//! its node names on a private resolver. Only when the registry accepts the
//! record are those requests handed to the session; a rejected record is
//! dropped together with its requests.

use mapgen_config::flags::{DECO_SCHEMATIC_FLAGS, ORE_FLAGS};
use mapgen_features::{
    BiomeNodeNames, BiomeType, DecoParams, Decoration, DecorationType, FeatureId, FeatureKind,
    Ore, OreType, ValidationError,
};
use mapgen_schematic::Schematic;
use mapgen_voxel::{ContentTable, NodeResolver};

use crate::desc::{BiomeDesc, DecorationDesc, OreDesc, SchematicSource};
use crate::error::RegisterError;
use crate::session::MapgenSession;

impl<C: ContentTable> MapgenSession<C> {
    /// Registers a biome.
    ///
    /// # Errors
    ///
    /// Fails on an unknown type, an inverted height range, a negative depth,
    /// or an empty or duplicate name.
    pub fn register_biome(&mut self, desc: &BiomeDesc) -> Result<FeatureId, RegisterError> {
        let kind = parse_kind(&desc.kind, BiomeType::Normal)?;
        let mut biome = self.biomes.create(kind);
        biome.name = desc.name.clone();
        biome.depth_top = desc.depth_top;
        biome.depth_filler = desc.depth_filler;
        biome.height_min = desc.height_min;
        biome.height_max = desc.height_max;
        biome.heat_point = desc.heat_point;
        biome.humidity_point = desc.humidity_point;
        biome.validate()?;

        let names = BiomeNodeNames {
            top: desc.node_top.clone(),
            filler: desc.node_filler.clone(),
            water: desc.node_water.clone(),
            dust: desc.node_dust.clone(),
            dust_water: desc.node_dust_water.clone(),
        };
        let mut local = NodeResolver::new();
        biome.request_nodes(&names, &mut local);

        let id = self.biomes.add(biome).map_err(|r| r.error)?;
        self.commit_requests(local);
        Ok(id)
    }

    /// Registers an ore.
    ///
    /// # Errors
    ///
    /// Fails on an unknown ore type, a non-positive scarcity or ore count, a
    /// negative cluster size, or an inverted height range.
    pub fn register_ore(&mut self, desc: &OreDesc) -> Result<FeatureId, RegisterError> {
        let kind = parse_kind(&desc.ore_type, OreType::Scatter)?;
        let mut ore: Ore = self.ores.create(kind);
        ore.name = desc.name.clone();
        ore.set_cluster(desc.clust_scarcity, desc.clust_num_ores, desc.clust_size)?;
        ore.ore_param2 = desc.ore_param2;
        ore.height_min = desc.height_min;
        ore.height_max = desc.height_max;
        ore.noise_threshold = desc.noise_threshold;
        ore.flags = desc.flags.read(ORE_FLAGS).flags;
        ore.noise_params = desc.noise_params;
        ore.validate()?;

        let mut local = NodeResolver::new();
        ore.request_nodes(&desc.ore, desc.wherein.as_slice(), &mut local);

        let id = self.ores.add(ore).map_err(|r| r.error)?;
        self.commit_requests(local);
        Ok(id)
    }

    /// Registers a decoration.
    ///
    /// Biome names are linked at [`finalize`](Self::finalize), or right away
    /// when the session is already finalized.
    ///
    /// # Errors
    ///
    /// Fails when `deco_type` is missing or unknown, for L-system
    /// decorations, on a non-positive `sidelen`, on bad simple-decoration
    /// fields, or when the schematic cannot be loaded.
    pub fn register_decoration(&mut self, desc: &DecorationDesc) -> Result<FeatureId, RegisterError> {
        if desc.deco_type.trim().is_empty() {
            return Err(ValidationError::Missing("deco_type").into());
        }
        let kind = DecorationType::parse(&desc.deco_type)?;
        if kind == DecorationType::LSystem {
            return Err(ValidationError::NotImplemented("lsystem decoration").into());
        }

        let mut deco: Decoration = self.decorations.create(kind);
        deco.name = desc.name.clone();
        deco.set_sidelen(desc.sidelen)?;
        deco.fill_ratio = desc.fill_ratio;
        deco.noise_params = desc.noise_params;
        deco.biome_names = desc.biomes.as_slice().to_vec();

        let mut local = NodeResolver::new();
        deco.request_place_on(desc.place_on.as_slice(), &mut local);

        match &mut deco.params {
            DecoParams::Simple(simple) => simple.configure(
                desc.height,
                desc.height_max,
                desc.num_spawn_by,
                desc.decoration.as_slice(),
                desc.spawn_by.as_slice(),
                &mut local,
            )?,
            DecoParams::Schematic(schem) => {
                let source = desc
                    .schematic
                    .as_ref()
                    .ok_or(ValidationError::Missing("schematic"))?;
                let mut schematic = self.load_schematic(source)?;
                schematic.apply_replacements(&desc.replacements.to_map());
                schematic.request_content_ids(&mut local);
                schem.schematic = schematic;
                schem.rotation = desc.rotation;
                schem.flags = desc.flags.read(DECO_SCHEMATIC_FLAGS).flags;
            }
            DecoParams::LSystem(_) => {
                return Err(ValidationError::NotImplemented("lsystem decoration").into());
            }
        }

        let id = self.decorations.add(deco).map_err(|r| r.error)?;
        self.commit_requests(local);
        if self.is_finalized()
            && let Some(deco) = self.decorations.get(id)
        {
            deco.resolve_biomes(&self.biomes);
        }
        Ok(id)
    }

    /// Reads a schematic from a file (relative to the schematic directory)
    /// or an inline definition.
    pub(crate) fn load_schematic(
        &self,
        source: &SchematicSource,
    ) -> Result<Schematic, mapgen_schematic::SchematicError> {
        match source {
            SchematicSource::File(path) => {
                Schematic::load_from_file(&self.config.schematic_path(path))
            }
            SchematicSource::Inline(def) => Schematic::from_def(def),
        }
    }
}

/// Parses a kind field, with `default` for an empty string.
fn parse_kind<K: FeatureKind>(value: &str, default: K) -> Result<K, ValidationError> {
    if value.trim().is_empty() {
        Ok(default)
    } else {
        K::parse(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
