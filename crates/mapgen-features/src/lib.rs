//! Feature registries for map generation: biomes, ores and decorations.
//!
//! Each kind lives in a [`FeatureRegistry`] that hands out dense,
//! never-reused [`FeatureId`]s. Records reference node types by name; the
//! names are enqueued on a [`mapgen_voxel::NodeResolver`] and the record's
//! slots are filled when the session flushes it.

pub mod biome;
pub mod decoration;
mod error;
pub mod ore;
pub mod registry;

pub use biome::{Biome, BiomeNodeNames, BiomeRegistry, BiomeType, DEFAULT_BIOME_NAME};
pub use decoration::{
    DecoLSystem, DecoParams, DecoSchematic, DecoSimple, Decoration, DecorationType,
};
pub use error::{RegistryError, ValidationError};
pub use ore::{Ore, OreType};
pub use registry::{FeatureId, FeatureKind, FeatureRecord, FeatureRegistry, Rejected};

/// Registry of ores.
pub type OreRegistry = FeatureRegistry<Ore>;

/// Registry of decorations.
pub type DecorationRegistry = FeatureRegistry<Decoration>;
