//! Script-facing map generation entry points.
//!
//! A [`MapgenSession`] holds the content table, the feature registries and
//! the pending node resolver for one world. Scripts register biomes, ores
//! and decorations through typed descriptions, tune generator parameters,
//! read generator objects and capture or place schematics.

mod desc;
mod error;
mod objects;
mod params;
mod register;
mod schematics;
mod session;

pub use desc::{BiomeDesc, DecorationDesc, OneOrMany, OreDesc, Replacements, SchematicSource};
pub use error::{RegisterError, SessionError};
pub use objects::{
    GeneratedChunk, GeneratorOutput, HEAT_MAP, HUMIDITY_MAP, MapgenObject, MapgenObjectKind,
};
pub use params::MapgenParamsUpdate;
pub use session::MapgenSession;
