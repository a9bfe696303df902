//! Schematics: rectangular voxel blueprints with per-cell and per-layer
//! placement probabilities.
//!
//! A [`Schematic`] is captured from a live region, decoded from the MGSC
//! binary format, or built from an inline [`SchematicDef`]. Node names stay
//! symbolic until a resolver maps them to session content ids; replacements
//! and rotation are applied at load time, then the grid is placed into a
//! target region or saved back to disk.

mod def;
mod error;
mod format;
mod place;
mod schematic;

pub use def::{SchematicDef, SchematicNodeDef, SliceProbDef};
pub use error::{FormatError, PlaceError, SchematicError};
pub use format::FORMAT_VERSION;
pub use place::{PlaceStats, RotationSpec, UnknownRotation, footprint};
pub use schematic::{ContentRemap, Schematic};
