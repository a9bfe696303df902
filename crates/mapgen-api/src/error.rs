//! Session and registration errors.

use mapgen_features::{RegistryError, ValidationError};
use mapgen_schematic::{PlaceError, SchematicError};

/// Errors from session lifecycle and schematic file operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `finalize` was already called, or the content table is locked.
    #[error("session is already finalized")]
    AlreadyFinalized,
    /// The operation needs resolved content ids.
    #[error("session is not finalized yet")]
    NotFinalized,
    /// Loading, building or saving a schematic failed.
    #[error(transparent)]
    Schematic(#[from] SchematicError),
    /// The schematic did not fit the target region.
    #[error(transparent)]
    Place(#[from] PlaceError),
}

/// A registration call failed. The registry is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// A description field is malformed or out of range.
    #[error("invalid description: {0}")]
    Validation(#[from] ValidationError),
    /// The registry refused the record.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The schematic of a schematic decoration could not be loaded.
    #[error("decoration schematic: {0}")]
    Schematic(#[from] SchematicError),
}
