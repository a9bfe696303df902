//! Error types for schematic construction, binary I/O and placement.

use std::path::PathBuf;

use mapgen_voxel::VoxelArea;

/// Errors produced while decoding a serialized schematic.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The data does not start with the expected magic bytes.
    #[error("invalid magic bytes")]
    InvalidMagic,
    /// The format version is not supported by this build.
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u16),
    /// The data is shorter than expected.
    #[error("data truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum expected byte count.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },
    /// One of the dimensions is zero.
    #[error("schematic has an empty volume")]
    EmptyVolume,
    /// A name-table entry is not valid UTF-8.
    #[error("name table entry {0} is not valid utf-8")]
    InvalidName(usize),
    /// A grid cell references a code past the end of the name table.
    #[error("node code {code} out of range (name table has {names} entries)")]
    InvalidNodeCode { code: u16, names: usize },
    /// Bytes remain after the slice probability list.
    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}

/// Errors produced while building, loading or saving a schematic.
#[derive(Debug, thiserror::Error)]
pub enum SchematicError {
    /// Reading or writing the schematic file failed.
    #[error("schematic file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file contents could not be decoded.
    #[error("malformed schematic: {0}")]
    Format(#[from] FormatError),
    /// A dimension is zero or does not fit in 16 bits.
    #[error("invalid schematic size {x}x{y}x{z}")]
    InvalidSize { x: i64, y: i64, z: i64 },
    /// The node list does not cover the volume exactly.
    #[error("schematic data has {actual} entries, expected {expected}")]
    DataLength { expected: usize, actual: usize },
    /// A cell references a code past the end of the name table.
    #[error("node code {code} out of range (name table has {names} entries)")]
    InvalidNodeCode { code: u16, names: usize },
    /// The name table cannot hold more than 65 536 distinct names.
    #[error("too many distinct node names")]
    TooManyNames,
}

/// Errors produced by placement.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The rotated footprint is not inside the target region. Nothing was written.
    #[error("footprint {footprint:?} is outside target region {region:?}")]
    OutOfBounds {
        footprint: VoxelArea,
        region: VoxelArea,
    },
}
