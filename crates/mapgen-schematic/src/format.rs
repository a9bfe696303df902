//! Binary serialization for [`Schematic`].
//!
//! The MGSC format stores node names instead of content ids so a file stays
//! valid across sessions with different id assignments. All integers are
//! little-endian.
//!
//! ## Binary Layout (version 2)
//!
//! | Size | Field |
//! |------|-------|
//! | 4 | Magic bytes `"MGSC"` |
//! | 2 | Format version (`u16`) |
//! | 6 | Size X, Y, Z (`u16` each) |
//! | 2 | Name count N (`u16`) |
//! | N × (2 + len) | Names: `u16` byte length, then UTF-8 bytes |
//! | X×Y×Z × 4 | Cells: code (`u16`), probability (`u8`), param2 (`u8`) |
//! | Y | Slice probabilities (`u8` per layer) |
//!
//! Version 1 files have no slice list; every layer reads as "always".

use std::path::Path;

use glam::U16Vec3;
use mapgen_voxel::{ContentId, MapNode, PROB_ALWAYS};

use crate::error::{FormatError, SchematicError};
use crate::schematic::Schematic;

/// Magic bytes identifying the MGSC format.
const MAGIC: [u8; 4] = *b"MGSC";

/// Version written by [`Schematic::serialize`].
pub const FORMAT_VERSION: u16 = 2;

/// Oldest version still readable.
const MIN_VERSION: u16 = 1;

/// Bytes per serialized cell.
const CELL_BYTES: usize = 4;

impl Schematic {
    /// Serializes this schematic in the current MGSC version.
    pub fn serialize(&self) -> Vec<u8> {
        let names_len: usize = self.node_names().iter().map(|n| 2 + n.len()).sum();
        let total = 4 + 2 + 6 + 2 + names_len + self.volume() * CELL_BYTES + self.size().y as usize;
        let mut buf = Vec::with_capacity(total);

        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());

        let size = self.size();
        for dim in [size.x, size.y, size.z] {
            buf.extend_from_slice(&dim.to_le_bytes());
        }

        // Name count always fits: codes are u16 and names are only added
        // through code assignment.
        buf.extend_from_slice(&(self.node_names().len() as u16).to_le_bytes());
        for name in self.node_names() {
            let bytes = name.as_bytes();
            let len = bytes.len().min(u16::MAX as usize);
            buf.extend_from_slice(&(len as u16).to_le_bytes());
            buf.extend_from_slice(&bytes[..len]);
        }

        for node in self.nodes() {
            buf.extend_from_slice(&node.content.0.to_le_bytes());
            buf.push(node.param1);
            buf.push(node.param2);
        }

        buf.extend_from_slice(self.slice_probs());
        buf
    }

    /// Decodes a schematic. The result holds names only; request content
    /// ids from a resolver before placing it.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] on bad magic, unknown version, truncation,
    /// zero dimensions, invalid names or codes, or trailing bytes.
    pub fn deserialize(data: &[u8]) -> Result<Self, FormatError> {
        let mut r = Reader::new(data);

        if data.len() < MAGIC.len() || data[..MAGIC.len()] != MAGIC {
            return Err(FormatError::InvalidMagic);
        }
        r.take(MAGIC.len())?;

        let version = r.u16()?;
        if !(MIN_VERSION..=FORMAT_VERSION).contains(&version) {
            return Err(FormatError::UnsupportedVersion(version));
        }

        let size = U16Vec3::new(r.u16()?, r.u16()?, r.u16()?);
        if size.x == 0 || size.y == 0 || size.z == 0 {
            return Err(FormatError::EmptyVolume);
        }

        let name_count = r.u16()? as usize;
        let mut names = Vec::with_capacity(name_count);
        for i in 0..name_count {
            let len = r.u16()? as usize;
            let raw = r.take(len)?;
            let name = std::str::from_utf8(raw).map_err(|_| FormatError::InvalidName(i))?;
            names.push(name.to_string());
        }

        let volume = size.x as usize * size.y as usize * size.z as usize;
        let cells = r.take(volume * CELL_BYTES)?;
        let mut nodes = Vec::with_capacity(volume);
        for cell in cells.chunks_exact(CELL_BYTES) {
            let code = u16::from_le_bytes([cell[0], cell[1]]);
            if code as usize >= names.len() {
                return Err(FormatError::InvalidNodeCode {
                    code,
                    names: names.len(),
                });
            }
            nodes.push(MapNode::with_params(ContentId(code), cell[2], cell[3]));
        }

        let slice_probs = if version >= 2 {
            r.take(size.y as usize)?.to_vec()
        } else {
            vec![PROB_ALWAYS; size.y as usize]
        };

        if r.remaining() > 0 {
            return Err(FormatError::TrailingBytes(r.remaining()));
        }

        // Shape and codes were checked above.
        Schematic::new(size, names, nodes, slice_probs).map_err(|_| FormatError::EmptyVolume)
    }

    /// Writes the schematic to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SchematicError::Io`] if the file cannot be written.
    pub fn save_to_file(&self, path: &Path) -> Result<(), SchematicError> {
        std::fs::write(path, self.serialize()).map_err(|source| SchematicError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            "saved {}x{}x{} schematic to {}",
            self.size().x,
            self.size().y,
            self.size().z,
            path.display()
        );
        Ok(())
    }

    /// Reads and decodes a schematic file.
    ///
    /// # Errors
    ///
    /// Returns [`SchematicError::Io`] if the file cannot be read, or
    /// [`SchematicError::Format`] if it is malformed.
    pub fn load_from_file(path: &Path) -> Result<Self, SchematicError> {
        let data = std::fs::read(path).map_err(|source| SchematicError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let schematic = Self::deserialize(&data)?;
        tracing::debug!("loaded schematic {}", path.display());
        Ok(schematic)
    }
}

/// Bounds-checked cursor over the input bytes.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self.pos.checked_add(n).ok_or(FormatError::Truncated {
            expected: usize::MAX,
            actual: self.data.len(),
        })?;
        if end > self.data.len() {
            return Err(FormatError::Truncated {
                expected: end,
                actual: self.data.len(),
            });
        }
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16, FormatError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schematic::tests::sample;

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let s = sample();
        let bytes = s.serialize();
        let restored = Schematic::deserialize(&bytes).unwrap();
        assert_eq!(restored, s);
        assert_eq!(restored.slice_probs(), &[255, 128]);
        assert!(!restored.is_resolved());
    }

    #[test]
    fn test_header_layout() {
        let bytes = sample().serialize();
        assert_eq!(&bytes[0..4], b"MGSC");
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), FORMAT_VERSION);
        assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 3);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 2);
        assert_eq!(u16::from_le_bytes([bytes[10], bytes[11]]), 2);
        assert_eq!(u16::from_le_bytes([bytes[12], bytes[13]]), 3);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = sample().serialize();
        bytes[0] = b'X';
        assert!(matches!(Schematic::deserialize(&bytes), Err(FormatError::InvalidMagic)));
        assert!(matches!(Schematic::deserialize(&[]), Err(FormatError::InvalidMagic)));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = sample().serialize();
        bytes[4..6].copy_from_slice(&9u16.to_le_bytes());
        assert!(matches!(
            Schematic::deserialize(&bytes),
            Err(FormatError::UnsupportedVersion(9))
        ));
        bytes[4..6].copy_from_slice(&0u16.to_le_bytes());
        assert!(matches!(
            Schematic::deserialize(&bytes),
            Err(FormatError::UnsupportedVersion(0))
        ));
    }

    #[test]
    fn test_version_1_has_no_slice_list() {
        let s = sample();
        let mut bytes = s.serialize();
        bytes[4..6].copy_from_slice(&1u16.to_le_bytes());
        bytes.truncate(bytes.len() - s.size().y as usize);

        let restored = Schematic::deserialize(&bytes).unwrap();
        assert_eq!(restored.nodes(), s.nodes());
        assert_eq!(restored.slice_probs(), &[PROB_ALWAYS, PROB_ALWAYS]);
    }

    #[test]
    fn test_truncated_at_every_length() {
        let bytes = sample().serialize();
        for len in 4..bytes.len() {
            let result = Schematic::deserialize(&bytes[..len]);
            assert!(
                matches!(result, Err(FormatError::Truncated { .. })),
                "length {len} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = sample().serialize();
        bytes.push(0);
        assert!(matches!(
            Schematic::deserialize(&bytes),
            Err(FormatError::TrailingBytes(1))
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut bytes = sample().serialize();
        bytes[8..10].copy_from_slice(&0u16.to_le_bytes());
        assert!(matches!(Schematic::deserialize(&bytes), Err(FormatError::EmptyVolume)));
    }

    #[test]
    fn test_bad_node_code_rejected() {
        let s = sample();
        let mut bytes = s.serialize();
        let names_len: usize = s.node_names().iter().map(|n| 2 + n.len()).sum();
        let first_cell = 14 + names_len;
        bytes[first_cell..first_cell + 2].copy_from_slice(&40u16.to_le_bytes());
        assert!(matches!(
            Schematic::deserialize(&bytes),
            Err(FormatError::InvalidNodeCode { code: 40, names: 3 })
        ));
    }

    #[test]
    fn test_huge_declared_size_fails_without_allocating() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"MGSC");
        bytes.extend_from_slice(&2u16.to_le_bytes());
        for _ in 0..3 {
            bytes.extend_from_slice(&u16::MAX.to_le_bytes());
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
        assert!(matches!(
            Schematic::deserialize(&bytes),
            Err(FormatError::Truncated { .. })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("house.mgsc");
        let s = sample();
        s.save_to_file(&path).unwrap();
        let loaded = Schematic::load_from_file(&path).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Schematic::load_from_file(&dir.path().join("nope.mgsc"));
        assert!(matches!(result, Err(SchematicError::Io { .. })));
    }
}
