//! Content table: maps node names to compact [`ContentId`] values.
//!
//! The generation core never owns the authoritative table; it consumes it
//! through the [`ContentTable`] trait. [`NodeDefTable`] is the in-memory
//! implementation used by tools and tests. Air is always ID 0 and ignore is
//! always ID 1 so that zero-initialized node memory is empty space.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rustc_hash::FxHashMap;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored inside every node cell (2 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(pub u16);

impl ContentId {
    /// Empty space.
    pub const AIR: ContentId = ContentId(0);
    /// "Not loaded / do not touch". Never written by placement.
    pub const IGNORE: ContentId = ContentId(1);
}

/// How a node type interprets its `param2` byte.
///
/// Only orientation-carrying kinds are remapped when a schematic is rotated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Param2Kind {
    /// `param2` is opaque data (color, level, ...).
    #[default]
    None,
    /// Low two bits are a horizontal facing (0 = +Z, 1 = +X, 2 = -Z, 3 = -X).
    FaceDir,
    /// Low three bits name the attached face (0 = +Y, 1 = -Y, 2 = +X, 3 = -X, 4 = +Z, 5 = -Z).
    WallMounted,
}

/// Read access to the names-to-ids table of the embedding host.
///
/// Implementations must be stable: once a name has been looked up during
/// resolution, its id must not change for the rest of the session.
pub trait ContentTable {
    /// Returns the id for `name`, or `None` if no such node type exists.
    fn lookup(&self, name: &str) -> Option<ContentId>;

    /// Returns the registered name of `id`.
    fn name_of(&self, id: ContentId) -> Option<&str>;

    /// Returns how `id` interprets its `param2` byte.
    fn param2_kind(&self, _id: ContentId) -> Param2Kind {
        Param2Kind::None
    }
}

/// Descriptor for one node type in a [`NodeDefTable`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDef {
    /// Registered name (e.g. "default:stone").
    pub name: String,
    /// Meaning of the `param2` byte.
    #[serde(default)]
    pub param2: Param2Kind,
}

impl NodeDef {
    /// A node type with opaque `param2`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param2: Param2Kind::None,
        }
    }

    /// A node type with the given `param2` interpretation.
    pub fn with_param2(name: impl Into<String>, param2: Param2Kind) -> Self {
        Self {
            name: name.into(),
            param2,
        }
    }
}

/// Errors that can occur while building a [`NodeDefTable`].
#[derive(Debug, Error)]
pub enum ContentTableError {
    /// A type with the same name has already been registered.
    #[error("duplicate node name: {0}")]
    DuplicateName(String),
    /// All 65 536 ids have been consumed.
    #[error("content table is full (max 65536 node types)")]
    TableFull,
    /// The RON node manifest could not be parsed.
    #[error("node manifest parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// I/O error reading the node manifest.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Maps [`ContentId`] → [`NodeDef`] with O(1) lookup by index and O(1)
/// reverse lookup by name.
#[derive(Clone, Debug)]
pub struct NodeDefTable {
    /// Dense array where `index == ContentId.0`.
    defs: Vec<NodeDef>,
    /// Reverse lookup: name → ID.
    name_to_id: FxHashMap<String, ContentId>,
}

impl NodeDefTable {
    /// Creates a table with `air` (ID 0) and `ignore` (ID 1) pre-registered.
    pub fn new() -> Self {
        let mut name_to_id = FxHashMap::default();
        name_to_id.insert("air".to_string(), ContentId::AIR);
        name_to_id.insert("ignore".to_string(), ContentId::IGNORE);

        Self {
            defs: vec![NodeDef::new("air"), NodeDef::new("ignore")],
            name_to_id,
        }
    }

    /// Builds a table from a RON list of [`NodeDef`] entries, e.g.
    /// `[(name: "default:stone"), (name: "stairs:stair_wood", param2: facedir)]`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentTableError`] on parse failure or duplicate names.
    pub fn from_ron_str(source: &str) -> Result<Self, ContentTableError> {
        let defs: Vec<NodeDef> = ron::from_str(source)?;
        let mut table = Self::new();
        for def in defs {
            table.register(def)?;
        }
        Ok(table)
    }

    /// Reads a RON node manifest from disk. See [`from_ron_str`](Self::from_ron_str).
    ///
    /// # Errors
    ///
    /// Returns [`ContentTableError`] on I/O, parse, or duplicate-name failures.
    pub fn from_ron_file(path: &std::path::Path) -> Result<Self, ContentTableError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Registers a new node type and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns [`ContentTableError::DuplicateName`] if the name already exists,
    /// or [`ContentTableError::TableFull`] if all ids are consumed.
    pub fn register(&mut self, def: NodeDef) -> Result<ContentId, ContentTableError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(ContentTableError::DuplicateName(def.name));
        }
        if self.defs.len() > u16::MAX as usize {
            return Err(ContentTableError::TableFull);
        }

        let id = ContentId(self.defs.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.defs.push(def);
        Ok(id)
    }

    /// Shorthand for registering a node with opaque `param2`.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn register_name(&mut self, name: &str) -> Result<ContentId, ContentTableError> {
        self.register(NodeDef::new(name))
    }

    /// Returns the definition for a given ID, if registered.
    pub fn get(&self, id: ContentId) -> Option<&NodeDef> {
        self.defs.get(id.0 as usize)
    }

    /// Returns the total number of registered types (including air and ignore).
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns `true` if only the two built-in types are registered.
    pub fn is_empty(&self) -> bool {
        self.defs.len() <= 2
    }
}

impl Default for NodeDefTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTable for NodeDefTable {
    fn lookup(&self, name: &str) -> Option<ContentId> {
        self.name_to_id.get(name).copied()
    }

    fn name_of(&self, id: ContentId) -> Option<&str> {
        self.defs.get(id.0 as usize).map(|d| d.name.as_str())
    }

    fn param2_kind(&self, id: ContentId) -> Param2Kind {
        self.defs
            .get(id.0 as usize)
            .map_or(Param2Kind::None, |d| d.param2)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
