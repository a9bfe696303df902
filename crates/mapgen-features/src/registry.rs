//! Generic append-only registry that hands out dense feature ids.

use std::fmt;

use hashbrown::HashMap;

use crate::error::{RegistryError, ValidationError};

/// Identifier of a registered feature. Dense and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub u32);

impl FeatureId {
    /// Never issued by a registry.
    pub const INVALID: FeatureId = FeatureId(u32::MAX);
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A closed set of record variants, parsed from their script names.
pub trait FeatureKind: Copy + fmt::Debug + PartialEq + 'static {
    /// Description field the kind is read from (e.g. "ore_type").
    const FIELD: &'static str;
    /// Every variant.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Case-insensitive lookup by name.
    fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
    }

    /// Like [`from_name`](Self::from_name) but reports the bad value.
    fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::from_name(s).ok_or_else(|| ValidationError::UnknownVariant {
            field: Self::FIELD,
            value: s.to_string(),
        })
    }
}

/// A record a [`FeatureRegistry`] can own.
pub trait FeatureRecord: Sized {
    type Kind: FeatureKind;

    /// Human-readable type label used in logs and errors.
    const LABEL: &'static str;

    /// Whether names must be non-empty and unique within the registry.
    const UNIQUE_NAMES: bool = false;

    /// An empty record of the given kind with default parameters.
    fn create(kind: Self::Kind) -> Self;

    fn name(&self) -> &str;

    fn kind(&self) -> Self::Kind;

    /// The id assigned on insertion, [`FeatureId::INVALID`] before that.
    fn id(&self) -> FeatureId;

    fn set_id(&mut self, id: FeatureId);
}

/// A record the registry refused. The caller gets it back intact.
pub struct Rejected<T> {
    pub record: T,
    pub error: RegistryError,
}

impl<T> Rejected<T> {
    pub fn into_record(self) -> T {
        self.record
    }
}

impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected").field("error", &self.error).finish()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<T> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Stores records of one feature type with O(1) lookup by id and by name.
///
/// There is no removal: ids stay valid for the whole session.
pub struct FeatureRegistry<T> {
    records: Vec<T>,
    /// First record registered under each non-empty name.
    name_to_id: HashMap<String, FeatureId>,
    limit: u32,
}

impl<T: FeatureRecord> FeatureRegistry<T> {
    /// Creates an empty registry that can issue every id below
    /// [`FeatureId::INVALID`].
    pub fn new() -> Self {
        Self::with_limit(u32::MAX)
    }

    /// Creates an empty registry that holds at most `limit` records.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            records: Vec::new(),
            name_to_id: HashMap::new(),
            limit,
        }
    }

    /// An empty record of `kind`. Nothing is registered.
    pub fn create(&self, kind: T::Kind) -> T {
        T::create(kind)
    }

    /// Parses `kind` and creates an empty record of it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownVariant`] for an unknown kind name.
    pub fn create_from_str(&self, kind: &str) -> Result<T, ValidationError> {
        T::Kind::parse(kind).map(T::create)
    }

    /// Takes ownership of `record` and assigns it the next id.
    ///
    /// # Errors
    ///
    /// On rejection the record is handed back inside [`Rejected`] and no id
    /// is consumed.
    pub fn add(&mut self, mut record: T) -> Result<FeatureId, Rejected<T>> {
        if let Err(error) = self.check(&record) {
            tracing::error!("{} registration rejected: {}", T::LABEL, error);
            return Err(Rejected { record, error });
        }

        let id = self.next_id();
        record.set_id(id);
        if !record.name().is_empty() {
            self.name_to_id
                .entry(record.name().to_string())
                .or_insert(id);
        }
        tracing::debug!("registered {} '{}' as {}", T::LABEL, record.name(), id);
        self.records.push(record);
        Ok(id)
    }

    fn check(&self, record: &T) -> Result<(), RegistryError> {
        if self.records.len() as u64 >= self.limit as u64 {
            return Err(RegistryError::Full {
                label: T::LABEL,
                limit: self.limit,
            });
        }
        if T::UNIQUE_NAMES {
            if record.name().is_empty() {
                return Err(RegistryError::EmptyName(T::LABEL));
            }
            if self.name_to_id.contains_key(record.name()) {
                return Err(RegistryError::DuplicateName {
                    label: T::LABEL,
                    name: record.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// The id the next successful [`add`](Self::add) will return.
    pub fn next_id(&self) -> FeatureId {
        FeatureId(self.records.len() as u32)
    }

    pub fn get(&self, id: FeatureId) -> Option<&T> {
        self.records.get(id.0 as usize)
    }

    /// First record registered under `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&T> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn id_of(&self, name: &str) -> Option<FeatureId> {
        self.name_to_id.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }
}

impl<T: FeatureRecord> Default for FeatureRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
