//! Registry and validation errors.

/// Structural rejection by a [`FeatureRegistry`](crate::FeatureRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The kind requires a name and none was given.
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),
    /// The kind requires unique names and this one is taken.
    #[error("duplicate {label} name: {name}")]
    DuplicateName { label: &'static str, name: String },
    /// No identifiers are left.
    #[error("{label} registry is full ({limit} entries)")]
    Full { label: &'static str, limit: u32 },
}

/// A registration field is malformed or out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// An enum-like string field named no known variant.
    #[error("unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },
    /// A field that must be greater than zero was not.
    #[error("{field} must be greater than 0 (got {value})")]
    NotPositive { field: &'static str, value: i64 },
    /// A field that must not be negative was.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
    /// A min/max pair is inverted.
    #[error("{field}: min {min} is greater than max {max}")]
    InvertedRange { field: &'static str, min: i64, max: i64 },
    /// A required field or list is missing or empty.
    #[error("{0} must be given")]
    Missing(&'static str),
    /// The variant exists but this layer cannot register it.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}
