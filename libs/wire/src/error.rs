//! Error types for wire serialization and schema generation.

use thiserror::Error;

/// Errors surfaced while writing a serialized document.
#[derive(Debug, Error)]
pub enum WireError {
    /// The JSON writer failed.
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration faults detected while building a schema catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two different types were documented under the same component name.
    #[error("schema component '{name}' is claimed by more than one type")]
    ConflictingComponent { name: &'static str },

    /// Two fields of one component map to the same wire name.
    #[error("schema component '{component}' has more than one field named '{field}' on the wire")]
    DuplicateField {
        component: &'static str,
        field: String,
    },
}
