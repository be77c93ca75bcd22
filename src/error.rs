//! Error type shared by the table and the registry.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Memory for the bucket array, an entry slot or a key copy could not
    /// be reserved. The table is left exactly as it was before the call.
    #[error("allocation failed while reserving {what}")]
    AllocationFailure { what: &'static str },

    /// Delete addressed a key with no live entry.
    #[error("key not found")]
    KeyNotFound,

    #[error("keys must be non-empty")]
    EmptyKey,

    #[error("bucket count must be at least one")]
    ZeroBuckets,

    /// The handle names a table that has already been destroyed.
    #[error("table handle refers to a destroyed table")]
    Destroyed,
}

impl TableError {
    /// True for the expected, non-fatal miss outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TableError::KeyNotFound)
    }
}
