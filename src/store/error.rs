//! Store error types.

use thiserror::Error;

/// Failures surfaced by the ledger store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested id has no matching row.
    #[error("row not found")]
    NotFound,

    /// An update affected an unexpected number of rows.
    #[error("update affected {rows} rows, expected 1")]
    Conflict {
        /// The actual affected-row count.
        rows: u64,
    },

    /// A fetched row could not be decoded into its entity.
    #[error("failed to decode row: {0}")]
    Decode(String),

    /// The underlying database driver failed.
    #[error("store backend failure: {0}")]
    Backend(#[from] sqlx::Error),
}

impl StoreError {
    /// Returns `true` for the not-found variant.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
