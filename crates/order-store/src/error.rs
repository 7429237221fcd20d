//! Store error types.

use common::{OrderId, Version};
use thiserror::Error;

/// Errors from non-transactional store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Classified failure of an atomic commit.
///
/// Callers treat `Conflict` and `Unexpected` differently (HTTP 409 vs 500
/// equivalents), so the two are never collapsed into one variant.
#[derive(Debug, Error)]
pub enum TransactionFailure {
    /// The order was concurrently modified: the expected version did not
    /// match the stored one.
    #[error(
        "concurrent modification of order {order_id}: expected version {expected}, found {actual}"
    )]
    Conflict {
        order_id: OrderId,
        expected: Version,
        actual: Version,
    },

    /// Any other failure during the commit.
    #[error("unexpected transaction failure: {0}")]
    Unexpected(String),
}

impl TransactionFailure {
    /// Returns true if this failure was caused by concurrent modification.
    pub fn is_conflict(&self) -> bool {
        matches!(self, TransactionFailure::Conflict { .. })
    }
}
