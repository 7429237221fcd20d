//! Saga error types.

use domain::{DomainError, ValidationError};
use order_store::{StoreError, TransactionFailure};
use thiserror::Error;

/// Errors that can occur while creating an order.
///
/// Three tiers, never conflated: not-found errors are fatal and abort the
/// saga before further collaborators are called; `Invalid` carries the
/// accumulated soft validation errors and means the transaction manager was
/// never invoked; `Transaction` wraps the classified commit failure.
#[derive(Debug, Error)]
pub enum CreateOrderError {
    /// The referenced customer does not exist.
    #[error("customer not found: {0}")]
    CustomerNotFound(String),

    /// One or more requested SKUs have no product details.
    #[error("no product details found")]
    ProductsNotFound { skus: Vec<String> },

    /// The command or the built order violated business rules. Soft failure:
    /// nothing was persisted.
    #[error("invalid order: {}", format_messages(.0))]
    Invalid(Vec<ValidationError>),

    /// Customer gateway error.
    #[error("customer gateway error: {0}")]
    CustomerGateway(String),

    /// Product gateway error.
    #[error("product gateway error: {0}")]
    ProductGateway(String),

    /// Freight gateway error.
    #[error("freight gateway error: {0}")]
    FreightGateway(String),

    /// Coupon gateway error.
    #[error("coupon gateway error: {0}")]
    CouponGateway(String),

    /// Domain error raised while building the aggregate.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The atomic commit failed. Carries the conflict/unexpected
    /// classification for the caller.
    #[error("transaction failure: {0}")]
    Transaction(#[from] TransactionFailure),

    /// Store error outside the commit (e.g. reading the order sequence).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CreateOrderError {
    /// Returns the validation errors when this is a soft failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            CreateOrderError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, CreateOrderError>;
