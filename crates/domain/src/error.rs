//! Domain error types.
//!
//! Two tiers, never conflated:
//! - [`DomainError`] is fatal and signals a programming or integration bug
//!   (duplicate SKU, missing delivery at construction time).
//! - [`ValidationError`] is a soft, accumulated business-rule violation
//!   returned to the caller as a list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal domain errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An item with the same SKU was already added to the order.
    #[error("an item with SKU '{sku}' already exists in the order")]
    DuplicateItem { sku: String },

    /// An order cannot be constructed without a delivery, since the freight
    /// price is required to compute totals.
    #[error("cannot create an order without a delivery")]
    MissingDelivery,
}

/// A single accumulated validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
