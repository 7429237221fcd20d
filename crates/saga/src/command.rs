//! Create-order command and result types.

use common::OrderId;
use domain::ValidationError;
use serde::{Deserialize, Serialize};

/// One requested order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRequest {
    /// SKU used to look up product details.
    pub sku: String,
    /// Product identity.
    pub product_id: String,
    /// Requested quantity.
    pub quantity: u32,
}

/// Command consumed by the order-creation coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderCommand {
    /// Identity of the ordering customer.
    pub customer_id: String,
    /// Optional coupon code. Blank or absent skips the coupon stage.
    pub coupon_code: Option<String>,
    /// Requested freight type (e.g. "express").
    pub freight_type: String,
    /// Payment method to charge.
    pub payment_method_id: String,
    /// Number of installments, zero allowed.
    pub installments: u32,
    /// Requested items.
    pub items: Vec<ItemRequest>,
}

impl CreateOrderCommand {
    /// Accumulates structural problems with the command itself.
    ///
    /// Runs before any collaborator is called, so a structurally invalid
    /// command produces zero gateway invocations. Checks run in a fixed
    /// order for deterministic error lists.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.customer_id.trim().is_empty() {
            errors.push(ValidationError::new("customerId must not be blank"));
        }
        if self.payment_method_id.trim().is_empty() {
            errors.push(ValidationError::new("paymentMethodId must not be blank"));
        }
        if self.freight_type.trim().is_empty() {
            errors.push(ValidationError::new("freightType must not be blank"));
        }
        if self.items.is_empty() {
            errors.push(ValidationError::new("items must not be empty"));
        }
        for item in &self.items {
            if item.product_id.trim().is_empty() {
                errors.push(ValidationError::new("productId must not be blank"));
            }
            if item.sku.trim().is_empty() {
                errors.push(ValidationError::new("sku must not be blank"));
            }
            if item.quantity == 0 {
                errors.push(ValidationError::new("quantity must be greater than 0"));
            }
        }

        errors
    }

    /// Returns true if a usable coupon code was supplied.
    pub fn has_coupon(&self) -> bool {
        self.coupon_code
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty())
    }
}

/// Result of a successful order creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedOrder {
    /// Identity of the persisted order.
    pub order_id: OrderId,
    /// Human-readable order code.
    pub order_code: String,
}
