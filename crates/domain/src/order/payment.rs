//! Order payment aggregate.

use common::{Entity, PaymentId};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Payment registration for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayment {
    entity: Entity<PaymentId>,
    payment_method_id: String,
    installments: u32,
}

impl OrderPayment {
    /// Creates a payment for the given method and installment count.
    pub fn new(payment_method_id: impl Into<String>, installments: u32) -> Self {
        Self {
            entity: Entity::new(PaymentId::new()),
            payment_method_id: payment_method_id.into(),
            installments,
        }
    }

    /// Returns the payment identity.
    pub fn id(&self) -> PaymentId {
        self.entity.id()
    }

    /// Returns the payment method identity.
    pub fn payment_method_id(&self) -> &str {
        &self.payment_method_id
    }

    /// Returns the installment count.
    pub fn installments(&self) -> u32 {
        self.installments
    }

    /// Accumulates all payment validation errors.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.payment_method_id.trim().is_empty() {
            errors.push(ValidationError::new("paymentMethodId must not be blank"));
        }
        errors
    }
}
