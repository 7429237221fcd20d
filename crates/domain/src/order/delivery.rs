//! Order delivery aggregate.

use common::{DeliveryId, Entity};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::Money;

/// Full delivery address.
///
/// All fields are mandatory except `complement`, which must be non-blank
/// when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Address {
    /// Accumulates all address validation errors.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mandatory = [
            (&self.street, "street"),
            (&self.number, "number"),
            (&self.district, "district"),
            (&self.city, "city"),
            (&self.state, "state"),
            (&self.zip_code, "zipCode"),
        ];
        for (value, field) in mandatory {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(format!("{field} must not be blank")));
            }
        }
        if let Some(complement) = &self.complement
            && complement.trim().is_empty()
        {
            errors.push(ValidationError::new("complement must not be blank"));
        }
        errors
    }
}

/// Delivery aggregate holding the freight quote and destination address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDelivery {
    entity: Entity<DeliveryId>,
    freight_type: String,
    freight_price: Money,
    delivery_estimated: u32,
    address: Address,
}

impl OrderDelivery {
    /// Creates a delivery from a freight quote and a destination address.
    pub fn new(
        freight_type: impl Into<String>,
        freight_price: Money,
        delivery_estimated: u32,
        address: Address,
    ) -> Self {
        Self {
            entity: Entity::new(DeliveryId::new()),
            freight_type: freight_type.into(),
            freight_price,
            delivery_estimated,
            address,
        }
    }

    /// Returns the delivery identity.
    pub fn id(&self) -> DeliveryId {
        self.entity.id()
    }

    /// Returns the freight type.
    pub fn freight_type(&self) -> &str {
        &self.freight_type
    }

    /// Returns the freight price.
    pub fn freight_price(&self) -> Money {
        self.freight_price
    }

    /// Returns the estimated delivery time in days.
    pub fn delivery_estimated(&self) -> u32 {
        self.delivery_estimated
    }

    /// Returns the destination address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Accumulates all delivery validation errors, including address errors.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.freight_type.trim().is_empty() {
            errors.push(ValidationError::new("freightType must not be blank"));
        }
        if !self.freight_price.is_positive() {
            errors.push(ValidationError::new("freightPrice must be greater than 0"));
        }
        if self.delivery_estimated == 0 {
            errors.push(ValidationError::new(
                "deliveryEstimated must be greater than 0",
            ));
        }
        errors.extend(self.address.validate());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_address() -> Address {
        Address {
            street: "Baker Street".to_string(),
            number: "221B".to_string(),
            complement: None,
            district: "Marylebone".to_string(),
            city: "London".to_string(),
            state: "LDN".to_string(),
            zip_code: "NW1 6XE".to_string(),
        }
    }

    #[test]
    fn valid_delivery_has_no_errors() {
        let delivery = OrderDelivery::new("express", Money::from_cents(1500), 3, valid_address());
        assert!(delivery.validate().is_empty());
    }

    #[test]
    fn address_accumulates_all_blank_fields() {
        let address = Address {
            street: String::new(),
            number: String::new(),
            complement: None,
            district: "Marylebone".to_string(),
            city: "London".to_string(),
            state: "LDN".to_string(),
            zip_code: String::new(),
        };

        let errors = address.validate();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "street must not be blank",
                "number must not be blank",
                "zipCode must not be blank",
            ]
        );
    }

    #[test]
    fn blank_complement_is_rejected_when_present() {
        let mut address = valid_address();
        address.complement = Some("  ".to_string());

        let errors = address.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "complement must not be blank");
    }

    #[test]
    fn zero_freight_price_and_estimate_are_rejected() {
        let delivery = OrderDelivery::new("express", Money::zero(), 0, valid_address());

        let messages: Vec<_> = delivery
            .validate()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "freightPrice must be greater than 0",
                "deliveryEstimated must be greater than 0",
            ]
        );
    }
}
