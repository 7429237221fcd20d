//! Order aggregate implementation.

use common::{DeliveryId, Entity, OrderId, PaymentId, Version};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ValidationError};

use super::{Money, OrderCode, OrderDelivery, OrderItem, OrderStatus};

/// Order aggregate root.
///
/// Holds the items, coupon, delivery and payment references and the computed
/// total. Construction requires a delivery (the freight price is needed to
/// compute totals); a missing payment is tolerated at construction time and
/// surfaces later through [`Order::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    entity: Entity<OrderId>,
    code: OrderCode,
    status: OrderStatus,
    customer_id: String,
    coupon_code: Option<String>,
    coupon_percentage: f64,
    order_delivery_id: Option<DeliveryId>,
    order_payment_id: Option<PaymentId>,
    /// None until `calculate_total_amount` runs. Adding items does not
    /// compute totals; validation rejects an order whose totals were never
    /// computed.
    total_amount: Option<Money>,
    items: Vec<OrderItem>,
}

impl Order {
    /// Creates a new order in `WaitingPayment` status.
    ///
    /// Fails with [`DomainError::MissingDelivery`] when `delivery` is absent.
    /// A missing `payment_id` is accepted here and reported as a validation
    /// error by [`Order::validate`] instead.
    pub fn new(
        code: OrderCode,
        customer_id: impl Into<String>,
        coupon_code: Option<String>,
        coupon_percentage: f64,
        delivery: Option<&OrderDelivery>,
        payment_id: Option<PaymentId>,
    ) -> Result<Self, DomainError> {
        let delivery = delivery.ok_or(DomainError::MissingDelivery)?;

        Ok(Self {
            entity: Entity::new(OrderId::new()),
            code,
            status: OrderStatus::WaitingPayment,
            customer_id: customer_id.into(),
            coupon_code,
            coupon_percentage,
            order_delivery_id: Some(delivery.id()),
            order_payment_id: payment_id,
            total_amount: None,
            items: Vec::new(),
        })
    }

    /// Adds an item to the order.
    ///
    /// A SKU already present in the order is a fatal
    /// [`DomainError::DuplicateItem`], signalling an integration bug rather
    /// than bad user input.
    pub fn add_item(&mut self, item: OrderItem) -> Result<(), DomainError> {
        if self.items.iter().any(|i| i.sku() == item.sku()) {
            return Err(DomainError::DuplicateItem {
                sku: item.sku().to_string(),
            });
        }
        self.items.push(item);
        self.entity.touch();
        Ok(())
    }

    /// Computes the order total: item totals plus freight, minus the coupon
    /// discount when a coupon is present.
    ///
    /// Must be called before [`Order::validate`] passes; adding items alone
    /// leaves the total uncomputed.
    pub fn calculate_total_amount(&mut self, delivery: &OrderDelivery) {
        let mut total = self
            .items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.total());
        total += delivery.freight_price();

        if self.coupon_code.is_some() {
            total -= total.percent(self.coupon_percentage);
        }

        self.total_amount = Some(total);
        self.entity.touch();
    }

    /// Replaces the coupon fields.
    ///
    /// A `None` code clears the coupon and forces the percentage to 0; this
    /// is how a previously matched coupon is rolled back. Applying the same
    /// arguments twice has the same effect as applying them once.
    pub fn apply_coupon(&mut self, code: Option<String>, percentage: f64) {
        match code {
            Some(code) => {
                self.coupon_code = Some(code);
                self.coupon_percentage = percentage;
            }
            None => {
                self.coupon_code = None;
                self.coupon_percentage = 0.0;
            }
        }
        self.entity.touch();
    }

    /// Accumulates all applicable validation errors.
    ///
    /// This never fails fast: every violated rule is reported, in a fixed
    /// order so callers and tests see deterministic error lists.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.customer_id.trim().is_empty() {
            errors.push(ValidationError::new("customerId must not be blank"));
        }
        if let Some(code) = &self.coupon_code
            && code.trim().is_empty()
        {
            errors.push(ValidationError::new("couponCode must not be blank"));
        }
        if self.coupon_percentage < 0.0 {
            errors.push(ValidationError::new(
                "couponPercentage must not be negative",
            ));
        }
        if self.order_delivery_id.is_none() {
            errors.push(ValidationError::new("orderDeliveryId must not be null"));
        }
        if self.order_payment_id.is_none() {
            errors.push(ValidationError::new("orderPaymentId must not be null"));
        }
        if self.items.is_empty() {
            errors.push(ValidationError::new("items must not be empty"));
        }
        if !self.total_amount.is_some_and(|t| t.is_positive()) {
            errors.push(ValidationError::new("totalAmount must be greater than 0"));
        }

        errors
    }
}

// Query methods
impl Order {
    /// Returns the order identity.
    pub fn id(&self) -> OrderId {
        self.entity.id()
    }

    /// Returns the current version for optimistic concurrency.
    pub fn version(&self) -> Version {
        self.entity.version()
    }

    /// Sets the version after a successful persist.
    pub fn set_version(&mut self, version: Version) {
        self.entity.set_version(version);
    }

    /// Returns the human-readable order code.
    pub fn code(&self) -> &OrderCode {
        &self.code
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the customer identity.
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Returns the coupon code, if any.
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    /// Returns the coupon percentage (0 when no coupon is applied).
    pub fn coupon_percentage(&self) -> f64 {
        self.coupon_percentage
    }

    /// Returns the delivery identity.
    pub fn delivery_id(&self) -> Option<DeliveryId> {
        self.order_delivery_id
    }

    /// Returns the payment identity.
    pub fn payment_id(&self) -> Option<PaymentId> {
        self.order_payment_id
    }

    /// Returns the computed total, or zero when totals were never computed.
    ///
    /// Amounts are cents-based, so the value is always exact to two decimals.
    pub fn total_amount(&self) -> Money {
        self.total_amount.unwrap_or_else(Money::zero)
    }

    /// Returns the items in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns when the order was created.
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.entity.created_at()
    }

    /// Returns when the order was last mutated.
    pub fn updated_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.entity.updated_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Address;

    fn delivery() -> OrderDelivery {
        OrderDelivery::new(
            "express",
            Money::from_cents(1500),
            3,
            Address {
                street: "Baker Street".to_string(),
                number: "221B".to_string(),
                complement: None,
                district: "Marylebone".to_string(),
                city: "London".to_string(),
                state: "LDN".to_string(),
                zip_code: "NW1 6XE".to_string(),
            },
        )
    }

    fn item(order_id: OrderId, sku: &str, quantity: u32, cents: i64) -> OrderItem {
        OrderItem::new(order_id, "prod-1", sku, quantity, Money::from_cents(cents)).unwrap()
    }

    fn new_order(delivery: &OrderDelivery) -> Order {
        Order::new(
            OrderCode::with_year(0, 2024),
            "customer-1",
            None,
            0.0,
            Some(delivery),
            Some(PaymentId::new()),
        )
        .unwrap()
    }

    #[test]
    fn missing_delivery_is_fatal() {
        let result = Order::new(
            OrderCode::with_year(0, 2024),
            "customer-1",
            None,
            0.0,
            None,
            Some(PaymentId::new()),
        );
        assert!(matches!(result, Err(DomainError::MissingDelivery)));
    }

    #[test]
    fn missing_payment_is_recoverable() {
        let d = delivery();
        let mut order = Order::new(
            OrderCode::with_year(0, 2024),
            "customer-1",
            None,
            0.0,
            Some(&d),
            None,
        )
        .unwrap();
        order
            .add_item(item(order.id(), "SKU-001", 2, 1000))
            .unwrap();
        order.calculate_total_amount(&d);

        let errors = order.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "orderPaymentId must not be null");
    }

    #[test]
    fn duplicate_sku_is_fatal_regardless_of_insertion_order() {
        let d = delivery();
        let mut order = new_order(&d);
        let order_id = order.id();

        order.add_item(item(order_id, "SKU-001", 2, 1000)).unwrap();
        order.add_item(item(order_id, "SKU-002", 1, 500)).unwrap();

        let result = order.add_item(item(order_id, "SKU-001", 9, 1));
        assert!(matches!(
            result,
            Err(DomainError::DuplicateItem { ref sku }) if sku == "SKU-001"
        ));
        assert_eq!(order.item_count(), 2);
    }

    #[test]
    fn total_is_items_plus_freight() {
        let d = delivery();
        let mut order = new_order(&d);
        let order_id = order.id();

        order.add_item(item(order_id, "SKU-001", 2, 1000)).unwrap();
        order.add_item(item(order_id, "SKU-002", 3, 250)).unwrap();
        order.calculate_total_amount(&d);

        // 2*1000 + 3*250 + 1500 freight
        assert_eq!(order.total_amount().cents(), 4250);
    }

    #[test]
    fn coupon_discount_is_subtracted_with_half_up_rounding() {
        let d = delivery();
        let mut order = Order::new(
            OrderCode::with_year(0, 2024),
            "customer-1",
            Some("TENOFF".to_string()),
            10.0,
            Some(&d),
            Some(PaymentId::new()),
        )
        .unwrap();
        let order_id = order.id();

        order.add_item(item(order_id, "SKU-001", 1, 1005)).unwrap();
        order.calculate_total_amount(&d);

        // 1005 + 1500 = 2505; 10% = 250.5 rounds to 251; 2505 - 251 = 2254
        assert_eq!(order.total_amount().cents(), 2254);
    }

    #[test]
    fn clearing_coupon_is_idempotent() {
        let d = delivery();
        let mut order = Order::new(
            OrderCode::with_year(0, 2024),
            "customer-1",
            Some("TENOFF".to_string()),
            10.0,
            Some(&d),
            Some(PaymentId::new()),
        )
        .unwrap();

        order.apply_coupon(None, 10.0);
        assert_eq!(order.coupon_code(), None);
        assert_eq!(order.coupon_percentage(), 0.0);

        order.apply_coupon(None, 99.0);
        assert_eq!(order.coupon_code(), None);
        assert_eq!(order.coupon_percentage(), 0.0);
    }

    #[test]
    fn validate_accumulates_all_errors_in_order() {
        let d = delivery();
        let order = Order::new(
            OrderCode::with_year(0, 2024),
            "  ",
            Some(String::new()),
            -1.0,
            Some(&d),
            None,
        )
        .unwrap();

        let messages: Vec<_> = order.validate().into_iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            vec![
                "customerId must not be blank",
                "couponCode must not be blank",
                "couponPercentage must not be negative",
                "orderPaymentId must not be null",
                "items must not be empty",
                "totalAmount must be greater than 0",
            ]
        );
    }

    #[test]
    fn uncomputed_total_fails_validation_even_with_items() {
        let d = delivery();
        let mut order = new_order(&d);
        let order_id = order.id();
        order.add_item(item(order_id, "SKU-001", 2, 1000)).unwrap();

        // calculate_total_amount deliberately not called
        let errors = order.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "totalAmount must be greater than 0");
    }

    #[test]
    fn valid_order_passes_validation() {
        let d = delivery();
        let mut order = new_order(&d);
        let order_id = order.id();
        order.add_item(item(order_id, "SKU-001", 2, 1000)).unwrap();
        order.calculate_total_amount(&d);

        assert!(order.validate().is_empty());
        assert_eq!(order.status(), OrderStatus::WaitingPayment);
    }

    #[test]
    fn mutations_advance_updated_at() {
        let d = delivery();
        let mut order = new_order(&d);
        let order_id = order.id();
        let before = order.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(2));
        order.add_item(item(order_id, "SKU-001", 2, 1000)).unwrap();

        assert!(order.updated_at() > before);
        assert_eq!(order.created_at(), order.created_at());
    }

    #[test]
    fn serialization_roundtrip() {
        let d = delivery();
        let mut order = new_order(&d);
        let order_id = order.id();
        order.add_item(item(order_id, "SKU-001", 2, 1000)).unwrap();
        order.calculate_total_amount(&d);

        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.id(), order.id());
        assert_eq!(deserialized.item_count(), 1);
        assert_eq!(deserialized.total_amount(), order.total_amount());
    }
}
