//! Domain events recorded through the transactional outbox.

use common::OrderId;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::Order;

/// Trait for domain events.
///
/// Events represent facts that have happened and are named in past tense.
/// The event type string is the discriminator the delivery pipeline uses to
/// route a record to its handler.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;
}

/// One item of an order as recorded in the creation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedItem {
    pub sku: String,
    pub product_id: String,
    pub quantity: u32,
}

/// Recorded when an order is successfully committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub order_code: String,
    pub customer_id: String,
    pub total_amount_cents: i64,
    pub items: Vec<OrderCreatedItem>,
}

impl OrderCreated {
    /// Builds the event from a committed order.
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id(),
            order_code: order.code().to_string(),
            customer_id: order.customer_id().to_string(),
            total_amount_cents: order.total_amount().cents(),
            items: order
                .items()
                .iter()
                .map(|item| OrderCreatedItem {
                    sku: item.sku().to_string(),
                    product_id: item.product_id().to_string(),
                    quantity: item.quantity(),
                })
                .collect(),
        }
    }
}

impl DomainEvent for OrderCreated {
    fn event_type(&self) -> &'static str {
        "OrderCreated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Address, Money, OrderCode, OrderDelivery, OrderItem};
    use common::PaymentId;

    fn build_order() -> Order {
        let delivery = OrderDelivery::new(
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
        );
        let mut order = Order::new(
            OrderCode::with_year(0, 2024),
            "customer-1",
            None,
            0.0,
            Some(&delivery),
            Some(PaymentId::new()),
        )
        .unwrap();
        let order_id = order.id();
        order
            .add_item(
                OrderItem::new(order_id, "prod-1", "SKU-001", 2, Money::from_cents(1000)).unwrap(),
            )
            .unwrap();
        order.calculate_total_amount(&delivery);
        order
    }

    #[test]
    fn event_captures_order_snapshot() {
        let order = build_order();
        let event = OrderCreated::from_order(&order);

        assert_eq!(event.order_id, order.id());
        assert_eq!(event.order_code, "2024000000001");
        assert_eq!(event.total_amount_cents, 3500);
        assert_eq!(event.items.len(), 1);
        assert_eq!(event.items[0].sku, "SKU-001");
        assert_eq!(event.event_type(), "OrderCreated");
    }

    #[test]
    fn event_serialization_roundtrip() {
        let event = OrderCreated::from_order(&build_order());
        let json = serde_json::to_value(&event).unwrap();
        let back: OrderCreated = serde_json::from_value(json).unwrap();
        assert_eq!(event, back);
    }
}
