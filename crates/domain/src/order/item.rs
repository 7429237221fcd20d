//! Order item value object.

use common::{OrderId, OrderItemId};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::{Money, Sku};

/// An item in an order.
///
/// Items are unique within an order by SKU. Equality is by item identity,
/// not by field values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    order_item_id: OrderItemId,
    order_id: OrderId,
    product_id: String,
    sku: Sku,
    quantity: u32,
    unit_price: Money,
}

impl OrderItem {
    /// Creates a new order item, checking each field.
    ///
    /// Fields are checked in a fixed order (product id, sku, quantity, price)
    /// and the first violation is returned, naming exactly that field.
    pub fn new(
        order_id: OrderId,
        product_id: impl Into<String>,
        sku: impl Into<Sku>,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self, ValidationError> {
        let product_id = product_id.into();
        let sku = sku.into();

        if product_id.trim().is_empty() {
            return Err(ValidationError::new("productId must not be blank"));
        }
        if sku.is_blank() {
            return Err(ValidationError::new("sku must not be blank"));
        }
        if quantity == 0 {
            return Err(ValidationError::new("quantity must be greater than 0"));
        }
        if !unit_price.is_positive() {
            return Err(ValidationError::new("price must be greater than 0"));
        }

        Ok(Self {
            order_item_id: OrderItemId::new(),
            order_id,
            product_id,
            sku,
            quantity,
            unit_price,
        })
    }

    /// Returns the item identity.
    pub fn id(&self) -> OrderItemId {
        self.order_item_id
    }

    /// Returns the order this item belongs to.
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Returns the product identity.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Returns the SKU.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Returns the quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the unit price.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Returns the total price for this item (price × quantity).
    pub fn total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

impl PartialEq for OrderItem {
    fn eq(&self, other: &Self) -> bool {
        self.order_item_id == other.order_item_id
    }
}

impl Eq for OrderItem {}

impl std::hash::Hash for OrderItem {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.order_item_id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_item() -> OrderItem {
        OrderItem::new(
            OrderId::new(),
            "prod-1",
            "SKU-001",
            2,
            Money::from_cents(1000),
        )
        .unwrap()
    }

    #[test]
    fn total_is_price_times_quantity() {
        let item = valid_item();
        assert_eq!(item.total().cents(), 2000);
    }

    #[test]
    fn blank_product_id_names_the_field() {
        let err = OrderItem::new(
            OrderId::new(),
            "  ",
            "SKU-001",
            2,
            Money::from_cents(1000),
        )
        .unwrap_err();
        assert_eq!(err.message, "productId must not be blank");
    }

    #[test]
    fn blank_sku_names_the_field() {
        let err =
            OrderItem::new(OrderId::new(), "prod-1", "", 2, Money::from_cents(1000)).unwrap_err();
        assert_eq!(err.message, "sku must not be blank");
    }

    #[test]
    fn zero_quantity_names_the_field() {
        let err = OrderItem::new(
            OrderId::new(),
            "prod-1",
            "SKU-001",
            0,
            Money::from_cents(1000),
        )
        .unwrap_err();
        assert_eq!(err.message, "quantity must be greater than 0");
    }

    #[test]
    fn non_positive_price_names_the_field() {
        let err = OrderItem::new(OrderId::new(), "prod-1", "SKU-001", 2, Money::zero()).unwrap_err();
        assert_eq!(err.message, "price must be greater than 0");
    }

    #[test]
    fn equality_is_by_identity() {
        let order_id = OrderId::new();
        let a = OrderItem::new(order_id, "prod-1", "SKU-001", 2, Money::from_cents(1000)).unwrap();
        let b = OrderItem::new(order_id, "prod-1", "SKU-001", 2, Money::from_cents(1000)).unwrap();

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
