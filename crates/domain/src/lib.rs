//! Domain layer for the order system.
//!
//! This crate provides the Order aggregate and its satellites:
//! - Order aggregate root with duplicate-item protection and accumulated validation
//! - OrderItem, OrderDelivery and OrderPayment
//! - OrderCode value object (year + zero-padded sequence)
//! - Money arithmetic with half-up rounding for coupon discounts
//! - The OrderCreated domain event published through the outbox

pub mod error;
pub mod order;

pub use error::{DomainError, ValidationError};
pub use order::{
    Address, DomainEvent, Money, Order, OrderCode, OrderCreated, OrderCreatedItem, OrderDelivery,
    OrderItem, OrderPayment, OrderStatus, Sku,
};
