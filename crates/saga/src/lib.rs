//! Order-creation saga.
//!
//! A single client request coordinates several independently-owned
//! collaborators: customer lookup, per-item product pricing, freight
//! calculation and optional coupon redemption. On success everything the
//! order needs (delivery, payment, items, the order row and one outbox
//! event) commits in a single atomic unit of work; on a business-rule
//! violation the accumulated error list is returned without touching
//! storage at all.

pub mod command;
pub mod coordinator;
pub mod error;
pub mod services;

pub use command::{CreateOrderCommand, CreatedOrder, ItemRequest};
pub use coordinator::CreateOrderOrchestrator;
pub use error::CreateOrderError;
pub use services::{
    AppliedCoupon, CouponGateway, Customer, CustomerGateway, Dimensions, FreightCalculator,
    FreightQuote, InMemoryCouponGateway, InMemoryCustomerGateway, InMemoryFreightCalculator,
    InMemoryProductGateway, ProductDetails, ProductGateway,
};
