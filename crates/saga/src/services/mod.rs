//! Collaborator gateway traits and in-memory implementations.

pub mod coupon;
pub mod customer;
pub mod freight;
pub mod product;

pub use coupon::{AppliedCoupon, CouponGateway, InMemoryCouponGateway};
pub use customer::{Customer, CustomerGateway, InMemoryCustomerGateway};
pub use freight::{FreightCalculator, FreightQuote, InMemoryFreightCalculator};
pub use product::{Dimensions, InMemoryProductGateway, ProductDetails, ProductGateway};
