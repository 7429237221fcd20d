//! Shared primitives for the order system.
//!
//! This crate provides the typed identifiers used across all layers, the
//! `Version` counter for optimistic concurrency, and the generic [`Entity`]
//! value embedded by composition in every aggregate.

pub mod entity;
pub mod ids;
pub mod version;

pub use entity::Entity;
pub use ids::{CustomerId, DeliveryId, EventId, OrderId, OrderItemId, PaymentId};
pub use version::Version;
