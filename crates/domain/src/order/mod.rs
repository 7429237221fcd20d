//! Order aggregate and related value objects.

mod aggregate;
mod code;
mod delivery;
mod events;
mod item;
mod payment;
mod status;
mod value_objects;

pub use aggregate::Order;
pub use code::OrderCode;
pub use delivery::{Address, OrderDelivery};
pub use events::{DomainEvent, OrderCreated, OrderCreatedItem};
pub use item::OrderItem;
pub use payment::OrderPayment;
pub use status::OrderStatus;
pub use value_objects::{Money, Sku};
