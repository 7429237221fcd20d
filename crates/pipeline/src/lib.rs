//! Event delivery pipeline.
//!
//! Publishes transactional-outbox rows to a primary topic and consumes them
//! through a bounded retry ladder:
//!
//! 1. The [`OutboxPublisher`] streams pending rows oldest-first, wraps each
//!    in a [`MessageEnvelope`] and deletes the row after a successful
//!    hand-off to the broker.
//! 2. The [`EventConsumer`] dispatches each delivery to a domain handler
//!    selected by the record's event type. Stale events are acknowledged
//!    and discarded without processing; unknown event types are silently
//!    ignored.
//! 3. A handler failure forwards the message to the next topic in the
//!    [`RetryTopology`] ladder; after the ladder is exhausted the message
//!    parks in the dead-letter topic, whose deliveries re-enter normal
//!    dispatch.

pub mod broker;
pub mod config;
pub mod consumer;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod publisher;
pub mod topics;

pub use broker::{Delivery, InMemoryBroker, MessageBroker, TimestampType};
pub use config::PipelineConfig;
pub use consumer::{Disposition, EventConsumer};
pub use envelope::{ChangePayload, MessageEnvelope, Operation};
pub use error::PipelineError;
pub use handlers::{EventHandler, InMemoryStockGateway, StockGateway, StockReleaseHandler};
pub use publisher::OutboxPublisher;
pub use topics::RetryTopology;
