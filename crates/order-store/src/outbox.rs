//! Outbox event records.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::EventId;
use domain::DomainEvent;
use futures_core::Stream;
use serde::{Deserialize, Serialize};

use crate::{Result, StoreError};

/// Durable representation of a domain event awaiting publication.
///
/// Rows are created inside the same unit of work as the aggregate write
/// (transactional outbox), read by the publisher, and deleted after a
/// successful hand-off to the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEvent {
    /// Unique identifier of this outbox row.
    pub id: EventId,

    /// Identity of the aggregate the event belongs to.
    pub aggregate_id: String,

    /// Event type discriminator selecting the downstream handler.
    pub event_type: String,

    /// The serialized event payload.
    pub payload: serde_json::Value,

    /// When the event occurred. Drives the stale-event policy downstream.
    pub occurred_on: DateTime<Utc>,
}

impl OutboxEvent {
    /// Creates an outbox row from raw parts.
    pub fn new(
        aggregate_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            aggregate_id: aggregate_id.into(),
            event_type: event_type.into(),
            payload,
            occurred_on: Utc::now(),
        }
    }

    /// Creates an outbox row by serializing a domain event.
    pub fn from_domain_event<E: DomainEvent>(
        aggregate_id: impl Into<String>,
        event: &E,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(Self::new(
            aggregate_id,
            event.event_type(),
            serde_json::to_value(event)?,
        ))
    }
}

/// A stream of pending outbox events.
pub type OutboxStream = Pin<Box<dyn Stream<Item = std::result::Result<OutboxEvent, StoreError>> + Send>>;

/// Read/delete side of the outbox, used by the delivery pipeline.
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Returns all pending outbox rows, oldest first.
    async fn pending(&self) -> Result<Vec<OutboxEvent>>;

    /// Streams all pending outbox rows, oldest first.
    async fn stream_pending(&self) -> Result<OutboxStream>;

    /// Removes a row after it was handed to the broker.
    async fn remove(&self, id: EventId) -> Result<()>;
}
