//! Wire format for pipeline messages.

use order_store::OutboxEvent;
use serde::{Deserialize, Serialize};

/// Change operation carried by a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// Change payload: before/after states around an operation on the outbox
/// table, plus the source identifier of the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePayload {
    /// State before the change. Present for updates and deletes.
    pub before: Option<OutboxEvent>,
    /// State after the change. Present for creates and updates.
    pub after: Option<OutboxEvent>,
    /// Identifier of the producing source.
    pub source: String,
    /// The change operation.
    pub operation: Operation,
}

/// Outer message wrapper as it travels through the topic ladder.
///
/// The inner outbox record's `event_type` selects which domain handler
/// applies on the consumer side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub payload: ChangePayload,
}

impl MessageEnvelope {
    /// Wraps a freshly published outbox row as a CREATE change.
    pub fn creation(source: impl Into<String>, event: OutboxEvent) -> Self {
        Self {
            payload: ChangePayload {
                before: None,
                after: Some(event),
                source: source.into(),
                operation: Operation::Create,
            },
        }
    }

    /// Returns the outbox record this message is about: the after-state,
    /// except for deletes where only the before-state exists.
    pub fn record(&self) -> Option<&OutboxEvent> {
        match self.payload.operation {
            Operation::Delete => self.payload.before.as_ref(),
            Operation::Create | Operation::Update => self.payload.after.as_ref(),
        }
    }
}
