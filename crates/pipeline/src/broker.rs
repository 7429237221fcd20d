//! Message broker contract and in-memory implementation.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::envelope::MessageEnvelope;
use crate::error::PipelineError;

/// Whether a delivery timestamp is the producer's or the broker's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampType {
    CreateTime,
    LogAppendTime,
}

/// One delivery of a message, with full broker metadata so handlers can log
/// and route deterministically and tests can assert the exact topic
/// sequence traversed.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Topic the message was consumed from.
    pub topic: String,
    /// Partition within the topic.
    pub partition: i32,
    /// Offset within the partition.
    pub offset: i64,
    /// Delivery timestamp.
    pub timestamp: DateTime<Utc>,
    /// What the timestamp refers to.
    pub timestamp_type: TimestampType,
    /// The message itself.
    pub envelope: MessageEnvelope,
}

/// Publish side of a message broker.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publishes an envelope to a topic.
    async fn publish(&self, topic: &str, envelope: MessageEnvelope) -> Result<(), PipelineError>;
}

#[derive(Debug, Default)]
struct BrokerState {
    queues: HashMap<String, VecDeque<Delivery>>,
    offsets: HashMap<String, i64>,
    /// Every topic published to, in order.
    journal: Vec<String>,
    fail_next_publish: bool,
}

/// In-memory single-partition broker for testing.
///
/// Messages are delivered one at a time per topic in publish order. The
/// publish journal records the exact topic sequence for assertions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBroker {
    state: Arc<RwLock<BrokerState>>,
}

impl InMemoryBroker {
    /// Creates a new empty broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the oldest undelivered message on `topic`.
    pub fn poll(&self, topic: &str) -> Option<Delivery> {
        let mut state = self.state.write().unwrap();
        state.queues.get_mut(topic)?.pop_front()
    }

    /// Returns the number of undelivered messages on `topic`.
    pub fn depth(&self, topic: &str) -> usize {
        let state = self.state.read().unwrap();
        state.queues.get(topic).map_or(0, VecDeque::len)
    }

    /// Returns every topic published to, in publish order.
    pub fn published_topics(&self) -> Vec<String> {
        self.state.read().unwrap().journal.clone()
    }

    /// Configures the broker to fail the next publish.
    pub fn set_fail_next_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_next_publish = fail;
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn publish(&self, topic: &str, envelope: MessageEnvelope) -> Result<(), PipelineError> {
        let mut state = self.state.write().unwrap();

        if state.fail_next_publish {
            state.fail_next_publish = false;
            return Err(PipelineError::Broker("broker unavailable".to_string()));
        }

        let offset = state.offsets.entry(topic.to_string()).or_insert(0);
        let delivery = Delivery {
            topic: topic.to_string(),
            partition: 0,
            offset: *offset,
            timestamp: Utc::now(),
            timestamp_type: TimestampType::CreateTime,
            envelope,
        };
        *offset += 1;

        state.journal.push(topic.to_string());
        state
            .queues
            .entry(topic.to_string())
            .or_default()
            .push_back(delivery);
        Ok(())
    }
}
