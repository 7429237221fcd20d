//! Consumer side of the delivery pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::broker::{Delivery, MessageBroker};
use crate::error::PipelineError;
use crate::handlers::EventHandler;
use crate::topics::RetryTopology;

/// What the consumer did with a delivery. In every case the message leaves
/// its current topic: handled, discarded, forwarded down the ladder, or
/// parked at the end of it. Nothing is ever lost mid-ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// A handler processed the event successfully.
    Handled,
    /// The event was older than the stale threshold and was discarded
    /// without invoking any handler.
    DiscardedStale,
    /// No handler is registered for the event type, or the envelope carried
    /// no record. Silently ignored.
    Ignored,
    /// The handler failed; the message was forwarded to the next topic in
    /// the ladder.
    Forwarded { topic: String },
    /// The handler failed on the dead-letter topic; the failure was logged
    /// and the message acknowledged.
    Parked,
}

/// Processes deliveries from the topic ladder.
///
/// Messages on retry topics and the dead-letter topic re-enter the same
/// dispatch as primary-topic messages; the only difference is where a
/// failure forwards to. On the dead-letter topic there is no next hop, so a
/// failure there is logged and the message acknowledged.
pub struct EventConsumer<B: MessageBroker> {
    broker: B,
    topology: RetryTopology,
    stale_after: Duration,
    handlers: HashMap<&'static str, Arc<dyn EventHandler>>,
}

impl<B: MessageBroker> EventConsumer<B> {
    /// Creates a consumer with no handlers registered.
    pub fn new(broker: B, topology: RetryTopology, stale_after: Duration) -> Self {
        Self {
            broker,
            topology,
            stale_after,
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler under its event type.
    pub fn register(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.insert(handler.event_type(), handler);
    }

    /// Returns the topology this consumer routes with.
    pub fn topology(&self) -> &RetryTopology {
        &self.topology
    }

    /// Processes one delivery.
    ///
    /// Only infrastructure errors (forwarding to the broker) propagate;
    /// handler errors become ladder hops.
    #[tracing::instrument(
        skip(self, delivery),
        fields(topic = %delivery.topic, partition = delivery.partition, offset = delivery.offset)
    )]
    pub async fn handle(&self, delivery: Delivery) -> Result<Disposition, PipelineError> {
        metrics::counter!("pipeline_deliveries_total").increment(1);

        let Some(record) = delivery.envelope.record() else {
            return Ok(Disposition::Ignored);
        };

        let age = Utc::now() - record.occurred_on;
        if age > self.stale_after {
            metrics::counter!("pipeline_stale_discarded").increment(1);
            tracing::warn!(
                event_id = %record.id,
                age_days = age.num_days(),
                "discarding stale event"
            );
            return Ok(Disposition::DiscardedStale);
        }

        // Unknown event types are tolerated for schema evolution.
        let Some(handler) = self.handlers.get(record.event_type.as_str()) else {
            return Ok(Disposition::Ignored);
        };

        match handler.handle(record).await {
            Ok(()) => {
                metrics::counter!("pipeline_handled").increment(1);
                Ok(Disposition::Handled)
            }
            Err(error) => match self.topology.next_hop(&delivery.topic) {
                Some(next) => {
                    metrics::counter!("pipeline_retries").increment(1);
                    tracing::warn!(%error, next_topic = %next, "handler failed, forwarding");
                    self.broker
                        .publish(&next, delivery.envelope.clone())
                        .await?;
                    Ok(Disposition::Forwarded { topic: next })
                }
                None => {
                    metrics::counter!("pipeline_parked").increment(1);
                    tracing::error!(
                        %error,
                        event_id = %record.id,
                        "handler failed with the ladder exhausted, acknowledging"
                    );
                    Ok(Disposition::Parked)
                }
            },
        }
    }
}
