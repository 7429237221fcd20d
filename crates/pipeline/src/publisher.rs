//! Outbox publisher: hands pending rows to the broker and trims them.

use futures_util::StreamExt;
use order_store::OutboxStore;

use crate::broker::MessageBroker;
use crate::envelope::MessageEnvelope;
use crate::error::PipelineError;

/// Publishes pending outbox rows to the primary topic.
///
/// Rows are deleted only after a successful hand-off, so a crash between
/// publish and delete re-publishes the row on the next run (at-least-once
/// delivery; consumers tolerate duplicates).
pub struct OutboxPublisher<O, B>
where
    O: OutboxStore,
    B: MessageBroker,
{
    outbox: O,
    broker: B,
    topic: String,
    source: String,
}

impl<O, B> OutboxPublisher<O, B>
where
    O: OutboxStore,
    B: MessageBroker,
{
    /// Creates a publisher targeting the given primary topic.
    pub fn new(outbox: O, broker: B, topic: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            outbox,
            broker,
            topic: topic.into(),
            source: source.into(),
        }
    }

    /// Publishes all pending rows, oldest first. Returns how many were
    /// published.
    #[tracing::instrument(skip(self), fields(topic = %self.topic))]
    pub async fn publish_pending(&self) -> Result<usize, PipelineError> {
        let mut stream = self.outbox.stream_pending().await?;
        let mut published = 0usize;

        while let Some(event) = stream.next().await {
            let event = event?;
            let id = event.id;

            let envelope = MessageEnvelope::creation(self.source.clone(), event);
            self.broker.publish(&self.topic, envelope).await?;
            self.outbox.remove(id).await?;

            metrics::counter!("outbox_published_total").increment(1);
            published += 1;
        }

        if published > 0 {
            tracing::info!(published, "outbox rows published");
        }
        Ok(published)
    }
}
