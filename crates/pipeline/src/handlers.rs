//! Domain event handlers applied by the consumer.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::OrderCreated;
use order_store::OutboxEvent;

use crate::error::PipelineError;

/// A domain handler keyed by the outbox record's event type.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// The event type this handler applies to.
    fn event_type(&self) -> &'static str;

    /// Processes one event. An error drives the retry ladder; it is never
    /// surfaced to the producer.
    async fn handle(&self, event: &OutboxEvent) -> Result<(), PipelineError>;
}

/// Inventory gateway used for compensation.
#[async_trait]
pub trait StockGateway: Send + Sync {
    /// Releases a previously reserved quantity of a SKU.
    async fn release(&self, sku: &str, quantity: u32) -> Result<(), PipelineError>;
}

#[derive(Debug, Default)]
struct InMemoryStockState {
    released: HashMap<String, u32>,
    releases: u32,
    fail_remaining: u32,
}

/// In-memory stock gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStockGateway {
    state: Arc<RwLock<InMemoryStockState>>,
}

impl InMemoryStockGateway {
    /// Creates a new empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail the next `times` releases.
    pub fn set_fail_times(&self, times: u32) {
        self.state.write().unwrap().fail_remaining = times;
    }

    /// Returns the total quantity released for a SKU.
    pub fn released_of(&self, sku: &str) -> u32 {
        self.state
            .read()
            .unwrap()
            .released
            .get(sku)
            .copied()
            .unwrap_or(0)
    }

    /// Returns the number of release calls performed (failed ones included).
    pub fn release_count(&self) -> u32 {
        self.state.read().unwrap().releases
    }
}

#[async_trait]
impl StockGateway for InMemoryStockGateway {
    async fn release(&self, sku: &str, quantity: u32) -> Result<(), PipelineError> {
        let mut state = self.state.write().unwrap();
        state.releases += 1;

        if state.fail_remaining > 0 {
            state.fail_remaining -= 1;
            return Err(PipelineError::Handler(
                "stock service unavailable".to_string(),
            ));
        }

        *state.released.entry(sku.to_string()).or_insert(0) += quantity;
        Ok(())
    }
}

/// Releases reserved inventory for an abandoned/created order.
pub struct StockReleaseHandler<G: StockGateway> {
    stock: G,
}

impl<G: StockGateway> StockReleaseHandler<G> {
    /// Creates a handler over the given stock gateway.
    pub fn new(stock: G) -> Self {
        Self { stock }
    }
}

#[async_trait]
impl<G: StockGateway> EventHandler for StockReleaseHandler<G> {
    fn event_type(&self) -> &'static str {
        "OrderCreated"
    }

    async fn handle(&self, event: &OutboxEvent) -> Result<(), PipelineError> {
        let created: OrderCreated = serde_json::from_value(event.payload.clone())?;

        for item in &created.items {
            self.stock.release(&item.sku, item.quantity).await?;
        }

        tracing::debug!(
            order_id = %created.order_id,
            items = created.items.len(),
            "stock released"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::OrderCreatedItem;

    fn order_created_event() -> OutboxEvent {
        let event = OrderCreated {
            order_id: common::OrderId::new(),
            order_code: "2024000000001".to_string(),
            customer_id: "customer-1".to_string(),
            total_amount_cents: 3500,
            items: vec![
                OrderCreatedItem {
                    sku: "SKU-001".to_string(),
                    product_id: "prod-1".to_string(),
                    quantity: 2,
                },
                OrderCreatedItem {
                    sku: "SKU-002".to_string(),
                    product_id: "prod-2".to_string(),
                    quantity: 1,
                },
            ],
        };
        OutboxEvent::from_domain_event(event.order_id.to_string(), &event).unwrap()
    }

    #[tokio::test]
    async fn releases_every_item_quantity() {
        let stock = InMemoryStockGateway::new();
        let handler = StockReleaseHandler::new(stock.clone());

        handler.handle(&order_created_event()).await.unwrap();

        assert_eq!(stock.released_of("SKU-001"), 2);
        assert_eq!(stock.released_of("SKU-002"), 1);
    }

    #[tokio::test]
    async fn gateway_failure_propagates_as_handler_error() {
        let stock = InMemoryStockGateway::new();
        stock.set_fail_times(1);
        let handler = StockReleaseHandler::new(stock.clone());

        let result = handler.handle(&order_created_event()).await;
        assert!(matches!(result, Err(PipelineError::Handler(_))));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_handler_error() {
        let stock = InMemoryStockGateway::new();
        let handler = StockReleaseHandler::new(stock);

        let event = OutboxEvent::new("order-1", "OrderCreated", serde_json::json!({"bogus": 1}));
        let result = handler.handle(&event).await;
        assert!(matches!(result, Err(PipelineError::Serialization(_))));
    }
}
