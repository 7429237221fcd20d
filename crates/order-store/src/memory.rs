//! In-memory order store implementation for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{DeliveryId, EventId, OrderId, PaymentId};
use domain::{Order, OrderDelivery, OrderPayment};
use tokio::sync::RwLock;

use crate::{
    OutboxEvent, Result, TransactionFailure,
    outbox::{OutboxStore, OutboxStream},
    txn::{OrderSequence, TransactionManager, TxWork, UnitOfWork},
};

#[derive(Default)]
struct State {
    orders: HashMap<OrderId, Order>,
    deliveries: HashMap<DeliveryId, OrderDelivery>,
    payments: HashMap<PaymentId, OrderPayment>,
    outbox: Vec<OutboxEvent>,
    fail_next_commit: bool,
}

/// In-memory order store.
///
/// All writes of one unit of work land under a single write lock, so the
/// commit is atomic: concurrent readers observe either none or all of it.
/// Provides the same contracts as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail the next commit with an unexpected error.
    pub async fn set_fail_next_commit(&self, fail: bool) {
        self.state.write().await.fail_next_commit = fail;
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns a persisted order by id.
    pub async fn get_order(&self, order_id: OrderId) -> Option<Order> {
        self.state.read().await.orders.get(&order_id).cloned()
    }

    /// Returns a persisted delivery by id.
    pub async fn get_delivery(&self, delivery_id: DeliveryId) -> Option<OrderDelivery> {
        self.state.read().await.deliveries.get(&delivery_id).cloned()
    }

    /// Returns a persisted payment by id.
    pub async fn get_payment(&self, payment_id: PaymentId) -> Option<OrderPayment> {
        self.state.read().await.payments.get(&payment_id).cloned()
    }

    /// Returns the number of pending outbox rows.
    pub async fn outbox_len(&self) -> usize {
        self.state.read().await.outbox.len()
    }
}

#[async_trait]
impl TransactionManager for InMemoryOrderStore {
    async fn with_transaction(
        &self,
        work: TxWork,
    ) -> std::result::Result<(), TransactionFailure> {
        let mut uow = UnitOfWork::default();
        work(&mut uow);

        let mut state = self.state.write().await;

        if state.fail_next_commit {
            state.fail_next_commit = false;
            return Err(TransactionFailure::Unexpected(
                "simulated storage failure".to_string(),
            ));
        }

        let (delivery, payment, order, outbox) = uow.into_parts();

        if let Some(mut order) = order {
            if let Some(stored) = state.orders.get(&order.id())
                && stored.version() != order.version()
            {
                return Err(TransactionFailure::Conflict {
                    order_id: order.id(),
                    expected: order.version(),
                    actual: stored.version(),
                });
            }

            if let Some(delivery) = delivery {
                state.deliveries.insert(delivery.id(), delivery);
            }
            if let Some(payment) = payment {
                state.payments.insert(payment.id(), payment);
            }
            order.set_version(order.version().next());
            state.orders.insert(order.id(), order);
            state.outbox.extend(outbox);
        } else {
            // A unit of work without an order is still applied atomically.
            if let Some(delivery) = delivery {
                state.deliveries.insert(delivery.id(), delivery);
            }
            if let Some(payment) = payment {
                state.payments.insert(payment.id(), payment);
            }
            state.outbox.extend(outbox);
        }

        Ok(())
    }
}

#[async_trait]
impl OrderSequence for InMemoryOrderStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.state.read().await.orders.len() as u64)
    }
}

#[async_trait]
impl OutboxStore for InMemoryOrderStore {
    async fn pending(&self) -> Result<Vec<OutboxEvent>> {
        let state = self.state.read().await;
        let mut events = state.outbox.clone();
        events.sort_by_key(|e| e.occurred_on);
        Ok(events)
    }

    async fn stream_pending(&self) -> Result<OutboxStream> {
        use futures_util::stream;

        let events = self.pending().await?;
        Ok(Box::pin(stream::iter(events.into_iter().map(Ok))))
    }

    async fn remove(&self, id: EventId) -> Result<()> {
        let mut state = self.state.write().await;
        state.outbox.retain(|e| e.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txn::OrderTx;
    use common::Version;
    use domain::{Address, Money, OrderCode, OrderItem};
    use futures_util::StreamExt;

    fn make_delivery() -> OrderDelivery {
        OrderDelivery::new(
            "express",
            Money::from_cents(1500),
            3,
            Address {
                street: "Baker Street".to_string(),
                number: "221B".to_string(),
                complement: None,
                district: "Marylebone".to_string(),
                city: "London".to_string(),
                state: "LDN".to_string(),
                zip_code: "NW1 6XE".to_string(),
            },
        )
    }

    fn make_order(delivery: &OrderDelivery, payment: &OrderPayment) -> Order {
        let mut order = Order::new(
            OrderCode::with_year(0, 2024),
            "customer-1",
            None,
            0.0,
            Some(delivery),
            Some(payment.id()),
        )
        .unwrap();
        let order_id = order.id();
        order
            .add_item(
                OrderItem::new(order_id, "prod-1", "SKU-001", 2, Money::from_cents(1000)).unwrap(),
            )
            .unwrap();
        order.calculate_total_amount(delivery);
        order
    }

    async fn commit_order(store: &InMemoryOrderStore) -> OrderId {
        let delivery = make_delivery();
        let payment = OrderPayment::new("pm-credit-card", 1);
        let order = make_order(&delivery, &payment);
        let order_id = order.id();
        let event =
            OutboxEvent::new(order_id.to_string(), "OrderCreated", serde_json::json!({}));

        store
            .with_transaction(Box::new(move |tx| {
                tx.save_delivery(delivery);
                tx.save_payment(payment);
                tx.save_order(order);
                tx.append_outbox(event);
            }))
            .await
            .unwrap();

        order_id
    }

    #[tokio::test]
    async fn commit_persists_everything_together() {
        let store = InMemoryOrderStore::new();
        let order_id = commit_order(&store).await;

        assert_eq!(store.order_count().await, 1);
        assert_eq!(store.outbox_len().await, 1);
        let stored = store.get_order(order_id).await.unwrap();
        assert_eq!(stored.version(), Version::new(1));
        assert!(store.get_delivery(stored.delivery_id().unwrap()).await.is_some());
        assert!(store.get_payment(stored.payment_id().unwrap()).await.is_some());
    }

    #[tokio::test]
    async fn failed_commit_persists_nothing() {
        let store = InMemoryOrderStore::new();
        store.set_fail_next_commit(true).await;

        let delivery = make_delivery();
        let payment = OrderPayment::new("pm-credit-card", 1);
        let order = make_order(&delivery, &payment);

        let result = store
            .with_transaction(Box::new(move |tx| {
                tx.save_delivery(delivery);
                tx.save_payment(payment);
                tx.save_order(order);
            }))
            .await;

        assert!(matches!(result, Err(TransactionFailure::Unexpected(_))));
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.outbox_len().await, 0);
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let store = InMemoryOrderStore::new();
        let delivery = make_delivery();
        let payment = OrderPayment::new("pm-credit-card", 1);
        let order = make_order(&delivery, &payment);

        let first = order.clone();
        store
            .with_transaction(Box::new(move |tx| tx.save_order(first)))
            .await
            .unwrap();

        // Same aggregate at its stale version
        let result = store
            .with_transaction(Box::new(move |tx| tx.save_order(order)))
            .await;

        assert!(matches!(result, Err(TransactionFailure::Conflict { .. })));
    }

    #[tokio::test]
    async fn sequence_counts_orders() {
        let store = InMemoryOrderStore::new();
        assert_eq!(store.count().await.unwrap(), 0);

        commit_order(&store).await;
        commit_order(&store).await;
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn outbox_rows_are_removed_after_hand_off() {
        let store = InMemoryOrderStore::new();
        commit_order(&store).await;

        let pending = store.pending().await.unwrap();
        assert_eq!(pending.len(), 1);

        store.remove(pending[0].id).await.unwrap();
        assert_eq!(store.outbox_len().await, 0);
    }

    #[tokio::test]
    async fn stream_pending_yields_oldest_first() {
        let store = InMemoryOrderStore::new();
        commit_order(&store).await;
        commit_order(&store).await;

        let stream = store.stream_pending().await.unwrap();
        let events: Vec<_> = stream.collect().await;
        assert_eq!(events.len(), 2);
        let a = events[0].as_ref().unwrap().occurred_on;
        let b = events[1].as_ref().unwrap().occurred_on;
        assert!(a <= b);
    }
}
