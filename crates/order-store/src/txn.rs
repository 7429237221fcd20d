//! Unit-of-work and transaction-manager contracts.

use async_trait::async_trait;
use domain::{Order, OrderDelivery, OrderPayment};

use crate::{OutboxEvent, Result, TransactionFailure};

/// Staging surface a unit of work writes into.
///
/// Writes are staged synchronously and flushed by the store in one atomic
/// step; nothing is observable until the whole unit of work commits.
pub trait OrderTx {
    /// Stages the delivery for persistence.
    fn save_delivery(&mut self, delivery: OrderDelivery);

    /// Stages the payment for persistence.
    fn save_payment(&mut self, payment: OrderPayment);

    /// Stages the order (with its items) for persistence.
    fn save_order(&mut self, order: Order);

    /// Appends an outbox event to the same unit of work.
    fn append_outbox(&mut self, event: OutboxEvent);
}

/// Collected writes of one unit of work.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    delivery: Option<OrderDelivery>,
    payment: Option<OrderPayment>,
    order: Option<Order>,
    outbox: Vec<OutboxEvent>,
}

impl UnitOfWork {
    /// Returns the staged delivery, if any.
    pub fn delivery(&self) -> Option<&OrderDelivery> {
        self.delivery.as_ref()
    }

    /// Returns the staged payment, if any.
    pub fn payment(&self) -> Option<&OrderPayment> {
        self.payment.as_ref()
    }

    /// Returns the staged order, if any.
    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// Takes the staged order out of the unit of work.
    pub fn take_order(&mut self) -> Option<Order> {
        self.order.take()
    }

    /// Returns the staged outbox events.
    pub fn outbox(&self) -> &[OutboxEvent] {
        &self.outbox
    }

    /// Consumes the unit of work into its parts.
    pub fn into_parts(
        self,
    ) -> (
        Option<OrderDelivery>,
        Option<OrderPayment>,
        Option<Order>,
        Vec<OutboxEvent>,
    ) {
        (self.delivery, self.payment, self.order, self.outbox)
    }
}

impl OrderTx for UnitOfWork {
    fn save_delivery(&mut self, delivery: OrderDelivery) {
        self.delivery = Some(delivery);
    }

    fn save_payment(&mut self, payment: OrderPayment) {
        self.payment = Some(payment);
    }

    fn save_order(&mut self, order: Order) {
        self.order = Some(order);
    }

    fn append_outbox(&mut self, event: OutboxEvent) {
        self.outbox.push(event);
    }
}

/// A unit of work expressed as a closure over the staging surface.
pub type TxWork = Box<dyn FnOnce(&mut dyn OrderTx) + Send>;

/// Executes units of work as all-or-nothing.
///
/// The orchestrator calls this exactly once, at its commit stage. Failures
/// are classified: an optimistic-lock conflict on a concurrently modified
/// aggregate is a [`TransactionFailure::Conflict`], anything else is
/// [`TransactionFailure::Unexpected`].
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Runs `work` and commits all staged writes atomically.
    async fn with_transaction(
        &self,
        work: TxWork,
    ) -> std::result::Result<(), TransactionFailure>;
}

/// Order sequence counter used for order-code generation.
#[async_trait]
pub trait OrderSequence: Send + Sync {
    /// Returns the number of persisted orders.
    ///
    /// The read is not synchronized with the commit that follows it, so two
    /// concurrent requests can observe the same count and mint the same
    /// order code. This is an accepted limitation, not an invariant.
    async fn count(&self) -> Result<u64>;
}
