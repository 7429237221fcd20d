//! Saga coordinator for order creation.

use std::collections::HashMap;

use domain::{Order, OrderCode, OrderCreated, OrderDelivery, OrderItem, OrderPayment, ValidationError};
use order_store::{OrderSequence, OrderTx, OutboxEvent, TransactionManager};

use crate::command::{CreateOrderCommand, CreatedOrder};
use crate::error::CreateOrderError;
use crate::services::coupon::CouponGateway;
use crate::services::customer::CustomerGateway;
use crate::services::freight::FreightCalculator;
use crate::services::product::ProductDetails;
use crate::services::product::ProductGateway;

/// Orchestrates the creation of an order.
///
/// The coordinator drives five sequential stages (customer resolution,
/// product resolution, freight calculation, optional coupon application,
/// commit). Each stage has its own failure mode: missing collaborator
/// aggregates are fatal, business-rule violations accumulate into a soft
/// error list without touching storage, and the single atomic commit at the
/// end either persists everything or nothing.
pub struct CreateOrderOrchestrator<C, P, F, K, S>
where
    C: CustomerGateway,
    P: ProductGateway,
    F: FreightCalculator,
    K: CouponGateway,
    S: TransactionManager + OrderSequence,
{
    customers: C,
    products: P,
    freight: F,
    coupons: K,
    store: S,
}

impl<C, P, F, K, S> CreateOrderOrchestrator<C, P, F, K, S>
where
    C: CustomerGateway,
    P: ProductGateway,
    F: FreightCalculator,
    K: CouponGateway,
    S: TransactionManager + OrderSequence,
{
    /// Creates a new coordinator.
    pub fn new(customers: C, products: P, freight: F, coupons: K, store: S) -> Self {
        Self {
            customers,
            products,
            freight,
            coupons,
            store,
        }
    }

    /// Executes the order-creation saga for the given command.
    ///
    /// Returns the persisted order's identity and code on success. A
    /// structurally invalid command is rejected before any collaborator is
    /// called.
    #[tracing::instrument(skip(self, command), fields(customer_id = %command.customer_id))]
    pub async fn create_order(
        &self,
        command: CreateOrderCommand,
    ) -> Result<CreatedOrder, CreateOrderError> {
        metrics::counter!("order_creations_total").increment(1);
        let start = std::time::Instant::now();

        // Structural validation: zero collaborator invocations on failure.
        let errors = command.validate();
        if !errors.is_empty() {
            metrics::counter!("order_creations_rejected").increment(1);
            return Err(CreateOrderError::Invalid(errors));
        }

        // 1. Customer resolution
        let customer = self
            .customers
            .customer_of_id(&command.customer_id)
            .await?
            .ok_or_else(|| CreateOrderError::CustomerNotFound(command.customer_id.clone()))?;

        // 2. Product resolution, batched; any missing SKU is fatal
        let skus: Vec<String> = command.items.iter().map(|i| i.sku.clone()).collect();
        let details = self.products.details_of_skus(&skus).await?;
        let by_sku: HashMap<&str, &ProductDetails> =
            details.iter().map(|d| (d.sku.as_str(), d)).collect();
        let missing: Vec<String> = skus
            .iter()
            .filter(|sku| !by_sku.contains_key(sku.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            tracing::warn!(?missing, "product resolution failed");
            return Err(CreateOrderError::ProductsNotFound { skus: missing });
        }

        // 3. Freight calculation (read only)
        let quote = self
            .freight
            .calculate(&command.freight_type, &customer.address, &details)
            .await?;

        // 4. Coupon application, skipped for absent/blank codes
        let mut soft_errors: Vec<ValidationError> = Vec::new();
        let coupon = if command.has_coupon() {
            let code = command.coupon_code.as_deref().unwrap_or_default().trim();
            match self.coupons.apply(code).await? {
                Some(coupon) => Some(coupon),
                None => {
                    soft_errors.push(ValidationError::new("coupon not found"));
                    None
                }
            }
        } else {
            None
        };

        // 5. Build the aggregates, validate, commit atomically
        let sequence = self.store.count().await?;
        let delivery = OrderDelivery::new(
            quote.freight_type.clone(),
            quote.price,
            quote.estimated_days,
            customer.address.clone(),
        );
        let payment = OrderPayment::new(&command.payment_method_id, command.installments);

        let (coupon_code, coupon_percentage) = match &coupon {
            Some(coupon) => (Some(coupon.code.clone()), coupon.percentage),
            None => (None, 0.0),
        };
        let mut order = Order::new(
            OrderCode::new(sequence),
            &command.customer_id,
            coupon_code,
            coupon_percentage,
            Some(&delivery),
            Some(payment.id()),
        )?;

        for request in &command.items {
            let detail = by_sku[request.sku.as_str()];
            match OrderItem::new(
                order.id(),
                &detail.product_id,
                request.sku.as_str(),
                request.quantity,
                detail.price,
            ) {
                Ok(item) => order.add_item(item)?,
                Err(error) => soft_errors.push(error),
            }
        }
        order.calculate_total_amount(&delivery);

        soft_errors.extend(delivery.validate());
        soft_errors.extend(payment.validate());
        soft_errors.extend(order.validate());
        if !soft_errors.is_empty() {
            metrics::counter!("order_creations_rejected").increment(1);
            return Err(CreateOrderError::Invalid(soft_errors));
        }

        let event = OrderCreated::from_order(&order);
        let row = OutboxEvent::from_domain_event(order.id().to_string(), &event)?;
        let created = CreatedOrder {
            order_id: order.id(),
            order_code: order.code().to_string(),
        };

        self.store
            .with_transaction(Box::new(move |tx| {
                tx.save_delivery(delivery);
                tx.save_payment(payment);
                tx.save_order(order);
                tx.append_outbox(row);
            }))
            .await?;

        let duration = start.elapsed().as_secs_f64();
        metrics::histogram!("order_creation_duration_seconds").record(duration);
        metrics::counter!("orders_created").increment(1);
        tracing::info!(
            order_id = %created.order_id,
            order_code = %created.order_code,
            duration,
            "order created"
        );

        Ok(created)
    }
}
