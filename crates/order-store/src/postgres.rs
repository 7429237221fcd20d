//! PostgreSQL-backed order store implementation.

use async_trait::async_trait;
use common::EventId;
use domain::{Order, OrderDelivery, OrderPayment};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::{
    OutboxEvent, Result, TransactionFailure,
    outbox::{OutboxStore, OutboxStream},
    txn::{OrderSequence, TransactionManager, TxWork, UnitOfWork},
};

/// PostgreSQL order store.
///
/// One unit of work maps to one database transaction: the delivery, payment,
/// order row, items and outbox row commit or roll back together.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_outbox(row: PgRow) -> Result<OutboxEvent> {
        Ok(OutboxEvent {
            id: EventId::from_uuid(row.try_get::<Uuid, _>("id")?),
            aggregate_id: row.try_get("aggregate_id")?,
            event_type: row.try_get("event_type")?,
            payload: row.try_get("payload")?,
            occurred_on: row.try_get("occurred_on")?,
        })
    }

    async fn insert_delivery(
        tx: &mut Transaction<'_, Postgres>,
        delivery: &OrderDelivery,
    ) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO order_deliveries
                (id, freight_type, freight_price_cents, delivery_estimated,
                 street, number, complement, district, city, state, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(delivery.id().as_uuid())
        .bind(delivery.freight_type())
        .bind(delivery.freight_price().cents())
        .bind(delivery.delivery_estimated() as i32)
        .bind(&delivery.address().street)
        .bind(&delivery.address().number)
        .bind(&delivery.address().complement)
        .bind(&delivery.address().district)
        .bind(&delivery.address().city)
        .bind(&delivery.address().state)
        .bind(&delivery.address().zip_code)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn insert_payment(
        tx: &mut Transaction<'_, Postgres>,
        payment: &OrderPayment,
    ) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO order_payments (id, payment_method_id, installments)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(payment.id().as_uuid())
        .bind(payment.payment_method_id())
        .bind(payment.installments() as i32)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn upsert_order(
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO orders
                (id, code, status, customer_id, coupon_code, coupon_percentage,
                 delivery_id, payment_id, total_amount_cents, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                coupon_code = EXCLUDED.coupon_code,
                coupon_percentage = EXCLUDED.coupon_percentage,
                total_amount_cents = EXCLUDED.total_amount_cents,
                version = EXCLUDED.version,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(order.code().as_str())
        .bind(order.status().as_str())
        .bind(order.customer_id())
        .bind(order.coupon_code())
        .bind(order.coupon_percentage())
        .bind(order.delivery_id().map(|id| id.as_uuid()))
        .bind(order.payment_id().map(|id| id.as_uuid()))
        .bind(order.total_amount().cents())
        .bind(order.version().as_i64())
        .bind(order.created_at())
        .bind(order.updated_at())
        .execute(&mut **tx)
        .await?;

        for item in order.items() {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, sku, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(item.id().as_uuid())
            .bind(item.order_id().as_uuid())
            .bind(item.product_id())
            .bind(item.sku().as_str())
            .bind(item.quantity() as i32)
            .bind(item.unit_price().cents())
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> TransactionFailure {
    TransactionFailure::Unexpected(e.to_string())
}

#[async_trait]
impl TransactionManager for PostgresOrderStore {
    async fn with_transaction(
        &self,
        work: TxWork,
    ) -> std::result::Result<(), TransactionFailure> {
        let mut uow = UnitOfWork::default();
        work(&mut uow);
        let (delivery, payment, order, outbox) = uow.into_parts();

        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        if let Some(delivery) = &delivery {
            Self::insert_delivery(&mut tx, delivery)
                .await
                .map_err(unexpected)?;
        }
        if let Some(payment) = &payment {
            Self::insert_payment(&mut tx, payment)
                .await
                .map_err(unexpected)?;
        }

        if let Some(mut order) = order {
            let current: Option<i64> =
                sqlx::query_scalar("SELECT version FROM orders WHERE id = $1")
                    .bind(order.id().as_uuid())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(unexpected)?;

            if let Some(actual) = current
                && actual != order.version().as_i64()
            {
                return Err(TransactionFailure::Conflict {
                    order_id: order.id(),
                    expected: order.version(),
                    actual: actual.into(),
                });
            }

            let order_id = order.id();
            let expected = order.version();
            order.set_version(order.version().next());
            Self::upsert_order(&mut tx, &order).await.map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.constraint() == Some("orders_pkey")
                {
                    // Lost the insert race to a concurrent writer
                    return TransactionFailure::Conflict {
                        order_id,
                        expected,
                        actual: expected.next(),
                    };
                }
                unexpected(e)
            })?;
        }

        for event in &outbox {
            sqlx::query(
                r#"
                INSERT INTO outbox_events (id, aggregate_id, event_type, payload, occurred_on)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(event.id.as_uuid())
            .bind(&event.aggregate_id)
            .bind(&event.event_type)
            .bind(&event.payload)
            .bind(event.occurred_on)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }
}

#[async_trait]
impl OrderSequence for PostgresOrderStore {
    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl OutboxStore for PostgresOrderStore {
    async fn pending(&self) -> Result<Vec<OutboxEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, aggregate_id, event_type, payload, occurred_on
            FROM outbox_events
            ORDER BY occurred_on ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_outbox).collect()
    }

    async fn stream_pending(&self) -> Result<OutboxStream> {
        use futures_util::stream;

        let events = self.pending().await?;
        Ok(Box::pin(stream::iter(events.into_iter().map(Ok))))
    }

    async fn remove(&self, id: EventId) -> Result<()> {
        sqlx::query("DELETE FROM outbox_events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
