//! Outbox relay entry point.
//!
//! Polls the transactional outbox, publishes pending rows to the primary
//! topic and drains the topic ladder through the consumer.

use std::sync::Arc;

use order_store::PostgresOrderStore;
use pipeline::{
    EventConsumer, InMemoryBroker, InMemoryStockGateway, OutboxPublisher, PipelineConfig,
    StockReleaseHandler,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .install()
        .expect("failed to install Prometheus recorder");

    // 3. Load configuration and connect the store
    let config = PipelineConfig::from_env();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to the database");
    let store = PostgresOrderStore::new(pool);
    store
        .run_migrations()
        .await
        .expect("failed to run migrations");

    // 4. Wire the publisher and consumer
    let topology = config.topology();
    let broker = InMemoryBroker::new();
    let publisher = OutboxPublisher::new(
        store,
        broker.clone(),
        topology.primary().to_string(),
        "order-outbox",
    );
    let mut consumer = EventConsumer::new(broker.clone(), topology.clone(), config.stale_after());
    consumer.register(Arc::new(StockReleaseHandler::new(
        InMemoryStockGateway::new(),
    )));

    tracing::info!(
        base_topic = topology.primary(),
        retry_topics = topology.retry_count(),
        poll_interval_secs = config.poll_interval_secs,
        "outbox relay started"
    );

    // 5. Relay loop: publish pending rows, then drain the ladder
    let mut interval =
        tokio::time::interval(std::time::Duration::from_secs(config.poll_interval_secs));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(error) = publisher.publish_pending().await {
                    tracing::error!(%error, "outbox publish failed");
                }
                for topic in topology.all_topics() {
                    while let Some(delivery) = broker.poll(&topic) {
                        if let Err(error) = consumer.handle(delivery).await {
                            tracing::error!(%error, %topic, "delivery processing failed");
                        }
                    }
                }
            }
            () = &mut shutdown => {
                break;
            }
        }
    }

    tracing::info!("outbox relay shut down gracefully");
}
