//! Pipeline error types.

use order_store::StoreError;
use thiserror::Error;

/// Errors that can occur in the delivery pipeline.
///
/// Handler errors never reach the producer; the consumer turns them into
/// retry-ladder hops. Only infrastructure errors (store, broker) propagate.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Store error while reading or trimming the outbox.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Broker error while publishing.
    #[error("broker error: {0}")]
    Broker(String),

    /// A downstream handler failed to process an event.
    #[error("handler error: {0}")]
    Handler(String),
}

/// Convenience type alias for pipeline results.
pub type Result<T> = std::result::Result<T, PipelineError>;
