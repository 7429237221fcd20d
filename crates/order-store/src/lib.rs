//! Transactional order persistence.
//!
//! This crate is the Transaction Manager boundary of the order system:
//! - [`TransactionManager::with_transaction`] runs one unit of work as
//!   all-or-nothing, classifying failures as concurrency conflicts or
//!   unexpected infrastructure errors
//! - [`OutboxEvent`] rows are appended in the same unit of work as the
//!   business writes and consumed independently by the delivery pipeline
//! - [`OrderSequence`] exposes the (non-atomic) order counter used for
//!   order-code generation

pub mod error;
pub mod memory;
pub mod outbox;
pub mod postgres;
pub mod txn;

pub use error::{StoreError, TransactionFailure};
pub use memory::InMemoryOrderStore;
pub use outbox::{OutboxEvent, OutboxStore, OutboxStream};
pub use postgres::PostgresOrderStore;
pub use txn::{OrderSequence, OrderTx, TransactionManager, TxWork, UnitOfWork};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
