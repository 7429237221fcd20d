//! Order status.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order was created and is waiting for payment confirmation.
    #[default]
    WaitingPayment,

    /// Payment was confirmed.
    Paid,

    /// Order was handed to the carrier.
    Sent,

    /// Order reached the customer (terminal state).
    Delivered,

    /// Order was canceled (terminal state).
    Canceled,
}

impl OrderStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Canceled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::WaitingPayment => "WAITING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Sent => "SENT",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
