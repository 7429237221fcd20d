//! Coupon gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::CreateOrderError;

/// A successfully matched coupon.
#[derive(Debug, Clone)]
pub struct AppliedCoupon {
    /// Coupon identity.
    pub coupon_id: String,
    /// The matched code.
    pub code: String,
    /// Discount percentage to apply.
    pub percentage: f64,
}

/// Trait for coupon redemption.
#[async_trait]
pub trait CouponGateway: Send + Sync {
    /// Applies a coupon code. `None` means no such coupon exists.
    async fn apply(&self, code: &str) -> Result<Option<AppliedCoupon>, CreateOrderError>;
}

#[derive(Debug, Default)]
struct InMemoryCouponState {
    coupons: HashMap<String, AppliedCoupon>,
    applications: u32,
    fail_next: bool,
}

/// In-memory coupon gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCouponGateway {
    state: Arc<RwLock<InMemoryCouponState>>,
}

impl InMemoryCouponGateway {
    /// Creates a new empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a coupon code with its discount percentage.
    pub fn add_coupon(&self, code: &str, percentage: f64) {
        let mut state = self.state.write().unwrap();
        let coupon = AppliedCoupon {
            coupon_id: format!("coupon-{}", state.coupons.len() + 1),
            code: code.to_string(),
            percentage,
        };
        state.coupons.insert(code.to_string(), coupon);
    }

    /// Configures the gateway to fail the next application.
    pub fn set_fail_next(&self, fail: bool) {
        self.state.write().unwrap().fail_next = fail;
    }

    /// Returns the number of applications performed.
    pub fn application_count(&self) -> u32 {
        self.state.read().unwrap().applications
    }
}

#[async_trait]
impl CouponGateway for InMemoryCouponGateway {
    async fn apply(&self, code: &str) -> Result<Option<AppliedCoupon>, CreateOrderError> {
        let mut state = self.state.write().unwrap();
        state.applications += 1;

        if state.fail_next {
            state.fail_next = false;
            return Err(CreateOrderError::CouponGateway(
                "coupon service unavailable".to_string(),
            ));
        }

        Ok(state.coupons.get(code).cloned())
    }
}
