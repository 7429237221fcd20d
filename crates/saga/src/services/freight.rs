//! Freight calculator trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{Address, Money};

use crate::error::CreateOrderError;
use crate::services::product::ProductDetails;

/// Result of a freight calculation.
#[derive(Debug, Clone)]
pub struct FreightQuote {
    /// The freight type the quote applies to.
    pub freight_type: String,
    /// Quoted price.
    pub price: Money,
    /// Estimated delivery time in days.
    pub estimated_days: u32,
}

/// Trait for freight calculation.
///
/// Purely a read: quoting freight has no side effect.
#[async_trait]
pub trait FreightCalculator: Send + Sync {
    /// Quotes freight for the given type, destination and items.
    async fn calculate(
        &self,
        freight_type: &str,
        address: &Address,
        items: &[ProductDetails],
    ) -> Result<FreightQuote, CreateOrderError>;
}

#[derive(Debug)]
struct InMemoryFreightState {
    price: Money,
    estimated_days: u32,
    calculations: u32,
    fail_next: bool,
}

/// In-memory freight calculator for testing: quotes a fixed price.
#[derive(Debug, Clone)]
pub struct InMemoryFreightCalculator {
    state: Arc<RwLock<InMemoryFreightState>>,
}

impl InMemoryFreightCalculator {
    /// Creates a calculator quoting the given fixed price and estimate.
    pub fn new(price: Money, estimated_days: u32) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryFreightState {
                price,
                estimated_days,
                calculations: 0,
                fail_next: false,
            })),
        }
    }

    /// Configures the calculator to fail the next calculation.
    pub fn set_fail_next(&self, fail: bool) {
        self.state.write().unwrap().fail_next = fail;
    }

    /// Returns the number of calculations performed.
    pub fn calculation_count(&self) -> u32 {
        self.state.read().unwrap().calculations
    }
}

impl Default for InMemoryFreightCalculator {
    fn default() -> Self {
        Self::new(Money::from_cents(1500), 3)
    }
}

#[async_trait]
impl FreightCalculator for InMemoryFreightCalculator {
    async fn calculate(
        &self,
        freight_type: &str,
        _address: &Address,
        _items: &[ProductDetails],
    ) -> Result<FreightQuote, CreateOrderError> {
        let mut state = self.state.write().unwrap();
        state.calculations += 1;

        if state.fail_next {
            state.fail_next = false;
            return Err(CreateOrderError::FreightGateway(
                "freight service unavailable".to_string(),
            ));
        }

        Ok(FreightQuote {
            freight_type: freight_type.to_string(),
            price: state.price,
            estimated_days: state.estimated_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            street: "Baker Street".to_string(),
            number: "221B".to_string(),
            complement: None,
            district: "Marylebone".to_string(),
            city: "London".to_string(),
            state: "LDN".to_string(),
            zip_code: "NW1 6XE".to_string(),
        }
    }

    #[tokio::test]
    async fn quotes_the_configured_price() {
        let calculator = InMemoryFreightCalculator::new(Money::from_cents(990), 5);

        let quote = calculator
            .calculate("economy", &address(), &[])
            .await
            .unwrap();

        assert_eq!(quote.freight_type, "economy");
        assert_eq!(quote.price.cents(), 990);
        assert_eq!(quote.estimated_days, 5);
        assert_eq!(calculator.calculation_count(), 1);
    }
}
