//! Product gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Money;

use crate::error::CreateOrderError;

/// Physical dimensions used by freight calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub height_cm: f64,
    pub width_cm: f64,
    pub length_cm: f64,
    pub weight_kg: f64,
}

/// Product details resolved per SKU.
#[derive(Debug, Clone)]
pub struct ProductDetails {
    /// Product identity.
    pub product_id: String,
    /// The SKU the lookup was keyed by.
    pub sku: String,
    /// Current unit price.
    pub price: Money,
    /// Physical dimensions.
    pub dimensions: Dimensions,
}

/// Trait for batched product-details lookup.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    /// Resolves details for the given SKUs. SKUs without a product are
    /// simply absent from the result; the saga decides what absence means.
    async fn details_of_skus(&self, skus: &[String])
    -> Result<Vec<ProductDetails>, CreateOrderError>;
}

#[derive(Debug, Default)]
struct InMemoryProductState {
    products: HashMap<String, ProductDetails>,
    lookups: u32,
    fail_next: bool,
}

/// In-memory product gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductGateway {
    state: Arc<RwLock<InMemoryProductState>>,
}

impl InMemoryProductGateway {
    /// Creates a new empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers product details under their SKU.
    pub fn add_product(&self, details: ProductDetails) {
        let mut state = self.state.write().unwrap();
        state.products.insert(details.sku.clone(), details);
    }

    /// Configures the gateway to fail the next lookup.
    pub fn set_fail_next(&self, fail: bool) {
        self.state.write().unwrap().fail_next = fail;
    }

    /// Returns the number of batched lookups performed.
    pub fn lookup_count(&self) -> u32 {
        self.state.read().unwrap().lookups
    }
}

#[async_trait]
impl ProductGateway for InMemoryProductGateway {
    async fn details_of_skus(
        &self,
        skus: &[String],
    ) -> Result<Vec<ProductDetails>, CreateOrderError> {
        let mut state = self.state.write().unwrap();
        state.lookups += 1;

        if state.fail_next {
            state.fail_next = false;
            return Err(CreateOrderError::ProductGateway(
                "product service unavailable".to_string(),
            ));
        }

        Ok(skus
            .iter()
            .filter_map(|sku| state.products.get(sku).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(sku: &str, cents: i64) -> ProductDetails {
        ProductDetails {
            product_id: format!("prod-{sku}"),
            sku: sku.to_string(),
            price: Money::from_cents(cents),
            dimensions: Dimensions {
                height_cm: 10.0,
                width_cm: 20.0,
                length_cm: 30.0,
                weight_kg: 1.5,
            },
        }
    }

    #[tokio::test]
    async fn unknown_skus_are_absent_from_the_result() {
        let gateway = InMemoryProductGateway::new();
        gateway.add_product(details("SKU-001", 1000));

        let found = gateway
            .details_of_skus(&["SKU-001".to_string(), "SKU-404".to_string()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku, "SKU-001");
        assert_eq!(gateway.lookup_count(), 1);
    }
}
