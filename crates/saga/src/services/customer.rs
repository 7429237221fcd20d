//! Customer gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Address;

use crate::error::CreateOrderError;

/// A resolved customer with the address freight is quoted against.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Customer identity.
    pub customer_id: String,
    /// Display name.
    pub name: String,
    /// Registered delivery address.
    pub address: Address,
}

/// Trait for customer lookup.
#[async_trait]
pub trait CustomerGateway: Send + Sync {
    /// Resolves a customer by identity. `None` means the customer does not
    /// exist; the saga treats that as fatal.
    async fn customer_of_id(&self, customer_id: &str)
    -> Result<Option<Customer>, CreateOrderError>;
}

#[derive(Debug, Default)]
struct InMemoryCustomerState {
    customers: HashMap<String, Customer>,
    lookups: u32,
    fail_next: bool,
}

/// In-memory customer gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerGateway {
    state: Arc<RwLock<InMemoryCustomerState>>,
}

impl InMemoryCustomerGateway {
    /// Creates a new empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a customer.
    pub fn add_customer(&self, customer: Customer) {
        let mut state = self.state.write().unwrap();
        state.customers.insert(customer.customer_id.clone(), customer);
    }

    /// Configures the gateway to fail the next lookup.
    pub fn set_fail_next(&self, fail: bool) {
        self.state.write().unwrap().fail_next = fail;
    }

    /// Returns the number of lookups performed.
    pub fn lookup_count(&self) -> u32 {
        self.state.read().unwrap().lookups
    }
}

#[async_trait]
impl CustomerGateway for InMemoryCustomerGateway {
    async fn customer_of_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<Customer>, CreateOrderError> {
        let mut state = self.state.write().unwrap();
        state.lookups += 1;

        if state.fail_next {
            state.fail_next = false;
            return Err(CreateOrderError::CustomerGateway(
                "customer service unavailable".to_string(),
            ));
        }

        Ok(state.customers.get(customer_id).cloned())
    }
}
