use async_trait::async_trait;
use skybook_core::{CustomerDirectory, DirectoryError};
use skybook_ledger::{EntityClass, SequenceAllocator};
use skybook_shared::{Customer, CustomerId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory customer registry.
pub struct InMemoryCustomerDirectory {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    sequences: Arc<SequenceAllocator>,
}

impl InMemoryCustomerDirectory {
    pub fn new(sequences: Arc<SequenceAllocator>) -> Self {
        Self {
            customers: RwLock::new(HashMap::new()),
            sequences,
        }
    }

    pub async fn register_customer(&self, first_name: &str, last_name: &str) -> CustomerId {
        let id = self.sequences.next(EntityClass::Customer);
        let mut customers = self.customers.write().await;
        customers.insert(
            id,
            Customer {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            },
        );
        info!(customer_id = id, "Customer registered");
        id
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn customer_exists(&self, customer_id: CustomerId) -> Result<bool, DirectoryError> {
        let customers = self.customers.read().await;
        Ok(customers.contains_key(&customer_id))
    }

    async fn get_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Customer>, DirectoryError> {
        let customers = self.customers.read().await;
        Ok(customers.get(&customer_id).cloned())
    }
}
