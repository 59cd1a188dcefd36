use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use clientes_core::config::IdStrategy;
use clientes_core::domain::customer::{Customer, CustomerChanges, CustomerDraft, CustomerId};
use clientes_core::errors::DomainError;
use clientes_core::national_id::is_valid_national_id;

use super::{CustomerRepository, RepositoryError};

#[derive(Debug, Default)]
struct CustomerTable {
    records: Vec<Customer>,
    last_issued: u64,
}

impl CustomerTable {
    fn next_id(&mut self, strategy: IdStrategy) -> CustomerId {
        let next = match strategy {
            IdStrategy::Monotonic => self.last_issued + 1,
            IdStrategy::MaxPlusOne => {
                self.records.iter().map(|record| record.id.0).max().map_or(1, |max| max + 1)
            }
        };
        self.last_issued = self.last_issued.max(next);
        CustomerId(next)
    }

    fn position(&self, id: CustomerId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}

/// Process-lifetime customer store. A single lock guards both the records and
/// the id counter, so each operation sees and leaves a consistent table.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    id_strategy: IdStrategy,
    table: RwLock<CustomerTable>,
}

impl InMemoryCustomerRepository {
    pub fn new(id_strategy: IdStrategy) -> Self {
        Self { id_strategy, table: RwLock::default() }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn ensure_valid_identity(national_id: &str) -> Result<(), DomainError> {
    if is_valid_national_id(national_id) {
        Ok(())
    } else {
        Err(DomainError::InvalidIdentity { national_id: national_id.to_string() })
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        ensure_valid_identity(&draft.national_id)?;

        let mut table = self.table.write().await;
        let id = table.next_id(self.id_strategy);
        let customer = Customer::from_draft(id, draft, Utc::now());
        table.records.push(customer.clone());

        info!(
            event_name = "customer.created",
            customer_id = %id,
            id_strategy = ?self.id_strategy,
            "customer record created"
        );
        Ok(customer)
    }

    async fn get_all(&self) -> Vec<Customer> {
        let table = self.table.read().await;
        table.records.clone()
    }

    async fn get_by_id(&self, id: CustomerId) -> Option<Customer> {
        let table = self.table.read().await;
        let found = table.records.iter().find(|record| record.id == id).cloned();
        if found.is_none() {
            debug!(event_name = "customer.lookup_miss", customer_id = %id, "customer not found");
        }
        found
    }

    async fn update(&self, changes: CustomerChanges) -> Result<Customer, RepositoryError> {
        let mut table = self.table.write().await;
        let index = table.position(changes.id).ok_or(DomainError::NotFound { id: changes.id })?;
        ensure_valid_identity(&changes.national_id)?;

        let record = &mut table.records[index];
        record.apply_changes(changes, Utc::now());

        info!(event_name = "customer.updated", customer_id = %record.id, "customer record updated");
        Ok(record.clone())
    }

    async fn delete(&self, id: CustomerId) -> Result<Customer, RepositoryError> {
        let mut table = self.table.write().await;
        let index = table.position(id).ok_or(DomainError::NotFound { id })?;
        let removed = table.records.remove(index);

        info!(event_name = "customer.deleted", customer_id = %id, "customer record deleted");
        Ok(removed)
    }
}
