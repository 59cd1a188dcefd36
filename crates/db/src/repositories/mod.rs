use async_trait::async_trait;
use thiserror::Error;

use clientes_core::domain::customer::{Customer, CustomerChanges, CustomerDraft, CustomerId};
use clientes_core::errors::{ApplicationError, DomainError};

pub mod memory;

pub use memory::InMemoryCustomerRepository;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Domain(error) => Self::Domain(error),
        }
    }
}

/// CRUD contract over the customer collection.
///
/// `create` and `update` reject national ids that fail the checksum;
/// `update` and `delete` report unknown ids as [`DomainError::NotFound`].
/// Reads never fail: an absent record is `None`, an empty store is an empty `Vec`.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError>;

    /// Snapshot of every record in insertion order.
    async fn get_all(&self) -> Vec<Customer>;

    async fn get_by_id(&self, id: CustomerId) -> Option<Customer>;

    async fn update(&self, changes: CustomerChanges) -> Result<Customer, RepositoryError>;

    /// Removes the record and hands it back to the caller.
    async fn delete(&self, id: CustomerId) -> Result<Customer, RepositoryError>;
}
