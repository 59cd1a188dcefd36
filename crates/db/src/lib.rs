pub mod fixtures;
pub mod repositories;

pub use fixtures::{demo_customers, seed, SeedResult};
pub use repositories::{CustomerRepository, InMemoryCustomerRepository, RepositoryError};
