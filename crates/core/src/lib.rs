pub mod config;
pub mod domain;
pub mod errors;
pub mod national_id;

pub use config::{AppConfig, ConfigError, IdStrategy, LoadOptions};
pub use domain::customer::{Customer, CustomerChanges, CustomerDraft, CustomerId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use national_id::{check_digits, complete_national_id, is_valid_national_id};
