//! Deterministic demo customers for local runs and smoke checks.

use clientes_core::domain::customer::{CustomerDraft, CustomerId};
use clientes_core::national_id::complete_national_id;
use serde::Serialize;
use tracing::info;

use crate::repositories::{CustomerRepository, RepositoryError};

const DEMO_ROWS: [(&str, &str, Option<&str>, &str, bool); 4] = [
    ("Ana Souza", "ana.souza@example.com", Some("+55 11 91234-5678"), "111444777", true),
    ("Bruno Lima", "bruno.lima@example.com", None, "529982247", true),
    ("Carla Mendes", "carla.mendes@example.com", Some("(21) 3456-7890"), "987654321", true),
    ("Davi Rocha", "davi.rocha@example.com", Some("+55 31 4002-8922 ext 12"), "246813579", false),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeedResult {
    pub created: usize,
    pub ids: Vec<CustomerId>,
}

/// Drafts with check digits computed from fixed 9-digit bases.
pub fn demo_customers() -> Vec<CustomerDraft> {
    DEMO_ROWS
        .iter()
        .filter_map(|(name, email, phone, base, active)| {
            let national_id = complete_national_id(base)?;
            Some(CustomerDraft {
                name: (*name).to_string(),
                email: (*email).to_string(),
                phone: phone.map(str::to_string),
                national_id,
                active: *active,
            })
        })
        .collect()
}

pub async fn seed(repository: &dyn CustomerRepository) -> Result<SeedResult, RepositoryError> {
    let mut ids = Vec::new();
    for draft in demo_customers() {
        let customer = repository.create(draft).await?;
        ids.push(customer.id);
    }

    info!(event_name = "customer.fixtures.seeded", created = ids.len(), "demo customers seeded");
    Ok(SeedResult { created: ids.len(), ids })
}
