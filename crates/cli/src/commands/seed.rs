use clientes_core::config::{AppConfig, LoadOptions};
use clientes_db::{
    seed, CustomerRepository, InMemoryCustomerRepository, RepositoryError, SeedResult,
};

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let repo = InMemoryCustomerRepository::new(config.repository.id_strategy);
    let result = runtime.block_on(async {
        let seeded = seed(&repo).await?;
        Ok::<_, RepositoryError>((seeded, repo.get_all().await))
    });

    match result {
        Ok((seeded, customers)) => {
            let lines: Vec<String> = customers
                .iter()
                .map(|customer| {
                    format!("  - {}: {} ({})", customer.id, customer.name, customer.national_id)
                })
                .collect();
            CommandResult::success("seed", render_message(&seeded, &lines))
        }
        Err(error) => CommandResult::failure("seed", "seed_execution", error.to_string(), 5),
    }
}

fn render_message(seeded: &SeedResult, lines: &[String]) -> String {
    format!(
        "{} demo customer(s) loaded into a fresh repository:\n{}",
        seeded.created,
        lines.join("\n")
    )
}
