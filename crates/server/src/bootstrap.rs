use std::sync::Arc;

use axum::Router;
use clientes_core::config::{AppConfig, ConfigError, LoadOptions};
use clientes_db::{fixtures, CustomerRepository, InMemoryCustomerRepository, RepositoryError};
use thiserror::Error;
use tracing::info;

use crate::{customers, health};

pub struct Application {
    pub config: AppConfig,
    pub repository: Arc<dyn CustomerRepository>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("demo data seeding failed: {0}")]
    Seed(#[source] RepositoryError),
}

impl Application {
    pub fn router(&self) -> Router {
        customers::router(Arc::clone(&self.repository))
            .merge(health::router(Arc::clone(&self.repository), self.config.repository.id_strategy))
    }
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        id_strategy = ?config.repository.id_strategy,
        "starting application bootstrap"
    );

    let repository = Arc::new(InMemoryCustomerRepository::new(config.repository.id_strategy));

    if config.repository.seed_demo_data {
        let seeded = fixtures::seed(repository.as_ref()).await.map_err(BootstrapError::Seed)?;
        info!(
            event_name = "system.bootstrap.demo_data_seeded",
            correlation_id = "bootstrap",
            created = seeded.created,
            "demo customers loaded"
        );
    }

    Ok(Application { config, repository })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use clientes_core::config::{ConfigOverrides, IdStrategy, LoadOptions};
    use clientes_core::domain::customer::CustomerId;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::bootstrap::bootstrap;

    #[tokio::test]
    async fn bootstrap_fails_fast_on_invalid_config() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                log_level: Some("verbose".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        let message = result.err().expect("error").to_string();
        assert!(message.contains("logging.level"));
    }

    #[tokio::test]
    async fn bootstrap_seeds_demo_data_when_enabled() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                id_strategy: Some(IdStrategy::MaxPlusOne),
                seed_demo_data: Some(true),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should succeed");

        assert_eq!(app.repository.get_all().await.len(), 4);
        assert!(app.repository.get_by_id(CustomerId(1)).await.is_some());
    }

    #[tokio::test]
    async fn router_serves_customers_and_health() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                seed_demo_data: Some(true),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should succeed");
        let router = app.router();

        let response = router
            .clone()
            .oneshot(Request::get("/api/customers").body(Body::empty()).expect("request"))
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let list: Value = serde_json::from_slice(&bytes).expect("json list");
        assert_eq!(list.as_array().map(Vec::len), Some(4));

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
