use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use clientes_core::config::IdStrategy;
use clientes_db::CustomerRepository;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    repository: Arc<dyn CustomerRepository>,
    id_strategy: IdStrategy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub repository: HealthCheck,
    pub checked_at: String,
}

pub fn router(repository: Arc<dyn CustomerRepository>, id_strategy: IdStrategy) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { repository, id_strategy })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let records = state.repository.get_all().await.len();

    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "clientes-server runtime initialized".to_string(),
        },
        repository: HealthCheck {
            status: "ready",
            detail: format!(
                "{records} customer record(s) held in memory (id strategy: {:?})",
                state.id_strategy
            ),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}
