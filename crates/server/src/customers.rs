//! Customer CRUD endpoints.
//!
//! - `GET    /api/customers`: every customer in insertion order
//! - `GET    /api/customers/{id}`: one customer
//! - `POST   /api/customers`: create, answers 201 with a `Location` header
//! - `PUT    /api/customers/{id}`: replace name, email and phone, answers 204
//! - `DELETE /api/customers/{id}`: remove, answers 204

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use clientes_core::domain::customer::{Customer, CustomerId};
use clientes_core::errors::{ApplicationError, DomainError, InterfaceError};
use clientes_db::CustomerRepository;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::payload::CustomerPayload;

#[derive(Clone)]
pub struct CustomerState {
    repository: Arc<dyn CustomerRepository>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

type ApiFailure = (StatusCode, Json<ErrorBody>);

pub fn router(repository: Arc<dyn CustomerRepository>) -> Router {
    Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .with_state(CustomerState { repository })
}

async fn list_customers(State(state): State<CustomerState>) -> Json<Vec<Customer>> {
    Json(state.repository.get_all().await)
}

async fn get_customer(
    path: Result<Path<u64>, PathRejection>,
    State(state): State<CustomerState>,
) -> Result<Json<Customer>, ApiFailure> {
    let id = customer_id(path, "customer.get")?;
    state
        .repository
        .get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| failure(DomainError::NotFound { id }.into(), "customer.get"))
}

async fn create_customer(
    State(state): State<CustomerState>,
    payload: Result<Json<CustomerPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiFailure> {
    let Json(payload) = payload.map_err(|rejection| malformed_body(rejection, "customer.create"))?;
    let draft = payload.into_draft().map_err(|error| failure(error, "customer.create"))?;

    let customer = state
        .repository
        .create(draft)
        .await
        .map_err(|error| failure(error.into(), "customer.create"))?;

    info!(event_name = "http.customer.created", customer_id = %customer.id, "customer created");
    let location = format!("/api/customers/{}", customer.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(customer)))
}

async fn update_customer(
    path: Result<Path<u64>, PathRejection>,
    State(state): State<CustomerState>,
    payload: Result<Json<CustomerPayload>, JsonRejection>,
) -> Result<StatusCode, ApiFailure> {
    let id = customer_id(path, "customer.update")?;
    let Json(payload) = payload.map_err(|rejection| malformed_body(rejection, "customer.update"))?;
    let changes = payload.into_changes(id).map_err(|error| failure(error, "customer.update"))?;

    state
        .repository
        .update(changes)
        .await
        .map_err(|error| failure(error.into(), "customer.update"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_customer(
    path: Result<Path<u64>, PathRejection>,
    State(state): State<CustomerState>,
) -> Result<StatusCode, ApiFailure> {
    let id = customer_id(path, "customer.delete")?;
    state
        .repository
        .delete(id)
        .await
        .map_err(|error| failure(error.into(), "customer.delete"))?;

    Ok(StatusCode::NO_CONTENT)
}

fn customer_id(
    path: Result<Path<u64>, PathRejection>,
    operation: &'static str,
) -> Result<CustomerId, ApiFailure> {
    path.map(|Path(id)| CustomerId(id)).map_err(|rejection| {
        failure(ApplicationError::InvalidPayload(rejection.body_text()), operation)
    })
}

fn malformed_body(rejection: JsonRejection, operation: &'static str) -> ApiFailure {
    failure(ApplicationError::InvalidPayload(rejection.body_text()), operation)
}

fn failure(error: ApplicationError, operation: &'static str) -> ApiFailure {
    let correlation_id = Uuid::new_v4().to_string();
    let interface = error.into_interface(correlation_id);

    warn!(
        event_name = "http.customer.rejected",
        operation,
        correlation_id = %interface.correlation_id(),
        error = %interface,
        "customer request rejected"
    );

    let status = match &interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
    };
    let body = ErrorBody {
        error: interface.message().to_string(),
        correlation_id: interface.correlation_id().to_string(),
    };
    (status, Json(body))
}
