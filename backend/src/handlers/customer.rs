//! HTTP handlers for customer endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::Customer;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::customer::CreateCustomerInput;
use crate::services::CustomerService;
use crate::AppState;

pub async fn list_customers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Checkout lookup by cédula
pub async fn get_customer_by_cedula(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(cedula): Path<String>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    Ok(Json(service.find_by_cedula(&cedula).await?))
}

pub async fn create_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let service = CustomerService::new(state.db);
    let customer = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = CustomerService::new(state.db);
    service.delete(customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
