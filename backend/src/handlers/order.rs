//! HTTP handlers for order endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{
    Order, OrderStatus, Pagination, PaginatedResponse, RecentOrder, INVENTORY_ROLES,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::order::{OrderDetails, OrderFilter, UpdateStatusInput};
use crate::services::OrderService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List orders, newest first
pub async fn list_orders(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<PaginatedResponse<RecentOrder>>> {
    let defaults = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = OrderFilter {
        status: query.status,
    };

    let service = OrderService::new(state.db);
    Ok(Json(service.list(&filter, &pagination).await?))
}

/// Order with lines and customer
pub async fn get_order(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderDetails>> {
    let service = OrderService::new(state.db);
    Ok(Json(service.get_details(order_id).await?))
}

/// Complete or cancel an order
pub async fn update_order_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<Order>> {
    require_role(&current_user.0, INVENTORY_ROLES)?;
    let service = OrderService::new(state.db);
    Ok(Json(service.update_status(order_id, input.status).await?))
}
