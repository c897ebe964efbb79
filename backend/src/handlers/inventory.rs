//! HTTP handlers for inventory management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::{Pagination, PaginatedResponse, StockMovement, INVENTORY_ROLES};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::inventory::{AdjustStockInput, AdjustmentResult, MovementEntry, TransferInput};
use crate::services::InventoryService;
use crate::AppState;

/// Record an IN/OUT/ADJUSTMENT against the store or warehouse
pub async fn adjust_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<AdjustmentResult>> {
    require_role(&current_user.0, INVENTORY_ROLES)?;
    let service = InventoryService::new(state.db);
    let result = service.adjust_stock(current_user.0.user_id, input).await?;
    Ok(Json(result))
}

/// Move stock from the warehouse to the store
pub async fn transfer_to_store(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<TransferInput>,
) -> AppResult<Json<AdjustmentResult>> {
    require_role(&current_user.0, INVENTORY_ROLES)?;
    let service = InventoryService::new(state.db);
    let result = service
        .transfer_to_store(current_user.0.user_id, input)
        .await?;
    Ok(Json(result))
}

/// Movement log across products
pub async fn list_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<PaginatedResponse<MovementEntry>>> {
    let service = InventoryService::new(state.db);
    Ok(Json(service.list_movements(&pagination).await?))
}

/// Movement history for a product
pub async fn get_product_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = InventoryService::new(state.db);
    Ok(Json(service.product_movements(product_id).await?))
}
