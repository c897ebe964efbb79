//! HTTP handlers for the dashboard and stock overview

use axum::{extract::State, Json};
use shared::dashboard::DashboardStats;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dashboard::StockOverview;
use crate::services::DashboardService;
use crate::AppState;

/// Dashboard stats; sections that fail to load come back empty
pub async fn get_dashboard(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> Json<DashboardStats> {
    let service = DashboardService::new(state.db);
    Json(service.get_stats().await)
}

/// Stock buckets and the per-location details view
pub async fn get_stock_overview(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<StockOverview>> {
    let service = DashboardService::new(state.db);
    let overview = service.get_stock_overview().await?;
    Ok(Json(overview))
}
