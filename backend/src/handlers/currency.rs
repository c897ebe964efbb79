//! HTTP handlers for the currency overlay

use axum::{extract::State, Json};
use shared::ResolvedRate;

use crate::middleware::CurrentUser;
use crate::services::currency::{Conversion, ConvertInput};
use crate::AppState;

/// Current USD/VES rate and where it came from
pub async fn get_rates(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> Json<ResolvedRate> {
    Json(state.rates.current_rate().await)
}

/// Convert a dollar amount for display
pub async fn convert(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<ConvertInput>,
) -> Json<Conversion> {
    Json(state.rates.convert(input).await)
}
