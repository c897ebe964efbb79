//! Reporting handlers for data export

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::REPORT_ROLES;

use crate::error::{AppError, AppResult};
use crate::middleware::{require_role, CurrentUser};
use crate::services::reporting::ReportFilter;
use crate::services::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

/// Parse an optional `YYYY-MM-DD` query value; blank means unset
fn parse_date(field: &str, raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Some).map_err(|_| {
            AppError::validation(
                field,
                "Invalid date, expected YYYY-MM-DD",
                "Fecha inválida, se espera AAAA-MM-DD",
            )
        }),
    }
}

impl ReportQuery {
    fn filter(&self) -> AppResult<ReportFilter> {
        Ok(ReportFilter {
            start_date: parse_date("start_date", self.start_date.as_deref())?,
            end_date: parse_date("end_date", self.end_date.as_deref())?,
        })
    }

    fn wants_csv(&self) -> bool {
        self.format.as_deref() == Some("csv")
    }
}

fn respond<T: Serialize>(
    query: &ReportQuery,
    data: Vec<T>,
    file_name: &str,
) -> AppResult<Response> {
    if query.wants_csv() {
        let csv = ReportingService::export_to_csv(&data)?;
        let disposition = format!("attachment; filename=\"{}\"", file_name);
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(data).into_response())
    }
}

/// Daily sales report
pub async fn get_sales_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    require_role(&current_user.0, REPORT_ROLES)?;
    let service = ReportingService::new(state.db);
    let data = service.get_sales_report(&query.filter()?).await?;
    respond(&query, data, "sales.csv")
}

/// Stock movement report
pub async fn get_stock_movement_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    require_role(&current_user.0, REPORT_ROLES)?;
    let service = ReportingService::new(state.db);
    let data = service.get_stock_movement_report(&query.filter()?).await?;
    respond(&query, data, "stock_movements.csv")
}
