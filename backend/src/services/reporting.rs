//! Reporting service for sales and stock-movement exports
//! Reports are flat rows so they serialize to CSV as well as JSON

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Default report window when no dates are given
const DEFAULT_REPORT_DAYS: i64 = 30;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Sales for one calendar day
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DailySalesReportRow {
    pub date: NaiveDate,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    pub revenue: Decimal,
}

/// One movement log line
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StockMovementReportRow {
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub kind: String,
    pub quantity: i32,
    pub location: Option<String>,
    pub reason: String,
}

/// Report filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportFilter {
    /// Inclusive date range, defaulting to the last 30 days
    pub fn range(&self, today: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
        let end = self.end_date.unwrap_or(today);
        let start = self
            .start_date
            .unwrap_or(end - Duration::days(DEFAULT_REPORT_DAYS - 1));

        if start > end {
            return Err(AppError::validation(
                "start_date",
                "Start date must not be after end date",
                "La fecha inicial no puede ser posterior a la final",
            ));
        }

        Ok((start, end))
    }
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Daily completed/cancelled counts and revenue over the range
    pub async fn get_sales_report(
        &self,
        filter: &ReportFilter,
    ) -> AppResult<Vec<DailySalesReportRow>> {
        let (start, end) = filter.range(Utc::now().date_naive())?;

        let rows = sqlx::query_as::<_, DailySalesReportRow>(
            r#"
            SELECT d.day::date AS date,
                   COUNT(o.id) FILTER (WHERE o.status = 'COMPLETED') AS completed_orders,
                   COUNT(o.id) FILTER (WHERE o.status = 'CANCELLED') AS cancelled_orders,
                   COALESCE(SUM(o.total_amount) FILTER (WHERE o.status = 'COMPLETED'), 0) AS revenue
            FROM generate_series($1::date, $2::date, INTERVAL '1 day') AS d(day)
            LEFT JOIN orders o ON (o.created_at AT TIME ZONE 'UTC')::date = d.day::date
            GROUP BY d.day
            ORDER BY d.day
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Movement log lines over the range, oldest first
    pub async fn get_stock_movement_report(
        &self,
        filter: &ReportFilter,
    ) -> AppResult<Vec<StockMovementReportRow>> {
        let (start, end) = filter.range(Utc::now().date_naive())?;

        let rows = sqlx::query_as::<_, StockMovementReportRow>(
            r#"
            SELECT m.created_at, COALESCE(p.name, m.product_name) AS product_name,
                   m.kind, m.quantity, m.location, m.reason
            FROM stock_movements m
            LEFT JOIN products p ON p.id = m.product_id
            WHERE (m.created_at AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_default_range_is_thirty_days() {
        let (start, end) = ReportFilter::default().range(date("2026-01-30")).unwrap();
        assert_eq!(start, date("2026-01-01"));
        assert_eq!(end, date("2026-01-30"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let filter = ReportFilter {
            start_date: Some(date("2026-02-01")),
            end_date: Some(date("2026-01-01")),
        };
        assert!(filter.range(date("2026-02-10")).is_err());
    }

    #[test]
    fn test_export_to_csv() {
        let rows = vec![
            DailySalesReportRow {
                date: date("2026-01-06"),
                completed_orders: 2,
                cancelled_orders: 1,
                revenue: Decimal::new(8000, 2),
            },
            DailySalesReportRow {
                date: date("2026-01-07"),
                completed_orders: 0,
                cancelled_orders: 0,
                revenue: Decimal::ZERO,
            },
        ];

        let csv = ReportingService::export_to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("date,completed_orders,cancelled_orders,revenue")
        );
        assert_eq!(lines.next(), Some("2026-01-06,2,1,80.00"));
        assert_eq!(lines.next(), Some("2026-01-07,0,0,0"));
    }
}
