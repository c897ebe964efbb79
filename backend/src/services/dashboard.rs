//! Dashboard composition
//!
//! The five sections are fetched concurrently. A section that fails is
//! logged and rendered from its empty default so the page always loads.

use chrono::{Duration, Utc};
use serde::Serialize;
use shared::analytics::{series_start, TOP_SELLING_LOOKBACK_DAYS};
use shared::dashboard::{assemble_dashboard, DashboardSections, DashboardStats};
use shared::stock::{classify_products, StockEntryTabs, StockReport};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::order::{
    fetch_cancelled_orders, fetch_completed_orders, fetch_recent_orders, fetch_sold_lines,
};
use crate::services::product::fetch_all_products;

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Stock page: classified buckets plus the per-location details dialog
#[derive(Debug, Clone, Serialize)]
pub struct StockOverview {
    #[serde(flatten)]
    pub report: StockReport,
    pub entries: StockEntryTabs,
}

/// Keep a section's rows, or log the failure and mark it missing
fn soft<T>(section: &str, result: AppResult<Vec<T>>) -> Option<Vec<T>> {
    match result {
        Ok(rows) => Some(rows),
        Err(e) => {
            tracing::error!("Failed to load dashboard {}: {}", section, e);
            None
        }
    }
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build the dashboard; never fails
    pub async fn get_stats(&self) -> DashboardStats {
        let now = Utc::now();
        let since = now - Duration::days(TOP_SELLING_LOOKBACK_DAYS);

        let (completed, recent, sold, cancelled, products) = tokio::join!(
            fetch_completed_orders(&self.db),
            fetch_recent_orders(&self.db, series_start(now)),
            fetch_sold_lines(&self.db, since),
            fetch_cancelled_orders(&self.db),
            fetch_all_products(&self.db),
        );

        let sections = DashboardSections {
            completed_orders: soft("sales totals", completed),
            recent_orders: soft("recent orders", recent),
            sold_lines: soft("top selling", sold),
            cancelled_orders: soft("cancellations", cancelled),
            products: soft("stock", products),
        };

        assemble_dashboard(sections, now)
    }

    /// Full stock classification for the stock page
    pub async fn get_stock_overview(&self) -> AppResult<StockOverview> {
        let products = fetch_all_products(&self.db).await?;
        let report = classify_products(&products);
        let entries = report.entry_tabs();

        Ok(StockOverview { report, entries })
    }
}
