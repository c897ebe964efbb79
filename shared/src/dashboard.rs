//! Dashboard view model assembled from independently fetched sections

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{
    aggregate_top_selling, build_daily_series, cancelled_count, sales_totals, series_start,
    today_index, DailyGrowth, DailySales, TopSelling,
};
use crate::models::{OrderSummary, Product, RecentOrder, SoldLine};
use crate::stock::{classify_products, ProductHealth, StockSummary};

/// Raw rows for each dashboard section; `None` marks a section whose fetch
/// failed and must fall back to its empty default.
#[derive(Debug, Clone, Default)]
pub struct DashboardSections {
    pub completed_orders: Option<Vec<OrderSummary>>,
    pub recent_orders: Option<Vec<RecentOrder>>,
    pub sold_lines: Option<Vec<SoldLine>>,
    pub cancelled_orders: Option<Vec<OrderSummary>>,
    pub products: Option<Vec<Product>>,
}

/// Everything the dashboard page renders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_sales: Decimal,
    pub total_orders: u64,
    pub recent_orders: Vec<RecentOrder>,
    pub chart_data: Vec<DailySales>,
    /// Headline entry for today
    pub today: Option<DailySales>,
    pub growth: DailyGrowth,
    pub top_selling: TopSelling,
    pub cancelled_count: u64,
    pub stock: StockSummary,
    pub low_stock_products: Vec<ProductHealth>,
    pub healthy_products: Vec<ProductHealth>,
    pub total_products_count: usize,
}

/// Combine fetched sections into the dashboard view model.
///
/// Missing sections contribute zeros; the chart keeps its seven days even
/// when no order data arrived.
pub fn assemble_dashboard(sections: DashboardSections, now: DateTime<Utc>) -> DashboardStats {
    let today = now.date_naive();
    let completed = sections.completed_orders.unwrap_or_default();
    let cancelled = sections.cancelled_orders.unwrap_or_default();

    let totals = sales_totals(&completed);
    let all_orders: Vec<OrderSummary> =
        completed.into_iter().chain(cancelled.iter().cloned()).collect();
    let chart_data = build_daily_series(&all_orders, today);

    let (today_entry, growth) = match today_index(&chart_data, today) {
        Some(i) => (chart_data.get(i).cloned(), DailyGrowth::for_day(&chart_data, i)),
        None => (None, DailyGrowth::default()),
    };

    let window_start = series_start(now);
    let mut recent_orders: Vec<RecentOrder> = sections
        .recent_orders
        .unwrap_or_default()
        .into_iter()
        .filter(|o| o.created_at >= window_start)
        .collect();
    recent_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let report = classify_products(&sections.products.unwrap_or_default());

    DashboardStats {
        total_sales: totals.total_sales,
        total_orders: totals.total_orders,
        recent_orders,
        today: today_entry,
        growth,
        chart_data,
        top_selling: sections
            .sold_lines
            .map(|lines| aggregate_top_selling(&lines, now))
            .unwrap_or_default(),
        cancelled_count: cancelled_count(&cancelled),
        stock: report.summary(),
        total_products_count: report.total_products_count,
        low_stock_products: report.low_stock,
        healthy_products: report.healthy_products,
    }
}
