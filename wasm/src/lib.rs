//! WebAssembly module for the POS+ dashboard
//!
//! Provides client-side computation for:
//! - Stock health classification and the details dialog
//! - The seven-day sales chart and day-over-day growth
//! - Price display in dollars or bolívares
//! - Adjustment form checks before submitting

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::adjustment::plan_adjustment;
use shared::analytics::{build_daily_series, percent_change, today_index, DailyGrowth};
use shared::currency::{format_currency, Currency};
use shared::stock::{classify_products, location_status};
use shared::{MovementKind, OrderSummary, Product, StockLocation};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("pos-dashboard wasm ready"));
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization failed", e))
}

fn browser_now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(js_sys::Date::now() as i64)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Status of one location: `healthy`, `warning` or `critical`
#[wasm_bindgen]
pub fn stock_status(current: i32, baseline: i32) -> String {
    location_status(current, baseline).to_string()
}

/// Bucket products by stock health; returns the report as JSON
#[wasm_bindgen]
pub fn classify_stock(products_json: &str) -> Result<String, JsValue> {
    let products: Vec<Product> =
        serde_json::from_str(products_json).map_err(|e| js_error("Invalid products JSON", e))?;
    to_json(&classify_products(&products))
}

/// Per-location entries split into dialog tabs
#[wasm_bindgen]
pub fn stock_entry_tabs(products_json: &str) -> Result<String, JsValue> {
    let products: Vec<Product> =
        serde_json::from_str(products_json).map_err(|e| js_error("Invalid products JSON", e))?;
    to_json(&classify_products(&products).entry_tabs())
}

#[derive(Serialize)]
struct ChartView {
    series: Vec<shared::analytics::DailySales>,
    selected: Option<usize>,
    growth: DailyGrowth,
}

fn chart_view(orders: &[OrderSummary], now: DateTime<Utc>, selected: Option<usize>) -> ChartView {
    let today = now.date_naive();
    let series = build_daily_series(orders, today);
    let selected = selected
        .filter(|i| *i < series.len())
        .or_else(|| today_index(&series, today));
    let growth = selected
        .map(|i| DailyGrowth::for_day(&series, i))
        .unwrap_or_default();
    ChartView {
        series,
        selected,
        growth,
    }
}

/// Chart series and growth for the selected bar (today when omitted)
#[wasm_bindgen]
pub fn sales_chart(orders_json: &str, selected: Option<u32>) -> Result<String, JsValue> {
    let orders: Vec<OrderSummary> =
        serde_json::from_str(orders_json).map_err(|e| js_error("Invalid orders JSON", e))?;
    let view = chart_view(&orders, browser_now(), selected.map(|i| i as usize));
    to_json(&view)
}

/// Day-over-day change in percent
#[wasm_bindgen]
pub fn growth_percent(previous: f64, current: f64) -> f64 {
    percent_change(previous, current)
}

/// Format a dollar amount for display, `USD` or `VES`
#[wasm_bindgen]
pub fn format_price(amount_usd: f64, currency: &str, dollar_rate: f64) -> String {
    let currency = match currency.to_ascii_uppercase().as_str() {
        "VES" => Currency::Ves,
        _ => Currency::Usd,
    };
    let amount = Decimal::try_from(amount_usd).unwrap_or(Decimal::ZERO);
    format_currency(amount, currency, dollar_rate)
}

/// Check an adjustment before it is sent; returns the resulting levels as
/// JSON or the reason it would be refused
#[wasm_bindgen]
pub fn check_adjustment(
    store_stock: i32,
    warehouse_stock: i32,
    kind: &str,
    quantity: i32,
    location: &str,
) -> Result<String, JsValue> {
    let kind: MovementKind = kind.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let location: StockLocation = location.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let plan = plan_adjustment(store_stock, warehouse_stock, kind, quantity, location, "")
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&plan)
}
