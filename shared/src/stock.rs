//! Stock health classification across store and warehouse inventories
//!
//! Each location is judged against its own baseline (the quantity recorded
//! at the last restock or reset). A product is as unhealthy as its worse
//! location, and low-stock lists put the most depleted products first.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{LocationStock, Product, StockLocation};

/// At or below this share of baseline a location is critical
pub const CRITICAL_PERCENT: i64 = 20;

/// At or below this share of baseline a location needs attention
pub const WARNING_PERCENT: i64 = 50;

/// Number of low-stock rows shown on the dashboard card
pub const SUMMARY_ROWS: usize = 3;

/// Health of a single location or product.
///
/// Variants are ordered by severity so `max` yields the worse status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Healthy,
    Warning,
    Critical,
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::Healthy => write!(f, "healthy"),
            StockStatus::Warning => write!(f, "warning"),
            StockStatus::Critical => write!(f, "critical"),
        }
    }
}

impl LocationStock {
    /// Denominator for percentage-remaining; never below the current
    /// quantity and never below 1.
    pub fn effective_baseline(&self) -> i64 {
        i64::from(self.baseline)
            .max(i64::from(self.current))
            .max(1)
    }

    /// Percentage of baseline remaining, 0.0 to 100.0
    pub fn percent(&self) -> f64 {
        let current = i64::from(self.current.max(0));
        current as f64 / self.effective_baseline() as f64 * 100.0
    }

    /// Exact integer check of `percent() <= threshold`
    pub fn is_at_or_below(&self, threshold_percent: i64) -> bool {
        let current = i64::from(self.current.max(0));
        current * 100 <= threshold_percent * self.effective_baseline()
    }

    pub fn status(&self) -> StockStatus {
        if self.current <= 0 || self.is_at_or_below(CRITICAL_PERCENT) {
            StockStatus::Critical
        } else if self.is_at_or_below(WARNING_PERCENT) {
            StockStatus::Warning
        } else {
            StockStatus::Healthy
        }
    }
}

/// Classify one location from its current quantity and baseline
pub fn location_status(current: i32, baseline: i32) -> StockStatus {
    LocationStock::new(current, baseline).status()
}

/// Computed health of one location
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LocationHealth {
    pub current: i32,
    pub baseline: i32,
    pub percent: f64,
    pub status: StockStatus,
}

impl From<LocationStock> for LocationHealth {
    fn from(stock: LocationStock) -> Self {
        Self {
            current: stock.current,
            baseline: stock.baseline,
            percent: stock.percent(),
            status: stock.status(),
        }
    }
}

/// A product with both locations classified
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductHealth {
    #[serde(flatten)]
    pub product: Product,
    pub store: LocationHealth,
    pub warehouse: LocationHealth,
    /// Worse of the two location statuses
    pub status: StockStatus,
    /// Lower of the two location percentages; the bucket sort key
    pub worst_percent: f64,
}

impl ProductHealth {
    pub fn location(&self, location: StockLocation) -> &LocationHealth {
        match location {
            StockLocation::Store => &self.store,
            StockLocation::Warehouse => &self.warehouse,
        }
    }
}

/// Classify a single product
pub fn classify_product(product: &Product) -> ProductHealth {
    let store = LocationHealth::from(product.stock_at(StockLocation::Store));
    let warehouse = LocationHealth::from(product.stock_at(StockLocation::Warehouse));

    ProductHealth {
        product: product.clone(),
        status: store.status.max(warehouse.status),
        worst_percent: store.percent.min(warehouse.percent),
        store,
        warehouse,
    }
}

/// Products bucketed by health
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockReport {
    pub critical: Vec<ProductHealth>,
    pub warning: Vec<ProductHealth>,
    pub healthy: Vec<ProductHealth>,
    /// Critical followed by warning, most depleted first
    pub low_stock: Vec<ProductHealth>,
    /// Healthy products, most stocked store first
    pub healthy_products: Vec<ProductHealth>,
    pub critical_count: usize,
    pub warning_count: usize,
    pub total_products_count: usize,
}

/// Bucket products by stock health.
///
/// Buckets are ordered by ascending worst percentage; ties keep input order.
pub fn classify_products(products: &[Product]) -> StockReport {
    let mut classified: Vec<ProductHealth> = products.iter().map(classify_product).collect();
    classified.sort_by(|a, b| a.worst_percent.total_cmp(&b.worst_percent));

    let mut report = StockReport {
        total_products_count: products.len(),
        ..StockReport::default()
    };

    for health in classified {
        match health.status {
            StockStatus::Critical => report.critical.push(health),
            StockStatus::Warning => report.warning.push(health),
            StockStatus::Healthy => report.healthy.push(health),
        }
    }

    report.low_stock = report
        .critical
        .iter()
        .chain(report.warning.iter())
        .cloned()
        .collect();
    report
        .low_stock
        .sort_by(|a, b| a.worst_percent.total_cmp(&b.worst_percent));

    report.healthy_products = report.healthy.clone();
    report
        .healthy_products
        .sort_by(|a, b| b.product.store_stock.cmp(&a.product.store_stock));

    report.critical_count = report.critical.len();
    report.warning_count = report.low_stock.len() - report.critical_count;
    report
}

/// One line on the low-stock card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRow {
    pub product_id: Uuid,
    pub name: String,
    pub location: StockLocation,
    pub quantity: i32,
    pub status: StockStatus,
}

/// Pick the location to show for a low-stock product.
///
/// A critical warehouse wins over a critical store, then a critical store,
/// then a warning warehouse, else the store figure.
pub fn summary_row(health: &ProductHealth) -> SummaryRow {
    let store = health.product.stock_at(StockLocation::Store);
    let warehouse = health.product.stock_at(StockLocation::Warehouse);

    let (location, status) = if warehouse.is_at_or_below(CRITICAL_PERCENT) {
        (StockLocation::Warehouse, StockStatus::Critical)
    } else if store.is_at_or_below(CRITICAL_PERCENT) {
        (StockLocation::Store, StockStatus::Critical)
    } else if warehouse.is_at_or_below(WARNING_PERCENT) {
        (StockLocation::Warehouse, StockStatus::Warning)
    } else {
        (StockLocation::Store, StockStatus::Warning)
    };

    SummaryRow {
        product_id: health.product.id,
        name: health.product.name.clone(),
        location,
        quantity: health.location(location).current,
        status,
    }
}

/// Data behind the dashboard low-stock card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockSummary {
    pub rows: Vec<SummaryRow>,
    /// Low-stock products not listed in `rows`
    pub more_count: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub total_products_count: usize,
    pub has_alerts: bool,
}

impl StockReport {
    pub fn summary(&self) -> StockSummary {
        StockSummary {
            rows: self
                .low_stock
                .iter()
                .take(SUMMARY_ROWS)
                .map(summary_row)
                .collect(),
            more_count: self.low_stock.len().saturating_sub(SUMMARY_ROWS),
            critical_count: self.critical_count,
            warning_count: self.warning_count,
            total_products_count: self.total_products_count,
            has_alerts: !self.low_stock.is_empty(),
        }
    }
}

/// How a flattened entry relates to its product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Both locations share a status
    Combined,
    Store,
    Warehouse,
}

/// A row in the stock details dialog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockEntry {
    pub id: String,
    pub product_id: Uuid,
    pub name: String,
    pub kind: EntryKind,
    pub status: StockStatus,
    pub store: LocationHealth,
    pub warehouse: LocationHealth,
}

/// Entries split into dialog tabs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntryTabs {
    pub critical: Vec<StockEntry>,
    pub warning: Vec<StockEntry>,
    pub healthy: Vec<StockEntry>,
    /// First non-empty tab among critical, warning, healthy
    pub default_tab: StockStatus,
    pub total_products_count: usize,
}

fn entry(health: &ProductHealth, kind: EntryKind, status: StockStatus) -> StockEntry {
    StockEntry {
        id: format!("{}-{}", health.product.id, kind_label(kind)),
        product_id: health.product.id,
        name: health.product.name.clone(),
        kind,
        status,
        store: health.store,
        warehouse: health.warehouse,
    }
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Combined => "combined",
        EntryKind::Store => "store",
        EntryKind::Warehouse => "warehouse",
    }
}

/// Flatten products into per-location entries.
///
/// A product whose locations agree yields one combined entry; otherwise it
/// yields a store entry and a warehouse entry, each with its own status.
pub fn stock_entries<'a, I>(products: I) -> Vec<StockEntry>
where
    I: IntoIterator<Item = &'a ProductHealth>,
{
    let mut entries = Vec::new();
    for health in products {
        if health.store.status == health.warehouse.status {
            entries.push(entry(health, EntryKind::Combined, health.store.status));
        } else {
            entries.push(entry(health, EntryKind::Store, health.store.status));
            entries.push(entry(health, EntryKind::Warehouse, health.warehouse.status));
        }
    }
    entries
}

impl StockReport {
    /// Dialog tabs built from low-stock products then healthy ones
    pub fn entry_tabs(&self) -> StockEntryTabs {
        let entries = stock_entries(self.low_stock.iter().chain(self.healthy_products.iter()));

        let mut critical = Vec::new();
        let mut warning = Vec::new();
        let mut healthy = Vec::new();
        for e in entries {
            match e.status {
                StockStatus::Critical => critical.push(e),
                StockStatus::Warning => warning.push(e),
                StockStatus::Healthy => healthy.push(e),
            }
        }

        let default_tab = if !critical.is_empty() {
            StockStatus::Critical
        } else if !warning.is_empty() {
            StockStatus::Warning
        } else {
            StockStatus::Healthy
        };

        StockEntryTabs {
            critical,
            warning,
            healthy,
            default_tab,
            total_products_count: self.total_products_count,
        }
    }
}
