//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product sold at the counter, stocked in two places
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub available: bool,
    /// Sales-floor quantity
    pub store_stock: i32,
    /// Reserve quantity
    pub warehouse_stock: i32,
    /// Store quantity at the last restock or reset
    pub initial_store_stock: i32,
    /// Warehouse quantity at the last restock or reset
    pub initial_warehouse_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Current quantity and baseline for a location
    pub fn stock_at(&self, location: StockLocation) -> LocationStock {
        match location {
            StockLocation::Store => LocationStock {
                current: self.store_stock,
                baseline: self.initial_store_stock,
            },
            StockLocation::Warehouse => LocationStock {
                current: self.warehouse_stock,
                baseline: self.initial_warehouse_stock,
            },
        }
    }
}

/// Current quantity against its baseline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationStock {
    pub current: i32,
    pub baseline: i32,
}

impl LocationStock {
    pub fn new(current: i32, baseline: i32) -> Self {
        Self { current, baseline }
    }
}

/// Where a unit of stock physically sits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StockLocation {
    Store,
    Warehouse,
}

impl StockLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockLocation::Store => "store",
            StockLocation::Warehouse => "warehouse",
        }
    }

    /// Label appended to movement reasons
    pub fn reason_suffix(&self) -> &'static str {
        match self {
            StockLocation::Store => "STORE",
            StockLocation::Warehouse => "WAREHOUSE",
        }
    }
}

impl std::str::FromStr for StockLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "store" => Ok(StockLocation::Store),
            "warehouse" => Ok(StockLocation::Warehouse),
            other => Err(format!("unknown stock location: {}", other)),
        }
    }
}
