//! Stock movement log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StockLocation;

/// Reason text recorded for warehouse-to-store transfers
pub const TRANSFER_TO_STORE_REASON: &str = "Transfer: Warehouse -> Store";

/// Kind of inventory movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    In,
    Out,
    /// Manual correction or internal transfer; adds to the target location
    Adjustment,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::In => "IN",
            MovementKind::Out => "OUT",
            MovementKind::Adjustment => "ADJUSTMENT",
        }
    }

    /// Sign applied to the quantity when updating a location
    pub fn sign(&self) -> i32 {
        match self {
            MovementKind::Out => -1,
            MovementKind::In | MovementKind::Adjustment => 1,
        }
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN" => Ok(MovementKind::In),
            "OUT" => Ok(MovementKind::Out),
            "ADJUSTMENT" => Ok(MovementKind::Adjustment),
            other => Err(format!("unknown movement kind: {}", other)),
        }
    }
}

/// Append-only record of an inventory change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub kind: MovementKind,
    pub quantity: i32,
    /// `None` for warehouse-to-store transfers
    pub location: Option<StockLocation>,
    pub reason: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
