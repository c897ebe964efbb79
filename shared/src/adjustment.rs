//! Stock adjustment planning
//!
//! Works out the signed change an adjustment applies and rejects it up
//! front when the target location would go negative. The backend applies
//! the same delta with a conditional update so concurrent adjustments are
//! checked again inside the transaction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{MovementKind, StockLocation, TRANSFER_TO_STORE_REASON};

/// Why an adjustment was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjustmentError {
    #[error("Quantity must be positive")]
    NonPositiveQuantity,

    #[error("Insufficient {} stock: {available} available, {requested} requested", .location.as_str())]
    InsufficientStock {
        location: StockLocation,
        available: i32,
        requested: i32,
    },

    #[error("Resulting stock exceeds the supported range")]
    Overflow,
}

/// A validated change to one or both locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentPlan {
    pub kind: MovementKind,
    /// Units as entered, always positive
    pub quantity: i32,
    pub store_delta: i32,
    pub warehouse_delta: i32,
    pub new_store_stock: i32,
    pub new_warehouse_stock: i32,
    /// `None` for transfers
    pub location: Option<StockLocation>,
    pub reason: String,
}

/// Plan an IN/OUT/ADJUSTMENT against a single location.
///
/// The reason is suffixed with the location label, e.g. `Restock (STORE)`.
pub fn plan_adjustment(
    store_stock: i32,
    warehouse_stock: i32,
    kind: MovementKind,
    quantity: i32,
    location: StockLocation,
    reason: &str,
) -> Result<AdjustmentPlan, AdjustmentError> {
    if quantity <= 0 {
        return Err(AdjustmentError::NonPositiveQuantity);
    }

    let delta = quantity
        .checked_mul(kind.sign())
        .ok_or(AdjustmentError::Overflow)?;
    let current = match location {
        StockLocation::Store => store_stock,
        StockLocation::Warehouse => warehouse_stock,
    };
    let next = current.checked_add(delta).ok_or(AdjustmentError::Overflow)?;
    if next < 0 {
        return Err(AdjustmentError::InsufficientStock {
            location,
            available: current,
            requested: quantity,
        });
    }

    let (store_delta, warehouse_delta) = match location {
        StockLocation::Store => (delta, 0),
        StockLocation::Warehouse => (0, delta),
    };

    Ok(AdjustmentPlan {
        kind,
        quantity,
        store_delta,
        warehouse_delta,
        new_store_stock: store_stock + store_delta,
        new_warehouse_stock: warehouse_stock + warehouse_delta,
        location: Some(location),
        reason: format!("{} ({})", reason.trim(), location.reason_suffix()),
    })
}

/// Plan moving units from the warehouse onto the sales floor
pub fn plan_transfer_to_store(
    store_stock: i32,
    warehouse_stock: i32,
    quantity: i32,
) -> Result<AdjustmentPlan, AdjustmentError> {
    if quantity <= 0 {
        return Err(AdjustmentError::NonPositiveQuantity);
    }
    if warehouse_stock < quantity {
        return Err(AdjustmentError::InsufficientStock {
            location: StockLocation::Warehouse,
            available: warehouse_stock,
            requested: quantity,
        });
    }
    let new_store_stock = store_stock
        .checked_add(quantity)
        .ok_or(AdjustmentError::Overflow)?;

    Ok(AdjustmentPlan {
        kind: MovementKind::Adjustment,
        quantity,
        store_delta: quantity,
        warehouse_delta: -quantity,
        new_store_stock,
        new_warehouse_stock: warehouse_stock - quantity,
        location: None,
        reason: TRANSFER_TO_STORE_REASON.to_string(),
    })
}
