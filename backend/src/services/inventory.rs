//! Inventory service for stock adjustments, transfers and the movement log
//!
//! Every change to a product's quantities is written together with its
//! movement record in one transaction. The quantity update is conditional
//! on the result staying non-negative, so two racing adjustments cannot
//! drive a location below zero or lose an update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::adjustment::{plan_adjustment, plan_transfer_to_store, AdjustmentError, AdjustmentPlan};
use shared::{
    MovementKind, Pagination, PaginatedResponse, PaginationMeta, Product, StockLocation,
    StockMovement,
};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::product::{ProductRow, PRODUCT_COLUMNS};

/// Inventory service for managing stock movements
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Input for an IN/OUT/ADJUSTMENT on one location
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustStockInput {
    pub product_id: Uuid,
    pub kind: MovementKind,
    #[validate(range(min = 1, message = "Quantity must be greater than zero"))]
    pub quantity: i32,
    #[validate(length(max = 200, message = "Reason must be at most 200 characters"))]
    pub reason: String,
    /// Defaults to the store
    #[serde(default = "default_location")]
    pub location: StockLocation,
}

fn default_location() -> StockLocation {
    StockLocation::Store
}

/// Input for moving units from the warehouse to the store
#[derive(Debug, Deserialize, Validate)]
pub struct TransferInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be greater than zero"))]
    pub quantity: i32,
}

/// Result of an applied adjustment
#[derive(Debug, Clone, Serialize)]
pub struct AdjustmentResult {
    pub product: Product,
    pub movement: StockMovement,
}

/// Movement log entry with the product name for display
#[derive(Debug, Clone, Serialize)]
pub struct MovementEntry {
    #[serde(flatten)]
    pub movement: StockMovement,
    pub product_name: String,
}

#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    product_id: Uuid,
    kind: String,
    quantity: i32,
    location: Option<String>,
    reason: String,
    user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct MovementEntryRow {
    #[sqlx(flatten)]
    movement: MovementRow,
    product_name: String,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse().map_err(AppError::Internal)?;
        let location = row
            .location
            .map(|l| l.parse::<StockLocation>())
            .transpose()
            .map_err(AppError::Internal)?;

        Ok(StockMovement {
            id: row.id,
            product_id: row.product_id,
            kind,
            quantity: row.quantity,
            location,
            reason: row.reason,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct StockLevels {
    store_stock: i32,
    warehouse_stock: i32,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply an IN/OUT/ADJUSTMENT to one location and record the movement
    pub async fn adjust_stock(
        &self,
        user_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<AdjustmentResult> {
        input.validate()?;
        let mut tx = self.db.begin().await?;

        let levels = lock_levels(&mut tx, input.product_id).await?;
        let plan = plan_adjustment(
            levels.store_stock,
            levels.warehouse_stock,
            input.kind,
            input.quantity,
            input.location,
            &input.reason,
        )?;

        let result = apply_plan(&mut tx, input.product_id, user_id, &plan).await?;
        tx.commit().await?;

        tracing::info!(
            product_id = %input.product_id,
            kind = plan.kind.as_str(),
            quantity = plan.quantity,
            location = input.location.as_str(),
            "Stock adjusted"
        );

        Ok(result)
    }

    /// Move units from the warehouse onto the sales floor
    pub async fn transfer_to_store(
        &self,
        user_id: Uuid,
        input: TransferInput,
    ) -> AppResult<AdjustmentResult> {
        input.validate()?;
        let mut tx = self.db.begin().await?;

        let levels = lock_levels(&mut tx, input.product_id).await?;
        let plan =
            plan_transfer_to_store(levels.store_stock, levels.warehouse_stock, input.quantity)?;

        let result = apply_plan(&mut tx, input.product_id, user_id, &plan).await?;
        tx.commit().await?;

        tracing::info!(
            product_id = %input.product_id,
            quantity = plan.quantity,
            "Transferred stock from warehouse to store"
        );

        Ok(result)
    }

    /// Movement log across all products, newest first
    pub async fn list_movements(
        &self,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<MovementEntry>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, MovementEntryRow>(
            r#"
            SELECT m.id, m.product_id, m.kind, m.quantity, m.location, m.reason,
                   m.user_id, m.created_at, COALESCE(p.name, m.product_name) AS product_name
            FROM stock_movements m
            LEFT JOIN products p ON p.id = m.product_id
            ORDER BY m.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(|row| -> AppResult<MovementEntry> {
                Ok(MovementEntry {
                    movement: row.movement.try_into()?,
                    product_name: row.product_name,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(pagination, total.max(0) as u64),
        })
    }

    /// Movement history for one product, newest first. History of a deleted
    /// product is still returned.
    pub async fn product_movements(&self, product_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, product_id, kind, quantity, location, reason, user_id, created_at
            FROM stock_movements
            WHERE product_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
            )
            .bind(product_id)
            .fetch_one(&self.db)
            .await?;

            if !exists {
                return Err(AppError::NotFound("Product".to_string()));
            }
        }

        rows.into_iter().map(StockMovement::try_from).collect()
    }
}

/// Read current levels, locking the row for the rest of the transaction
async fn lock_levels(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
) -> AppResult<StockLevels> {
    sqlx::query_as::<_, StockLevels>(
        "SELECT store_stock, warehouse_stock FROM products WHERE id = $1 FOR UPDATE",
    )
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Product".to_string()))
}

/// Apply the deltas atomically and append the movement
async fn apply_plan(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    user_id: Uuid,
    plan: &AdjustmentPlan,
) -> AppResult<AdjustmentResult> {
    let product = sqlx::query_as::<_, ProductRow>(&format!(
        r#"
        UPDATE products
        SET store_stock = store_stock + $2,
            warehouse_stock = warehouse_stock + $3,
            updated_at = NOW()
        WHERE id = $1
          AND store_stock + $2 >= 0
          AND warehouse_stock + $3 >= 0
        RETURNING {}
        "#,
        PRODUCT_COLUMNS
    ))
    .bind(product_id)
    .bind(plan.store_delta)
    .bind(plan.warehouse_delta)
    .fetch_optional(&mut **tx)
    .await?;

    // The row is locked, so this only trips if levels changed underneath us
    let product: Product = match product {
        Some(row) => row.into(),
        None => {
            let location = plan.location.unwrap_or(StockLocation::Warehouse);
            return Err(AdjustmentError::InsufficientStock {
                location,
                available: 0,
                requested: plan.quantity,
            }
            .into());
        }
    };

    let movement = sqlx::query_as::<_, MovementRow>(
        r#"
        INSERT INTO stock_movements
            (product_id, product_name, kind, quantity, location, reason, user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, product_id, kind, quantity, location, reason, user_id, created_at
        "#,
    )
    .bind(product_id)
    .bind(&product.name)
    .bind(plan.kind.as_str())
    .bind(plan.quantity)
    .bind(plan.location.map(|l| l.reason_suffix()))
    .bind(&plan.reason)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(AdjustmentResult {
        product,
        movement: movement.try_into()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{test_database, ProductService};

    async fn insert_product(db: &PgPool, name: &str, store: i32, warehouse: i32) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO products (name, price, store_stock, warehouse_stock)
            VALUES ($1, 1.50, $2, $3)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(store)
        .bind(warehouse)
        .fetch_one(db)
        .await
        .unwrap()
    }

    async fn store_stock(db: &PgPool, product_id: Uuid) -> i32 {
        sqlx::query_scalar("SELECT store_stock FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_one(db)
            .await
            .unwrap()
    }

    async fn movement_count(db: &PgPool, product_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(db)
            .await
            .unwrap()
    }

    fn store_out(product_id: Uuid, quantity: i32) -> AdjustStockInput {
        AdjustStockInput {
            product_id,
            kind: MovementKind::Out,
            quantity,
            reason: "Sold".to_string(),
            location: StockLocation::Store,
        }
    }

    #[tokio::test]
    async fn test_rejected_out_changes_nothing() {
        let Some(db) = test_database().await else {
            return;
        };
        let service = InventoryService::new(db.clone());
        let product_id = insert_product(&db, "Rice 1kg", 5, 0).await;

        let result = service.adjust_stock(Uuid::new_v4(), store_out(product_id, 10)).await;

        assert!(matches!(result, Err(AppError::InsufficientStock(_))));
        assert_eq!(store_stock(&db, product_id).await, 5);
        assert_eq!(movement_count(&db, product_id).await, 0);
    }

    #[tokio::test]
    async fn test_accepted_out_writes_one_movement() {
        let Some(db) = test_database().await else {
            return;
        };
        let service = InventoryService::new(db.clone());
        let product_id = insert_product(&db, "Beans 500g", 5, 0).await;

        let result = service
            .adjust_stock(Uuid::new_v4(), store_out(product_id, 3))
            .await
            .unwrap();

        assert_eq!(result.product.store_stock, 2);
        assert_eq!(result.movement.quantity, 3);
        assert_eq!(store_stock(&db, product_id).await, 2);
        assert_eq!(movement_count(&db, product_id).await, 1);
    }

    #[tokio::test]
    async fn test_rejected_transfer_changes_nothing() {
        let Some(db) = test_database().await else {
            return;
        };
        let service = InventoryService::new(db.clone());
        let product_id = insert_product(&db, "Oil 1L", 1, 2).await;

        let input = TransferInput {
            product_id,
            quantity: 3,
        };
        let result = service.transfer_to_store(Uuid::new_v4(), input).await;

        assert!(matches!(result, Err(AppError::InsufficientStock(_))));
        assert_eq!(store_stock(&db, product_id).await, 1);
        assert_eq!(movement_count(&db, product_id).await, 0);
    }

    #[tokio::test]
    async fn test_history_survives_product_deletion() {
        let Some(db) = test_database().await else {
            return;
        };
        let service = InventoryService::new(db.clone());
        let product_id = insert_product(&db, "Discontinued Soda", 4, 0).await;
        service
            .adjust_stock(Uuid::new_v4(), store_out(product_id, 1))
            .await
            .unwrap();

        ProductService::new(db.clone()).delete(product_id).await.unwrap();

        assert_eq!(movement_count(&db, product_id).await, 1);
        let history = service.product_movements(product_id).await.unwrap();
        assert_eq!(history.len(), 1);

        let name: String = sqlx::query_scalar(
            r#"
            SELECT COALESCE(p.name, m.product_name)
            FROM stock_movements m
            LEFT JOIN products p ON p.id = m.product_id
            WHERE m.product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_one(&db)
        .await
        .unwrap();
        assert_eq!(name, "Discontinued Soda");
    }

    #[tokio::test]
    async fn test_unknown_product_movements_not_found() {
        let Some(db) = test_database().await else {
            return;
        };
        let result = InventoryService::new(db).product_movements(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
