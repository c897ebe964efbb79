//! Product catalog service
//!
//! Creating a product, or editing it through the catalog form, resets both
//! stock baselines to the quantities entered.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_name, validate_price, validate_stock_quantity, Product};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Product service for catalog management
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product row as stored
#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
    id: Uuid,
    name: String,
    price: Decimal,
    category_id: Option<Uuid>,
    image_url: Option<String>,
    available: bool,
    store_stock: i32,
    warehouse_stock: i32,
    initial_store_stock: i32,
    initial_warehouse_stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: row.price,
            category_id: row.category_id,
            image_url: row.image_url,
            available: row.available,
            store_stock: row.store_stock,
            warehouse_stock: row.warehouse_stock,
            initial_store_stock: row.initial_store_stock,
            initial_warehouse_stock: row.initial_warehouse_stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Column list shared by product queries
pub(crate) const PRODUCT_COLUMNS: &str = "id, name, price, category_id, image_url, available, \
     store_stock, warehouse_stock, initial_store_stock, initial_warehouse_stock, \
     created_at, updated_at";

/// Product with its category badge
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

#[derive(Debug, FromRow)]
struct ProductWithCategoryRow {
    #[sqlx(flatten)]
    product: ProductRow,
    category_name: Option<String>,
    category_color: Option<String>,
}

/// Catalog form values for create and update
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub store_stock: i32,
    pub warehouse_stock: i32,
    pub image_url: Option<String>,
}

impl ProductInput {
    fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)
            .map_err(|m| AppError::validation("name", m, "El nombre es obligatorio"))?;
        validate_price(self.price)
            .map_err(|m| AppError::validation("price", m, "Precio inválido"))?;
        validate_stock_quantity(self.store_stock)
            .map_err(|m| AppError::validation("store_stock", m, "El stock no puede ser negativo"))?;
        validate_stock_quantity(self.warehouse_stock).map_err(|m| {
            AppError::validation("warehouse_stock", m, "El stock no puede ser negativo")
        })?;
        Ok(())
    }
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List the catalog, newest first, with category badges
    pub async fn list(&self) -> AppResult<Vec<ProductWithCategory>> {
        let rows = sqlx::query_as::<_, ProductWithCategoryRow>(
            r#"
            SELECT p.id, p.name, p.price, p.category_id, p.image_url, p.available,
                   p.store_stock, p.warehouse_stock, p.initial_store_stock,
                   p.initial_warehouse_stock, p.created_at, p.updated_at,
                   c.name AS category_name, c.color AS category_color
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProductWithCategory {
                product: row.product.into(),
                category_name: row.category_name,
                category_color: row.category_color,
            })
            .collect())
    }

    /// Get a single product
    pub async fn get(&self, id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Create a product with baselines equal to the entered stock
    pub async fn create(&self, input: ProductInput) -> AppResult<Product> {
        input.validate()?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (
                name, price, category_id, image_url, available,
                store_stock, warehouse_stock, initial_store_stock, initial_warehouse_stock
            )
            VALUES ($1, $2, $3, $4, TRUE, $5, $6, $5, $6)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(input.name.trim())
        .bind(input.price)
        .bind(input.category_id)
        .bind(&input.image_url)
        .bind(input.store_stock)
        .bind(input.warehouse_stock)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id = %row.id, "Product created");
        Ok(row.into())
    }

    /// Update a product; the stock figures entered become the new baselines
    pub async fn update(&self, id: Uuid, input: ProductInput) -> AppResult<Product> {
        input.validate()?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $2, price = $3, category_id = $4, image_url = $5,
                store_stock = $6, warehouse_stock = $7,
                initial_store_stock = $6, initial_warehouse_stock = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(input.name.trim())
        .bind(input.price)
        .bind(input.category_id)
        .bind(&input.image_url)
        .bind(input.store_stock)
        .bind(input.warehouse_stock)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Delete a product; its stock movements stay in the log
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }
}

/// Fetch every product row
pub(crate) async fn fetch_all_products(db: &PgPool) -> AppResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {} FROM products ORDER BY created_at DESC",
        PRODUCT_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Product::from).collect())
}
