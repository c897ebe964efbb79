//! Order service
//!
//! Orders are created by the checkout flow; here they are listed, inspected
//! and moved through their status lifecycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    Customer, Order, OrderLine, OrderStatus, OrderSummary, Pagination, PaginatedResponse,
    PaginationMeta, RecentOrder, SoldLine,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::customer::CustomerRow;

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    status: String,
    total_amount: Decimal,
    customer_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            status: parse_status(&row.status)?,
            total_amount: row.total_amount,
            customer_id: row.customer_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RecentOrderRow {
    id: Uuid,
    status: String,
    total_amount: Decimal,
    customer_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RecentOrderRow> for RecentOrder {
    type Error = AppError;

    fn try_from(row: RecentOrderRow) -> Result<Self, Self::Error> {
        Ok(RecentOrder {
            id: row.id,
            status: parse_status(&row.status)?,
            total_amount: row.total_amount,
            customer_name: row.customer_name,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderSummaryRow {
    status: String,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = AppError;

    fn try_from(row: OrderSummaryRow) -> Result<Self, Self::Error> {
        Ok(OrderSummary {
            status: parse_status(&row.status)?,
            total_amount: row.total_amount,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SoldLineRow {
    product_id: Uuid,
    product_name: String,
    image_url: Option<String>,
    quantity: i32,
    unit_price: Decimal,
    order_status: String,
    order_created_at: DateTime<Utc>,
}

impl TryFrom<SoldLineRow> for SoldLine {
    type Error = AppError;

    fn try_from(row: SoldLineRow) -> Result<Self, Self::Error> {
        Ok(SoldLine {
            product_id: row.product_id,
            product_name: row.product_name,
            image_url: row.image_url,
            quantity: row.quantity,
            unit_price: row.unit_price,
            order_status: parse_status(&row.order_status)?,
            order_created_at: row.order_created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrderLineRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    product_name: String,
    image_url: Option<String>,
    quantity: i32,
    unit_price: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        OrderLine {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            image_url: row.image_url,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    raw.parse().map_err(AppError::Internal)
}

/// Filters for the orders table
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

/// Order with its lines and customer
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
    pub customer: Option<Customer>,
}

/// Input for a status change
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: OrderStatus,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Orders newest first, optionally filtered by status
    pub async fn list(
        &self,
        filter: &OrderFilter,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<RecentOrder>> {
        let status = filter.status.map(|s| s.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, RecentOrderRow>(
            r#"
            SELECT o.id, o.status, o.total_amount, c.full_name AS customer_name, o.created_at
            FROM orders o
            LEFT JOIN customers c ON c.id = o.customer_id
            WHERE ($1::text IS NULL OR o.status = $1)
            ORDER BY o.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(RecentOrder::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(pagination, total.max(0) as u64),
        })
    }

    /// Order header, lines and customer
    pub async fn get_details(&self, id: Uuid) -> AppResult<OrderDetails> {
        let order: Order = self.get(id).await?;

        let items = sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT id, order_id, product_id, product_name, image_url, quantity, unit_price
            FROM order_items
            WHERE order_id = $1
            ORDER BY product_name
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(OrderLine::from)
        .collect();

        let customer = match order.customer_id {
            Some(customer_id) => sqlx::query_as::<_, CustomerRow>(
                r#"
                SELECT id, full_name, cedula, phone, email, notes, created_at
                FROM customers
                WHERE id = $1
                "#,
            )
            .bind(customer_id)
            .fetch_optional(&self.db)
            .await?
            .map(Customer::from),
            None => None,
        };

        Ok(OrderDetails {
            order,
            items,
            customer,
        })
    }

    async fn get(&self, id: Uuid) -> AppResult<Order> {
        sqlx::query_as::<_, OrderRow>(
            "SELECT id, status, total_amount, customer_id, created_at FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?
        .try_into()
    }

    /// Move an order to a new status
    pub async fn update_status(&self, id: Uuid, next: OrderStatus) -> AppResult<Order> {
        let current = self.get(id).await?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot change order from {} to {}",
                current.status, next
            )));
        }

        // Guard on the status we read so a concurrent change is not overwritten
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE orders SET status = $2
            WHERE id = $1 AND status = $3
            RETURNING id, status, total_amount, customer_id, created_at
            "#,
        )
        .bind(id)
        .bind(next.as_str())
        .bind(current.status.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            AppError::InvalidStateTransition("Order status changed concurrently".to_string())
        })?;

        tracing::info!(order_id = %id, from = %current.status, to = %next, "Order status updated");

        row.try_into()
    }
}

// ============================================================================
// Dashboard section queries
// ============================================================================

/// COMPLETED orders, for lifetime totals and the daily series
pub(crate) async fn fetch_completed_orders(db: &PgPool) -> AppResult<Vec<OrderSummary>> {
    fetch_summaries(db, OrderStatus::Completed).await
}

/// CANCELLED orders, for the cancellation count and series
pub(crate) async fn fetch_cancelled_orders(db: &PgPool) -> AppResult<Vec<OrderSummary>> {
    fetch_summaries(db, OrderStatus::Cancelled).await
}

async fn fetch_summaries(db: &PgPool, status: OrderStatus) -> AppResult<Vec<OrderSummary>> {
    sqlx::query_as::<_, OrderSummaryRow>(
        "SELECT status, total_amount, created_at FROM orders WHERE status = $1",
    )
    .bind(status.as_str())
    .fetch_all(db)
    .await?
    .into_iter()
    .map(OrderSummary::try_from)
    .collect()
}

/// Every order placed since `since`, newest first
pub(crate) async fn fetch_recent_orders(
    db: &PgPool,
    since: DateTime<Utc>,
) -> AppResult<Vec<RecentOrder>> {
    sqlx::query_as::<_, RecentOrderRow>(
        r#"
        SELECT o.id, o.status, o.total_amount, c.full_name AS customer_name, o.created_at
        FROM orders o
        LEFT JOIN customers c ON c.id = o.customer_id
        WHERE o.created_at >= $1
        ORDER BY o.created_at DESC
        "#,
    )
    .bind(since)
    .fetch_all(db)
    .await?
    .into_iter()
    .map(RecentOrder::try_from)
    .collect()
}

/// Lines of COMPLETED orders placed since `since`
pub(crate) async fn fetch_sold_lines(
    db: &PgPool,
    since: DateTime<Utc>,
) -> AppResult<Vec<SoldLine>> {
    sqlx::query_as::<_, SoldLineRow>(
        r#"
        SELECT i.product_id, i.product_name, i.image_url, i.quantity, i.unit_price,
               o.status AS order_status, o.created_at AS order_created_at
        FROM order_items i
        JOIN orders o ON o.id = i.order_id
        WHERE o.status = 'COMPLETED' AND o.created_at >= $1
        ORDER BY o.created_at ASC
        "#,
    )
    .bind(since)
    .fetch_all(db)
    .await?
    .into_iter()
    .map(SoldLine::try_from)
    .collect()
}
