//! Customer registry service
//!
//! Customers are looked up at checkout by cédula. Any signed-in user may
//! register one.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{normalize_cedula, validate_cedula, validate_email, validate_ve_phone, Customer};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
pub(crate) struct CustomerRow {
    id: Uuid,
    full_name: String,
    cedula: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            full_name: row.full_name,
            cedula: row.cedula,
            phone: row.phone,
            email: row.email,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Input for registering a customer
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerInput {
    #[validate(length(max = 160, message = "Full name is too long"))]
    pub full_name: String,
    pub cedula: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Blank form fields are stored as NULL
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All customers, newest first
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, full_name, cedula, phone, email, notes, created_at
            FROM customers
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Look up a customer by cédula
    pub async fn find_by_cedula(&self, cedula: &str) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, full_name, cedula, phone, email, notes, created_at
            FROM customers
            WHERE cedula = $1
            "#,
        )
        .bind(normalize_cedula(cedula))
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(row.into())
    }

    /// Register a customer
    pub async fn create(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        input.validate()?;
        let full_name = input.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AppError::validation(
                "full_name",
                "Full name is required",
                "El nombre completo es obligatorio",
            ));
        }

        let cedula = non_blank(input.cedula);
        if let Some(cedula) = &cedula {
            validate_cedula(cedula)
                .map_err(|m| AppError::validation("cedula", m, "Cédula inválida"))?;
        }
        let cedula = cedula.map(|c| normalize_cedula(&c));

        let phone = non_blank(input.phone);
        if let Some(phone) = &phone {
            validate_ve_phone(phone)
                .map_err(|m| AppError::validation("phone", m, "Teléfono inválido"))?;
        }

        let email = non_blank(input.email);
        if let Some(email) = &email {
            validate_email(email)
                .map_err(|m| AppError::validation("email", m, "Correo inválido"))?;
        }

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (full_name, cedula, phone, email, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, full_name, cedula, phone, email, notes, created_at
            "#,
        )
        .bind(&full_name)
        .bind(&cedula)
        .bind(&phone)
        .bind(&email)
        .bind(non_blank(input.notes))
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::DuplicateEntry("cedula".to_string());
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(row.into())
    }

    /// Delete a customer; their orders keep no link
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }
}
