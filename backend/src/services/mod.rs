//! Business logic services for the POS+ dashboard

pub mod category;
pub mod currency;
pub mod customer;
pub mod dashboard;
pub mod inventory;
pub mod order;
pub mod product;
pub mod reporting;

pub use category::CategoryService;
pub use currency::ExchangeRateService;
pub use customer::CustomerService;
pub use dashboard::DashboardService;
pub use inventory::InventoryService;
pub use order::OrderService;
pub use product::ProductService;
pub use reporting::ReportingService;

/// Migrated pool for tests that need a live Postgres. They are skipped
/// unless `POS_TEST_DATABASE_URL` points at a scratch database.
#[cfg(test)]
pub(crate) async fn test_database() -> Option<sqlx::PgPool> {
    let url = std::env::var("POS_TEST_DATABASE_URL").ok()?;
    let db = sqlx::postgres::PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("run migrations");
    Some(db)
}
