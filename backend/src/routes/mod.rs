//! Route definitions for the POS+ dashboard API

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        .nest("/dashboard", dashboard_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/inventory", inventory_routes())
        .nest("/orders", order_routes())
        .nest("/customers", customer_routes())
        .nest("/currency", currency_routes())
        .nest("/reports", report_routes())
}

/// Dashboard routes (protected)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/stock", get(handlers::get_stock_overview))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Category routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories).post(handlers::create_category))
        .route("/:category_id", delete(handlers::delete_category))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/adjustments", post(handlers::adjust_stock))
        .route("/transfers", post(handlers::transfer_to_store))
        .route("/movements", get(handlers::list_movements))
        .route("/products/:product_id/movements", get(handlers::get_product_movements))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Order routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/status", put(handlers::update_order_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route("/cedula/:cedula", get(handlers::get_customer_by_cedula))
        .route("/:customer_id", delete(handlers::delete_customer))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Currency routes (protected)
fn currency_routes() -> Router<AppState> {
    Router::new()
        .route("/rates", get(handlers::get_rates))
        .route("/convert", post(handlers::convert))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Report routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(handlers::get_sales_report))
        .route("/stock-movements", get(handlers::get_stock_movement_report))
        .route_layer(middleware::from_fn(auth_middleware))
}
