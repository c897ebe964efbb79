//! Shared types and models for the POS+ dashboard
//!
//! This crate contains the domain models and the pure stock and sales
//! computations shared between the backend and the browser (via WASM).

pub mod adjustment;
pub mod analytics;
pub mod currency;
pub mod dashboard;
pub mod models;
pub mod stock;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
