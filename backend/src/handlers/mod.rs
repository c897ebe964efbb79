//! HTTP request handlers

mod category;
mod currency;
mod customer;
mod dashboard;
mod health;
mod inventory;
mod order;
mod product;
mod reporting;

pub use category::*;
pub use currency::*;
pub use customer::*;
pub use dashboard::*;
pub use health::*;
pub use inventory::*;
pub use order::*;
pub use product::*;
pub use reporting::*;
