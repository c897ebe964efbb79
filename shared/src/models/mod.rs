//! Domain models for the POS+ dashboard

mod category;
mod customer;
mod exchange_rate;
mod order;
mod product;
mod stock_movement;
mod user;

pub use category::*;
pub use customer::*;
pub use exchange_rate::*;
pub use order::*;
pub use product::*;
pub use stock_movement::*;
pub use user::*;
