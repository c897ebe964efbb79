//! External API integrations

pub mod exchange_rate;
pub mod object_storage;

pub use exchange_rate::ExchangeRateClient;
pub use object_storage::ObjectStorageClient;
