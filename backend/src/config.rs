//! Configuration management for the POS+ dashboard server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with POS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Exchange-rate API configuration
    pub exchange_rate: ExchangeRateConfig,

    /// Object storage for product images
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExchangeRateConfig {
    /// Primary endpoint returning `{ dollar, euro?, date? }`
    pub primary_url: String,

    /// Backup endpoint returning `{ promedio, fechaActualizacion }`
    pub backup_url: String,

    /// Seconds a fetched rate is served without refetching
    pub cache_ttl_secs: i64,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Storage API base URL, e.g. https://<project>.supabase.co/storage/v1
    pub base_url: String,

    /// Bucket holding product images
    pub bucket: String,

    /// Service key sent as a bearer token
    pub api_key: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("POS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("exchange_rate.primary_url", "https://bcv-api.rafnixg.dev/rates/")?
            .set_default(
                "exchange_rate.backup_url",
                "https://ve.dolarapi.com/v1/dolares/oficial",
            )?
            .set_default("exchange_rate.cache_ttl_secs", 60)?
            .set_default("exchange_rate.timeout_secs", 5)?
            .set_default("storage.bucket", "products")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (POS_ prefix)
            .add_source(
                Environment::with_prefix("POS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
