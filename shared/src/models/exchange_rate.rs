//! Exchange-rate quote models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Official VES quote per foreign unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeQuote {
    /// Bolívares per US dollar
    pub dollar: f64,
    /// Bolívares per euro, when the source publishes it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub euro: Option<f64>,
    /// Publication date as reported by the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Where a served rate came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// In-memory value still within its TTL
    Cache,
    /// Fetched from the primary or backup endpoint just now
    Live,
    /// In-memory value past its TTL, served because every fetch failed
    StaleCache,
    /// Last snapshot persisted in the database
    Persisted,
    /// Hardcoded default
    Fallback,
}

/// A quote together with its provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedRate {
    #[serde(flatten)]
    pub quote: ExchangeQuote,
    pub source: RateSource,
    pub fetched_at: Option<DateTime<Utc>>,
}
