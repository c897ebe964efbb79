//! Exchange-rate API client
//!
//! Queries the official BCV rate from a primary endpoint and falls back to
//! a second provider with a different payload shape.

use reqwest::Client;
use serde::Deserialize;
use shared::{currency::is_valid_rate, ExchangeQuote};
use std::time::Duration;

use crate::config::ExchangeRateConfig;
use crate::error::{AppError, AppResult};

/// Exchange-rate API client
#[derive(Clone)]
pub struct ExchangeRateClient {
    client: Client,
    primary_url: String,
    backup_url: String,
}

/// Backup provider payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackupResponse {
    promedio: Option<f64>,
    fecha_actualizacion: Option<String>,
}

impl ExchangeRateClient {
    /// Create a new ExchangeRateClient from configuration
    pub fn new(config: &ExchangeRateConfig) -> Self {
        Self::with_urls(
            config.primary_url.clone(),
            config.backup_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create a client against custom endpoints (for testing)
    pub fn with_urls(primary_url: String, backup_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            primary_url,
            backup_url,
        }
    }

    /// Fetch from the primary endpoint, then the backup
    pub async fn fetch(&self) -> AppResult<ExchangeQuote> {
        match self.fetch_primary().await {
            Ok(quote) => return Ok(quote),
            Err(e) => tracing::warn!("Primary exchange-rate API failed: {}", e),
        }

        tracing::info!("Using backup exchange-rate API");
        self.fetch_backup().await
    }

    /// Fetch `{ dollar, euro?, date? }` from the primary endpoint
    pub async fn fetch_primary(&self) -> AppResult<ExchangeQuote> {
        let body = self.get_json(&self.primary_url).await?;
        parse_primary(body)
    }

    /// Fetch `{ promedio, fechaActualizacion }` from the backup endpoint
    pub async fn fetch_backup(&self) -> AppResult<ExchangeQuote> {
        let body = self.get_json(&self.backup_url).await?;
        parse_backup(body)
    }

    async fn get_json(&self, url: &str) -> AppResult<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Rate request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Rate API returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse rate response: {}", e)))
    }
}

/// Parse the primary payload, rejecting non-positive rates
pub fn parse_primary(body: serde_json::Value) -> AppResult<ExchangeQuote> {
    let quote: ExchangeQuote = serde_json::from_value(body)
        .map_err(|e| AppError::ExternalService(format!("Unexpected rate payload: {}", e)))?;

    if !is_valid_rate(quote.dollar) {
        return Err(AppError::ExternalService(format!(
            "Invalid dollar rate {}",
            quote.dollar
        )));
    }

    Ok(quote)
}

/// Map the backup payload onto a quote. The provider publishes no euro rate.
pub fn parse_backup(body: serde_json::Value) -> AppResult<ExchangeQuote> {
    let data: BackupResponse = serde_json::from_value(body)
        .map_err(|e| AppError::ExternalService(format!("Unexpected rate payload: {}", e)))?;

    match data.promedio {
        Some(dollar) if is_valid_rate(dollar) => Ok(ExchangeQuote {
            dollar,
            euro: None,
            date: data.fecha_actualizacion,
        }),
        _ => Err(AppError::ExternalService(
            "Backup rate payload has no average".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_primary() {
        let quote = parse_primary(json!({
            "dollar": 36.58,
            "euro": 39.71,
            "date": "2024-05-02"
        }))
        .unwrap();
        assert_eq!(quote.dollar, 36.58);
        assert_eq!(quote.euro, Some(39.71));
    }

    #[test]
    fn test_parse_primary_rejects_zero() {
        assert!(parse_primary(json!({ "dollar": 0.0 })).is_err());
        assert!(parse_primary(json!({ "error": "down" })).is_err());
    }

    #[test]
    fn test_parse_backup() {
        let quote = parse_backup(json!({
            "fuente": "oficial",
            "promedio": 36.6,
            "fechaActualizacion": "2024-05-02T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(quote.dollar, 36.6);
        assert_eq!(quote.euro, None);
        assert_eq!(quote.date.as_deref(), Some("2024-05-02T00:00:00.000Z"));
    }

    #[test]
    fn test_parse_backup_without_average() {
        assert!(parse_backup(json!({ "fechaActualizacion": "2024-05-02" })).is_err());
        assert!(parse_backup(json!({ "promedio": null })).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoints_fail() {
        let client = ExchangeRateClient::with_urls(
            "http://127.0.0.1:9/rates".to_string(),
            "http://127.0.0.1:9/backup".to_string(),
            Duration::from_millis(200),
        );
        assert!(client.fetch().await.is_err());
    }
}
