//! USD/VES conversion and the exchange-rate cache policy
//!
//! Prices are stored in US dollars. The VES view multiplies by the official
//! rate; when no rate can be obtained anywhere the hardcoded default applies.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::ExchangeQuote;

/// Bolívares per dollar used when neither the API nor any cache answers
pub const DEFAULT_DOLLAR_RATE: f64 = 60.0;

/// Display currency
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Ves,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Ves => "VES",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Ves => "Bs. ",
        }
    }

    pub fn toggled(&self) -> Currency {
        match self {
            Currency::Usd => Currency::Ves,
            Currency::Ves => Currency::Usd,
        }
    }
}

/// Convert a dollar amount into the display currency
pub fn convert_price(amount_usd: Decimal, currency: Currency, dollar_rate: f64) -> Decimal {
    match currency {
        Currency::Usd => amount_usd,
        Currency::Ves => {
            let rate = Decimal::from_f64(dollar_rate).unwrap_or(Decimal::ZERO);
            amount_usd * rate
        }
    }
}

/// Render a dollar amount in the display currency, two decimals:
/// `$12.50` or `Bs. 750.00`
pub fn format_currency(amount_usd: Decimal, currency: Currency, dollar_rate: f64) -> String {
    let value = convert_price(amount_usd, currency, dollar_rate)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", currency.symbol(), value)
}

/// Float variant for callers that hold plain numbers
pub fn format_amount(amount_usd: f64, currency: Currency, dollar_rate: f64) -> String {
    let amount = Decimal::from_f64(amount_usd).unwrap_or(Decimal::ZERO);
    format_currency(amount, currency, dollar_rate)
}

/// Whether a number is usable as a rate
pub fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// State of the cache for a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Fresh(ExchangeQuote),
    Stale(ExchangeQuote),
    Empty,
}

/// Last known quote with its fetch time
#[derive(Debug, Clone)]
pub struct RateCache {
    entry: Option<(ExchangeQuote, DateTime<Utc>)>,
    ttl: Duration,
}

impl RateCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// Store a quote; quotes with an unusable dollar rate are ignored.
    /// Returns whether the quote was kept.
    pub fn record(&mut self, quote: ExchangeQuote, fetched_at: DateTime<Utc>) -> bool {
        if !is_valid_rate(quote.dollar) {
            return false;
        }
        self.entry = Some((quote, fetched_at));
        true
    }

    pub fn lookup(&self, now: DateTime<Utc>) -> CacheLookup {
        match &self.entry {
            None => CacheLookup::Empty,
            Some((quote, at)) if now - *at < self.ttl => CacheLookup::Fresh(quote.clone()),
            Some((quote, _)) => CacheLookup::Stale(quote.clone()),
        }
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|(_, at)| *at)
    }
}

/// Quote used when nothing else is available
pub fn fallback_quote() -> ExchangeQuote {
    ExchangeQuote {
        dollar: DEFAULT_DOLLAR_RATE,
        euro: None,
        date: None,
    }
}

/// Dollar rate as a Decimal for exact price math
pub fn rate_as_decimal(quote: &ExchangeQuote) -> Decimal {
    Decimal::from_f64(quote.dollar).unwrap_or(Decimal::ZERO)
}

/// Rate rounded for logs and headers
pub fn rate_display(quote: &ExchangeQuote) -> f64 {
    rate_as_decimal(quote)
        .round_dp(2)
        .to_f64()
        .unwrap_or(DEFAULT_DOLLAR_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(dollar: f64) -> ExchangeQuote {
        ExchangeQuote {
            dollar,
            euro: None,
            date: None,
        }
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_currency(Decimal::new(1250, 2), Currency::Usd, 36.5), "$12.50");
        assert_eq!(format_currency(Decimal::ZERO, Currency::Usd, 36.5), "$0.00");
    }

    #[test]
    fn test_format_ves() {
        assert_eq!(format_currency(Decimal::new(1250, 2), Currency::Ves, 60.0), "Bs. 750.00");
        assert_eq!(format_amount(2.0, Currency::Ves, 36.715), "Bs. 73.43");
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Currency::Usd.toggled(), Currency::Ves);
        assert_eq!(Currency::Ves.toggled(), Currency::Usd);
    }

    #[test]
    fn test_cache_policy() {
        let t0 = Utc::now();
        let mut cache = RateCache::new(Duration::seconds(60));
        assert_eq!(cache.lookup(t0), CacheLookup::Empty);

        assert!(cache.record(quote(36.5), t0));
        assert_eq!(cache.lookup(t0 + Duration::seconds(30)), CacheLookup::Fresh(quote(36.5)));
        assert_eq!(cache.lookup(t0 + Duration::seconds(61)), CacheLookup::Stale(quote(36.5)));
    }

    #[test]
    fn test_cache_rejects_bad_rates() {
        let mut cache = RateCache::new(Duration::seconds(60));
        assert!(!cache.record(quote(0.0), Utc::now()));
        assert!(!cache.record(quote(f64::NAN), Utc::now()));
        assert_eq!(cache.lookup(Utc::now()), CacheLookup::Empty);
    }
}
