//! Currency overlay tests
//!
//! Dollar prices shown in bolívares, and the cache states that drive the
//! exchange-rate fallback chain.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::currency::{
    convert_price, fallback_quote, format_currency, is_valid_rate, CacheLookup, Currency,
    RateCache, DEFAULT_DOLLAR_RATE,
};
use shared::ExchangeQuote;

fn quote(dollar: f64) -> ExchangeQuote {
    ExchangeQuote {
        dollar,
        euro: Some(dollar * 1.08),
        date: Some("2026-01-07".to_string()),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_fallback_rate() {
        let q = fallback_quote();
        assert_eq!(q.dollar, DEFAULT_DOLLAR_RATE);
        assert_eq!(
            format_currency(Decimal::from(10), Currency::Ves, q.dollar),
            "Bs. 600.00"
        );
    }

    #[test]
    fn test_usd_ignores_rate() {
        let price = Decimal::new(399, 2);
        assert_eq!(convert_price(price, Currency::Usd, 123.45), price);
        assert_eq!(format_currency(price, Currency::Usd, 123.45), "$3.99");
    }

    #[test]
    fn test_ves_rounds_half_away_from_zero() {
        // 0.5 * 36.01 = 18.005
        assert_eq!(
            format_currency(Decimal::new(5, 1), Currency::Ves, 36.01),
            "Bs. 18.01"
        );
    }

    #[test]
    fn test_currency_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Currency::Ves).unwrap(), "\"VES\"");
        let parsed: Currency = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(parsed, Currency::Usd);
        assert_eq!(Currency::default(), Currency::Usd);
    }

    #[test]
    fn test_invalid_rates() {
        assert!(!is_valid_rate(0.0));
        assert!(!is_valid_rate(-1.0));
        assert!(!is_valid_rate(f64::INFINITY));
        assert!(is_valid_rate(36.5));
    }

    #[test]
    fn test_stale_cache_still_served() {
        let t0 = Utc::now();
        let mut cache = RateCache::new(Duration::seconds(60));
        cache.record(quote(40.0), t0);

        assert_eq!(cache.lookup(t0 + Duration::hours(5)), CacheLookup::Stale(quote(40.0)));
        assert_eq!(cache.fetched_at(), Some(t0));
    }

    #[test]
    fn test_bad_quote_keeps_previous() {
        let t0 = Utc::now();
        let mut cache = RateCache::new(Duration::seconds(60));
        cache.record(quote(40.0), t0);
        assert!(!cache.record(quote(f64::NAN), t0 + Duration::seconds(5)));
        assert_eq!(cache.lookup(t0 + Duration::seconds(10)), CacheLookup::Fresh(quote(40.0)));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2)) // 0.00 to 10000.00
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Formatted amounts always carry exactly two decimals
        #[test]
        fn prop_two_decimals(price in price_strategy(), rate in 1.0f64..500.0) {
            for currency in [Currency::Usd, Currency::Ves] {
                let text = format_currency(price, currency, rate);
                prop_assert!(text.starts_with(currency.symbol()));
                let decimals = text.rsplit('.').next().map(str::len);
                prop_assert_eq!(decimals, Some(2));
            }
        }

        /// Converting to bolívares never lowers a price when the rate exceeds one
        #[test]
        fn prop_ves_not_below_usd(price in price_strategy(), rate in 1.0f64..500.0) {
            prop_assert!(convert_price(price, Currency::Ves, rate) >= price);
        }

        /// Within the TTL the cache answers fresh, after it stale
        #[test]
        fn prop_cache_freshness(age in 0i64..600, ttl in 1i64..300) {
            let t0 = Utc::now();
            let mut cache = RateCache::new(Duration::seconds(ttl));
            cache.record(quote(36.5), t0);

            let lookup = cache.lookup(t0 + Duration::seconds(age));
            if age < ttl {
                prop_assert_eq!(lookup, CacheLookup::Fresh(quote(36.5)));
            } else {
                prop_assert_eq!(lookup, CacheLookup::Stale(quote(36.5)));
            }
        }
    }
}
