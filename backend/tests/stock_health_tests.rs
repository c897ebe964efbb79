//! Stock health classification tests
//!
//! Covers the per-location thresholds, worst-of-two product status,
//! bucket ordering and the flattened details entries.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::stock::{
    classify_product, classify_products, location_status, EntryKind, StockStatus,
};
use shared::{LocationStock, Product, StockLocation};
use uuid::Uuid;

fn product(name: &str, store: i32, store_base: i32, whse: i32, whse_base: i32) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price: Decimal::new(150, 2),
        category_id: None,
        image_url: None,
        available: true,
        store_stock: store,
        warehouse_stock: whse,
        initial_store_stock: store_base,
        initial_warehouse_stock: whse_base,
        created_at: now,
        updated_at: now,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_empty_catalog() {
        let report = classify_products(&[]);
        assert_eq!(report.total_products_count, 0);
        assert!(report.low_stock.is_empty());
        assert!(!report.summary().has_alerts);
        assert_eq!(report.entry_tabs().default_tab, StockStatus::Healthy);
    }

    #[test]
    fn test_zero_baseline_with_stock_is_healthy() {
        // Denominator falls back to the current quantity
        assert_eq!(location_status(5, 0), StockStatus::Healthy);
        assert_eq!(location_status(0, 0), StockStatus::Critical);
    }

    #[test]
    fn test_negative_stock_is_critical() {
        assert_eq!(location_status(-3, 10), StockStatus::Critical);
    }

    #[test]
    fn test_buckets_sorted_by_worst_percent() {
        let products = vec![
            product("Milk", 15, 100, 100, 100),
            product("Sugar", 5, 100, 100, 100),
            product("Cups", 40, 100, 100, 100),
            product("Lids", 100, 100, 100, 100),
        ];
        let report = classify_products(&products);

        let critical: Vec<_> = report.critical.iter().map(|h| h.product.name.as_str()).collect();
        assert_eq!(critical, ["Sugar", "Milk"]);
        assert_eq!(report.warning.len(), 1);
        assert_eq!(report.healthy.len(), 1);
        assert_eq!(report.critical_count, 2);
        assert_eq!(report.warning_count, 1);

        let low: Vec<_> = report.low_stock.iter().map(|h| h.product.name.as_str()).collect();
        assert_eq!(low, ["Sugar", "Milk", "Cups"]);
    }

    #[test]
    fn test_summary_prefers_critical_warehouse() {
        let products = vec![product("Beans", 10, 100, 5, 100)];
        let summary = classify_products(&products).summary();
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].location, StockLocation::Warehouse);
        assert_eq!(summary.rows[0].quantity, 5);
        assert_eq!(summary.rows[0].status, StockStatus::Critical);
    }

    #[test]
    fn test_summary_limits_rows() {
        let products: Vec<_> = (0..5)
            .map(|i| product(&format!("P{}", i), i, 100, 100, 100))
            .collect();
        let summary = classify_products(&products).summary();
        assert_eq!(summary.rows.len(), 3);
        assert_eq!(summary.more_count, 2);
        assert!(summary.has_alerts);
    }

    #[test]
    fn test_split_entries_when_locations_differ() {
        let products = vec![
            product("Split", 10, 100, 100, 100),
            product("Same", 100, 100, 100, 100),
        ];
        let tabs = classify_products(&products).entry_tabs();

        assert_eq!(tabs.default_tab, StockStatus::Critical);
        assert_eq!(tabs.critical.len(), 1);
        assert_eq!(tabs.critical[0].kind, EntryKind::Store);
        assert_eq!(tabs.healthy.len(), 2);
        assert!(tabs
            .healthy
            .iter()
            .any(|e| e.name == "Split" && e.kind == EntryKind::Warehouse));
        assert!(tabs
            .healthy
            .iter()
            .any(|e| e.name == "Same" && e.kind == EntryKind::Combined));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn stock_strategy() -> impl Strategy<Value = (i32, i32)> {
        (0i32..=500, 0i32..=500)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Percent never exceeds 100 and never goes negative
        #[test]
        fn prop_percent_bounded((current, baseline) in stock_strategy()) {
            let percent = LocationStock::new(current, baseline).percent();
            prop_assert!((0.0..=100.0).contains(&percent));
        }

        /// Status follows the 20/50 thresholds on the effective baseline
        #[test]
        fn prop_status_matches_thresholds((current, baseline) in stock_strategy()) {
            let stock = LocationStock::new(current, baseline);
            let denom = i64::from(baseline.max(current).max(1));
            let scaled = i64::from(current) * 100;
            let expected = if current == 0 || scaled <= 20 * denom {
                StockStatus::Critical
            } else if scaled <= 50 * denom {
                StockStatus::Warning
            } else {
                StockStatus::Healthy
            };
            prop_assert_eq!(stock.status(), expected);
        }

        /// A product is never healthier than either location
        #[test]
        fn prop_product_status_is_worst(
            (store, store_base) in stock_strategy(),
            (whse, whse_base) in stock_strategy()
        ) {
            let health = classify_product(&product("X", store, store_base, whse, whse_base));
            prop_assert!(health.status >= health.store.status);
            prop_assert!(health.status >= health.warehouse.status);
            prop_assert!(health.status == health.store.status || health.status == health.warehouse.status);
        }

        /// Every product lands in exactly one bucket
        #[test]
        fn prop_buckets_partition_products(
            stocks in prop::collection::vec((stock_strategy(), stock_strategy()), 0..20)
        ) {
            let products: Vec<_> = stocks
                .iter()
                .map(|((s, sb), (w, wb))| product("P", *s, *sb, *w, *wb))
                .collect();
            let report = classify_products(&products);

            prop_assert_eq!(
                report.critical.len() + report.warning.len() + report.healthy.len(),
                products.len()
            );
            prop_assert_eq!(report.low_stock.len(), report.critical_count + report.warning_count);
            for pair in report.low_stock.windows(2) {
                prop_assert!(pair[0].worst_percent <= pair[1].worst_percent);
            }
        }
    }
}
