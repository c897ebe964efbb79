//! Sales analytics tests
//!
//! Tests for the dashboard numbers including:
//! - the seven-day chart series
//! - day-over-day growth and its coloring
//! - top-selling rankings per window
//! - dashboard assembly when sections fail to load

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::analytics::{
    aggregate_top_selling, build_daily_series, growth, percent_change, today_index, Growth,
    SalesMetric, Sentiment, TOP_SELLING_LIMIT,
};
use shared::dashboard::{assemble_dashboard, DashboardSections};
use shared::{OrderStatus, OrderSummary, SoldLine};
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn order(status: OrderStatus, amount: i64, created_at: DateTime<Utc>) -> OrderSummary {
    OrderSummary {
        status,
        total_amount: Decimal::from(amount),
        created_at,
    }
}

fn line(product_id: Uuid, name: &str, quantity: i32, created_at: DateTime<Utc>) -> SoldLine {
    SoldLine {
        product_id,
        product_name: name.to_string(),
        image_url: None,
        quantity,
        unit_price: Decimal::new(200, 2),
        order_status: OrderStatus::Completed,
        order_created_at: created_at,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_series_counts_completed_and_cancelled() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        let orders = vec![
            order(OrderStatus::Completed, 30, at(2026, 1, 7, 9)),
            order(OrderStatus::Completed, 50, at(2026, 1, 7, 18)),
            order(OrderStatus::Cancelled, 10, at(2026, 1, 7, 12)),
            order(OrderStatus::Pending, 99, at(2026, 1, 7, 13)),
            order(OrderStatus::Completed, 20, at(2026, 1, 1, 10)),
            // Outside the window
            order(OrderStatus::Completed, 500, at(2025, 12, 31, 10)),
        ];
        let series = build_daily_series(&orders, today);

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(series[0].revenue, Decimal::from(20));
        assert_eq!(series[6].revenue, Decimal::from(80));
        assert_eq!(series[6].orders_count, 2);
        assert_eq!(series[6].cancelled_count, 1);
        assert_eq!(series[6].label, "Wed");
        assert_eq!(series[6].display_date, "Jan 7, 2026");
    }

    #[test]
    fn test_today_index_falls_back_to_last() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        let series = build_daily_series(&[], today);
        assert_eq!(today_index(&series, today), Some(6));
        assert_eq!(today_index(&series, today + Duration::days(3)), Some(6));
        assert_eq!(today_index(&[], today), None);
    }

    #[test]
    fn test_growth_from_zero() {
        assert_eq!(percent_change(0.0, 40.0), 100.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(50.0, 75.0), 50.0);
    }

    #[test]
    fn test_first_day_has_no_prior_data() {
        let series = build_daily_series(&[], NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());
        assert_eq!(
            growth(&series, 0, SalesMetric::Revenue, false),
            Growth::NoPriorData
        );
    }

    #[test]
    fn test_cancellations_growth_is_unfavorable() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        let orders = vec![
            order(OrderStatus::Cancelled, 5, at(2026, 1, 6, 9)),
            order(OrderStatus::Cancelled, 5, at(2026, 1, 7, 9)),
            order(OrderStatus::Cancelled, 5, at(2026, 1, 7, 10)),
        ];
        let series = build_daily_series(&orders, today);
        match growth(&series, 6, SalesMetric::Cancellations, true) {
            Growth::Change { percent, sentiment } => {
                assert_eq!(percent, 100.0);
                assert_eq!(sentiment, Sentiment::Unfavorable);
            }
            other => panic!("expected change, got {:?}", other),
        }
    }

    #[test]
    fn test_unchanged_metric_is_neutral() {
        let series = build_daily_series(&[], NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());
        assert_eq!(
            growth(&series, 6, SalesMetric::Orders, false),
            Growth::Change {
                percent: 0.0,
                sentiment: Sentiment::Neutral
            }
        );
    }

    #[test]
    fn test_rounded_percent() {
        let g = Growth::Change {
            percent: 33.333,
            sentiment: Sentiment::Favorable,
        };
        assert_eq!(g.rounded_percent(), Some(33.3));
        assert_eq!(Growth::NoPriorData.rounded_percent(), None);
    }

    #[test]
    fn test_top_selling_windows() {
        let now = at(2026, 1, 20, 15);
        let latte = Uuid::new_v4();
        let mocha = Uuid::new_v4();
        let lines = vec![
            line(latte, "Latte", 2, at(2026, 1, 20, 9)),
            line(mocha, "Mocha", 5, at(2026, 1, 16, 9)),
            line(latte, "Latte", 4, at(2026, 1, 2, 9)),
            // Beyond the lookback
            line(mocha, "Mocha", 100, at(2025, 11, 1, 9)),
        ];
        let top = aggregate_top_selling(&lines, now);

        assert_eq!(top.day.len(), 1);
        assert_eq!(top.day[0].name, "Latte");
        assert_eq!(top.week[0].name, "Mocha");
        assert_eq!(top.week[0].count, 5);
        assert_eq!(top.month[0].name, "Latte");
        assert_eq!(top.month[0].count, 6);
        assert_eq!(top.month[0].revenue, Decimal::new(1200, 2));
        assert_eq!(top.month[1].count, 5);
    }

    #[test]
    fn test_top_selling_skips_cancelled_and_limits() {
        let now = at(2026, 1, 20, 15);
        let mut lines: Vec<_> = (0..7)
            .map(|i| line(Uuid::new_v4(), &format!("P{}", i), 1, now))
            .collect();
        lines[0].order_status = OrderStatus::Cancelled;

        let top = aggregate_top_selling(&lines, now);
        assert_eq!(top.day.len(), TOP_SELLING_LIMIT);
        // Ties keep first-seen order
        assert_eq!(top.day[0].name, "P1");
        assert!(top.day.iter().all(|p| p.name != "P0"));
    }

    #[test]
    fn test_dashboard_survives_missing_sections() {
        let now = Utc::now();
        let sections = DashboardSections {
            completed_orders: Some(vec![order(OrderStatus::Completed, 40, now)]),
            ..DashboardSections::default()
        };
        let stats = assemble_dashboard(sections, now);

        assert_eq!(stats.total_sales, Decimal::from(40));
        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.chart_data.len(), 7);
        assert!(stats.recent_orders.is_empty());
        assert!(stats.top_selling.month.is_empty());
        assert!(!stats.stock.has_alerts);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = OrderStatus> {
        prop_oneof![
            Just(OrderStatus::Pending),
            Just(OrderStatus::Completed),
            Just(OrderStatus::Cancelled),
        ]
    }

    fn order_strategy() -> impl Strategy<Value = OrderSummary> {
        (status_strategy(), 1i64..10_000, 0i64..(14 * 24)).prop_map(|(status, cents, hours)| {
            OrderSummary {
                status,
                total_amount: Decimal::new(cents, 2),
                created_at: at(2026, 3, 14, 23) - Duration::hours(hours),
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Always seven ascending days ending today
        #[test]
        fn prop_series_shape(orders in prop::collection::vec(order_strategy(), 0..40)) {
            let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
            let series = build_daily_series(&orders, today);

            prop_assert_eq!(series.len(), 7);
            prop_assert_eq!(series[6].date, today);
            for pair in series.windows(2) {
                prop_assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
            }
        }

        /// Series revenue equals completed revenue inside the window
        #[test]
        fn prop_series_revenue_matches(orders in prop::collection::vec(order_strategy(), 0..40)) {
            let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
            let start = today - Duration::days(6);
            let series = build_daily_series(&orders, today);

            let expected: Decimal = orders
                .iter()
                .filter(|o| o.status == OrderStatus::Completed && o.created_at.date_naive() >= start)
                .map(|o| o.total_amount)
                .sum();
            let actual: Decimal = series.iter().map(|d| d.revenue).sum();
            prop_assert_eq!(actual, expected);
        }

        /// Sign of the change follows the direction of the metric
        #[test]
        fn prop_percent_change_sign(previous in 0.0f64..1000.0, current in 0.0f64..1000.0) {
            let change = percent_change(previous, current);
            if current > previous {
                prop_assert!(change > 0.0);
            } else if current < previous {
                prop_assert!(change < 0.0);
            } else {
                prop_assert_eq!(change, 0.0);
            }
        }
    }
}
