//! Sales analytics: the 7-day chart series, day-over-day growth and
//! top-selling rankings

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{OrderStatus, OrderSummary, SoldLine};

/// Days covered by the chart series, today included
pub const SERIES_DAYS: i64 = 7;

/// Entries kept per top-selling ranking
pub const TOP_SELLING_LIMIT: usize = 5;

/// Order lines older than this never reach the rankings
pub const TOP_SELLING_LOOKBACK_DAYS: i64 = 30;

/// Trailing window for the weekly ranking
pub const WEEK_DAYS: i64 = 7;

/// One day of the chart series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySales {
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`
    pub label: String,
    /// e.g. `Jan 7, 2026`
    pub display_date: String,
    pub revenue: Decimal,
    pub orders_count: u32,
    pub cancelled_count: u32,
}

impl DailySales {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            label: date.format("%a").to_string(),
            display_date: date.format("%b %-d, %Y").to_string(),
            revenue: Decimal::ZERO,
            orders_count: 0,
            cancelled_count: 0,
        }
    }
}

/// Build the chart series for `today - 6 ..= today`.
///
/// Completed orders add revenue and an order; cancelled orders add a
/// cancellation. Always returns exactly seven ascending, gap-free days.
pub fn build_daily_series(orders: &[OrderSummary], today: NaiveDate) -> Vec<DailySales> {
    let start = today - Duration::days(SERIES_DAYS - 1);
    let mut series: Vec<DailySales> = (0..SERIES_DAYS)
        .map(|offset| DailySales::empty(start + Duration::days(offset)))
        .collect();

    for order in orders {
        let offset = (order.created_at.date_naive() - start).num_days();
        if !(0..SERIES_DAYS).contains(&offset) {
            continue;
        }
        let day = &mut series[offset as usize];
        match order.status {
            OrderStatus::Completed => {
                day.revenue += order.total_amount;
                day.orders_count += 1;
            }
            OrderStatus::Cancelled => day.cancelled_count += 1,
            OrderStatus::Pending => {}
        }
    }

    series
}

/// First instant covered by the chart: midnight UTC of `today - 6`.
///
/// The recent-orders table uses the same window so it lines up with the chart.
pub fn series_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let first_day = now.date_naive() - Duration::days(SERIES_DAYS - 1);
    Utc.from_utc_datetime(&first_day.and_time(NaiveTime::MIN))
}

/// Index of today's entry, falling back to the last entry when the series
/// does not contain today (clock or timezone skew).
pub fn today_index(series: &[DailySales], today: NaiveDate) -> Option<usize> {
    series
        .iter()
        .position(|d| d.date == today)
        .or_else(|| series.len().checked_sub(1))
}

/// Metric compared day over day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SalesMetric {
    Revenue,
    Orders,
    Cancellations,
}

impl SalesMetric {
    pub fn value(&self, day: &DailySales) -> f64 {
        match self {
            SalesMetric::Revenue => day.revenue.to_f64().unwrap_or(0.0),
            SalesMetric::Orders => f64::from(day.orders_count),
            SalesMetric::Cancellations => f64::from(day.cancelled_count),
        }
    }

    /// Metrics where a decrease is the good direction
    pub fn inverts_sentiment(&self) -> bool {
        matches!(self, SalesMetric::Cancellations)
    }
}

/// How a change should be colored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Green
    Favorable,
    /// Red
    Unfavorable,
    Neutral,
}

/// Day-over-day change of a metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Growth {
    /// The selected day is the oldest in the series
    NoPriorData,
    Change { percent: f64, sentiment: Sentiment },
}

impl Default for Growth {
    fn default() -> Self {
        Growth::NoPriorData
    }
}

impl Growth {
    /// Percent rounded to one decimal place for display
    pub fn rounded_percent(&self) -> Option<f64> {
        match self {
            Growth::NoPriorData => None,
            Growth::Change { percent, .. } => Some((percent * 10.0).round() / 10.0),
        }
    }
}

/// Percent change with the zero-baseline rule: from 0 to anything positive
/// is 100%, from 0 to 0 is 0%.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

fn sentiment_of(percent: f64, invert_sentiment: bool) -> Sentiment {
    if percent == 0.0 {
        Sentiment::Neutral
    } else if (percent > 0.0) != invert_sentiment {
        Sentiment::Favorable
    } else {
        Sentiment::Unfavorable
    }
}

/// Compare the day at `index` with the day before it
pub fn growth(
    series: &[DailySales],
    index: usize,
    metric: SalesMetric,
    invert_sentiment: bool,
) -> Growth {
    let (Some(current), Some(previous)) = (
        series.get(index),
        index.checked_sub(1).and_then(|i| series.get(i)),
    ) else {
        return Growth::NoPriorData;
    };

    let percent = percent_change(metric.value(previous), metric.value(current));
    Growth::Change {
        percent,
        sentiment: sentiment_of(percent, invert_sentiment),
    }
}

/// Growth of every headline metric for one day
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyGrowth {
    pub revenue: Growth,
    pub orders: Growth,
    pub cancellations: Growth,
}

impl DailyGrowth {
    pub fn for_day(series: &[DailySales], index: usize) -> Self {
        let of = |metric: SalesMetric| growth(series, index, metric, metric.inverts_sentiment());
        Self {
            revenue: of(SalesMetric::Revenue),
            orders: of(SalesMetric::Orders),
            cancellations: of(SalesMetric::Cancellations),
        }
    }
}

/// A product's sales within one window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopSellingProduct {
    pub product_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    /// Units sold
    pub count: i64,
    pub revenue: Decimal,
}

/// Rankings per window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopSelling {
    pub day: Vec<TopSellingProduct>,
    pub week: Vec<TopSellingProduct>,
    pub month: Vec<TopSellingProduct>,
}

/// Group lines by product, rank by units sold, keep the top five.
/// Equal counts keep the order in which products were first seen.
fn rank<'a, I>(lines: I) -> Vec<TopSellingProduct>
where
    I: IntoIterator<Item = &'a SoldLine>,
{
    let mut ranked: Vec<TopSellingProduct> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for line in lines {
        let slot = *index.entry(line.product_id).or_insert_with(|| {
            ranked.push(TopSellingProduct {
                product_id: line.product_id,
                name: line.product_name.clone(),
                image: line.image_url.clone(),
                count: 0,
                revenue: Decimal::ZERO,
            });
            ranked.len() - 1
        });
        let entry = &mut ranked[slot];
        entry.count += i64::from(line.quantity);
        entry.revenue += Decimal::from(line.quantity) * line.unit_price;
    }

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(TOP_SELLING_LIMIT);
    ranked
}

/// Rank completed sales for today, the trailing week and the trailing month
pub fn aggregate_top_selling(lines: &[SoldLine], now: DateTime<Utc>) -> TopSelling {
    let month_start = now - Duration::days(TOP_SELLING_LOOKBACK_DAYS);
    let week_start = now - Duration::days(WEEK_DAYS);
    let today = now.date_naive();

    let eligible: Vec<&SoldLine> = lines
        .iter()
        .filter(|l| l.order_status == OrderStatus::Completed && l.order_created_at >= month_start)
        .collect();

    TopSelling {
        day: rank(
            eligible
                .iter()
                .copied()
                .filter(|l| l.order_created_at.date_naive() == today),
        ),
        week: rank(
            eligible
                .iter()
                .copied()
                .filter(|l| l.order_created_at >= week_start),
        ),
        month: rank(eligible.iter().copied()),
    }
}

/// Lifetime totals over completed orders
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesTotals {
    pub total_sales: Decimal,
    pub total_orders: u64,
}

pub fn sales_totals(orders: &[OrderSummary]) -> SalesTotals {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .fold(SalesTotals::default(), |mut acc, o| {
            acc.total_sales += o.total_amount;
            acc.total_orders += 1;
            acc
        })
}

/// Cancelled orders regardless of date
pub fn cancelled_count(orders: &[OrderSummary]) -> u64 {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Cancelled)
        .count() as u64
}
