use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::range::DateRange;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    pub range: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Display label (first character upper-cased).
    pub status: String,
    pub count: usize,
}

/// One point of a daily series. `date` is a `YYYY-MM-DD` day key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub count: usize,
}

/// One row of the combined products/contacts/newsletters trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub products: usize,
    pub contacts: usize,
    pub newsletters: usize,
}

/// A ranked category with its share of all products (`0.0..=1.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCategory {
    pub rank: usize,
    pub category: String,
    pub count: usize,
    pub share: f64,
}

// ---------------------------------------------------------------------------
// AnalyticsSnapshot — Complete result of one aggregation cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_products: usize,
    pub in_stock_products: usize,
    pub out_of_stock_products: usize,
    pub total_categories: usize,
    pub total_contact_submissions: usize,
    pub total_newsletter_subscribers: usize,
    pub products_by_category: Vec<CategoryCount>,
    pub products_by_price_range: Vec<PriceRangeCount>,
    pub contact_submissions_by_status: Vec<StatusCount>,
    pub newsletter_subscriptions_by_status: Vec<StatusCount>,
    pub products_created_over_time: Vec<DailyCount>,
    pub contact_submissions_over_time: Vec<DailyCount>,
    pub newsletter_subscriptions_over_time: Vec<DailyCount>,
    pub average_price: f64,
    pub total_value: f64,
    /// Range the inputs were filtered with, when produced by a client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl AnalyticsSnapshot {
    /// Percentage of products in stock, `0.0` when there are no products.
    pub fn stock_percentage(&self) -> f64 {
        if self.total_products == 0 {
            return 0.0;
        }
        self.in_stock_products as f64 / self.total_products as f64 * 100.0
    }

    /// Average number of products per category, `0.0` when there are none.
    pub fn products_per_category(&self) -> f64 {
        if self.total_categories == 0 {
            return 0.0;
        }
        self.total_products as f64 / self.total_categories as f64
    }

    /// Combined daily trend of all three series.
    pub fn combined_trend(&self) -> Vec<TrendPoint> {
        crate::trend::merge(
            &self.products_created_over_time,
            &self.contact_submissions_over_time,
            &self.newsletter_subscriptions_over_time,
        )
    }

    /// The `n` largest categories by product count.
    pub fn top_categories(&self, n: usize) -> Vec<RankedCategory> {
        crate::trend::top_categories(&self.products_by_category, n, self.total_products)
    }

    /// Attach the range and generation time the snapshot was produced for.
    pub fn stamped(mut self, range: DateRange, generated_at: DateTime<Utc>) -> Self {
        self.range = Some(range);
        self.generated_at = Some(generated_at);
        self
    }
}
