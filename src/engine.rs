//! Aggregation engine: raw records in, one [`AnalyticsSnapshot`] out.
//!
//! [`compute`] is pure and total. It never mutates its inputs, never fails,
//! and produces the same snapshot for the same input sequences. Groupings
//! keep first-seen key order so that output is reproducible.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::extract::{self, PRICE_BUCKETS};
use crate::models::{
    AnalyticsSnapshot, CategoryCount, ContactSubmissionRecord, DailyCount,
    NewsletterSubscriptionRecord, PriceRangeCount, ProductRecord, StatusCount,
};

// ---------------------------------------------------------------------------
// OrderedCounter
// ---------------------------------------------------------------------------

/// Key-to-count mapping that remembers the order keys were first seen in.
#[derive(Debug, Clone)]
pub struct OrderedCounter<K> {
    keys: Vec<K>,
    counts: Vec<usize>,
    index: HashMap<K, usize>,
}

impl<K> Default for OrderedCounter<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            counts: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` with a zero count if it is not present yet.
    pub fn seed(&mut self, key: K) {
        self.slot(key);
    }

    /// Add one to `key`'s count.
    pub fn increment(&mut self, key: K) {
        let slot = self.slot(key);
        self.counts[slot] += 1;
    }

    pub fn get(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&i| self.counts[i])
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(key, count)` pairs in first-seen order.
    pub fn into_pairs(self) -> Vec<(K, usize)> {
        self.keys.into_iter().zip(self.counts).collect()
    }

    fn slot(&mut self, key: K) -> usize {
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.keys.len();
        self.index.insert(key.clone(), i);
        self.keys.push(key);
        self.counts.push(0);
        i
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for OrderedCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = OrderedCounter::new();
        for key in iter {
            counter.increment(key);
        }
        counter
    }
}

// ---------------------------------------------------------------------------
// compute
// ---------------------------------------------------------------------------

/// Aggregate the three record collections into a snapshot.
///
/// The returned snapshot carries no range or timestamp metadata; clients
/// stamp it afterwards with [`AnalyticsSnapshot::stamped`].
pub fn compute(
    products: &[ProductRecord],
    contacts: &[ContactSubmissionRecord],
    subscriptions: &[NewsletterSubscriptionRecord],
) -> AnalyticsSnapshot {
    let total_products = products.len();
    let in_stock_products = products.iter().filter(|p| p.in_stock).count();

    let products_by_category: Vec<CategoryCount> = products
        .iter()
        .map(|p| p.category.as_str())
        .collect::<OrderedCounter<&str>>()
        .into_pairs()
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();

    let prices: Vec<f64> = products.iter().map(ProductRecord::price_value).collect();
    let total_value: f64 = prices.iter().sum();
    let average_price = if prices.is_empty() {
        0.0
    } else {
        total_value / prices.len() as f64
    };

    AnalyticsSnapshot {
        total_products,
        in_stock_products,
        out_of_stock_products: total_products - in_stock_products,
        total_categories: products_by_category.len(),
        total_contact_submissions: contacts.len(),
        total_newsletter_subscribers: subscriptions.len(),
        products_by_category,
        products_by_price_range: price_distribution(&prices),
        contact_submissions_by_status: status_distribution(
            contacts.iter().map(ContactSubmissionRecord::status_key),
        ),
        newsletter_subscriptions_by_status: status_distribution(
            subscriptions
                .iter()
                .map(NewsletterSubscriptionRecord::status_key),
        ),
        products_created_over_time: daily_series(products.iter().map(|p| &p.created_at)),
        contact_submissions_over_time: daily_series(contacts.iter().map(|c| &c.created_at)),
        newsletter_subscriptions_over_time: daily_series(
            subscriptions.iter().map(|s| &s.subscribed_at),
        ),
        average_price,
        total_value,
        range: None,
        generated_at: None,
    }
}

/// Count prices per bucket. All buckets are present, in ascending order,
/// even when empty.
pub fn price_distribution(prices: &[f64]) -> Vec<PriceRangeCount> {
    let mut counter = OrderedCounter::new();
    for (bucket, _, _) in PRICE_BUCKETS {
        counter.seed(bucket);
    }
    for &price in prices {
        counter.increment(extract::bucket_for(price));
    }
    counter
        .into_pairs()
        .into_iter()
        .map(|(bucket, count)| PriceRangeCount {
            range: bucket.label().to_string(),
            count,
        })
        .collect()
}

/// Group on raw status keys, then capitalize each key for display.
pub fn status_distribution<'a, I>(keys: I) -> Vec<StatusCount>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .collect::<OrderedCounter<&str>>()
        .into_pairs()
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: extract::capitalize(status),
            count,
        })
        .collect()
}

/// Count timestamps per UTC day, ascending by day key. Days without records
/// are not filled in.
pub fn daily_series<'a, I>(timestamps: I) -> Vec<DailyCount>
where
    I: IntoIterator<Item = &'a DateTime<Utc>>,
{
    let mut series: Vec<DailyCount> = timestamps
        .into_iter()
        .map(extract::day_key)
        .collect::<OrderedCounter<String>>()
        .into_pairs()
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();
    series.sort_by(|a, b| a.date.cmp(&b.date));
    series
}
