//! Field extractors: turn free-form record fields into typed values.
//!
//! Every function here is total. Malformed input degrades to a default
//! instead of failing, so the aggregation engine always receives finite
//! numbers and non-empty labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default status for a contact submission without one.
pub const CONTACT_DEFAULT_STATUS: &str = "pending";
/// Default status for a newsletter subscription without one.
pub const SUBSCRIPTION_DEFAULT_STATUS: &str = "active";

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// Best-effort numeric extraction from a currency-formatted price string.
///
/// Every character that is not an ASCII digit or `.` is dropped, then the
/// longest numeric prefix of the remainder is parsed (`"1.2.3"` reads as
/// `1.2`). Empty or unparsable remainders yield `0.0`.
///
/// ```rust
/// use storefront_analytics::extract::parse_price;
/// assert_eq!(parse_price("$1,234.50"), 1234.5);
/// assert_eq!(parse_price("abc"), 0.0);
/// ```
pub fn parse_price(raw: &str) -> f64 {
    let mut numeric = String::with_capacity(raw.len());
    let mut seen_point = false;
    for c in raw.chars() {
        match c {
            '0'..='9' => numeric.push(c),
            '.' if !seen_point => {
                seen_point = true;
                numeric.push(c);
            }
            // A second point ends the number.
            '.' => break,
            _ => {}
        }
    }

    match numeric.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Half-open price range used for the price distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBucket {
    #[serde(rename = "$0-$50")]
    Under50,
    #[serde(rename = "$50-$100")]
    From50To100,
    #[serde(rename = "$100-$200")]
    From100To200,
    #[serde(rename = "$200+")]
    Over200,
}

/// Bucket table in ascending order. Lower bounds are inclusive, upper bounds
/// exclusive; the last bucket is unbounded.
pub const PRICE_BUCKETS: [(PriceBucket, f64, Option<f64>); 4] = [
    (PriceBucket::Under50, 0.0, Some(50.0)),
    (PriceBucket::From50To100, 50.0, Some(100.0)),
    (PriceBucket::From100To200, 100.0, Some(200.0)),
    (PriceBucket::Over200, 200.0, None),
];

impl PriceBucket {
    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::Under50 => "$0-$50",
            PriceBucket::From50To100 => "$50-$100",
            PriceBucket::From100To200 => "$100-$200",
            PriceBucket::Over200 => "$200+",
        }
    }

    /// Inclusive lower bound.
    pub fn min(self) -> f64 {
        PRICE_BUCKETS[self.index()].1
    }

    /// Exclusive upper bound, `None` for the open-ended bucket.
    pub fn max(self) -> Option<f64> {
        PRICE_BUCKETS[self.index()].2
    }

    /// Position in [`PRICE_BUCKETS`].
    pub fn index(self) -> usize {
        match self {
            PriceBucket::Under50 => 0,
            PriceBucket::From50To100 => 1,
            PriceBucket::From100To200 => 2,
            PriceBucket::Over200 => 3,
        }
    }

    fn contains(self, price: f64) -> bool {
        price >= self.min() && self.max().map_or(true, |max| price < max)
    }
}

/// First bucket (ascending) whose range contains `price`.
///
/// `parse_price` never yields a negative value, but anything below zero or
/// NaN still lands in the lowest bucket so that every product is counted.
pub fn bucket_for(price: f64) -> PriceBucket {
    PRICE_BUCKETS
        .iter()
        .map(|(bucket, _, _)| *bucket)
        .find(|bucket| bucket.contains(price))
        .unwrap_or(PriceBucket::Under50)
}

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Grouping key for an optional status: the raw value when present and
/// non-empty, otherwise `default`.
pub fn status_of<'a>(status: Option<&'a str>, default: &'a str) -> &'a str {
    match status {
        Some(s) if !s.is_empty() => s,
        _ => default,
    }
}

/// Display form of a status key: first character upper-cased, rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Days
// ---------------------------------------------------------------------------

/// Calendar day of an instant in UTC, as a fixed-width `YYYY-MM-DD` string.
pub fn day_key(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}
