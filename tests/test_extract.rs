//! Unit tests for the field extractors.

mod common;

use storefront_analytics::extract::{
    bucket_for, capitalize, day_key, parse_price, status_of, PriceBucket, PRICE_BUCKETS,
};

// ---------------------------------------------------------------------------
// parse_price
// ---------------------------------------------------------------------------

#[test]
fn parse_price_strips_currency_and_separators() {
    assert_eq!(parse_price("$1,234.50"), 1234.5);
    assert_eq!(parse_price("$75"), 75.0);
    assert_eq!(parse_price("  49.99 USD"), 49.99);
}

#[test]
fn parse_price_degrades_to_zero() {
    assert_eq!(parse_price(""), 0.0);
    assert_eq!(parse_price("abc"), 0.0);
    assert_eq!(parse_price("Call for price"), 0.0);
    assert_eq!(parse_price("."), 0.0);
}

#[test]
fn parse_price_reads_leading_number_when_several_points() {
    assert_eq!(parse_price("1.2.3"), 1.2);
    assert_eq!(parse_price("v2.1.0"), 2.1);
}

#[test]
fn parse_price_ignores_minus_sign() {
    assert_eq!(parse_price("-$5"), 5.0);
}

#[test]
fn parse_price_is_never_negative_or_non_finite() {
    for raw in ["", "abc", "-1", "$-0.5", "1e400", "€ 3,50", ".5", "5.", "∞"] {
        let v = parse_price(raw);
        assert!(v >= 0.0 && v.is_finite(), "{raw:?} -> {v}");
    }
}

// ---------------------------------------------------------------------------
// bucket_for
// ---------------------------------------------------------------------------

#[test]
fn bucket_boundaries_are_lower_inclusive() {
    assert_eq!(bucket_for(0.0), PriceBucket::Under50);
    assert_eq!(bucket_for(49.99), PriceBucket::Under50);
    assert_eq!(bucket_for(50.0), PriceBucket::From50To100);
    assert_eq!(bucket_for(99.999), PriceBucket::From50To100);
    assert_eq!(bucket_for(100.0), PriceBucket::From100To200);
    assert_eq!(bucket_for(200.0), PriceBucket::Over200);
    assert_eq!(bucket_for(1_000_000.0), PriceBucket::Over200);
}

#[test]
fn bucket_table_partitions_without_gaps() {
    for pair in PRICE_BUCKETS.windows(2) {
        assert_eq!(pair[0].2, Some(pair[1].1));
    }
    assert_eq!(PRICE_BUCKETS[0].1, 0.0);
    assert_eq!(PRICE_BUCKETS[PRICE_BUCKETS.len() - 1].2, None);
}

#[test]
fn bucket_labels_match_dashboard() {
    let labels: Vec<&str> = PRICE_BUCKETS.iter().map(|(b, _, _)| b.label()).collect();
    assert_eq!(labels, vec!["$0-$50", "$50-$100", "$100-$200", "$200+"]);
    assert_eq!(PriceBucket::From100To200.min(), 100.0);
    assert_eq!(PriceBucket::Over200.max(), None);
}

#[test]
fn bucket_serializes_as_label() {
    let json = serde_json::to_string(&PriceBucket::Over200).unwrap();
    assert_eq!(json, "\"$200+\"");
}

// ---------------------------------------------------------------------------
// status_of / capitalize
// ---------------------------------------------------------------------------

#[test]
fn status_defaults_when_absent_or_empty() {
    assert_eq!(status_of(None, "pending"), "pending");
    assert_eq!(status_of(Some(""), "pending"), "pending");
    assert_eq!(status_of(Some("resolved"), "pending"), "resolved");
}

#[test]
fn status_keeps_raw_case() {
    assert_eq!(status_of(Some("Active"), "active"), "Active");
}

#[test]
fn capitalize_uppercases_first_char_only() {
    assert_eq!(capitalize("pending"), "Pending");
    assert_eq!(capitalize("in progress"), "In progress");
    assert_eq!(capitalize("ACTIVE"), "ACTIVE");
    assert_eq!(capitalize("éte"), "Éte");
    assert_eq!(capitalize(""), "");
}

// ---------------------------------------------------------------------------
// day_key
// ---------------------------------------------------------------------------

#[test]
fn day_key_truncates_to_utc_day() {
    assert_eq!(day_key(&common::ts("2024-01-03T23:59:59+00:00")), "2024-01-03");
    assert_eq!(day_key(&common::ts("2024-01-04T00:00:00+00:00")), "2024-01-04");
}

#[test]
fn day_key_converts_offsets_to_utc() {
    // 01:30 at +02:00 is still the previous day in UTC.
    assert_eq!(day_key(&common::ts("2024-03-01T01:30:00+02:00")), "2024-02-29");
}

#[test]
fn day_key_is_zero_padded() {
    assert_eq!(day_key(&common::ts("0999-02-03T00:00:00Z")), "0999-02-03");
}
