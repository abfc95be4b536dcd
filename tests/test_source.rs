//! Record source tests: in-memory filtering, concurrent fetch, REST request shape.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use storefront_analytics::models::{
    ContactSubmissionRecord, NewsletterSubscriptionRecord, ProductRecord,
};
use storefront_analytics::{
    AnalyticsError, Dataset, MemorySource, RecordSource, RestSource, Result,
};

// ---------------------------------------------------------------------------
// Record deserialization
// ---------------------------------------------------------------------------

#[test]
fn records_parse_postgrest_rows() {
    let source = MemorySource::from_json(
        r#"[{"id":"8d1c","name":"Skillet","category":"Cookware","price":"$1,299.00",
             "image":"/a.png","description":null,"in_stock":false,
             "created_at":"2024-06-01T10:11:12.345678+00:00"}]"#,
        r#"[{"id":"c1","name":"A","email":"a@b.c","phone":null,"message":"hi",
             "status":null,"created_at":"2024-06-02T00:00:00+00:00"}]"#,
        r#"[{"id":"s1","email":"a@b.c","status":"active",
             "subscribed_at":"2024-06-03T00:00:00Z"}]"#,
    )
    .unwrap();

    let p = &source.products[0];
    assert_eq!(p.category, "Cookware");
    assert_eq!(p.price_value(), 1299.0);
    assert!(!p.in_stock);
    assert_eq!(p.created_at, common::ts("2024-06-01T10:11:12.345678Z"));

    assert_eq!(source.contacts[0].status, None);
    assert_eq!(source.contacts[0].status_key(), "pending");
    assert_eq!(source.subscriptions[0].status_key(), "active");
}

#[test]
fn missing_status_column_is_absent() {
    let c: ContactSubmissionRecord = serde_json::from_value(serde_json::json!({
        "id": "c1",
        "created_at": "2024-06-02T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(c.status_key(), "pending");
}

#[test]
fn unparseable_timestamp_is_rejected() {
    let err = MemorySource::from_json(
        r#"[{"id":"1","category":"A","price":"$1","in_stock":true,"created_at":"yesterday"}]"#,
        "[]",
        "[]",
    );
    assert!(matches!(err, Err(AnalyticsError::Json(_))));
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

#[test]
fn memory_source_without_bound_returns_everything() {
    let source = common::sample_source();
    assert_eq!(source.products(None).unwrap().len(), 5);
    assert_eq!(source.contact_submissions(None).unwrap().len(), 3);
    assert_eq!(source.newsletter_subscriptions(None).unwrap().len(), 3);
}

#[test]
fn memory_source_bound_is_inclusive() {
    let source = common::sample_source();
    let since = Some(common::ts("2024-01-03T08:00:00Z"));

    let ids: Vec<String> = source
        .products(since)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec!["p3", "p5"]);
}

#[test]
fn memory_source_filters_subscriptions_on_subscribed_at() {
    let source = common::sample_source();
    let since = Some(common::ts("2024-01-04T00:00:00Z"));
    assert_eq!(source.newsletter_subscriptions(since).unwrap().len(), 2);
    assert_eq!(source.contact_submissions(since).unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Dataset::fetch
// ---------------------------------------------------------------------------

#[test]
fn fetch_collects_all_three_collections() {
    let source = common::sample_source();
    let dataset = Dataset::fetch(&source, None).unwrap();
    assert_eq!(dataset.products.len(), 5);
    assert_eq!(dataset.contacts.len(), 3);
    assert_eq!(dataset.subscriptions.len(), 3);
    assert_eq!(dataset.compute().total_products, 5);
}

/// Succeeds for products and subscriptions, fails for contacts.
struct FailingContacts {
    calls: AtomicUsize,
}

impl RecordSource for FailingContacts {
    fn products(&self, _since: Option<DateTime<Utc>>) -> Result<Vec<ProductRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(common::sample_products())
    }

    fn contact_submissions(
        &self,
        _since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ContactSubmissionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AnalyticsError::Status {
            table: "contact_submissions".into(),
            status: 503,
            body: "unavailable".into(),
        })
    }

    fn newsletter_subscriptions(
        &self,
        _since: Option<DateTime<Utc>>,
    ) -> Result<Vec<NewsletterSubscriptionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(common::sample_subscriptions())
    }
}

#[test]
fn fetch_fails_whole_when_one_read_fails() {
    let source = FailingContacts {
        calls: AtomicUsize::new(0),
    };
    let err = Dataset::fetch(&source, None).unwrap_err();
    match err {
        AnalyticsError::Status { table, status, .. } => {
            assert_eq!(table, "contact_submissions");
            assert_eq!(status, 503);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
}

// ---------------------------------------------------------------------------
// RestSource
// ---------------------------------------------------------------------------

#[test]
fn rest_source_rejects_empty_url() {
    let err = RestSource::new("  ", "key", Duration::from_secs(5));
    assert!(matches!(err, Err(AnalyticsError::Config(_))));
}

#[test]
fn rest_source_rejects_invalid_key() {
    let err = RestSource::new("https://example.supabase.co", "bad\nkey", Duration::from_secs(5));
    assert!(matches!(err, Err(AnalyticsError::Config(_))));
}

#[test]
fn rest_source_table_url() {
    let source =
        RestSource::new("https://example.supabase.co/", "anon", Duration::from_secs(5)).unwrap();
    assert_eq!(
        source.table_url("products"),
        "https://example.supabase.co/rest/v1/products"
    );
}

#[test]
fn rest_query_applies_bound_to_time_column() {
    let since = common::ts("2024-01-02T03:04:05Z");
    let (path, params) =
        RestSource::table_query("newsletter_subscriptions", "subscribed_at", Some(since)).build();
    assert_eq!(path, "newsletter_subscriptions");
    assert!(params.contains(&(
        "subscribed_at".to_string(),
        "gte.2024-01-02T03:04:05.000Z".to_string()
    )));
}

#[test]
fn rest_query_without_bound_has_no_filter() {
    let (_, params) = RestSource::table_query("products", "created_at", None).build();
    assert_eq!(params, vec![("select".to_string(), "*".to_string())]);
}
