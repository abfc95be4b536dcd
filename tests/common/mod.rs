//! Shared test fixtures for the storefront analytics integration tests.
//!
//! Records are built from PostgREST-shaped JSON with `serde_json::json!`, the
//! same shape the REST source deserializes, so fixtures also exercise the
//! record models.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use storefront_analytics::models::{
    ContactSubmissionRecord, NewsletterSubscriptionRecord, ProductRecord,
};
use storefront_analytics::MemorySource;

/// Route `log` output through the test harness; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse an RFC 3339 timestamp.
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub fn product(id: &str, category: &str, price: &str, in_stock: bool, created_at: &str) -> ProductRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("Product {}", id),
        "category": category,
        "price": price,
        "image": "/placeholder.svg",
        "description": null,
        "in_stock": in_stock,
        "created_at": created_at
    }))
    .unwrap()
}

pub fn contact(id: &str, status: Option<&str>, created_at: &str) -> ContactSubmissionRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": "Jane Doe",
        "email": "jane@example.com",
        "message": "Do you ship abroad?",
        "status": status,
        "created_at": created_at
    }))
    .unwrap()
}

pub fn subscription(id: &str, status: Option<&str>, subscribed_at: &str) -> NewsletterSubscriptionRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "email": format!("{}@example.com", id),
        "status": status,
        "subscribed_at": subscribed_at
    }))
    .unwrap()
}

/// Small catalogue spread over three days of January 2024.
pub fn sample_products() -> Vec<ProductRecord> {
    vec![
        product("p1", "Cookware", "$75", true, "2024-01-01T09:00:00+00:00"),
        product("p2", "Flasks", "$220", false, "2024-01-01T17:30:00+00:00"),
        product("p3", "Cookware", "$1,234.50", true, "2024-01-03T08:00:00+00:00"),
        product("p4", "Tableware", "Call for price", true, "2024-01-02T12:00:00+00:00"),
        product("p5", "Cookware", "$49.99", false, "2024-01-03T23:59:59+00:00"),
    ]
}

pub fn sample_contacts() -> Vec<ContactSubmissionRecord> {
    vec![
        contact("c1", None, "2024-01-02T10:00:00+00:00"),
        contact("c2", Some("resolved"), "2024-01-02T11:00:00+00:00"),
        contact("c3", None, "2024-01-04T09:00:00+00:00"),
    ]
}

pub fn sample_subscriptions() -> Vec<NewsletterSubscriptionRecord> {
    vec![
        subscription("s1", Some("active"), "2024-01-01T08:00:00+00:00"),
        subscription("s2", Some("unsubscribed"), "2024-01-04T08:00:00+00:00"),
        subscription("s3", None, "2024-01-04T20:00:00+00:00"),
    ]
}

pub fn sample_source() -> MemorySource {
    MemorySource::new(sample_products(), sample_contacts(), sample_subscriptions())
}
