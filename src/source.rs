//! Record sources: where the three raw collections come from.
//!
//! [`RestSource`] reads a Supabase project's PostgREST API; [`MemorySource`]
//! serves records held in process. Both apply the range lower bound the way
//! the store would, on `created_at` / `subscribed_at`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;

use crate::config;
use crate::engine;
use crate::error::{AnalyticsError, Result};
use crate::models::{
    AnalyticsSnapshot, ContactSubmissionRecord, NewsletterSubscriptionRecord, ProductRecord,
};
use crate::query::QueryBuilder;
use crate::range::format_bound;

// ---------------------------------------------------------------------------
// RecordSource
// ---------------------------------------------------------------------------

/// Supplies the three record collections, each optionally filtered to
/// records at or after `since`.
///
/// Implementations must be shareable across threads: the three reads of
/// one cycle run concurrently.
pub trait RecordSource: Send + Sync {
    fn products(&self, since: Option<DateTime<Utc>>) -> Result<Vec<ProductRecord>>;

    fn contact_submissions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ContactSubmissionRecord>>;

    fn newsletter_subscriptions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<NewsletterSubscriptionRecord>>;
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The three collections of one fetch cycle, all present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub products: Vec<ProductRecord>,
    pub contacts: Vec<ContactSubmissionRecord>,
    pub subscriptions: Vec<NewsletterSubscriptionRecord>,
}

impl Dataset {
    /// Read all three collections concurrently.
    ///
    /// Fails with the first error encountered; no partial dataset is
    /// returned.
    pub fn fetch<S: RecordSource + ?Sized>(
        source: &S,
        since: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let (products, contacts, subscriptions) = std::thread::scope(|scope| {
            let products = scope.spawn(|| source.products(since));
            let contacts = scope.spawn(|| source.contact_submissions(since));
            let subscriptions = scope.spawn(|| source.newsletter_subscriptions(since));
            (
                join(products),
                join(contacts),
                join(subscriptions),
            )
        });

        let dataset = Dataset {
            products: products?,
            contacts: contacts?,
            subscriptions: subscriptions?,
        };
        log::debug!(
            "Fetched {} products, {} contact submissions, {} subscriptions (since {:?})",
            dataset.products.len(),
            dataset.contacts.len(),
            dataset.subscriptions.len(),
            since.map(format_bound)
        );
        Ok(dataset)
    }

    pub fn compute(&self) -> AnalyticsSnapshot {
        engine::compute(&self.products, &self.contacts, &self.subscriptions)
    }
}

fn join<T>(handle: std::thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(v) => v,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

// ---------------------------------------------------------------------------
// RestSource
// ---------------------------------------------------------------------------

/// Reads records from a Supabase project through its PostgREST endpoint.
pub struct RestSource {
    base_url: String,
    client: Client,
}

impl RestSource {
    /// Create a source for the project at `base_url`
    /// (e.g. `https://xyz.supabase.co`), authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(AnalyticsError::Config("record store URL is empty".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("apikey", header_value(api_key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", api_key))?);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Full URL of a table endpoint.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, config::REST_PREFIX, table)
    }

    /// Build the read of `table`, filtered on `time_column >= since`.
    pub fn table_query(
        table: &str,
        time_column: &str,
        since: Option<DateTime<Utc>>,
    ) -> QueryBuilder {
        let mut qb = QueryBuilder::new(table);
        if let Some(bound) = since {
            qb.gte(time_column, &format_bound(bound));
        }
        qb
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        table: &str,
        time_column: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<T>> {
        let (path, params) = Self::table_query(table, time_column, since).build();
        let url = self.table_url(&path);
        log::debug!("GET {} {:?}", url, params);

        let resp = self.client.get(&url).query(&params).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AnalyticsError::Status {
                table: table.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<T> = resp.json()?;
        log::debug!("{} rows from {}", rows.len(), table);
        Ok(rows)
    }
}

impl RecordSource for RestSource {
    fn products(&self, since: Option<DateTime<Utc>>) -> Result<Vec<ProductRecord>> {
        self.fetch(config::PRODUCTS_TABLE, config::PRODUCTS_TIME_COLUMN, since)
    }

    fn contact_submissions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ContactSubmissionRecord>> {
        self.fetch(
            config::CONTACT_SUBMISSIONS_TABLE,
            config::CONTACT_SUBMISSIONS_TIME_COLUMN,
            since,
        )
    }

    fn newsletter_subscriptions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<NewsletterSubscriptionRecord>> {
        self.fetch(
            config::NEWSLETTER_SUBSCRIPTIONS_TABLE,
            config::NEWSLETTER_SUBSCRIPTIONS_TIME_COLUMN,
            since,
        )
    }
}

fn header_value(s: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(s)
        .map_err(|e| AnalyticsError::Config(format!("API key is not a valid header value: {}", e)))
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

/// In-process record store. Filters like the REST source and returns
/// records in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub products: Vec<ProductRecord>,
    pub contacts: Vec<ContactSubmissionRecord>,
    pub subscriptions: Vec<NewsletterSubscriptionRecord>,
}

impl MemorySource {
    pub fn new(
        products: Vec<ProductRecord>,
        contacts: Vec<ContactSubmissionRecord>,
        subscriptions: Vec<NewsletterSubscriptionRecord>,
    ) -> Self {
        Self {
            products,
            contacts,
            subscriptions,
        }
    }

    /// Load records from PostgREST-shaped JSON arrays.
    pub fn from_json(
        products: &str,
        contacts: &str,
        subscriptions: &str,
    ) -> Result<Self> {
        Ok(Self {
            products: serde_json::from_str(products)?,
            contacts: serde_json::from_str(contacts)?,
            subscriptions: serde_json::from_str(subscriptions)?,
        })
    }
}

fn since_filter<T: Clone>(
    rows: &[T],
    since: Option<DateTime<Utc>>,
    ts: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    rows.iter()
        .filter(|r| since.map_or(true, |bound| ts(r) >= bound))
        .cloned()
        .collect()
}

impl RecordSource for MemorySource {
    fn products(&self, since: Option<DateTime<Utc>>) -> Result<Vec<ProductRecord>> {
        Ok(since_filter(&self.products, since, |p| p.created_at))
    }

    fn contact_submissions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ContactSubmissionRecord>> {
        Ok(since_filter(&self.contacts, since, |c| c.created_at))
    }

    fn newsletter_subscriptions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<NewsletterSubscriptionRecord>> {
        Ok(since_filter(&self.subscriptions, since, |s| s.subscribed_at))
    }
}
