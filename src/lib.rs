//! Storefront analytics.
//!
//! Turns the raw records of a storefront's record store (products, contact
//! submissions, newsletter subscriptions) into an [`AnalyticsSnapshot`]:
//! totals, categorical distributions and daily time series for an admin
//! dashboard.
//!
//! The aggregation itself ([`engine::compute`]) is a pure function. The
//! [`AnalyticsClient`] around it resolves a [`DateRange`], reads the three
//! collections concurrently from a [`RecordSource`], computes, and optionally
//! keeps the result in a local [`SnapshotStore`].
//!
//! # Quick start
//!
//! ```no_run
//! use storefront_analytics::{AnalyticsClient, DateRange};
//!
//! let client = AnalyticsClient::builder().from_env().build().unwrap();
//! let snapshot = client.snapshot(DateRange::Last30Days).unwrap();
//! println!("{} products, avg ${:.2}", snapshot.total_products, snapshot.average_price);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod extract;
pub mod models;
pub mod query;
pub mod range;
pub mod source;
pub mod trend;

#[cfg(feature = "async")]
pub use async_client::AsyncAnalyticsClient;
pub use cache::SnapshotStore;
pub use dashboard::{Dashboard, Ticket};
pub use engine::compute;
pub use error::{AnalyticsError, Result};
pub use models::AnalyticsSnapshot;
pub use query::QueryBuilder;
pub use range::DateRange;
pub use source::{Dataset, MemorySource, RecordSource, RestSource};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;

// ---------------------------------------------------------------------------
// AnalyticsClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AnalyticsClient`].
///
/// Use [`AnalyticsClient::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](AnalyticsClientBuilder::build).
pub struct AnalyticsClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    cache_dir: Option<PathBuf>,
    persist: bool,
    source: Option<Box<dyn RecordSource>>,
}

impl Default for AnalyticsClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: Duration::from_secs(30),
            cache_dir: None,
            persist: false,
            source: None,
        }
    }
}

impl AnalyticsClientBuilder {
    /// Set the record store's project URL (e.g. `https://xyz.supabase.co`).
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set the API key sent with every record-store request.
    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Fill the URL and API key from `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    ///
    /// Values already set on the builder take precedence.
    pub fn from_env(mut self) -> Self {
        if self.base_url.is_none() {
            self.base_url = std::env::var(config::URL_ENV).ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var(config::API_KEY_ENV).ok();
        }
        self
    }

    /// Set the HTTP request timeout for record-store reads.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom snapshot cache directory. Implies [`persist(true)`](Self::persist).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self.persist = true;
        self
    }

    /// Save every computed snapshot to the [`SnapshotStore`]. Defaults to `false`.
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Read records from `source` instead of the REST endpoint.
    pub fn source<S: RecordSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Build the client.
    ///
    /// Without an injected source, both the URL and the API key must be set
    /// (directly or via [`from_env`](Self::from_env)).
    pub fn build(self) -> Result<AnalyticsClient> {
        let source: Box<dyn RecordSource> = match self.source {
            Some(source) => source,
            None => {
                let url = self.base_url.ok_or_else(|| {
                    AnalyticsError::Config(format!(
                        "record store URL not set (set {} or call base_url)",
                        config::URL_ENV
                    ))
                })?;
                let key = self.api_key.ok_or_else(|| {
                    AnalyticsError::Config(format!(
                        "record store API key not set (set {} or call api_key)",
                        config::API_KEY_ENV
                    ))
                })?;
                Box::new(RestSource::new(&url, &key, self.timeout)?)
            }
        };

        let store = if self.persist {
            Some(SnapshotStore::new(self.cache_dir)?)
        } else {
            None
        };

        Ok(AnalyticsClient {
            source,
            store,
            dashboard: Dashboard::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// AnalyticsClient
// ---------------------------------------------------------------------------

/// The main entry point: fetch, aggregate, publish.
///
/// Created via [`AnalyticsClient::builder()`]. The client is `Send + Sync`;
/// concurrent [`refresh`](Self::refresh) calls resolve latest-wins through
/// its [`Dashboard`].
pub struct AnalyticsClient {
    source: Box<dyn RecordSource>,
    store: Option<SnapshotStore>,
    dashboard: Dashboard,
}

impl AnalyticsClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> AnalyticsClientBuilder {
        AnalyticsClientBuilder::default()
    }

    /// Read the three collections for `range`, bounded at the current instant.
    pub fn fetch(&self, range: DateRange) -> Result<Dataset> {
        Dataset::fetch(self.source.as_ref(), range.resolve())
    }

    /// Fetch and aggregate a fresh snapshot for `range`.
    ///
    /// The snapshot is stamped with the range and generation time and, when
    /// persistence is enabled, written to the store. Fetch failures propagate
    /// and no snapshot is produced. A failed store write is logged and does
    /// not affect the returned snapshot.
    pub fn snapshot(&self, range: DateRange) -> Result<AnalyticsSnapshot> {
        let generated_at = Utc::now();
        let dataset = Dataset::fetch(self.source.as_ref(), range.lower_bound(generated_at))?;
        Ok(self.finish(range, &dataset, generated_at))
    }

    /// Run a full cycle for `range` and publish it to the dashboard.
    ///
    /// Returns `Ok(None)` when another refresh began while this one was in
    /// flight; its result is then discarded in favour of the newer one.
    ///
    /// Beginning a refresh supersedes any older one still in flight, even if
    /// this refresh later fails. On failure the dashboard keeps whatever it
    /// published before, not the result of a superseded cycle.
    pub fn refresh(&self, range: DateRange) -> Result<Option<AnalyticsSnapshot>> {
        let ticket = self.dashboard.begin(range);
        self.run_cycle(ticket)
    }

    /// Fetch, aggregate and publish for a ticket already taken from
    /// [`dashboard().begin`](Dashboard::begin).
    ///
    /// If the ticket has been superseded once the fetch returns, the cycle
    /// stops there: nothing is computed, stored or published, and the result
    /// is `Ok(None)`.
    pub fn run_cycle(&self, ticket: Ticket) -> Result<Option<AnalyticsSnapshot>> {
        let generated_at = Utc::now();
        let dataset = Dataset::fetch(
            self.source.as_ref(),
            ticket.range.lower_bound(generated_at),
        )?;
        if !self.dashboard.is_current(&ticket) {
            log::debug!(
                "Skipping {} cycle {}: superseded during fetch",
                ticket.range,
                ticket.generation
            );
            return Ok(None);
        }

        let snapshot = self.finish(ticket.range, &dataset, generated_at);
        if self.dashboard.complete(ticket, snapshot.clone()) {
            Ok(Some(snapshot))
        } else {
            Ok(None)
        }
    }

    fn finish(
        &self,
        range: DateRange,
        dataset: &Dataset,
        generated_at: chrono::DateTime<Utc>,
    ) -> AnalyticsSnapshot {
        let snapshot = dataset.compute().stamped(range, generated_at);
        log::info!(
            "Computed {} snapshot: {} products, {} contacts, {} subscribers",
            range,
            snapshot.total_products,
            snapshot.total_contact_submissions,
            snapshot.total_newsletter_subscribers
        );

        if let Some(store) = &self.store {
            if let Err(e) = store.save(range, &snapshot) {
                log::warn!("Failed to store {} snapshot: {}", range, e);
            }
        }
        snapshot
    }

    /// The last snapshot saved for `range`, if persistence is enabled.
    pub fn cached(&self, range: DateRange) -> Result<Option<AnalyticsSnapshot>> {
        match &self.store {
            Some(store) => store.load(range),
            None => Ok(None),
        }
    }

    /// Latest-wins holder of the published snapshot.
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// The snapshot store, when persistence is enabled.
    pub fn store(&self) -> Option<&SnapshotStore> {
        self.store.as_ref()
    }

    /// Return a reference to the underlying [`RecordSource`].
    pub fn source(&self) -> &dyn RecordSource {
        self.source.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for AnalyticsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self
            .store
            .as_ref()
            .map(|s| s.cache_dir.display().to_string())
            .unwrap_or_else(|| "none".to_string());
        let range = self
            .dashboard
            .range()
            .map(|r| r.tag())
            .unwrap_or("none");
        write!(f, "AnalyticsClient(cache_dir={}, range={})", cache, range)
    }
}
