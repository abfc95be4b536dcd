//! Async wrapper around [`AnalyticsClient`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every client operation on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! Record-store reads are blocking HTTP; aggregation is CPU-bound but fast.
//!
//! # Example
//!
//! ```no_run
//! use storefront_analytics::{AnalyticsClient, AsyncAnalyticsClient, DateRange};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = AsyncAnalyticsClient::build(AnalyticsClient::builder().from_env())
//!         .await
//!         .unwrap();
//!
//!     if let Some(snapshot) = client.refresh(DateRange::Last7Days).await.unwrap() {
//!         println!("{} products", snapshot.total_products);
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::error::{AnalyticsError, Result};
use crate::models::AnalyticsSnapshot;
use crate::range::DateRange;
use crate::{AnalyticsClient, AnalyticsClientBuilder};

/// Async wrapper around [`AnalyticsClient`].
///
/// Cloning is cheap and every clone shares one [`Dashboard`](crate::Dashboard),
/// so a refresh started from one task supersedes refreshes in flight on others.
#[derive(Clone)]
pub struct AsyncAnalyticsClient {
    inner: Arc<AnalyticsClient>,
}

impl AsyncAnalyticsClient {
    /// Build the client on the blocking thread pool.
    ///
    /// The REST source owns a blocking HTTP client, which must not be created
    /// on an async worker thread.
    pub async fn build(builder: AnalyticsClientBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || {
            let client = builder.build()?;
            Ok(Self::new(client))
        })
        .await
        .map_err(|e| AnalyticsError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Wrap an already-built client.
    pub fn new(client: AnalyticsClient) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    /// Run a sync client operation on the blocking thread pool.
    ///
    /// The closure receives an `&AnalyticsClient` and returns a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&AnalyticsClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| AnalyticsError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Fetch and aggregate a fresh snapshot for `range`.
    pub async fn snapshot(&self, range: DateRange) -> Result<AnalyticsSnapshot> {
        self.run(move |c| c.snapshot(range)).await
    }

    /// Run a full cycle for `range` and publish it.
    ///
    /// Resolves to `Ok(None)` when a later refresh superseded this one. As
    /// with [`AnalyticsClient::refresh`], a refresh that fails still
    /// supersedes older ones in flight.
    pub async fn refresh(&self, range: DateRange) -> Result<Option<AnalyticsSnapshot>> {
        // Take the ticket before yielding so call order decides which refresh wins.
        let ticket = self.inner.dashboard().begin(range);
        self.run(move |c| c.run_cycle(ticket)).await
    }

    /// The last snapshot saved for `range`, if persistence is enabled.
    pub async fn cached(&self, range: DateRange) -> Result<Option<AnalyticsSnapshot>> {
        self.run(move |c| c.cached(range)).await
    }

    /// The last published snapshot.
    pub fn current(&self) -> Option<AnalyticsSnapshot> {
        self.inner.dashboard().snapshot()
    }

    /// Release the client on the blocking thread pool.
    ///
    /// Other clones keep the client alive; the last one to close drops it.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            drop(self.inner);
            Ok(())
        })
        .await
        .map_err(|e| AnalyticsError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
