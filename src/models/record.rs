use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::{self, CONTACT_DEFAULT_STATUS, SUBSCRIPTION_DEFAULT_STATUS};

// ---------------------------------------------------------------------------
// ProductRecord — One row of the `products` table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub category: String,
    /// Free-form display price, e.g. `"$1,234.50"`. Not guaranteed numeric.
    pub price: String,
    #[serde(default)]
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Numeric price, `0.0` when the display string holds no number.
    pub fn price_value(&self) -> f64 {
        extract::parse_price(&self.price)
    }
}

// ---------------------------------------------------------------------------
// ContactSubmissionRecord — One row of the `contact_submissions` table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmissionRecord {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContactSubmissionRecord {
    /// Grouping key; `"pending"` when the status is absent or empty.
    pub fn status_key(&self) -> &str {
        extract::status_of(self.status.as_deref(), CONTACT_DEFAULT_STATUS)
    }
}

// ---------------------------------------------------------------------------
// NewsletterSubscriptionRecord — One row of the `newsletter_subscriptions` table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsletterSubscriptionRecord {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    pub subscribed_at: DateTime<Utc>,
}

impl NewsletterSubscriptionRecord {
    /// Grouping key; `"active"` when the status is absent or empty.
    pub fn status_key(&self) -> &str {
        extract::status_of(self.status.as_deref(), SUBSCRIPTION_DEFAULT_STATUS)
    }
}
