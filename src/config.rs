use std::path::PathBuf;

pub const PRODUCTS_TABLE: &str = "products";
pub const CONTACT_SUBMISSIONS_TABLE: &str = "contact_submissions";
pub const NEWSLETTER_SUBSCRIPTIONS_TABLE: &str = "newsletter_subscriptions";

/// Timestamp column each table is filtered and bucketed on.
pub const PRODUCTS_TIME_COLUMN: &str = "created_at";
pub const CONTACT_SUBMISSIONS_TIME_COLUMN: &str = "created_at";
pub const NEWSLETTER_SUBSCRIPTIONS_TIME_COLUMN: &str = "subscribed_at";

/// Path prefix of the PostgREST API under a Supabase project URL.
pub const REST_PREFIX: &str = "rest/v1";

pub const URL_ENV: &str = "SUPABASE_URL";
pub const API_KEY_ENV: &str = "SUPABASE_ANON_KEY";

/// Number of categories shown in the ranked category list.
pub const DEFAULT_TOP_N: usize = 5;

pub const SNAPSHOT_FILE_EXT: &str = "json.gz";

pub fn snapshot_file_name(range_tag: &str) -> String {
    format!("snapshot-{}.{}", range_tag, SNAPSHOT_FILE_EXT)
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("storefront-analytics")
    } else {
        PathBuf::from(".storefront-analytics-cache")
    }
}
