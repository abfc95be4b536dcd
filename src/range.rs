//! Symbolic date-range selectors and their absolute lower bounds.
//!
//! The range set is closed: every selector the dashboard offers is a variant
//! of [`DateRange`], and resolving one never fails.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// A dashboard range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "all")]
    AllTime,
}

impl DateRange {
    /// All selectors, in the order the dashboard lists them.
    pub const ALL: [DateRange; 4] = [
        DateRange::Last7Days,
        DateRange::Last30Days,
        DateRange::Last90Days,
        DateRange::AllTime,
    ];

    /// Number of days covered, or `None` for [`DateRange::AllTime`].
    pub fn days(self) -> Option<i64> {
        match self {
            DateRange::Last7Days => Some(7),
            DateRange::Last30Days => Some(30),
            DateRange::Last90Days => Some(90),
            DateRange::AllTime => None,
        }
    }

    /// Short tag used on the wire and in cache file names (`7d`, `30d`, `90d`, `all`).
    pub fn tag(self) -> &'static str {
        match self {
            DateRange::Last7Days => "7d",
            DateRange::Last30Days => "30d",
            DateRange::Last90Days => "90d",
            DateRange::AllTime => "all",
        }
    }

    /// Human-readable button label.
    pub fn label(self) -> &'static str {
        match self {
            DateRange::Last7Days => "7 Days",
            DateRange::Last30Days => "30 Days",
            DateRange::Last90Days => "90 Days",
            DateRange::AllTime => "All Time",
        }
    }

    /// Lower bound relative to `now`: `now` minus 7/30/90 whole days, or
    /// `None` (unbounded) for all-time.
    pub fn lower_bound(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|d| now - Duration::days(d))
    }

    /// Lower bound relative to the current instant.
    pub fn resolve(self) -> Option<DateTime<Utc>> {
        self.lower_bound(Utc::now())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DateRange {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" | "last-7-days" => Ok(DateRange::Last7Days),
            "30d" | "last-30-days" => Ok(DateRange::Last30Days),
            "90d" | "last-90-days" => Ok(DateRange::Last90Days),
            "all" | "all-time" => Ok(DateRange::AllTime),
            other => Err(AnalyticsError::InvalidArgument(format!(
                "Unknown date range: '{}' (expected one of 7d, 30d, 90d, all)",
                other
            ))),
        }
    }
}

/// Render a bound the way PostgREST filters expect it (RFC 3339, millisecond
/// precision, `Z` suffix).
pub fn format_bound(bound: DateTime<Utc>) -> String {
    bound.to_rfc3339_opts(SecondsFormat::Millis, true)
}
