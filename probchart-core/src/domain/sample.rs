//! Sample — one probability observation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single `(timestamp, probability)` observation.
///
/// `probability` is a percentage in `[0, 100]`. The timestamp unit is not
/// carried per sample; see [`TimeUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: i64,
    pub probability: f64,
}

impl Sample {
    pub fn new(timestamp: i64, probability: f64) -> Self {
        Self {
            timestamp,
            probability,
        }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((timestamp, probability): (i64, f64)) -> Self {
        Self::new(timestamp, probability)
    }
}

/// Unit of the integer timestamps in a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Seconds,
    Millis,
}

impl TimeUnit {
    /// Convert a raw timestamp into UTC calendar time.
    ///
    /// Returns `None` when the timestamp is outside chrono's range.
    pub fn to_datetime(self, timestamp: i64) -> Option<DateTime<Utc>> {
        match self {
            TimeUnit::Seconds => DateTime::from_timestamp(timestamp, 0),
            TimeUnit::Millis => DateTime::from_timestamp_millis(timestamp),
        }
    }

    /// Express a span given in seconds in this unit.
    pub fn from_seconds(self, seconds: i64) -> i64 {
        match self {
            TimeUnit::Seconds => seconds,
            TimeUnit::Millis => seconds.saturating_mul(1_000),
        }
    }

    /// Format a timestamp for axis labels and tooltips.
    pub fn format(self, timestamp: i64, pattern: &str) -> String {
        match self.to_datetime(timestamp) {
            Some(dt) => dt.format(pattern).to_string(),
            None => timestamp.to_string(),
        }
    }
}
