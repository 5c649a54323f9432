//! Resolved values and cursor positions.

use serde::{Deserialize, Serialize};

/// The value of one series evaluated at a query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedValue {
    pub series_id: String,
    pub value: f64,
    /// True only for linearly interpolated bridge points.
    pub is_interpolated: bool,
}

/// Where the chart cursor sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorTime {
    /// The latest timestamp across all series ("no hover").
    #[default]
    Latest,
    At(i64),
}

impl std::str::FromStr for CursorTime {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            Ok(CursorTime::Latest)
        } else {
            s.trim().parse::<i64>().map(CursorTime::At)
        }
    }
}
