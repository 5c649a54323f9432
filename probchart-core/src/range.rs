//! Trailing time-range windows (1H / 6H / 1D / 1W / 1M / ALL).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Sample, Series, TimeUnit};
use crate::ranking::latest_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeWindow {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl RangeWindow {
    pub const ALL_WINDOWS: [RangeWindow; 6] = [
        RangeWindow::OneHour,
        RangeWindow::SixHours,
        RangeWindow::OneDay,
        RangeWindow::OneWeek,
        RangeWindow::OneMonth,
        RangeWindow::All,
    ];

    /// Window length in seconds; `None` for `All`.
    pub fn span_seconds(self) -> Option<i64> {
        match self {
            RangeWindow::OneHour => Some(3_600),
            RangeWindow::SixHours => Some(6 * 3_600),
            RangeWindow::OneDay => Some(86_400),
            RangeWindow::OneWeek => Some(7 * 86_400),
            RangeWindow::OneMonth => Some(30 * 86_400),
            RangeWindow::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RangeWindow::OneHour => "1H",
            RangeWindow::SixHours => "6H",
            RangeWindow::OneDay => "1D",
            RangeWindow::OneWeek => "1W",
            RangeWindow::OneMonth => "1M",
            RangeWindow::All => "ALL",
        }
    }

    /// Restrict every series to the window ending at the latest timestamp
    /// across the list.
    ///
    /// The sample in force at the cut-off is kept and re-stamped at the
    /// cut-off, so each step line starts at the window edge with the right
    /// value. Series that start after the cut-off are untouched.
    pub fn apply(self, series_list: &[Series], unit: TimeUnit) -> Vec<Series> {
        let (Some(span), Some(latest)) = (self.span_seconds(), latest_time(series_list)) else {
            return series_list.to_vec();
        };
        let cutoff = latest.saturating_sub(unit.from_seconds(span));
        debug!(window = self.label(), cutoff, "applying range window");

        series_list
            .iter()
            .map(|series| Series {
                id: series.id.clone(),
                name: series.name.clone(),
                samples: clip_samples(&series.samples, cutoff),
                start_boundary: series.start_boundary,
            })
            .collect()
    }
}

fn clip_samples(samples: &[Sample], cutoff: i64) -> Vec<Sample> {
    let first_inside = samples.partition_point(|s| s.timestamp < cutoff);
    let mut out = Vec::with_capacity(samples.len() - first_inside + 1);
    let starts_on_cutoff = samples
        .get(first_inside)
        .is_some_and(|s| s.timestamp == cutoff);
    if first_inside > 0 && !starts_on_cutoff {
        out.push(Sample::new(cutoff, samples[first_inside - 1].probability));
    }
    out.extend_from_slice(&samples[first_inside..]);
    out
}

impl std::str::FromStr for RangeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1h" => Ok(RangeWindow::OneHour),
            "6h" => Ok(RangeWindow::SixHours),
            "1d" => Ok(RangeWindow::OneDay),
            "1w" => Ok(RangeWindow::OneWeek),
            "1m" => Ok(RangeWindow::OneMonth),
            "all" | "max" => Ok(RangeWindow::All),
            other => Err(format!(
                "unknown range '{other}' (expected 1h, 6h, 1d, 1w, 1m or all)"
            )),
        }
    }
}

impl std::fmt::Display for RangeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
