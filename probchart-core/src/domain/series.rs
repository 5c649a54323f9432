//! Series — one market's probability history.

use serde::{Deserialize, Serialize};

use super::sample::Sample;

/// One market's ordered history of probability samples.
///
/// The resolver assumes `samples` is sorted by non-decreasing timestamp.
/// Constructors do not sort; ingest calls [`Series::sort_samples`] before
/// handing series out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub name: String,
    pub samples: Vec<Sample>,
    /// Official market start. Samples before it are dropped at construction.
    pub start_boundary: Option<i64>,
}

impl Series {
    /// Build a series, dropping samples recorded before `start_boundary`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        samples: Vec<Sample>,
        start_boundary: Option<i64>,
    ) -> Self {
        let mut series = Self {
            id: id.into(),
            name: name.into(),
            samples,
            start_boundary,
        };
        series.apply_start_boundary();
        series
    }

    /// Convenience constructor from `(timestamp, probability)` pairs.
    /// The id doubles as the display name.
    pub fn from_points(id: impl Into<String>, points: &[(i64, f64)]) -> Self {
        let id = id.into();
        let samples = points.iter().copied().map(Sample::from).collect();
        Self::new(id.clone(), id, samples, None)
    }

    /// Retain only samples at or after the start boundary, if one is set.
    /// Returns the number of samples removed.
    pub fn apply_start_boundary(&mut self) -> usize {
        let Some(boundary) = self.start_boundary else {
            return 0;
        };
        let before = self.samples.len();
        self.samples.retain(|s| s.timestamp >= boundary);
        before - self.samples.len()
    }

    /// Stable sort by timestamp. Samples sharing a timestamp keep their order.
    pub fn sort_samples(&mut self) {
        self.samples.sort_by_key(|s| s.timestamp);
    }

    pub fn is_sorted(&self) -> bool {
        self.samples
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}
