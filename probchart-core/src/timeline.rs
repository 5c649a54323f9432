//! Unified timeline and multi-series alignment.
//!
//! The unified timeline is the sorted, deduplicated union of every sample
//! timestamp in a multi-series chart. Aligning puts each series onto that
//! axis with step-hold values. A series has no value before its first sample:
//! a market that opened later is not back-filled.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::Series;

/// Sorted, deduplicated union of all sample timestamps.
pub fn build_unified_timeline(series_list: &[Series]) -> Vec<i64> {
    let all: BTreeSet<i64> = series_list
        .iter()
        .flat_map(|s| s.samples.iter().map(|sample| sample.timestamp))
        .collect();
    all.into_iter().collect()
}

/// One series' values on the shared timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedColumn {
    pub series_id: String,
    pub name: String,
    /// Same length as [`AlignedTable::timestamps`].
    pub values: Vec<Option<f64>>,
}

/// Step-hold values of every series on a common timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedTable {
    pub timestamps: Vec<i64>,
    pub columns: Vec<AlignedColumn>,
}

impl AlignedTable {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Values of every column at row `i`, in column order.
    pub fn row(&self, i: usize) -> Option<Vec<Option<f64>>> {
        if i >= self.timestamps.len() {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[i]).collect())
    }
}

/// Align every series onto `timeline` (which must be sorted ascending).
pub fn align_series(series_list: &[Series], timeline: &[i64]) -> AlignedTable {
    let columns = series_list
        .iter()
        .map(|series| AlignedColumn {
            series_id: series.id.clone(),
            name: series.name.clone(),
            values: step_values(series, timeline),
        })
        .collect();

    AlignedTable {
        timestamps: timeline.to_vec(),
        columns,
    }
}

/// Walk the timeline and the samples together; both are sorted.
///
/// Matches [`resolve_at`](crate::resolver::resolve_at): at the first
/// timestamp the first sample wins, even when later samples share it.
fn step_values(series: &Series, timeline: &[i64]) -> Vec<Option<f64>> {
    let samples = &series.samples;
    let mut out = Vec::with_capacity(timeline.len());
    let mut next = 0;
    let mut current: Option<f64> = None;

    for &t in timeline {
        while next < samples.len() && samples[next].timestamp <= t {
            current = Some(samples[next].probability);
            next += 1;
        }
        match samples.first() {
            Some(first) if current.is_some() && t == first.timestamp => {
                out.push(Some(first.probability))
            }
            _ => out.push(current),
        }
    }
    out
}
