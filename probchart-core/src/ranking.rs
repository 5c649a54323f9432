//! Top-N series ranking.
//!
//! A multi-market chart is capped to its most relevant lines: the series
//! with the highest resolved value at the cursor time.

use std::cmp::Ordering;

use tracing::debug;

use crate::domain::{CursorTime, Series};
use crate::resolver::resolve_at;

/// Number of lines shown on a multi-market chart by default.
pub const DEFAULT_TOP_LIMIT: usize = 2;

/// Latest sample timestamp across all series, `None` if every series is empty.
pub fn latest_time(series_list: &[Series]) -> Option<i64> {
    series_list
        .iter()
        .filter_map(|s| s.last().map(|sample| sample.timestamp))
        .max()
}

impl CursorTime {
    /// Concrete query time for this cursor over `series_list`.
    pub fn resolve(self, series_list: &[Series]) -> Option<i64> {
        match self {
            CursorTime::Latest => latest_time(series_list),
            CursorTime::At(t) => Some(t),
        }
    }
}

/// A series paired with its step value at the ranking time.
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub series: &'a Series,
    pub value: f64,
}

/// Every non-empty series with its value at `at`, sorted descending.
///
/// The sort is stable: equal values keep their input order.
pub fn rank_series(series_list: &[Series], at: CursorTime) -> Vec<Ranked<'_>> {
    let Some(t) = at.resolve(series_list) else {
        return Vec::new();
    };

    let mut ranked: Vec<Ranked<'_>> = series_list
        .iter()
        .filter_map(|series| {
            resolve_at(series, t)
                .ok()
                .map(|resolved| Ranked {
                    series,
                    value: resolved.value,
                })
        })
        .collect();

    ranked.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    ranked
}

/// The `limit` series with the highest value at `at`.
pub fn rank_top_series(series_list: &[Series], at: CursorTime, limit: usize) -> Vec<&Series> {
    let mut ranked = rank_series(series_list, at);
    ranked.truncate(limit);
    debug!(
        candidates = series_list.len(),
        kept = ranked.len(),
        limit,
        "ranked top series"
    );
    ranked.into_iter().map(|r| r.series).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> Series {
        Series::from_points("A", &[(0, 50.0), (10, 70.0), (20, 65.0)])
    }

    fn b() -> Series {
        Series::from_points("B", &[(0, 30.0), (15, 40.0)])
    }

    fn ids(list: &[&Series]) -> Vec<String> {
        list.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn ranks_by_value_at_time() {
        let list = vec![b(), a()];
        let top = rank_top_series(&list, CursorTime::At(12), 2);
        assert_eq!(ids(&top), vec!["A", "B"]);
    }

    #[test]
    fn latest_uses_max_last_timestamp() {
        let list = vec![a(), b()];
        assert_eq!(latest_time(&list), Some(20));
        let ranked = rank_series(&list, CursorTime::Latest);
        assert_eq!(ranked[0].value, 65.0);
        assert_eq!(ranked[1].value, 40.0);
    }

    #[test]
    fn limit_caps_output() {
        let list = vec![a(), b(), Series::from_points("C", &[(0, 90.0)])];
        let top = rank_top_series(&list, CursorTime::At(0), DEFAULT_TOP_LIMIT);
        assert_eq!(ids(&top), vec!["C", "A"]);
        assert!(rank_top_series(&list, CursorTime::At(0), 0).is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let list = vec![
            Series::from_points("X", &[(0, 50.0)]),
            Series::from_points("Y", &[(0, 60.0)]),
            Series::from_points("Z", &[(0, 50.0)]),
        ];
        let top = rank_top_series(&list, CursorTime::At(0), 3);
        assert_eq!(ids(&top), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn empty_series_are_not_ranked() {
        let list = vec![Series::from_points("E", &[]), a()];
        let top = rank_top_series(&list, CursorTime::At(5), 2);
        assert_eq!(ids(&top), vec!["A"]);
    }

    #[test]
    fn all_empty_latest_ranks_nothing() {
        let list = vec![Series::from_points("E", &[])];
        assert!(rank_top_series(&list, CursorTime::Latest, 2).is_empty());
    }
}
