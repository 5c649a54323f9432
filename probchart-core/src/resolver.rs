//! Step-hold resolver.
//!
//! A series is displayed as a "stepAfter" curve: the value of a sample holds
//! until the next sample's timestamp. Resolving a query time therefore means
//! finding the rightmost sample at or before it (left bisection) and reading
//! its probability. Queries before the first sample clamp to the first value;
//! queries after the last sample clamp to the last.
//!
//! Linear interpolation is used only for bridge points, the synthetic values
//! that line several series up on a shared hover time. Display and ranking
//! never interpolate.

use tracing::{trace, warn};

use crate::domain::{ResolvedValue, Sample, Series};
use crate::error::{ChartError, Result};

/// Index of the sample whose value is in force at `query_time`.
///
/// `samples` must be non-empty and sorted. Returns 0 for queries at or
/// before the first timestamp, otherwise the rightmost index with
/// `timestamp <= query_time`.
pub fn active_index(samples: &[Sample], query_time: i64) -> usize {
    match samples.first() {
        Some(first) if query_time > first.timestamp => samples
            .partition_point(|s| s.timestamp <= query_time)
            .saturating_sub(1),
        _ => 0,
    }
}

/// Resolve the displayed value of `series` at `query_time`.
pub fn resolve_at(series: &Series, query_time: i64) -> Result<ResolvedValue> {
    if series.is_empty() {
        return Err(ChartError::EmptySeries {
            id: series.id.clone(),
        });
    }
    let idx = active_index(&series.samples, query_time);
    trace!(series = %series.id, query_time, idx, "resolved step value");
    Ok(ResolvedValue {
        series_id: series.id.clone(),
        value: series.samples[idx].probability,
        is_interpolated: false,
    })
}

/// Evaluate `series` at `t` with linear interpolation between the two
/// bounding samples.
///
/// Falls back to the step value (not interpolated) when `t` is outside the
/// sample range or lands exactly on a sample.
pub fn interpolate_at(series: &Series, t: i64) -> Result<ResolvedValue> {
    let step = resolve_at(series, t)?;
    let samples = &series.samples;
    let idx = active_index(samples, t);
    let s0 = samples[idx];
    let Some(s1) = samples.get(idx + 1).copied() else {
        return Ok(step);
    };
    if t <= s0.timestamp || t >= s1.timestamp {
        return Ok(step);
    }

    Ok(ResolvedValue {
        series_id: series.id.clone(),
        value: lerp(s0, s1, t),
        is_interpolated: true,
    })
}

/// Bridge points for every non-empty series at a shared hover time.
///
/// Empty series are skipped; they have nothing to bridge.
pub fn bridge_points(series_list: &[Series], t: i64) -> Vec<ResolvedValue> {
    series_list
        .iter()
        .filter_map(|series| match interpolate_at(series, t) {
            Ok(v) => Some(v),
            Err(err) => {
                warn!(%err, "skipping series in bridge points");
                None
            }
        })
        .collect()
}

/// Offsets are taken in `i128` so timestamps spanning the whole `i64`
/// range cannot overflow.
fn lerp(s0: Sample, s1: Sample, t: i64) -> f64 {
    let t0 = i128::from(s0.timestamp);
    let dt = (i128::from(s1.timestamp) - t0) as f64;
    if dt == 0.0 {
        return s1.probability;
    }
    let frac = (i128::from(t) - t0) as f64 / dt;
    s0.probability + (s1.probability - s0.probability) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_a() -> Series {
        Series::from_points("A", &[(0, 50.0), (10, 70.0), (20, 65.0)])
    }

    #[test]
    fn active_index_bisects_left() {
        let a = series_a();
        assert_eq!(active_index(&a.samples, -5), 0);
        assert_eq!(active_index(&a.samples, 0), 0);
        assert_eq!(active_index(&a.samples, 9), 0);
        assert_eq!(active_index(&a.samples, 10), 1);
        assert_eq!(active_index(&a.samples, 19), 1);
        assert_eq!(active_index(&a.samples, 20), 2);
        assert_eq!(active_index(&a.samples, 1_000), 2);
    }

    #[test]
    fn active_index_takes_rightmost_duplicate() {
        let s = Series::from_points("d", &[(0, 1.0), (5, 2.0), (5, 3.0), (9, 4.0)]);
        assert_eq!(active_index(&s.samples, 5), 2);
        assert_eq!(active_index(&s.samples, 7), 2);
    }

    #[test]
    fn resolve_empty_series_is_an_error() {
        let empty = Series::from_points("empty", &[]);
        let err = resolve_at(&empty, 0).unwrap_err();
        assert!(matches!(err, ChartError::EmptySeries { ref id } if id == "empty"));
    }

    #[test]
    fn single_sample_always_resolves_to_it() {
        let s = Series::from_points("one", &[(100, 42.0)]);
        for q in [-1_000, 99, 100, 101, 10_000] {
            assert_eq!(resolve_at(&s, q).unwrap().value, 42.0);
        }
    }

    #[test]
    fn interpolate_between_samples() {
        let a = series_a();
        let v = interpolate_at(&a, 5).unwrap();
        assert!(v.is_interpolated);
        assert!((v.value - 60.0).abs() < 1e-12);

        let v = interpolate_at(&a, 15).unwrap();
        assert!(v.is_interpolated);
        assert!((v.value - 67.5).abs() < 1e-12);
    }

    #[test]
    fn interpolate_on_sample_or_outside_range_is_step_value() {
        let a = series_a();
        for (t, expected) in [(-5, 50.0), (0, 50.0), (10, 70.0), (20, 65.0), (30, 65.0)] {
            let v = interpolate_at(&a, t).unwrap();
            assert!(!v.is_interpolated, "t={t}");
            assert_eq!(v.value, expected, "t={t}");
        }
    }

    #[test]
    fn bridge_points_skip_empty_series() {
        let list = vec![
            series_a(),
            Series::from_points("empty", &[]),
            Series::from_points("B", &[(0, 30.0), (15, 40.0)]),
        ];
        let points = bridge_points(&list, 12);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].series_id, "A");
        assert!((points[0].value - 69.0).abs() < 1e-12);
        assert_eq!(points[1].series_id, "B");
        assert!((points[1].value - 38.0).abs() < 1e-12);
    }

    #[test]
    fn interpolate_handles_extreme_timestamps() {
        let s = Series::from_points("wide", &[(i64::MIN, 10.0), (i64::MAX, 20.0)]);
        let v = interpolate_at(&s, 0).unwrap();
        assert!(v.is_interpolated);
        assert!((v.value - 15.0).abs() < 1e-9);

        assert_eq!(resolve_at(&s, 0).unwrap().value, 10.0);
        assert_eq!(bridge_points(&[s], i64::MAX)[0].value, 20.0);
    }

    #[test]
    fn resolver_does_not_mutate_input() {
        let a = series_a();
        let before = a.clone();
        let _ = resolve_at(&a, 15);
        let _ = interpolate_at(&a, 15);
        assert_eq!(a, before);
    }
}
