//! Linear and time scales, dynamic value domain, tick generation.

use crate::domain::Series;

/// Lower and upper bound of a probability axis.
pub const PROBABILITY_BOUNDS: (f64, f64) = (0.0, 100.0);

/// Maps a continuous domain onto an output range (usually pixels or cells).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain value → range value. A zero-width domain maps everything to
    /// the middle of the range.
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) * (r1 - r0) / (d1 - d0)
    }

    /// Range value → domain value.
    pub fn invert(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (x - r0) * (d1 - d0) / (r1 - r0)
    }
}

/// Linear scale over integer timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (i64, i64), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((domain.0 as f64, domain.1 as f64), range),
        }
    }

    pub fn domain(&self) -> (i64, i64) {
        (self.inner.domain.0 as i64, self.inner.domain.1 as i64)
    }

    pub fn x_of(&self, t: i64) -> f64 {
        self.inner.apply(t as f64)
    }

    /// Query time under screen position `x`, rounded to the nearest timestamp.
    pub fn time_at(&self, x: f64) -> i64 {
        self.inner.invert(x).round() as i64
    }
}

/// Y-axis domain covering every sample, padded by `padding` percentage
/// points and clamped to `[0, 100]`.
///
/// No samples at all gives the full probability range. A flat input is
/// widened so the domain never collapses to a point.
pub fn value_domain(series_list: &[Series], padding: f64) -> (f64, f64) {
    let (lo_bound, hi_bound) = PROBABILITY_BOUNDS;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for sample in series_list.iter().flat_map(|s| s.samples.iter()) {
        min = min.min(sample.probability);
        max = max.max(sample.probability);
    }
    if !min.is_finite() || !max.is_finite() {
        return PROBABILITY_BOUNDS;
    }

    let padding = padding.max(0.0);
    let mut lo = (min - padding).max(lo_bound);
    let mut hi = (max + padding).min(hi_bound);
    if hi <= lo {
        lo = (min - 1.0).max(lo_bound);
        hi = (max + 1.0).min(hi_bound);
    }
    (lo, hi)
}

/// `count` evenly spaced ticks from `domain.0` to `domain.1`, both included.
pub fn ticks(domain: (f64, f64), count: usize) -> Vec<f64> {
    let count = count.max(2);
    let step = (domain.1 - domain.0) / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                domain.1
            } else {
                domain.0 + step * i as f64
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scale_maps_and_inverts() {
        let s = LinearScale::new((0.0, 100.0), (0.0, 50.0));
        assert_eq!(s.apply(50.0), 25.0);
        assert_eq!(s.invert(25.0), 50.0);
    }

    #[test]
    fn inverted_range_for_screen_y() {
        // Screen rows grow downward: 100% at the top row.
        let s = LinearScale::new((0.0, 100.0), (20.0, 0.0));
        assert_eq!(s.apply(100.0), 0.0);
        assert_eq!(s.apply(0.0), 20.0);
    }

    #[test]
    fn degenerate_domain_maps_to_middle() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(s.apply(5.0), 5.0);
        assert_eq!(s.apply(123.0), 5.0);
    }

    #[test]
    fn time_scale_round_trips_columns() {
        let ts = TimeScale::new((1_000, 2_000), (0.0, 100.0));
        assert_eq!(ts.x_of(1_500), 50.0);
        assert_eq!(ts.time_at(50.0), 1_500);
        assert_eq!(ts.time_at(0.4), 1_004);
        assert_eq!(ts.domain(), (1_000, 2_000));
    }

    #[test]
    fn value_domain_pads_and_clamps() {
        let list = vec![Series::from_points("a", &[(0, 2.0), (1, 60.0)])];
        assert_eq!(value_domain(&list, 5.0), (0.0, 65.0));

        let high = vec![Series::from_points("h", &[(0, 97.0), (1, 99.0)])];
        assert_eq!(value_domain(&high, 5.0), (92.0, 100.0));
    }

    #[test]
    fn value_domain_empty_is_full_range() {
        assert_eq!(value_domain(&[], 5.0), (0.0, 100.0));
    }

    #[test]
    fn value_domain_flat_series_is_widened() {
        let list = vec![Series::from_points("f", &[(0, 40.0), (1, 40.0)])];
        assert_eq!(value_domain(&list, 0.0), (39.0, 41.0));
    }

    #[test]
    fn ticks_include_both_ends() {
        assert_eq!(ticks((0.0, 100.0), 5), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(ticks((10.0, 20.0), 1), vec![10.0, 20.0]);
    }
}
