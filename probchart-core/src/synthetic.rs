//! Synthetic probability histories for demos, the TUI fallback and benches.
//!
//! Each market is a bounded random walk. The generator is seeded, so the same
//! parameters always produce the same series.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Sample, Series};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticParams {
    pub markets: usize,
    pub points: usize,
    pub seed: u64,
    /// Timestamp of the first sample.
    pub start: i64,
    /// Distance between consecutive samples.
    pub step: i64,
    /// Largest single move, in percentage points.
    pub max_move: f64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            markets: 3,
            points: 240,
            seed: 42,
            // 2024-01-01T00:00:00Z
            start: 1_704_067_200,
            step: 3_600,
            max_move: 3.0,
        }
    }
}

/// Generate `params.markets` series of `params.points` samples each.
///
/// Every other market after the first opens a quarter of the way in, with a
/// matching start boundary, so multi-market charts have a late starter.
pub fn generate(params: &SyntheticParams) -> Vec<Series> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    (0..params.markets)
        .map(|m| {
            let late = m % 2 == 1;
            let offset = if late { params.points / 4 } else { 0 };
            let start = params.start + params.step * offset as i64;
            let mut value: f64 = rng.gen_range(20.0..80.0);

            let samples = (0..params.points - offset.min(params.points))
                .map(|i| {
                    let delta: f64 = rng.gen_range(-params.max_move..=params.max_move);
                    value = (value + delta).clamp(1.0, 99.0);
                    Sample::new(start + params.step * i as i64, round2(value))
                })
                .collect();

            Series::new(
                format!("market-{}", m + 1),
                format!("Outcome {}", m + 1),
                samples,
                late.then_some(start),
            )
        })
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
