//! Tooltip label placement.
//!
//! Each visible series gets a label next to the hover cursor at the height of
//! its value. Lines that sit close together would stack their labels on top
//! of each other, so labels are spread apart vertically.

/// Spread label positions so neighbours are at least `min_gap` apart.
///
/// `anchors` are the desired positions (same axis as `bounds`, smaller is
/// higher on screen). The result keeps input order. When every label fits
/// inside `bounds`, every result lies inside `bounds`; when they cannot fit,
/// the stack starts at `bounds.0` and overflows past `bounds.1`.
pub fn layout_labels(anchors: &[f64], min_gap: f64, bounds: (f64, f64)) -> Vec<f64> {
    let n = anchors.len();
    if n == 0 {
        return Vec::new();
    }
    let (lo, hi) = bounds;
    let gap = min_gap.max(0.0);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| anchors[a].total_cmp(&anchors[b]));

    let mut pos: Vec<f64> = order.iter().map(|&i| anchors[i].clamp(lo, hi)).collect();

    for k in 1..n {
        pos[k] = pos[k].max(pos[k - 1] + gap);
    }
    pos[n - 1] = pos[n - 1].min(hi);
    for k in (0..n - 1).rev() {
        pos[k] = pos[k].min(pos[k + 1] - gap);
    }
    if pos[0] < lo {
        pos[0] = lo;
        for k in 1..n {
            pos[k] = pos[k].max(pos[k - 1] + gap);
        }
    }

    let mut out = vec![0.0; n];
    for (k, &i) in order.iter().enumerate() {
        out[i] = pos[k];
    }
    out
}
