//! Row/line grouper (C3): a single O(n) sequential sweep over fragments
//! sorted by `(baseline, left)`. A prior O(n²) implementation caused
//! unbounded stalls on dense pages and is forbidden — this sweep never
//! compares a fragment against more than the current row's running
//! baseline (§4.3).

use crate::model::{Fragment, Row};

/// Minimum baseline tolerance in px, per §4.3/§6 (`baseline_tolerance`
/// config default is "auto", floored at this value).
pub const MIN_BASELINE_TOLERANCE: f32 = 2.0;

/// Fraction of median glyph height added to the floor tolerance.
pub const BASELINE_TOLERANCE_HEIGHT_FRACTION: f32 = 0.15;

/// Compute `tol = max(2.0, 0.15 * median_height)` for a set of fragments.
pub fn baseline_tolerance(fragments: &[Fragment]) -> f32 {
    if fragments.is_empty() {
        return MIN_BASELINE_TOLERANCE;
    }
    let mut heights: Vec<f32> = fragments.iter().map(|f| f.height).collect();
    heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = heights[heights.len() / 2];
    (BASELINE_TOLERANCE_HEIGHT_FRACTION * median).max(MIN_BASELINE_TOLERANCE)
}

/// Group fragment indices into rows.
///
/// `fragments` must already be sorted by `(baseline, left)`; the caller
/// (the page-processing stage) owns that sort since it also needs the
/// sorted order for script detection (§4.4, which runs before this).
///
/// Runs in O(n): a single forward sweep comparing each fragment only to
/// the current row's running mean baseline, never to prior fragments
/// individually.
pub fn group_rows(fragments: &[Fragment], order: &[usize]) -> Vec<Row> {
    let tol = baseline_tolerance(fragments);
    let mut rows: Vec<Row> = Vec::new();

    for &idx in order {
        let baseline = fragments[idx].baseline();
        match rows.last_mut() {
            Some(row) if (baseline - row.baseline).abs() <= tol => {
                row.push(idx, baseline);
            }
            _ => {
                rows.push(Row::new(idx, baseline));
            }
        }
    }

    rows
}

/// Sort fragment indices by `(baseline, left)`, the order the sweep and
/// the column/block assigner both require.
pub fn sort_order_by_baseline_left(fragments: &[Fragment]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fragments.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = &fragments[a];
        let fb = &fragments[b];
        fa.baseline()
            .partial_cmp(&fb.baseline())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(fa.left.partial_cmp(&fb.left).unwrap_or(std::cmp::Ordering::Equal))
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, top: f32, height: f32, left: f32) -> Fragment {
        Fragment::new(text, 0, left, top, 10.0, height, 1)
    }

    #[test]
    fn test_single_row_within_tolerance() {
        let fragments = vec![frag("a", 100.0, 12.0, 0.0), frag("b", 101.0, 12.0, 20.0)];
        let order = sort_order_by_baseline_left(&fragments);
        let rows = group_rows(&fragments, &order);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fragment_indices, vec![0, 1]);
    }

    #[test]
    fn test_new_row_started_when_baseline_diverges() {
        let fragments = vec![frag("a", 100.0, 12.0, 0.0), frag("b", 140.0, 12.0, 0.0)];
        let order = sort_order_by_baseline_left(&fragments);
        let rows = group_rows(&fragments, &order);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_large_dense_page_is_linear_not_quadratic_in_comparisons() {
        // Not a timing test (nondeterministic); verifies behavior matches a
        // single-pass sweep: n fragments all on the same row still produce
        // exactly one row regardless of n.
        let mut fragments = Vec::new();
        for i in 0..2000 {
            fragments.push(frag("x", 100.0, 12.0, i as f32 * 5.0));
        }
        let order = sort_order_by_baseline_left(&fragments);
        let rows = group_rows(&fragments, &order);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fragment_indices.len(), 2000);
    }

    #[test]
    fn test_running_baseline_is_mean_of_row() {
        let fragments = vec![
            frag("a", 100.0, 12.0, 0.0),
            frag("b", 101.0, 12.0, 20.0),
            frag("c", 102.0, 12.0, 40.0),
        ];
        let order = sort_order_by_baseline_left(&fragments);
        let rows = group_rows(&fragments, &order);
        assert_eq!(rows.len(), 1);
        // baselines: 112, 113, 114 -> mean after all three = 113.0
        assert!((rows[0].baseline - 113.0).abs() < 1e-4);
    }
}
