//! Column detector & reading-order block assigner (C6): buckets merged
//! fragments' `left` positions to find column starts (at most 4 columns),
//! assigns each fragment a `col_id`, then walks fragments in
//! `(baseline, left)` order to assign sequential reading-order blocks on
//! every `col_id` transition (§4.6).
//!
//! The old "group every `col_id = 0` fragment below the first column into
//! one block" shortcut is forbidden — it collapses an interleaved
//! title/col-1/figure/col-2/footnote sequence into fewer blocks than
//! actually occur in reading order, losing the figure's position. This
//! sweep counts a transition every time `col_id` changes from the
//! previous fragment, full stop.

use crate::model::MergedFragment;

/// Column assigned to full-width or cross-column content (§3 invariant 3).
pub const FULL_WIDTH_COL_ID: u32 = 0;

/// Configuration for column detection and block assignment (§6).
#[derive(Debug, Clone, Copy)]
pub struct ColumnDetectorConfig {
    /// Hard cap on detected column count (§3 invariant 3: `N <= 4`).
    pub max_columns: usize,
    /// Fraction of page width above which a fragment is treated as
    /// full-width regardless of column geometry (default 0.6).
    pub full_width_threshold: f32,
    /// Width of each histogram bucket in px when profiling `left`
    /// positions for column-start peaks.
    pub bucket_width: f32,
    /// Minimum fragment count in a bucket for it to be considered a
    /// column-start peak.
    pub min_bucket_support: usize,
}

impl Default for ColumnDetectorConfig {
    fn default() -> Self {
        Self {
            max_columns: 4,
            full_width_threshold: 0.6,
            bucket_width: 10.0,
            min_bucket_support: 2,
        }
    }
}

/// Bucket fragments' `left` edges and return column-start x-coordinates,
/// ascending, capped at `max_columns`.
fn detect_column_starts(fragments: &[MergedFragment], cfg: &ColumnDetectorConfig) -> Vec<f32> {
    if fragments.is_empty() {
        return Vec::new();
    }
    let min_left = fragments.iter().map(|f| f.rect.left()).fold(f32::INFINITY, f32::min);
    let max_left = fragments.iter().map(|f| f.rect.left()).fold(f32::NEG_INFINITY, f32::max);
    if !min_left.is_finite() || !max_left.is_finite() {
        return Vec::new();
    }
    let bucket_count = (((max_left - min_left) / cfg.bucket_width).ceil() as usize + 1).max(1);
    let mut histogram = vec![0usize; bucket_count];
    for f in fragments {
        let idx = (((f.rect.left() - min_left) / cfg.bucket_width).floor() as usize).min(bucket_count - 1);
        histogram[idx] += 1;
    }

    // A bucket is a peak if its count meets the support floor and is not
    // smaller than both neighbors (plateaus count once, at their first
    // bucket, to avoid splitting one column into several close starts).
    let mut peaks: Vec<(usize, f32)> = Vec::new();
    for i in 0..histogram.len() {
        if histogram[i] < cfg.min_bucket_support {
            continue;
        }
        let left_ok = i == 0 || histogram[i - 1] <= histogram[i];
        let right_ok = i + 1 >= histogram.len() || histogram[i + 1] <= histogram[i];
        if left_ok && right_ok {
            let x = min_left + i as f32 * cfg.bucket_width;
            if peaks.last().map(|&(_, px)| x - px > cfg.bucket_width).unwrap_or(true) {
                peaks.push((i, x));
            }
        }
    }

    peaks.sort_by(|a, b| histogram[b.0].cmp(&histogram[a.0]));
    peaks.truncate(cfg.max_columns);
    let mut starts: Vec<f32> = peaks.into_iter().map(|(_, x)| x).collect();
    starts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    starts
}

/// Assign `col_id` to every merged fragment on a page and return the
/// detected column-start x-coordinates (for diagnostics/tests).
pub fn assign_columns(fragments: &mut [MergedFragment], page_width: f32, cfg: &ColumnDetectorConfig) -> Vec<f32> {
    let starts = detect_column_starts(fragments, cfg);
    if starts.len() < 2 {
        // Single-column page (or nothing to bucket): everything is col 1,
        // unless wide enough to count as full-width.
        for f in fragments.iter_mut() {
            f.col_id = if f.rect.width > cfg.full_width_threshold * page_width {
                FULL_WIDTH_COL_ID
            } else {
                1
            };
        }
        return starts;
    }

    for f in fragments.iter_mut() {
        if f.rect.width > cfg.full_width_threshold * page_width {
            f.col_id = FULL_WIDTH_COL_ID;
            continue;
        }
        // Which column range does the fragment's left edge fall in, and
        // does its right edge escape that range (cross-column span)?
        let mut col_idx = starts.len() - 1;
        for (i, &start) in starts.iter().enumerate() {
            let range_end = starts.get(i + 1).copied().unwrap_or(f32::INFINITY);
            if f.rect.left() >= start && f.rect.left() < range_end {
                col_idx = i;
                break;
            }
        }
        let range_end = starts.get(col_idx + 1).copied().unwrap_or(f32::INFINITY);
        if f.rect.right() > range_end {
            f.col_id = FULL_WIDTH_COL_ID;
        } else {
            f.col_id = (col_idx + 1) as u32;
        }
    }

    starts
}

/// Assign sequential reading-order blocks. Fragments must already carry a
/// `col_id` (from [`assign_columns`]); this sorts by `(baseline, left)` and
/// increments the block counter on every `col_id` change, producing a gap-
/// free sequence `1, 2, 3, ..., K` (§4.6, S2).
pub fn assign_reading_blocks(fragments: &mut [MergedFragment]) {
    let mut order: Vec<usize> = (0..fragments.len()).collect();
    order.sort_by(|&a, &b| {
        let ba = fragments[a].rect.bottom();
        let bb = fragments[b].rect.bottom();
        ba.partial_cmp(&bb)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(fragments[a].rect.left().partial_cmp(&fragments[b].rect.left()).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut block: u32 = 0;
    let mut prev_col: Option<u32> = None;
    for &idx in &order {
        let col = fragments[idx].col_id;
        if prev_col != Some(col) {
            block += 1;
        }
        fragments[idx].reading_block = block;
        prev_col = Some(col);
    }
}
