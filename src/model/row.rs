//! Transient row grouping — fragments sharing a baseline within tolerance
//! (§3, C3). Rows are built within a page boundary and destroyed after
//! merging; they are never serialized.

/// An ordered list of fragment indices sharing a baseline within
/// tolerance, plus the row's running baseline (mean of its members).
#[derive(Debug, Clone)]
pub struct Row {
    /// Indices into the page's fragment arena, in left-to-right order as
    /// they were appended during the sweep.
    pub fragment_indices: Vec<usize>,
    /// Mean baseline of the fragments currently in the row.
    pub baseline: f32,
}

impl Row {
    /// Start a new row from a single fragment.
    pub fn new(first_fragment_idx: usize, baseline: f32) -> Self {
        Self {
            fragment_indices: vec![first_fragment_idx],
            baseline,
        }
    }

    /// Append a fragment and update the running mean baseline.
    pub fn push(&mut self, fragment_idx: usize, fragment_baseline: f32) {
        let n = self.fragment_indices.len() as f32;
        self.baseline = (self.baseline * n + fragment_baseline) / (n + 1.0);
        self.fragment_indices.push(fragment_idx);
    }
}
