//! Paragraphs — ordered groups of merged fragments sharing
//! `(col_id, reading_block)` within a page, with cross-page continuation
//! under strict rules (§3, §4.7).

use crate::model::merged::MergedFragment;

/// An ordered list of merged fragments forming one paragraph.
#[derive(Debug, Clone)]
pub struct Paragraph {
    /// Page this paragraph starts on.
    pub page: u32,
    /// Shared column id of every merged fragment in this paragraph.
    pub col_id: u32,
    /// Shared reading-order block of every merged fragment in this
    /// paragraph.
    pub reading_block: u32,
    /// The merged fragments, in reading order.
    pub fragments: Vec<MergedFragment>,
    /// Reading order assigned during fusion (C10); `None` until then.
    pub reading_order: Option<f64>,
}

impl Paragraph {
    /// Start a new paragraph from its first merged fragment.
    pub fn new(page: u32, col_id: u32, reading_block: u32, first: MergedFragment) -> Self {
        Self {
            page,
            col_id,
            reading_block,
            fragments: vec![first],
            reading_order: None,
        }
    }

    /// Concatenated plain text of every merged fragment, space-joined.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Absorb another paragraph's fragments (used by cross-page merge,
    /// §4.7). The absorbed paragraph's page/col_id/reading_block are
    /// discarded — this paragraph keeps its own starting identity.
    pub fn absorb(&mut self, other: Paragraph) {
        self.fragments.extend(other.fragments);
    }
}
