//! Merged fragments — the result of row-internal and script cross-row
//! merging (C5). A merged fragment retains an ordered list of its source
//! fragments (full metadata, not just indices) so font/size/position
//! provenance survives merging (§3, §4.5).

use crate::geometry::Rect;
use crate::model::fragment::{Fragment, ScriptType};

/// A child of a merged fragment: a copy of a source fragment's text and
/// metadata, preserved for provenance after merging. Carries its own size
/// explicitly because a script child's resolved size differs from its
/// parent's (§4.5 fragment-tracking invariant).
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentChild {
    /// The source fragment's text.
    pub text: String,
    /// The source fragment's bounding rectangle, unchanged from ingest.
    pub rect: Rect,
    /// The source fragment's resolved font size.
    pub font_size: f32,
    /// The source fragment's `font_id`.
    pub font_id: u32,
    /// Set if the source fragment was a marked script.
    pub script_type: Option<ScriptType>,
}

impl FragmentChild {
    /// Build a child record from a source fragment and its resolved size.
    pub fn from_fragment(fragment: &Fragment, font_size: f32) -> Self {
        Self {
            text: fragment.text.clone(),
            rect: fragment.rect(),
            font_size,
            font_id: fragment.font_id,
            script_type: fragment.script.map(|s| s.script_type),
        }
    }
}

/// A row- or cross-row-merge result (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct MergedFragment {
    /// Concatenated display text, with script children rendered as
    /// `^text`/`_text` markers when a plain-text form is wanted (§4.5); the
    /// XML writer instead emits `<superscript>`/`<subscript>` children.
    pub text: String,
    /// Union rectangle of all children (invariant 1: always contains every
    /// child's rectangle).
    pub rect: Rect,
    /// Resolved font id shared by the row-internal merge (script children
    /// may differ; see `children`).
    pub font_id: u32,
    /// Column assignment from C6.
    pub col_id: u32,
    /// Reading-order block assignment from C6.
    pub reading_block: u32,
    /// Source fragments in original left-to-right order, preserving
    /// per-source metadata.
    pub children: Vec<FragmentChild>,
}

impl MergedFragment {
    /// Build a merged fragment from its children, computing the union
    /// rectangle and concatenated text. `col_id`/`reading_block` are filled
    /// in later by C6 (defaulted to 0 here).
    pub fn from_children(font_id: u32, children: Vec<FragmentChild>) -> Self {
        assert!(!children.is_empty(), "a merged fragment must have at least one child");
        let rect = children
            .iter()
            .map(|c| c.rect)
            .reduce(|a, b| a.union(&b))
            .expect("checked non-empty above");
        let text = children
            .iter()
            .map(|c| match c.script_type {
                Some(ScriptType::Super) => format!("^{}", c.text),
                Some(ScriptType::Sub) => format!("_{}", c.text),
                None => c.text.clone(),
            })
            .collect::<String>();
        Self {
            text,
            rect,
            font_id,
            col_id: 0,
            reading_block: 0,
            children,
        }
    }

    /// Verify invariant 1: the union of children's rectangles is contained
    /// in the merged fragment's own rectangle.
    pub fn contains_all_children(&self) -> bool {
        self.children.iter().all(|c| c.rect.is_within(&self.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn child(text: &str, rect: Rect, font_size: f32, script: Option<ScriptType>) -> FragmentChild {
        FragmentChild {
            text: text.to_string(),
            rect,
            font_size,
            font_id: 1,
            script_type: script,
        }
    }

    #[test]
    fn test_s1_script_merge_produces_one_text_with_three_children() {
        // S1: "...around 10" (top=191,h=18), "7" (top=192,h=11,w=5, superscript), "-Hz..." (top=191,h=18)
        let c1 = child("…around 10", Rect::new(0.0, 191.0, 80.0, 18.0), 12.0, None);
        let c2 = child("7", Rect::new(80.0, 192.0, 5.0, 11.0), 8.0, Some(ScriptType::Super));
        let c3 = child("-Hz…", Rect::new(85.0, 191.0, 60.0, 18.0), 12.0, None);
        let merged = MergedFragment::from_children(1, vec![c1, c2, c3]);
        assert_eq!(merged.text, "…around 10^7-Hz…");
        assert_eq!(merged.children.len(), 3);
        assert_eq!(merged.children[1].font_size, 8.0);
        assert!(merged.contains_all_children());
    }

    #[test]
    fn test_union_rect_covers_all_children() {
        let c1 = child("a", Rect::new(0.0, 0.0, 10.0, 10.0), 12.0, None);
        let c2 = child("b", Rect::new(20.0, 5.0, 10.0, 10.0), 12.0, None);
        let merged = MergedFragment::from_children(1, vec![c1, c2]);
        assert!(merged.contains_all_children());
        assert_eq!(merged.rect, Rect::from_points(0.0, 0.0, 30.0, 15.0));
    }
}
