//! The per-glyph `Fragment` — the leaf unit produced by the text-layout
//! extractor (§3).
//!
//! Fragments are immutable once ingested (§3 lifecycle); a fragment's
//! `page` never changes afterward (invariant 4). Merging never mutates a
//! fragment — it produces a [`crate::model::merged::MergedFragment`] that
//! references the originals by index, the same "arena of immutable leaves,
//! built structures are integer indices into it" shape
//! `pdf_oxide`'s structure module uses for cyclic references (§9 design
//! note).

use crate::geometry::Rect;

/// Whether a fragment is a superscript or subscript relative to its parent
/// (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    /// Raised relative to the parent's top (`dtop ∈ [-3, 3]`).
    Super,
    /// Lowered relative to the parent's top (`dtop ∈ (3, 10]`).
    Sub,
}

/// A single glyph fragment from the text-layout extractor.
///
/// Coordinates are in HTML-space, top-left origin. `baseline` is always
/// `top + height`, never stored independently, to avoid the two drifting
/// out of sync.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Non-empty UTF-8 text content.
    pub text: String,
    /// Page number this fragment belongs to. Frozen after ingest.
    pub page: u32,
    /// Left edge, HTML-space.
    pub left: f32,
    /// Top edge, HTML-space.
    pub top: f32,
    /// Width, HTML-space.
    pub width: f32,
    /// Height, HTML-space.
    pub height: f32,
    /// Resolved via the font table — never read from an ad hoc field by
    /// callers (§4.2).
    pub font_id: u32,
    /// Set by the script detector (§4.4); `None` until then.
    pub script: Option<ScriptInfo>,
}

/// Script classification attached to a fragment by the script detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptInfo {
    /// Super or sub.
    pub script_type: ScriptType,
    /// Index of the parent fragment within the page's fragment arena.
    pub parent_idx: usize,
}

impl Fragment {
    /// Create a new fragment. `text` must be non-empty; this is enforced by
    /// the ingest path (`input::text_xml`), not by this constructor, so
    /// that callers building fixtures for tests can still use it directly.
    pub fn new(text: impl Into<String>, page: u32, left: f32, top: f32, width: f32, height: f32, font_id: u32) -> Self {
        Self {
            text: text.into(),
            page,
            left,
            top,
            width,
            height,
            font_id,
            script: None,
        }
    }

    /// The fragment's baseline: `top + height`.
    pub fn baseline(&self) -> f32 {
        self.top + self.height
    }

    /// The fragment's bounding rectangle in HTML-space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// Whether this fragment has been marked as a script by the detector.
    pub fn is_script(&self) -> bool {
        self.script.is_some()
    }

    /// Mark this fragment as a script of the given type with the given
    /// parent index.
    pub fn mark_script(&mut self, script_type: ScriptType, parent_idx: usize) {
        self.script = Some(ScriptInfo {
            script_type,
            parent_idx,
        });
    }
}
