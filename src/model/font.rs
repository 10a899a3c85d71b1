//! Font table: resolves a fragment's `font_id` into its effective size,
//! family, and style.
//!
//! A fragment's own `size`/`family` fields, if it carries any, are never
//! trusted directly — the effective values are always `fonts[font_id]`
//! (§4.2). This mirrors `pdf_oxide::layout::text_block::FontWeight`'s
//! approach of treating font metadata as a small resolved value type rather
//! than trusting ad hoc per-glyph fields.

use bitflags::bitflags;
use indexmap::IndexMap;

bitflags! {
    /// Style flags for a font entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StyleFlags: u8 {
        /// Bold weight.
        const BOLD = 0b0000_0001;
        /// Italic/oblique slant.
        const ITALIC = 0b0000_0010;
    }
}

/// A resolved font table entry: `{id, size, family, style_flags}` (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct FontEntry {
    /// Font id as referenced by fragments.
    pub id: u32,
    /// Point size.
    pub size: f32,
    /// Font family name, e.g. "Times New Roman".
    pub family: String,
    /// Bold/italic style flags.
    pub style_flags: StyleFlags,
}

impl FontEntry {
    /// Create a new font entry.
    pub fn new(id: u32, size: f32, family: impl Into<String>, style_flags: StyleFlags) -> Self {
        Self {
            id,
            size,
            family: family.into(),
            style_flags,
        }
    }

    /// Whether this entry is bold.
    pub fn is_bold(&self) -> bool {
        self.style_flags.contains(StyleFlags::BOLD)
    }

    /// Whether this entry is italic.
    pub fn is_italic(&self) -> bool {
        self.style_flags.contains(StyleFlags::ITALIC)
    }
}

/// Document-level font table. Insertion order is preserved (`IndexMap`) so
/// `<fonts>` is emitted deterministically in the unified document (C11).
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    entries: IndexMap<u32, FontEntry>,
}

impl FontTable {
    /// Create an empty font table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a font entry.
    pub fn insert(&mut self, entry: FontEntry) {
        self.entries.insert(entry.id, entry);
    }

    /// Resolve a `font_id` to its entry.
    pub fn get(&self, font_id: u32) -> Option<&FontEntry> {
        self.entries.get(&font_id)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FontEntry> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_resolves_size_and_family() {
        let mut table = FontTable::new();
        table.insert(FontEntry::new(1, 12.0, "Times New Roman", StyleFlags::empty()));
        let entry = table.get(1).unwrap();
        assert_eq!(entry.size, 12.0);
        assert_eq!(entry.family, "Times New Roman");
        assert!(!entry.is_bold());
    }

    #[test]
    fn test_missing_font_id_returns_none() {
        let table = FontTable::new();
        assert!(table.get(42).is_none());
    }

    #[test]
    fn test_style_flags() {
        let entry = FontEntry::new(1, 10.0, "Arial", StyleFlags::BOLD | StyleFlags::ITALIC);
        assert!(entry.is_bold());
        assert!(entry.is_italic());
    }
}
