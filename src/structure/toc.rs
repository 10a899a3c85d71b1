//! Table-of-contents extraction (part of C12): locates a contiguous run of
//! pages dominated by the TOC font role and emits a flat entry list with
//! resolved font sizes (§4.12).

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

use crate::model::{FontTable, Page};
use crate::structure::font_roles::FontRole;

/// One resolved table-of-contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Page the entry was found on.
    pub page: u32,
    /// Entry text with the trailing page-number token stripped.
    pub text: String,
    /// Page number parsed from the entry's dot-leader tail, if present.
    pub target_page: Option<u32>,
    /// Resolved font size of the entry's dominant fragment.
    pub font_size: f32,
}

fn trailing_page_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.{2,}\s*(\d+)\s*$").unwrap())
}

fn dominant_font_id(paragraph: &crate::model::Paragraph) -> Option<u32> {
    paragraph.fragments.first().map(|f| f.font_id)
}

fn paragraph_is_toc(paragraph: &crate::model::Paragraph, roles: &IndexMap<u32, FontRole>) -> bool {
    dominant_font_id(paragraph)
        .and_then(|id| roles.get(&id))
        .map(|role| matches!(role, FontRole::TocMarker))
        .unwrap_or(false)
}

/// Fraction of a page's paragraphs carrying the TOC role.
fn toc_fraction(page: &Page, roles: &IndexMap<u32, FontRole>) -> f32 {
    if page.paragraphs.is_empty() {
        return 0.0;
    }
    let toc_count = page.paragraphs.iter().filter(|p| paragraph_is_toc(p, roles)).count();
    toc_count as f32 / page.paragraphs.len() as f32
}

/// Extract the TOC: find the (first) contiguous run of pages whose TOC
/// fraction exceeds 0.5, and emit one entry per TOC-role paragraph in that
/// run, in document order.
pub fn extract_toc(pages: &[Page], font_table: &FontTable, roles: &IndexMap<u32, FontRole>) -> Vec<TocEntry> {
    let mut run_start: Option<usize> = None;
    let mut run_end: Option<usize> = None;
    for (i, page) in pages.iter().enumerate() {
        if toc_fraction(page, roles) > 0.5 {
            if run_start.is_none() {
                run_start = Some(i);
            }
            run_end = Some(i);
        } else if run_start.is_some() {
            break;
        }
    }

    let (Some(start), Some(end)) = (run_start, run_end) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for page in &pages[start..=end] {
        for paragraph in &page.paragraphs {
            if !paragraph_is_toc(paragraph, roles) {
                continue;
            }
            let text = paragraph.text();
            let target_page = trailing_page_number()
                .captures(&text)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok());
            let stripped = trailing_page_number().replace(&text, "").trim().to_string();
            let font_size = dominant_font_id(paragraph).and_then(|id| font_table.get(id)).map(|e| e.size).unwrap_or(0.0);
            entries.push(TocEntry {
                page: page.number,
                text: stripped,
                target_page,
                font_size,
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{FontEntry, FragmentChild, MergedFragment, Paragraph, StyleFlags};

    fn toc_page(number: u32, font_id: u32, entries: &[&str]) -> Page {
        let mut page = Page::new(number, 600.0, 800.0, 595.0, 842.0);
        for text in entries {
            let child = FragmentChild {
                text: text.to_string(),
                rect: Rect::new(0.0, 0.0, 100.0, 10.0),
                font_size: 10.0,
                font_id,
                script_type: None,
            };
            let merged = MergedFragment::from_children(font_id, vec![child]);
            page.paragraphs.push(Paragraph::new(number, 1, 1, merged));
        }
        page
    }

    #[test]
    fn test_toc_run_detected_and_page_numbers_parsed() {
        let mut font_table = FontTable::new();
        font_table.insert(FontEntry::new(1, 10.0, "Times", StyleFlags::empty()));
        let mut roles: IndexMap<u32, FontRole> = IndexMap::new();
        roles.insert(1, FontRole::TocMarker);

        let page = toc_page(2, 1, &["Introduction ..... 5", "Chapter One ..... 12"]);
        let entries = extract_toc(&[page], &font_table, &roles);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Introduction");
        assert_eq!(entries[0].target_page, Some(5));
        assert_eq!(entries[1].target_page, Some(12));
    }

    #[test]
    fn test_non_toc_pages_yield_no_entries() {
        let mut font_table = FontTable::new();
        font_table.insert(FontEntry::new(1, 10.0, "Times", StyleFlags::empty()));
        let roles: IndexMap<u32, FontRole> = IndexMap::new();
        let page = toc_page(2, 1, &["Regular body text unrelated to a table of contents"]);
        let entries = extract_toc(&[page], &font_table, &roles);
        assert!(entries.is_empty());
    }
}
