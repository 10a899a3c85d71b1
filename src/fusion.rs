//! Fusion engine (C10): merges the text side (paragraphs from C7) and the
//! media side (C8/C9) for one document into a single reading-ordered
//! stream per page (§4.10).
//!
//! Coordinate spaces are reconciled exactly once, at this boundary: every
//! media/table rect is transformed from PDF-space to HTML-space here and
//! never carried across it in PDF-space again (§9 design note — "this
//! eliminates an entire bug class"). Reading order is always assigned as
//! a fractional `f64`; see `assign_reading_order` below for why integers
//! are insufficient once media/tables must be interleaved.

use crate::geometry::{overlap_ratio_of, Rect};
use crate::model::{Element, Page};

/// Factor applied to PDF-space page dimensions to stand in for HTML-space
/// dimensions on an image-only page where the text side never ran (§4.10
/// step 1, also the donor's PyMuPDF-to-HTML convention of 1.5x).
pub const IMAGE_ONLY_SCALE_STANDIN: f32 = 1.5;

/// Configuration for the fusion engine (§6).
#[derive(Debug, Clone, Copy)]
pub struct FusionConfig {
    /// Fraction of a text fragment's area that must be covered by a
    /// media/table rect (in HTML-space) for the fragment to be treated as
    /// duplicate text rendered inside that image/table and dropped
    /// (default 0.8 — comfortably above "glancing overlap" but below
    /// "fully contained", since §4.10 step 3 allows either full
    /// containment or "> configurable overlap fraction").
    pub duplicate_overlap_threshold: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            duplicate_overlap_threshold: 0.8,
        }
    }
}

/// Ensure image-only pages have HTML-space dimensions to fall back on
/// (§4.10 step 1: "pages with only media must not be dropped").
fn ensure_html_dimensions(page: &mut Page) {
    if page.html_width <= 0.0 || page.html_height <= 0.0 {
        if page.pdf_width > 0.0 && page.pdf_height > 0.0 {
            page.html_width = page.pdf_width * IMAGE_ONLY_SCALE_STANDIN;
            page.html_height = page.pdf_height * IMAGE_ONLY_SCALE_STANDIN;
        }
    }
}

/// Transform every media/table rect from PDF-space to HTML-space in
/// place (§4.10 step 2).
fn transform_media_and_tables(page: &mut Page) {
    let sx = page.sx();
    let sy = page.sy();
    for media in &mut page.media {
        media.rect = media.rect.transform(sx, sy);
    }
    for table in &mut page.tables {
        table.rect = table.rect.transform(sx, sy);
    }
}

fn is_duplicate_text(rect: &Rect, page: &Page, cfg: &FusionConfig) -> bool {
    page.media.iter().any(|m| overlap_ratio_of(rect, &m.rect) > cfg.duplicate_overlap_threshold)
        || page.tables.iter().any(|t| overlap_ratio_of(rect, &t.rect) > cfg.duplicate_overlap_threshold)
}

/// Drop text fragments duplicated by an overlapping media/table element
/// (§4.10 step 3). Comparison happens in HTML-space, after the transform
/// above. Paragraphs left empty by the filter are removed.
fn filter_duplicate_text(page: &mut Page, cfg: &FusionConfig) {
    for paragraph in &mut page.paragraphs {
        paragraph.fragments.retain(|f| !is_duplicate_text(&f.rect, page, cfg));
    }
    page.paragraphs.retain(|p| !p.fragments.is_empty());
}

enum Kind {
    Media,
    Table,
}

/// Assign fractional reading order across a page's paragraphs, media, and
/// tables (§4.10 step 4). Paragraphs (the text side) get sequential
/// integers in top-sort order; each media/table element is then slotted
/// at the midpoint between its immediate text neighbors' orders, so the
/// value always lands strictly between them — this is why reading order
/// cannot be an integer: two adjacent text blocks with an image between
/// them would otherwise have no value to give it.
fn assign_reading_order(page: &mut Page) {
    let mut para_order: Vec<usize> = (0..page.paragraphs.len()).collect();
    para_order.sort_by(|&a, &b| {
        let ta = page.paragraphs[a].fragments.first().map(|f| f.rect.top()).unwrap_or(0.0);
        let tb = page.paragraphs[b].fragments.first().map(|f| f.rect.top()).unwrap_or(0.0);
        ta.partial_cmp(&tb).unwrap_or(std::cmp::Ordering::Equal)
    });

    // (top, assigned reading_order), kept sorted by top as we interleave.
    let mut text_track: Vec<(f32, f64)> = Vec::with_capacity(para_order.len());
    for (rank, &idx) in para_order.iter().enumerate() {
        let order = (rank + 1) as f64;
        page.paragraphs[idx].reading_order = Some(order);
        let top = page.paragraphs[idx].fragments.first().map(|f| f.rect.top()).unwrap_or(0.0);
        text_track.push((top, order));
    }

    let mut media_table: Vec<(Kind, usize, f32)> = Vec::new();
    for (i, m) in page.media.iter().enumerate() {
        media_table.push((Kind::Media, i, m.rect.top()));
    }
    for (i, t) in page.tables.iter().enumerate() {
        media_table.push((Kind::Table, i, t.rect.top()));
    }
    media_table.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

    if text_track.is_empty() {
        // Media-only page: no text order to interleave against, so just
        // number sequentially in top-sort order.
        for (rank, (kind, idx, _)) in media_table.into_iter().enumerate() {
            let order = (rank + 1) as f64;
            match kind {
                Kind::Media => page.media[idx].reading_order = Some(order),
                Kind::Table => page.tables[idx].reading_order = Some(order),
            }
        }
        return;
    }

    for (kind, idx, top) in media_table {
        let pos = text_track.partition_point(|&(t, _)| t < top);
        let before = if pos > 0 { Some(text_track[pos - 1].1) } else { None };
        let after = if pos < text_track.len() { Some(text_track[pos].1) } else { None };
        let order = match (before, after) {
            (Some(b), Some(a)) => (b + a) / 2.0,
            (Some(b), None) => b + 0.5,
            (None, Some(a)) => a - 0.5,
            (None, None) => 1.0,
        };
        match kind {
            Kind::Media => page.media[idx].reading_order = Some(order),
            Kind::Table => page.tables[idx].reading_order = Some(order),
        }
        let insert_at = text_track.partition_point(|&(t, _)| t < top);
        text_track.insert(insert_at, (top, order));
    }
}

/// Rebuild the page's tagged `Element` stream from its paragraphs, media
/// and tables, sorted by the reading order `assign_reading_order` just
/// computed (§9 design note: dynamic dispatch over element kinds goes
/// through this tagged variant, never ad-hoc attribute presence).
fn build_element_stream(page: &mut Page) {
    let mut elements: Vec<Element> = Vec::with_capacity(page.paragraphs.len() + page.media.len() + page.tables.len());
    elements.extend(page.paragraphs.iter().cloned().map(Element::Text));
    elements.extend(page.media.iter().cloned().map(Element::Media));
    elements.extend(page.tables.iter().cloned().map(Element::Table));
    elements.sort_by(|a, b| {
        a.reading_order()
            .partial_cmp(&b.reading_order())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    page.elements = elements;
}

/// Fuse one page: dimension fallback, coordinate transform, duplicate-text
/// filtering, reading-order interleave, and element-stream assembly, in
/// that order (§4.10).
pub fn fuse_page(page: &mut Page, cfg: &FusionConfig) {
    ensure_html_dimensions(page);
    transform_media_and_tables(page);
    filter_duplicate_text(page, cfg);
    assign_reading_order(page);
    build_element_stream(page);
}

/// Fuse every page in a document. Pages are independent at this stage
/// (the cross-page paragraph merge in C7 already ran beforehand), so this
/// is the natural page-level parallel fan-out point described in §5 —
/// callers doing so must still emit in ascending page-number order
/// afterward, which `fuse_page` itself does not reorder.
pub fn fuse_document(pages: &mut [Page], cfg: &FusionConfig) {
    for page in pages.iter_mut() {
        fuse_page(page, cfg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{FragmentChild, MediaElement, MediaKind, Paragraph};

    fn paragraph_at(page: u32, top: f32) -> Paragraph {
        let child = FragmentChild {
            text: "text".to_string(),
            rect: Rect::new(10.0, top, 100.0, 12.0),
            font_size: 12.0,
            font_id: 1,
            script_type: None,
        };
        let merged = crate::model::MergedFragment::from_children(1, vec![child]);
        Paragraph::new(page, 1, 1, merged)
    }

    #[test]
    fn test_s3_image_only_page_gets_standin_dimensions() {
        let mut page = Page::new(1, 0.0, 0.0, 595.0, 842.0);
        page.media.push(MediaElement::new(1, MediaKind::Raster, "page1_img1.png", Rect::new(65.86, 185.67, 10.0, 10.0), 1));
        fuse_page(&mut page, &FusionConfig::default());
        assert!((page.html_width - 892.5).abs() < 1.0);
        assert!((page.html_height - 1263.0).abs() < 1.0);
        assert!(page.paragraphs.is_empty());
        assert_eq!(page.media.len(), 1);
        // media rect transformed by the stand-in 1.5x scale
        assert!((page.media[0].rect.left() - 98.79).abs() < 0.5);
    }

    #[test]
    fn test_reading_order_strictly_increasing_with_interleaved_media() {
        let mut page = Page::new(1, 600.0, 800.0, 600.0, 800.0);
        page.paragraphs.push(paragraph_at(1, 0.0));
        page.paragraphs.push(paragraph_at(1, 100.0));
        page.media.push(MediaElement::new(1, MediaKind::Raster, "page1_img1.png", Rect::new(0.0, 50.0, 100.0, 20.0), 1));
        fuse_page(&mut page, &FusionConfig::default());
        let o0 = page.paragraphs[0].reading_order.unwrap();
        let o1 = page.paragraphs[1].reading_order.unwrap();
        let om = page.media[0].reading_order.unwrap();
        assert!(o0 < om && om < o1);
    }

    #[test]
    fn test_duplicate_text_inside_media_rect_dropped() {
        let mut page = Page::new(1, 600.0, 800.0, 600.0, 800.0);
        page.paragraphs.push(paragraph_at(1, 50.0)); // rect (10,50,100,12)
        page.media.push(MediaElement::new(1, MediaKind::Raster, "page1_img1.png", Rect::new(0.0, 0.0, 200.0, 200.0), 1));
        fuse_page(&mut page, &FusionConfig::default());
        assert!(page.paragraphs.is_empty());
    }

    #[test]
    fn test_element_stream_matches_reading_order() {
        let mut page = Page::new(1, 600.0, 800.0, 600.0, 800.0);
        page.paragraphs.push(paragraph_at(1, 0.0));
        page.paragraphs.push(paragraph_at(1, 100.0));
        page.media.push(MediaElement::new(1, MediaKind::Raster, "page1_img1.png", Rect::new(0.0, 50.0, 100.0, 20.0), 1));
        fuse_page(&mut page, &FusionConfig::default());
        assert_eq!(page.elements.len(), 3);
        let orders: Vec<f64> = page.elements.iter().map(|e| e.reading_order().unwrap()).collect();
        assert!(orders.windows(2).all(|w| w[0] < w[1]));
        assert!(matches!(page.elements[0], Element::Text(_)));
        assert!(matches!(page.elements[1], Element::Media(_)));
        assert!(matches!(page.elements[2], Element::Text(_)));
    }

    #[test]
    fn test_media_only_page_sequential_order() {
        let mut page = Page::new(1, 600.0, 800.0, 600.0, 800.0);
        page.media.push(MediaElement::new(1, MediaKind::Raster, "page1_img1.png", Rect::new(0.0, 100.0, 50.0, 50.0), 1));
        page.media.push(MediaElement::new(2, MediaKind::Raster, "page1_img2.png", Rect::new(0.0, 10.0, 50.0, 50.0), 1));
        fuse_page(&mut page, &FusionConfig::default());
        assert_eq!(page.media[1].reading_order, Some(1.0));
        assert_eq!(page.media[0].reading_order, Some(2.0));
    }
}
