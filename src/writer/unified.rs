//! Unified document writer (C11): emits one logical document — a page
//! list, each page carrying `<texts>`/`<media>`/`<tables>`, plus a
//! document-level `<fonts>` table. All coordinates are HTML-space;
//! `reading_order` is always emitted as a fractional real (§4.11, §6).
//!
//! Built with hand-rolled string concatenation and a shared `escape_xml`
//! helper, the same idiom `pdf_oxide::writer::xmp_metadata` and
//! `pdf_oxide::fdf::xfdf_writer` use for their generated XML, rather than
//! `quick_xml::Writer`'s event-based builder.

use crate::model::{FontTable, MergedFragment, Page};

/// Per-document counters the writer reports alongside the XML itself, so
/// none of §7's transparency requirements can be satisfied by logging
/// alone (the counts are structured data, not just `log::info!` lines).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnifiedWriteReport {
    /// Pages emitted.
    pub pages: usize,
    /// Paragraphs emitted across all pages.
    pub paragraphs: usize,
    /// Media elements emitted across all pages.
    pub media: usize,
    /// Tables emitted across all pages.
    pub tables: usize,
    /// Coordinate normalizations applied while transforming media/table
    /// rects into HTML-space upstream (threaded through from the fusion
    /// stage's own count, since the writer itself performs no transforms).
    pub coordinate_normalizations: usize,
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn write_fonts(xml: &mut String, font_table: &FontTable) {
    xml.push_str("  <fonts>\n");
    for entry in font_table.iter() {
        xml.push_str(&format!(
            "    <font id=\"{}\" size=\"{}\" family=\"{}\" bold=\"{}\" italic=\"{}\"/>\n",
            entry.id,
            entry.size,
            escape_xml(&entry.family),
            entry.is_bold(),
            entry.is_italic(),
        ));
    }
    xml.push_str("  </fonts>\n");
}

fn write_merged_fragment(xml: &mut String, indent: &str, row_index: usize, font_table: &FontTable, merged: &MergedFragment) {
    let entry = font_table.get(merged.font_id);
    let family = entry.map(|e| e.family.as_str()).unwrap_or("");
    let size = entry.map(|e| e.size).unwrap_or(0.0);
    xml.push_str(&format!(
        "{indent}<text row_index=\"{row}\" baseline=\"{baseline}\" left=\"{left}\" top=\"{top}\" width=\"{width}\" height=\"{height}\" font=\"{font}\" size=\"{size}\" color=\"#000000\">{text}",
        indent = indent,
        row = row_index,
        baseline = merged.rect.bottom(),
        left = merged.rect.left(),
        top = merged.rect.top(),
        width = merged.rect.width,
        height = merged.rect.height,
        font = escape_xml(family),
        size = size,
        text = escape_xml(&merged.text),
    ));
    if merged.children.len() > 1 {
        xml.push_str(&format!("\n{}  <fragments>\n", indent));
        for child in &merged.children {
            xml.push_str(&format!(
                "{indent}    <fragment size=\"{size}\" left=\"{left}\" top=\"{top}\" width=\"{width}\" height=\"{height}\">{text}</fragment>\n",
                indent = indent,
                size = child.font_size,
                left = child.rect.left(),
                top = child.rect.top(),
                width = child.rect.width,
                height = child.rect.height,
                text = escape_xml(&child.text),
            ));
        }
        xml.push_str(&format!("{}  </fragments>\n{}", indent, indent));
    }
    xml.push_str("</text>\n");
}

fn write_page(xml: &mut String, page: &Page, font_table: &FontTable, report: &mut UnifiedWriteReport) {
    xml.push_str(&format!(
        "  <page number=\"{}\" width=\"{}\" height=\"{}\">\n",
        page.number, page.html_width, page.html_height
    ));

    xml.push_str("    <texts>\n");
    for paragraph in &page.paragraphs {
        xml.push_str(&format!(
            "      <para col_id=\"{}\" reading_block=\"{}\" reading_order=\"{}\">\n",
            paragraph.col_id,
            paragraph.reading_block,
            paragraph.reading_order.unwrap_or(0.0),
        ));
        for (row_index, merged) in paragraph.fragments.iter().enumerate() {
            write_merged_fragment(xml, "        ", row_index, font_table, merged);
        }
        xml.push_str("      </para>\n");
        report.paragraphs += 1;
    }
    xml.push_str("    </texts>\n");

    xml.push_str("    <media>\n");
    for media in &page.media {
        xml.push_str(&format!(
            "      <media reading_order=\"{}\" file=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" full_page_decorative=\"{}\"/>\n",
            media.reading_order.unwrap_or(0.0),
            escape_xml(&media.file_ref),
            media.rect.left(),
            media.rect.top(),
            media.rect.right(),
            media.rect.bottom(),
            media.is_full_page_decorative,
        ));
        report.media += 1;
    }
    xml.push_str("    </media>\n");

    xml.push_str("    <tables>\n");
    for table in &page.tables {
        let caption_attr = table
            .caption
            .as_ref()
            .map(|c| format!(" caption=\"{}\"", escape_xml(c)))
            .unwrap_or_default();
        xml.push_str(&format!(
            "      <table reading_order=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{}>\n",
            table.reading_order.unwrap_or(0.0),
            table.rect.left(),
            table.rect.top(),
            table.rect.right(),
            table.rect.bottom(),
            caption_attr,
        ));
        for row in &table.rows {
            xml.push_str("        <row>\n");
            for cell in row {
                xml.push_str(&format!(
                    "          <cell col=\"{}\" row=\"{}\">{}</cell>\n",
                    cell.col,
                    cell.row,
                    escape_xml(&cell.text)
                ));
            }
            xml.push_str("        </row>\n");
        }
        xml.push_str("      </table>\n");
        report.tables += 1;
    }
    xml.push_str("    </tables>\n");

    xml.push_str("  </page>\n");
    report.pages += 1;
}

/// Emit the unified document for a fused set of pages (§4.11, §6).
pub fn write_unified_document(pages: &[Page], font_table: &FontTable, coordinate_normalizations: usize) -> (String, UnifiedWriteReport) {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<document>\n");
    write_fonts(&mut xml, font_table);

    let mut report = UnifiedWriteReport::default();
    for page in pages {
        write_page(&mut xml, page, font_table, &mut report);
    }
    report.coordinate_normalizations = coordinate_normalizations;

    xml.push_str("</document>\n");
    (xml, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{FontEntry, FragmentChild, MediaElement, MediaKind, Paragraph, StyleFlags};

    #[test]
    fn test_writes_fonts_and_page_with_text() {
        let mut font_table = FontTable::new();
        font_table.insert(FontEntry::new(1, 12.0, "Times", StyleFlags::empty()));

        let mut page = Page::new(1, 600.0, 800.0, 595.0, 842.0);
        let child = FragmentChild {
            text: "Hello".to_string(),
            rect: Rect::new(10.0, 20.0, 50.0, 12.0),
            font_size: 12.0,
            font_id: 1,
            script_type: None,
        };
        let merged = crate::model::MergedFragment::from_children(1, vec![child]);
        let mut para = Paragraph::new(1, 1, 1, merged);
        para.reading_order = Some(1.0);
        page.paragraphs.push(para);

        let (xml, report) = write_unified_document(&[page], &font_table, 0);
        assert!(xml.contains("<font id=\"1\" size=\"12\" family=\"Times\""));
        assert!(xml.contains("Hello"));
        assert_eq!(report.pages, 1);
        assert_eq!(report.paragraphs, 1);
    }

    #[test]
    fn test_media_and_table_counts_reported() {
        let font_table = FontTable::new();
        let mut page = Page::new(1, 600.0, 800.0, 595.0, 842.0);
        let mut media = MediaElement::new(1, MediaKind::Raster, "page1_img1.png", Rect::new(0.0, 0.0, 10.0, 10.0), 1);
        media.reading_order = Some(1.5);
        page.media.push(media);
        let (xml, report) = write_unified_document(&[page], &font_table, 2);
        assert!(xml.contains("page1_img1.png"));
        assert_eq!(report.media, 1);
        assert_eq!(report.coordinate_normalizations, 2);
    }

    #[test]
    fn test_escape_xml_escapes_special_characters() {
        assert_eq!(escape_xml("<a & b>"), "&lt;a &amp; b&gt;");
    }
}
