//! Parser for the text-layout extractor's XML (§6): per-page
//! `<page width height>` containing per-glyph
//! `<text font left top width height>CHAR</text>` and a
//! `<fontspec id size family>` table, all in HTML-space.
//!
//! Built on `quick_xml::Reader`'s pull event loop, the same
//! `Reader::from_str` / `trim_text(true)` / match-over-`Event::*` idiom
//! `pdf_oxide::extractors::xmp` uses to parse XMP packets, with an
//! `element_stack`-free variant since this format never needs to look
//! more than one level up (a `<text>` or `<fontspec>` is always a direct
//! child of `<page>`).

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{FontEntry, FontTable, Fragment, StyleFlags};

/// One parsed page from the text-layout feed, before row grouping.
#[derive(Debug, Clone, Default)]
pub struct ParsedTextPage {
    /// 1-based page number.
    pub number: u32,
    /// Page width, HTML-space.
    pub width: f32,
    /// Page height, HTML-space.
    pub height: f32,
    /// Fragments in document order as encountered in the XML (not yet
    /// sorted by baseline; the row grouper's own sort does that).
    pub fragments: Vec<Fragment>,
}

/// The full parsed text-layout document: the shared font table plus one
/// entry per page.
#[derive(Debug, Clone, Default)]
pub struct ParsedTextDocument {
    pub font_table: FontTable,
    pub pages: Vec<ParsedTextPage>,
}

fn attr_str(tag: &BytesStart, key: &str) -> Option<String> {
    tag.attributes().flatten().find(|a| a.key.as_ref() == key.as_bytes()).and_then(|a| {
        std::str::from_utf8(&a.value).ok().map(|s| s.to_string())
    })
}

fn attr_f32(tag: &BytesStart, key: &str) -> Option<f32> {
    attr_str(tag, key).and_then(|s| s.parse().ok())
}

fn attr_u32(tag: &BytesStart, key: &str) -> Option<u32> {
    attr_str(tag, key).and_then(|s| s.parse().ok())
}

fn attr_bool(tag: &BytesStart, key: &str) -> bool {
    attr_str(tag, key).map(|s| s == "1" || s.eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Parse a complete text-layout XML document (§6).
pub fn parse_text_document(xml: &str) -> Result<ParsedTextDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut doc = ParsedTextDocument::default();
    let mut page_count: u32 = 0;

    let mut current_page: Option<ParsedTextPage> = None;
    let mut pending_text: Option<(u32, f32, f32, f32, f32)> = None; // font, left, top, width, height
    let mut buffer = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"fontspec" => {
                let id = attr_u32(&e, "id").ok_or_else(|| Error::InvalidInput("fontspec missing id".to_string()))?;
                let size = attr_f32(&e, "size").unwrap_or(0.0);
                let family = attr_str(&e, "family").unwrap_or_default();
                let mut flags = StyleFlags::empty();
                if attr_bool(&e, "bold") {
                    flags |= StyleFlags::BOLD;
                }
                if attr_bool(&e, "italic") {
                    flags |= StyleFlags::ITALIC;
                }
                doc.font_table.insert(FontEntry::new(id, size, family, flags));
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"page" => {
                page_count += 1;
                let number = attr_u32(&e, "number").unwrap_or(page_count);
                let width = attr_f32(&e, "width").unwrap_or(0.0);
                let height = attr_f32(&e, "height").unwrap_or(0.0);
                current_page = Some(ParsedTextPage { number, width, height, fragments: Vec::new() });
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                let font = attr_u32(&e, "font").unwrap_or(0);
                let left = attr_f32(&e, "left").unwrap_or(0.0);
                let top = attr_f32(&e, "top").unwrap_or(0.0);
                let width = attr_f32(&e, "width").unwrap_or(0.0);
                let height = attr_f32(&e, "height").unwrap_or(0.0);
                pending_text = Some((font, left, top, width, height));
                buffer.clear();
            }
            Ok(Event::Text(e)) => {
                if pending_text.is_some() {
                    buffer.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                if let (Some((font, left, top, width, height)), Some(page)) = (pending_text.take(), current_page.as_mut()) {
                    if !buffer.is_empty() {
                        page.fragments.push(Fragment::new(buffer.clone(), page.number, left, top, width, height, font));
                    }
                }
                buffer.clear();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"page" => {
                if let Some(page) = current_page.take() {
                    doc.pages.push(page);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::InvalidInput(format!("text XML parse error: {}", e))),
            _ => {}
        }
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_fontspec_and_fragments() {
        let xml = r#"<document>
<page number="1" width="612" height="792">
<fontspec id="0" size="12" family="Times"/>
<text font="0" left="10" top="20" width="50" height="14">Hello</text>
<text font="0" left="65" top="20" width="30" height="14">world</text>
</page>
</document>"#;
        let doc = parse_text_document(xml).unwrap();
        assert_eq!(doc.pages.len(), 1);
        let page = &doc.pages[0];
        assert_eq!(page.number, 1);
        assert_eq!(page.width, 612.0);
        assert_eq!(page.fragments.len(), 2);
        assert_eq!(page.fragments[0].text, "Hello");
        assert_eq!(page.fragments[0].font_id, 0);
        let font = doc.font_table.get(0).unwrap();
        assert_eq!(font.size, 12.0);
        assert_eq!(font.family, "Times");
    }

    #[test]
    fn test_page_number_defaults_to_sequential_order() {
        let xml = r#"<document>
<page width="100" height="100"></page>
<page width="100" height="100"></page>
</document>"#;
        let doc = parse_text_document(xml).unwrap();
        assert_eq!(doc.pages[0].number, 1);
        assert_eq!(doc.pages[1].number, 2);
    }

    #[test]
    fn test_escaped_entities_decoded() {
        let xml = r#"<document><page number="1" width="100" height="100">
<text font="0" left="0" top="0" width="10" height="10">A &amp; B</text>
</page></document>"#;
        let doc = parse_text_document(xml).unwrap();
        assert_eq!(doc.pages[0].fragments[0].text, "A & B");
    }
}
