//! Parser for the media/table extractor's XML (§6): per-page
//! `<page index width height>` with `<media id type file x1 y1 x2 y2 …/>`
//! and `<table id …><rows><row><cell col row><chunk>…</chunk></cell></row></rows></table>`,
//! all in PDF-space.
//!
//! Same `quick_xml::Reader` pull-event idiom as `input::text_xml`; tables
//! need one extra level of state (current row/cell) since `<table>` is
//! the one element in this feed with real nested structure, mirroring
//! the `entry`-inside-`row`-inside-`tbody` depth tracking
//! `kreuzberg`'s own DocBook table extractor uses for the same shape.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::media::extractor::{DrawingPrimitives, RasterCandidate, VectorCandidate};
use crate::media::table_extractor::TableCandidate;
use crate::model::Cell;

/// One parsed page from the media/table feed, before extraction filtering.
#[derive(Debug, Clone, Default)]
pub struct ParsedMediaPage {
    /// 1-based page number.
    pub number: u32,
    /// Page width, PDF-space.
    pub width: f32,
    /// Page height, PDF-space.
    pub height: f32,
    pub rasters: Vec<RasterCandidate>,
    pub vectors: Vec<VectorCandidate>,
    pub tables: Vec<TableCandidate>,
}

/// The full parsed media/table document: one entry per page.
#[derive(Debug, Clone, Default)]
pub struct ParsedMediaDocument {
    pub pages: Vec<ParsedMediaPage>,
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

fn attr_usize(tag: &BytesStart, key: &str) -> usize {
    attr_str(tag, key).and_then(|s| s.parse().ok()).unwrap_or(0)
}

fn rect_from_attrs(tag: &BytesStart) -> Option<Rect> {
    let x1 = attr_f32(tag, "x1")?;
    let y1 = attr_f32(tag, "y1")?;
    let x2 = attr_f32(tag, "x2")?;
    let y2 = attr_f32(tag, "y2")?;
    Some(Rect::from_points(x1, y1, x2, y2))
}

fn file_ext(file: &str) -> String {
    file.rsplit('.').next().unwrap_or("png").to_string()
}

struct TableBuilder {
    id: u32,
    rect: Rect,
    rows: Vec<Vec<Cell>>,
    current_row: usize,
    current_cell: Option<(usize, usize, String)>,
}

/// Parse a complete media/table XML document (§6).
pub fn parse_media_document(xml: &str) -> Result<ParsedMediaDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut doc = ParsedMediaDocument::default();
    let mut page_count: u32 = 0;
    let mut current_page: Option<ParsedMediaPage> = None;
    let mut table_builder: Option<TableBuilder> = None;
    let mut buffer = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"page" => {
                page_count += 1;
                let number = attr_u32(&e, "index").unwrap_or(page_count);
                let width = attr_f32(&e, "width").unwrap_or(0.0);
                let height = attr_f32(&e, "height").unwrap_or(0.0);
                current_page = Some(ParsedMediaPage { number, width, height, ..Default::default() });
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"media" => {
                let page = current_page.as_mut().ok_or_else(|| Error::InvalidInput("media outside page".to_string()))?;
                let id = attr_u32(&e, "id").unwrap_or(0);
                let kind = attr_str(&e, "type").unwrap_or_default();
                let rect = rect_from_attrs(&e).ok_or_else(|| Error::InvalidInput(format!("media {} missing geometry", id)))?;
                if kind == "vector" {
                    let primitives = DrawingPrimitives {
                        curves: attr_usize(&e, "curves"),
                        non_rectangular_lines: attr_usize(&e, "lines"),
                        quads: attr_usize(&e, "quads"),
                    };
                    page.vectors.push(VectorCandidate { id, rect, primitives });
                } else {
                    let file = attr_str(&e, "file").unwrap_or_else(|| format!("media{}.png", id));
                    let ext = file_ext(&file);
                    page.rasters.push(RasterCandidate { id, rect, ext });
                }
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"table" => {
                let id = attr_u32(&e, "id").unwrap_or(0);
                let rect = rect_from_attrs(&e).unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0));
                table_builder = Some(TableBuilder { id, rect, rows: Vec::new(), current_row: 0, current_cell: None });
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"row" => {
                if let Some(builder) = table_builder.as_mut() {
                    builder.rows.push(Vec::new());
                    builder.current_row = builder.rows.len() - 1;
                }
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"cell" => {
                if table_builder.is_some() {
                    let col = attr_usize(&e, "col");
                    let row = attr_usize(&e, "row");
                    table_builder.as_mut().unwrap().current_cell = Some((row, col, String::new()));
                }
            }
            Ok(Event::Text(e)) => {
                if table_builder.as_ref().map(|b| b.current_cell.is_some()).unwrap_or(false) {
                    buffer.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"chunk" => {
                if let Some(builder) = table_builder.as_mut() {
                    if let Some((_, _, text)) = builder.current_cell.as_mut() {
                        text.push_str(&buffer);
                    }
                }
                buffer.clear();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"cell" => {
                if let Some(builder) = table_builder.as_mut() {
                    if let Some((row, col, text)) = builder.current_cell.take() {
                        let row_idx = builder.current_row;
                        builder.rows[row_idx].push(Cell { col, row, text });
                    }
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"table" => {
                if let (Some(builder), Some(page)) = (table_builder.take(), current_page.as_mut()) {
                    page.tables.push(TableCandidate { id: builder.id, rect: builder.rect, rows: builder.rows });
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"page" => {
                if let Some(page) = current_page.take() {
                    doc.pages.push(page);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::InvalidInput(format!("media XML parse error: {}", e))),
            _ => {}
        }
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_raster_and_vector_media() {
        let xml = r#"<document>
<page index="1" width="595" height="842">
<media id="1" type="raster" file="page1_img1.png" x1="10" y1="10" x2="110" y2="110"/>
<media id="2" type="vector" x1="20" y1="20" x2="80" y2="80" curves="1" lines="0" quads="0"/>
</page>
</document>"#;
        let doc = parse_media_document(xml).unwrap();
        let page = &doc.pages[0];
        assert_eq!(page.rasters.len(), 1);
        assert_eq!(page.rasters[0].ext, "png");
        assert_eq!(page.vectors.len(), 1);
        assert!(page.vectors[0].primitives.is_complex_shape());
    }

    #[test]
    fn test_parses_table_with_cells_and_chunks() {
        let xml = r#"<document>
<page index="1" width="595" height="842">
<table id="1" x1="50" y1="50" x2="250" y2="150">
<rows>
<row>
<cell col="0" row="0"><chunk>Name</chunk></cell>
<cell col="1" row="0"><chunk>Score</chunk></cell>
</row>
<row>
<cell col="0" row="1"><chunk>Alice</chunk></cell>
<cell col="1" row="1"><chunk>9</chunk><chunk>0</chunk></cell>
</row>
</rows>
</table>
</page>
</document>"#;
        let doc = parse_media_document(xml).unwrap();
        let table = &doc.pages[0].tables[0];
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0].text, "Name");
        assert_eq!(table.rows[1][1].text, "90");
    }

    #[test]
    fn test_page_index_used_as_page_number() {
        let xml = r#"<document><page index="3" width="10" height="10"></page></document>"#;
        let doc = parse_media_document(xml).unwrap();
        assert_eq!(doc.pages[0].number, 3);
    }
}
