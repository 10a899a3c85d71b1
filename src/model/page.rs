//! A page's fragment arena and the structures built on top of it (§3).

use crate::model::element::Element;
use crate::model::fragment::Fragment;
use crate::model::merged::MergedFragment;
use crate::model::media::MediaElement;
use crate::model::paragraph::Paragraph;
use crate::model::row::Row;
use crate::model::table::Table;

/// One page of the fused document.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    /// Page width in HTML-space.
    pub html_width: f32,
    /// Page height in HTML-space.
    pub html_height: f32,
    /// Page width in PDF-space.
    pub pdf_width: f32,
    /// Page height in PDF-space.
    pub pdf_height: f32,
    /// The immutable fragment arena for this page; other structures
    /// reference fragments by index into this vec.
    pub fragments: Vec<Fragment>,
    /// Rows built by C3 (transient; cleared after merging).
    pub rows: Vec<Row>,
    /// Merged fragments built by C5, column-assigned by C6.
    pub merged: Vec<MergedFragment>,
    /// Paragraphs assembled by C7.
    pub paragraphs: Vec<Paragraph>,
    /// Media elements placed on this page by C8.
    pub media: Vec<MediaElement>,
    /// Tables placed on this page by C9.
    pub tables: Vec<Table>,
    /// The fused, reading-ordered element stream (populated by C10).
    pub elements: Vec<Element>,
}

impl Page {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, html_width: f32, html_height: f32, pdf_width: f32, pdf_height: f32) -> Self {
        Self {
            number,
            html_width,
            html_height,
            pdf_width,
            pdf_height,
            fragments: Vec::new(),
            rows: Vec::new(),
            merged: Vec::new(),
            paragraphs: Vec::new(),
            media: Vec::new(),
            tables: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Horizontal scale factor from PDF-space to HTML-space (§4.1).
    pub fn sx(&self) -> f32 {
        if self.pdf_width > 0.0 {
            self.html_width / self.pdf_width
        } else {
            1.0
        }
    }

    /// Vertical scale factor from PDF-space to HTML-space (§4.1).
    pub fn sy(&self) -> f32 {
        if self.pdf_height > 0.0 {
            self.html_height / self.pdf_height
        } else {
            1.0
        }
    }

    /// Whether this page has neither text, media, nor table content.
    pub fn is_empty_content(&self) -> bool {
        self.fragments.is_empty() && self.paragraphs.is_empty() && self.media.is_empty() && self.tables.is_empty()
    }
}
