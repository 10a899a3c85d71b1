//! Media elements — raster/vector images extracted by the media extractor
//! (§3, C8).

use crate::geometry::Rect;

/// Raster (bitmap) or vector (drawing-primitive) image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Bitmap image (JPEG/PNG/etc.).
    Raster,
    /// Vector drawing region (paths/curves/lines/quads).
    Vector,
}

/// An extracted media element.
#[derive(Debug, Clone)]
pub struct MediaElement {
    /// Stable id within the page.
    pub id: u32,
    /// Raster or vector.
    pub kind: MediaKind,
    /// Stable filename, `page{P}_img{N}.{ext}` (§4.8).
    pub file_ref: String,
    /// Bounding rectangle. PDF-space at ingest; transformed to HTML-space
    /// in place during fusion (C10) and never read as PDF-space again
    /// afterward.
    pub rect: Rect,
    /// Page number.
    pub page_num: u32,
    /// Optional caption/title (media elements rarely carry one; tables
    /// carry captions via `Table::caption` instead).
    pub caption: Option<String>,
    /// True if this image covers most of the page and overlays few text
    /// blocks (§4.8 step 2); kept, but tagged, never dropped.
    pub is_full_page_decorative: bool,
    /// Reading order assigned during fusion (C10); `None` until then.
    pub reading_order: Option<f64>,
}

impl MediaElement {
    /// Create a new media element with default (unset) reading order and
    /// decorative tag.
    pub fn new(id: u32, kind: MediaKind, file_ref: impl Into<String>, rect: Rect, page_num: u32) -> Self {
        Self {
            id,
            kind,
            file_ref: file_ref.into(),
            rect,
            page_num,
            caption: None,
            is_full_page_decorative: false,
            reading_order: None,
        }
    }
}
