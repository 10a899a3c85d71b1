//! Error taxonomy for the layout-fusion and structural-promotion pipeline.
//!
//! Errors are scoped by how far they are allowed to propagate: element-scoped
//! errors are logged and the element is dropped; page-scoped errors downgrade
//! the page to whichever side (text/media) is still available; only
//! document-scoped errors abort the run. See `RunSummary` in `pipeline.rs`
//! for how these are aggregated into per-run counters rather than just logged.

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fusing and promoting a book-length PDF's
/// extracted layout into a structured document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // --- Element/fragment-scoped: logged and continued, never abort the page. ---
    /// A fragment referenced a `font_id` absent from the document's font
    /// table (§4.2). The fragment is dropped.
    #[error("page {page}: fragment {fragment_index} references unknown font_id {font_id}")]
    FontLookupMissing {
        /// Page the fragment belongs to.
        page: u32,
        /// Index of the fragment within the page's fragment arena.
        fragment_index: usize,
        /// The missing font id.
        font_id: u32,
    },

    /// A fragment was dropped due to a fragment-level invariant violation
    /// (e.g. negative width/height, empty text after ingest normalization).
    #[error("page {page}: fragment {fragment_index} dropped: {reason}")]
    FragmentDropped {
        /// Page the fragment belongs to.
        page: u32,
        /// Index of the fragment within the page's fragment arena.
        fragment_index: usize,
        /// Why the fragment was dropped.
        reason: String,
    },

    /// A media or table rectangle could not be transformed from PDF-space to
    /// HTML-space (missing page dimensions) and was left untransformed
    /// rather than dropped (§4 failure semantics).
    #[error("page {page}: coordinate normalization skipped for {element}: {reason}")]
    CoordinateNormalizationSkipped {
        /// Page the element belongs to.
        page: u32,
        /// Description of the element (e.g. "media#3", "table#1").
        element: String,
        /// Why normalization was skipped.
        reason: String,
    },

    // --- Page-scoped: downgrade the page, never abort the document. ---
    /// A page exceeded its configured wall-clock budget; the page is
    /// downgraded to a media-only fallback (§5).
    #[error("page {0}: timed out, falling back to media-only content")]
    PageTimeout(u32),

    /// A page's raster render (needed for media/table geometry detection)
    /// failed; the page falls through to text-only handling.
    #[error("page {page}: render failed: {reason}")]
    PageRenderFailed {
        /// Page that failed to render.
        page: u32,
        /// Renderer-reported reason.
        reason: String,
    },

    /// The text extractor produced zero fragments for a page that has
    /// media or table content; the page proceeds as media-only.
    #[error("page {0}: text extractor produced no fragments")]
    TextExtractorEmpty(u32),

    // --- Aggregated counters: never silent, always surfaced in the run summary. ---
    /// A table candidate had no caption within `max_caption_distance` and
    /// `require_table_caption` is set; this is always counted, never just
    /// logged (§4.9, §7).
    #[error("page {page}: table candidate filtered, no caption found within {distance_pt} pt")]
    TableFilteredNoCaption {
        /// Page the candidate table belongs to.
        page: u32,
        /// The configured search radius that was exceeded.
        distance_pt: f32,
    },

    // --- Document-scoped: the only errors allowed to abort the run. ---
    /// No page in the document produced any text, media, or table content.
    #[error("document produced no extractable content")]
    NoExtractableContent,

    // --- Non-fatal infrastructure errors. ---
    /// The reference map (C13) failed to load or save; rename tracking is
    /// disabled for the remainder of the run but image flow (which works by
    /// filename alone) continues unaffected.
    #[error("reference map I/O error: {0}")]
    ReferenceMapIOError(String),

    /// Malformed external XML input (text-layout or media/table feed).
    #[error("malformed input XML: {0}")]
    InvalidInput(String),

    /// Underlying I/O error (reading input files, writing output files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reference map JSON (de)serialization error.
    #[error("reference map serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error kind is element-scoped (logged, element dropped,
    /// page continues).
    pub fn is_element_scoped(&self) -> bool {
        matches!(
            self,
            Error::FontLookupMissing { .. }
                | Error::FragmentDropped { .. }
                | Error::CoordinateNormalizationSkipped { .. }
        )
    }

    /// Whether this error kind is page-scoped (page downgraded, document
    /// continues).
    pub fn is_page_scoped(&self) -> bool {
        matches!(
            self,
            Error::PageTimeout(_)
                | Error::PageRenderFailed { .. }
                | Error::TextExtractorEmpty(_)
                | Error::TableFilteredNoCaption { .. }
        )
    }

    /// Whether this error kind aborts the entire document.
    pub fn is_document_fatal(&self) -> bool {
        matches!(self, Error::NoExtractableContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_lookup_missing_message() {
        let err = Error::FontLookupMissing {
            page: 3,
            fragment_index: 12,
            font_id: 99,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("page 3"));
        assert!(msg.contains("font_id 99"));
        assert!(err.is_element_scoped());
        assert!(!err.is_page_scoped());
    }

    #[test]
    fn test_table_filtered_no_caption_is_page_scoped() {
        let err = Error::TableFilteredNoCaption {
            page: 7,
            distance_pt: 100.0,
        };
        assert!(err.is_page_scoped());
        assert!(!err.is_element_scoped());
    }

    #[test]
    fn test_no_extractable_content_is_document_fatal() {
        let err = Error::NoExtractableContent;
        assert!(err.is_document_fatal());
        assert!(!err.is_page_scoped());
        assert!(!err.is_element_scoped());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
