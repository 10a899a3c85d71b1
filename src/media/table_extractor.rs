//! Table extractor (C9): binds caption text to candidate tables produced
//! by the external table-geometry detector, applies the caption-distance
//! policy, and reports transparent detected/written/filtered counts so no
//! table is ever silently dropped (§4.9, §7).

use regex::Regex;
use std::sync::OnceLock;

use crate::geometry::Rect;
use crate::model::{Cell, Table};

/// A candidate table as reported by the external table-geometry detector,
/// before caption binding.
#[derive(Debug, Clone)]
pub struct TableCandidate {
    /// Id as reported by the table XML.
    pub id: u32,
    /// Bounding rect, PDF-space.
    pub rect: Rect,
    /// Cell grid, addressed by `(row, col)`.
    pub rows: Vec<Vec<Cell>>,
}

/// A candidate caption: text content plus its location, used to search
/// for the nearest `Table\s+\d+`-style match within `max_caption_distance`.
#[derive(Debug, Clone)]
pub struct CaptionCandidate {
    /// Caption text.
    pub text: String,
    /// Location, PDF-space.
    pub rect: Rect,
}

/// Configuration for table extraction (§6).
#[derive(Debug, Clone, Copy)]
pub struct TableExtractorConfig {
    /// When `false`, accept all detected tables regardless of caption
    /// match (default `true`).
    pub require_table_caption: bool,
    /// Search radius in points for matching `Table\s+\d+` captions
    /// (default 100.0).
    pub max_caption_distance: f32,
}

impl Default for TableExtractorConfig {
    fn default() -> Self {
        Self {
            require_table_caption: true,
            max_caption_distance: 100.0,
        }
    }
}

fn caption_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^table\s+\d+[.:]?").unwrap())
}

fn distance_to(a: &Rect, b: &Rect) -> f32 {
    let dx = (a.center().x - b.center().x).abs();
    let dy = (a.center().y - b.center().y).abs();
    (dx * dx + dy * dy).sqrt()
}

fn nearest_caption<'a>(table_rect: &Rect, captions: &'a [CaptionCandidate], max_distance: f32) -> Option<&'a CaptionCandidate> {
    captions
        .iter()
        .filter(|c| caption_pattern().is_match(c.text.trim()))
        .filter(|c| distance_to(table_rect, &c.rect) <= max_distance)
        .min_by(|a, b| {
            distance_to(table_rect, &a.rect)
                .partial_cmp(&distance_to(table_rect, &b.rect))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Per-page (and accumulable into per-document) transparency counters for
/// table filtering (§4.9, §7): the component must never silently drop
/// candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableExtractionReport {
    /// Candidate tables seen.
    pub detected: usize,
    /// Tables emitted (kept).
    pub written: usize,
    /// Tables filtered out for lacking a caption within range.
    pub filtered: usize,
}

impl std::ops::AddAssign for TableExtractionReport {
    fn add_assign(&mut self, other: Self) {
        self.detected += other.detected;
        self.written += other.written;
        self.filtered += other.filtered;
    }
}

/// Extract tables for one page: bind captions, apply the caption-distance
/// policy, and report detected/written/filtered counts.
pub fn extract_tables(
    page: u32,
    candidates: &[TableCandidate],
    captions: &[CaptionCandidate],
    cfg: &TableExtractorConfig,
) -> (Vec<Table>, TableExtractionReport) {
    let mut report = TableExtractionReport { detected: candidates.len(), ..Default::default() };
    let mut tables = Vec::new();

    for candidate in candidates {
        let caption = nearest_caption(&candidate.rect, captions, cfg.max_caption_distance);
        if caption.is_none() && cfg.require_table_caption {
            report.filtered += 1;
            continue;
        }
        let mut table = Table::new(candidate.id, page, candidate.rect, candidate.rows.clone());
        table.caption = caption.map(|c| c.text.clone());
        tables.push(table);
        report.written += 1;
    }

    (tables, report)
}
