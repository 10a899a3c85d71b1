//! Top-level per-document orchestration (§5): stage sequencing C1→C13,
//! page-level parallel fan-out bounded by a `rayon` thread pool, a
//! single-threaded cross-page paragraph-merge barrier, per-page timeout
//! downgrade, and the run-wide transparency counters of §7.
//!
//! Shaped after `pdf_oxide::pipeline::TextPipeline`: a config-holding
//! struct with `new()`/`with_config()` and one `run()` entry point, the
//! stage sequence generalized from that struct's single reading-order
//! strategy to the full C1→C13 pipeline this crate implements.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fusion::{self, FusionConfig};
use crate::geometry::Rect;
use crate::input::media_xml::{ParsedMediaDocument, ParsedMediaPage};
use crate::input::text_xml::{ParsedTextDocument, ParsedTextPage};
use crate::layout::{self, ColumnDetectorConfig, ParagraphAssemblerConfig, ScriptDetectorConfig};
use crate::media::extractor;
use crate::media::table_extractor::{self, CaptionCandidate};
use crate::model::{FontTable, Fragment, Page};
use crate::refmap::{ReferenceMap, ResourceType};

/// Per-page transparency counters (§7: "no silent counters").
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageSummary {
    pub page: u32,
    pub paragraphs: usize,
    pub media: usize,
    pub tables: usize,
    pub fragments_dropped: usize,
    pub tables_filtered_no_caption: usize,
    pub timed_out: bool,
}

/// Run-wide aggregate counters, returned alongside the processed pages so
/// none of §7's transparency requirements rely on logging alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub pages: usize,
    pub paragraphs: usize,
    pub media: usize,
    pub tables: usize,
    pub fonts_resolved: usize,
    pub fragments_dropped: usize,
    pub coordinate_normalizations_skipped: usize,
    pub tables_filtered_no_caption: usize,
    pub pages_timed_out: usize,
    pub per_page: Vec<PageSummary>,
}

impl RunSummary {
    fn absorb_page(&mut self, p: PageSummary) {
        self.pages += 1;
        self.paragraphs += p.paragraphs;
        self.media += p.media;
        self.tables += p.tables;
        self.fragments_dropped += p.fragments_dropped;
        self.tables_filtered_no_caption += p.tables_filtered_no_caption;
        if p.timed_out {
            self.pages_timed_out += 1;
        }
        self.per_page.push(p);
    }
}

/// Run a page-scoped closure with a wall-clock budget (§5: "cancellable
/// blocking suspension points... per-page wall clock timeout"). The
/// closure runs to completion on its own thread regardless of timeout
/// (there is no cooperative cancellation point inside pure in-memory
/// transforms); callers that see `None` fall back to the page's
/// media-only path and the worker thread's result, if it ever arrives,
/// is simply dropped.
fn run_with_timeout<T, F>(timeout: Duration, f: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(timeout).ok()
}

/// Validated, page-local fragment construction: drops fragments whose
/// `font_id` is absent from the font table (§4.2, `FontLookupMissing`).
fn validate_fragments(page_number: u32, raw: Vec<Fragment>, font_table: &FontTable, dropped: &mut usize) -> Vec<Fragment> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, f)| {
            if font_table.get(f.font_id).is_none() {
                log::warn!("{}", Error::FontLookupMissing { page: page_number, fragment_index: i, font_id: f.font_id });
                *dropped += 1;
                None
            } else {
                Some(f)
            }
        })
        .collect()
}

/// Invert a page's PDF→HTML axis scale, for building PDF-space overlay
/// inputs (`text_rects`, caption candidates) the media/table side needs
/// — the only place outside `fusion` this crate crosses coordinate
/// spaces, and always back toward PDF-space, never the other direction
/// (§9 design note: the transform lives at the fusion boundary; this is
/// its mirror image, required because the media/table stage runs before
/// fusion has transformed anything).
fn paragraph_rects_in_pdf_space(paragraphs: &[crate::model::Paragraph], page: &Page) -> Vec<Rect> {
    let inv_sx = if page.sx() > 0.0 { 1.0 / page.sx() } else { 1.0 };
    let inv_sy = if page.sy() > 0.0 { 1.0 / page.sy() } else { 1.0 };
    paragraphs
        .iter()
        .flat_map(|p| p.fragments.iter())
        .map(|m| m.rect.transform(inv_sx, inv_sy))
        .collect()
}

fn caption_candidates_in_pdf_space(paragraphs: &[crate::model::Paragraph], page: &Page) -> Vec<CaptionCandidate> {
    let inv_sx = if page.sx() > 0.0 { 1.0 / page.sx() } else { 1.0 };
    let inv_sy = if page.sy() > 0.0 { 1.0 / page.sy() } else { 1.0 };
    paragraphs
        .iter()
        .flat_map(|p| p.fragments.iter())
        .map(|m| CaptionCandidate { text: m.text.clone(), rect: m.rect.transform(inv_sx, inv_sy) })
        .collect()
}

/// Process one page: text side (C3–C7, no cross-page merge yet) and
/// media side (C8–C9), producing a `Page` still in mixed coordinate
/// spaces (paragraphs HTML-space, media/tables PDF-space) ready for the
/// cross-page merge barrier and then fusion.
fn process_page(
    number: u32,
    text_page: Option<&ParsedTextPage>,
    media_page: Option<&ParsedMediaPage>,
    font_table: &FontTable,
    refmap: &ReferenceMap,
    cfg: &Config,
) -> (Page, PageSummary) {
    let mut summary = PageSummary { page: number, ..Default::default() };

    let pdf_width = media_page.map(|m| m.width).unwrap_or(0.0);
    let pdf_height = media_page.map(|m| m.height).unwrap_or(0.0);
    let html_width = text_page.map(|t| t.width).unwrap_or(0.0);
    let html_height = text_page.map(|t| t.height).unwrap_or(0.0);
    let mut page = Page::new(number, html_width, html_height, pdf_width, pdf_height);

    let paragraphs = match text_page {
        Some(t) if !t.fragments.is_empty() => {
            let raw = t.fragments.clone();
            let validated = validate_fragments(number, raw, font_table, &mut summary.fragments_dropped);
            // Keep the validated fragments in the page's own arena (§3, §9:
            // "pages own their fragment arenas") so downstream consumers and
            // the §5 per-N-pages memory cap have the real data to act on.
            page.fragments = validated.clone();
            let timeout = cfg.page_timeout;
            let page_width = t.width;
            let font_table_owned = font_table.clone();
            let cfg_owned = cfg.paragraph_assembler.clone();
            let script_cfg = cfg.script_detector;
            let column_cfg = cfg.column_detector;
            let result = run_with_timeout(timeout, move || {
                run_text_side_owned(number, validated, font_table_owned, page_width, script_cfg, column_cfg, cfg_owned)
            });
            match result {
                Some(paragraphs) => paragraphs,
                None => {
                    log::warn!("{}", Error::PageTimeout(number));
                    summary.timed_out = true;
                    Vec::new()
                }
            }
        }
        Some(_) => {
            log::warn!("{}", Error::TextExtractorEmpty(number));
            Vec::new()
        }
        None => Vec::new(),
    };
    page.paragraphs = paragraphs;

    if let Some(m) = media_page {
        let page_rect = Rect::new(0.0, 0.0, m.width, m.height);
        let text_rects = paragraph_rects_in_pdf_space(&page.paragraphs, &page);
        let media_elements = extractor::extract_media(number, &page_rect, &m.rasters, &m.vectors, &text_rects, &cfg.media_extractor);
        for element in &media_elements {
            refmap.add_resource(&element.id.to_string(), &element.file_ref, ResourceType::Image);
        }
        page.media = media_elements;

        let captions = caption_candidates_in_pdf_space(&page.paragraphs, &page);
        let (tables, report) = table_extractor::extract_tables(number, &m.tables, &captions, &cfg.table_extractor);
        summary.tables_filtered_no_caption = report.filtered;
        if report.filtered > 0 {
            log::warn!("{}", Error::TableFilteredNoCaption { page: number, distance_pt: cfg.table_extractor.max_caption_distance });
        }
        for table in &tables {
            refmap.add_resource(&table.id.to_string(), &format!("page{}_table{}", number, table.id), ResourceType::Table);
        }
        page.tables = tables;
    }

    summary.paragraphs = page.paragraphs.len();
    summary.media = page.media.len();
    summary.tables = page.tables.len();

    (page, summary)
}

fn run_text_side_owned(
    page_number: u32,
    fragments: Vec<Fragment>,
    font_table: FontTable,
    page_width: f32,
    script_cfg: ScriptDetectorConfig,
    column_cfg: ColumnDetectorConfig,
    paragraph_cfg: ParagraphAssemblerConfig,
) -> Vec<crate::model::Paragraph> {
    let mut fragments = fragments;
    layout::detect_scripts(&mut fragments, &script_cfg);
    let order = layout::sort_order_by_baseline_left(&fragments);
    let rows = layout::group_rows(&fragments, &order);
    let mut merged = layout::merge_fragments(&fragments, &rows, &font_table);
    layout::assign_columns(&mut merged, page_width, &column_cfg);
    layout::assign_reading_blocks(&mut merged);
    layout::assemble_paragraphs(page_number, &merged, &font_table, &paragraph_cfg)
}

/// The pipeline entry point: owns a resolved configuration and drives
/// every stage for one document.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline over already-parsed text and media/table
    /// documents, threading `refmap` through every stage that creates a
    /// resource identity (§4.13).
    pub fn run(&self, text_doc: &ParsedTextDocument, media_doc: &ParsedMediaDocument, refmap: &ReferenceMap) -> Result<(Vec<Page>, RunSummary)> {
        let font_table = text_doc.font_table.clone();

        let mut by_number: BTreeMap<u32, (Option<&ParsedTextPage>, Option<&ParsedMediaPage>)> = BTreeMap::new();
        for t in &text_doc.pages {
            by_number.entry(t.number).or_default().0 = Some(t);
        }
        for m in &media_doc.pages {
            by_number.entry(m.number).or_default().1 = Some(m);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads)
            .build()
            .map_err(|e| Error::InvalidInput(format!("failed to build worker pool: {}", e)))?;

        let numbers: Vec<u32> = by_number.keys().copied().collect();
        let results: Vec<(Page, PageSummary)> = pool.install(|| {
            use rayon::prelude::*;
            numbers
                .par_iter()
                .map(|&n| {
                    let (t, m) = by_number[&n];
                    process_page(n, t, m, &font_table, refmap, &self.config)
                })
                .collect()
        });

        let mut pages: Vec<Page> = Vec::with_capacity(results.len());
        let mut summary = RunSummary::default();
        for (page, page_summary) in results {
            summary.absorb_page(page_summary);
            pages.push(page);
        }
        pages.sort_by_key(|p| p.number);
        summary.fonts_resolved = font_table.len();

        // Cross-page paragraph merge barrier (§4.7, §5): single-threaded,
        // runs after every page's own C3–C7 work completes.
        layout::merge_cross_page_paragraphs(&mut pages, &font_table, &self.config.paragraph_assembler);

        // Fusion (C10): per-page again, safe to parallelize since the
        // cross-page barrier above already ran.
        let fusion_cfg: FusionConfig = self.config.fusion;
        pool.install(|| {
            use rayon::prelude::*;
            pages.par_iter_mut().for_each(|page| {
                fusion::fuse_page(page, &fusion_cfg);
            });
        });

        if pages.iter().all(|p| p.is_empty_content()) {
            return Err(Error::NoExtractableContent);
        }

        // Bound peak memory on long documents by dropping each page's raw
        // fragment arena once fusion no longer needs it (§5). Only the
        // merged-fragment provenance on `paragraphs` is read downstream
        // (writer, font-role analysis, structural promotion); the raw
        // per-glyph arena has no remaining reader past this point.
        for (i, page) in pages.iter_mut().enumerate() {
            if (i + 1) % self.config.free_every_n_pages.max(1) == 0 {
                page.fragments = Vec::new();
            }
        }

        Ok((pages, summary))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{media_xml, text_xml};

    #[test]
    fn test_run_end_to_end_single_page() {
        let text_xml = r#"<document>
<page number="1" width="600" height="800">
<fontspec id="0" size="12" family="Times"/>
<text font="0" left="10" top="10" width="200" height="14">Hello reading-ordered world</text>
</page>
</document>"#;
        let media_xml = r#"<document>
<page index="1" width="595" height="842">
</page>
</document>"#;

        let text_doc = text_xml::parse_text_document(text_xml).unwrap();
        let media_doc = media_xml::parse_media_document(media_xml).unwrap();

        let refmap = ReferenceMap::new();
        let pipeline = Pipeline::new();
        let (pages, summary) = pipeline.run(&text_doc, &media_doc, &refmap).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(summary.pages, 1);
        assert_eq!(pages[0].paragraphs.len(), 1);
        assert_eq!(pages[0].paragraphs[0].reading_order, Some(1.0));
    }

    #[test]
    fn test_text_only_document_with_no_media_or_tables_does_not_error() {
        // A page with text and no media/table content at all must not trip
        // `NoExtractableContent`: only a document with zero content across
        // every page is fatal (§7).
        let text_xml = r#"<document>
<page number="1" width="600" height="800">
<fontspec id="0" size="12" family="Times"/>
<text font="0" left="10" top="10" width="200" height="14">Text-only page</text>
</page>
</document>"#;
        let media_xml = r#"<document></document>"#;

        let text_doc = text_xml::parse_text_document(text_xml).unwrap();
        let media_doc = media_xml::parse_media_document(media_xml).unwrap();
        let refmap = ReferenceMap::new();
        let pipeline = Pipeline::new();
        let (pages, _summary) = pipeline.run(&text_doc, &media_doc, &refmap).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].paragraphs.len(), 1);
        assert!(pages[0].media.is_empty());
        assert!(pages[0].tables.is_empty());
        assert!(!pages[0].is_empty_content());
    }

    #[test]
    fn test_run_errors_on_entirely_empty_document() {
        let text_doc = ParsedTextDocument::default();
        let media_doc = ParsedMediaDocument::default();
        let refmap = ReferenceMap::new();
        let pipeline = Pipeline::new();
        let result = pipeline.run(&text_doc, &media_doc, &refmap);
        assert!(matches!(result, Err(Error::NoExtractableContent)));
    }

    #[test]
    fn test_unresolved_font_id_drops_fragment_and_counts_it() {
        let text_xml = r#"<document>
<page number="1" width="600" height="800">
<fontspec id="0" size="12" family="Times"/>
<text font="0" left="10" top="10" width="50" height="14">Kept</text>
<text font="99" left="10" top="40" width="50" height="14">Dropped</text>
</page>
</document>"#;
        let media_xml = r#"<document><page index="1" width="595" height="842"></page></document>"#;

        let text_doc = text_xml::parse_text_document(text_xml).unwrap();
        let media_doc = media_xml::parse_media_document(media_xml).unwrap();
        let refmap = ReferenceMap::new();
        let pipeline = Pipeline::new();
        let (pages, summary) = pipeline.run(&text_doc, &media_doc, &refmap).unwrap();

        assert_eq!(summary.fragments_dropped, 1);
        assert_eq!(pages[0].paragraphs.len(), 1);
        assert_eq!(pages[0].paragraphs[0].text(), "Kept");
    }
}
