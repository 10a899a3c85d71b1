//! Top-level pipeline configuration (§6): one documented field or
//! sub-config per external option, aggregated behind a single `Config`
//! with a `Default` impl, the same doc-commented-field shape
//! `pdf_oxide::pipeline::config::TextPipelineConfig` uses rather than a
//! per-document-type preset dispatcher (no analogue needed here — every
//! option in this spec is a plain tunable, not a document-type switch).

use crate::fusion::FusionConfig;
use crate::layout::{ColumnDetectorConfig, ParagraphAssemblerConfig, ScriptDetectorConfig};
use crate::media::{MediaExtractorConfig, TableExtractorConfig};
use crate::structure::{FontRoleConfig, PromoterConfig};

/// Aggregate configuration for a full pipeline run (§6).
///
/// Every component keeps its own config type (`ScriptDetectorConfig`,
/// `MediaExtractorConfig`, etc.) with its own `Default`; this struct just
/// collects them plus the pipeline-level concurrency knobs so a caller
/// has one value to build and pass in, rather than eleven.
#[derive(Debug, Clone)]
pub struct Config {
    /// Raster render resolution, dots per inch (default 200), passed
    /// through to the external page-rasterization collaborator; this
    /// crate never rasterizes a page itself (§6 external interfaces).
    pub dpi: u32,
    /// Script (super/subscript) detection thresholds (§4.4).
    pub script_detector: ScriptDetectorConfig,
    /// Column detection and reading-block assignment thresholds (§4.6).
    pub column_detector: ColumnDetectorConfig,
    /// Paragraph assembly gap/break thresholds and cross-page merge
    /// tolerances (§4.7).
    pub paragraph_assembler: ParagraphAssemblerConfig,
    /// Media extraction filtering thresholds (§4.8).
    pub media_extractor: MediaExtractorConfig,
    /// Table caption-binding policy (§4.9).
    pub table_extractor: TableExtractorConfig,
    /// Fusion-stage duplicate-text overlap threshold (§4.10).
    pub fusion: FusionConfig,
    /// Font-role clustering thresholds (open question, §9/DESIGN.md).
    pub font_roles: FontRoleConfig,
    /// Structural promotion thresholds (§4.12).
    pub promoter: PromoterConfig,
    /// Number of worker threads used for page-level fan-out (§5); `0`
    /// means "use `std::thread::available_parallelism()`".
    pub worker_threads: usize,
    /// Wall-clock budget per page before it is downgraded to a
    /// media-only fallback (§5, `PageTimeout`).
    pub page_timeout: std::time::Duration,
    /// Release transient per-page buffers every N pages to bound peak
    /// memory on very long documents (§5).
    pub free_every_n_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dpi: 200,
            script_detector: ScriptDetectorConfig::default(),
            column_detector: ColumnDetectorConfig::default(),
            paragraph_assembler: ParagraphAssemblerConfig::default(),
            media_extractor: MediaExtractorConfig::default(),
            table_extractor: TableExtractorConfig::default(),
            fusion: FusionConfig::default(),
            font_roles: FontRoleConfig::default(),
            promoter: PromoterConfig::default(),
            worker_threads: 0,
            page_timeout: std::time::Duration::from_secs(30),
            free_every_n_pages: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_spec_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.dpi, 200);
        assert!(cfg.table_extractor.require_table_caption);
        assert_eq!(cfg.media_extractor.full_page_threshold, 0.85);
        assert_eq!(cfg.worker_threads, 0);
    }
}
