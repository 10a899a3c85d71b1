//! Text-side layout analysis: row grouping (C3), script detection (C4),
//! row-internal merging (C5), column detection and reading-order block
//! assignment (C6), and paragraph assembly (C7).
//!
//! Control flow: C3/C4 run over a page's raw fragment arena, C5 merges
//! rows into [`crate::model::MergedFragment`]s, C6 assigns `col_id` and
//! `reading_block` to those merged fragments, and C7 groups them into
//! [`crate::model::Paragraph`]s, including the cross-page merge pass.

pub mod column_detector;
pub mod merger;
pub mod paragraph_assembler;
pub mod row_grouper;
pub mod script_detector;

pub use column_detector::{assign_columns, assign_reading_blocks, ColumnDetectorConfig, FULL_WIDTH_COL_ID};
pub use merger::merge_fragments;
pub use paragraph_assembler::{assemble_paragraphs, merge_cross_page_paragraphs, ParagraphAssemblerConfig};
pub use row_grouper::{baseline_tolerance, group_rows, sort_order_by_baseline_left};
pub use script_detector::{detect_scripts, ScriptDetectorConfig, EXCLUDED_SYMBOLS};
