//! Paragraph assembler (C7): groups merged fragments sharing
//! `(col_id, reading_block)` into paragraphs, breaking on vertical gaps,
//! font changes, and bullet markers; then merges the last paragraph of
//! page *n* into the first paragraph of page *n+1* under the five strict
//! continuity conditions of §4.7.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{FontTable, MergedFragment, Page, Paragraph};

/// Configuration for paragraph assembly (§6).
#[derive(Debug, Clone)]
pub struct ParagraphAssemblerConfig {
    /// Vertical-gap break multiplier, × median line height (default 2.0).
    pub gap_multiplier: f32,
    /// Font-size delta in points above which a new paragraph starts
    /// (default 2.0, also reused as the cross-page merge size tolerance).
    pub size_delta_pt: f32,
    /// Bullet/list-marker glyphs that force a paragraph break when a
    /// merged fragment's text starts with one.
    pub list_markers: Vec<char>,
}

impl Default for ParagraphAssemblerConfig {
    fn default() -> Self {
        Self {
            gap_multiplier: 2.0,
            size_delta_pt: 2.0,
            list_markers: vec!['•', '◦', '▪', '✓', '●', '○', '■', '□', '–', '—'],
        }
    }
}

fn median_line_height(fragments: &[MergedFragment]) -> f32 {
    if fragments.is_empty() {
        return 12.0;
    }
    let mut heights: Vec<f32> = fragments.iter().map(|f| f.rect.height).collect();
    heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    heights[heights.len() / 2]
}

fn starts_with_list_marker(text: &str, markers: &[char]) -> bool {
    text.trim_start().chars().next().map(|c| markers.contains(&c)).unwrap_or(false)
}

fn family_and_size(fragment: &MergedFragment, font_table: &FontTable) -> (String, f32) {
    match font_table.get(fragment.font_id) {
        Some(entry) => (entry.family.clone(), entry.size),
        None => (String::new(), 0.0),
    }
}

/// Assemble paragraphs for a single page's merged fragments. Fragments
/// must already carry `col_id`/`reading_block` (C6) and be in reading
/// order (sorted by `(reading_block, left)`, consistent with the sort C6
/// used to assign blocks).
pub fn assemble_paragraphs(
    page_number: u32,
    fragments: &[MergedFragment],
    font_table: &FontTable,
    cfg: &ParagraphAssemblerConfig,
) -> Vec<Paragraph> {
    let mut ordered: Vec<usize> = (0..fragments.len()).collect();
    ordered.sort_by(|&a, &b| {
        fragments[a]
            .reading_block
            .cmp(&fragments[b].reading_block)
            .then(fragments[a].rect.left().partial_cmp(&fragments[b].rect.left()).unwrap_or(std::cmp::Ordering::Equal))
    });

    let median_height = median_line_height(fragments);
    let gap_threshold = cfg.gap_multiplier * median_height;

    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut prev_idx: Option<usize> = None;

    for &idx in &ordered {
        let fragment = &fragments[idx];
        let (family, size) = family_and_size(fragment, font_table);

        let mut start_new = paragraphs.is_empty();
        if let Some(p) = prev_idx {
            let prev = &fragments[p];
            let (prev_family, prev_size) = family_and_size(prev, font_table);
            let same_group = prev.col_id == fragment.col_id && prev.reading_block == fragment.reading_block;
            if !same_group {
                start_new = true;
            } else {
                let gap = fragment.rect.top() - prev.rect.bottom();
                if gap > gap_threshold {
                    start_new = true;
                }
                if prev_family != family {
                    start_new = true;
                }
                if (prev_size - size).abs() > cfg.size_delta_pt {
                    start_new = true;
                }
            }
        }
        if starts_with_list_marker(&fragment.text, &cfg.list_markers) {
            start_new = true;
        }

        if start_new {
            paragraphs.push(Paragraph::new(page_number, fragment.col_id, fragment.reading_block, fragment.clone()));
        } else {
            paragraphs.last_mut().expect("start_new is false only once a paragraph exists").fragments.push(fragment.clone());
        }
        prev_idx = Some(idx);
    }

    paragraphs
}

fn heading_pattern_regexes() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"^\d+\.").unwrap(),
            Regex::new(r"^[A-Z][a-z]+\s+\d+").unwrap(),
            Regex::new(r"^[A-Za-z]$").unwrap(),
            Regex::new(r"(?i)^[ivxlcdm]+\.").unwrap(),
        ]
    })
}

fn matches_heading_pattern(text: &str, list_markers: &[char]) -> bool {
    let trimmed = text.trim_start();
    if starts_with_list_marker(trimmed, list_markers) {
        return true;
    }
    heading_pattern_regexes().iter().any(|re| re.is_match(trimmed))
}

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', ';', ':', '。', '！', '？'];

fn ends_sentence(text: &str) -> bool {
    text.trim_end().chars().next_back().map(|c| SENTENCE_TERMINATORS.contains(&c)).unwrap_or(false)
}

/// Merge the last paragraph of page *n* into the first paragraph of page
/// *n+1* wherever all five continuity conditions hold (§4.7). Runs as a
/// single-threaded pass after all per-page paragraph assembly completes
/// (§5: cross-page merge is never parallelized).
pub fn merge_cross_page_paragraphs(pages: &mut [Page], font_table: &FontTable, cfg: &ParagraphAssemblerConfig) {
    for i in 0..pages.len().saturating_sub(1) {
        let should_merge = {
            let (before, after) = pages.split_at_mut(i + 1);
            let page_n = &before[i];
            let page_n1 = &after[0];
            let (Some(last), Some(first)) = (page_n.paragraphs.last(), page_n1.paragraphs.first()) else {
                continue;
            };
            if last.col_id != first.col_id || last.reading_block != first.reading_block {
                continue;
            }
            let (Some(l_merged), Some(f_merged)) = (last.fragments.last(), first.fragments.first()) else {
                continue;
            };
            let (l_family, l_size) = family_and_size(l_merged, font_table);
            let (f_family, f_size) = family_and_size(f_merged, font_table);
            if l_family != f_family || (l_size - f_size).abs() >= cfg.size_delta_pt {
                continue;
            }
            if ends_sentence(&last.text()) {
                continue;
            }
            if matches_heading_pattern(&first.text(), &cfg.list_markers) {
                continue;
            }
            let l_bold = font_table.get(l_merged.font_id).map(|e| e.is_bold()).unwrap_or(false);
            let f_bold = font_table.get(f_merged.font_id).map(|e| e.is_bold()).unwrap_or(false);
            if l_bold && !f_bold {
                continue;
            }
            true
        };

        if should_merge {
            let first_paragraph = pages[i + 1].paragraphs.remove(0);
            pages[i].paragraphs.last_mut().unwrap().absorb(first_paragraph);
        }
    }
}
