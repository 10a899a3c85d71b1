//! Font-role analysis (part of C12): clusters font ids by `(family, size)`
//! across the document and assigns each cluster a semantic role — body,
//! heading levels `1..K` (by descending size), caption, or TOC marker
//! (§4.12).
//!
//! Exact cutoffs are an explicit open question in the distilled spec
//! (§9); the decisions recorded here (body = highest-glyph-count cluster,
//! headings ranked by descending size with frequency as a tiebreaker,
//! captions = small + short + rare, TOC = small + dot-leader-dominated)
//! are also recorded in DESIGN.md.

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::model::{FontTable, Page};

/// Semantic role assigned to a font-id cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// The document's primary running text.
    Body,
    /// A heading level, 1 = largest/most prominent.
    Heading(u8),
    /// Figure/table caption text.
    Caption,
    /// Table-of-contents entry marker (dot-leader + page number style).
    TocMarker,
}

impl FontRole {
    /// Whether this role is any heading level.
    pub fn is_heading(&self) -> bool {
        matches!(self, FontRole::Heading(_))
    }
}

/// Configuration for font-role clustering (open question, §9/DESIGN.md).
#[derive(Debug, Clone, Copy)]
pub struct FontRoleConfig {
    /// Max average cluster text length (chars) to qualify as a caption.
    pub caption_max_avg_len: usize,
    /// Max cluster frequency, as a fraction of the body cluster's
    /// frequency, to qualify as a caption.
    pub caption_max_frequency_fraction: f32,
    /// Min fraction of a cluster's merged fragments matching the
    /// dot-leader/page-number TOC pattern to qualify as the TOC marker
    /// role.
    pub toc_dotleader_fraction: f32,
}

impl Default for FontRoleConfig {
    fn default() -> Self {
        Self {
            caption_max_avg_len: 40,
            caption_max_frequency_fraction: 0.05,
            toc_dotleader_fraction: 0.5,
        }
    }
}

fn toc_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.{2,}\s*\d+\s*$").unwrap())
}

#[derive(Debug, Clone)]
struct ClusterStats {
    font_ids: Vec<u32>,
    size: f32,
    count: usize,
    total_text_len: usize,
    toc_like: usize,
}

fn cluster_key(family: &str, size: f32) -> (String, i32) {
    // Round size to the nearest tenth of a point so near-identical
    // rendered sizes (12.0 vs 12.01) cluster together.
    (family.to_string(), (size * 10.0).round() as i32)
}

fn collect_clusters(font_table: &FontTable, pages: &[Page]) -> IndexMap<(String, i32), ClusterStats> {
    let mut clusters: IndexMap<(String, i32), ClusterStats> = IndexMap::new();
    let mut seen_font_id_for_key: HashMap<(String, i32), Vec<u32>> = HashMap::new();

    for page in pages {
        for paragraph in &page.paragraphs {
            for merged in &paragraph.fragments {
                let Some(entry) = font_table.get(merged.font_id) else {
                    continue;
                };
                let key = cluster_key(&entry.family, entry.size);
                let stats = clusters.entry(key.clone()).or_insert_with(|| ClusterStats {
                    font_ids: Vec::new(),
                    size: entry.size,
                    count: 0,
                    total_text_len: 0,
                    toc_like: 0,
                });
                stats.count += 1;
                stats.total_text_len += merged.text.chars().count();
                if toc_pattern().is_match(&merged.text) {
                    stats.toc_like += 1;
                }
                let ids = seen_font_id_for_key.entry(key).or_default();
                if !ids.contains(&merged.font_id) {
                    ids.push(merged.font_id);
                }
            }
        }
    }

    for (key, stats) in clusters.iter_mut() {
        if let Some(ids) = seen_font_id_for_key.get(key) {
            stats.font_ids = ids.clone();
        }
    }
    clusters
}

/// Classify every font id used in the document's paragraphs into a role.
/// Font ids never referenced by any paragraph are absent from the map.
pub fn classify_font_roles(font_table: &FontTable, pages: &[Page], cfg: &FontRoleConfig) -> IndexMap<u32, FontRole> {
    let clusters = collect_clusters(font_table, pages);
    let mut roles: IndexMap<u32, FontRole> = IndexMap::new();

    let Some((body_key, body_stats)) = clusters.iter().max_by_key(|(_, s)| s.total_text_len) else {
        return roles;
    };
    let body_key = body_key.clone();
    let body_size = body_stats.size;
    let body_count = body_stats.count.max(1);

    for id in &clusters[&body_key].font_ids {
        roles.insert(*id, FontRole::Body);
    }

    let mut heading_candidates: Vec<(String, i32)> = Vec::new();

    for (key, stats) in clusters.iter() {
        if *key == body_key {
            continue;
        }
        let toc_fraction = stats.toc_like as f32 / stats.count.max(1) as f32;
        if toc_fraction >= cfg.toc_dotleader_fraction {
            for id in &stats.font_ids {
                roles.insert(*id, FontRole::TocMarker);
            }
            continue;
        }
        if stats.size > body_size {
            heading_candidates.push(key.clone());
            continue;
        }
        let avg_len = stats.total_text_len as f32 / stats.count.max(1) as f32;
        let frequency_fraction = stats.count as f32 / body_count as f32;
        if avg_len < cfg.caption_max_avg_len as f32 && frequency_fraction < cfg.caption_max_frequency_fraction {
            for id in &stats.font_ids {
                roles.insert(*id, FontRole::Caption);
            }
        } else {
            for id in &stats.font_ids {
                roles.insert(*id, FontRole::Body);
            }
        }
    }

    // Rank headings: descending size, ties broken by ascending frequency
    // (rarer text at the same size is the more specific/deeper heading).
    heading_candidates.sort_by(|a, b| {
        let sa = &clusters[a];
        let sb = &clusters[b];
        sb.size
            .partial_cmp(&sa.size)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(sa.count.cmp(&sb.count))
    });
    for (level, key) in heading_candidates.iter().enumerate() {
        let level = (level + 1).min(u8::MAX as usize) as u8;
        for id in &clusters[key].font_ids {
            roles.insert(*id, FontRole::Heading(level));
        }
    }

    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{FontEntry, FragmentChild, MergedFragment, Paragraph, StyleFlags};

    fn page_with(font_table: &FontTable, entries: &[(u32, &str)]) -> Page {
        let mut page = Page::new(1, 600.0, 800.0, 595.0, 842.0);
        for (font_id, text) in entries {
            let child = FragmentChild {
                text: text.to_string(),
                rect: Rect::new(0.0, 0.0, 100.0, 12.0),
                font_size: font_table.get(*font_id).unwrap().size,
                font_id: *font_id,
                script_type: None,
            };
            let merged = MergedFragment::from_children(*font_id, vec![child]);
            page.paragraphs.push(Paragraph::new(1, 1, 1, merged));
        }
        page
    }

    #[test]
    fn test_most_frequent_cluster_is_body() {
        let mut table = FontTable::new();
        table.insert(FontEntry::new(1, 12.0, "Times", StyleFlags::empty()));
        table.insert(FontEntry::new(2, 24.0, "Times", StyleFlags::BOLD));
        let mut entries = Vec::new();
        for _ in 0..20 {
            entries.push((1, "body text here, a reasonably long sentence"));
        }
        entries.push((2, "Chapter One"));
        let page = page_with(&table, &entries);
        let roles = classify_font_roles(&table, &[page], &FontRoleConfig::default());
        assert_eq!(roles[&1], FontRole::Body);
        assert!(roles[&2].is_heading());
    }

    #[test]
    fn test_larger_rarer_cluster_outranks_larger_common_cluster() {
        let mut table = FontTable::new();
        table.insert(FontEntry::new(1, 12.0, "Times", StyleFlags::empty()));
        table.insert(FontEntry::new(2, 18.0, "Times", StyleFlags::empty())); // section heading, more frequent
        table.insert(FontEntry::new(3, 24.0, "Times", StyleFlags::BOLD)); // chapter heading, rare
        let mut entries = Vec::new();
        for _ in 0..30 {
            entries.push((1, "body text that repeats often across many pages of prose"));
        }
        for _ in 0..5 {
            entries.push((2, "Section heading"));
        }
        entries.push((3, "Chapter One"));
        let page = page_with(&table, &entries);
        let roles = classify_font_roles(&table, &[page], &FontRoleConfig::default());
        assert_eq!(roles[&3], FontRole::Heading(1));
        assert_eq!(roles[&2], FontRole::Heading(2));
    }

    #[test]
    fn test_toc_marker_detected_by_dot_leader_pattern() {
        let mut table = FontTable::new();
        table.insert(FontEntry::new(1, 12.0, "Times", StyleFlags::empty()));
        table.insert(FontEntry::new(2, 10.0, "Times", StyleFlags::empty()));
        let mut entries = Vec::new();
        for _ in 0..20 {
            entries.push((1, "body text that repeats often across many pages of prose"));
        }
        for _ in 0..5 {
            entries.push((2, "Introduction ..... 5"));
        }
        let page = page_with(&table, &entries);
        let roles = classify_font_roles(&table, &[page], &FontRoleConfig::default());
        assert_eq!(roles[&2], FontRole::TocMarker);
    }
}
