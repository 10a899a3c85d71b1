//! Structural promoter (C12): walks the fused, reading-ordered unified
//! document once and builds a DocBook-like hierarchy — chapters, nested
//! sections, figures, tables, lists, and index bridgeheads (§4.12).
//!
//! Mirrors `pdf_oxide::structure::builder::StructureTreeBuilder`'s shape: a
//! counter-driven builder that walks a flat source in order and emits a
//! nested tree, rather than a generic tree-diffing pass.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::geometry::euclidean_distance;
use crate::model::{FontTable, Page, Paragraph};
use crate::structure::font_roles::{classify_font_roles, FontRole, FontRoleConfig};
use crate::structure::types::{DocNode, DocTableRow};

/// Configuration for the structural promoter (§4.12; exact cutoffs are an
/// open question resolved in DESIGN.md).
#[derive(Debug, Clone)]
pub struct PromoterConfig {
    /// Max character count for a level-1 heading to be treated as a
    /// chapter title rather than a section title.
    pub chapter_max_chars: usize,
    /// Max fraction down the page (0..1) for a heading to count as
    /// "top of page" for the chapter heuristic.
    pub chapter_top_fraction: f32,
    /// Multiplier on font size for the multi-line heading merge gap test.
    pub heading_merge_gap_multiplier: f32,
    /// Search radius in points for binding a caption-role paragraph to a
    /// figure.
    pub caption_max_distance: f32,
    /// Caption text longer than this, and not starting with "Figure", is
    /// suppressed rather than bound (guards against misattached
    /// paragraphs).
    pub caption_suppress_max_chars: usize,
    /// Indentation tolerance in points for grouping consecutive list items.
    pub list_indent_tolerance: f32,
    /// Minimum run length to promote to a list, except for strong bullet
    /// markers which permit a single item.
    pub min_list_items: usize,
    /// Bullet markers recognized by default (dash and roman numerals are
    /// excluded, since they collide with ordinary text and numbering).
    pub bullet_markers: Vec<char>,
}

impl Default for PromoterConfig {
    fn default() -> Self {
        Self {
            chapter_max_chars: 60,
            chapter_top_fraction: 0.2,
            heading_merge_gap_multiplier: 2.0,
            caption_max_distance: 100.0,
            caption_suppress_max_chars: 200,
            list_indent_tolerance: 15.0,
            min_list_items: 2,
            bullet_markers: vec!['•', '◦', '▪', '✓', '●', '○', '■', '□'],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Bullet,
    Ordered,
}

fn ordered_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+[.)]\s+").unwrap())
}

fn detect_marker(text: &str, bullets: &[char]) -> Option<(MarkerKind, String)> {
    let trimmed = text.trim_start();
    if let Some(m) = ordered_marker().find(text) {
        return Some((MarkerKind::Ordered, text[m.end()..].to_string()));
    }
    let mut chars = trimmed.chars();
    if let Some(c) = chars.next() {
        if bullets.contains(&c) {
            return Some((MarkerKind::Bullet, chars.as_str().trim_start().to_string()));
        }
    }
    None
}

enum OrderedRef {
    Para(usize),
    Media(usize),
    Table(usize),
}

fn ordered_refs(page: &Page) -> Vec<OrderedRef> {
    let mut v: Vec<(f64, OrderedRef)> = Vec::new();
    for (i, p) in page.paragraphs.iter().enumerate() {
        v.push((p.reading_order.unwrap_or(i as f64 + 1.0), OrderedRef::Para(i)));
    }
    for (i, m) in page.media.iter().enumerate() {
        v.push((m.reading_order.unwrap_or(0.0), OrderedRef::Media(i)));
    }
    for (i, t) in page.tables.iter().enumerate() {
        v.push((t.reading_order.unwrap_or(0.0), OrderedRef::Table(i)));
    }
    v.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    v.into_iter().map(|(_, r)| r).collect()
}

fn dominant_font_id(paragraph: &Paragraph) -> Option<u32> {
    paragraph.fragments.first().map(|f| f.font_id)
}

fn paragraph_top(paragraph: &Paragraph) -> f32 {
    paragraph.fragments.first().map(|f| f.rect.top()).unwrap_or(0.0)
}

fn paragraph_bottom(paragraph: &Paragraph) -> f32 {
    paragraph.fragments.last().map(|f| f.rect.bottom()).unwrap_or(0.0)
}

enum StackKind {
    Chapter { id: String, role: Option<String> },
    Sect,
}

struct StackEntry {
    level: u8,
    kind: StackKind,
    title: String,
    children: Vec<DocNode>,
}

impl StackEntry {
    fn into_node(self) -> DocNode {
        match self.kind {
            StackKind::Chapter { id, role } => DocNode::Chapter {
                id,
                role,
                title: self.title,
                children: self.children,
            },
            StackKind::Sect => DocNode::Sect {
                level: self.level,
                title: self.title,
                children: self.children,
            },
        }
    }
}

fn push_node(stack: &mut [StackEntry], book_children: &mut Vec<DocNode>, node: DocNode) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    } else {
        book_children.push(node);
    }
}

fn flush_list_buffer(buffer: &mut Vec<(MarkerKind, f32, String)>, stack: &mut [StackEntry], book_children: &mut Vec<DocNode>, cfg: &PromoterConfig) {
    if buffer.is_empty() {
        return;
    }
    let kind = buffer[0].0;
    let promote_single = buffer.len() == 1 && kind == MarkerKind::Bullet;
    if buffer.len() >= cfg.min_list_items || promote_single {
        let items: Vec<Vec<DocNode>> = buffer.iter().map(|(_, _, text)| vec![DocNode::Para(text.clone())]).collect();
        let node = match kind {
            MarkerKind::Bullet => DocNode::ItemizedList(items),
            MarkerKind::Ordered => DocNode::OrderedList(items),
        };
        push_node(stack, book_children, node);
    } else {
        for (_, _, text) in buffer.drain(..) {
            push_node(stack, book_children, DocNode::Para(text));
        }
    }
    buffer.clear();
}

struct PendingHeading {
    level: u8,
    text: String,
    font_id: u32,
    top_fraction: f32,
    bottom: f32,
}

fn close_top(stack: &mut Vec<StackEntry>, book_children: &mut Vec<DocNode>) {
    if let Some(entry) = stack.pop() {
        let node = entry.into_node();
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
        } else {
            book_children.push(node);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn finalize_heading(
    pending: PendingHeading,
    stack: &mut Vec<StackEntry>,
    book_children: &mut Vec<DocNode>,
    chapter_counter: &mut u32,
    cfg: &PromoterConfig,
) -> bool {
    let is_chapter = pending.level == 1 && pending.text.chars().count() <= cfg.chapter_max_chars && pending.top_fraction < cfg.chapter_top_fraction;
    if is_chapter {
        while !stack.is_empty() {
            close_top(stack, book_children);
        }
        *chapter_counter += 1;
        let is_index = pending.text.to_lowercase().contains("index");
        stack.push(StackEntry {
            level: 0,
            kind: StackKind::Chapter {
                id: format!("ch{}", chapter_counter),
                role: if is_index { Some("index".to_string()) } else { None },
            },
            title: pending.text,
            children: Vec::new(),
        });
        is_index
    } else {
        while stack.last().is_some_and(|e| e.level >= pending.level) {
            close_top(stack, book_children);
        }
        stack.push(StackEntry {
            level: pending.level,
            kind: StackKind::Sect,
            title: pending.text,
            children: Vec::new(),
        });
        stack
            .iter()
            .rev()
            .find(|e| matches!(e.kind, StackKind::Chapter { .. }))
            .map(|e| e.title.to_lowercase().contains("index"))
            .unwrap_or(false)
    }
}

/// Promote a fused, unified document into a DocBook-like tree.
pub fn promote(pages: &[Page], font_table: &FontTable) -> DocNode {
    promote_with_config(pages, font_table, &PromoterConfig::default())
}

/// As [`promote`], with explicit configuration.
pub fn promote_with_config(pages: &[Page], font_table: &FontTable, cfg: &PromoterConfig) -> DocNode {
    let roles = classify_font_roles(font_table, pages, &FontRoleConfig::default());
    let mut book_children: Vec<DocNode> = Vec::new();
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut list_buffer: Vec<(MarkerKind, f32, String)> = Vec::new();
    let mut pending_heading: Option<PendingHeading> = None;
    let mut chapter_counter: u32 = 0;
    let mut in_index = false;

    for page in pages {
        let mut consumed_captions: HashSet<usize> = HashSet::new();

        for elem in ordered_refs(page) {
            match elem {
                OrderedRef::Para(i) => {
                    let paragraph = &page.paragraphs[i];
                    let role = dominant_font_id(paragraph).and_then(|id| roles.get(&id).copied()).unwrap_or(FontRole::Body);
                    let text = paragraph.text();

                    if let FontRole::Heading(level) = role {
                        let font_id = dominant_font_id(paragraph).unwrap_or(0);
                        let font_size = font_table.get(font_id).map(|e| e.size).unwrap_or(12.0);
                        let top = paragraph_top(paragraph);
                        let bottom = paragraph_bottom(paragraph);
                        let top_fraction = if page.html_height > 0.0 { top / page.html_height } else { 0.0 };

                        let merges = pending_heading.as_ref().is_some_and(|p| {
                            p.level == level && p.font_id == font_id && (top - p.bottom) < cfg.heading_merge_gap_multiplier * font_size
                        });

                        if merges {
                            let p = pending_heading.as_mut().unwrap();
                            p.text.push(' ');
                            p.text.push_str(&text);
                            p.bottom = bottom;
                        } else {
                            flush_list_buffer(&mut list_buffer, &mut stack, &mut book_children, cfg);
                            if let Some(prev) = pending_heading.take() {
                                in_index = finalize_heading(prev, &mut stack, &mut book_children, &mut chapter_counter, cfg);
                            }
                            pending_heading = Some(PendingHeading {
                                level,
                                text,
                                font_id,
                                top_fraction,
                                bottom,
                            });
                        }
                        continue;
                    }

                    flush_list_buffer(&mut list_buffer, &mut stack, &mut book_children, cfg);
                    if let Some(prev) = pending_heading.take() {
                        in_index = finalize_heading(prev, &mut stack, &mut book_children, &mut chapter_counter, cfg);
                    }

                    if matches!(role, FontRole::TocMarker) {
                        continue;
                    }
                    if consumed_captions.contains(&i) {
                        continue;
                    }

                    let trimmed = text.trim();
                    if in_index && trimmed.chars().count() == 1 && trimmed.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                        push_node(&mut stack, &mut book_children, DocNode::Bridgehead(trimmed.to_string()));
                        continue;
                    }

                    if matches!(role, FontRole::Caption) {
                        push_node(&mut stack, &mut book_children, DocNode::Para(text));
                        continue;
                    }

                    match detect_marker(&text, &cfg.bullet_markers) {
                        Some((kind, stripped)) => {
                            let left = paragraph.fragments.first().map(|f| f.rect.left()).unwrap_or(0.0);
                            let same_run = list_buffer.last().is_some_and(|(k, l, _)| *k == kind && (l - left).abs() <= cfg.list_indent_tolerance);
                            if !same_run {
                                flush_list_buffer(&mut list_buffer, &mut stack, &mut book_children, cfg);
                            }
                            list_buffer.push((kind, left, stripped));
                        }
                        None => {
                            flush_list_buffer(&mut list_buffer, &mut stack, &mut book_children, cfg);
                            push_node(&mut stack, &mut book_children, DocNode::Para(text));
                        }
                    }
                }
                OrderedRef::Media(i) => {
                    flush_list_buffer(&mut list_buffer, &mut stack, &mut book_children, cfg);
                    if let Some(prev) = pending_heading.take() {
                        in_index = finalize_heading(prev, &mut stack, &mut book_children, &mut chapter_counter, cfg);
                    }

                    let media = &page.media[i];
                    let mut title = None;
                    let mut best: Option<(usize, f32)> = None;
                    let media_center = media.rect.center();
                    for (j, candidate) in page.paragraphs.iter().enumerate() {
                        if consumed_captions.contains(&j) {
                            continue;
                        }
                        let role = dominant_font_id(candidate).and_then(|id| roles.get(&id).copied()).unwrap_or(FontRole::Body);
                        if !matches!(role, FontRole::Caption) {
                            continue;
                        }
                        let Some(candidate_rect) = candidate.fragments.first().map(|f| f.rect) else {
                            continue;
                        };
                        let d = euclidean_distance(&media_center, &candidate_rect.center());
                        if d <= cfg.caption_max_distance && best.map_or(true, |(_, bd)| d < bd) {
                            best = Some((j, d));
                        }
                    }
                    if let Some((j, _)) = best {
                        let candidate_text = page.paragraphs[j].text();
                        let suppressed = candidate_text.chars().count() > cfg.caption_suppress_max_chars && !candidate_text.trim_start().starts_with("Figure");
                        if !suppressed {
                            consumed_captions.insert(j);
                            title = Some(candidate_text);
                        }
                    }
                    push_node(&mut stack, &mut book_children, DocNode::Figure { title, fileref: media.file_ref.clone() });
                }
                OrderedRef::Table(i) => {
                    flush_list_buffer(&mut list_buffer, &mut stack, &mut book_children, cfg);
                    if let Some(prev) = pending_heading.take() {
                        in_index = finalize_heading(prev, &mut stack, &mut book_children, &mut chapter_counter, cfg);
                    }

                    let table = &page.tables[i];
                    let rows: Vec<DocTableRow> = table
                        .rows
                        .iter()
                        .map(|row| DocTableRow {
                            cells: row.iter().map(|c| c.text.clone()).collect(),
                        })
                        .collect();
                    push_node(
                        &mut stack,
                        &mut book_children,
                        DocNode::Table {
                            informal: table.caption.is_none(),
                            title: table.caption.clone(),
                            rows,
                        },
                    );
                }
            }
        }
    }

    flush_list_buffer(&mut list_buffer, &mut stack, &mut book_children, cfg);
    if let Some(prev) = pending_heading.take() {
        finalize_heading(prev, &mut stack, &mut book_children, &mut chapter_counter, cfg);
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut book_children);
    }

    DocNode::Book(book_children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{Cell, FontEntry, FragmentChild, MediaElement, MediaKind, MergedFragment, StyleFlags, Table};

    fn page_with_font_table() -> FontTable {
        let mut table = FontTable::new();
        table.insert(FontEntry::new(1, 12.0, "Times", StyleFlags::empty())); // body
        table.insert(FontEntry::new(2, 24.0, "Times", StyleFlags::BOLD)); // chapter heading
        table
    }

    fn text_paragraph(page: u32, font_id: u32, top: f32, text: &str, order: f64) -> Paragraph {
        let child = FragmentChild {
            text: text.to_string(),
            rect: Rect::new(10.0, top, 200.0, 14.0),
            font_size: if font_id == 2 { 24.0 } else { 12.0 },
            font_id,
            script_type: None,
        };
        let merged = MergedFragment::from_children(font_id, vec![child]);
        let mut p = Paragraph::new(page, 1, 1, merged);
        p.reading_order = Some(order);
        p
    }

    #[test]
    fn test_chapter_heading_opens_chapter_with_paragraph_inside() {
        let font_table = page_with_font_table();
        let mut page = Page::new(1, 600.0, 800.0, 595.0, 842.0);
        page.paragraphs.push(text_paragraph(1, 2, 40.0, "Chapter One", 1.0));
        page.paragraphs.push(text_paragraph(1, 1, 200.0, "Body text goes here in plenty of words.", 2.0));

        let tree = promote(std::slice::from_ref(&page), &font_table);
        match tree {
            DocNode::Book(children) => {
                assert_eq!(children.len(), 1);
                match &children[0] {
                    DocNode::Chapter { title, children, .. } => {
                        assert_eq!(title, "Chapter One");
                        assert!(matches!(children[0], DocNode::Para(_)));
                    }
                    other => panic!("expected chapter, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_figure_binds_nearby_caption() {
        let font_table = page_with_font_table();
        let mut captioned_table = FontTable::new();
        captioned_table.insert(FontEntry::new(1, 12.0, "Times", StyleFlags::empty()));
        captioned_table.insert(FontEntry::new(3, 9.0, "Times", StyleFlags::empty())); // rare+short => caption

        let mut page = Page::new(1, 600.0, 800.0, 595.0, 842.0);
        for _ in 0..10 {
            page.paragraphs.push(text_paragraph(1, 1, 50.0, "Plenty of ordinary running body text for the page.", 1.0));
        }
        let mut media = MediaElement::new(1, MediaKind::Raster, "page1_img1.png", Rect::new(10.0, 300.0, 100.0, 100.0), 1);
        media.reading_order = Some(2.0);
        page.media.push(media);
        let mut caption = text_paragraph(1, 3, 405.0, "Figure 1: a small diagram", 3.0);
        caption.fragments[0].rect = Rect::new(10.0, 405.0, 100.0, 10.0);
        page.paragraphs.push(caption);

        let tree = promote(&[page], &captioned_table);
        let figure = find_figure(&tree).expect("figure present");
        match figure {
            DocNode::Figure { title, .. } => assert_eq!(title.as_deref(), Some("Figure 1: a small diagram")),
            _ => unreachable!(),
        }
    }

    fn find_figure(node: &DocNode) -> Option<&DocNode> {
        match node {
            DocNode::Figure { .. } => Some(node),
            DocNode::Book(_) | DocNode::ItemizedList(_) | DocNode::OrderedList(_) => children_of(node).into_iter().find_map(find_figure),
            DocNode::Chapter { children, .. } | DocNode::Sect { children, .. } => children.iter().find_map(find_figure),
            _ => None,
        }
    }

    fn children_of(node: &DocNode) -> Vec<&DocNode> {
        match node {
            DocNode::Book(c) => c.iter().collect(),
            DocNode::ItemizedList(items) | DocNode::OrderedList(items) => items.iter().flatten().collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_table_uses_bound_caption_as_formal_title() {
        let font_table = page_with_font_table();
        let mut page = Page::new(1, 600.0, 800.0, 595.0, 842.0);
        let mut table = Table::new(1, 1, Rect::new(0.0, 0.0, 100.0, 100.0), vec![vec![Cell { row: 0, col: 0, text: "a".to_string() }]]);
        table.caption = Some("Table 1: results".to_string());
        table.reading_order = Some(1.0);
        page.tables.push(table);

        let tree = promote(&[page], &font_table);
        if let DocNode::Book(children) = tree {
            assert!(matches!(&children[0], DocNode::Table { informal: false, title: Some(t), .. } if t == "Table 1: results"));
        }
    }

    #[test]
    fn test_bullet_list_items_grouped() {
        let font_table = page_with_font_table();
        let mut page = Page::new(1, 600.0, 800.0, 595.0, 842.0);
        page.paragraphs.push(text_paragraph(1, 1, 10.0, "• first item", 1.0));
        page.paragraphs.push(text_paragraph(1, 1, 30.0, "• second item", 2.0));
        let tree = promote(&[page], &font_table);
        if let DocNode::Book(children) = tree {
            assert!(matches!(&children[0], DocNode::ItemizedList(items) if items.len() == 2));
        }
    }

    #[test]
    fn test_single_dash_item_not_promoted_to_list() {
        let font_table = page_with_font_table();
        let mut page = Page::new(1, 600.0, 800.0, 595.0, 842.0);
        page.paragraphs.push(text_paragraph(1, 1, 10.0, "- a loose dash-prefixed sentence", 1.0));
        let tree = promote(&[page], &font_table);
        if let DocNode::Book(children) = tree {
            assert!(matches!(&children[0], DocNode::Para(_)));
        }
    }
}
