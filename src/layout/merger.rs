//! Row-internal merger (C5): concatenates horizontally-adjacent fragments
//! sharing a font within each row, then splices marked scripts into their
//! parent's merged fragment with a typographic marker, preserving the
//! script's own size and rect as a child record (§4.5).

use std::collections::HashMap;

use crate::model::{Fragment, FontTable, FragmentChild, MergedFragment, Row, ScriptType};

fn resolved_size(fragment: &Fragment, font_table: &FontTable) -> f32 {
    font_table.get(fragment.font_id).map(|e| e.size).unwrap_or(0.0)
}

/// Merge all rows on a page into merged fragments, then splice scripts
/// into their parents. Returns the merged fragments in row order; within
/// a row, in the order contiguous same-font runs were encountered.
pub fn merge_fragments(fragments: &[Fragment], rows: &[Row], font_table: &FontTable) -> Vec<MergedFragment> {
    let mut merged: Vec<MergedFragment> = Vec::new();
    let mut orig_to_merged: HashMap<usize, usize> = HashMap::new();

    for row in rows {
        let mut current: Option<(u32, Vec<FragmentChild>, Vec<usize>)> = None;

        let mut flush = |current: &mut Option<(u32, Vec<FragmentChild>, Vec<usize>)>,
                         merged: &mut Vec<MergedFragment>,
                         orig_to_merged: &mut HashMap<usize, usize>| {
            if let Some((font_id, children, idxs)) = current.take() {
                let merged_idx = merged.len();
                merged.push(MergedFragment::from_children(font_id, children));
                for oi in idxs {
                    orig_to_merged.insert(oi, merged_idx);
                }
            }
        };

        for &idx in &row.fragment_indices {
            let frag = &fragments[idx];
            if frag.is_script() {
                // Scripts are never row-merged directly; they're spliced
                // into their parent's merged fragment below.
                continue;
            }
            let child = FragmentChild::from_fragment(frag, resolved_size(frag, font_table));
            let same_run = current.as_ref().map(|(font_id, ..)| *font_id == frag.font_id).unwrap_or(false);
            if same_run {
                let (_, children, idxs) = current.as_mut().unwrap();
                children.push(child);
                idxs.push(idx);
            } else {
                flush(&mut current, &mut merged, &mut orig_to_merged);
                current = Some((frag.font_id, vec![child], vec![idx]));
            }
        }
        flush(&mut current, &mut merged, &mut orig_to_merged);
    }

    splice_scripts(fragments, font_table, &orig_to_merged, &mut merged);
    merged
}

fn splice_scripts(
    fragments: &[Fragment],
    font_table: &FontTable,
    orig_to_merged: &HashMap<usize, usize>,
    merged: &mut [MergedFragment],
) {
    for fragment in fragments {
        let Some(info) = fragment.script else {
            continue;
        };
        let Some(&merged_idx) = orig_to_merged.get(&info.parent_idx) else {
            continue;
        };
        let child = FragmentChild::from_fragment(fragment, resolved_size(fragment, font_table));
        let marker = match info.script_type {
            ScriptType::Super => format!("^{}", fragment.text),
            ScriptType::Sub => format!("_{}", fragment.text),
        };
        let m = &mut merged[merged_idx];
        m.text.push_str(&marker);
        m.children.push(child);
        m.rect = m
            .children
            .iter()
            .map(|c| c.rect)
            .reduce(|a, b| a.union(&b))
            .expect("merged fragment always has at least one child");
    }
}
