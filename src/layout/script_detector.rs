//! Script detector (C4): identifies sub/superscript fragments via
//! top-position proximity and strict size bounds, before row grouping so
//! marked scripts survive into merging regardless of row assignment
//! (§4.4).
//!
//! Detection is keyed on `top`, not `baseline` — top position is
//! tolerance-stable across height differences, while `baseline = top +
//! height` is not (§9 design note).

use crate::model::{Fragment, ScriptType};

/// Symbols excluded from script eligibility even though they are short
/// (degree sign, copyright, registered trademark, ellipsis, and friends).
pub const EXCLUDED_SYMBOLS: &[&str] = &["°", "©", "®", "…", "™"];

/// Per-§6 default envelope for script-detection eligibility.
#[derive(Debug, Clone, Copy)]
pub struct ScriptDetectorConfig {
    /// Maximum fragment width to be eligible (default 15).
    pub max_width: f32,
    /// Maximum fragment height to be eligible (default 12).
    pub max_height: f32,
    /// Maximum text length to be eligible (default 3).
    pub max_len: usize,
    /// Maximum horizontal adjacency gap in px (default 5).
    pub adjacency_gap: f32,
    /// Superscript `dtop` envelope, symmetric (default ±3).
    pub superscript_top_diff: f32,
    /// Subscript max `dtop` (default 10); subscript range is
    /// `(superscript_top_diff, subscript_max_top_diff]`.
    pub subscript_max_top_diff: f32,
}

impl Default for ScriptDetectorConfig {
    fn default() -> Self {
        Self {
            max_width: 15.0,
            max_height: 12.0,
            max_len: 3,
            adjacency_gap: 5.0,
            superscript_top_diff: 3.0,
            subscript_max_top_diff: 10.0,
        }
    }
}

fn is_eligible(fragment: &Fragment, cfg: &ScriptDetectorConfig) -> bool {
    fragment.width < cfg.max_width
        && fragment.height < cfg.max_height
        && fragment.text.chars().count() <= cfg.max_len
        && !EXCLUDED_SYMBOLS.contains(&fragment.text.as_str())
}

fn horizontally_adjacent(f: &Fragment, p: &Fragment, cfg: &ScriptDetectorConfig) -> bool {
    (f.left - (p.left + p.width)).abs() <= cfg.adjacency_gap
}

/// Run script detection over one page's fragments in place.
///
/// Fragments must already belong to a single page. Eligible fragments are
/// matched left-to-right against the nearest adjacent, strictly-taller,
/// not-yet-marked fragment; drop caps and oversized initials (width ≥ 15 or
/// height ≥ 12, per invariant 6) are never eligible and therefore always
/// available as parents.
pub fn detect_scripts(fragments: &mut [Fragment], cfg: &ScriptDetectorConfig) {
    let mut order: Vec<usize> = (0..fragments.len()).collect();
    order.sort_by(|&a, &b| {
        fragments[a]
            .left
            .partial_cmp(&fragments[b].left)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for &i in &order {
        if !is_eligible(&fragments[i], cfg) {
            continue;
        }

        let mut best: Option<(usize, f32)> = None;
        for j in 0..fragments.len() {
            if j == i || fragments[j].is_script() {
                continue;
            }
            let (f, p) = (&fragments[i], &fragments[j]);
            if p.height <= f.height {
                continue;
            }
            if !horizontally_adjacent(f, p, cfg) {
                continue;
            }
            let distance = (f.left - (p.left + p.width)).abs();
            if best.map(|(_, d)| distance < d).unwrap_or(true) {
                best = Some((j, distance));
            }
        }

        let Some((parent_idx, _)) = best else {
            continue;
        };

        let dtop = fragments[i].top - fragments[parent_idx].top;
        let script_type = if (-cfg.superscript_top_diff..=cfg.superscript_top_diff).contains(&dtop) {
            Some(ScriptType::Super)
        } else if dtop > cfg.superscript_top_diff && dtop <= cfg.subscript_max_top_diff {
            Some(ScriptType::Sub)
        } else {
            None
        };

        if let Some(script_type) = script_type {
            fragments[i].mark_script(script_type, parent_idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, left: f32, top: f32, width: f32, height: f32) -> Fragment {
        Fragment::new(text, 0, left, top, width, height, 1)
    }

    #[test]
    fn test_s1_superscript_detected() {
        let mut fragments = vec![
            frag("…around 10", 0.0, 191.0, 80.0, 18.0),
            frag("7", 80.0, 192.0, 5.0, 11.0),
            frag("-Hz…", 85.0, 191.0, 60.0, 18.0),
        ];
        detect_scripts(&mut fragments, &ScriptDetectorConfig::default());
        assert!(fragments[1].is_script());
        let info = fragments[1].script.unwrap();
        assert_eq!(info.script_type, ScriptType::Super);
        assert_eq!(info.parent_idx, 0);
    }

    #[test]
    fn test_subscript_range() {
        let mut fragments = vec![
            frag("H", 0.0, 100.0, 10.0, 14.0),
            frag("2", 10.0, 108.0, 5.0, 8.0), // dtop = 8, within (3,10]
        ];
        detect_scripts(&mut fragments, &ScriptDetectorConfig::default());
        assert!(fragments[1].is_script());
        assert_eq!(fragments[1].script.unwrap().script_type, ScriptType::Sub);
    }

    #[test]
    fn test_dtop_outside_range_is_not_script() {
        let mut fragments = vec![
            frag("H", 0.0, 100.0, 10.0, 14.0),
            frag("2", 10.0, 115.0, 5.0, 8.0), // dtop = 15, outside both ranges
        ];
        detect_scripts(&mut fragments, &ScriptDetectorConfig::default());
        assert!(!fragments[1].is_script());
    }

    #[test]
    fn test_oversized_initial_not_eligible() {
        let mut fragments = vec![
            frag("T", 0.0, 100.0, 40.0, 40.0), // drop cap: width/height exceed thresholds
            frag("he rest", 40.0, 110.0, 80.0, 12.0),
        ];
        detect_scripts(&mut fragments, &ScriptDetectorConfig::default());
        assert!(!fragments[0].is_script());
    }

    #[test]
    fn test_excluded_symbol_not_eligible() {
        let mut fragments = vec![
            frag("30", 0.0, 100.0, 14.0, 12.0),
            frag("°", 14.0, 100.0, 6.0, 6.0),
        ];
        detect_scripts(&mut fragments, &ScriptDetectorConfig::default());
        assert!(!fragments[1].is_script());
    }

    #[test]
    fn test_equal_height_neighbor_is_not_a_valid_parent() {
        // Invariant 6 requires a script's parent to be strictly taller;
        // two equal-height eligible fragments must not be paired up.
        let mut fragments = vec![frag("a", 0.0, 100.0, 8.0, 11.0), frag("b", 8.0, 101.0, 8.0, 11.0)];
        detect_scripts(&mut fragments, &ScriptDetectorConfig::default());
        assert!(!fragments[0].is_script());
        assert!(!fragments[1].is_script());
    }
}
