//! Reference normalizer and resolver.
//!
//! Prerequisite references in the catalog are free text — an exact name, an
//! id, or a near-miss spelling typed from memory. The resolver maps each raw
//! reference to a concrete trick id, or `None` when nothing is close enough.
//!
//! Resolution order, first match wins:
//! 1. exact normalized-name match
//! 2. direct id match on the trimmed raw ref
//! 3. fuzzy match by edit distance, gated by the two thresholds below

use std::collections::{HashMap, HashSet};

use crate::engine::model::{TrickId, TrickRecord};

/// A fuzzy candidate is accepted outright at this edit distance or below.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Longer refs tolerate proportionally more damage: a candidate also passes
/// when `distance / (ref_len + 1)` stays under this ratio.
pub const MAX_RELATIVE_DISTANCE: f64 = 0.2;

/// Lookup tables built once per category.
#[derive(Debug, Clone)]
pub struct ResolverIndex {
    /// Normalized name -> id. First-seen wins on duplicate normalized names.
    by_name: HashMap<String, TrickId>,
    /// All known trick ids, for direct-id refs.
    ids: HashSet<TrickId>,
}

impl ResolverIndex {
    pub fn new(tricks: &[TrickRecord]) -> Self {
        let mut by_name = HashMap::new();
        let mut ids = HashSet::new();
        for trick in tricks {
            by_name
                .entry(normalize(&trick.name))
                .or_insert_with(|| trick.id.clone());
            ids.insert(trick.id.clone());
        }
        Self { by_name, ids }
    }

    /// Resolve a raw prerequisite reference to a trick id.
    ///
    /// Pure: for a fixed index, the same input always yields the same output.
    pub fn resolve(&self, raw: &str) -> Option<TrickId> {
        let normalized = normalize(raw);

        if let Some(id) = self.by_name.get(&normalized) {
            return Some(id.clone());
        }

        let trimmed = raw.trim();
        if self.ids.contains(trimmed) {
            return Some(trimmed.to_string());
        }

        self.closest_name(&normalized)
            .map(|name| self.by_name[&name].clone())
    }

    /// The indexed name nearest to `target`, if it passes the acceptance
    /// thresholds. Ties on distance break toward the lexicographically
    /// smaller name so resolution stays deterministic.
    fn closest_name(&self, target: &str) -> Option<String> {
        let mut best: Option<(&str, usize)> = None;
        for candidate in self.by_name.keys() {
            let d = levenshtein(target, candidate);
            match best {
                None => best = Some((candidate.as_str(), d)),
                Some((best_name, best_d)) => {
                    if d < best_d || (d == best_d && candidate.as_str() < best_name) {
                        best = Some((candidate.as_str(), d));
                    }
                }
            }
        }

        let (candidate, dist) = best?;
        let relative = dist as f64 / (target.chars().count() + 1) as f64;
        if dist <= MAX_EDIT_DISTANCE || relative < MAX_RELATIVE_DISTANCE {
            Some(candidate.to_string())
        } else {
            None
        }
    }
}

/// Lowercase, collapse internal whitespace runs to a single space, trim.
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Edit distance with unit insert/delete/substitute costs, rolling two rows.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr: Vec<usize> = vec![0; b_chars.len() + 1];

    for (i, &ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trick(id: &str, name: &str) -> TrickRecord {
        TrickRecord {
            id: id.to_string(),
            name: name.to_string(),
            prerequisite_refs: Vec::new(),
            difficulty: None,
            category_id: "flips".to_string(),
        }
    }

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Back   Handspring "), "back handspring");
    }

    #[test]
    fn exact_name_match() {
        let index = ResolverIndex::new(&[trick("bhs", "Back Handspring")]);
        assert_eq!(index.resolve("back handspring"), Some("bhs".to_string()));
    }

    #[test]
    fn exact_match_beats_fuzzy() {
        // "cart wheel" normalizes to an exact hit on the second trick; the
        // fuzzy path must never override it with "cartwheel" (distance 1).
        let index = ResolverIndex::new(&[trick("cw", "cartwheel"), trick("cw2", "cart wheel")]);
        assert_eq!(index.resolve("Cart  Wheel"), Some("cw2".to_string()));
    }

    #[test]
    fn direct_id_match() {
        let index = ResolverIndex::new(&[trick("bhs", "Back Handspring")]);
        assert_eq!(index.resolve(" bhs "), Some("bhs".to_string()));
    }

    #[test]
    fn fuzzy_match_within_distance() {
        let index = ResolverIndex::new(&[trick("roundoff", "roundoff")]);
        // one deletion away
        assert_eq!(index.resolve("roundof"), Some("roundoff".to_string()));
    }

    #[test]
    fn fuzzy_match_rejected_past_thresholds() {
        let index = ResolverIndex::new(&[trick("roundoff", "roundoff")]);
        assert_eq!(index.resolve("full twisting layout"), None);
    }

    #[test]
    fn relative_threshold_admits_long_refs() {
        let index = ResolverIndex::new(&[trick("x", "standing double backflip tucked")]);
        // distance 4 > MAX_EDIT_DISTANCE, but 4/30 < 0.2
        assert_eq!(
            index.resolve("standing duoble backflip tuck"),
            Some("x".to_string())
        );
    }

    #[test]
    fn first_seen_wins_on_duplicate_names() {
        let index = ResolverIndex::new(&[trick("a", "Aerial"), trick("b", "aerial")]);
        assert_eq!(index.resolve("aerial"), Some("a".to_string()));
    }

    #[test]
    fn resolve_is_deterministic() {
        let tricks = vec![trick("a", "abcd"), trick("b", "abce")];
        let index = ResolverIndex::new(&tricks);
        let first = index.resolve("abcf");
        for _ in 0..10 {
            assert_eq!(index.resolve("abcf"), first);
        }
        // tie between "abcd" and "abce" at distance 1 -> smaller name wins
        assert_eq!(first, Some("a".to_string()));
    }

    #[test]
    fn empty_index_resolves_nothing() {
        let index = ResolverIndex::new(&[]);
        assert_eq!(index.resolve("anything"), None);
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }
}
