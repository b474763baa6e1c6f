//! Parser for `trix/catalog.trix`, the hand-editable trick catalog.
//!
//! Line format:
//!
//! ```text
//! # comment
//! [category: flips | Flips]
//!
//! cartwheel
//! roundoff (1): cartwheel
//! bhs = back handspring (2): roundoff
//! backflip (3): roundoff, back handspring
//! ```
//!
//! A trick line is `[<id> =] <name> [(<difficulty>)] [: <ref>, <ref>, ...]`.
//! When the explicit id is omitted, the id is the slug of the name.
//! Prerequisite refs are stored verbatim — they may be names, ids, or typos;
//! resolving them is the engine's job, not the parser's.

use std::collections::HashSet;

use anyhow::{Context, Result, bail};

use crate::engine::model::{Category, TrickRecord};

/// The parsed catalog: categories and tricks, both in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub tricks: Vec<TrickRecord>,
}

impl Catalog {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Tricks of one category, in file order.
    pub fn tricks_in(&self, category_id: &str) -> Vec<TrickRecord> {
        self.tricks
            .iter()
            .filter(|t| t.category_id == category_id)
            .cloned()
            .collect()
    }
}

/// Parse catalog text. Blank lines and `#` comments are skipped.
pub fn parse(input: &str) -> Result<Catalog> {
    let mut catalog = Catalog::default();
    let mut current_category: Option<String> = None;
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (line_num, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let category = parse_category_header(line)
                .with_context(|| format!("invalid category header at line {}", line_num + 1))?;
            if catalog.category(&category.id).is_some() {
                bail!(
                    "duplicate category \"{}\" at line {}",
                    category.id,
                    line_num + 1
                );
            }
            current_category = Some(category.id.clone());
            catalog.categories.push(category);
            continue;
        }

        let Some(category_id) = current_category.clone() else {
            bail!(
                "trick before any [category: ...] header at line {}",
                line_num + 1
            );
        };
        let trick = parse_trick_line(line, &category_id)
            .with_context(|| format!("invalid trick at line {}", line_num + 1))?;
        if !seen_ids.insert(trick.id.clone()) {
            bail!("duplicate trick id \"{}\" at line {}", trick.id, line_num + 1);
        }
        catalog.tricks.push(trick);
    }

    Ok(catalog)
}

/// `[category: <id> | <display name>]` — the display name is optional.
fn parse_category_header(line: &str) -> Result<Category> {
    let Some(inner) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        bail!("expected closing ']'");
    };
    let Some(rest) = inner.trim().strip_prefix("category:") else {
        bail!("expected `[category: <id>]`");
    };
    let (id, name) = match rest.split_once('|') {
        Some((id, name)) => (id.trim(), name.trim()),
        None => (rest.trim(), rest.trim()),
    };
    if id.is_empty() {
        bail!("empty category id");
    }
    Ok(Category {
        id: id.to_string(),
        name: name.to_string(),
    })
}

/// `[<id> =] <name> [(<difficulty>)] [: <ref>, <ref>, ...]`
fn parse_trick_line(line: &str, category_id: &str) -> Result<TrickRecord> {
    let (head, refs_part) = match line.split_once(':') {
        Some((head, refs)) => (head.trim(), Some(refs)),
        None => (line, None),
    };

    let (id_part, name_part) = match head.split_once('=') {
        Some((id, name)) => (Some(id.trim()), name.trim()),
        None => (None, head.trim()),
    };

    let (name, difficulty) = split_difficulty(name_part)?;
    if name.is_empty() {
        bail!("empty trick name");
    }

    let id = match id_part {
        Some(id) if !id.is_empty() => id.to_string(),
        Some(_) => bail!("empty trick id before '='"),
        None => slug(&name),
    };

    let prerequisite_refs = refs_part
        .map(|refs| {
            refs.split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(TrickRecord {
        id,
        name,
        prerequisite_refs,
        difficulty,
        category_id: category_id.to_string(),
    })
}

/// Split a trailing `(<number>)` difficulty marker off the name.
fn split_difficulty(text: &str) -> Result<(String, Option<u32>)> {
    let trimmed = text.trim();
    if let Some(open) = trimmed.rfind('(')
        && trimmed.ends_with(')')
    {
        let inner = &trimmed[open + 1..trimmed.len() - 1];
        let level: u32 = inner
            .trim()
            .parse()
            .with_context(|| format!("difficulty \"{}\" is not a number", inner.trim()))?;
        return Ok((trimmed[..open].trim().to_string(), Some(level)));
    }
    Ok((trimmed.to_string(), None))
}

/// Lowercase; every run of non-alphanumeric characters becomes one `-`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# gym catalog
[category: flips | Flips]

cartwheel
roundoff (1): cartwheel
bhs = back handspring (2): roundoff
backflip (3): roundoff, back handspring

[category: twists]
full = full twist (5): backflip
";

    #[test]
    fn parses_sample_catalog() {
        let catalog = parse(SAMPLE).unwrap();
        assert_eq!(catalog.categories.len(), 2);
        assert_eq!(catalog.categories[0].id, "flips");
        assert_eq!(catalog.categories[0].name, "Flips");
        // no display name -> id doubles as name
        assert_eq!(catalog.categories[1].name, "twists");
        assert_eq!(catalog.tricks.len(), 5);
    }

    #[test]
    fn implicit_id_is_slug_of_name() {
        let catalog = parse(SAMPLE).unwrap();
        let backflip = catalog.tricks.iter().find(|t| t.name == "backflip").unwrap();
        assert_eq!(backflip.id, "backflip");
    }

    #[test]
    fn explicit_id_and_difficulty() {
        let catalog = parse(SAMPLE).unwrap();
        let bhs = catalog.tricks.iter().find(|t| t.id == "bhs").unwrap();
        assert_eq!(bhs.name, "back handspring");
        assert_eq!(bhs.difficulty, Some(2));
    }

    #[test]
    fn refs_are_stored_verbatim() {
        let catalog = parse(SAMPLE).unwrap();
        let backflip = catalog.tricks.iter().find(|t| t.id == "backflip").unwrap();
        assert_eq!(
            backflip.prerequisite_refs,
            vec!["roundoff".to_string(), "back handspring".to_string()]
        );
    }

    #[test]
    fn tricks_in_filters_by_category() {
        let catalog = parse(SAMPLE).unwrap();
        assert_eq!(catalog.tricks_in("flips").len(), 4);
        assert_eq!(catalog.tricks_in("twists").len(), 1);
        assert!(catalog.tricks_in("missing").is_empty());
    }

    #[test]
    fn trick_before_header_is_an_error() {
        assert!(parse("cartwheel\n").is_err());
    }

    #[test]
    fn duplicate_trick_id_is_an_error() {
        let input = "[category: c]\nx = one\nx = two\n";
        assert!(parse(input).is_err());
    }

    #[test]
    fn duplicate_category_is_an_error() {
        assert!(parse("[category: c]\n[category: c]\n").is_err());
    }

    #[test]
    fn bad_difficulty_is_an_error() {
        assert!(parse("[category: c]\nbackflip (hard)\n").is_err());
    }

    #[test]
    fn empty_input_is_an_empty_catalog() {
        let catalog = parse("").unwrap();
        assert!(catalog.categories.is_empty());
        assert!(catalog.tricks.is_empty());
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slug("Back  Handspring"), "back-handspring");
        assert_eq!(slug("360° flip!"), "360-flip");
        assert_eq!(slug("  aerial  "), "aerial");
    }
}
