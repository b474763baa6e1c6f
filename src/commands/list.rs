//! `trix list` — print categories and tricks in catalog order.

use anyhow::Result;

use crate::parser::catalog::Catalog;
use crate::store::FileStore;

pub fn run() -> Result<()> {
    let store = FileStore::open()?;
    let lines = list_lines(store.catalog());
    if lines.is_empty() {
        println!("  Catalog is empty.");
    } else {
        for line in lines {
            println!("  {}", line);
        }
    }
    Ok(())
}

fn list_lines(catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();
    for category in &catalog.categories {
        lines.push(format!("[{}] {}", category.id, category.name));
        for trick in catalog.tricks_in(&category.id) {
            let difficulty = trick
                .difficulty
                .map(|d| format!(" ({})", d))
                .unwrap_or_default();
            if trick.prerequisite_refs.is_empty() {
                lines.push(format!("  {}{}", trick.name, difficulty));
            } else {
                lines.push(format!(
                    "  {}{} <- {}",
                    trick.name,
                    difficulty,
                    trick.prerequisite_refs.join(", ")
                ));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::catalog;

    #[test]
    fn lists_categories_with_their_tricks() {
        let parsed = catalog::parse(
            "[category: flips | Flips]\ncartwheel\nroundoff (1): cartwheel\n\
             [category: twists]\nfull twist (5): backflip\n",
        )
        .unwrap();
        let lines = list_lines(&parsed);
        assert_eq!(
            lines,
            vec![
                "[flips] Flips".to_string(),
                "  cartwheel".to_string(),
                "  roundoff (1) <- cartwheel".to_string(),
                "[twists] twists".to_string(),
                "  full twist (5) <- backflip".to_string(),
            ]
        );
    }

    #[test]
    fn empty_catalog_lists_nothing() {
        let parsed = catalog::parse("").unwrap();
        assert!(list_lines(&parsed).is_empty());
    }
}
