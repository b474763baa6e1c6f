//! `trix check` — build every category graph and report what's wrong.
//!
//! Unresolved prerequisite refs are warnings: the catalog still works, those
//! edges are just missing. Cycles are fatal because no layout exists for
//! them.

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::engine::build;
use crate::engine::error::{EngineError, StructuralWarning};
use crate::engine::model::CompletionSet;
use crate::parser::catalog::Catalog;
use crate::store::FileStore;

pub fn run(category: Option<&str>) -> Result<()> {
    let store = FileStore::open()?;
    let catalog = store.catalog();

    if let Some(id) = category
        && catalog.category(id).is_none()
    {
        bail!("{}", EngineError::CategoryNotFound {
            category_id: id.to_string(),
        });
    }

    let mut clean = true;
    let mut fatal = false;

    for cat in &catalog.categories {
        if category.is_some_and(|id| id != cat.id) {
            continue;
        }
        match check_category(catalog, &cat.id) {
            Ok(warnings) => {
                for warning in &warnings {
                    clean = false;
                    println!("  {} {}", "warning:".yellow().bold(), warning);
                }
            }
            Err(err) => {
                clean = false;
                fatal = true;
                println!("  {} {}", "error:".red().bold(), err);
            }
        }
    }

    if clean {
        println!("  {}", "Catalog is clean.".green());
    }
    if fatal {
        bail!("catalog has fatal errors");
    }
    Ok(())
}

/// Build one category's graph and return its structural warnings.
/// Completion state is irrelevant for checking, so an empty set is used.
fn check_category(catalog: &Catalog, category_id: &str) -> Result<Vec<StructuralWarning>, EngineError> {
    let tricks = catalog.tricks_in(category_id);
    let graph = build::build(&tricks, &CompletionSet::new())?;
    Ok(graph.warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::catalog;

    #[test]
    fn clean_catalog_has_no_warnings() {
        let parsed =
            catalog::parse("[category: c]\ncartwheel\nroundoff: cartwheel\n").unwrap();
        assert!(check_category(&parsed, "c").unwrap().is_empty());
    }

    #[test]
    fn unresolvable_ref_is_a_warning_not_an_error() {
        let parsed =
            catalog::parse("[category: c]\ncartwheel\nroundoff: no such trick anywhere\n").unwrap();
        let warnings = check_category(&parsed, "c").unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].raw_ref, "no such trick anywhere");
    }

    #[test]
    fn cycle_is_fatal() {
        let parsed = catalog::parse("[category: c]\naa: bb\nbb: aa\n").unwrap();
        let err = check_category(&parsed, "c").unwrap_err();
        assert!(matches!(err, EngineError::CyclicDependency { .. }));
    }
}
