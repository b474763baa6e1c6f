//! `trix init` — create the `trix/` data directory with a starter catalog.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::paths;

const SAMPLE_CATALOG: &str = "\
# trix catalog
#
# [category: <id> | <display name>]
# [<id> =] <name> [(<difficulty>)] [: <prerequisite>, <prerequisite>, ...]
#
# Prerequisites may name a trick by its name or its id; small typos are
# tolerated.

[category: flips | Flips]

cartwheel
roundoff (1): cartwheel
bhs = back handspring (2): roundoff
backflip (3): roundoff, back handspring
";

pub fn run() -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root)
}

pub fn run_in(root: &Path) -> Result<()> {
    let dir = paths::trix_dir(root);
    if paths::catalog_path(root).exists() {
        bail!("trix is already initialised (trix/catalog.trix exists)");
    }

    fs::create_dir_all(&dir)?;
    fs::write(paths::catalog_path(root), SAMPLE_CATALOG)?;
    println!("  {} trix/catalog.trix", "Created".green().bold());
    fs::write(paths::progress_path(root), "")?;
    println!("  {} trix/progress.trix", "Created".green().bold());
    println!(
        "  {}",
        "Edit the catalog, then try `trix check` and `trix layout --category flips`.".dark_grey()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::catalog;
    use tempfile::TempDir;

    #[test]
    fn init_creates_parseable_sample() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();

        let text = fs::read_to_string(paths::catalog_path(dir.path())).unwrap();
        let parsed = catalog::parse(&text).unwrap();
        assert_eq!(parsed.categories.len(), 1);
        assert_eq!(parsed.tricks.len(), 4);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        assert!(run_in(dir.path()).is_err());
    }
}
