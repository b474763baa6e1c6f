//! Paths and discovery for the `trix/` data directory.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Walk upward from `start` to find the directory containing
/// `trix/catalog.trix`.
pub fn find_root_from(start: &Path) -> Result<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join("trix").join("catalog.trix").exists() {
            return Ok(dir.to_path_buf());
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => bail!("no trix catalog found — run `trix init` to create one"),
        }
    }
}

/// Walk upward from the current working directory to find the root.
pub fn find_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    find_root_from(&cwd)
}

pub fn trix_dir(root: &Path) -> PathBuf {
    root.join("trix")
}

pub fn catalog_path(root: &Path) -> PathBuf {
    root.join("trix").join("catalog.trix")
}

pub fn progress_path(root: &Path) -> PathBuf {
    root.join("trix").join("progress.trix")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_root_from_direct() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("trix")).unwrap();
        fs::write(dir.path().join("trix/catalog.trix"), "").unwrap();
        let root = find_root_from(dir.path()).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn find_root_from_subdir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("trix")).unwrap();
        fs::write(dir.path().join("trix/catalog.trix"), "").unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        let root = find_root_from(&dir.path().join("a/b")).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn find_root_fails_without_init() {
        let dir = TempDir::new().unwrap();
        assert!(find_root_from(dir.path()).is_err());
    }
}
