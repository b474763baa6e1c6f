//! Store collaborators: where trick records and completion facts live.
//!
//! The engine never touches the filesystem itself; it talks to a `Store`.
//! `FileStore` backs the CLI with the `trix/` directory; `MemoryStore` backs
//! tests, including a failure switch to exercise the optimistic-toggle
//! rollback path.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::engine::model::{Category, TrickId, TrickRecord};
use crate::parser::{catalog, progress};
use crate::paths;

/// External data-store interface the engine consumes.
///
/// Fetch methods fail only on infrastructure problems (unreadable files);
/// an unknown category is `Ok(None)`, not an error.
pub trait Store {
    fn category_by_id(&self, category_id: &str) -> Result<Option<Category>>;
    fn list_tricks(&self, category_id: &str) -> Result<Vec<TrickRecord>>;
    fn list_completed(&self, user_id: &str) -> Result<Vec<TrickId>>;
    fn set_completed(&mut self, user_id: &str, trick_id: &str, value: bool) -> Result<()>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Store over `trix/catalog.trix` and `trix/progress.trix`.
///
/// The catalog is loaded once at open; progress is re-read before every
/// write so concurrent edits from another terminal are not clobbered.
pub struct FileStore {
    catalog: catalog::Catalog,
    progress_path: PathBuf,
}

impl FileStore {
    /// Open the store for the repo containing the current directory.
    pub fn open() -> Result<Self> {
        let root = paths::find_root()?;
        Self::open_at(paths::catalog_path(&root), paths::progress_path(&root))
    }

    pub fn open_at(catalog_path: PathBuf, progress_path: PathBuf) -> Result<Self> {
        let text = fs::read_to_string(&catalog_path)
            .with_context(|| format!("cannot read {}", catalog_path.display()))?;
        let catalog = catalog::parse(&text)
            .with_context(|| format!("cannot parse {}", catalog_path.display()))?;
        Ok(Self {
            catalog,
            progress_path,
        })
    }

    pub fn catalog(&self) -> &catalog::Catalog {
        &self.catalog
    }

    fn load_progress(&self) -> Result<progress::Progress> {
        if !self.progress_path.exists() {
            return Ok(progress::Progress::default());
        }
        let text = fs::read_to_string(&self.progress_path)
            .with_context(|| format!("cannot read {}", self.progress_path.display()))?;
        progress::parse(&text)
            .with_context(|| format!("cannot parse {}", self.progress_path.display()))
    }
}

impl Store for FileStore {
    fn category_by_id(&self, category_id: &str) -> Result<Option<Category>> {
        Ok(self.catalog.category(category_id).cloned())
    }

    fn list_tricks(&self, category_id: &str) -> Result<Vec<TrickRecord>> {
        Ok(self.catalog.tricks_in(category_id))
    }

    fn list_completed(&self, user_id: &str) -> Result<Vec<TrickId>> {
        Ok(self.load_progress()?.completed_for(user_id))
    }

    fn set_completed(&mut self, user_id: &str, trick_id: &str, value: bool) -> Result<()> {
        let mut progress = self.load_progress()?;
        progress.set_completed(user_id, trick_id, value);
        fs::write(&self.progress_path, progress::serialize(&progress))
            .with_context(|| format!("cannot write {}", self.progress_path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory store for tests, with a switch to simulate a store that
/// accepts reads but fails writes.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub categories: Vec<Category>,
    pub tricks: Vec<TrickRecord>,
    pub progress: progress::Progress,
    /// When set, `set_completed` fails without applying the write.
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new(categories: Vec<Category>, tricks: Vec<TrickRecord>) -> Self {
        Self {
            categories,
            tricks,
            progress: progress::Progress::default(),
            fail_writes: false,
        }
    }
}

#[cfg(test)]
impl Store for MemoryStore {
    fn category_by_id(&self, category_id: &str) -> Result<Option<Category>> {
        Ok(self.categories.iter().find(|c| c.id == category_id).cloned())
    }

    fn list_tricks(&self, category_id: &str) -> Result<Vec<TrickRecord>> {
        Ok(self
            .tricks
            .iter()
            .filter(|t| t.category_id == category_id)
            .cloned()
            .collect())
    }

    fn list_completed(&self, user_id: &str) -> Result<Vec<TrickId>> {
        Ok(self.progress.completed_for(user_id))
    }

    fn set_completed(&mut self, user_id: &str, trick_id: &str, value: bool) -> Result<()> {
        if self.fail_writes {
            bail!("store is offline");
        }
        self.progress.set_completed(user_id, trick_id, value);
        Ok(())
    }
}
