use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::load_movies;
use super::model::MovieTable;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// TableStore – explicit owner of the loaded table
// ---------------------------------------------------------------------------

/// Holds the table loaded from `path` and hands out shared, read-only
/// references to it.
///
/// The cached table is reused until the file's modification time changes or
/// [`TableStore::invalidate`] is called. Another path means another store.
/// A failed load is remembered the same way and not retried until then.
#[derive(Debug)]
pub struct TableStore {
    path: PathBuf,
    cached: Option<CachedTable>,
    failed: Option<FailedLoad>,
}

#[derive(Debug)]
struct CachedTable {
    modified: Option<SystemTime>,
    table: Arc<MovieTable>,
}

#[derive(Debug)]
struct FailedLoad {
    modified: Option<SystemTime>,
    error: LoadError,
}

impl TableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
            failed: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the cached table so the next [`get`](Self::get) re-reads the file.
    pub fn invalidate(&mut self) {
        self.cached = None;
        self.failed = None;
    }

    /// Whether [`get`](Self::get) would hit the file system.
    pub fn is_stale(&self) -> bool {
        let modified = modified_time(&self.path);
        if let Some(failed) = &self.failed {
            return failed.modified != modified;
        }
        match &self.cached {
            None => true,
            Some(cached) => cached.modified != modified,
        }
    }

    /// Return the table, reloading it first when stale.
    ///
    /// While the file is unchanged since a failed load, the same error is
    /// returned without reading the file again.
    pub fn get(&mut self) -> Result<Arc<MovieTable>, LoadError> {
        if !self.is_stale() {
            if let Some(failed) = &self.failed {
                return Err(failed.error.clone());
            }
            if let Some(cached) = &self.cached {
                log::debug!("table cache hit for {}", self.path.display());
                return Ok(Arc::clone(&cached.table));
            }
        }

        log::debug!("loading table from {}", self.path.display());
        let modified = modified_time(&self.path);
        match load_movies(&self.path) {
            Ok(table) => {
                let table = Arc::new(table);
                self.failed = None;
                self.cached = Some(CachedTable {
                    modified,
                    table: Arc::clone(&table),
                });
                Ok(table)
            }
            Err(error) => {
                self.failed = Some(FailedLoad {
                    modified,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
