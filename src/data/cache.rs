use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::model::Table;
use crate::error::LoadError;

/// Identity of a source file: its path plus what the filesystem reports
/// about its current content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceKey {
    /// `None` when the file cannot be inspected (e.g. it does not exist).
    pub fn for_path(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(SourceKey {
            path: path.to_path_buf(),
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Cleaned tables keyed by source identity.
///
/// A cached table is shared read-only; an edited file gets a new key and
/// is loaded again.  Failed loads are not cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Arc<Table>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, or run `load` and remember it.
    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> Result<Arc<Table>, LoadError>
    where
        F: FnOnce(&Path) -> Result<Table, LoadError>,
    {
        let Some(key) = SourceKey::for_path(path) else {
            // Let the loader report the problem.
            return load(path).map(Arc::new);
        };

        if let Some(table) = self.entries.get(&key) {
            log::debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load(path)?);
        // Older versions of the same file are stale now.
        self.entries.retain(|k, _| k.path != key.path);
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;

    #[test]
    fn test_second_load_is_a_hit() {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(b"a\n1\n").unwrap();
        f.flush().unwrap();

        let calls = Cell::new(0);
        let mut cache = DatasetCache::new();
        let loader = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok::<_, LoadError>(Table::default())
        };

        let first = cache.get_or_load(f.path(), loader).unwrap();
        let second = cache.get_or_load(f.path(), loader).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_content_reloads() {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(b"a\n1\n").unwrap();
        f.flush().unwrap();

        let calls = Cell::new(0);
        let mut cache = DatasetCache::new();
        let loader = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok::<_, LoadError>(Table::default())
        };

        cache.get_or_load(f.path(), loader).unwrap();
        f.write_all(b"2\n3\n").unwrap();
        f.flush().unwrap();
        cache.get_or_load(f.path(), loader).unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut cache = DatasetCache::new();
        let result = cache.get_or_load(Path::new("/no/such/file.csv"), |p| {
            Err(LoadError::NotFound {
                path: p.to_path_buf(),
            })
        });
        assert!(result.is_err());
        assert_eq!(cache.len(), 0);
    }
}
