//! Caches for derived document facts.
//!
//! Two cache shapes cover the whole engine:
//!
//! - **[`FileCache`]**: process-wide, keyed by absolute path, validated
//!   against the file's modification time. Safe to share across documents
//!   because values depend only on file content.
//! - **[`CachedSlot`]**: a single per-document value, cleared by an explicit
//!   invalidation call when the buffer's contents change.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    mtime: SystemTime,
}

/// Path-keyed cache of values derived from file content.
///
/// `get_or_compute` revalidates against the file's current mtime on every
/// access; a changed mtime replaces the entry. Entries are never evicted —
/// the key space is "files touched in this editing session", bounded in
/// practice by user behavior.
pub struct FileCache<T: Clone> {
    entries: DashMap<PathBuf, CacheEntry<T>>,
}

impl<T: Clone> FileCache<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the cached value for `path`, computing it if the entry is
    /// missing or stale.
    ///
    /// Computation runs under the entry lock, so a second caller for the
    /// same path observes the first caller's finished value rather than
    /// computing again. Errors propagate and leave nothing cached; the next
    /// access retries.
    pub fn get_or_compute(
        &self,
        path: &Path,
        compute: impl FnOnce(&Path) -> Result<T>,
    ) -> Result<T> {
        let mtime = file_mtime(path)?;
        match self.entries.entry(path.to_path_buf()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().mtime == mtime {
                    tracing::trace!(path = %path.display(), "file cache hit");
                    return Ok(occupied.get().value.clone());
                }
                tracing::debug!(path = %path.display(), "file cache stale, recomputing");
                match compute(path) {
                    Ok(value) => {
                        occupied.insert(CacheEntry {
                            value: value.clone(),
                            mtime,
                        });
                        Ok(value)
                    }
                    Err(err) => {
                        occupied.remove();
                        Err(err)
                    }
                }
            }
            MapEntry::Vacant(vacant) => {
                tracing::debug!(path = %path.display(), "file cache miss");
                let value = compute(path)?;
                vacant.insert(CacheEntry {
                    value: value.clone(),
                    mtime,
                });
                Ok(value)
            }
        }
    }

    /// Drops the entry for one path, if present.
    pub fn invalidate(&self, path: &Path) {
        self.entries.remove(path);
    }

    /// Drops all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T: Clone> Default for FileCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn file_mtime(path: &Path) -> Result<SystemTime> {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// A single cached value with explicit invalidation.
///
/// The owning object calls [`invalidate`](Self::invalidate) from its
/// content-change handler; invalidation is an atomic replace-with-absent,
/// safe against an in-flight `get_or_compute` on another thread (it blocks
/// until the computed value is stored, then clears it).
#[derive(Debug, Default)]
pub struct CachedSlot<T: Clone> {
    slot: Mutex<Option<T>>,
}

impl<T: Clone> CachedSlot<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> T {
        let mut guard = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(value) = guard.as_ref() {
            return value.clone();
        }
        let value = compute();
        *guard = Some(value.clone());
        value
    }

    pub fn invalidate(&self) {
        let mut guard = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    #[cfg(test)]
    pub fn is_cached(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}
