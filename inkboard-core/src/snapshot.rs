//! Snapshot persistence and the published in-memory snapshot.
//!
//! The sync jobs write flat JSON files (atomic write via temp file +
//! rename) and publish the parsed result through a `SnapshotCell`, so
//! request handlers never observe a half-written value.

use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{InkboardError, InkboardResult};

/// Load a snapshot file. A missing file is not an error; it just means the
/// sync job has not produced one yet.
pub fn load_snapshot<T: DeserializeOwned>(path: &Path) -> InkboardResult<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&contents)
        .map_err(|e| InkboardError::Snapshot(format!("{}: {}", path.display(), e)))?;
    Ok(Some(value))
}

/// Save a snapshot file (atomic write via temp file + rename).
pub fn save_snapshot<T: Serialize>(path: &Path, value: &T) -> InkboardResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| InkboardError::Snapshot(format!("{} has no parent", path.display())))?;
    std::fs::create_dir_all(parent)?;

    let contents = serde_json::to_string(value)
        .map_err(|e| InkboardError::Snapshot(e.to_string()))?;

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, contents)?;

    // Atomic rename (on POSIX systems, rename is atomic if same filesystem)
    std::fs::rename(&temp_path, path)?;
    Ok(())
}

/// A shared value replaced wholesale by the sync job: readers clone the
/// current Arc, writers build the new value and swap the pointer.
#[derive(Debug)]
pub struct SnapshotCell<T> {
    inner: Arc<RwLock<Arc<T>>>,
}

impl<T> Clone for SnapshotCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> SnapshotCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(value))),
        }
    }

    /// Current published value.
    pub fn load(&self) -> Arc<T> {
        Arc::clone(&self.inner.read().expect("snapshot lock poisoned"))
    }

    /// Publish a new value.
    pub fn store(&self, value: T) {
        *self.inner.write().expect("snapshot lock poisoned") = Arc::new(value);
    }
}

impl<T: Clone> SnapshotCell<T> {
    /// Clone-modify-publish under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write().expect("snapshot lock poisoned");
        let mut value = guard.as_ref().clone();
        let result = f(&mut value);
        *guard = Arc::new(value);
        result
    }
}
