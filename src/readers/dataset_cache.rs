use crate::error::Result;
use crate::models::Dataset;
use crate::readers::AqiReader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;
use tracing::debug;

/// Identity of a source file: where it is and what it looked like on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceKey {
    pub fn for_path(path: &Path) -> Result<Self> {
        let path = std::fs::canonicalize(path)?;
        let metadata = std::fs::metadata(&path)?;

        Ok(Self {
            path,
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Memoizes loaded datasets per source file. An entry is reused only while
/// the file's size and modification time are unchanged.
pub struct DatasetCache {
    reader: AqiReader,
    entries: Mutex<HashMap<PathBuf, (SourceKey, Arc<Dataset>)>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::with_reader(AqiReader::new())
    }

    pub fn with_reader(reader: AqiReader) -> Self {
        Self {
            reader,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Dataset>> {
        let key = SourceKey::for_path(path)?;

        if let Some((cached_key, dataset)) = self.lock().get(&key.path) {
            if *cached_key == key {
                debug!(path = %key.path.display(), "Dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
            debug!(path = %key.path.display(), "Source changed, reloading dataset");
        } else {
            debug!(path = %key.path.display(), "Dataset cache miss");
        }

        // Parse outside the lock; a failed load leaves the old entry untouched
        let dataset = Arc::new(self.reader.read_dataset(&key.path)?);
        self.lock()
            .insert(key.path.clone(), (key, Arc::clone(&dataset)));

        Ok(dataset)
    }

    /// Drop the entry for `path`; returns whether one existed
    pub fn invalidate(&self, path: &Path) -> bool {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.lock().remove(&path).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, (SourceKey, Arc<Dataset>)>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}
