//! In-memory storage backend

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{StorageBackend, StorageError};

/// Keeps written files in a map instead of touching disk
#[derive(Debug, Default)]
pub struct MemoryStorageBackend {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content last written to `path`
    pub fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(path.as_ref()).cloned())
    }

    /// Paths written so far, in sorted order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl StorageBackend for MemoryStorageBackend {
    fn write_text_file(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        let mut files = self
            .files
            .lock()
            .map_err(|e| StorageError::BackendError(format!("Lock poisoned: {}", e)))?;
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
