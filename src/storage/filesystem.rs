//! File system storage backend
//!
//! Writes payload files to the native file system at exactly the path given,
//! since the generated import script refers to that same path.

use std::fs;
use std::path::Path;

use tracing::info;

use super::{StorageBackend, StorageError};

/// File system storage backend
#[derive(Debug, Clone, Default)]
pub struct FileSystemStorageBackend {
    create_dirs: bool,
}

impl FileSystemStorageBackend {
    /// Create a backend that expects parent directories to exist
    ///
    /// # Example
    ///
    /// ```rust
    /// use table_script_sdk::storage::FileSystemStorageBackend;
    ///
    /// let backend = FileSystemStorageBackend::new().with_create_dirs(true);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create missing parent directories before writing
    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

impl StorageBackend for FileSystemStorageBackend {
    fn write_text_file(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        let io_error = |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        };

        if self.create_dirs
            && let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        fs::write(path, content).map_err(io_error)?;
        info!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }
}
