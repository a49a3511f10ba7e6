//! Storage backend abstraction
//!
//! Defines the StorageBackend trait the script builder writes payloads through,
//! and its implementations:
//! - FileSystemStorageBackend: native file system
//! - MemoryStorageBackend: in-process map, for tests and dry runs

use std::path::{Path, PathBuf};

pub mod filesystem;
pub mod memory;

pub use filesystem::FileSystemStorageBackend;
pub use memory::MemoryStorageBackend;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Trait for storage backends
///
/// A write is a single scoped operation on one path. Implementations do not
/// retry and make no promise about what is left behind when a write fails.
pub trait StorageBackend {
    /// Write `content` to `path`, replacing any existing file
    fn write_text_file(&self, path: &Path, content: &str) -> Result<(), StorageError>;

    /// Write `lines` to `path`, each terminated by a newline
    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<(), StorageError> {
        let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        self.write_text_file(path, &content)
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for &T {
    fn write_text_file(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        (**self).write_text_file(path, content)
    }

    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<(), StorageError> {
        (**self).write_lines(path, lines)
    }
}
