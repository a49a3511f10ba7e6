//! Export functionality
//!
//! Turns an inferred column schema into load artifacts:
//! - SQL (drop/create DDL, bulk-import directives, null normalization)
//! - Delimited payload of the records in column order

pub mod format;
pub mod payload;
pub mod sql;

use crate::inference::InferenceError;
use crate::storage::StorageError;
use crate::validation::input::ValidationError;

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The caller broke the input contract (empty table name, bad delimiter)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("Payload encoding error: {0}")]
    Payload(String),
    /// Failure from the storage backend, passed through unchanged
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ValidationError> for ExportError {
    fn from(err: ValidationError) -> Self {
        ExportError::InvalidInput(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Payload(err.to_string())
    }
}

// Re-export for convenience
pub use format::{SqlPrettyPrinter, WhitespaceFormatter};
pub use payload::{DEFAULT_DELIMITER, PayloadWriter, render_value};
pub use sql::{
    BulkImportDialect, TableScript, TableScriptBuilder, TableScriptOptions, create_table_script,
};
