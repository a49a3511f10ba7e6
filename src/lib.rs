//! Table Script SDK - schema inference and bulk-load scripts for loosely-typed records
//!
//! Provides:
//! - Column inference from JSON object records (types, nullability, ordering)
//! - Table script generation (drop/create DDL, bulk-import directives,
//!   null normalization, delimited payload)
//! - Storage backends for writing payload files
//! - Validation of names and generated SQL
//! - An embedded SQLite loader (`sqlite` feature)

pub mod export;
pub mod inference;
pub mod models;
pub mod storage;
pub mod validation;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use export::{
    BulkImportDialect, ExportError, PayloadWriter, SqlPrettyPrinter, TableScript,
    TableScriptBuilder, TableScriptOptions, create_table_script,
};
pub use inference::{
    ColumnInferrer, InferenceConfig, InferenceError, InferenceStats, add_columns_from_records,
};
pub use models::{Column, Record, ValueType};
pub use storage::{FileSystemStorageBackend, MemoryStorageBackend, StorageBackend, StorageError};
pub use validation::ValidationError;
