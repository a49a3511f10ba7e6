//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

use crate::export::ExportError;
use crate::inference::InferenceError;
use crate::validation::ValidationError;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {}: {}", .0.display(), .1)]
    FileReadError(PathBuf, String),

    #[error("Failed to write {}: {}", .0.display(), .1)]
    FileWriteError(PathBuf, String),

    /// Input was neither a JSON array nor newline-delimited JSON
    #[error("Invalid records: {0}")]
    InvalidRecords(String),

    #[error("Invalid config file {}: {}", .0.display(), .1)]
    ConfigError(PathBuf, String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
