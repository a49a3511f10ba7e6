//! Error types for column inference

use thiserror::Error;

/// Errors that can occur during column inference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// A record was not a JSON object
    #[error("Invalid record at index {index}: expected object, found {found}")]
    InvalidRecord { index: usize, found: &'static str },

    /// An ignore pattern failed to compile
    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
