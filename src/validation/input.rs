//! Input validation for table and column names.
//!
//! Names are not checked against SQL reserved words: the builder quotes
//! column names that need it and passes table names through as given, so a
//! caller may use a schema-qualified table name such as `main.events`.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::Column;

/// Errors that can occur during input validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input contains invalid characters
    #[error("{field} contains invalid characters: {reason}")]
    InvalidCharacters { field: &'static str, reason: String },

    /// The same column name appears twice in a schema
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Generated SQL failed to parse
    #[error("SQL validation failed: {0}")]
    InvalidSql(String),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a table name.
///
/// # Rules
///
/// - Must contain something other than whitespace
/// - Must not contain control characters (a line break would split the
///   generated statements)
///
/// # Examples
///
/// ```
/// use table_script_sdk::validation::input::validate_table_name;
///
/// assert!(validate_table_name("users").is_ok());
/// assert!(validate_table_name("main.user_orders").is_ok());
/// assert!(validate_table_name("").is_err());
/// assert!(validate_table_name("   ").is_err());
/// ```
pub fn validate_table_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty("table name"));
    }

    if let Some(c) = name.chars().find(|c| c.is_control()) {
        return Err(ValidationError::InvalidCharacters {
            field: "table name",
            reason: format!("control character {:?}", c),
        });
    }

    Ok(())
}

/// Validate a column name.
///
/// Any non-empty name is accepted; names outside `[A-Za-z0-9_]` are quoted
/// when rendered.
///
/// ```
/// use table_script_sdk::validation::input::validate_column_name;
///
/// assert!(validate_column_name("first name").is_ok());
/// assert!(validate_column_name("").is_err());
/// ```
pub fn validate_column_name(name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Empty("column name"));
    }
    Ok(())
}

/// Validate a whole schema: every name non-empty and unique.
pub fn validate_columns(columns: &[Column]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for col in columns {
        validate_column_name(&col.name)?;
        if !seen.insert(col.name.as_str()) {
            return Err(ValidationError::DuplicateColumn(col.name.clone()));
        }
    }
    Ok(())
}
