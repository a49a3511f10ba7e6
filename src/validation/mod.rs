//! Validation functionality
//!
//! Provides validation logic for:
//! - Input validation (table names, column names, schema uniqueness)
//! - SQL syntax checks of generated scripts

pub mod input;
pub mod sql;

pub use input::{
    ValidationError, ValidationResult, validate_column_name, validate_columns, validate_table_name,
};
pub use sql::{strip_shell_directives, validate_sql};
