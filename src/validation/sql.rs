//! Syntax checks for generated SQL

use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use super::input::{ValidationError, ValidationResult};

/// Parse `sql` with the SQLite dialect and return the number of statements.
///
/// Shell directives (lines starting with `.`) are not SQL; strip them first
/// with [`strip_shell_directives`] when checking a full import script.
///
/// ```
/// use table_script_sdk::validation::sql::validate_sql;
///
/// assert_eq!(validate_sql("DROP TABLE IF EXISTS t; CREATE TABLE t (a TEXT);"), Ok(2));
/// assert!(validate_sql("CREATE TABLE t (").is_err());
/// ```
pub fn validate_sql(sql: &str) -> ValidationResult<usize> {
    let dialect = SQLiteDialect {};
    let statements =
        Parser::parse_sql(&dialect, sql).map_err(|e| ValidationError::InvalidSql(e.to_string()))?;
    Ok(statements.len())
}

/// Remove SQLite shell dot-commands, keeping plain SQL and comments
pub fn strip_shell_directives(script: &str) -> String {
    script
        .lines()
        .filter(|line| !line.trim_start().starts_with('.'))
        .collect::<Vec<_>>()
        .join("\n")
}
