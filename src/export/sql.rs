//! Table script builder: DDL, bulk-import directives and payload for a set of
//! records.
//!
//! The generated DDL always has this shape:
//!
//! ```text
//! DROP TABLE IF EXISTS <table>;
//!
//! CREATE TABLE <table> (
//!   <col> <TYPE>[ NOT NULL],
//!   ...
//!   [PRIMARY KEY (<col>)]
//!   [, <extra constraint>]*
//! );
//! ```
//!
//! Column names are quoted only when they contain characters outside
//! `[A-Za-z0-9_]`. The table name is written exactly as given.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::ExportError;
use super::format::{SqlPrettyPrinter, WhitespaceFormatter};
use super::payload::{DEFAULT_DELIMITER, PayloadWriter, join_lines};
use crate::inference::{ColumnInferrer, InferenceConfig, InferenceStats, as_records};
use crate::models::Column;
use crate::storage::{FileSystemStorageBackend, StorageBackend};
use crate::validation::input::{validate_columns, validate_table_name};

/// Database engine whose bulk-load mechanism the import script targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkImportDialect {
    /// `sqlite3` shell `.import` in csv mode
    #[default]
    Sqlite,
    /// DuckDB `COPY ... FROM`
    #[serde(rename = "duckdb")]
    DuckDb,
}

impl BulkImportDialect {
    /// Render the directives loading `path` into `table_name`
    pub fn render_import(&self, path: &str, table_name: &str, delimiter: char) -> String {
        match self {
            BulkImportDialect::Sqlite => [
                "-- @formatter:off".to_string(),
                ".mode csv".to_string(),
                format!(".separator {}", shell_argument(&delimiter.to_string())),
                ".echo on".to_string(),
                format!(".import {} {}", shell_argument(path), table_name),
                ".echo off".to_string(),
                "-- @formatter:on".to_string(),
            ]
            .join("\n"),
            BulkImportDialect::DuckDb => format!(
                "COPY {} FROM '{}' (DELIMITER '{}', HEADER false, QUOTE '\"');",
                table_name,
                path.replace('\'', "''"),
                delimiter.to_string().replace('\'', "''")
            ),
        }
    }

    /// Whether blank imported fields arrive as empty strings and need an
    /// `UPDATE ... = NULL` afterwards.
    ///
    /// DuckDB's `COPY` already reads empty unquoted fields as NULL, and
    /// comparing a numeric column with `''` fails there.
    pub fn needs_null_normalization(&self) -> bool {
        match self {
            BulkImportDialect::Sqlite => true,
            BulkImportDialect::DuckDb => false,
        }
    }
}

/// Render one argument of a `sqlite3` shell dot-command.
///
/// The shell splits arguments on whitespace and resolves backslash escapes
/// inside double quotes, so anything other than a plain word is quoted.
fn shell_argument(value: &str) -> String {
    let plain = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '\\'));
    if plain {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\t' => quoted.push_str("\\t"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// Table-level options for a build
///
/// Serializable so it can be kept in a config file; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableScriptOptions {
    /// Schema to extend; these columns keep their order and types
    pub existing_columns: Vec<Column>,
    /// Column rendered as the table's primary key
    pub primary_key: Option<Column>,
    /// Field filtering and inference behavior
    pub inference: InferenceConfig,
    /// Raw table constraints appended after the columns, in order
    pub table_constraints: Vec<String>,
    /// File the import script loads from, and where the payload is written
    pub import_source: Option<PathBuf>,
    /// Render the records as a delimited payload
    pub emit_payload: bool,
    /// Payload field delimiter
    pub delimiter: char,
    /// Engine the import script is written for
    pub dialect: BulkImportDialect,
}

impl Default for TableScriptOptions {
    fn default() -> Self {
        Self {
            existing_columns: Vec::new(),
            primary_key: None,
            inference: InferenceConfig::default(),
            table_constraints: Vec::new(),
            import_source: None,
            emit_payload: true,
            delimiter: DEFAULT_DELIMITER,
            dialect: BulkImportDialect::default(),
        }
    }
}

/// Output of a build
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableScript {
    /// Table the script creates
    pub table_name: String,
    /// Final column schema
    pub columns: Vec<Column>,
    /// Payload field delimiter the import script was rendered with
    pub delimiter: char,
    /// DDL, import directives and null normalization joined into one script
    pub sql_cmd: String,
    /// Drop and create statements
    pub ddl: String,
    /// Bulk-import directives, when an import source was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_script: Option<String>,
    /// `UPDATE` statements turning blank imported strings into NULL
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub null_normalization: Vec<String>,
    /// Records rendered in column order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_as_payload: Option<String>,
    /// Where the payload was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_file: Option<PathBuf>,
    /// Inference diagnostics
    pub stats: InferenceStats,
}

/// Builds a [`TableScript`] from records
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use table_script_sdk::export::TableScriptBuilder;
/// use table_script_sdk::models::{Column, ValueType};
///
/// let records = vec![json!({"id": 1, "name": "a"}), json!({"id": 2, "name": null})];
/// let script = TableScriptBuilder::new("people")
///     .primary_key(Column::new("id", ValueType::Integer))
///     .build(&records)
///     .unwrap();
///
/// assert!(script.ddl.contains("id INTEGER NOT NULL,\n  name TEXT,\n  PRIMARY KEY (id)"));
/// assert_eq!(script.rows_as_payload.as_deref(), Some("1|a\n2|\n"));
/// ```
pub struct TableScriptBuilder {
    table_name: String,
    options: TableScriptOptions,
    printer: Box<dyn SqlPrettyPrinter>,
}

impl TableScriptBuilder {
    /// Create a builder for `table_name` with default options
    pub fn new(table_name: impl Into<String>) -> Self {
        Self::with_options(table_name, TableScriptOptions::default())
    }

    /// Create a builder from a full set of options
    pub fn with_options(table_name: impl Into<String>, options: TableScriptOptions) -> Self {
        Self {
            table_name: table_name.into(),
            options,
            printer: Box::new(WhitespaceFormatter),
        }
    }

    /// The options in use
    pub fn options(&self) -> &TableScriptOptions {
        &self.options
    }

    /// Seed the schema with columns from a previous build
    pub fn existing_columns(mut self, columns: Vec<Column>) -> Self {
        self.options.existing_columns = columns;
        self
    }

    /// Add a `PRIMARY KEY` clause on `column`
    pub fn primary_key(mut self, column: Column) -> Self {
        self.options.primary_key = Some(column);
        self
    }

    /// Set the inference configuration (filters, attribute prefix, ...)
    pub fn inference_config(mut self, config: InferenceConfig) -> Self {
        self.options.inference = config;
        self
    }

    /// Append a raw table constraint such as `UNIQUE (a, b)`
    pub fn table_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.options.table_constraints.push(constraint.into());
        self
    }

    /// Append several raw table constraints
    pub fn table_constraints<I, S>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options
            .table_constraints
            .extend(constraints.into_iter().map(Into::into));
        self
    }

    /// Generate an import script loading from `path`
    pub fn import_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.import_source = Some(path.into());
        self
    }

    /// Enable or disable payload rendering
    pub fn emit_payload(mut self, emit: bool) -> Self {
        self.options.emit_payload = emit;
        self
    }

    /// Set the payload delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    /// Set the engine the import script targets
    pub fn dialect(mut self, dialect: BulkImportDialect) -> Self {
        self.options.dialect = dialect;
        self
    }

    /// Replace the SQL pretty-printer
    pub fn pretty_printer(mut self, printer: impl SqlPrettyPrinter + 'static) -> Self {
        self.printer = Box::new(printer);
        self
    }

    /// Build the script, writing the payload to the file system when both an
    /// import source and payload rendering are enabled
    pub fn build(&self, records: &[Value]) -> Result<TableScript, ExportError> {
        self.build_with_storage(records, &FileSystemStorageBackend::new())
    }

    /// Build the script, writing the payload through `storage`.
    ///
    /// All validation and rendering happens before the write, so an error
    /// leaves nothing behind except possibly a partially written payload
    /// file when the write itself fails.
    pub fn build_with_storage(
        &self,
        records: &[Value],
        storage: &dyn StorageBackend,
    ) -> Result<TableScript, ExportError> {
        let table_name = self.table_name.as_str();
        validate_table_name(table_name)?;
        let writer = PayloadWriter::new(self.options.delimiter)?;

        let inferrer = ColumnInferrer::with_config(self.options.inference.clone())?;
        let mut columns = self.options.existing_columns.clone();
        let stats = inferrer.infer(records, &mut columns)?;
        validate_columns(&columns)?;

        let ddl = self.printer.pretty_print(&self.render_ddl(&columns));
        let mut parts = vec![ddl.clone()];

        let mut import_script = None;
        let mut null_normalization = Vec::new();
        if let Some(path) = &self.options.import_source {
            let script = self.options.dialect.render_import(
                &path_to_string(path),
                table_name,
                writer.delimiter(),
            );
            parts.push(script.clone());
            import_script = Some(script);

            if self.options.dialect.needs_null_normalization() {
                null_normalization = columns
                    .iter()
                    .filter(|col| col.has_nulls)
                    .map(|col| col.to_null_normalization(table_name))
                    .collect();
            }
            if !null_normalization.is_empty() {
                parts.push(self.printer.pretty_print(&null_normalization.join("\n\n")));
            }
        }

        let sql_cmd = parts
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut rows_as_payload = None;
        let mut payload_file = None;
        if self.options.emit_payload {
            let lines = writer.render_lines(&as_records(records)?, &columns)?;
            if let Some(path) = &self.options.import_source {
                storage.write_lines(path, &lines)?;
                payload_file = Some(path.clone());
            }
            rows_as_payload = Some(join_lines(&lines));
        }

        info!(
            table = %table_name,
            columns = columns.len(),
            records = stats.records_processed,
            type_mismatches = stats.type_mismatches,
            payload_file = ?payload_file,
            "Built table script"
        );

        Ok(TableScript {
            table_name: table_name.to_string(),
            columns,
            delimiter: writer.delimiter(),
            sql_cmd,
            ddl,
            import_script,
            null_normalization,
            rows_as_payload,
            payload_file,
            stats,
        })
    }

    fn render_ddl(&self, columns: &[Column]) -> String {
        let mut clauses: Vec<String> = columns.iter().map(Column::to_column_definition).collect();

        if let Some(pk) = &self.options.primary_key {
            clauses.push(pk.to_primary_key());
        }
        clauses.extend(self.options.table_constraints.iter().cloned());

        let body = if clauses.is_empty() {
            String::new()
        } else {
            format!("  {}\n", clauses.join(",\n  "))
        };

        format!(
            "DROP TABLE IF EXISTS {table};\n\nCREATE TABLE {table} (\n{body});",
            table = self.table_name
        )
    }
}

/// Build a table script in one call
pub fn create_table_script(
    table_name: &str,
    records: &[Value],
    options: TableScriptOptions,
) -> Result<TableScript, ExportError> {
    TableScriptBuilder::with_options(table_name, options).build(records)
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
