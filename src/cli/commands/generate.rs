//! Generate command implementation

use std::path::PathBuf;

use tracing::info;

use crate::cli::error::CliError;
use crate::export::{BulkImportDialect, TableScriptBuilder};
use crate::models::{Column, ValueType};
use crate::validation::{strip_shell_directives, validate_sql};

use super::{SourceArgs, write_output};

/// Arguments for the `generate` command
pub struct GenerateArgs {
    pub source: SourceArgs,
    /// Target table name
    pub table: String,
    /// Column to declare as primary key
    pub primary_key: Option<String>,
    /// Raw table constraints appended after the columns
    pub constraints: Vec<String>,
    /// Payload file the import script loads from
    pub import_file: Option<PathBuf>,
    /// Skip payload rendering
    pub no_payload: bool,
    /// Override for the payload delimiter
    pub delimiter: Option<char>,
    /// Override for the import dialect (sqlite, duckdb)
    pub dialect: Option<String>,
    /// Parse the generated SQL before writing it
    pub check: bool,
    /// Output format (sql, json, yaml)
    pub format: String,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
}

/// Handle the `generate` command
pub fn handle_generate(args: &GenerateArgs) -> Result<(), CliError> {
    let mut options = args.source.resolve_options()?;
    let records = args.source.load_records()?;

    if let Some(name) = &args.primary_key {
        let column = options
            .existing_columns
            .iter()
            .find(|col| &col.name == name)
            .cloned()
            .unwrap_or_else(|| Column::new(name.clone(), ValueType::Text));
        options.primary_key = Some(column);
    }
    options
        .table_constraints
        .extend(args.constraints.iter().cloned());
    if let Some(path) = &args.import_file {
        options.import_source = Some(path.clone());
    }
    if args.no_payload {
        options.emit_payload = false;
    }
    if let Some(delimiter) = args.delimiter {
        options.delimiter = delimiter;
    }
    if let Some(dialect) = &args.dialect {
        options.dialect = parse_dialect(dialect)?;
    }

    let script = TableScriptBuilder::with_options(args.table.clone(), options).build(&records)?;

    if args.check {
        let statements = validate_sql(&strip_shell_directives(&script.sql_cmd))?;
        info!(statements, "Generated SQL parsed");
    }

    let output_str = match args.format.as_str() {
        "sql" => script.sql_cmd.clone(),
        "json" => serde_json::to_string_pretty(&script)
            .map_err(|e| CliError::Serialization(e.to_string()))?,
        "yaml" => {
            serde_yaml::to_string(&script).map_err(|e| CliError::Serialization(e.to_string()))?
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}",
                other
            )));
        }
    };

    write_output(args.output.as_deref(), &output_str)
}

fn parse_dialect(name: &str) -> Result<BulkImportDialect, CliError> {
    match name.to_lowercase().as_str() {
        "sqlite" => Ok(BulkImportDialect::Sqlite),
        "duckdb" => Ok(BulkImportDialect::DuckDb),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown dialect: {}",
            other
        ))),
    }
}
