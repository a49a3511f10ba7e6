//! Infer command implementation

use std::path::PathBuf;

use crate::cli::error::CliError;
use crate::cli::output::format_schema_table;
use crate::inference::ColumnInferrer;

use super::{SourceArgs, write_output};

/// Arguments for the `infer` command
pub struct InferArgs {
    pub source: SourceArgs,
    /// Output format (table, json, yaml)
    pub format: String,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
}

/// Handle the `infer` command
pub fn handle_infer(args: &InferArgs) -> Result<(), CliError> {
    let options = args.source.resolve_options()?;
    let records = args.source.load_records()?;

    let inferrer = ColumnInferrer::with_config(options.inference)?;
    let mut columns = options.existing_columns;
    let stats = inferrer.infer(&records, &mut columns)?;

    let output_str = match args.format.as_str() {
        "table" => format_schema_table(&columns, &stats),
        "json" => serde_json::to_string_pretty(&columns)
            .map_err(|e| CliError::Serialization(e.to_string()))?,
        "yaml" => {
            serde_yaml::to_string(&columns).map_err(|e| CliError::Serialization(e.to_string()))?
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
