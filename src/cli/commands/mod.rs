//! CLI command implementations

pub mod generate;
pub mod infer;

use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::cli::error::CliError;
use crate::export::TableScriptOptions;
use crate::models::Column;

pub use generate::{GenerateArgs, handle_generate};
pub use infer::{InferArgs, handle_infer};

/// Record source and schema options shared by every command
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    /// Records file, or `-` for stdin
    pub input: String,
    /// TOML file holding `TableScriptOptions`
    pub config: Option<PathBuf>,
    /// JSON file holding a previously inferred column list
    pub existing_schema: Option<PathBuf>,
    /// Regexes for field names to skip
    pub ignore: Vec<String>,
    /// Allow-list of field names
    pub only: Vec<String>,
    /// Override for the attribute prefix
    pub attribute_prefix: Option<String>,
    /// Create TEXT columns for fields that were only ever null
    pub include_null_columns: bool,
    /// Do not treat absent fields as nulls
    pub ignore_missing: bool,
}

impl SourceArgs {
    /// Options from the config file, with command-line flags applied on top
    pub fn resolve_options(&self) -> Result<TableScriptOptions, CliError> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => TableScriptOptions::default(),
        };

        if let Some(path) = &self.existing_schema {
            options.existing_columns = load_schema(path)?;
        }
        options
            .inference
            .ignore_patterns
            .extend(self.ignore.iter().cloned());
        if !self.only.is_empty() {
            options
                .inference
                .only_names
                .get_or_insert_with(Default::default)
                .extend(self.only.iter().cloned());
        }
        if let Some(prefix) = &self.attribute_prefix {
            options.inference.attribute_prefix = prefix.clone();
        }
        if self.include_null_columns {
            options.inference.include_null_only_fields = true;
        }
        if self.ignore_missing {
            options.inference.missing_as_null = false;
        }

        Ok(options)
    }

    /// Read and parse the records
    pub fn load_records(&self) -> Result<Vec<Value>, CliError> {
        let records = parse_records(&load_input(&self.input)?)?;
        info!(input = %self.input, records = records.len(), "Loaded records");
        Ok(records)
    }
}

/// Load input content from file or stdin
pub fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Parse either a JSON array of records or newline-delimited JSON
pub fn parse_records(content: &str) -> Result<Vec<Value>, CliError> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| CliError::InvalidRecords(format!("JSON array: {}", e)));
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .map_err(|e| CliError::InvalidRecords(format!("line {}: {}", idx + 1, e)))
        })
        .collect()
}

/// Load `TableScriptOptions` from a TOML file
pub fn load_options(path: &Path) -> Result<TableScriptOptions, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
    toml::from_str(&content).map_err(|e| CliError::ConfigError(path.to_path_buf(), e.to_string()))
}

/// Load a column list saved by `infer --format json`
pub fn load_schema(path: &Path) -> Result<Vec<Column>, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::ConfigError(path.to_path_buf(), e.to_string()))
}

/// Write to the output file, or stdout when none is given
pub fn write_output(output: Option<&Path>, content: &str) -> Result<(), CliError> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))?;
            info!(path = %path.display(), "Output written");
        }
        None => println!("{}", content),
    }
    Ok(())
}
