//! table-script: infer table schemas from JSON records and generate load scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use table_script_sdk::cli::commands::{
    GenerateArgs, InferArgs, SourceArgs, handle_generate, handle_infer,
};

#[derive(Parser, Debug)]
#[command(
    name = "table-script",
    version,
    about = "Infer table schemas from JSON records and generate DDL, import scripts and payloads"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Infer the column schema of a set of records
    Infer {
        #[command(flatten)]
        source: SourceOptions,

        /// Output format (table, json, yaml)
        #[arg(long, default_value = "table")]
        format: String,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate the table script for a set of records
    Generate {
        #[command(flatten)]
        source: SourceOptions,

        /// Target table name
        #[arg(short, long)]
        table: String,

        /// Column to declare as primary key
        #[arg(long)]
        primary_key: Option<String>,

        /// Raw table constraint, e.g. "UNIQUE (a, b)" (repeatable)
        #[arg(long = "constraint")]
        constraints: Vec<String>,

        /// Write the payload here and load it in the import script
        #[arg(long)]
        import_file: Option<PathBuf>,

        /// Do not render the payload
        #[arg(long)]
        no_payload: bool,

        /// Payload delimiter
        #[arg(long)]
        delimiter: Option<char>,

        /// Import dialect (sqlite, duckdb)
        #[arg(long)]
        dialect: Option<String>,

        /// Parse the generated SQL before writing it
        #[arg(long)]
        check: bool,

        /// Output format (sql, json, yaml)
        #[arg(long, default_value = "sql")]
        format: String,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SourceOptions {
    /// Records as a JSON array or newline-delimited JSON ("-" for stdin)
    #[arg(default_value = "-")]
    input: String,

    /// TOML file with table script options
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON column list to extend (output of `infer --format json`)
    #[arg(long)]
    existing_schema: Option<PathBuf>,

    /// Regex for field names to skip (repeatable)
    #[arg(long)]
    ignore: Vec<String>,

    /// Only consider these field names (repeatable)
    #[arg(long)]
    only: Vec<String>,

    /// Prefix of attribute columns, sorted after ordinary ones
    #[arg(long)]
    attribute_prefix: Option<String>,

    /// Create nullable TEXT columns for fields that are always null
    #[arg(long)]
    include_null_columns: bool,

    /// Do not mark a column nullable just because some records lack it
    #[arg(long)]
    ignore_missing: bool,
}

impl From<SourceOptions> for SourceArgs {
    fn from(opts: SourceOptions) -> Self {
        SourceArgs {
            input: opts.input,
            config: opts.config,
            existing_schema: opts.existing_schema,
            ignore: opts.ignore,
            only: opts.only,
            attribute_prefix: opts.attribute_prefix,
            include_null_columns: opts.include_null_columns,
            ignore_missing: opts.ignore_missing,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Infer {
            source,
            format,
            output,
        } => handle_infer(&InferArgs {
            source: source.into(),
            format,
            output,
        })?,
        Commands::Generate {
            source,
            table,
            primary_key,
            constraints,
            import_file,
            no_payload,
            delimiter,
            dialect,
            check,
            format,
            output,
        } => handle_generate(&GenerateArgs {
            source: source.into(),
            table,
            primary_key,
            constraints,
            import_file,
            no_payload,
            delimiter,
            dialect,
            check,
            format,
            output,
        })?,
    }

    Ok(())
}
