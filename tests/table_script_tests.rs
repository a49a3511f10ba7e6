//! Table script builder tests

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use table_script_sdk::export::{
    BulkImportDialect, ExportError, PayloadWriter, TableScriptBuilder, TableScriptOptions,
    create_table_script,
};
use table_script_sdk::inference::InferenceConfig;
use table_script_sdk::models::{Column, ValueType};
use table_script_sdk::storage::{MemoryStorageBackend, StorageBackend, StorageError};
use table_script_sdk::validation::{strip_shell_directives, validate_sql};
use tempfile::TempDir;

fn people() -> Vec<Value> {
    vec![
        json!({"id": 1, "first name": "Ada", "attr_rank": 2, "score": 9.5}),
        json!({"id": 2, "first name": null, "attr_rank": 1}),
    ]
}

/// Backend whose every write fails
struct FailingStorage;

impl StorageBackend for FailingStorage {
    fn write_text_file(&self, _path: &Path, _content: &str) -> Result<(), StorageError> {
        Err(StorageError::BackendError("disk full".to_string()))
    }
}

mod ddl_tests {
    use super::*;

    #[test]
    fn test_scenario_schema_and_ddl() {
        let script = TableScriptBuilder::new("t")
            .build(&[json!({"a": 1, "b": "x"}), json!({"a": 2, "b": null})])
            .unwrap();

        assert_eq!(
            script.columns,
            vec![
                Column::new("a", ValueType::Integer),
                Column::new("b", ValueType::Text).with_nulls(true),
            ]
        );
        assert!(script.ddl.contains("a INTEGER NOT NULL"));
        assert!(script.ddl.contains("b TEXT\n"));
        assert!(!script.ddl.contains("b TEXT NOT NULL"));
    }

    #[test]
    fn test_quoted_columns_and_primary_key() {
        let script = TableScriptBuilder::new("people")
            .primary_key(Column::new("first name", ValueType::Text))
            .build(&people())
            .unwrap();

        assert_eq!(
            script.ddl,
            "DROP TABLE IF EXISTS people;\n\n\
             CREATE TABLE people (\n  \
             \"first name\" TEXT,\n  \
             id INTEGER NOT NULL,\n  \
             score REAL,\n  \
             attr_rank INTEGER NOT NULL,\n  \
             PRIMARY KEY (\"first name\")\n\
             );"
        );
        assert_eq!(validate_sql(&script.ddl), Ok(2));
    }

    #[test]
    fn test_unquoted_primary_key() {
        let script = TableScriptBuilder::new("people")
            .primary_key(Column::new("id", ValueType::Integer))
            .build(&people())
            .unwrap();

        assert!(script.ddl.ends_with("  PRIMARY KEY (id)\n);"));
    }

    #[test]
    fn test_empty_record_set_still_renders() {
        let script = TableScriptBuilder::new("empty").build(&[]).unwrap();

        assert!(script.columns.is_empty());
        assert_eq!(
            script.ddl,
            "DROP TABLE IF EXISTS empty;\n\nCREATE TABLE empty (\n);"
        );
        assert_eq!(script.rows_as_payload.as_deref(), Some(""));
    }

    #[test]
    fn test_existing_schema_round_trip() {
        let first = TableScriptBuilder::new("people").build(&people()).unwrap();
        let second = TableScriptBuilder::new("people")
            .existing_columns(first.columns.clone())
            .build(&people())
            .unwrap();

        assert_eq!(second.columns, first.columns);
        assert_eq!(second.ddl, first.ddl);
    }
}

mod import_tests {
    use super::*;

    #[test]
    fn test_single_null_normalization_per_nullable_column() {
        let storage = MemoryStorageBackend::new();
        let script = TableScriptBuilder::new("t")
            .import_source("/srv/load/t.csv")
            .build_with_storage(
                &[json!({"a": 1, "b": "x"}), json!({"a": 2, "b": null})],
                &storage,
            )
            .unwrap();

        assert_eq!(
            script
                .sql_cmd
                .matches("UPDATE t SET b = NULL WHERE b = '';")
                .count(),
            1
        );
        assert!(!script.sql_cmd.contains("SET a = NULL"));
        assert_eq!(
            script.import_script.as_deref(),
            Some(
                "-- @formatter:off\n.mode csv\n.separator |\n.echo on\n\
                 .import /srv/load/t.csv t\n.echo off\n-- @formatter:on"
            )
        );
        let sql = strip_shell_directives(&script.sql_cmd);
        assert_eq!(validate_sql(&sql), Ok(3));
    }

    #[test]
    fn test_sqlite_import_block_with_custom_delimiter_and_spaced_path() {
        let storage = MemoryStorageBackend::new();
        let script = TableScriptBuilder::new("people")
            .import_source("/srv/my loads/people.tsv")
            .delimiter('\t')
            .build_with_storage(&people(), &storage)
            .unwrap();

        assert_eq!(
            script.import_script.as_deref(),
            Some(
                "-- @formatter:off\n.mode csv\n.separator \"\\t\"\n.echo on\n\
                 .import \"/srv/my loads/people.tsv\" people\n.echo off\n-- @formatter:on"
            )
        );
        assert_eq!(script.delimiter, '\t');
        assert_eq!(
            script.null_normalization,
            vec![
                "UPDATE people SET \"first name\" = NULL WHERE \"first name\" = '';",
                "UPDATE people SET score = NULL WHERE score = '';",
            ]
        );
        assert_eq!(
            storage.read("/srv/my loads/people.tsv").as_deref(),
            Some("Ada\t1\t9.5\t2\n\t2\t\t1\n")
        );
    }

    #[test]
    fn test_duckdb_emits_no_null_normalization() {
        let script = TableScriptBuilder::new("people")
            .import_source("/srv/load/people.csv")
            .dialect(BulkImportDialect::DuckDb)
            .build_with_storage(&people(), &MemoryStorageBackend::new())
            .unwrap();

        assert!(script.columns.iter().any(|c| c.has_nulls && c.value_type == ValueType::Real));
        assert!(script.null_normalization.is_empty());
        assert!(!script.sql_cmd.contains("UPDATE"));
    }

    #[test]
    fn test_payload_written_to_import_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.csv");
        let script = TableScriptBuilder::new("people")
            .import_source(&path)
            .build(&people())
            .unwrap();

        assert_eq!(script.payload_file.as_deref(), Some(path.as_path()));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(Some(written.as_str()), script.rows_as_payload.as_deref());
        assert_eq!(written, "Ada|1|9.5|2\n|2||1\n");
    }

    #[test]
    fn test_storage_failure_propagates() {
        let err = TableScriptBuilder::new("t")
            .import_source("/srv/load/t.csv")
            .build_with_storage(&people(), &FailingStorage)
            .unwrap_err();

        assert!(matches!(
            err,
            ExportError::Storage(StorageError::BackendError(_))
        ));
    }

    #[test]
    fn test_missing_directory_propagates_io_error() {
        let dir = TempDir::new().unwrap();
        let path: PathBuf = dir.path().join("missing").join("t.csv");
        let err = TableScriptBuilder::new("t")
            .import_source(&path)
            .build(&people())
            .unwrap_err();

        assert!(matches!(err, ExportError::Storage(StorageError::Io { .. })));
    }

    #[test]
    fn test_create_table_script_with_options() {
        let storage_dir = TempDir::new().unwrap();
        let options = TableScriptOptions {
            import_source: Some(storage_dir.path().join("t.tsv")),
            delimiter: '\t',
            dialect: BulkImportDialect::DuckDb,
            inference: InferenceConfig::builder().ignore_pattern("score").build(),
            table_constraints: vec!["UNIQUE (id)".to_string()],
            ..Default::default()
        };
        let script = create_table_script("people", &people(), options).unwrap();

        assert!(!script.columns.iter().any(|c| c.name == "score"));
        assert!(script.ddl.contains("UNIQUE (id)\n);"));
        assert!(script.sql_cmd.contains("COPY people FROM '"));
        assert!(script.sql_cmd.contains("(DELIMITER '\t', HEADER false, QUOTE '\"');"));
        assert_eq!(script.rows_as_payload.as_deref(), Some("Ada\t1\t2\n\t2\t1\n"));
    }
}

mod payload_tests {
    use super::*;

    #[test]
    fn test_payload_parses_back_in_column_order() {
        let records = vec![
            json!({"name": "plain", "n": 1, "ratio": 0.5}),
            json!({"n": 2, "name": "with space"}),
        ];
        let script = TableScriptBuilder::new("t").build(&records).unwrap();
        let payload = script.rows_as_payload.unwrap();

        let rows = PayloadWriter::default()
            .parse(&payload, &script.columns)
            .unwrap();

        for (record, row) in records.iter().zip(&rows) {
            for (col, field) in script.columns.iter().zip(row) {
                match record.get(&col.name) {
                    Some(Value::String(s)) => assert_eq!(field, s),
                    Some(Value::Null) | None => assert_eq!(field, ""),
                    Some(other) => assert_eq!(field, &other.to_string()),
                }
            }
        }
    }

    #[test]
    fn test_delimiter_in_value_is_quoted() {
        let script = TableScriptBuilder::new("t")
            .build(&[json!({"a": "x|y"})])
            .unwrap();
        assert_eq!(script.rows_as_payload.as_deref(), Some("\"x|y\"\n"));
    }

    #[test]
    fn test_invalid_input_contract() {
        assert!(matches!(
            TableScriptBuilder::new("").build(&people()),
            Err(ExportError::InvalidInput(_))
        ));
        assert!(matches!(
            TableScriptBuilder::new("t").delimiter('"').build(&people()),
            Err(ExportError::InvalidInput(_))
        ));
        assert!(matches!(
            TableScriptBuilder::new("t").build(&[json!(1)]),
            Err(ExportError::Inference(_))
        ));
    }
}
