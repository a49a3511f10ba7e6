//! Embedded SQLite backend
//!
//! Executes a [`TableScript`] against a `rusqlite` connection the way the
//! `sqlite3` shell would run its import block: the DDL is executed, every
//! payload field is inserted as text (column affinity converts numbers), and
//! blank strings in nullable columns are turned back into NULL.
//!
//! Also reads schemas and rows back out, so a table loaded earlier can seed
//! the next build through `existing_columns`.

use rusqlite::Connection;
use rusqlite::types::ValueRef;
use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use crate::export::{ExportError, PayloadWriter, TableScript};
use crate::models::{Column, ValueType, quote_identifier};

/// Errors from the SQLite backend
#[derive(Debug, thiserror::Error)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error(transparent)]
    Export(#[from] ExportError),
    /// The script was built without a payload
    #[error("Table script for {0} has no payload to load")]
    MissingPayload(String),
    #[error("Table not found: {0}")]
    TableNotFound(String),
}

/// Create the script's table and load its payload, returning the row count.
///
/// The payload is parsed with the delimiter the script was built with. Runs
/// inside one transaction; on error the database is left as it was.
pub fn load_table_script(
    conn: &mut Connection,
    script: &TableScript,
) -> Result<usize, SqliteError> {
    let payload = script
        .rows_as_payload
        .as_deref()
        .ok_or_else(|| SqliteError::MissingPayload(script.table_name.clone()))?;
    let rows = PayloadWriter::new(script.delimiter)?.parse(payload, &script.columns)?;

    let tx = conn.transaction()?;
    tx.execute_batch(&script.ddl)?;

    if !script.columns.is_empty() {
        let names: Vec<_> = script.columns.iter().map(|col| col.sql_name()).collect();
        let placeholders: Vec<_> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            script.table_name,
            names.join(", "),
            placeholders.join(", ")
        );

        let mut stmt = tx.prepare(&insert)?;
        for row in &rows {
            stmt.execute(rusqlite::params_from_iter(row.iter()))?;
        }
    }

    for col in script.columns.iter().filter(|col| col.has_nulls) {
        let updated = tx.execute(&col.to_null_normalization(&script.table_name), [])?;
        debug!(column = %col.name, updated, "Normalized blank values to NULL");
    }

    tx.commit()?;

    info!(table = %script.table_name, rows = rows.len(), "Loaded table script");
    Ok(rows.len())
}

/// Read a table's schema back as columns, in declaration order
pub fn columns_from_table(conn: &Connection, table_name: &str) -> Result<Vec<Column>, SqliteError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table_name)))?;
    let columns = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let declared: String = row.get(2)?;
            let not_null: i64 = row.get(3)?;
            Ok(Column::new(name, ValueType::from_declared_type(&declared)).with_nulls(not_null == 0))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(SqliteError::TableNotFound(table_name.to_string()));
    }
    Ok(columns)
}

/// Run a query and return every row as a JSON object keyed by column name
pub fn query_to_records(conn: &Connection, sql: &str) -> Result<Vec<Value>, SqliteError> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Map::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            record.insert(name.clone(), to_json(row.get_ref(idx)?));
        }
        records.push(Value::Object(record));
    }
    Ok(records)
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
