//! Column model for inferred table schemas

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Any character outside this set forces an identifier to be quoted.
static QUOTE_IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("identifier regex is valid"));

/// Storage type inferred for a column
///
/// This is the SQLite storage class the column is declared with, not a
/// precision model: every integral JSON number that fits in an `i64` is
/// `INTEGER`, every other number is `REAL`, and everything else (including
/// integers too large for an `i64`) lands in `TEXT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Text,
    Integer,
    Real,
}

impl ValueType {
    /// Infer the type of a single value, `None` for JSON null
    pub fn of(value: &Value) -> Option<ValueType> {
        match value {
            Value::Null => None,
            Value::Number(n) => {
                if n.is_i64() {
                    Some(ValueType::Integer)
                } else if n.is_u64() {
                    // Above i64::MAX SQLite would store it as REAL and lose digits
                    Some(ValueType::Text)
                } else {
                    Some(ValueType::Real)
                }
            }
            Value::Bool(_) | Value::String(_) | Value::Array(_) | Value::Object(_) => {
                Some(ValueType::Text)
            }
        }
    }

    /// SQL keyword used in column definitions
    pub fn as_sql(&self) -> &'static str {
        match self {
            ValueType::Text => "TEXT",
            ValueType::Integer => "INTEGER",
            ValueType::Real => "REAL",
        }
    }

    /// Map an arbitrary declared column type onto a storage type.
    ///
    /// Follows SQLite's affinity rules, so `BIGINT` is an integer and
    /// `VARCHAR(20)` is text. Declarations with no recognizable affinity fall
    /// back to `TEXT`.
    pub fn from_declared_type(declared: &str) -> ValueType {
        let upper = declared.to_uppercase();
        if upper.contains("INT") {
            ValueType::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            ValueType::Text
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            ValueType::Real
        } else {
            ValueType::Text
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TEXT" => Ok(ValueType::Text),
            "INTEGER" => Ok(ValueType::Integer),
            "REAL" => Ok(ValueType::Real),
            other => Err(format!("Unknown value type: {}", other)),
        }
    }
}

/// One column of an inferred table schema
///
/// # Example
///
/// ```rust
/// use table_script_sdk::models::{Column, ValueType};
///
/// let column = Column::new("user id", ValueType::Integer);
/// assert_eq!(column.to_column_definition(), "\"user id\" INTEGER NOT NULL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name, unique within a schema
    pub name: String,
    /// Storage type, fixed by the first non-null value observed
    pub value_type: ValueType,
    /// Whether any record had a null or missing value for this column
    #[serde(default)]
    pub has_nulls: bool,
}

impl Column {
    /// Create a non-nullable column
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            has_nulls: false,
        }
    }

    /// Set whether the column has been observed to contain nulls
    pub fn with_nulls(mut self, has_nulls: bool) -> Self {
        self.has_nulls = has_nulls;
        self
    }

    /// Name as it appears in SQL, quoted when necessary
    pub fn sql_name(&self) -> Cow<'_, str> {
        quote_identifier(&self.name)
    }

    /// Whether the name carries the reserved attribute prefix
    pub fn is_attribute(&self, attribute_prefix: &str) -> bool {
        !attribute_prefix.is_empty() && self.name.starts_with(attribute_prefix)
    }

    /// Render the `CREATE TABLE` clause for this column
    pub fn to_column_definition(&self) -> String {
        let mut definition = format!("{} {}", self.sql_name(), self.value_type);
        if !self.has_nulls {
            definition.push_str(" NOT NULL");
        }
        definition
    }

    /// Render a table-level primary key clause on this column
    pub fn to_primary_key(&self) -> String {
        format!("PRIMARY KEY ({})", self.sql_name())
    }

    /// Render the statement turning blank imported strings back into NULL
    pub fn to_null_normalization(&self, table_name: &str) -> String {
        let name = self.sql_name();
        format!(
            "UPDATE {} SET {} = NULL WHERE {} = '';",
            table_name, name, name
        )
    }
}

/// Whether an identifier must be quoted to be used in SQL
pub fn needs_quoting(identifier: &str) -> bool {
    QUOTE_IDENTIFIER_REGEX.is_match(identifier)
}

/// Quote an identifier with double quotes if it contains anything outside
/// `[A-Za-z0-9_]`. Embedded double quotes are escaped by doubling them.
pub fn quote_identifier(identifier: &str) -> Cow<'_, str> {
    if needs_quoting(identifier) {
        Cow::Owned(format!("\"{}\"", identifier.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(identifier)
    }
}
