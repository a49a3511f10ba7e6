//! Column inference engine

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::config::InferenceConfig;
use super::error::InferenceError;
use crate::models::{Column, Record, ValueType};

/// Statistics from one inference pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceStats {
    /// Total records processed
    pub records_processed: usize,
    /// Columns appended to the schema by this pass
    pub columns_added: usize,
    /// Null values seen on accepted fields
    pub null_observations: usize,
    /// Non-null values whose type disagreed with the column's type
    pub type_mismatches: usize,
    /// Type disagreements per column name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mismatched_columns: BTreeMap<String, usize>,
}

/// Where a name lives while a pass is running
#[derive(Debug, Clone, Copy)]
enum Slot {
    Existing(usize),
    Added(usize),
}

/// Column inference engine
///
/// Walks a set of JSON object records and extends an ordered column list.
/// A column's type is fixed by the first non-null value seen for its name;
/// later values with a different type are only counted in
/// [`InferenceStats::type_mismatches`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use table_script_sdk::inference::ColumnInferrer;
///
/// let records = vec![json!({"a": 1, "b": "x"}), json!({"a": 2, "b": null})];
/// let mut columns = Vec::new();
/// ColumnInferrer::new().infer(&records, &mut columns).unwrap();
///
/// assert_eq!(columns[0].name, "a");
/// assert!(columns[1].has_nulls);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnInferrer {
    config: InferenceConfig,
    ignore: Vec<Regex>,
}

impl ColumnInferrer {
    /// Create an inferrer with the default configuration
    pub fn new() -> Self {
        Self {
            config: InferenceConfig::default(),
            ignore: Vec::new(),
        }
    }

    /// Create an inferrer with a custom configuration, compiling its patterns
    pub fn with_config(config: InferenceConfig) -> Result<Self, InferenceError> {
        let ignore = config
            .ignore_patterns
            .iter()
            .map(|pattern| {
                // Anchor so a pattern must cover the whole name
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
                    InferenceError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { config, ignore })
    }

    /// The configuration in use
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Whether a field name passes the ignore patterns and the allow-list
    pub fn accepts(&self, name: &str) -> bool {
        if self.ignore.iter().any(|regex| regex.is_match(name)) {
            return false;
        }
        match &self.config.only_names {
            Some(only) => only.contains(name),
            None => true,
        }
    }

    /// Extend `columns` with every accepted field found in `records`.
    ///
    /// Existing columns keep their position and type; only their null flag
    /// may change. New columns are appended with ordinary names first and
    /// attribute names second, each group sorted by name.
    ///
    /// Fails without touching `columns` if any record is not a JSON object.
    pub fn infer(
        &self,
        records: &[Value],
        columns: &mut Vec<Column>,
    ) -> Result<InferenceStats, InferenceError> {
        let records = as_records(records)?;

        let mut stats = InferenceStats {
            records_processed: records.len(),
            ..Default::default()
        };

        let mut slots: HashMap<String, Slot> = HashMap::with_capacity(columns.len());
        for (idx, col) in columns.iter().enumerate() {
            slots.entry(col.name.clone()).or_insert(Slot::Existing(idx));
        }

        let mut added: Vec<Column> = Vec::new();
        let mut seen_null: BTreeSet<String> = BTreeSet::new();

        for record in &records {
            for (name, value) in record.iter() {
                if !self.accepts(name) {
                    continue;
                }

                let Some(value_type) = ValueType::of(value) else {
                    stats.null_observations += 1;
                    seen_null.insert(name.clone());
                    match slots.get(name) {
                        Some(Slot::Existing(idx)) => columns[*idx].has_nulls = true,
                        Some(Slot::Added(idx)) => added[*idx].has_nulls = true,
                        None => {}
                    }
                    continue;
                };

                let current = match slots.get(name) {
                    Some(Slot::Existing(idx)) => Some(&columns[*idx]),
                    Some(Slot::Added(idx)) => Some(&added[*idx]),
                    None => None,
                };

                match current {
                    Some(col) => {
                        if col.value_type != value_type {
                            debug!(
                                column = %name,
                                expected = %col.value_type,
                                found = %value_type,
                                "Type mismatch, keeping first observed type"
                            );
                            stats.type_mismatches += 1;
                            *stats.mismatched_columns.entry(name.clone()).or_insert(0) += 1;
                        }
                    }
                    None => {
                        let col = Column::new(name.clone(), value_type)
                            .with_nulls(seen_null.contains(name));
                        debug!(column = %name, value_type = %value_type, "Discovered column");
                        slots.insert(name.clone(), Slot::Added(added.len()));
                        added.push(col);
                    }
                }
            }
        }

        if self.config.include_null_only_fields {
            for name in &seen_null {
                if !slots.contains_key(name) {
                    debug!(column = %name, "Adding null-only column as TEXT");
                    slots.insert(name.clone(), Slot::Added(added.len()));
                    added.push(Column::new(name.clone(), ValueType::Text).with_nulls(true));
                }
            }
        }

        if self.config.missing_as_null {
            for col in columns.iter_mut().chain(added.iter_mut()) {
                if col.has_nulls || !self.accepts(&col.name) {
                    continue;
                }
                if records.iter().any(|record| !record.contains_key(&col.name)) {
                    col.has_nulls = true;
                }
            }
        }

        stats.columns_added = added.len();

        let prefix = self.config.attribute_prefix.as_str();
        let (mut attribute, mut ordinary): (Vec<Column>, Vec<Column>) =
            added.into_iter().partition(|col| col.is_attribute(prefix));
        ordinary.sort_by(|a, b| a.name.cmp(&b.name));
        attribute.sort_by(|a, b| a.name.cmp(&b.name));

        columns.extend(ordinary);
        columns.extend(attribute);

        debug!(
            records = stats.records_processed,
            columns = columns.len(),
            added = stats.columns_added,
            mismatches = stats.type_mismatches,
            "Column inference complete"
        );

        Ok(stats)
    }
}

impl Default for ColumnInferrer {
    fn default() -> Self {
        Self::new()
    }
}

/// Extend `columns` from `records` using `config`
pub fn add_columns_from_records(
    records: &[Value],
    columns: &mut Vec<Column>,
    config: &InferenceConfig,
) -> Result<InferenceStats, InferenceError> {
    ColumnInferrer::with_config(config.clone())?.infer(records, columns)
}

/// Borrow every record as an object, rejecting the first one that is not
pub(crate) fn as_records(records: &[Value]) -> Result<Vec<&Record>, InferenceError> {
    records
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value.as_object().ok_or(InferenceError::InvalidRecord {
                index,
                found: value_type_name(value),
            })
        })
        .collect()
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
