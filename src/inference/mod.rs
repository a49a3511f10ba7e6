//! Column inference for loosely-typed records
//!
//! Turns a set of JSON object records into an ordered list of table columns.
//!
//! ## Rules
//!
//! - **Types** - integral numbers are `INTEGER`, other numbers `REAL`,
//!   everything else `TEXT`. The first non-null value seen for a name decides.
//! - **Nullability** - a column is nullable once any record has a null (or,
//!   by default, no value at all) for it.
//! - **Ordering** - existing columns stay put; new columns are appended with
//!   ordinary names sorted first and `attr_`-prefixed names sorted after.
//! - **Filtering** - names can be excluded by regex or restricted to an
//!   allow-list.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use table_script_sdk::inference::{ColumnInferrer, InferenceConfig};
//!
//! let config = InferenceConfig::builder().ignore_pattern("_.*").build();
//! let inferrer = ColumnInferrer::with_config(config).unwrap();
//!
//! let records = vec![json!({"name": "Alice", "attr_score": 9.5, "_rev": 3})];
//! let mut columns = Vec::new();
//! inferrer.infer(&records, &mut columns).unwrap();
//!
//! let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
//! assert_eq!(names, vec!["name", "attr_score"]);
//! ```

mod config;
mod error;
mod inferrer;

pub use config::{DEFAULT_ATTRIBUTE_PREFIX, InferenceConfig, InferenceConfigBuilder};
pub use error::InferenceError;
pub(crate) use inferrer::as_records;
pub use inferrer::{ColumnInferrer, InferenceStats, add_columns_from_records};
