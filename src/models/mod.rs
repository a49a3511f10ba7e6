//! Models module for the SDK
//!
//! Defines the column schema produced by inference and consumed by the
//! script builder.

pub mod column;

pub use column::{Column, ValueType, needs_quoting, quote_identifier};

/// One input row: field name to scalar value
pub type Record = serde_json::Map<String, serde_json::Value>;
