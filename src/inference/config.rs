//! Configuration for column inference

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default prefix marking attribute columns, which sort after ordinary ones
pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "attr_";

/// Configuration for column inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Regex patterns; a field whose whole name matches any of them is skipped
    pub ignore_patterns: Vec<String>,

    /// If set, only these field names are considered
    pub only_names: Option<BTreeSet<String>>,

    /// Names starting with this prefix are attribute columns
    pub attribute_prefix: String,

    /// Create nullable TEXT columns for fields that were only ever null
    pub include_null_only_fields: bool,

    /// Treat a field missing from a record as a null observation
    pub missing_as_null: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            only_names: None,
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_string(),
            include_null_only_fields: false,
            missing_as_null: true,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Skip fields whose full name matches this regex
    pub fn ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.ignore_patterns.push(pattern.into());
        self
    }

    /// Skip fields matching any of these regexes
    pub fn ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .ignore_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Restrict inference to an allow-list of field names
    pub fn only_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.only_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the attribute column prefix (empty disables the attribute group)
    pub fn attribute_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.attribute_prefix = prefix.into();
        self
    }

    /// Enable or disable columns for null-only fields
    pub fn include_null_only_fields(mut self, include: bool) -> Self {
        self.config.include_null_only_fields = include;
        self
    }

    /// Enable or disable treating missing fields as nulls
    pub fn missing_as_null(mut self, missing_as_null: bool) -> Self {
        self.config.missing_as_null = missing_as_null;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert!(config.ignore_patterns.is_empty());
        assert!(config.only_names.is_none());
        assert_eq!(config.attribute_prefix, "attr_");
        assert!(!config.include_null_only_fields);
        assert!(config.missing_as_null);
    }

    #[test]
    fn test_builder() {
        let config = InferenceConfig::builder()
            .ignore_pattern("_.*")
            .ignore_patterns(["tmp\\d+"])
            .only_names(["a", "b"])
            .attribute_prefix("meta_")
            .include_null_only_fields(true)
            .build();

        assert_eq!(config.ignore_patterns, vec!["_.*", "tmp\\d+"]);
        assert_eq!(config.only_names.as_ref().map(|n| n.len()), Some(2));
        assert_eq!(config.attribute_prefix, "meta_");
        assert!(config.include_null_only_fields);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: InferenceConfig =
            serde_json::from_str(r#"{"ignorePatterns": ["id_.*"]}"#).unwrap();
        assert_eq!(config.ignore_patterns, vec!["id_.*"]);
        assert_eq!(config.attribute_prefix, DEFAULT_ATTRIBUTE_PREFIX);
        assert!(config.missing_as_null);
    }
}
