use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Fields known to differ between the two pipelines for reasons unrelated
/// to correctness.
pub const DEFAULT_IGNORE_KEYS: &[&str] = &[
    "updated_dt",                       // very likely different
    "building_facet",                   // batch indexer mangles codes with spaces
    "author_facet",                     // batch indexer keeps duplicates
    "oclc_t",                           // legacy MARC export had a different 001
    "isbn_t",                           // batch indexer leaves a trailing ':'
    "region_facet",                     // punctuation
    "new_uniform_title_author_display", // punctuation, ampersand encoding
    "uniform_title_author_display",     // punctuation, ampersand encoding
    "uniform_related_works_display",    // punctuation, ampersand encoding
    "text",                             // pending
    "toc_display",                      // pending
    "marc_display",                     // pending
];

pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_TIMESTAMP_FIELD: &str = "updated_dt";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    /// Emit `[EQUAL]` lines for fields that compare equal.
    pub show_equal: bool,
    /// Field whose first element identifies a record.
    pub id_field: String,
    /// Field compared only to annotate the record header.
    pub timestamp_field: String,
    pub array_policy: ArrayPolicy,
    pub ignore_keys: BTreeSet<String>,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            show_equal: false,
            id_field: DEFAULT_ID_FIELD.to_string(),
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            array_policy: ArrayPolicy::default(),
            ignore_keys: DEFAULT_IGNORE_KEYS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Array policy
// ---------------------------------------------------------------------------

/// How sequences of different lengths are treated once sorted.
///
/// `Lenient` walks the reference elements only: extra candidate elements
/// are ignored, while a reference element with no counterpart fails.
/// `Strict` additionally requires both sequences to have the same length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayPolicy {
    #[default]
    Lenient,
    Strict,
}

impl std::fmt::Display for ArrayPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

impl ReconConfig {
    /// Config with an explicit ignore set and every other option at its default.
    pub fn with_ignore_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_keys: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn show_equal(mut self, show_equal: bool) -> Self {
        self.show_equal = show_equal;
        self
    }

    pub fn array_policy(mut self, policy: ArrayPolicy) -> Self {
        self.array_policy = policy;
        self
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignore_keys.contains(field)
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.id_field.trim().is_empty() {
            return Err(ReconError::ConfigValidation("id_field must not be empty".into()));
        }

        if self.timestamp_field.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "timestamp_field must not be empty".into(),
            ));
        }

        // The identifier field is always compared
        if self.ignore_keys.contains(&self.id_field) {
            return Err(ReconError::ConfigValidation(format!(
                "ignore_keys must not contain the id field '{}'",
                self.id_field
            )));
        }

        if let Some(blank) = self.ignore_keys.iter().find(|k| k.trim().is_empty()) {
            return Err(ReconError::ConfigValidation(format!(
                "ignore_keys contains a blank field name: {blank:?}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_known_ignore_list() {
        let config = ReconConfig::default();
        assert!(!config.show_equal);
        assert_eq!(config.id_field, "id");
        assert_eq!(config.timestamp_field, "updated_dt");
        assert_eq!(config.array_policy, ArrayPolicy::Lenient);
        assert_eq!(config.ignore_keys.len(), 12);
        assert!(config.is_ignored("isbn_t"));
        assert!(config.is_ignored("marc_display"));
        assert!(!config.is_ignored("title_t"));
    }

    #[test]
    fn parse_partial_toml_keeps_defaults() {
        let config = ReconConfig::from_toml(
            r#"
show_equal = true
array_policy = "strict"
"#,
        )
        .unwrap();
        assert!(config.show_equal);
        assert_eq!(config.array_policy, ArrayPolicy::Strict);
        assert_eq!(config.id_field, "id");
        assert!(config.is_ignored("updated_dt"));
    }

    #[test]
    fn explicit_ignore_list_replaces_default() {
        let config = ReconConfig::from_toml(r#"ignore_keys = ["isbn_t"]"#).unwrap();
        assert_eq!(config.ignore_keys.len(), 1);
        assert!(config.is_ignored("isbn_t"));
        assert!(!config.is_ignored("updated_dt"));
    }

    #[test]
    fn rejects_ignored_id_field() {
        let err = ReconConfig::from_toml(r#"ignore_keys = ["id", "text"]"#).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn rejects_empty_id_field() {
        let err = ReconConfig::from_toml(r#"id_field = " ""#).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = ReconConfig::from_toml(r#"array_policy = "fuzzy""#).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ReconConfig::from_toml(r#"show_equals = true"#).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn builder_helpers() {
        let config = ReconConfig::with_ignore_keys(["a", "b"])
            .show_equal(true)
            .array_policy(ArrayPolicy::Strict);
        assert!(config.show_equal);
        assert!(config.is_ignored("a"));
        assert!(!config.is_ignored("updated_dt"));
        assert_eq!(config.array_policy.to_string(), "strict");
    }
}
