//! Numbering configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::numbering::DocumentTypeRegistry;
use crate::types::*;

/// Root key counters are stored under when none is configured
pub const DEFAULT_ROOT_KEY: &str = "purchasing_counters";

/// Per-type override of the built-in numbering defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeConfig {
    pub key: String,
    pub format: String,
    #[serde(default)]
    pub reset_period: ResetPeriod,
}

/// Configuration for the numbering engine
///
/// ```json
/// {
///   "rootKey": "acme_counters",
///   "documentTypes": [
///     { "key": "purchase-order", "format": "LPO-{YY}-{###}", "resetPeriod": "yearly" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberingConfig {
    /// Namespace all counters are persisted under
    pub root_key: String,
    /// Register the standard document types before applying overrides
    pub include_standard_types: bool,
    /// Additional or overriding document types
    pub document_types: Vec<DocumentTypeConfig>,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            root_key: DEFAULT_ROOT_KEY.to_string(),
            include_standard_types: true,
            document_types: Vec::new(),
        }
    }
}

impl NumberingConfig {
    pub fn from_json_str(json: &str) -> NumberingResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| NumberingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> NumberingResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            NumberingError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn with_root_key(mut self, root_key: impl Into<String>) -> Self {
        self.root_key = root_key.into();
        self
    }

    pub fn with_document_type(
        mut self,
        key: impl Into<String>,
        format: impl Into<String>,
        reset_period: ResetPeriod,
    ) -> Self {
        self.document_types.push(DocumentTypeConfig {
            key: key.into(),
            format: format.into(),
            reset_period,
        });
        self
    }

    pub fn without_standard_types(mut self) -> Self {
        self.include_standard_types = false;
        self
    }

    /// Check the root key and every override
    pub fn validate(&self) -> NumberingResult<()> {
        if self.root_key.trim().is_empty() {
            return Err(NumberingError::Config(
                "root key cannot be empty".to_string(),
            ));
        }
        self.registry().map(|_| ())
    }

    /// Build the document type registry this configuration describes
    pub fn registry(&self) -> NumberingResult<DocumentTypeRegistry> {
        let mut registry = if self.include_standard_types {
            DocumentTypeRegistry::new()
        } else {
            DocumentTypeRegistry::empty()
        };
        for entry in &self.document_types {
            registry.register(CounterTemplate::new(
                entry.key.clone(),
                entry.format.clone(),
                entry.reset_period,
            ))?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NumberingConfig::from_json_str("{}").unwrap();
        assert_eq!(config.root_key, DEFAULT_ROOT_KEY);
        assert!(config.registry().unwrap().contains("vendor"));
    }

    #[test]
    fn test_overrides_from_json() {
        let config = NumberingConfig::from_json_str(
            r#"{
                "rootKey": "acme_counters",
                "includeStandardTypes": false,
                "documentTypes": [
                    { "key": "purchase-order", "format": "LPO-{YY}-{###}", "resetPeriod": "monthly" },
                    { "key": "credit-note", "format": "CN{####}" }
                ]
            }"#,
        )
        .unwrap();

        let registry = config.registry().unwrap();
        assert_eq!(registry.keys(), vec!["credit-note", "purchase-order"]);
        let template = registry.template("credit-note").unwrap();
        assert_eq!(template.reset_period, ResetPeriod::Never);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            NumberingConfig::from_json_str(r#"{ "rootKey": " " }"#),
            Err(NumberingError::Config(_))
        ));
        assert!(matches!(
            NumberingConfig::from_json_str(
                r#"{ "documentTypes": [{ "key": "po", "format": "PO-{DD}" }] }"#
            ),
            Err(NumberingError::InvalidFormat(_))
        ));
        assert!(NumberingConfig::from_json_str("not json").is_err());
    }
}
