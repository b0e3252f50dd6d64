//! Parser options

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Options controlling a module parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Version assigned to a module that declares none
    pub default_module_version: String,

    /// Maximum nesting of values and declarations
    pub max_depth: usize,

    /// Bind named references to item declarations after parsing
    pub link_references: bool,

    /// Report sibling items whose name repeats an earlier sibling
    pub enforce_unique_names: bool,
}

impl ParserOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self {
            default_module_version: "1.0-DEV".to_string(),
            max_depth: 64,
            link_references: true,
            enforce_unique_names: true,
        }
    }

    /// Load options from a YAML document; absent keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Set the default module version
    pub fn with_default_module_version(mut self, version: impl Into<String>) -> Self {
        self.default_module_version = version.into();
        self
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable reference linking
    pub fn with_link_references(mut self, enable: bool) -> Self {
        self.link_references = enable;
        self
    }

    /// Enable or disable the unique item name check
    pub fn with_enforce_unique_names(mut self, enable: bool) -> Self {
        self.enforce_unique_names = enable;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert_eq!(options.default_module_version, "1.0-DEV");
        assert_eq!(options.max_depth, 64);
        assert!(options.link_references);
        assert!(options.enforce_unique_names);
    }

    #[test]
    fn test_from_yaml_keeps_unset_defaults() {
        let options =
            ParserOptions::from_yaml_str("max_depth: 8\nlink_references: false\n").unwrap();
        assert_eq!(options.max_depth, 8);
        assert!(!options.link_references);
        assert_eq!(options.default_module_version, "1.0-DEV");
    }

    #[test]
    fn test_from_yaml_rejects_wrong_types() {
        assert!(ParserOptions::from_yaml_str("max_depth: deep").is_err());
    }

    #[test]
    fn test_builder() {
        let options = ParserOptions::new()
            .with_default_module_version("2.0")
            .with_enforce_unique_names(false);
        assert_eq!(options.default_module_version, "2.0");
        assert!(!options.enforce_unique_names);
    }
}
