//! Extension subsystem configuration.

use serde::{Deserialize, Serialize};

/// Settings for the module/hook extension subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionConfig {
    /// Module ids to enable. An empty list enables every compiled-in module.
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Treat a hook registration that references an unknown catalog listener
    /// as a construction error instead of skipping it with a warning.
    #[serde(default)]
    pub strict_missing_listener: bool,
}

impl ExtensionConfig {
    /// Returns whether the module with the given id should be loaded.
    pub fn module_enabled(&self, id: &str) -> bool {
        self.enabled.is_empty() || self.enabled.iter().any(|m| m == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_enables_all() {
        let config = ExtensionConfig::default();
        assert!(config.module_enabled("mentions"));
    }

    #[test]
    fn test_explicit_list_filters() {
        let config = ExtensionConfig {
            enabled: vec!["mentions".to_string()],
            strict_missing_listener: false,
        };
        assert!(config.module_enabled("mentions"));
        assert!(!config.module_enabled("audit"));
    }
}
