//! Explorer configuration
//!
//! Read from an optional JSON file. Every field has a default, so an empty
//! object (or no file at all) is a valid configuration.

use anyhow::{Context, Result};
use content_tree::NavigationOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the site explorer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Options applied to every navigation query
    pub navigation: NavigationOptions,

    /// JSON site fixture to explore instead of the built-in demo site
    pub fixture: Option<PathBuf>,

    /// Name given to the tests page when it has to be created
    pub tests_page_name: String,

    /// Deepest level printed by the outline
    pub outline_depth: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationOptions::default(),
            fixture: None,
            tests_page_name: "Tests Page".to_string(),
            outline_depth: 3,
        }
    }
}

impl ExplorerConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse explorer configuration")
    }

    /// Load a configuration file
    ///
    /// A relative fixture path is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let mut config = Self::from_json(&json)?;

        if let Some(dir) = path.parent() {
            config.fixture = config
                .fixture
                .take()
                .map(|fixture| if fixture.is_relative() { dir.join(fixture) } else { fixture });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ExplorerConfig::from_json("{}").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.navigation.max_hops, 10);
        assert_eq!(config.tests_page_name, "Tests Page");
    }

    #[test]
    fn test_partial_override() {
        let config =
            ExplorerConfig::from_json(r#"{ "navigation": { "max_hops": 4 }, "outline_depth": 1 }"#)
                .unwrap();
        assert_eq!(config.navigation.max_hops, 4);
        assert_eq!(config.outline_depth, 1);
        assert_eq!(config.fixture, None);
    }

    #[test]
    fn test_load_resolves_fixture_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("explorer.json");
        fs::write(&path, r#"{ "fixture": "site.json" }"#).unwrap();

        let config = ExplorerConfig::load(&path).unwrap();
        assert_eq!(config.fixture, Some(temp.path().join("site.json")));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = ExplorerConfig::load(&temp.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration"));
    }
}
