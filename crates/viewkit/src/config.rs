//! Loader configuration.
//!
//! [`LoaderConfig`] holds everything that influences a build: how files are
//! classified, which files are read, and how the template engine is set up.
//! It can be built in code, through [`TemplatesBuilder`](crate::TemplatesBuilder),
//! or loaded from YAML:
//!
//! ```rust
//! use viewkit::LoaderConfig;
//!
//! let config = LoaderConfig::from_yaml(r#"
//! views_dir: pages
//! extensions: [".html"]
//! strict_undefined: true
//! "#).unwrap();
//!
//! assert_eq!(config.views_dir, "pages");
//! assert!(config.strict_undefined);
//! assert!(!config.trim_blocks);
//! ```

use std::path::Path;

use minijinja::{Environment, UndefinedBehavior};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filter::ExtensionFilter;

/// Default name of the views subdirectory.
pub const DEFAULT_VIEWS_DIR: &str = "views";

/// Settings applied when building a template collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Name of the subdirectory whose files are views.
    pub views_dir: String,
    /// Extension allow-list; empty accepts every file.
    pub extensions: Vec<String>,
    /// Treat undefined variables as render errors.
    pub strict_undefined: bool,
    /// Remove the first newline after a block tag.
    pub trim_blocks: bool,
    /// Strip leading whitespace before a block tag.
    pub lstrip_blocks: bool,
    /// Keep the single trailing newline of each template.
    pub keep_trailing_newline: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            views_dir: DEFAULT_VIEWS_DIR.to_string(),
            extensions: Vec::new(),
            strict_undefined: false,
            trim_blocks: false,
            lstrip_blocks: false,
            keep_trailing_newline: false,
        }
    }
}

impl LoaderConfig {
    /// Parses a config from YAML. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// The extension filter described by this config.
    pub fn extension_filter(&self) -> ExtensionFilter {
        ExtensionFilter::new(&self.extensions)
    }

    /// Creates an empty template environment with these settings applied.
    pub(crate) fn environment(&self) -> Environment<'static> {
        let mut env = Environment::new();
        if self.strict_undefined {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        env.set_trim_blocks(self.trim_blocks);
        env.set_lstrip_blocks(self.lstrip_blocks);
        env.set_keep_trailing_newline(self.keep_trailing_newline);
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert_eq!(config.views_dir, "views");
        assert!(config.extensions.is_empty());
        assert!(config.extension_filter().is_empty());
        assert!(!config.strict_undefined);
    }

    #[test]
    fn test_from_yaml_partial_keys() {
        let config = LoaderConfig::from_yaml("extensions: [html, .htm]").unwrap();
        assert_eq!(config.views_dir, "views");
        let filter = config.extension_filter();
        assert!(filter.accepts(".html"));
        assert!(filter.accepts(".htm"));
        assert!(!filter.accepts(".txt"));
    }

    #[test]
    fn test_from_yaml_invalid() {
        let result = LoaderConfig::from_yaml("views_dir: [not, a, string]");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("viewkit.yaml");
        std::fs::write(&path, "views_dir: pages\ntrim_blocks: true\n").unwrap();

        let config = LoaderConfig::from_file(&path).unwrap();
        assert_eq!(config.views_dir, "pages");
        assert!(config.trim_blocks);
    }

    #[test]
    fn test_from_file_missing() {
        let result = LoaderConfig::from_file("/nonexistent/viewkit.yaml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_strict_environment_rejects_undefined() {
        let config = LoaderConfig {
            strict_undefined: true,
            ..LoaderConfig::default()
        };
        let env = config.environment();
        assert!(env.render_str("{{ missing }}", ()).is_err());

        let lenient = LoaderConfig::default().environment();
        assert_eq!(lenient.render_str("[{{ missing }}]", ()).unwrap(), "[]");
    }
}
