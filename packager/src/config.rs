//! Packaging configuration loaded from `shellfoundry.toml`.
//!
//! The file is optional and lives in the project root. Every setting has a
//! default, so an empty file and a missing file behave the same:
//!
//! ```toml
//! [dependencies]
//! python = "python3.11"
//! index_url = "https://pypi.example.com/simple"
//! no_binary = true
//!
//! [debug]
//! host = "10.0.0.5"
//! port = 5678
//! ```

use crate::error::{PackError, Result};
use camino::Utf8Path;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;

/// Name of the optional configuration file in the project root.
pub const CONFIG_FILE_NAME: &str = "shellfoundry.toml";

/// Top-level packaging configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Settings for offline dependency downloads.
    pub dependencies: DependencyConfig,
    /// Settings for the generated debug descriptor.
    pub debug: DebugConfig,
}

impl PackConfig {
    /// Loads `shellfoundry.toml` from `root`, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidConfig`] if the file cannot be parsed, or
    /// [`PackError::Io`] if it exists but cannot be read.
    pub fn load(root: &Utf8Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no {CONFIG_FILE_NAME} in {root}; using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(PackError::Io(e)),
        };

        toml::from_str(&contents).map_err(|e| PackError::InvalidConfig {
            path,
            reason: e.message().to_owned(),
        })
    }
}

/// Settings for the package index client.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyConfig {
    /// Python interpreter used to run `pip`.
    pub python: String,
    /// Replacement for the default package index.
    pub index_url: Option<String>,
    /// Additional package indexes.
    pub extra_index_urls: Vec<String>,
    /// Download source distributions only.
    pub no_binary: bool,
}

impl DependencyConfig {
    fn default_python() -> String {
        "python3".to_owned()
    }
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            python: Self::default_python(),
            index_url: None,
            extra_index_urls: Vec::new(),
            no_binary: false,
        }
    }
}

/// Remote debugging endpoint written into a generated `debug.xml`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    /// Host the driver connects back to.
    pub host: String,
    /// Port the debugger listens on.
    pub port: u16,
}

impl DebugConfig {
    const fn default_port() -> u16 {
        5678
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: Self::default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn project_root() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp_dir.path().to_owned()).expect("non-UTF8 temp path");
        (temp_dir, root)
    }

    #[rstest]
    fn missing_file_yields_defaults(project_root: (TempDir, Utf8PathBuf)) {
        let (_temp_dir, root) = project_root;
        let config = PackConfig::load(&root).expect("defaults should load");

        assert_eq!(config, PackConfig::default());
        assert_eq!(config.dependencies.python, "python3");
        assert_eq!(config.debug.port, 5678);
    }

    #[rstest]
    fn partial_file_keeps_remaining_defaults(project_root: (TempDir, Utf8PathBuf)) {
        let (_temp_dir, root) = project_root;
        fs::write(
            root.join(CONFIG_FILE_NAME),
            "[dependencies]\nindex_url = \"https://pypi.example.com/simple\"\n",
        )
        .expect("write config");

        let config = PackConfig::load(&root).expect("config should load");

        assert_eq!(
            config.dependencies.index_url.as_deref(),
            Some("https://pypi.example.com/simple")
        );
        assert_eq!(config.dependencies.python, "python3");
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[rstest]
    #[case::unknown_key("[dependencies]\nmirror = \"x\"\n")]
    #[case::wrong_type("[debug]\nport = \"eighty\"\n")]
    fn invalid_file_is_rejected(project_root: (TempDir, Utf8PathBuf), #[case] contents: &str) {
        let (_temp_dir, root) = project_root;
        fs::write(root.join(CONFIG_FILE_NAME), contents).expect("write config");

        let err = PackConfig::load(&root).expect_err("invalid config should fail");

        assert!(matches!(err, PackError::InvalidConfig { .. }), "got {err:?}");
    }
}
