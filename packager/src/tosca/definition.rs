//! Typed view of the entry definitions file named by `TOSCA.meta`.
//!
//! Only the parts the packager needs are modelled; everything else in the
//! YAML document is ignored.

use crate::context::is_plain_file_name;
use crate::error::{PackError, Result};
use camino::Utf8Path;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

/// Artifact name whose file is built from the driver source.
pub const DRIVER_ARTIFACT: &str = "driver";

/// Parsed shell definition.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ShellDefinition {
    /// Template metadata.
    #[serde(default)]
    pub metadata: TemplateMetadata,
    /// Node types keyed by type name.
    #[serde(default)]
    pub node_types: BTreeMap<String, NodeType>,
}

/// The `metadata` section of a shell definition.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TemplateMetadata {
    /// Package name.
    #[serde(default)]
    pub template_name: Option<String>,
    /// Icon file, relative to the project root.
    #[serde(default)]
    pub template_icon: Option<String>,
}

/// A node type declared by the shell.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct NodeType {
    /// Artifacts keyed by artifact name.
    #[serde(default)]
    pub artifacts: BTreeMap<String, Artifact>,
}

/// A file shipped with a node type.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Artifact {
    /// File path relative to the project root.
    pub file: String,
}

impl ShellDefinition {
    /// Reads the definition at `path`; `entry` is the name used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::ShellDefinitionMissing`] when the file does not
    /// exist and [`PackError::ShellDefinitionFormat`] when it is not a YAML
    /// mapping of the expected shape or its template name cannot name a
    /// package file.
    pub fn load(path: &Utf8Path, entry: &str) -> Result<Self> {
        if !path.is_file() {
            return Err(PackError::ShellDefinitionMissing {
                entry: entry.to_owned(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let definition: Self = serde_yaml::from_str(&contents).map_err(|e| {
            debug!("rejecting shell definition {path}: {e}");
            PackError::ShellDefinitionFormat {
                entry: entry.to_owned(),
            }
        })?;

        let unusable_name = definition
            .metadata
            .template_name
            .as_deref()
            .filter(|name| !name.trim().is_empty() && !is_plain_file_name(name));
        if let Some(name) = unusable_name {
            debug!("rejecting shell definition {path}: template_name {name:?}");
            return Err(PackError::ShellDefinitionFormat {
                entry: entry.to_owned(),
            });
        }
        Ok(definition)
    }

    /// Non-empty template name, if declared.
    #[must_use]
    pub fn template_name(&self) -> Option<&str> {
        self.metadata
            .template_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Every `(artifact name, artifact)` pair across all node types.
    pub fn artifacts(&self) -> impl Iterator<Item = (&str, &Artifact)> {
        self.node_types.values().flat_map(|node| {
            node.artifacts
                .iter()
                .map(|(name, artifact)| (name.as_str(), artifact))
        })
    }
}
