//! Parser for `TOSCA-Metadata/TOSCA.meta`.

use crate::error::{PackError, Result};
use camino::Utf8Path;
use std::fs;

/// Key naming the entry definitions file.
pub const ENTRY_DEFINITIONS_KEY: &str = "Entry-Definitions";

/// `Key: Value` pairs of a TOSCA metadata file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToscaMeta {
    entries: Vec<(String, String)>,
    entry_definitions: String,
}

impl ToscaMeta {
    /// Parses metadata text.
    ///
    /// Keys and values are trimmed and blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::ToscaMetaInvalid`] when a line has no `:` or the
    /// `Entry-Definitions` key is absent or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use shellfoundry_packager::tosca::ToscaMeta;
    ///
    /// let meta = ToscaMeta::parse(
    ///     "TOSCA-Meta-File-Version: 1.0 \nEntry-Definitions: shell-definition.yml",
    /// )?;
    /// assert_eq!(meta.entry_definitions(), "shell-definition.yml");
    /// assert_eq!(meta.get("TOSCA-Meta-File-Version"), Some("1.0"));
    /// # Ok::<(), shellfoundry_packager::error::PackError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                return Err(PackError::ToscaMetaInvalid {
                    reason: format!("line {} is not a `Key: Value` pair", index + 1),
                });
            };
            entries.push((key.trim().to_owned(), value.trim().to_owned()));
        }

        let entry_definitions = entries
            .iter()
            .find(|(key, _)| key == ENTRY_DEFINITIONS_KEY)
            .map(|(_, value)| value.clone())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| PackError::ToscaMetaInvalid {
                reason: format!("{ENTRY_DEFINITIONS_KEY} is missing"),
            })?;

        Ok(Self {
            entries,
            entry_definitions,
        })
    }

    /// Reads and parses the metadata file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Io`] if the file cannot be read, or the errors of
    /// [`ToscaMeta::parse`].
    pub fn load(path: &Utf8Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    /// Path of the entry definitions file, relative to the project root.
    #[must_use]
    pub fn entry_definitions(&self) -> &str {
        &self.entry_definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn values_are_trimmed() {
        let meta = ToscaMeta::parse(
            "TOSCA-Meta-File-Version: 1.0 \n\
             CSAR-Version: 1.1 \n\
             Created-By: Anonymous \n\
             Entry-Definitions: shell-definition.yml",
        )
        .expect("valid metadata");

        assert_eq!(meta.get("CSAR-Version"), Some("1.1"));
        assert_eq!(meta.get("Created-By"), Some("Anonymous"));
        assert_eq!(meta.entry_definitions(), "shell-definition.yml");
    }

    #[rstest]
    #[case::no_entry("TOSCA-Meta-File-Version: 1.0\n")]
    #[case::empty_entry("Entry-Definitions:   \n")]
    #[case::not_key_value("Entry-Definitions: a.yml\nnonsense\n")]
    fn invalid_metadata_is_rejected(#[case] text: &str) {
        let err = ToscaMeta::parse(text).expect_err("metadata should be rejected");

        assert!(matches!(err, PackError::ToscaMetaInvalid { .. }), "got {err:?}");
    }
}
