//! Loader for the `shell.yml` authoring manifest.
//!
//! The manifest is a YAML mapping with a single `shell` root key:
//!
//! ```yaml
//! shell:
//!     name: nut_shell
//!     author: Chuck Norris
//!     email: chuck@hollywood.io
//!     description: Save the world
//!     version: 1.0.0
//!     driver_name: nutshell
//! ```
//!
//! A missing file and a malformed file are distinct errors. Neither yields a
//! partial descriptor.

use crate::context::is_plain_file_name;
use crate::error::{PackError, Result};
use camino::Utf8Path;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;

/// Typed view of the `shell` section of `shell.yml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellDescriptor {
    /// Shell name; names the output package.
    pub name: String,
    /// Author of the shell.
    pub author: String,
    /// Contact e-mail of the author.
    pub email: String,
    /// Free-form description.
    pub description: String,
    /// Shell version string.
    pub version: String,
    /// Driver name; names the nested driver archive.
    pub driver_name: String,
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    shell: ShellSection,
}

#[derive(Debug, Deserialize)]
struct ShellSection {
    name: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "scalar_to_string")]
    version: String,
    driver_name: String,
}

/// Accepts `1.0.0` as well as `1.0` or `1`, which YAML reads as numbers.
fn scalar_to_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar version, found {other:?}"
        ))),
    }
}

/// Loads and validates the manifest at `path`.
///
/// # Errors
///
/// Returns [`PackError::ManifestMissing`] when the file does not exist and
/// [`PackError::ManifestFormat`] when it is not a `shell` mapping with a
/// non-empty `name` and `driver_name`. Other read failures surface as
/// [`PackError::Io`].
pub fn load(path: &Utf8Path) -> Result<ShellDescriptor> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(PackError::ManifestMissing {
                path: path.to_owned(),
            });
        }
        Err(e) => return Err(PackError::Io(e)),
    };

    parse(&contents).map_err(|reason| {
        debug!("rejecting manifest {path}: {reason}");
        PackError::ManifestFormat {
            path: path.to_owned(),
            reason,
        }
    })
}

/// Parses manifest text, returning a human-readable reason on failure.
fn parse(contents: &str) -> std::result::Result<ShellDescriptor, String> {
    let file: ManifestFile = serde_yaml::from_str(contents).map_err(|e| e.to_string())?;
    let ShellSection {
        name,
        author,
        email,
        description,
        version,
        driver_name,
    } = file.shell;

    if name.trim().is_empty() {
        return Err("shell.name must not be empty".to_owned());
    }
    if driver_name.trim().is_empty() {
        return Err("shell.driver_name must not be empty".to_owned());
    }
    if !is_plain_file_name(&name) {
        return Err(format!("shell.name {name:?} is not a plain file name"));
    }
    if !is_plain_file_name(&driver_name) {
        return Err(format!(
            "shell.driver_name {driver_name:?} is not a plain file name"
        ));
    }

    Ok(ShellDescriptor {
        name,
        author,
        email,
        description,
        version,
        driver_name,
    })
}
