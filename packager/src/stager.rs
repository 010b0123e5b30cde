//! Per-run staging area.
//!
//! Downloaded dependency artifacts and the intermediate driver archive live in
//! a fresh temporary directory that is removed when the [`StagingArea`] is
//! dropped. A staging area is never reused across runs because dependency
//! versions may change between invocations.

use crate::error::{PackError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::trace;
use std::fs;
use tempfile::TempDir;

const STAGING_PREFIX: &str = "shellfoundry-staging-";
const DEPENDENCIES_DIR: &str = "dependencies";
const PACKAGE_DIR: &str = "package";

/// Transient directory holding build byproducts for one invocation.
#[derive(Debug)]
pub struct StagingArea {
    root: Utf8PathBuf,
    _temp_dir: TempDir,
}

impl StagingArea {
    /// Creates a fresh staging area under the system temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or its path is
    /// not valid UTF-8.
    pub fn create() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir()?;
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).map_err(|e| {
            PackError::NonUtf8Path {
                path: e.as_path().display().to_string(),
            }
        })?;

        fs::create_dir_all(root.join(DEPENDENCIES_DIR))?;
        fs::create_dir_all(root.join(PACKAGE_DIR))?;
        trace!("created staging area at {root}");

        Ok(Self {
            root,
            _temp_dir: temp_dir,
        })
    }

    /// Directory receiving downloaded dependency artifacts.
    #[must_use]
    pub fn dependencies_dir(&self) -> Utf8PathBuf {
        self.root.join(DEPENDENCIES_DIR)
    }

    /// Directory receiving intermediate archives.
    #[must_use]
    pub fn package_dir(&self) -> Utf8PathBuf {
        self.root.join(PACKAGE_DIR)
    }

    /// Root of the staging area.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }
}
