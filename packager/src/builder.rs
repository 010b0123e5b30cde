//! Legacy shell packaging driven by `shell.yml`.
//!
//! The builder is a linear pipeline with early exit: load the manifest, check
//! the data model, download dependencies into a fresh staging area, archive
//! the driver, then assemble `dist/<shell name>.zip`. Nothing is written to
//! `dist/` until the last step, and that write is atomic.

use crate::archive::{ArchiveEntries, DriverArchiveParams, archive_driver, driver_archive_name};
use crate::config::DebugConfig;
use crate::context::{DEBUG_FILE, DRIVERS_FOLDER, PackagingContext};
use crate::debug_descriptor;
use crate::deps::{DependencyResolver, package_dependencies};
use crate::error::{PackError, Result};
use crate::manifest;
use crate::stager::StagingArea;
use camino::{Utf8Path, Utf8PathBuf};
use log::info;

/// Data model files every legacy shell must provide.
pub const REQUIRED_DATA_MODEL_FILES: [&str; 3] =
    ["metadata.xml", "datamodel.xml", "shellconfig.xml"];

/// A packaging convention able to produce a shell package.
pub trait PackageBuilder {
    /// Builds the package and returns the path of the written archive.
    ///
    /// # Errors
    ///
    /// Returns the [`PackError`] of the first stage that failed. Nothing is
    /// written to the output path in that case.
    fn pack(&self) -> Result<Utf8PathBuf>;
}

/// Builds packages for projects described by `shell.yml`.
pub struct LegacyPackageBuilder<'a> {
    context: &'a PackagingContext,
    resolver: &'a dyn DependencyResolver,
    debug_config: &'a DebugConfig,
}

impl<'a> LegacyPackageBuilder<'a> {
    /// Creates a builder for the project in `context`.
    #[must_use]
    pub const fn new(
        context: &'a PackagingContext,
        resolver: &'a dyn DependencyResolver,
        debug_config: &'a DebugConfig,
    ) -> Self {
        Self {
            context,
            resolver,
            debug_config,
        }
    }

    fn debug_entries(&self) -> Result<Vec<(String, Vec<u8>)>> {
        if !self.context.debug() {
            return Ok(Vec::new());
        }
        let bytes = debug_descriptor::load_or_render(self.context, self.debug_config)?;
        Ok(vec![(DEBUG_FILE.to_owned(), bytes)])
    }
}

impl PackageBuilder for LegacyPackageBuilder<'_> {
    fn pack(&self) -> Result<Utf8PathBuf> {
        let descriptor = manifest::load(&self.context.manifest_path())?;
        info!(
            "packaging shell {} {} with driver {}",
            descriptor.name, descriptor.version, descriptor.driver_name
        );

        let datamodel_dir = self.context.datamodel_dir();
        check_data_model(&datamodel_dir)?;
        let source_dir = self.context.source_dir();
        if !source_dir.is_dir() {
            return Err(PackError::DriverSourceMissing { path: source_dir });
        }

        let staging = StagingArea::create()?;
        let dependencies_dir = staging.dependencies_dir();
        package_dependencies(
            self.resolver,
            &self.context.requirements_path(),
            &dependencies_dir,
        )?;

        let driver_archive = archive_driver(DriverArchiveParams {
            source_dir: &source_dir,
            dependencies_dir: &dependencies_dir,
            driver_name: &descriptor.driver_name,
            output_dir: &staging.package_dir(),
            extra_entries: self.debug_entries()?,
        })?;

        let mut entries = ArchiveEntries::new();
        entries.add_tree_with(&datamodel_dir, data_model_entry_name)?;
        entries.add_file(
            driver_archive,
            format!(
                "{DRIVERS_FOLDER}/{}",
                driver_archive_name(&descriptor.driver_name)
            ),
        );

        let output = self.context.output_path(&descriptor.name);
        entries.write_atomically(&output)?;
        Ok(output)
    }
}

/// Checks that every required data model file exists.
///
/// # Errors
///
/// Returns [`PackError::DataModelFileMissing`] naming the first absent file.
pub fn check_data_model(datamodel_dir: &Utf8Path) -> Result<()> {
    for file in REQUIRED_DATA_MODEL_FILES {
        if !datamodel_dir.join(file).is_file() {
            return Err(PackError::DataModelFileMissing { file });
        }
    }
    Ok(())
}

/// Maps a path relative to `datamodel/` to its place in the package.
///
/// # Examples
///
/// ```
/// use shellfoundry_packager::builder::data_model_entry_name;
///
/// assert_eq!(data_model_entry_name("metadata.xml"), "metadata.xml");
/// assert_eq!(data_model_entry_name("datamodel.xml"), "DataModel/datamodel.xml");
/// assert_eq!(data_model_entry_name("shellconfig.xml"), "Configuration/shellconfig.xml");
/// assert_eq!(data_model_entry_name("icons/shell.png"), "icons/shell.png");
/// ```
#[must_use]
pub fn data_model_entry_name(relative: &str) -> String {
    match relative {
        "datamodel.xml" => "DataModel/datamodel.xml".to_owned(),
        "shellconfig.xml" => "Configuration/shellconfig.xml".to_owned(),
        other => other.to_owned(),
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
