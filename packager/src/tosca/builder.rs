//! Package assembly for the TOSCA convention.

use super::definition::{DRIVER_ARTIFACT, ShellDefinition};
use super::meta::{ENTRY_DEFINITIONS_KEY, ToscaMeta};
use crate::archive::{ArchiveEntries, DriverArchiveParams, archive_driver};
use crate::builder::PackageBuilder;
use crate::context::{PackagingContext, TOSCA_META_FILE};
use crate::deps::{DependencyResolver, package_dependencies};
use crate::error::{PackError, Result};
use crate::stager::StagingArea;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use log::info;

/// Builds packages for projects carrying `TOSCA-Metadata/TOSCA.meta`.
///
/// The package holds the metadata file, the entry definitions, the template
/// icon and every node type artifact. The `driver` artifact is built from
/// `src/` and the downloaded dependencies; other artifacts are copied from
/// the project. Debug mode has no effect on this convention.
pub struct ToscaPackageBuilder<'a> {
    context: &'a PackagingContext,
    resolver: &'a dyn DependencyResolver,
}

impl<'a> ToscaPackageBuilder<'a> {
    /// Creates a builder for the project in `context`.
    #[must_use]
    pub const fn new(context: &'a PackagingContext, resolver: &'a dyn DependencyResolver) -> Self {
        Self { context, resolver }
    }

    fn add_project_file(&self, entries: &mut ArchiveEntries, relative: &str) -> Result<()> {
        let name = artifact_entry_name(relative)?;
        let path = self.context.root().join(&name);
        if !path.is_file() {
            return Err(PackError::ArtifactMissing { file: name });
        }
        entries.add_file(path, name);
        Ok(())
    }

    fn add_drivers(
        &self,
        staging: &StagingArea,
        entries: &mut ArchiveEntries,
        driver_files: &[String],
    ) -> Result<()> {
        if driver_files.is_empty() {
            return Ok(());
        }
        let source_dir = self.context.source_dir();
        if !source_dir.is_dir() {
            return Err(PackError::DriverSourceMissing { path: source_dir });
        }

        let dependencies_dir = staging.dependencies_dir();
        package_dependencies(
            self.resolver,
            &self.context.requirements_path(),
            &dependencies_dir,
        )?;

        for file in driver_files {
            let output_dir = staging.package_dir().join(parent_dir(file));
            let driver = archive_driver(DriverArchiveParams {
                source_dir: &source_dir,
                dependencies_dir: &dependencies_dir,
                driver_name: driver_stem(file),
                output_dir: &output_dir,
                extra_entries: Vec::new(),
            })?;
            entries.add_file(driver, file.clone());
        }
        Ok(())
    }
}

impl PackageBuilder for ToscaPackageBuilder<'_> {
    fn pack(&self) -> Result<Utf8PathBuf> {
        let meta_path = self.context.tosca_meta_path();
        let meta = ToscaMeta::load(&meta_path)?;
        let entry = confined_entry_name(meta.entry_definitions()).ok_or_else(|| {
            PackError::ToscaMetaInvalid {
                reason: format!(
                    "{ENTRY_DEFINITIONS_KEY} {} is outside the project",
                    meta.entry_definitions()
                ),
            }
        })?;
        let definition = ShellDefinition::load(&self.context.root().join(&entry), &entry)?;

        let name = definition
            .template_name()
            .unwrap_or_else(|| self.context.project_name())
            .to_owned();
        info!("packaging TOSCA shell {name} from {entry}");

        let mut entries = ArchiveEntries::new();
        entries.add_file(meta_path, TOSCA_META_FILE);
        entries.add_file(self.context.root().join(&entry), entry.clone());
        if let Some(icon) = &definition.metadata.template_icon {
            self.add_project_file(&mut entries, icon)?;
        }

        let mut driver_files = Vec::new();
        for (artifact_name, artifact) in definition.artifacts() {
            if artifact_name == DRIVER_ARTIFACT {
                driver_files.push(artifact_entry_name(&artifact.file)?);
            } else {
                self.add_project_file(&mut entries, &artifact.file)?;
            }
        }

        // Driver archives are read from here when the package is written.
        let staging = StagingArea::create()?;
        self.add_drivers(&staging, &mut entries, &driver_files)?;

        let output = self.context.output_path(&name);
        entries.write_atomically(&output)?;
        Ok(output)
    }
}

fn artifact_entry_name(relative: &str) -> Result<String> {
    confined_entry_name(relative).ok_or_else(|| PackError::ArtifactOutsideProject {
        file: relative.trim().to_owned(),
    })
}

/// Normalises `relative` and rejects paths that leave the project root.
fn confined_entry_name(relative: &str) -> Option<String> {
    let name = entry_name(relative);
    let confined = !name.is_empty()
        && Utf8Path::new(&name)
            .components()
            .all(|c| matches!(c, Utf8Component::Normal(_) | Utf8Component::CurDir));
    confined.then_some(name)
}

/// Normalises a project-relative path written in a TOSCA document.
fn entry_name(relative: &str) -> String {
    relative
        .trim()
        .replace('\\', "/")
        .trim_start_matches("./")
        .to_owned()
}

fn driver_stem(file: &str) -> &str {
    let base = file.rsplit('/').next().unwrap_or(file);
    base.strip_suffix(".zip").unwrap_or(base)
}

fn parent_dir(file: &str) -> &Utf8Path {
    Utf8Path::new(file).parent().unwrap_or_else(|| Utf8Path::new(""))
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
