//! Zip assembly and the driver archiver.
//!
//! [`ArchiveEntries`] collects archive members keyed by their name inside the
//! zip, so membership is decided before anything is written and the write
//! order is always sorted. [`archive_driver`] uses it to merge the driver's
//! source tree with its staged dependencies into `<driver_name>.zip`.

use crate::error::{PackError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Extension appended to archive names.
pub const ZIP_EXTENSION: &str = "zip";

#[derive(Debug, Clone)]
enum EntrySource {
    File(Utf8PathBuf),
    Bytes(Vec<u8>),
}

/// Ordered archive membership: in-archive name to content source.
#[derive(Debug, Clone, Default)]
pub struct ArchiveEntries {
    entries: BTreeMap<String, EntrySource>,
}

impl ArchiveEntries {
    /// Creates an empty set of entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every regular file under `dir`, named by its path relative to
    /// `dir` and placed under `prefix` (empty for the archive root).
    ///
    /// Files already present under the same name are replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be traversed or contains a path that
    /// is not valid UTF-8.
    pub fn add_tree(&mut self, dir: &Utf8Path, prefix: &str) -> Result<()> {
        self.add_tree_with(dir, |relative| join_name(prefix, relative))
    }

    /// Adds every regular file under `dir`, naming each entry by applying
    /// `name_for` to its `/`-separated path relative to `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be traversed or contains a path that
    /// is not valid UTF-8.
    pub fn add_tree_with<F>(&mut self, dir: &Utf8Path, name_for: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(dir)
                .map_err(|_| non_utf8(entry.path()))?;
            let name = name_for(&archive_name(relative)?);
            let source = utf8_path(entry.path())?;
            self.add_file(source, name);
        }
        Ok(())
    }

    /// Adds a single file from disk under `name`.
    pub fn add_file(&mut self, source: Utf8PathBuf, name: impl Into<String>) {
        self.insert(name.into(), EntrySource::File(source));
    }

    /// Adds in-memory content under `name`.
    pub fn add_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.insert(name.into(), EntrySource::Bytes(bytes));
    }

    fn insert(&mut self, name: String, source: EntrySource) {
        if let Some(previous) = self.entries.insert(name.clone(), source) {
            warn!("archive entry {name} replaces an earlier entry ({previous:?})");
        }
    }

    /// Returns `true` if an entry named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates over entry names in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the entries as a zip archive into `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if a source file cannot be read or the archive
    /// cannot be written.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        for (name, source) in &self.entries {
            zip.start_file(name.as_str(), file_options())?;
            match source {
                EntrySource::File(path) => {
                    let mut file = File::open(path)?;
                    io::copy(&mut file, &mut zip)?;
                }
                EntrySource::Bytes(bytes) => zip.write_all(bytes)?,
            }
        }
        Ok(zip.finish()?)
    }

    /// Writes the archive to `path`, replacing any existing file.
    ///
    /// The archive is first written to a temporary file in the same
    /// directory and renamed into place, so `path` never holds a partial
    /// archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// archive cannot be written or renamed.
    pub fn write_atomically(&self, path: &Utf8Path) -> Result<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        fs::create_dir_all(parent)?;

        let mut temp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".partial")
            .tempfile_in(parent)?;
        self.write_to(temp.as_file_mut())?;
        temp.as_file().sync_all()?;
        persist(temp, path)?;

        debug!("wrote {} entries to {path}", self.len());
        Ok(())
    }
}

fn persist(temp: NamedTempFile, path: &Utf8Path) -> Result<()> {
    temp.persist(path).map_err(|e| PackError::Io(e.error))?;
    Ok(())
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644)
}

/// Converts a relative filesystem path into a `/`-separated archive name.
fn archive_name(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| non_utf8(relative))?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}

fn join_name(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}

fn utf8_path(path: &Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path.to_path_buf()).map_err(|_| non_utf8(path))
}

fn non_utf8(path: &Path) -> PackError {
    PackError::NonUtf8Path {
        path: path.display().to_string(),
    }
}

/// Input parameters for [`archive_driver`].
#[derive(Debug)]
pub struct DriverArchiveParams<'a> {
    /// Driver source tree.
    pub source_dir: &'a Utf8Path,
    /// Staged dependency artifacts.
    pub dependencies_dir: &'a Utf8Path,
    /// Driver name; the archive is written as `<driver_name>.zip`.
    pub driver_name: &'a str,
    /// Directory receiving the archive.
    pub output_dir: &'a Utf8Path,
    /// Additional in-memory entries placed at the archive root.
    pub extra_entries: Vec<(String, Vec<u8>)>,
}

/// Returns the file name of a driver archive.
///
/// # Examples
///
/// ```
/// use shellfoundry_packager::archive::driver_archive_name;
///
/// assert_eq!(driver_archive_name("nutshell"), "nutshell.zip");
/// ```
#[must_use]
pub fn driver_archive_name(driver_name: &str) -> String {
    format!("{driver_name}.{ZIP_EXTENSION}")
}

/// Zips the driver source and staged dependencies into one archive.
///
/// Source files and dependency artifacts share the archive root. When both
/// provide the same name the source file is kept.
///
/// # Errors
///
/// Returns [`PackError::DriverSourceMissing`] if `source_dir` is not a
/// directory, or an I/O or archive error if writing fails.
pub fn archive_driver(params: DriverArchiveParams<'_>) -> Result<Utf8PathBuf> {
    if !params.source_dir.is_dir() {
        return Err(PackError::DriverSourceMissing {
            path: params.source_dir.to_owned(),
        });
    }

    let mut entries = ArchiveEntries::new();
    if params.dependencies_dir.is_dir() {
        entries.add_tree(params.dependencies_dir, "")?;
    }
    entries.add_tree(params.source_dir, "")?;
    for (name, bytes) in params.extra_entries {
        entries.add_bytes(name, bytes);
    }

    fs::create_dir_all(params.output_dir)?;
    let archive_path = params
        .output_dir
        .join(driver_archive_name(params.driver_name));
    let file = File::create(&archive_path)?;
    entries.write_to(file)?;

    debug!(
        "archived driver {} with {} entries to {archive_path}",
        params.driver_name,
        entries.len()
    );
    Ok(archive_path)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
