//! Project layout conventions and the per-invocation packaging context.
//!
//! Every path the packager reads or writes is derived from an explicit
//! project root held by [`PackagingContext`]; nothing depends on the process
//! working directory.

use crate::archive::ZIP_EXTENSION;
use camino::{Utf8Path, Utf8PathBuf};

/// Authoring manifest, relative to the project root.
pub const MANIFEST_FILE: &str = "shell.yml";
/// Data model directory, relative to the project root.
pub const DATAMODEL_DIR: &str = "datamodel";
/// Driver source directory, relative to the project root.
pub const SOURCE_DIR: &str = "src";
/// Dependency declarations, relative to the driver source directory.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
/// Debug descriptor, in the project root and inside the driver archive.
pub const DEBUG_FILE: &str = "debug.xml";
/// Metadata marker selecting the TOSCA convention.
pub const TOSCA_META_FILE: &str = "TOSCA-Metadata/TOSCA.meta";
/// Output directory, relative to the project root.
pub const DIST_DIR: &str = "dist";
/// Folder holding the driver archive inside a legacy package.
pub const DRIVERS_FOLDER: &str = "Resource Drivers - Python";

/// Returns `true` when `name` can be used verbatim as a single file name
/// under the project, such as the package or driver archive name.
///
/// # Examples
///
/// ```
/// use shellfoundry_packager::context::is_plain_file_name;
///
/// assert!(is_plain_file_name("nut_shell"));
/// assert!(!is_plain_file_name("../escaped"));
/// assert!(!is_plain_file_name(" nut_shell"));
/// ```
#[must_use]
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name == name.trim()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// Inputs shared by both packaging paths for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingContext {
    root: Utf8PathBuf,
    dist_dir: Utf8PathBuf,
    debug: bool,
}

impl PackagingContext {
    /// Creates a context for the project at `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use shellfoundry_packager::context::PackagingContext;
    ///
    /// let context = PackagingContext::new("/work/nut_shell", false);
    /// assert_eq!(context.dist_dir(), "/work/nut_shell/dist");
    /// assert_eq!(context.output_path("nut_shell"), "/work/nut_shell/dist/nut_shell.zip");
    /// ```
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>, debug: bool) -> Self {
        let root = root.into();
        let dist_dir = root.join(DIST_DIR);
        Self {
            root,
            dist_dir,
            debug,
        }
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Directory receiving finished packages.
    #[must_use]
    pub fn dist_dir(&self) -> &Utf8Path {
        &self.dist_dir
    }

    /// Whether the caller requested a debug package.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Path of the authoring manifest.
    #[must_use]
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Path of the data model directory.
    #[must_use]
    pub fn datamodel_dir(&self) -> Utf8PathBuf {
        self.root.join(DATAMODEL_DIR)
    }

    /// Path of the driver source directory.
    #[must_use]
    pub fn source_dir(&self) -> Utf8PathBuf {
        self.root.join(SOURCE_DIR)
    }

    /// Path of the driver's requirements file.
    #[must_use]
    pub fn requirements_path(&self) -> Utf8PathBuf {
        self.source_dir().join(REQUIREMENTS_FILE)
    }

    /// Path of the project's own debug descriptor.
    #[must_use]
    pub fn debug_descriptor_path(&self) -> Utf8PathBuf {
        self.root.join(DEBUG_FILE)
    }

    /// Path of the TOSCA metadata marker.
    #[must_use]
    pub fn tosca_meta_path(&self) -> Utf8PathBuf {
        self.root.join(TOSCA_META_FILE)
    }

    /// Final location of the package named `name`.
    #[must_use]
    pub fn output_path(&self, name: &str) -> Utf8PathBuf {
        self.dist_dir.join(format!("{name}.{ZIP_EXTENSION}"))
    }

    /// Directory name of the project root, used when no other name applies.
    #[must_use]
    pub fn project_name(&self) -> &str {
        self.root.file_name().unwrap_or("shell")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn paths_follow_project_layout() {
        let context = PackagingContext::new("/work/nut_shell", true);

        assert_eq!(context.manifest_path(), "/work/nut_shell/shell.yml");
        assert_eq!(
            context.requirements_path(),
            "/work/nut_shell/src/requirements.txt"
        );
        assert_eq!(
            context.tosca_meta_path(),
            "/work/nut_shell/TOSCA-Metadata/TOSCA.meta"
        );
        assert!(context.debug());
    }

    #[test]
    fn project_name_is_root_directory_name() {
        let context = PackagingContext::new("/work/nut-shell", false);

        assert_eq!(context.project_name(), "nut-shell");
    }

    #[rstest]
    #[case::plain("nut_shell", true)]
    #[case::dotted("Nut.Shell-2", true)]
    #[case::empty("", false)]
    #[case::parent("..", false)]
    #[case::current(".", false)]
    #[case::traversal("../../escaped", false)]
    #[case::nested("drivers/nutshell", false)]
    #[case::backslash("drivers\\nutshell", false)]
    #[case::leading_space(" nut_shell", false)]
    #[case::trailing_space("nut_shell ", false)]
    fn plain_file_names_stay_in_place(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_plain_file_name(name), expected);
    }
}
