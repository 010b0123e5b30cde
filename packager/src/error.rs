//! Error types for shell packaging.
//!
//! Every variant renders the exact text shown to the user through the console
//! sink, so the `Display` output of configuration errors is part of the
//! behavioural contract. [`PackError::category`] groups variants into the
//! three categories the pack command distinguishes.

use camino::Utf8PathBuf;
use thiserror::Error;

/// How a [`PackError`] is handled by the pack command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The project on disk is missing files or holds malformed descriptors.
    Configuration,
    /// The package index client could not resolve or download dependencies.
    DependencyResolution,
    /// Reading the project or writing the package failed.
    Io,
}

/// Errors that can occur while packaging a shell.
#[derive(Debug, Error)]
pub enum PackError {
    /// `shell.yml` does not exist in the project root.
    #[error("shell.yml file is missing")]
    ManifestMissing {
        /// Path where the manifest was expected.
        path: Utf8PathBuf,
    },

    /// `shell.yml` exists but does not describe a shell.
    #[error("shell.yml format is wrong")]
    ManifestFormat {
        /// Path to the malformed manifest.
        path: Utf8PathBuf,
        /// Parser or validation message, kept out of the console text.
        reason: String,
    },

    /// A required data model file is absent.
    #[error("datamodel/{file} file is missing")]
    DataModelFileMissing {
        /// File name inside the `datamodel` directory.
        file: &'static str,
    },

    /// The driver source directory does not exist.
    #[error("src directory is missing")]
    DriverSourceMissing {
        /// Path where the driver source was expected.
        path: Utf8PathBuf,
    },

    /// `TOSCA-Metadata/TOSCA.meta` could not be interpreted.
    #[error("TOSCA.meta is invalid: {reason}")]
    ToscaMetaInvalid {
        /// Description of the problem.
        reason: String,
    },

    /// The entry definitions file named by `TOSCA.meta` is absent.
    #[error("{entry} file is missing")]
    ShellDefinitionMissing {
        /// Entry definitions path as written in `TOSCA.meta`.
        entry: String,
    },

    /// The entry definitions file is not a YAML mapping.
    #[error("{entry} format is wrong")]
    ShellDefinitionFormat {
        /// Entry definitions path as written in `TOSCA.meta`.
        entry: String,
    },

    /// A file referenced by the shell definition does not exist.
    #[error("artifact {file} is missing")]
    ArtifactMissing {
        /// Artifact path relative to the project root.
        file: String,
    },

    /// A file referenced by the shell definition points outside the project.
    #[error("artifact {file} is outside the project")]
    ArtifactOutsideProject {
        /// Artifact path as written in the shell definition.
        file: String,
    },

    /// `shellfoundry.toml` could not be parsed.
    #[error("invalid shellfoundry.toml at {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// Dependency resolution or download failed.
    #[error("failed to download driver dependencies: {message}")]
    DependencyResolution {
        /// Description of the failure, usually the resolver's stderr.
        message: String,
    },

    /// A path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed while collecting archive members.
    #[error("failed to traverse directory: {0}")]
    Traverse(#[from] walkdir::Error),

    /// Writing or reading a zip archive failed.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Test stub received an unexpected or mismatched invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl PackError {
    /// Returns the handling category for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use shellfoundry_packager::error::{ErrorCategory, PackError};
    ///
    /// let err = PackError::ManifestMissing {
    ///     path: Utf8PathBuf::from("nut_shell/shell.yml"),
    /// };
    /// assert_eq!(err.category(), ErrorCategory::Configuration);
    /// assert_eq!(err.to_string(), "shell.yml file is missing");
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ManifestMissing { .. }
            | Self::ManifestFormat { .. }
            | Self::DataModelFileMissing { .. }
            | Self::DriverSourceMissing { .. }
            | Self::ToscaMetaInvalid { .. }
            | Self::ShellDefinitionMissing { .. }
            | Self::ShellDefinitionFormat { .. }
            | Self::ArtifactMissing { .. }
            | Self::ArtifactOutsideProject { .. }
            | Self::InvalidConfig { .. } => ErrorCategory::Configuration,
            Self::DependencyResolution { .. } => ErrorCategory::DependencyResolution,
            Self::NonUtf8Path { .. } | Self::Io(_) | Self::Traverse(_) | Self::Archive(_) => {
                ErrorCategory::Io
            }
            #[cfg(any(test, feature = "test-support"))]
            Self::StubMismatch { .. } => ErrorCategory::Io,
        }
    }

    /// Returns `true` when the error is reported on the console and the
    /// invocation ends cleanly instead of failing.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Configuration | ErrorCategory::DependencyResolution
        )
    }
}

/// Result type alias using [`PackError`].
pub type Result<T> = std::result::Result<T, PackError>;
