//! The pack command façade.
//!
//! [`PackCommandExecutor`] picks the packaging convention for a project and
//! reports the outcome through the injected console sink. Configuration and
//! dependency-resolution failures are echoed and end the invocation cleanly;
//! I/O failures are returned to the caller.

use crate::config::DebugConfig;
use crate::context::PackagingContext;
use crate::deps::DependencyResolver;
use crate::echo::Echo;
use crate::error::Result;
use crate::project::ShellProject;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

/// Prefix of the console message reporting a created package.
pub const SUCCESS_MESSAGE: &str = "Shell package was successfully created:";

/// Result of one pack invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackOutcome {
    /// A package was written to the given path.
    Created(Utf8PathBuf),
    /// Packaging stopped on a reported error; nothing was written.
    Aborted,
}

/// Packs the shell project rooted at a given directory.
pub struct PackCommandExecutor<'a> {
    root: Utf8PathBuf,
    echo: &'a dyn Echo,
    resolver: &'a dyn DependencyResolver,
    debug_config: DebugConfig,
}

impl<'a> PackCommandExecutor<'a> {
    /// Creates an executor for the project at `root`.
    #[must_use]
    pub fn new(
        root: impl Into<Utf8PathBuf>,
        echo: &'a dyn Echo,
        resolver: &'a dyn DependencyResolver,
    ) -> Self {
        Self {
            root: root.into(),
            echo,
            resolver,
            debug_config: DebugConfig::default(),
        }
    }

    /// Sets the endpoint used for generated debug descriptors.
    #[must_use]
    pub fn with_debug_config(mut self, debug_config: DebugConfig) -> Self {
        self.debug_config = debug_config;
        self
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Packs the project; `debug` requests a debug descriptor in the driver
    /// archive of legacy shells.
    ///
    /// # Errors
    ///
    /// Returns I/O and archive errors. Every other failure is echoed and
    /// yields [`PackOutcome::Aborted`].
    pub fn pack(&self, debug: bool) -> Result<PackOutcome> {
        let context = PackagingContext::new(self.root.clone(), debug);
        let project = ShellProject::detect(&context);
        debug!("packing {project:?} shell at {}", self.root);

        let builder = project.builder(&context, self.resolver, &self.debug_config);
        match builder.pack() {
            Ok(path) => {
                self.echo.echo(&format!("{SUCCESS_MESSAGE} {path}"));
                Ok(PackOutcome::Created(path))
            }
            Err(e) if e.is_reported() => {
                warn!("packaging aborted: {e}");
                self.echo.echo(&e.to_string());
                Ok(PackOutcome::Aborted)
            }
            Err(e) => Err(e),
        }
    }
}
