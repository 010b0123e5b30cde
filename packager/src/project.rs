//! Detection of the packaging convention a project follows.

use crate::builder::{LegacyPackageBuilder, PackageBuilder};
use crate::config::DebugConfig;
use crate::context::PackagingContext;
use crate::deps::DependencyResolver;
use crate::tosca::ToscaPackageBuilder;

/// Packaging convention of a shell project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellProject {
    /// Described by `shell.yml` with a `datamodel/` directory.
    Legacy,
    /// Described by `TOSCA-Metadata/TOSCA.meta`.
    Descriptor,
}

impl ShellProject {
    /// Selects the convention by checking for the TOSCA metadata marker.
    ///
    /// The marker wins even when a `shell.yml` is also present.
    #[must_use]
    pub fn detect(context: &PackagingContext) -> Self {
        if context.tosca_meta_path().is_file() {
            Self::Descriptor
        } else {
            Self::Legacy
        }
    }

    /// Returns the builder for this convention.
    #[must_use]
    pub fn builder<'a>(
        self,
        context: &'a PackagingContext,
        resolver: &'a dyn DependencyResolver,
        debug_config: &'a DebugConfig,
    ) -> Box<dyn PackageBuilder + 'a> {
        match self {
            Self::Legacy => Box::new(LegacyPackageBuilder::new(context, resolver, debug_config)),
            Self::Descriptor => Box::new(ToscaPackageBuilder::new(context, resolver)),
        }
    }
}
