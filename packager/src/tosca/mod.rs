//! Packaging for shells following the TOSCA metadata convention.
//!
//! A project is a TOSCA shell when it contains `TOSCA-Metadata/TOSCA.meta`.
//! The metadata names an entry definitions file, which in turn declares the
//! package name and the artifacts to ship.

mod builder;
mod definition;
mod meta;

pub use builder::ToscaPackageBuilder;
pub use definition::{Artifact, DRIVER_ARTIFACT, NodeType, ShellDefinition, TemplateMetadata};
pub use meta::{ENTRY_DEFINITIONS_KEY, ToscaMeta};
