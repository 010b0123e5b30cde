//! Shellfoundry shell packager library.
//!
//! This crate turns a shell project directory into a distributable package
//! for the downstream orchestration platform. It is used by the
//! `shellfoundry` CLI binary and can be driven programmatically with an
//! injected console sink and dependency resolver.
//!
//! Two packaging conventions are supported. Legacy shells are described by
//! `shell.yml` and produce `dist/<name>.zip` with the data model and a nested
//! `Resource Drivers - Python/<driver>.zip`. Shells carrying
//! `TOSCA-Metadata/TOSCA.meta` are packaged from their entry definitions.
//!
//! # Modules
//!
//! - [`archive`] - Zip assembly and the driver archiver
//! - [`builder`] - Legacy package builder
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Optional `shellfoundry.toml` configuration
//! - [`context`] - Project layout and per-invocation context
//! - [`debug_descriptor`] - `debug.xml` for debug packages
//! - [`deps`] - Offline download of driver dependencies
//! - [`echo`] - Console sink capability
//! - [`error`] - Error types and categories
//! - [`executor`] - The pack command façade
//! - [`manifest`] - `shell.yml` loader
//! - [`project`] - Packaging convention detection
//! - [`stager`] - Per-run staging area
//! - [`tosca`] - TOSCA convention packaging
//!
//! # Examples
//!
//! ```no_run
//! use shellfoundry_packager::config::PackConfig;
//! use shellfoundry_packager::deps::{PipDownloader, SystemCommandExecutor};
//! use shellfoundry_packager::echo::StdoutEcho;
//! use shellfoundry_packager::executor::PackCommandExecutor;
//!
//! let root = camino::Utf8Path::new("nut_shell");
//! let config = PackConfig::load(root)?;
//! let resolver = PipDownloader::new(SystemCommandExecutor, config.dependencies);
//! let executor = PackCommandExecutor::new(root, &StdoutEcho, &resolver)
//!     .with_debug_config(config.debug);
//! executor.pack(false)?;
//! # Ok::<(), shellfoundry_packager::error::PackError>(())
//! ```

pub mod archive;
pub mod builder;
pub mod cli;
pub mod config;
pub mod context;
pub mod debug_descriptor;
pub mod deps;
pub mod echo;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod project;
pub mod stager;
pub mod tosca;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
