//! CLI argument definitions for the shellfoundry packager.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::config::PackConfig;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};

/// Package shell projects for the orchestration platform.
#[derive(Parser, Debug)]
#[command(name = "shellfoundry")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Package the shell in the current directory:\n",
    "    $ shellfoundry pack\n\n",
    "  Package with a debug descriptor in the driver archive:\n",
    "    $ shellfoundry pack --debug\n\n",
    "  Package another project using a specific interpreter:\n",
    "    $ shellfoundry pack --project-dir ../nut_shell --python python3.11\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build dist/<shell name>.zip from the shell project.
    Pack(PackArgs),
}

/// Arguments for the pack command.
#[derive(Parser, Debug, Clone, Default)]
pub struct PackArgs {
    /// Include debug.xml in the driver archive.
    #[arg(long)]
    pub debug: bool,

    /// Shell project root [default: current directory].
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_dir: Option<Utf8PathBuf>,

    /// Python interpreter used to download dependencies.
    #[arg(long, value_name = "PROG")]
    pub python: Option<String>,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(short, long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl PackArgs {
    /// Applies command-line overrides to configuration loaded from disk.
    ///
    /// # Examples
    ///
    /// ```
    /// use shellfoundry_packager::cli::PackArgs;
    /// use shellfoundry_packager::config::PackConfig;
    ///
    /// let args = PackArgs {
    ///     python: Some("python3.11".to_owned()),
    ///     ..PackArgs::default()
    /// };
    /// let config = args.apply_overrides(PackConfig::default());
    /// assert_eq!(config.dependencies.python, "python3.11");
    /// ```
    #[must_use]
    pub fn apply_overrides(&self, mut config: PackConfig) -> PackConfig {
        if let Some(python) = &self.python {
            config.dependencies.python.clone_from(python);
        }
        config
    }

    /// Resolves the project root, using `cwd` when none was given.
    #[must_use]
    pub fn project_root(&self, cwd: &Utf8Path) -> Utf8PathBuf {
        match &self.project_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.to_owned(),
        }
    }

    /// Log level filter matching the requested verbosity.
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
