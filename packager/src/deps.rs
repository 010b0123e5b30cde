//! Offline packaging of driver dependencies.
//!
//! Dependencies declared in the driver's `requirements.txt` are resolved and
//! downloaded into a staging directory so they can travel inside the driver
//! archive. Nothing is installed into the running environment.

use crate::config::DependencyConfig;
use crate::error::{PackError, Result};
use camino::Utf8Path;
use log::{debug, info};
use std::fs;
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use shellfoundry_packager::deps::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("python3", &["-m", "pip", "--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), shellfoundry_packager::error::PackError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(PackError::from)
    }
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &E {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        (**self).run(cmd, args)
    }
}

/// Resolves declared dependencies and downloads their artifacts.
///
/// Any package index client satisfies this capability. Implementations must
/// include transitive dependencies and must not install anything.
#[cfg_attr(test, mockall::automock)]
pub trait DependencyResolver {
    /// Downloads everything `requirements` needs into `target_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::DependencyResolution`] when resolution or
    /// download fails.
    fn resolve_and_download(&self, requirements: &Utf8Path, target_dir: &Utf8Path) -> Result<()>;
}

/// Resolver backed by `pip download`.
#[derive(Debug, Clone)]
pub struct PipDownloader<E> {
    executor: E,
    config: DependencyConfig,
}

impl<E: CommandExecutor> PipDownloader<E> {
    /// Creates a downloader that runs pip through `executor`.
    #[must_use]
    pub const fn new(executor: E, config: DependencyConfig) -> Self {
        Self { executor, config }
    }

    /// Builds the argument list passed to the Python interpreter.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use shellfoundry_packager::config::DependencyConfig;
    /// use shellfoundry_packager::deps::{PipDownloader, SystemCommandExecutor};
    ///
    /// let pip = PipDownloader::new(SystemCommandExecutor, DependencyConfig::default());
    /// let args = pip.download_args(Utf8Path::new("src/requirements.txt"), Utf8Path::new("deps"));
    /// assert_eq!(
    ///     args,
    ///     ["-m", "pip", "download", "--requirement", "src/requirements.txt", "--dest", "deps"]
    /// );
    /// ```
    #[must_use]
    pub fn download_args(&self, requirements: &Utf8Path, target_dir: &Utf8Path) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-m".to_owned(),
            "pip".to_owned(),
            "download".to_owned(),
            "--requirement".to_owned(),
            requirements.to_string(),
            "--dest".to_owned(),
            target_dir.to_string(),
        ];
        if let Some(index_url) = &self.config.index_url {
            args.push("--index-url".to_owned());
            args.push(index_url.clone());
        }
        for extra in &self.config.extra_index_urls {
            args.push("--extra-index-url".to_owned());
            args.push(extra.clone());
        }
        if self.config.no_binary {
            args.push("--no-binary".to_owned());
            args.push(":all:".to_owned());
        }
        args
    }
}

impl<E: CommandExecutor> DependencyResolver for PipDownloader<E> {
    fn resolve_and_download(&self, requirements: &Utf8Path, target_dir: &Utf8Path) -> Result<()> {
        let args = self.download_args(requirements, target_dir);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let python = self.config.python.as_str();

        debug!("running {python} {}", arg_refs.join(" "));
        let output = self
            .executor
            .run(python, &arg_refs)
            .map_err(|e| PackError::DependencyResolution {
                message: format!("could not run {python}: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let message = if stderr.is_empty() {
                format!("pip exited with {}", output.status)
            } else {
                stderr.to_owned()
            };
            return Err(PackError::DependencyResolution { message });
        }

        Ok(())
    }
}

/// Downloads the dependencies declared in `requirements` into `staging_dir`.
///
/// A missing requirements file is not an error: a driver without
/// dependencies packages with an empty staging area.
///
/// # Errors
///
/// Propagates resolver failures and I/O errors creating `staging_dir`.
pub fn package_dependencies(
    resolver: &dyn DependencyResolver,
    requirements: &Utf8Path,
    staging_dir: &Utf8Path,
) -> Result<()> {
    fs::create_dir_all(staging_dir)?;

    if !requirements.is_file() {
        debug!("no requirements file at {requirements}; skipping dependency download");
        return Ok(());
    }

    info!("downloading dependencies from {requirements}");
    resolver.resolve_and_download(requirements, staging_dir)
}
