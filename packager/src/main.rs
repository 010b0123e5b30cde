//! Shellfoundry CLI entrypoint.
//!
//! This binary packages a shell project into `dist/`. User-facing messages go
//! to stdout through the console sink; diagnostics go to stderr through the
//! logger.

use camino::Utf8PathBuf;
use clap::Parser;
use shellfoundry_packager::cli::{Cli, Command, PackArgs};
use shellfoundry_packager::config::PackConfig;
use shellfoundry_packager::deps::{PipDownloader, SystemCommandExecutor};
use shellfoundry_packager::echo::{Echo, StdoutEcho};
use shellfoundry_packager::error::{PackError, Result};
use shellfoundry_packager::executor::{PackCommandExecutor, PackOutcome};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let exit_code = match &cli.command {
        Command::Pack(args) => {
            init_logging(args);
            exit_code_for_run_result(run_pack(args, &StdoutEcho), &mut stderr)
        }
    };
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(args: &PackArgs) {
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run_pack(args: &PackArgs, echo: &dyn Echo) -> Result<PackOutcome> {
    let cwd = std::env::current_dir()?;
    let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| PackError::NonUtf8Path {
        path: e.as_path().display().to_string(),
    })?;
    let root = args.project_root(&cwd);

    let config = match PackConfig::load(&root) {
        Ok(config) => args.apply_overrides(config),
        Err(e) if e.is_reported() => {
            echo.echo(&e.to_string());
            return Ok(PackOutcome::Aborted);
        }
        Err(e) => return Err(e),
    };

    let resolver = PipDownloader::new(SystemCommandExecutor, config.dependencies);
    PackCommandExecutor::new(root, echo, &resolver)
        .with_debug_config(config.debug)
        .pack(args.debug)
}

fn exit_code_for_run_result(result: Result<PackOutcome>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(PackOutcome::Created(_)) => 0,
        Ok(PackOutcome::Aborted) => 1,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
