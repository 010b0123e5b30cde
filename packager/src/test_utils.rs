//! Shared test utilities for the packager crate.

use crate::deps::{CommandExecutor, DependencyResolver};
use crate::echo::Echo;
use crate::error::{PackError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::process::{ExitStatus, Output};
use tempfile::TempDir;
use zip::ZipArchive;

/// Manifest of the reference `nut_shell` project.
pub const NUT_SHELL_MANIFEST: &str = "\
shell:
    name: nut_shell
    author: Chuck Norris
    email: chuck@hollywood.io
    description: Save the world
    version: 1.0.0
    driver_name: nutshell
";

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "python3").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut expected = self.expected.borrow_mut();
        let Some(call) = expected.pop_front() else {
            return Err(PackError::StubMismatch {
                message: format!("unexpected command invocation: {cmd} {}", args.join(" ")),
            });
        };

        if call.cmd != cmd || call.args != args {
            return Err(PackError::StubMismatch {
                message: format!(
                    "expected `{} {}`, got `{cmd} {}`",
                    call.cmd,
                    call.args.join(" "),
                    args.join(" ")
                ),
            });
        }

        call.result
    }
}

/// A `CommandExecutor` that records every invocation and reports success.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl RecordingExecutor {
    /// Creates an executor with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(command, arguments)` pairs, in invocation order.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        self.calls.borrow_mut().push((
            cmd.to_owned(),
            args.iter().map(|arg| (*arg).to_owned()).collect(),
        ));
        Ok(success_output())
    }
}

/// A dependency resolver that writes fake artifacts instead of downloading.
#[derive(Debug, Default)]
pub struct StubResolver {
    artifacts: Vec<(String, String)>,
    failure: Option<String>,
    calls: Cell<usize>,
}

impl StubResolver {
    /// Creates a resolver that succeeds without producing artifacts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver that writes each `(file name, contents)` pair into
    /// the target directory.
    pub fn with_artifacts(artifacts: &[(&str, &str)]) -> Self {
        Self {
            artifacts: artifacts
                .iter()
                .map(|(name, contents)| ((*name).to_owned(), (*contents).to_owned()))
                .collect(),
            ..Self::default()
        }
    }

    /// Creates a resolver that fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Self::default()
        }
    }

    /// Number of times the resolver was invoked.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl DependencyResolver for StubResolver {
    fn resolve_and_download(&self, _requirements: &Utf8Path, target_dir: &Utf8Path) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        if let Some(message) = &self.failure {
            // Leave a partial download behind; it must never reach the package.
            fs::write(target_dir.join("partial.whl.part"), b"partial")?;
            return Err(PackError::DependencyResolution {
                message: message.clone(),
            });
        }
        for (name, contents) in &self.artifacts {
            fs::write(target_dir.join(name), contents)?;
        }
        Ok(())
    }
}

/// Console sink that records every message.
#[derive(Debug, Default)]
pub struct RecordingEcho {
    messages: RefCell<Vec<String>>,
}

impl RecordingEcho {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages echoed so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Echo for RecordingEcho {
    fn echo(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}

/// A shell project laid out in a temporary directory.
#[derive(Debug)]
pub struct ProjectFixture {
    _temp_dir: TempDir,
    root: Utf8PathBuf,
}

impl ProjectFixture {
    /// Creates an empty project directory named `name`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn empty(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let parent =
            Utf8PathBuf::try_from(temp_dir.path().to_owned()).expect("non-UTF8 temp path");
        let root = parent.join(name);
        fs::create_dir_all(&root).expect("failed to create project root");
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Creates the reference legacy project: manifest, data model triplet
    /// and a driver source file.
    pub fn nut_shell() -> Self {
        let fixture = Self::empty("nut_shell");
        fixture.write("shell.yml", NUT_SHELL_MANIFEST);
        fixture.write("datamodel/metadata.xml", "<Metadata/>");
        fixture.write("datamodel/datamodel.xml", "<DataModelInfo/>");
        fixture.write("datamodel/shellconfig.xml", "<ShellsConfiguration/>");
        fixture.write("src/driver.py", "class NutShellDriver: pass\n");
        fixture
    }

    /// Creates a TOSCA project whose definition names a driver artifact.
    pub fn tosca_shell() -> Self {
        let fixture = Self::empty("nut-shell");
        fixture.write(
            "TOSCA-Metadata/TOSCA.meta",
            "TOSCA-Meta-File-Version: 1.0 \n\
             CSAR-Version: 1.1 \n\
             Created-By: Anonymous \n\
             Entry-Definitions: shell-definition.yml",
        );
        fixture.write(
            "shell-definition.yml",
            "\
tosca_definitions_version: tosca_simple_yaml_1_0
metadata:
  template_name: NutShell
  template_author: Anonymous
  template_version: 0.1.0
  template_icon: shell-icon.png
node_types:
  vendor.switch.NutShell:
    derived_from: cloudshell.nodes.Switch
    artifacts:
      icon:
        file: shell-icon.png
        type: tosca.artifacts.File
      driver:
        file: NutShellDriver.zip
        type: tosca.artifacts.File
",
        );
        fixture.write("shell-icon.png", "png");
        fixture.write("src/driver.py", "class NutShellDriver: pass\n");
        fixture
    }

    /// Project root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Writes `contents` to `relative`, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, relative: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directory");
        }
        fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Removes the file at `relative`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be removed.
    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.root.join(relative)).expect("failed to remove file");
    }

    /// Path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Names of the files under `dist/`, sorted. Empty when `dist/` is absent.
    pub fn dist_files(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.root.join("dist")) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| {
                e.expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

/// Member names of the zip archive at `path`, in archive order.
///
/// # Panics
///
/// Panics if the archive cannot be read.
pub fn archive_members(path: &Utf8Path) -> Vec<String> {
    let file = File::open(path).expect("open archive");
    members_of(file)
}

/// Contents of member `name` of the zip archive at `path`.
///
/// # Panics
///
/// Panics if the archive or the member cannot be read.
pub fn read_member(path: &Utf8Path, name: &str) -> Vec<u8> {
    let file = File::open(path).expect("open archive");
    let mut archive = ZipArchive::new(file).expect("read archive");
    let mut entry = archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("member {name} missing from {path}: {e}"));
    let mut contents = Vec::new();
    entry.read_to_end(&mut contents).expect("read member");
    contents
}

/// Member names of the zip archive stored as member `name` of `path`.
///
/// # Panics
///
/// Panics if either archive cannot be read.
pub fn nested_members(path: &Utf8Path, name: &str) -> Vec<String> {
    members_of(Cursor::new(read_member(path, name)))
}

fn members_of<R: Read + std::io::Seek>(reader: R) -> Vec<String> {
    let mut archive = ZipArchive::new(reader).expect("read archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_owned())
        .collect()
}
