//! Unit tests for TOSCA package assembly.

use super::*;
use crate::test_utils::{ProjectFixture, StubResolver, archive_members, nested_members};
use rstest::{fixture, rstest};

#[fixture]
fn tosca_shell() -> ProjectFixture {
    ProjectFixture::tosca_shell()
}

fn pack(project: &ProjectFixture, resolver: &StubResolver) -> Result<Utf8PathBuf> {
    let context = PackagingContext::new(project.root(), false);
    ToscaPackageBuilder::new(&context, resolver).pack()
}

#[rstest]
fn package_holds_metadata_definition_and_artifacts(tosca_shell: ProjectFixture) {
    let output = pack(&tosca_shell, &StubResolver::new()).expect("package");

    assert_eq!(output, tosca_shell.path("dist/NutShell.zip"));
    assert_eq!(
        archive_members(&output),
        [
            "NutShellDriver.zip",
            "TOSCA-Metadata/TOSCA.meta",
            "shell-definition.yml",
            "shell-icon.png",
        ]
    );
    assert_eq!(nested_members(&output, "NutShellDriver.zip"), ["driver.py"]);
}

#[rstest]
fn driver_artifact_includes_dependencies(tosca_shell: ProjectFixture) {
    tosca_shell.write("src/requirements.txt", "cloudshell-shell-core\n");
    let resolver = StubResolver::with_artifacts(&[("cloudshell_shell_core-5.0.whl", "wheel")]);

    let output = pack(&tosca_shell, &resolver).expect("package");

    assert_eq!(
        nested_members(&output, "NutShellDriver.zip"),
        ["cloudshell_shell_core-5.0.whl", "driver.py", "requirements.txt"]
    );
}

#[rstest]
fn project_directory_names_package_without_template_name() {
    let project = ProjectFixture::empty("nut-shell");
    project.write(
        "TOSCA-Metadata/TOSCA.meta",
        "Entry-Definitions: shell-definition.yml\n",
    );
    project.write("shell-definition.yml", "tosca_definitions_version: tosca_simple_yaml_1_0\n");
    let resolver = StubResolver::new();

    let output = pack(&project, &resolver).expect("package");

    assert_eq!(output, project.path("dist/nut-shell.zip"));
    assert_eq!(resolver.calls(), 0);
}

#[rstest]
fn malformed_definition_is_reported(tosca_shell: ProjectFixture) {
    tosca_shell.write("shell-definition.yml", "SOME SHELL DEFINITION");

    let err = pack(&tosca_shell, &StubResolver::new()).expect_err("should fail");

    assert_eq!(err.to_string(), "shell-definition.yml format is wrong");
    assert!(tosca_shell.dist_files().is_empty());
}

#[rstest]
fn missing_definition_is_reported(tosca_shell: ProjectFixture) {
    tosca_shell.remove("shell-definition.yml");

    let err = pack(&tosca_shell, &StubResolver::new()).expect_err("should fail");

    assert!(matches!(err, PackError::ShellDefinitionMissing { .. }));
}

#[rstest]
fn missing_icon_is_reported(tosca_shell: ProjectFixture) {
    tosca_shell.remove("shell-icon.png");

    let err = pack(&tosca_shell, &StubResolver::new()).expect_err("should fail");

    match err {
        PackError::ArtifactMissing { file } => assert_eq!(file, "shell-icon.png"),
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn debug_descriptor_is_never_added(tosca_shell: ProjectFixture) {
    tosca_shell.write("debug.xml", "<Debug/>");
    let context = PackagingContext::new(tosca_shell.root(), true);

    let output = ToscaPackageBuilder::new(&context, &StubResolver::new())
        .pack()
        .expect("package");

    assert!(!archive_members(&output).contains(&"debug.xml".to_owned()));
    assert_eq!(nested_members(&output, "NutShellDriver.zip"), ["driver.py"]);
}

#[rstest]
fn driver_archive_outlives_its_staging_step(tosca_shell: ProjectFixture) {
    let output = pack(&tosca_shell, &StubResolver::new()).expect("package");

    assert_eq!(
        nested_members(&output, "NutShellDriver.zip"),
        ["driver.py"],
        "the staged driver must still be readable when the package is written"
    );
}

fn definition_with_artifact(file: &str) -> String {
    format!(
        "\
metadata:
  template_name: NutShell
node_types:
  vendor.switch.NutShell:
    artifacts:
      extra:
        file: '{file}'
"
    )
}

#[rstest]
#[case::parent("../secret.txt")]
#[case::nested_parent("docs/../../secret.txt")]
#[case::absolute("/etc/passwd")]
fn artifacts_outside_the_project_are_rejected(#[case] file: &str) {
    let project = ProjectFixture::tosca_shell();
    project.write("shell-definition.yml", &definition_with_artifact(file));

    let err = pack(&project, &StubResolver::new()).expect_err("should fail");

    match &err {
        PackError::ArtifactOutsideProject { file: reported } => assert_eq!(reported, file),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_reported());
    assert!(project.dist_files().is_empty());
}

#[rstest]
fn absolute_icon_path_is_rejected_even_when_it_exists(tosca_shell: ProjectFixture) {
    let icon = tosca_shell.path("shell-icon.png");
    tosca_shell.write(
        "shell-definition.yml",
        &format!("metadata:\n  template_name: NutShell\n  template_icon: '{icon}'\n"),
    );

    let err = pack(&tosca_shell, &StubResolver::new()).expect_err("should fail");

    assert!(matches!(err, PackError::ArtifactOutsideProject { .. }), "got {err:?}");
}

#[rstest]
fn driver_artifact_outside_the_project_is_rejected(tosca_shell: ProjectFixture) {
    tosca_shell.write(
        "shell-definition.yml",
        "\
node_types:
  vendor.switch.NutShell:
    artifacts:
      driver:
        file: ../NutShellDriver.zip
",
    );
    let resolver = StubResolver::new();

    let err = pack(&tosca_shell, &resolver).expect_err("should fail");

    assert!(matches!(err, PackError::ArtifactOutsideProject { .. }), "got {err:?}");
    assert_eq!(resolver.calls(), 0);
}

#[rstest]
fn entry_definitions_outside_the_project_are_rejected(tosca_shell: ProjectFixture) {
    tosca_shell.write(
        "TOSCA-Metadata/TOSCA.meta",
        "Entry-Definitions: ../shell-definition.yml\n",
    );

    let err = pack(&tosca_shell, &StubResolver::new()).expect_err("should fail");

    assert!(matches!(err, PackError::ToscaMetaInvalid { .. }), "got {err:?}");
    assert!(tosca_shell.dist_files().is_empty());
}

#[rstest]
fn traversing_template_name_is_reported(tosca_shell: ProjectFixture) {
    tosca_shell.write(
        "shell-definition.yml",
        "metadata:\n  template_name: ../../escaped\n",
    );

    let err = pack(&tosca_shell, &StubResolver::new()).expect_err("should fail");

    assert_eq!(err.to_string(), "shell-definition.yml format is wrong");
    assert!(!tosca_shell.path("../escaped.zip").exists());
}

#[rstest]
#[case("./icons\\shell.png", "icons/shell.png")]
#[case(" shell-icon.png ", "shell-icon.png")]
fn entry_names_are_normalised(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(entry_name(raw), expected);
}

#[rstest]
#[case::plain("shell-icon.png", Some("shell-icon.png"))]
#[case::nested("./icons/shell.png", Some("icons/shell.png"))]
#[case::inner_current_dir("icons/./shell.png", Some("icons/./shell.png"))]
#[case::parent("../shell.png", None)]
#[case::windows_parent("icons\\..\\..\\shell.png", None)]
#[case::absolute("/tmp/shell.png", None)]
#[case::empty("  ", None)]
fn confined_entry_names_stay_under_the_root(#[case] raw: &str, #[case] expected: Option<&str>) {
    assert_eq!(confined_entry_name(raw).as_deref(), expected);
}

#[test]
fn driver_stem_drops_directory_and_extension() {
    assert_eq!(driver_stem("drivers/NutShellDriver.zip"), "NutShellDriver");
    assert_eq!(driver_stem("Driver"), "Driver");
}
