//! Unit tests for the legacy package builder.

use super::*;
use crate::test_utils::{
    ProjectFixture, StubResolver, archive_members, nested_members, read_member,
};
use rstest::{fixture, rstest};

const DRIVER_MEMBER: &str = "Resource Drivers - Python/nutshell.zip";

#[fixture]
fn nut_shell() -> ProjectFixture {
    ProjectFixture::nut_shell()
}

fn pack(project: &ProjectFixture, debug: bool, resolver: &StubResolver) -> Result<Utf8PathBuf> {
    let context = PackagingContext::new(project.root(), debug);
    let debug_config = DebugConfig::default();
    LegacyPackageBuilder::new(&context, resolver, &debug_config).pack()
}

#[rstest]
fn package_places_data_model_and_driver(nut_shell: ProjectFixture) {
    let output = pack(&nut_shell, false, &StubResolver::new()).expect("package");

    assert_eq!(output, nut_shell.path("dist/nut_shell.zip"));
    assert_eq!(
        archive_members(&output),
        [
            "Configuration/shellconfig.xml",
            "DataModel/datamodel.xml",
            DRIVER_MEMBER,
            "metadata.xml",
        ]
    );
    assert_eq!(nested_members(&output, DRIVER_MEMBER), ["driver.py"]);
}

#[rstest]
fn extra_data_model_files_keep_relative_paths(nut_shell: ProjectFixture) {
    nut_shell.write("datamodel/icons/nut.png", "png");

    let output = pack(&nut_shell, false, &StubResolver::new()).expect("package");

    assert!(archive_members(&output).contains(&"icons/nut.png".to_owned()));
}

#[rstest]
fn debug_mode_adds_generated_descriptor_to_driver(nut_shell: ProjectFixture) {
    let output = pack(&nut_shell, true, &StubResolver::new()).expect("package");

    let driver = nested_members(&output, DRIVER_MEMBER);
    assert!(driver.contains(&"debug.xml".to_owned()), "got {driver:?}");
    assert!(!archive_members(&output).contains(&"debug.xml".to_owned()));
}

#[rstest]
fn debug_mode_prefers_project_descriptor(nut_shell: ProjectFixture) {
    nut_shell.write("debug.xml", "<Debug>mine</Debug>");
    let output = pack(&nut_shell, true, &StubResolver::new()).expect("package");

    let driver_bytes = read_member(&output, DRIVER_MEMBER);
    let staged = nut_shell.write("inner.zip", "");
    std::fs::write(&staged, driver_bytes).expect("write inner archive");
    assert_eq!(read_member(&staged, "debug.xml"), b"<Debug>mine</Debug>");
}

#[rstest]
fn project_descriptor_is_ignored_without_debug_mode(nut_shell: ProjectFixture) {
    nut_shell.write("debug.xml", "<Debug>mine</Debug>");

    let output = pack(&nut_shell, false, &StubResolver::new()).expect("package");

    assert_eq!(nested_members(&output, DRIVER_MEMBER), ["driver.py"]);
}

#[rstest]
fn downloaded_dependencies_sit_beside_driver_source(nut_shell: ProjectFixture) {
    nut_shell.write("src/requirements.txt", "cloudshell-shell-core\n");
    let resolver = StubResolver::with_artifacts(&[
        ("cloudshell_shell_core-5.0.0-py3-none-any.whl", "wheel"),
        ("PyYAML-6.0.tar.gz", "sdist"),
    ]);

    let output = pack(&nut_shell, false, &resolver).expect("package");

    assert_eq!(resolver.calls(), 1);
    assert_eq!(
        nested_members(&output, DRIVER_MEMBER),
        [
            "PyYAML-6.0.tar.gz",
            "cloudshell_shell_core-5.0.0-py3-none-any.whl",
            "driver.py",
            "requirements.txt",
        ]
    );
}

#[rstest]
fn resolver_failure_leaves_dist_untouched(nut_shell: ProjectFixture) {
    nut_shell.write("src/requirements.txt", "missing-package\n");

    let err = pack(&nut_shell, false, &StubResolver::failing("no matching distribution"))
        .expect_err("resolution should fail");

    assert!(matches!(err, PackError::DependencyResolution { .. }));
    assert!(nut_shell.dist_files().is_empty());
}

#[rstest]
#[case::metadata("datamodel/metadata.xml", "metadata.xml")]
#[case::datamodel("datamodel/datamodel.xml", "datamodel.xml")]
#[case::shellconfig("datamodel/shellconfig.xml", "shellconfig.xml")]
fn missing_data_model_file_is_reported(
    nut_shell: ProjectFixture,
    #[case] relative: &str,
    #[case] expected: &str,
) {
    nut_shell.remove(relative);
    let resolver = StubResolver::new();

    let err = pack(&nut_shell, false, &resolver).expect_err("missing file should fail");

    match err {
        PackError::DataModelFileMissing { file } => assert_eq!(file, expected),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(resolver.calls(), 0);
    assert!(!nut_shell.path("dist").exists());
}

#[rstest]
fn missing_source_directory_is_reported_before_downloading(nut_shell: ProjectFixture) {
    nut_shell.remove("src/driver.py");
    std::fs::remove_dir(nut_shell.path("src")).expect("remove src");
    let resolver = StubResolver::new();

    let err = pack(&nut_shell, false, &resolver).expect_err("missing src should fail");

    assert!(matches!(err, PackError::DriverSourceMissing { .. }));
    assert_eq!(resolver.calls(), 0);
}

#[rstest]
fn repeated_packing_yields_identical_membership(nut_shell: ProjectFixture) {
    let first = pack(&nut_shell, false, &StubResolver::new()).expect("first package");
    let first_outer = archive_members(&first);
    let first_inner = nested_members(&first, DRIVER_MEMBER);

    let second = pack(&nut_shell, false, &StubResolver::new()).expect("second package");

    assert_eq!(first, second);
    assert_eq!(archive_members(&second), first_outer);
    assert_eq!(nested_members(&second, DRIVER_MEMBER), first_inner);
    assert_eq!(nut_shell.dist_files(), ["nut_shell.zip"]);
}
