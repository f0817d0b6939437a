//! CLI surface tests: exit codes, diagnostics, and a full offline run.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::{write_package_tgz, write_project_manifest};

fn tinypm() -> Command {
    Command::cargo_bin("tinypm").unwrap()
}

#[test]
fn missing_manifest_exits_one_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();

    tinypm()
        .arg(dir.path())
        .arg("--no-progress")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("package.json"));
}

#[test]
fn installs_local_dependencies_into_destination() {
    let store = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();

    let dep = write_package_tgz(
        store.path(),
        "dep",
        r#"{"name": "dep"}"#,
        &[("index.js", "module.exports = 42;")],
    );
    write_project_manifest(project.path(), &format!(r#"{{"dep": "{}"}}"#, dep.display()));

    tinypm()
        .arg(project.path())
        .arg(dest.path())
        .arg("--no-progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("installed 1 package"));

    assert!(dest.path().join("node_modules/dep/index.js").is_file());
    // The source project's own tree was left alone.
    assert!(!project.path().join("node_modules").exists());
}

#[test]
fn help_documents_the_registry_flag() {
    tinypm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--registry"))
        .stdout(predicate::str::contains("--no-progress"));
}
