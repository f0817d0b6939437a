//! End-to-end pipeline tests over local path references.

use tinypm::installer::Installer;
use tinypm::manifest::Manifest;
use tinypm::registry::HttpRegistry;
use tinypm::resolver::GraphBuilder;
use tinypm::tree::optimize;

use crate::common::{write_package_tgz, write_project_manifest};

fn offline_registry() -> HttpRegistry {
    // Path references never touch the network, so the base URL is inert.
    HttpRegistry::new("http://registry.invalid")
}

#[tokio::test]
async fn transitive_path_dependency_is_hoisted_and_installed() {
    let store = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();

    let b = write_package_tgz(store.path(), "b", r#"{"name": "b"}"#, &[]);
    let a = write_package_tgz(
        store.path(),
        "a",
        &format!(r#"{{"name": "a", "dependencies": {{"b": "{}"}}}}"#, b.display()),
        &[("index.js", "module.exports = 1;")],
    );
    write_project_manifest(
        project.path(),
        &format!(r#"{{"a": "{}"}}"#, a.display()),
    );

    let manifest = Manifest::load(project.path()).unwrap();
    let builder = GraphBuilder::new(offline_registry());
    let raw_tree = builder.build_project(&manifest).await.unwrap();

    // Raw tree nests b under a.
    assert_eq!(raw_tree.dependencies.len(), 1);
    assert_eq!(raw_tree.dependencies[0].dependencies[0].name, "b");

    let tree = optimize(raw_tree);

    // After optimization b is a direct sibling of a at the root.
    let names: Vec<&str> = tree.dependencies.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert!(tree.dependencies[0].dependencies.is_empty());

    Installer::new(offline_registry())
        .install(&tree, project.path())
        .await
        .unwrap();

    let modules = project.path().join("node_modules");
    assert!(modules.join("a/index.js").is_file());
    assert!(modules.join("b/package.json").is_file());
    // No nested node_modules under a once b is hoisted.
    assert!(!modules.join("a/node_modules").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn colliding_dependency_stays_nested_and_its_bins_reach_scripts() {
    let store = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();

    // Two distinct "tool" archives: the root holds one, wrapper needs the
    // other, so wrapper's copy must stay nested under wrapper.
    let tool_v2 = write_package_tgz(store.path(), "tool-v2", r#"{"name": "tool"}"#, &[]);
    let tool_v1 = write_package_tgz(
        store.path(),
        "tool-v1",
        r#"{"name": "tool", "bin": "./cli.sh"}"#,
        &[("cli.sh", "#!/bin/sh\necho from-tool-v1 > \"$OUT\"\n")],
    );
    let wrapper = write_package_tgz(
        store.path(),
        "wrapper",
        &format!(
            r#"{{
                "name": "wrapper",
                "dependencies": {{"tool": "{}"}},
                "scripts": {{"postinstall": "OUT=$PWD/ran.txt tool"}}
            }}"#,
            tool_v1.display()
        ),
        &[],
    );
    write_project_manifest(
        project.path(),
        &format!(
            r#"{{"tool": "{}", "wrapper": "{}"}}"#,
            tool_v2.display(),
            wrapper.display()
        ),
    );

    let manifest = Manifest::load(project.path()).unwrap();
    let builder = GraphBuilder::new(offline_registry());
    let tree = optimize(builder.build_project(&manifest).await.unwrap());

    // The collision keeps wrapper's private tool copy nested.
    let wrapper_node = tree.dependencies.iter().find(|n| n.name == "wrapper").unwrap();
    assert_eq!(wrapper_node.dependencies.len(), 1);

    Installer::new(offline_registry())
        .install(&tree, project.path())
        .await
        .unwrap();

    let wrapper_slot = project.path().join("node_modules/wrapper");
    // The nested tool linked its bin into wrapper's own .bin...
    assert!(wrapper_slot.join("node_modules/.bin/tool").exists());
    // ...and wrapper's postinstall found it on PATH, with wrapper's slot as cwd.
    let ran = std::fs::read_to_string(wrapper_slot.join("ran.txt")).unwrap();
    assert_eq!(ran.trim(), "from-tool-v1");
}

#[tokio::test]
async fn unreadable_path_reference_fails_the_whole_build() {
    let project = tempfile::tempdir().unwrap();
    write_project_manifest(project.path(), r#"{"ghost": "/no/such/ghost.tgz"}"#);

    let manifest = Manifest::load(project.path()).unwrap();
    let err = GraphBuilder::new(offline_registry())
        .build_project(&manifest)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ghost"));
}
