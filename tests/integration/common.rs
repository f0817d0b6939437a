//! Shared fixture helpers for the integration suite.

use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Write a package tgz under `store` and return its absolute path, suitable
/// for use as a path reference in a manifest.
pub fn write_package_tgz(
    store: &Path,
    name: &str,
    manifest_json: &str,
    files: &[(&str, &str)],
) -> PathBuf {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut entries = vec![("package.json", manifest_json)];
    entries.extend_from_slice(files);
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("package/{path}"), contents.as_bytes())
            .unwrap();
    }

    let bytes = builder.into_inner().unwrap().finish().unwrap();
    let tgz = store.join(format!("{name}.tgz"));
    std::fs::write(&tgz, bytes).unwrap();
    tgz
}

/// Write a project `package.json` into `dir` with the given dependencies
/// object (already-serialized JSON).
pub fn write_project_manifest(dir: &Path, dependencies_json: &str) {
    let manifest = format!(r#"{{"name": "fixture-app", "dependencies": {dependencies_json}}}"#);
    std::fs::write(dir.join("package.json"), manifest).unwrap();
}
