//! `package.json` parsing and normalization.
//!
//! Only the fields tinypm consumes are modeled: `name`, `dependencies`,
//! `bin`, and `scripts`. Everything else in a manifest is ignored.
//!
//! Two normalizations happen at this boundary so downstream logic never
//! branches on shape:
//!
//! - `dependencies` is kept in declaration order (via [`IndexMap`]) and
//!   exposed as a sequence of typed [`Descriptor`] values.
//! - `bin` may be a single path (exposed under the package name) or a
//!   name-to-path map; both normalize to a flat list of [`BinEntry`] values.

use std::path::Path;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::constants::MANIFEST_FILENAME;
use crate::core::error::TinypmError;
use crate::reference::Descriptor;

/// The subset of a `package.json` that tinypm consumes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Package name. Optional because a project root manifest may omit it.
    #[serde(default)]
    pub name: Option<String>,

    /// Declared dependencies, name to reference string, in declaration order.
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,

    /// Declared executables: a bare path or a name-to-path map.
    #[serde(default)]
    pub bin: Option<BinField>,

    /// Named scripts, including the lifecycle phases run during install.
    #[serde(default)]
    pub scripts: IndexMap<String, String>,
}

/// The two on-disk shapes of the `bin` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BinField {
    /// A single script path, exposed under the package's own name.
    Single(String),
    /// An explicit map of exposed name to script path.
    Multiple(IndexMap<String, String>),
}

/// One executable a package exposes, normalized from [`BinField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinEntry {
    /// Name the executable is linked as inside `node_modules/.bin`.
    pub exposed_name: String,
    /// Path of the real script, relative to the package root.
    pub script_path: String,
}

impl Manifest {
    /// Load and parse the manifest at `dir/package.json`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILENAME);
        let raw = std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TinypmError::ManifestNotFound {
                    file: MANIFEST_FILENAME.to_string(),
                    dir: dir.display().to_string(),
                }
            } else {
                TinypmError::IoError(e)
            }
        })?;
        Self::from_slice(&raw, &path.display().to_string())
    }

    /// Parse a manifest from raw bytes, labelling errors with `origin`.
    pub fn from_slice(raw: &[u8], origin: &str) -> Result<Self> {
        let manifest = serde_json::from_slice(raw).map_err(|e| TinypmError::ManifestParseError {
            file: origin.to_string(),
            reason: e.to_string(),
        })?;
        Ok(manifest)
    }

    /// Declared dependencies as typed descriptors, in declaration order.
    pub fn dependency_descriptors(&self) -> Vec<Descriptor> {
        self.dependencies
            .iter()
            .map(|(name, reference)| Descriptor::new(name, reference))
            .collect()
    }

    /// Declared executables as a uniform list.
    ///
    /// `package_name` supplies the exposed name when `bin` is a bare string,
    /// matching how the installer names the package's slot.
    pub fn bin_entries(&self, package_name: &str) -> Vec<BinEntry> {
        match &self.bin {
            None => Vec::new(),
            Some(BinField::Single(path)) => vec![BinEntry {
                exposed_name: package_name.to_string(),
                script_path: path.clone(),
            }],
            Some(BinField::Multiple(map)) => map
                .iter()
                .map(|(exposed_name, script_path)| BinEntry {
                    exposed_name: exposed_name.clone(),
                    script_path: script_path.clone(),
                })
                .collect(),
        }
    }

    /// The script declared for a lifecycle phase, if any.
    pub fn script(&self, phase: &str) -> Option<&str> {
        self.scripts.get(phase).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Reference;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = Manifest::from_slice(b"{}", "package.json").unwrap();
        assert!(manifest.name.is_none());
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.bin.is_none());
        assert!(manifest.scripts.is_empty());
    }

    #[test]
    fn test_dependencies_preserve_declaration_order() {
        let raw = br#"{
            "name": "demo",
            "dependencies": {"zeta": "^1.0.0", "alpha": "2.0.0", "mid": "./local"}
        }"#;
        let manifest = Manifest::from_slice(raw, "package.json").unwrap();
        let descriptors = manifest.dependency_descriptors();
        let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert!(matches!(descriptors[0].reference, Reference::Range(_)));
        assert!(matches!(descriptors[1].reference, Reference::Exact(_)));
        assert!(matches!(descriptors[2].reference, Reference::Path(_)));
    }

    #[test]
    fn test_bin_single_uses_package_name() {
        let raw = br#"{"name": "tool", "bin": "./cli.js"}"#;
        let manifest = Manifest::from_slice(raw, "package.json").unwrap();
        let entries = manifest.bin_entries("tool");
        assert_eq!(
            entries,
            vec![BinEntry {
                exposed_name: "tool".to_string(),
                script_path: "./cli.js".to_string(),
            }]
        );
    }

    #[test]
    fn test_bin_map_keeps_exposed_names() {
        let raw = br#"{"bin": {"a": "./a.js", "b": "bin/b.js"}}"#;
        let manifest = Manifest::from_slice(raw, "package.json").unwrap();
        let entries = manifest.bin_entries("ignored");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].exposed_name, "a");
        assert_eq!(entries[1].script_path, "bin/b.js");
    }

    #[test]
    fn test_scripts_lookup() {
        let raw = br#"{"scripts": {"postinstall": "node setup.js"}}"#;
        let manifest = Manifest::from_slice(raw, "package.json").unwrap();
        assert_eq!(manifest.script("postinstall"), Some("node setup.js"));
        assert_eq!(manifest.script("preinstall"), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = br#"{"name": "x", "license": "MIT", "devDependencies": {"y": "1.0.0"}}"#;
        let manifest = Manifest::from_slice(raw, "package.json").unwrap();
        assert_eq!(manifest.name.as_deref(), Some("x"));
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let err = Manifest::from_slice(b"{not json", "pkg/package.json").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("pkg/package.json"));
    }
}
