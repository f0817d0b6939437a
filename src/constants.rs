//! Global constants used throughout the tinypm codebase.
//!
//! This module contains registry endpoints, directory names, and the
//! lifecycle phase ordering used across multiple modules. Defining them
//! centrally makes the on-disk and on-wire conventions discoverable.

/// Default package registry queried for version metadata and tarballs.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.yarnpkg.com";

/// Name of the per-package dependency directory.
pub const MODULES_DIR: &str = "node_modules";

/// Name of the shared executables directory under [`MODULES_DIR`].
pub const BIN_DIR: &str = ".bin";

/// Filename of the package manifest, at the package root and inside
/// archives (under the archive's single top-level directory).
pub const MANIFEST_FILENAME: &str = "package.json";

/// Lifecycle script phases, in the exact order they must run during
/// installation of a single package.
pub const LIFECYCLE_PHASES: [&str; 3] = ["preinstall", "install", "postinstall"];
