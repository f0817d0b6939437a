//! Filesystem materialization of an optimized dependency tree.
//!
//! The installer walks the tree produced by the optimizer and, for each
//! node, extracts the package archive into its `node_modules` slot. Sibling
//! subtrees install concurrently: each writes only under its own
//! uniquely-named slot, so no locking is needed, and a failure anywhere
//! aborts the whole join.
//!
//! A child's binaries and lifecycle scripts are handled strictly *after* its
//! entire subtree is materialized, so an install script can rely on the
//! package's own dependencies (and their binaries) being present:
//!
//! 1. declared executables are linked into the parent's shared
//!    `node_modules/.bin` with relative symlinks, keeping the tree
//!    relocatable;
//! 2. the `preinstall`, `install`, and `postinstall` scripts run in that
//!    fixed order through the platform shell, with the working directory set
//!    to the package's slot and `PATH` prefixed by the package's own local
//!    `node_modules/.bin`.
//!
//! Packages are re-fetched here rather than cached from resolution; that is
//! deliberate (no cross-run or cross-branch cache), and nothing written is
//! rolled back on failure.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::future::{BoxFuture, try_join_all};
use tracing::debug;

use crate::archive;
use crate::constants::{BIN_DIR, LIFECYCLE_PHASES, MODULES_DIR};
use crate::core::error::TinypmError;
use crate::manifest::Manifest;
use crate::registry::PackageSource;
use crate::tree::DependencyNode;
use crate::utils::fs::{ensure_dir, relative_from, symlink_file};
use crate::utils::progress::ProgressBar;

/// Materializes dependency trees onto the filesystem.
pub struct Installer<S> {
    source: S,
    progress: Option<ProgressBar>,
}

impl<S: PackageSource> Installer<S> {
    /// Create an installer over a package source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            progress: None,
        }
    }

    /// Report one unit of progress per installed package on `bar`.
    #[must_use]
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Install `node` and its whole subtree under `target`.
    ///
    /// For the synthetic project root (no reference), nothing is extracted
    /// at `target` itself; only the dependencies materialize under
    /// `target/node_modules`.
    pub async fn install(&self, node: &DependencyNode, target: &Path) -> Result<()> {
        if let Some(bar) = &self.progress {
            bar.inc_length(node.package_count());
        }
        self.install_node(node, target.to_path_buf()).await
    }

    fn install_node<'a>(
        &'a self,
        node: &'a DependencyNode,
        target: PathBuf,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if let Some(reference) = &node.reference {
                debug!(name = %node.name, %reference, slot = %target.display(), "extracting");
                let bytes = self.source.fetch_package(&node.name, reference).await?;
                archive::extract_to(&bytes, &target)
                    .with_context(|| format!("failed to extract {} into {}", node.name, target.display()))?;
            }

            try_join_all(
                node.dependencies
                    .iter()
                    .map(|child| self.install_child(child, &target)),
            )
            .await?;

            Ok(())
        })
    }

    /// Fully install one child: its subtree first, then bins and scripts.
    async fn install_child(&self, child: &DependencyNode, parent_dir: &Path) -> Result<()> {
        let modules_dir = parent_dir.join(MODULES_DIR);
        let slot = modules_dir.join(&child.name);
        let shared_bin_dir = modules_dir.join(BIN_DIR);

        self.install_node(child, slot.clone()).await?;

        // The subtree is complete from here on: scripts may invoke binaries
        // contributed by the child's own dependencies.
        let manifest = Manifest::load(&slot)?;
        link_bins(&manifest, &child.name, &slot, &shared_bin_dir)?;
        run_lifecycle_scripts(&manifest, &child.name, &slot).await?;

        if let Some(bar) = &self.progress {
            bar.inc(1);
        }
        Ok(())
    }
}

/// Link each declared executable into the shared bin directory.
///
/// Links are relative to the bin directory so the installed tree can be
/// moved without breaking them.
fn link_bins(
    manifest: &Manifest,
    package_name: &str,
    slot: &Path,
    shared_bin_dir: &Path,
) -> Result<()> {
    let entries = manifest.bin_entries(package_name);
    if entries.is_empty() {
        return Ok(());
    }

    ensure_dir(shared_bin_dir)?;
    for entry in entries {
        let script = slot.join(&entry.script_path);
        let link = shared_bin_dir.join(&entry.exposed_name);
        let relative = relative_from(&script, shared_bin_dir);
        debug!(bin = %entry.exposed_name, target = %relative.display(), "linking");
        symlink_file(&relative, &link).map_err(|e| TinypmError::LinkFailed {
            bin: entry.exposed_name.clone(),
            package: package_name.to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// Run the package's declared lifecycle scripts in fixed phase order.
async fn run_lifecycle_scripts(manifest: &Manifest, package_name: &str, slot: &Path) -> Result<()> {
    for phase in LIFECYCLE_PHASES {
        let Some(script) = manifest.script(phase) else {
            continue;
        };
        debug!(package = package_name, phase, "running lifecycle script");

        let output = shell_command(script)
            .current_dir(slot)
            .env("PATH", path_with_local_bin(slot)?)
            .output()
            .await
            .map_err(|e| TinypmError::ScriptFailed {
                package: package_name.to_string(),
                phase: phase.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(TinypmError::ScriptFailed {
                package: package_name.to_string(),
                phase: phase.to_string(),
                reason: format!(
                    "{}\n{}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            }
            .into());
        }
    }
    Ok(())
}

/// The inherited `PATH` with the package's own local bin directory first.
fn path_with_local_bin(slot: &Path) -> Result<std::ffi::OsString> {
    let local_bin = slot.join(MODULES_DIR).join(BIN_DIR);
    let inherited = std::env::var_os("PATH").unwrap_or_default();
    let entries =
        std::iter::once(local_bin).chain(std::env::split_paths(&inherited));
    std::env::join_paths(entries).context("PATH contains an invalid entry")
}

#[cfg(unix)]
fn shell_command(script: &str) -> tokio::process::Command {
    let mut command = tokio::process::Command::new("sh");
    command.arg("-c").arg(script);
    command
}

#[cfg(windows)]
fn shell_command(script: &str) -> tokio::process::Command {
    let mut command = tokio::process::Command::new("cmd");
    command.args(["/C", script]);
    command
}
