//! Command-line interface for tinypm.
//!
//! The CLI has a single operation: install the dependencies declared by a
//! project manifest. It takes an optional source directory (where
//! `package.json` lives, defaulting to the working directory) and an
//! optional destination directory (where `node_modules` is materialized,
//! defaulting to the source directory), mirroring the three pipeline phases:
//! resolve, optimize, install.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::constants::DEFAULT_REGISTRY_URL;
use crate::installer::Installer;
use crate::manifest::Manifest;
use crate::registry::HttpRegistry;
use crate::resolver::GraphBuilder;
use crate::tree::optimize;
use crate::utils::progress::ProgressBar;

/// A minimal npm-style package manager.
///
/// Resolves the dependencies declared in package.json to exact versions,
/// deduplicates the resulting tree, and installs it under node_modules with
/// linked executables and lifecycle scripts.
#[derive(Parser)]
#[command(name = "tinypm", version, about, long_about = None)]
pub struct Cli {
    /// Project directory containing package.json.
    ///
    /// Defaults to the current working directory.
    source: Option<PathBuf>,

    /// Directory to install into.
    ///
    /// Defaults to the source directory. Useful to avoid overwriting a
    /// project's real node_modules while experimenting.
    dest: Option<PathBuf>,

    /// Package registry to query for metadata and tarballs.
    #[arg(long, env = "TINYPM_REGISTRY", default_value = DEFAULT_REGISTRY_URL)]
    registry: String,

    /// Disable progress indicators (useful for CI and log capture).
    #[arg(long)]
    no_progress: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Run the resolve → optimize → install pipeline.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let source_dir = match &self.source {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("cannot determine working directory")?,
        };
        let dest_dir = self.dest.clone().unwrap_or_else(|| source_dir.clone());

        let manifest = Manifest::load(&source_dir)?;
        let registry = HttpRegistry::new(self.registry.clone());

        info!(
            source = %source_dir.display(),
            dest = %dest_dir.display(),
            registry = %self.registry,
            "starting install"
        );

        let resolve_bar = ProgressBar::new_counter("resolving packages", self.no_progress);
        let builder = GraphBuilder::new(registry.clone()).with_progress(resolve_bar.clone());
        let tree = builder.build_project(&manifest).await?;
        resolve_bar.finish_with_message("resolution complete");

        let tree = optimize(tree);
        let package_count = tree.package_count();

        let install_bar = ProgressBar::new_counter("linking packages", self.no_progress);
        let installer = Installer::new(registry).with_progress(install_bar.clone());
        installer.install(&tree, &dest_dir).await?;
        install_bar.finish_with_message("linking complete");

        println!(
            "{} installed {} package{} into {}",
            "success".green().bold(),
            package_count,
            if package_count == 1 { "" } else { "s" },
            dest_dir.display()
        );
        Ok(())
    }

    fn init_logging(&self) {
        let default_directive = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    }
}
