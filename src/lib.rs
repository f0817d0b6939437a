//! tinypm - a minimal npm-style package manager
//!
//! Given a project manifest (`package.json`) declaring named dependencies
//! with version ranges, local paths, or URLs, tinypm resolves the full
//! dependency graph to exact pinned versions, deduplicates redundant nested
//! copies, and materializes the result as a nested `node_modules` tree with
//! linked executables and executed lifecycle scripts.
//!
//! # Architecture Overview
//!
//! The install pipeline runs in three phases:
//!
//! 1. **Resolution** - [`resolver`] turns each volatile reference into a
//!    pinned one and recursively builds a dependency tree, eliding any
//!    dependency an ancestor already provides in a satisfying version.
//!    Independent branches resolve concurrently, each with its own immutable
//!    scope snapshot.
//! 2. **Optimization** - [`tree`] hoists duplicate-free sub-dependencies
//!    upward and drops redundant nested copies, shrinking the on-disk
//!    footprint without changing which version any package observes.
//! 3. **Installation** - [`installer`] walks the optimized tree, extracts
//!    each package into its `node_modules` slot, links declared executables
//!    into `.bin`, and runs lifecycle scripts in declaration order with the
//!    correct working directory and `PATH`.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface
//! - [`core`] - Error types and user-friendly error reporting
//! - [`reference`] - Reference classification and pinned descriptors
//! - [`manifest`] - `package.json` parsing and bin/script normalization
//! - [`registry`] - Registry client and the [`registry::PackageSource`] seam
//! - [`archive`] - Gzipped tarball reading and extraction
//! - [`resolver`] - Reference pinning and dependency graph construction
//! - [`tree`] - Dependency tree representation and hoisting optimizer
//! - [`installer`] - Filesystem materialization, bin links, lifecycle scripts
//! - [`utils`] - Filesystem helpers and progress reporting
//!
//! # Example
//!
//! ```bash
//! # Install dependencies declared in ./package.json into ./node_modules
//! tinypm
//!
//! # Resolve from one directory, install into another
//! tinypm ./my-project /tmp/staging
//!
//! # Use a different registry
//! tinypm --registry https://registry.npmjs.org
//! ```

pub mod archive;
pub mod cli;
pub mod constants;
pub mod core;
pub mod installer;
pub mod manifest;
pub mod reference;
pub mod registry;
pub mod resolver;
pub mod tree;
pub mod utils;
