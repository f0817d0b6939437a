//! Integration tests for tinypm.
//!
//! Everything here runs offline: packages are local tgz fixtures referenced
//! by absolute paths, so resolution and installation exercise the real
//! pipeline without a registry.

mod common;

mod cli;
mod install_local;
