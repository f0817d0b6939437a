//! Filesystem helpers and progress reporting.
//!
//! # Modules
//!
//! - [`fs`] - Directory creation, relative path computation, and the
//!   platform symlink wrapper used for bin links
//! - [`progress`] - Spinners and counters for the resolve and link phases

pub mod fs;
pub mod progress;

pub use fs::{ensure_dir, relative_from};
pub use progress::ProgressBar;
