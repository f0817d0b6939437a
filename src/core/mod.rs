//! Core types and functionality for tinypm
//!
//! This module forms the foundation of tinypm's type system. It provides the
//! error handling used throughout the codebase:
//!
//! - **Strongly-typed errors** ([`TinypmError`]) for precise error handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions for CLI users
//! - **Automatic error conversion** from common standard library and ecosystem errors
//!
//! Every operation that can fail returns a [`Result`] with meaningful error
//! information. Failures are fatal: any error anywhere in the resolution or
//! installation tree propagates to the top of the operation, is reported with
//! its cause chain, and terminates the process with a non-zero status. There
//! is no per-branch isolation, partial-success mode, retry, or rollback.

pub mod error;

pub use error::{TinypmError, ErrorContext, user_friendly_error};
