//! Error handling for tinypm
//!
//! This module provides the error types and user-friendly error reporting for
//! the tinypm package manager. The error system is designed around two core
//! principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`TinypmError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Resolution**: [`TinypmError::NoMatchingVersion`] - no published version
//!   satisfies a requested range
//! - **Fetching**: [`TinypmError::FetchFailed`] - non-success network response
//!   or unreadable local path
//! - **Manifests**: [`TinypmError::ManifestNotFound`],
//!   [`TinypmError::ManifestParseError`] - missing or unparsable `package.json`
//! - **Installation**: [`TinypmError::LinkFailed`],
//!   [`TinypmError::ScriptFailed`] - filesystem or process failure while
//!   linking binaries or running lifecycle scripts
//!
//! Common standard library and ecosystem errors are automatically converted:
//! [`std::io::Error`], [`serde_json::Error`], [`semver::Error`], and
//! [`reqwest::Error`].
//!
//! All errors are fatal and non-recoverable: use [`user_friendly_error`] at
//! the top of the CLI to convert any [`anyhow::Error`] into a displayable
//! context with contextual suggestions, then exit non-zero.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for tinypm operations
///
/// Each variant represents a specific failure mode and carries the context
/// needed to produce an actionable message. A single occurrence of any of
/// these anywhere in the resolution or installation tree aborts the entire
/// operation.
#[derive(Error, Debug)]
pub enum TinypmError {
    /// No published version satisfies a requested version range
    ///
    /// Returned by the reference resolver when the registry lists versions
    /// for the package but none of them matches the declared range.
    #[error("couldn't find a version matching \"{range}\" for package \"{name}\"")]
    NoMatchingVersion {
        /// Name of the package being resolved
        name: String,
        /// The version range that no published version satisfies
        range: String,
    },

    /// Package bytes could not be fetched
    ///
    /// Covers non-success registry responses, unreachable URLs, and
    /// unreadable local paths.
    #[error("couldn't fetch package \"{name}\" from {reference}")]
    FetchFailed {
        /// Name of the package that failed to fetch
        name: String,
        /// The pinned reference that was being fetched
        reference: String,
        /// Why the fetch failed (HTTP status, I/O error, ...)
        reason: String,
    },

    /// Manifest file (package.json) not found
    #[error("no {file} found in {dir}")]
    ManifestNotFound {
        /// Manifest filename that was searched for
        file: String,
        /// Directory or archive that was searched
        dir: String,
    },

    /// Manifest parsing error
    #[error("invalid manifest in {file}")]
    ManifestParseError {
        /// Path of the manifest that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Failed to link a package executable into the shared bin directory
    #[error("failed to link binary '{bin}' for package '{package}'")]
    LinkFailed {
        /// Exposed name of the binary being linked
        bin: String,
        /// Package that declares the binary
        package: String,
        /// Why the link failed
        reason: String,
    },

    /// A lifecycle script exited unsuccessfully or could not be spawned
    #[error("{phase} script failed for package '{package}'")]
    ScriptFailed {
        /// Package whose script failed
        package: String,
        /// Lifecycle phase (preinstall, install, postinstall)
        phase: String,
        /// Exit status or spawn error
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Semver parsing error
    #[error("semver parsing error: {0}")]
    SemverError(#[from] semver::Error),

    /// HTTP transport error
    #[error("network error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for TinypmError {
    fn clone(&self) -> Self {
        match self {
            Self::NoMatchingVersion { name, range } => Self::NoMatchingVersion {
                name: name.clone(),
                range: range.clone(),
            },
            Self::FetchFailed { name, reference, reason } => Self::FetchFailed {
                name: name.clone(),
                reference: reference.clone(),
                reason: reason.clone(),
            },
            Self::ManifestNotFound { file, dir } => Self::ManifestNotFound {
                file: file.clone(),
                dir: dir.clone(),
            },
            Self::ManifestParseError { file, reason } => Self::ManifestParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::LinkFailed { bin, package, reason } => Self::LinkFailed {
                bin: bin.clone(),
                package: package.clone(),
                reason: reason.clone(),
            },
            Self::ScriptFailed { package, phase, reason } => Self::ScriptFailed {
                package: package.clone(),
                phase: phase.clone(),
                reason: reason.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON parsing error: {e}"),
            },
            Self::SemverError(e) => Self::Other {
                message: format!("semver parsing error: {e}"),
            },
            Self::HttpError(e) => Self::Other {
                message: format!("network error: {e}"),
            },
            Self::Other { message } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// User-friendly error context with suggestions
///
/// Wraps a [`TinypmError`] with an optional actionable suggestion and
/// additional details, for display at the end of a failed CLI run.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The underlying tinypm error
    pub error: TinypmError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`TinypmError`]
    #[must_use]
    pub const fn new(error: TinypmError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions should be actionable steps that users can take to resolve
    /// the error. They are displayed in green in the terminal.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    ///
    /// Details provide context about why the error occurred. They are
    /// displayed in yellow in the terminal.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`]
///
/// Downcasts known error types to attach tailored suggestions; unknown errors
/// fall through to a generic context that includes the full cause chain so
/// nothing is lost in the diagnostic.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(tinypm_error) = error.downcast_ref::<TinypmError>() {
        return create_error_context(tinypm_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(TinypmError::Other {
                    message: error.to_string(),
                })
                .with_suggestion(
                    "Check file ownership, or install into a directory you can write to",
                )
                .with_details("tinypm doesn't have permission to read or write a file");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(TinypmError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(TinypmError::ManifestParseError {
            file: crate::constants::MANIFEST_FILENAME.to_string(),
            reason: json_error.to_string(),
        })
        .with_suggestion("Check the JSON syntax of your package.json");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> = error
        .chain()
        .skip(1) // root cause is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(TinypmError::Other { message })
}

/// Map each [`TinypmError`] variant to a context with tailored suggestions
fn create_error_context(error: TinypmError) -> ErrorContext {
    match &error {
        TinypmError::NoMatchingVersion { name, range } => {
            let details = format!(
                "the registry has no published version of '{name}' satisfying '{range}'"
            );
            ErrorContext::new(error.clone())
                .with_suggestion("Loosen the version range, or check the package name for typos")
                .with_details(details)
        }
        TinypmError::FetchFailed { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error.clone())
                .with_suggestion("Check your network connection and that the reference is reachable")
                .with_details(details)
        }
        TinypmError::ManifestNotFound { file, .. } => {
            let suggestion = format!("Create a {file} in your project directory");
            ErrorContext::new(error.clone()).with_suggestion(suggestion)
        }
        TinypmError::ManifestParseError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error.clone())
                .with_suggestion("Check the JSON syntax of the manifest")
                .with_details(details)
        }
        TinypmError::ScriptFailed { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error.clone())
                .with_suggestion(
                    "Run the script manually inside the package directory to debug it",
                )
                .with_details(details)
        }
        TinypmError::LinkFailed { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error.clone()).with_details(details)
        }
        _ => ErrorContext::new(error),
    }
}
