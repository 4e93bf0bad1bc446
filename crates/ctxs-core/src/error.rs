//! # Error Hierarchy
//!
//! Structured error types for the foundational layer, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Per-document failures (a malformed YAML block, a missing delimiter, an
//! unreadable file) are never propagated past the document boundary by the
//! validators: they are converted into `parse_error` result entries. Only
//! [`DiscoveryError::RootNotFound`] and configuration failures abort a run.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn source text (or a file) into a [`ContextDocument`].
///
/// [`ContextDocument`]: crate::ContextDocument
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The text does not start with a `---` line or has no closing `---` line.
    #[error("YAML frontmatter not found")]
    MissingFrontmatter,

    /// The frontmatter block is not valid YAML.
    #[error("YAML parse error: {0}")]
    Yaml(String),

    /// The frontmatter parsed, but not to a mapping.
    #[error("frontmatter must be a YAML mapping, found {found}")]
    NotAMapping {
        /// JSON type name of what was found instead.
        found: &'static str,
    },

    /// The document file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Whether this is a delimiter (format) failure rather than a YAML failure.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::MissingFrontmatter)
    }
}

/// Errors loading a [`ValidatorConfig`].
///
/// [`ValidatorConfig`]: crate::ValidatorConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the config shape.
    #[error("invalid config {}: {reason}", path.display())]
    Invalid {
        /// Path to the configuration file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A limit or tier value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    OutOfRange {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors discovering documents under a root path.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The supplied root path does not exist.
    #[error("path does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The root directory itself could not be listed.
    #[error("cannot read directory {}: {source}", path.display())]
    Io {
        /// Directory that failed to list.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
