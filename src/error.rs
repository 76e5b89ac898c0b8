//! Error types for the giff changeset previewer.
//!
//! This module provides the error hierarchy for every stage of a preview:
//! configuration, stack lookup, CloudFormation API calls, the changeset
//! lifecycle, and local template handling.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for giff.
#[derive(Debug, Error)]
pub enum GiffError {
    /// Configuration and argument errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Stack lookup errors.
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// CloudFormation API errors.
    #[error("CloudFormation error: {0}")]
    CloudFormation(#[from] CloudFormationError),

    /// Changeset lifecycle errors.
    #[error("Changeset error: {0}")]
    Changeset(#[from] ChangesetError),

    /// Local template errors.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration and argument errors.
///
/// Raised before any remote call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file was not found.
    #[error("Settings file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The settings file could not be parsed.
    #[error("Failed to parse settings: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// The command-line arguments are inconsistent.
    #[error("{message}")]
    InvalidArguments {
        /// Description of the problem.
        message: String,
    },

    /// A `key=value` token could not be parsed.
    #[error("Invalid {flag} entry '{input}': expected key=value")]
    InvalidKeyValue {
        /// Name of the flag the token came from.
        flag: String,
        /// The offending token.
        input: String,
    },
}

/// Stack lookup errors.
#[derive(Debug, Error)]
pub enum LookupError {
    /// No stack matched the name.
    #[error("Cannot read stack parameters: stack '{stack_name}' not found")]
    StackNotFound {
        /// Requested stack name.
        stack_name: String,
    },

    /// More than one stack matched the name.
    #[error("Cannot read stack parameters: '{stack_name}' matched {count} stacks")]
    AmbiguousStack {
        /// Requested stack name.
        stack_name: String,
        /// Number of matching stacks.
        count: usize,
    },

    /// The deployed template body was not returned.
    #[error("No deployed template available for stack '{stack_name}'")]
    TemplateUnavailable {
        /// Requested stack name.
        stack_name: String,
    },
}

/// CloudFormation API errors.
#[derive(Debug, Error)]
pub enum CloudFormationError {
    /// A request to the service failed.
    #[error("{operation} failed: {message}")]
    RequestFailed {
        /// API operation name.
        operation: &'static str,
        /// Error message from the service or SDK.
        message: String,
    },

    /// The service answered with an unusable response.
    #[error("Invalid {operation} response: {message}")]
    InvalidResponse {
        /// API operation name.
        operation: &'static str,
        /// Description of the response issue.
        message: String,
    },
}

/// Changeset lifecycle errors.
#[derive(Debug, Error)]
pub enum ChangesetError {
    /// The service rejected the changeset creation.
    #[error("Failed to create changeset for stack '{stack_name}': {source}")]
    SubmissionFailed {
        /// Target stack.
        stack_name: String,
        /// Error returned by the service.
        source: Box<GiffError>,
    },

    /// The changeset never reached a terminal state.
    #[error("Max retries ({attempts}) while waiting for changeset {handle}")]
    PollTimeout {
        /// Changeset handle that was polled.
        handle: String,
        /// Number of describe attempts made.
        attempts: u32,
    },
}

/// Local template errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file does not exist.
    #[error("Template file not found: {path}")]
    NotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The template file could not be read.
    #[error("Failed to read template {path}: {source}")]
    ReadFailed {
        /// Path to the file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The template is too large to be sent inline.
    #[error("Template {path} is {size} bytes, inline templates are limited to {limit} bytes")]
    TooLarge {
        /// Path to the file.
        path: PathBuf,
        /// Size of the file in bytes.
        size: usize,
        /// Maximum accepted size.
        limit: usize,
    },

    /// The diff program is not on the PATH.
    #[error("Diff command not found: {command}")]
    DiffCommandNotFound {
        /// The program that was looked up.
        command: String,
    },

    /// The diff program failed.
    #[error("Diff command '{command}' failed with status {status}: {stderr}")]
    DiffFailed {
        /// The program that was run.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },
}

/// Result type alias for giff operations.
pub type Result<T> = std::result::Result<T, GiffError>;

impl GiffError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl ConfigError {
    /// Creates an invalid arguments error.
    #[must_use]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }
}

impl CloudFormationError {
    /// Creates a request failure for the given operation.
    #[must_use]
    pub fn request(operation: &'static str, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation,
            message: message.into(),
        }
    }

    /// Creates an invalid response error for the given operation.
    #[must_use]
    pub fn invalid_response(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            operation,
            message: message.into(),
        }
    }
}
