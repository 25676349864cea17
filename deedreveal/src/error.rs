//! Error types for `deedreveal`
//!
//! Command-level errors and their process exit codes. The reveal engine
//! in `deedreveal-core` never fails; everything here comes from the
//! surrounding I/O: configuration, metadata retrieval and the HTTP API.

use std::path::PathBuf;

use deedreveal_core::error::{AmountError, MetadataError, SectionError};
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `deedreveal` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Metadata retrieval failed (gateway unreachable, bad status, too large)
    pub const FETCH_ERROR: i32 = 4;

    /// Rejected user input (amount, section, metadata document)
    pub const INPUT_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `deedreveal` operations.
#[derive(Debug, Error)]
pub enum DeedRevealError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Metadata retrieval error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// HTTP API error
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Unknown section identifier
    #[error(transparent)]
    Section(#[from] SectionError),

    /// Unusable metadata document
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Rejected amount
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeedRevealError {
    /// Lifts a fetch error, keeping an unusable document as an input error.
    #[must_use]
    pub fn from_fetch(err: FetchError) -> Self {
        match err {
            FetchError::Metadata(e) => Self::Metadata(e),
            other => Self::Fetch(other),
        }
    }

    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Fetch(_) => ExitCode::FETCH_ERROR,
            Self::Section(_) | Self::Metadata(_) | Self::Amount(_) => ExitCode::INPUT_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Server(_) | Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}{}: {message}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Fetch Errors
// ============================================================================

/// Failures retrieving a metadata document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The source cannot be served in this context
    #[error("unsupported metadata source '{source_uri}': {reason}")]
    Unsupported {
        /// Rejected source
        source_uri: String,
        /// Why it was rejected
        reason: String,
    },

    /// The HTTP request could not be completed
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The gateway answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The document exceeds the configured size limit
    #[error("metadata is {size} bytes, limit is {limit}")]
    TooLarge {
        /// Observed size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Local metadata file does not exist
    #[error("metadata file not found: {path}")]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Local metadata file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document could not be parsed
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

// ============================================================================
// Server Errors
// ============================================================================

/// HTTP API errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not bind
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested bind address
        addr: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_mapping() {
        let cases: Vec<(DeedRevealError, i32)> = vec![
            (
                ConfigError::MissingFile {
                    path: PathBuf::from("/x"),
                }
                .into(),
                ExitCode::CONFIG_ERROR,
            ),
            (
                FetchError::Status {
                    url: "https://gw/x".into(),
                    status: 404,
                }
                .into(),
                ExitCode::FETCH_ERROR,
            ),
            (AmountError::Empty.into(), ExitCode::INPUT_ERROR),
            (
                SectionError::Unknown {
                    input: "x".into(),
                    suggestion: None,
                }
                .into(),
                ExitCode::INPUT_ERROR,
            ),
            (
                MetadataError::NotAnObject { found: "array" }.into(),
                ExitCode::INPUT_ERROR,
            ),
            (
                std::io::Error::new(std::io::ErrorKind::NotFound, "x").into(),
                ExitCode::IO_ERROR,
            ),
            (
                ServerError::Serve(std::io::Error::other("x")).into(),
                ExitCode::ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.exit_code(), expected, "wrong exit code for {err}");
        }
    }

    #[test]
    fn unusable_document_is_an_input_error() {
        let err = DeedRevealError::from_fetch(FetchError::Metadata(MetadataError::NotAnObject {
            found: "array",
        }));
        assert!(matches!(err, DeedRevealError::Metadata(_)));
        assert_eq!(err.exit_code(), ExitCode::INPUT_ERROR);

        let err = DeedRevealError::from_fetch(FetchError::TooLarge { size: 2, limit: 1 });
        assert_eq!(err.exit_code(), ExitCode::FETCH_ERROR);
    }

    #[test]
    fn parse_error_includes_line() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("deedreveal.yaml"),
            line: Some(3),
            message: "bad".into(),
        };
        assert_eq!(err.to_string(), "parse error in deedreveal.yaml (line 3): bad");
    }

    #[test]
    fn too_large_message() {
        let err = FetchError::TooLarge { size: 10, limit: 5 };
        assert_eq!(err.to_string(), "metadata is 10 bytes, limit is 5");
    }
}
