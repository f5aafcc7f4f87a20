//! CLI error types with exit code handling

use miette::Diagnostic;
use oamkit_core::{BundleError, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Error raised by the bundle model
    #[error(transparent)]
    #[diagnostic(transparent)]
    Bundle(#[from] BundleError),

    /// A file given on the command line could not be read or written
    #[error("IO error on {}: {message}", path.display())]
    #[diagnostic(code(oamkit::cli::io))]
    Io { path: PathBuf, message: String },

    /// Internal error (serialization of command output)
    #[error("Internal error: {message}")]
    #[diagnostic(code(oamkit::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Bundle(BundleError::Io(_)) => exit_codes::IO_ERROR,
            CliError::Bundle(err) => match err.kind() {
                ErrorKind::Decode | ErrorKind::Conversion => exit_codes::INPUT_ERROR,
                ErrorKind::NotFound => exit_codes::NOT_FOUND,
                ErrorKind::Internal => exit_codes::ERROR,
            },
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an IO error for a path
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
