//! Core error types

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while building, editing or exporting a bundle
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum BundleError {
    /// An archive, options file or document cannot be decoded
    #[error("cannot decode {file}: {message}")]
    #[diagnostic(code(oamkit::decode))]
    Decode { file: String, message: String },

    /// A recognized application cannot be mapped to or from the typed model
    #[error("cannot convert application: {message}")]
    #[diagnostic(code(oamkit::conversion))]
    Conversion { message: String },

    /// The referenced application does not exist
    #[error("application '{name}' not found")]
    #[diagnostic(
        code(oamkit::not_found),
        help("use `oamkit names` to list the applications in the bundle")
    )]
    ApplicationNotFound { name: String },

    /// The bundle holds no application while one was required
    #[error("there are no applications in the bundle")]
    #[diagnostic(code(oamkit::no_applications))]
    NoApplications,

    /// A rename would collide with an existing application
    #[error("cannot rename '{from}' to '{to}': an application with that name already exists")]
    #[diagnostic(code(oamkit::name_conflict))]
    NameConflict { from: String, to: String },

    /// Serialization or components parsing failed
    #[error("{message}")]
    #[diagnostic(code(oamkit::internal))]
    Internal { message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(oamkit::io))]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(oamkit::config))]
    Config(#[source] serde_yaml::Error),
}

/// Coarse classification of a [`BundleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Conversion,
    NotFound,
    Internal,
}

impl BundleError {
    pub fn decode(file: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            file: file.into(),
            message: message.to_string(),
        }
    }

    pub fn conversion(message: impl ToString) -> Self {
        Self::Conversion {
            message: message.to_string(),
        }
    }

    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::ApplicationNotFound { name: name.into() }
    }

    /// Attach the name of the file being processed
    pub fn in_file(self, file: &str) -> Self {
        match self {
            Self::Decode { message, .. } => Self::decode(file, message),
            Self::Conversion { message } => Self::conversion(format!("{}: {}", file, message)),
            other => other,
        }
    }

    /// Which family of the taxonomy this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode { .. } | Self::Io(_) | Self::Config(_) => ErrorKind::Decode,
            Self::Conversion { .. } => ErrorKind::Conversion,
            Self::ApplicationNotFound { .. } | Self::NoApplications => ErrorKind::NotFound,
            Self::NameConflict { .. } | Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
