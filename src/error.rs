//! Error types for the megadl application.

use std::path::Path;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // Invocation errors (bad flag/link combinations)
    #[error("{0}")]
    Usage(String),

    // Session errors
    #[error("Session error: {0}")]
    Session(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Closed set of failure kinds a single object transfer can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferErrorKind {
    /// Network or transport failure; worth another attempt.
    Transient,
    /// Any other failure reported by the remote side (bad key, missing object, integrity).
    Protocol,
    /// The local target already exists.
    LocalCollision,
    /// A local directory or file could not be created or written.
    Filesystem,
    /// The remote listing does not have the expected shape.
    Structural,
}

impl TransferErrorKind {
    /// Only transport failures are retried.
    pub fn is_retryable(self) -> bool {
        matches!(self, TransferErrorKind::Transient)
    }
}

/// Failure of one object (or one folder export) transfer.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransferError {
    kind: TransferErrorKind,
    message: String,
}

impl TransferError {
    pub fn new(kind: TransferErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::Transient, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::Protocol, message)
    }

    pub fn collision(path: &Path) -> Self {
        Self::new(
            TransferErrorKind::LocalCollision,
            format!("File already exists at {}", path.display()),
        )
    }

    pub fn filesystem(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::new(
            TransferErrorKind::Filesystem,
            format!("{}: {}", path.display(), err),
        )
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::Structural, message)
    }

    pub fn kind(&self) -> TransferErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}
