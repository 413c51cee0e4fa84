use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between a clean sync,
/// a sync that finished with per-target or per-service failures, and
/// a run that could not start at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every target completed and no service update failed
    Success = 0,
    /// The run finished, but at least one target or service failed
    SyncFailures = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Fatal application error (configuration, authentication, output write)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::SyncFailures => write!(f, "Sync Failures (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Coarse classification of a failure, recorded in the sync report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Authentication,
    NotFound,
    Validation,
    Transport,
    DataShape,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::NotFound => "not found",
            ErrorKind::Validation => "validation",
            ErrorKind::Transport => "transport",
            ErrorKind::DataShape => "data shape",
            ErrorKind::Config => "config",
        };
        write!(f, "{}", label)
    }
}

/// Application-specific errors for EOL synchronization.
///
/// Uses thiserror to derive Display and Error traits automatically.
/// Adapters return these wrapped in `anyhow::Error`; callers recover the
/// kind with [`SyncError::kind_of`].
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Authentication failed: {details}\n\n💡 Hint: Check PORT_TOKEN or PORT_CLIENT_ID / PORT_CLIENT_SECRET")]
    Authentication { details: String },

    #[error("Resource not found: {resource}\nResponse: {body}\n\n💡 Hint: Verify that the blueprint and entity identifiers exist in the catalog")]
    NotFound { resource: String, body: String },

    #[error("Request rejected by the catalog: {resource}\nResponse: {body}\n\n💡 Hint: Verify that the property and relation names match the blueprint schema")]
    Validation { resource: String, body: String },

    #[error("Request failed: {resource}\nDetails: {details}")]
    Transport { resource: String, details: String },

    #[error("Unexpected data shape in {entity}: {details}")]
    DataShape { entity: String, details: String },

    #[error("Invalid configuration: {message}\n\n💡 Hint: {hint}")]
    Config { message: String, hint: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    OutputWrite { path: PathBuf, details: String },
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Authentication { .. } => ErrorKind::Authentication,
            SyncError::NotFound { .. } => ErrorKind::NotFound,
            SyncError::Validation { .. } => ErrorKind::Validation,
            SyncError::Transport { .. } => ErrorKind::Transport,
            SyncError::DataShape { .. } => ErrorKind::DataShape,
            SyncError::Config { .. } | SyncError::OutputWrite { .. } => ErrorKind::Config,
        }
    }

    /// Recovers the kind of an error that crossed a port boundary.
    ///
    /// Anything that is not a `SyncError` (reqwest, serde, io) counts as a
    /// transport failure.
    pub fn kind_of(err: &anyhow::Error) -> ErrorKind {
        err.downcast_ref::<SyncError>()
            .map(SyncError::kind)
            .unwrap_or(ErrorKind::Transport)
    }

    pub fn config(message: impl Into<String>, hint: impl Into<String>) -> Self {
        SyncError::Config {
            message: message.into(),
            hint: hint.into(),
        }
    }
}
