//! Error types for the install pipeline

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InstallError>;

/// Errors that can occur while provisioning an environment.
///
/// All of these are fatal to the run: there are no retries, and files
/// already written by the failing package are left in place.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Transport-level failure while fetching an archive
    #[error("request to '{url}' failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The archive host answered with a non-success status
    #[error("server returned {status} for '{url}'")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The computed archive URL is not a valid absolute URL
    #[error("invalid archive URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// File system I/O failure with operation context
    #[error("file operation failed while {operation} '{path}'")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// The archive could not be opened or read
    #[error("failed to read archive '{archive}'")]
    Zip {
        archive: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The archive's layout did not match expectations, or the unpacked
    /// tree could not be relocated to its destination
    #[error("extraction of '{archive}' failed: {reason}")]
    Extraction { archive: PathBuf, reason: String },

    /// A post-install action failed (command missing, non-zero exit, or
    /// file move failure)
    #[error("post-install action for '{package}' failed: {detail}")]
    PostAction { package: String, detail: String },

    /// A generated artifact (readme, shortcut, index) could not be written
    #[error("failed to write artifact '{path}'")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Types of file operations for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    Delete,
    Move,
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Delete => write!(f, "deleting"),
            FileOperation::Move => write!(f, "moving"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

impl InstallError {
    /// Error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            InstallError::Network { .. } => "network",
            InstallError::HttpStatus { .. } => "http_status",
            InstallError::InvalidUrl { .. } => "invalid_url",
            InstallError::FileSystem { .. } => "file_system",
            InstallError::Zip { .. } => "zip",
            InstallError::Extraction { .. } => "extraction",
            InstallError::PostAction { .. } => "post_action",
            InstallError::Artifact { .. } => "artifact",
        }
    }
}
