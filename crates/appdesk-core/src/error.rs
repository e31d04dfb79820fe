//! Error types for appdesk.
//!
//! Every error is terminal for the current invocation. Nothing is rolled back,
//! so steps completed before the failure (an already created symlink, for
//! example) stay in place.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the appdesk library.
#[derive(Debug, Error)]
pub enum AppdeskError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied for {}: {message}", .path.display())]
    PermissionDenied { path: PathBuf, message: String },

    #[error("Failed to extract AppImage contents: {message}")]
    ExtractionFailed {
        message: String,
        /// Captured stdout and stderr of the extraction process.
        output: String,
    },

    #[error("No image files found in {}", .0.display())]
    NoIconsFound(PathBuf),

    #[error("No desktop categories found in any applications directory")]
    NoCategoriesFound,

    #[error("Aborted by user")]
    UserAborted,

    #[error("Cannot write to {}: {source}", .path.display())]
    UnwritableTarget {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for appdesk operations.
pub type Result<T> = std::result::Result<T, AppdeskError>;

impl From<std::io::Error> for AppdeskError {
    fn from(err: std::io::Error) -> Self {
        AppdeskError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for AppdeskError {
    fn from(err: serde_json::Error) -> Self {
        AppdeskError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl AppdeskError {
    /// Create an IO error with path context.
    ///
    /// `EACCES`/`EPERM` become [`AppdeskError::PermissionDenied`].
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            return AppdeskError::PermissionDenied {
                message: err.to_string(),
                path,
            };
        }
        AppdeskError::Io {
            message: err.to_string(),
            path: Some(path),
            source: Some(err),
        }
    }

    /// Create an error for a failed directory creation or file write.
    pub fn unwritable(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        AppdeskError::UnwritableTarget {
            path: path.into(),
            source: err,
        }
    }

    /// Convert to a process exit code.
    ///
    /// - 1: generic failure
    /// - 2: bundle not found
    /// - 3: permission denied
    /// - 4: extraction failed
    /// - 5: nothing to choose from (icons, categories)
    /// - 6: target not writable
    /// - 130: aborted by user
    pub fn exit_code(&self) -> i32 {
        match self {
            AppdeskError::NotFound(_) => 2,
            AppdeskError::PermissionDenied { .. } => 3,
            AppdeskError::ExtractionFailed { .. } => 4,
            AppdeskError::NoIconsFound(_) | AppdeskError::NoCategoriesFound => 5,
            AppdeskError::UnwritableTarget { .. } => 6,
            AppdeskError::UserAborted => 130,
            _ => 1,
        }
    }
}
