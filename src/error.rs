//! Error types for jobsync.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 4=format/validation, 7=config, 8=io)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::sync::SyncError;

/// Result type alias for jobsync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    AlreadyInitialized,
    StorageError,

    // Document (exit 4)
    FormatError,
    ValidationError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::StorageError => "STORAGE_ERROR",
            Self::FormatError => "FORMAT_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotInitialized | Self::AlreadyInitialized | Self::StorageError => 2,
            Self::FormatError | Self::ValidationError => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in jobsync operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: no database at {path}")]
    NotInitialized { path: PathBuf },

    #[error("Database at {path} has no current schema")]
    SchemaOutdated { path: PathBuf },

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Job has no id: {key}")]
    MissingJobId { key: String },

    #[error("No job row with id {id}")]
    JobRowMissing { id: i64 },

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized { .. } | Self::SchemaOutdated { .. } => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::Database(_) | Self::MissingJobId { .. } | Self::JobRowMissing { .. } => {
                ErrorCode::StorageError
            }
            Self::Sync(err) => match err {
                SyncError::Format(_) => ErrorCode::FormatError,
                SyncError::Validation(_) => ErrorCode::ValidationError,
                SyncError::Database(_) => ErrorCode::StorageError,
                SyncError::Io(_) | SyncError::FileNotFound(_) => ErrorCode::IoError,
            },
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized { path } => Some(format!(
                "Run `jobsync init` to create the database at {}, or pass --db <path>.",
                path.display()
            )),

            Self::SchemaOutdated { path } => Some(format!(
                "Run `jobsync init --force --db {}` to create the schema and apply migrations.",
                path.display()
            )),

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to reinitialize.",
                path.display()
            )),

            Self::Sync(SyncError::Format(_)) => Some(
                "Expected <jobs> containing <job> elements with depCode, depJob \
                 and an optional description, each at most once."
                    .to_string(),
            ),

            Self::Sync(SyncError::Validation(_)) => Some(
                "depCode and depJob are required. Limits: depCode 20, depJob 100, \
                 description 255 characters."
                    .to_string(),
            ),

            Self::Sync(SyncError::FileNotFound(_)) => {
                Some("Check the path, or run `jobsync save <file>` to create one.".to_string())
            }

            Self::Config(_) => Some(
                "Check the config file (JOBSYNC_CONFIG or ~/.jobsync/config.json).".to_string(),
            ),

            Self::Database(_)
            | Self::MissingJobId { .. }
            | Self::JobRowMissing { .. }
            | Self::Sync(_)
            | Self::Io(_)
            | Self::Json(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
