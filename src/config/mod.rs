//! Configuration management.
//!
//! This module resolves where the jobs database lives and loads the optional
//! settings file.
//!
//! # Layout
//!
//! - **Database**: `~/.jobsync/data/jobsync.db` unless overridden
//! - **Settings**: `~/.jobsync/config.json` (or `JOBSYNC_CONFIG`)
//!
//! ```json
//! {
//!   "database": "/var/lib/jobsync/jobs.db",
//!   "busy_timeout_ms": 5000
//! }
//! ```

use crate::error::{Error, Result};
use crate::storage::DEFAULT_BUSY_TIMEOUT_MS;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings loaded from the config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Database file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// SQLite busy timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_timeout_ms: Option<u64>,
}

impl Settings {
    /// Parse settings from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load settings from a file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json_str(&json)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Config(format!("{}: {e}", path.display()))),
        }
    }

    /// Load settings from the default config location.
    ///
    /// # Errors
    ///
    /// See [`Settings::load_from`].
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Effective busy timeout.
    #[must_use]
    pub fn busy_timeout_ms(&self) -> u64 {
        self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS)
    }
}

/// Get the global jobsync directory (`~/.jobsync/`).
#[must_use]
pub fn global_jobsync_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".jobsync"))
}

/// Location of the settings file.
///
/// `JOBSYNC_CONFIG` wins over `~/.jobsync/config.json`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("JOBSYNC_CONFIG") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    global_jobsync_dir().map(|dir| dir.join("config.json"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `JOBSYNC_TEST_DB=1` (or any non-empty
/// value other than `0`/`false`).
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("JOBSYNC_TEST_DB")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

/// Get the test database path (`~/.jobsync/test/jobsync.db`).
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_jobsync_dir().map(|dir| dir.join("test").join("jobsync.db"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. `explicit_path` (the `--db` flag or `JOBSYNC_DB`)
/// 2. `JOBSYNC_TEST_DB` test mode → test database
/// 3. `database` from the settings file
/// 4. Global location: `~/.jobsync/data/jobsync.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>, settings: &Settings) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    if let Some(path) = &settings.database {
        return Some(path.clone());
    }

    global_jobsync_dir().map(|dir| dir.join("data").join("jobsync.db"))
}
