//! Explicit runtime configuration.
//!
//! Every operation receives its storage location as a value; there is no
//! process-wide connection or path.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Default single-file note store.
pub const DEFAULT_DB_PATH: &str = "/root/notes.db";

/// Default directory for rolling log files.
pub const DEFAULT_LOG_DIR: &str = "/root/.dotnote/logs";

/// Where the note store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}

/// Logging level and output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub log_dir: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}
