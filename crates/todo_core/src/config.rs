//! Runtime configuration for the to-do core.
//!
//! # Invariants
//! - Blank or unparsable environment values fall back to defaults.
//! - `from_env` never fails.

use crate::logging::default_log_level;
use crate::service::undo::DEFAULT_UNDO_WINDOW;
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "TODO_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TODO_LOG_LEVEL";
pub const UNDO_WINDOW_ENV: &str = "TODO_UNDO_WINDOW_MS";

const DEFAULT_DB_FILE_NAME: &str = "todo_app.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding `todo_items`.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// How long a swipe-deleted item can be restored.
    pub undo_window: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            undo_window: DEFAULT_UNDO_WINDOW,
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by `TODO_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = non_blank(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        if let Some(millis) = non_blank(UNDO_WINDOW_ENV).and_then(|raw| raw.parse::<u64>().ok()) {
            config.undo_window = Duration::from_millis(millis);
        }
        config
    }
}
