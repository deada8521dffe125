//! Runtime configuration for the core.
//!
//! Plain data with defaults; callers (CLI, embedding UI) fill it from flags or
//! environment and pass it down.

use std::path::PathBuf;

/// Storage key under which the collection is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Store-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Uses `key` when it is non-blank, otherwise the default key.
    pub fn with_storage_key(key: Option<&str>) -> Self {
        match key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => Self {
                storage_key: key.to_string(),
            },
            None => Self::default(),
        }
    }
}

/// Logging configuration consumed by `logging::init_logging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
        }
    }

    /// Uses the build-mode default level.
    pub fn with_default_level(log_dir: impl Into<PathBuf>) -> Self {
        Self::new(default_log_level(), log_dir)
    }
}

/// Default log level for the current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, DEFAULT_STORAGE_KEY};

    #[test]
    fn blank_storage_key_falls_back_to_default() {
        assert_eq!(StoreConfig::with_storage_key(None).storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(
            StoreConfig::with_storage_key(Some("  ")).storage_key,
            DEFAULT_STORAGE_KEY
        );
        assert_eq!(
            StoreConfig::with_storage_key(Some(" work ")).storage_key,
            "work"
        );
    }
}
