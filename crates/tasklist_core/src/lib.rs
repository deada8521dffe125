//! Core state management for the task list.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{default_log_level, LoggingConfig, StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::task::{NewTask, Task, TaskId, TaskUpdate};
pub use model::validation::{
    validate_description, validate_title, TaskValidationError, DESCRIPTION_MAX_CHARS,
    TITLE_MAX_CHARS,
};
pub use notify::{
    ActionCommand, LogNotifier, Notification, NotificationAction, Notifier, RecordingNotifier,
    Severity,
};
pub use repo::memory_repo::MemoryTaskRepository;
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_store::{StoreError, StoreResult, TaskStore};
pub use view::filter::{select_view, ParseFilterError, TaskFilter};
pub use view::stats::{compute_stats, TaskStats};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
