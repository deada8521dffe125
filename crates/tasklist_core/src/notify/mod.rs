//! User-facing notification boundary.
//!
//! # Responsibility
//! - Carry fire-and-forget messages from the store to the presentation layer.
//! - Describe optional follow-up actions without holding store references.
//!
//! # Invariants
//! - Delivery never fails from the store's point of view.
//! - Actions are plain data; the store executes them via `TaskStore::trigger`.

use crate::model::task::TaskId;
use log::{error, info};
use std::fmt::{Display, Formatter};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// Store command attached to a notification action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCommand {
    /// Re-insert the most recently deleted task, if it is still `id`.
    RestoreDeleted(TaskId),
}

/// Single action button offered with a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub label: String,
    pub command: ActionCommand,
}

impl NotificationAction {
    pub fn undo_delete(id: TaskId) -> Self {
        Self {
            label: "Undo".to_string(),
            command: ActionCommand::RestoreDeleted(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub action: Option<NotificationAction>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            action: None,
        }
    }

    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " ({})", action.label)?;
        }
        Ok(())
    }
}

/// Sink for user-facing notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Notifier that keeps every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Most recent notification that still carries an action.
    pub fn last_action(&self) -> Option<&NotificationAction> {
        self.notifications
            .iter()
            .rev()
            .find_map(|notification| notification.action.as_ref())
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// Notifier that forwards to the log facade only.
///
/// Message text is user-facing and free of task content, so it is safe to log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Error => error!(
                "event=notify module=notify severity=error message={}",
                notification.message
            ),
            severity => info!(
                "event=notify module=notify severity={} message={} has_action={}",
                severity,
                notification.message,
                notification.action.is_some()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Notification, NotificationAction, Notifier, RecordingNotifier};
    use uuid::Uuid;

    #[test]
    fn display_includes_severity_and_action_label() {
        let id = Uuid::new_v4();
        let rendered = Notification::success("Task deleted")
            .with_action(NotificationAction::undo_delete(id))
            .to_string();
        assert_eq!(rendered, "[success] Task deleted (Undo)");
    }

    #[test]
    fn recording_notifier_tracks_latest_action() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut notifier = RecordingNotifier::new();
        notifier.notify(
            Notification::success("Task deleted")
                .with_action(NotificationAction::undo_delete(first)),
        );
        notifier.notify(
            Notification::success("Task deleted")
                .with_action(NotificationAction::undo_delete(second)),
        );
        notifier.notify(Notification::info("No completed tasks to clear"));

        assert_eq!(
            notifier.last_action(),
            Some(&NotificationAction::undo_delete(second))
        );
        assert_eq!(notifier.drain().len(), 3);
        assert!(notifier.notifications().is_empty());
    }
}
