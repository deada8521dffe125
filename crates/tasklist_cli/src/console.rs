//! Terminal notification sink and task rendering.

use std::fmt::Write as _;
use tasklist_core::{
    LogNotifier, Notification, NotificationAction, Notifier, Severity, Task, TaskFilter, TaskStats,
};

/// Prints notifications, forwards them to the log and remembers the last action.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    log: LogNotifier,
    last_action: Option<NotificationAction>,
}

impl ConsoleNotifier {
    /// Action offered by the most recent notification that carried one.
    pub fn last_action(&self) -> Option<&NotificationAction> {
        self.last_action.as_ref()
    }

    pub fn clear_last_action(&mut self) {
        self.last_action = None;
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Error => eprintln!("{notification}"),
            Severity::Success | Severity::Info => println!("{notification}"),
        }
        if let Some(action) = &notification.action {
            self.last_action = Some(action.clone());
        }
        self.log.notify(notification);
    }
}

/// Short id shown in listings; any unique prefix is accepted back.
pub fn short_id(task: &Task) -> String {
    task.id.simple().to_string()[..8].to_string()
}

pub fn render_list(tasks: &[&Task], filter: TaskFilter, stats: TaskStats) -> String {
    let mut out = String::new();
    if tasks.is_empty() {
        let _ = writeln!(out, "{}", filter.empty_title());
        let _ = writeln!(out, "{}", filter.empty_hint());
    }
    for task in tasks {
        let mark = if task.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {}  {}", short_id(task), task.title);
        if let Some(description) = &task.description {
            for line in description.lines() {
                let _ = writeln!(out, "             {line}");
            }
        }
    }
    if stats.total > 0 {
        let _ = write!(
            out,
            "\n{} of {} tasks completed",
            stats.completed, stats.total
        );
        if stats.completed > 0 {
            let _ = write!(out, " ({}%)", stats.completion_percent());
        }
        out.push('\n');
    }
    out
}

pub fn render_stats(stats: TaskStats) -> String {
    format!(
        "all {}  active {}  completed {}  progress {}%",
        stats.total,
        stats.active,
        stats.completed,
        stats.completion_percent()
    )
}
