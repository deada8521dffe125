//! Aggregate counts over the task collection.

use crate::model::task::Task;
use serde::Serialize;

/// Derived counts. `active + completed == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskStats {
    /// Completed share of the total, rounded to the nearest whole percent.
    ///
    /// Returns 0 for an empty collection.
    pub fn completion_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = (self.completed * 100 + self.total / 2) / self.total;
        percent.min(100) as u8
    }
}

pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskStats {
        total,
        active: total - completed,
        completed,
    }
}
