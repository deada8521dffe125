//! Process-local repository.
//!
//! Keeps the encoded collection in memory so the same JSON round-trip as the
//! SQLite backend is exercised. Failures can be injected to drive revert paths.

use crate::model::task::Task;
use crate::repo::task_repo::{
    decode_collection, encode_collection, RepoError, RepoResult, TaskRepository,
};

/// In-memory repository with failure injection.
#[derive(Debug, Default)]
pub struct MemoryTaskRepository {
    value: Option<String>,
    failing_saves: usize,
    fail_loads: bool,
    save_count: usize,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the stored value with `tasks`.
    pub fn with_tasks(tasks: &[Task]) -> RepoResult<Self> {
        Ok(Self {
            value: Some(encode_collection(tasks)?),
            ..Self::default()
        })
    }

    /// Seeds the stored value with raw text, bypassing encoding.
    pub fn with_raw_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Makes the next `count` saves fail with `Unavailable`.
    pub fn fail_next_saves(&mut self, count: usize) {
        self.failing_saves = count;
    }

    /// Makes every load fail with `Unavailable`.
    pub fn fail_loads(&mut self, fail: bool) {
        self.fail_loads = fail;
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn raw_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Decodes the currently stored collection.
    pub fn stored_tasks(&self) -> RepoResult<Vec<Task>> {
        match self.value.as_deref() {
            Some(value) => decode_collection(value),
            None => Ok(Vec::new()),
        }
    }
}

impl TaskRepository for MemoryTaskRepository {
    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        if self.fail_loads {
            return Err(RepoError::Unavailable("load rejected".to_string()));
        }
        self.stored_tasks()
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> RepoResult<()> {
        if self.failing_saves > 0 {
            self.failing_saves -= 1;
            return Err(RepoError::Unavailable("save rejected".to_string()));
        }
        self.value = Some(encode_collection(tasks)?);
        self.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryTaskRepository;
    use crate::model::task::{NewTask, Task};
    use crate::repo::task_repo::{RepoError, TaskRepository};

    #[test]
    fn absent_value_loads_empty() {
        let repo = MemoryTaskRepository::new();
        assert!(repo.load_tasks().unwrap().is_empty());
        assert!(repo.raw_value().is_none());
    }

    #[test]
    fn injected_failures_are_consumed_in_order() {
        let mut repo = MemoryTaskRepository::new();
        let tasks = vec![Task::new(&NewTask::new("a"))];
        repo.fail_next_saves(1);

        assert!(matches!(
            repo.save_tasks(&tasks),
            Err(RepoError::Unavailable(_))
        ));
        assert_eq!(repo.save_count(), 0);

        repo.save_tasks(&tasks).unwrap();
        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.load_tasks().unwrap(), tasks);
    }
}
