//! Persistent task list store.
//!
//! # Responsibility
//! - Own the authoritative task collection and write it through to storage.
//! - Validate input before mutating, and report every outcome to the notifier.
//! - Derive the filtered view and stats on read.
//!
//! # Invariants
//! - Every mutation is applied optimistically, then persisted; a failed save
//!   reverts exactly the records that mutation touched.
//! - `loading` is true only while a mutation is between apply and commit/revert.
//! - At most one deleted task is held for undo; a newer deletion replaces it.
//! - Logs carry ids, counts and durations only, never task text.

use crate::model::task::{NewTask, Task, TaskId, TaskUpdate};
use crate::model::validation::TaskValidationError;
use crate::notify::{ActionCommand, Notification, NotificationAction, Notifier};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use crate::view::filter::{select_view, TaskFilter};
use crate::view::stats::{compute_stats, TaskStats};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failure. Already reported to the notifier when returned.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected before any mutation.
    Validation(TaskValidationError),
    /// Storage read/write failed; in-memory state was reverted.
    Persistence(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// One collection change together with what is needed to undo it.
#[derive(Debug, Clone)]
enum Mutation {
    /// Prepend a task.
    Insert(Task),
    /// Swap one record for its updated copy.
    Replace { before: Task, after: Task },
    /// Drop one record that sat at `index`.
    Remove { index: usize, task: Task },
    /// Drop several records; indices ascending, relative to the original order.
    RemoveMany(Vec<(usize, Task)>),
}

impl Mutation {
    fn apply(&self, tasks: &mut Vec<Task>) {
        match self {
            Self::Insert(task) => tasks.insert(0, task.clone()),
            Self::Replace { after, .. } => replace_by_id(tasks, after),
            Self::Remove { task, .. } => tasks.retain(|item| item.id != task.id),
            Self::RemoveMany(removed) => {
                let ids: HashSet<TaskId> = removed.iter().map(|(_, task)| task.id).collect();
                tasks.retain(|item| !ids.contains(&item.id));
            }
        }
    }

    fn revert(&self, tasks: &mut Vec<Task>) {
        match self {
            Self::Insert(task) => tasks.retain(|item| item.id != task.id),
            Self::Replace { before, .. } => replace_by_id(tasks, before),
            Self::Remove { index, task } => reinsert(tasks, *index, task),
            Self::RemoveMany(removed) => {
                for (index, task) in removed {
                    reinsert(tasks, *index, task);
                }
            }
        }
    }

    fn op(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Replace { .. } => "replace",
            Self::Remove { .. } => "remove",
            Self::RemoveMany(_) => "remove_many",
        }
    }

    fn affected(&self) -> usize {
        match self {
            Self::RemoveMany(removed) => removed.len(),
            _ => 1,
        }
    }
}

fn replace_by_id(tasks: &mut [Task], record: &Task) {
    if let Some(slot) = tasks.iter_mut().find(|item| item.id == record.id) {
        *slot = record.clone();
    }
}

fn reinsert(tasks: &mut Vec<Task>, index: usize, task: &Task) {
    if tasks.iter().any(|item| item.id == task.id) {
        return;
    }
    tasks.insert(index.min(tasks.len()), task.clone());
}

/// Authoritative task collection backed by a repository.
pub struct TaskStore<R: TaskRepository, N: Notifier> {
    repo: R,
    notifier: N,
    tasks: Vec<Task>,
    filter: TaskFilter,
    loading: bool,
    last_deleted: Option<Task>,
}

impl<R: TaskRepository, N: Notifier> TaskStore<R, N> {
    /// Loads the persisted collection and builds a store around it.
    ///
    /// # Errors
    /// - `Persistence` when the stored collection cannot be read or is invalid.
    pub fn open(repo: R, notifier: N) -> StoreResult<Self> {
        let started_at = Instant::now();
        let tasks = repo.load_tasks().map_err(|err| {
            error!(
                "event=store_open module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            StoreError::Persistence(err)
        })?;
        info!(
            "event=store_open module=store status=ok count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            repo,
            notifier,
            tasks,
            filter: TaskFilter::default(),
            loading: false,
            last_deleted: None,
        })
    }

    /// Full collection, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Collection filtered by the current filter.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        select_view(&self.tasks, self.filter)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn stats(&self) -> TaskStats {
        compute_stats(&self.tasks)
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|task| task.completed)
    }

    /// Task currently held for undo, if any.
    pub fn last_deleted(&self) -> Option<&Task> {
        self.last_deleted.as_ref()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Creates a task and prepends it.
    ///
    /// # Errors
    /// - `Validation` when title or description is invalid; nothing changes.
    /// - `Persistence` when the save fails; the new task is removed again.
    pub fn add(&mut self, data: &NewTask) -> StoreResult<TaskId> {
        data.validate().map_err(|err| self.reject("add", err))?;

        let task = Task::new(data);
        let id = task.id;
        match self.transact(Mutation::Insert(task)) {
            Ok(()) => {
                self.notifier
                    .notify(Notification::success("Task added successfully"));
                Ok(id)
            }
            Err(err) => {
                self.notifier.notify(Notification::error("Failed to add task"));
                Err(err.into())
            }
        }
    }

    /// Flips `completed` on the matching task.
    ///
    /// Returns the new completion state, or `None` when `id` is unknown.
    pub fn toggle(&mut self, id: TaskId) -> StoreResult<Option<bool>> {
        let Some(before) = self.get(id).cloned() else {
            return Ok(None);
        };
        let after = before.apply_update(&TaskUpdate::default().completed(!before.completed));
        let completed = after.completed;

        self.transact(Mutation::Replace { before, after })
            .map_err(|err| {
                self.notifier
                    .notify(Notification::error("Failed to update task"));
                StoreError::from(err)
            })?;
        Ok(Some(completed))
    }

    /// Overlays `updates` on the matching task.
    ///
    /// An unknown `id` writes nothing but still reports success; the return
    /// value is `false` in that case.
    ///
    /// # Errors
    /// - `Validation` when a provided title or description is invalid.
    /// - `Persistence` when the save fails; the previous record is restored.
    pub fn edit(&mut self, id: TaskId, updates: &TaskUpdate) -> StoreResult<bool> {
        updates.validate().map_err(|err| self.reject("edit", err))?;

        let Some(before) = self.get(id).cloned() else {
            info!("event=task_edit module=store status=absent task_id={id}");
            self.notifier
                .notify(Notification::success("Task updated successfully"));
            return Ok(false);
        };
        let after = before.apply_update(updates);

        match self.transact(Mutation::Replace { before, after }) {
            Ok(()) => {
                self.notifier
                    .notify(Notification::success("Task updated successfully"));
                Ok(true)
            }
            Err(err) => {
                self.notifier
                    .notify(Notification::error("Failed to update task"));
                Err(err.into())
            }
        }
    }

    /// Removes the matching task and offers an undo action.
    ///
    /// Returns the removed task, or `None` when `id` is unknown.
    pub fn remove(&mut self, id: TaskId) -> StoreResult<Option<Task>> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(None);
        };
        let task = self.tasks[index].clone();

        match self.transact(Mutation::Remove {
            index,
            task: task.clone(),
        }) {
            Ok(()) => {
                self.last_deleted = Some(task.clone());
                self.notifier.notify(
                    Notification::success("Task deleted")
                        .with_action(NotificationAction::undo_delete(id)),
                );
                Ok(Some(task))
            }
            Err(err) => {
                self.notifier
                    .notify(Notification::error("Failed to delete task"));
                Err(err.into())
            }
        }
    }

    /// Re-inserts the last deleted task at the front when it is still `id`.
    ///
    /// The record is restored untouched, `updated_at` included. Returns
    /// `false` when the undo slot holds a different task or nothing.
    pub fn restore_deleted(&mut self, id: TaskId) -> StoreResult<bool> {
        let task = match self.last_deleted.take() {
            Some(task) if task.id == id => task,
            other => {
                self.last_deleted = other;
                info!("event=task_restore module=store status=stale task_id={id}");
                self.notifier.notify(Notification::info("Nothing to restore"));
                return Ok(false);
            }
        };

        match self.transact(Mutation::Insert(task.clone())) {
            Ok(()) => {
                self.notifier.notify(Notification::success("Task restored"));
                Ok(true)
            }
            Err(err) => {
                self.last_deleted = Some(task);
                self.notifier
                    .notify(Notification::error("Failed to restore task"));
                Err(err.into())
            }
        }
    }

    /// Executes a notification action.
    pub fn trigger(&mut self, action: &NotificationAction) -> StoreResult<bool> {
        match action.command {
            ActionCommand::RestoreDeleted(id) => self.restore_deleted(id),
        }
    }

    /// Removes every completed task in one write.
    ///
    /// Returns the number removed; 0 means nothing changed.
    pub fn clear_completed(&mut self) -> StoreResult<usize> {
        let removed: Vec<(usize, Task)> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.completed)
            .map(|(index, task)| (index, task.clone()))
            .collect();

        if removed.is_empty() {
            self.notifier
                .notify(Notification::info("No completed tasks to clear"));
            return Ok(0);
        }

        let count = removed.len();
        match self.transact(Mutation::RemoveMany(removed)) {
            Ok(()) => {
                let noun = if count == 1 { "task" } else { "tasks" };
                self.notifier
                    .notify(Notification::success(format!("Cleared {count} completed {noun}")));
                Ok(count)
            }
            Err(err) => {
                self.notifier
                    .notify(Notification::error("Failed to clear completed tasks"));
                Err(err.into())
            }
        }
    }

    fn reject(&mut self, op: &'static str, err: TaskValidationError) -> StoreError {
        warn!("event=task_{op} module=store status=rejected reason={err:?}");
        self.notifier.notify(Notification::error(err.to_string()));
        StoreError::Validation(err)
    }

    fn transact(&mut self, mutation: Mutation) -> RepoResult<()> {
        let started_at = Instant::now();
        self.begin(&mutation);
        let result = self.repo.save_tasks(&self.tasks);
        self.settle(&mutation, result, started_at)
    }

    /// Enters the pending state with `mutation` applied.
    fn begin(&mut self, mutation: &Mutation) {
        self.loading = true;
        mutation.apply(&mut self.tasks);
    }

    /// Commits or reverts `mutation` from the save outcome and leaves pending.
    fn settle(
        &mut self,
        mutation: &Mutation,
        result: RepoResult<()>,
        started_at: Instant,
    ) -> RepoResult<()> {
        match &result {
            Ok(()) => info!(
                "event=store_commit module=store status=ok op={} affected={} count={} duration_ms={}",
                mutation.op(),
                mutation.affected(),
                self.tasks.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => {
                mutation.revert(&mut self.tasks);
                error!(
                    "event=store_commit module=store status=reverted op={} affected={} duration_ms={} error={}",
                    mutation.op(),
                    mutation.affected(),
                    started_at.elapsed().as_millis(),
                    err
                );
            }
        }

        self.loading = false;
        result
    }
}
