//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its wire shape.
//! - Construct new records (factory) and derive updated copies.
//!
//! # Invariants
//! - `id` is generated once and never reused for another task.
//! - `title` is stored trimmed; `description` is stored trimmed or absent.
//! - `updated_at >= created_at`, and `updated_at` never moves backwards.
//! - Records are never mutated in place; updates return a new `Task`.

use crate::model::validation::{validate_description, validate_title, TaskValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Canonical task record.
///
/// Serialized with camelCase field names (`createdAt`, `updatedAt`), which is
/// the persisted collection format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Runs title and description validators against the raw input.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())
    }
}

/// Partial update overlaid on an existing task.
///
/// `None` fields are left untouched. A `description` that is empty after
/// trimming clears the stored description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Validates only the fields that are present.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        validate_description(self.description.as_deref())
    }
}

impl Task {
    /// Creates a task with a generated id and `created_at = updated_at = now`.
    ///
    /// Performs no validation; callers run `NewTask::validate` first.
    pub fn new(data: &NewTask) -> Self {
        Self::build(Uuid::new_v4(), data, Utc::now())
    }

    /// Creates a task with a caller-provided id and creation time.
    ///
    /// Used by import and test paths where identity already exists.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    pub fn with_id(
        id: TaskId,
        data: &NewTask,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        if id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        Ok(Self::build(id, data, created_at))
    }

    fn build(id: TaskId, data: &NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: data.title.trim().to_string(),
            description: normalize_description(data.description.as_deref()),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with `updates` overlaid and `updated_at` refreshed.
    ///
    /// `updated_at` is refreshed even when no visible field changes.
    pub fn apply_update(&self, updates: &TaskUpdate) -> Self {
        self.apply_update_at(updates, Utc::now())
    }

    /// Same as `apply_update` with an explicit clock reading.
    ///
    /// A clock reading earlier than the current `updated_at` is clamped.
    pub fn apply_update_at(&self, updates: &TaskUpdate, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        if let Some(title) = updates.title.as_deref() {
            next.title = title.trim().to_string();
        }
        if let Some(description) = updates.description.as_deref() {
            next.description = normalize_description(Some(description));
        }
        if let Some(completed) = updates.completed {
            next.completed = completed;
        }
        next.updated_at = now.max(self.updated_at);
        next
    }

    /// Checks the full record, used on every read from storage.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        if self.updated_at < self.created_at {
            return Err(TaskValidationError::UpdatedBeforeCreated);
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{NewTask, Task, TaskUpdate};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn update_clamps_backwards_clock() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let task = Task::with_id(uuid::Uuid::new_v4(), &NewTask::new("x"), created).unwrap();

        let earlier = created - Duration::seconds(30);
        let updated = task.apply_update_at(&TaskUpdate::default().completed(true), earlier);
        assert_eq!(updated.updated_at, created);
        assert!(updated.completed);
    }

    #[test]
    fn blank_description_update_clears_field() {
        let task = Task::new(&NewTask::new("x").with_description("details"));
        let updated = task.apply_update(&TaskUpdate::default().description("   "));
        assert_eq!(updated.description, None);
    }

    #[test]
    fn update_validation_only_checks_present_fields() {
        assert!(TaskUpdate::default().completed(true).validate().is_ok());
        assert!(TaskUpdate::default().title("  ").validate().is_err());
    }
}
