//! Field validators for task input.
//!
//! # Responsibility
//! - Check user-provided title/description text before any state mutation.
//! - Provide user-facing messages for each validation failure.
//!
//! # Invariants
//! - Lengths are counted in Unicode scalar values, not bytes.
//! - Title limits apply to the trimmed text; description limits to raw text.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum title length after trimming.
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum description length.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Validation failure for task fields and whole task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Trimmed title exceeds `TITLE_MAX_CHARS`.
    TitleTooLong { len: usize },
    /// Description exceeds `DESCRIPTION_MAX_CHARS`.
    DescriptionTooLong { len: usize },
    /// Task id is the nil UUID.
    NilId,
    /// `updatedAt` is earlier than `createdAt`.
    UpdatedBeforeCreated,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Task title cannot be empty"),
            Self::TitleTooLong { .. } => write!(
                f,
                "Task title must be at most {TITLE_MAX_CHARS} characters"
            ),
            Self::DescriptionTooLong { .. } => write!(
                f,
                "Task description must be at most {DESCRIPTION_MAX_CHARS} characters"
            ),
            Self::NilId => write!(f, "task id must not be nil"),
            Self::UpdatedBeforeCreated => write!(f, "updatedAt must be >= createdAt"),
        }
    }
}

impl Error for TaskValidationError {}

/// Validates a task title.
///
/// # Errors
/// - `EmptyTitle` when the trimmed text is empty.
/// - `TitleTooLong` when the trimmed text exceeds 200 characters.
pub fn validate_title(text: &str) -> Result<(), TaskValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    let len = trimmed.chars().count();
    if len > TITLE_MAX_CHARS {
        return Err(TaskValidationError::TitleTooLong { len });
    }
    Ok(())
}

/// Validates an optional task description. Absent descriptions always pass.
///
/// # Errors
/// - `DescriptionTooLong` when the text exceeds 1000 characters.
pub fn validate_description(text: Option<&str>) -> Result<(), TaskValidationError> {
    let Some(text) = text else {
        return Ok(());
    };
    let len = text.chars().count();
    if len > DESCRIPTION_MAX_CHARS {
        return Err(TaskValidationError::DescriptionTooLong { len });
    }
    Ok(())
}
