//! Task domain model.
//!
//! # Responsibility
//! - Define the task record, its factory and update rules.
//! - Provide field validators used before every state mutation.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion removes the record; there are no tombstones.

pub mod task;
pub mod validation;
