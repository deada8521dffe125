//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, repository writes and notifications.
//! - Keep presentation layers free of business rules.

pub mod task_store;
