//! Persistence boundary for the task collection.
//!
//! # Responsibility
//! - Define the load/save contract the store writes through.
//! - Keep storage details (SQLite, JSON encoding) out of the store.
//!
//! # Invariants
//! - The whole collection lives under one storage key; every save replaces it.
//! - A missing key loads as an empty collection.
//! - Read paths reject invalid persisted records instead of masking them.

pub mod memory_repo;
pub mod task_repo;
