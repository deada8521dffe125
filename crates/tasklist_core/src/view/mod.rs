//! Derived read models over the task collection.
//!
//! Everything here is a pure function of the collection; nothing is stored.

pub mod filter;
pub mod stats;
