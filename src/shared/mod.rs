//! Shared helpers used across the operations

pub mod patch;
pub mod time;
pub mod validation;
