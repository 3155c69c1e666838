//! Commands and queries over the compliance model
//!
//! Each service holds the shared [`Database`](crate::infrastructure::database::Database)
//! and opens one write transaction per command, queued behind the store's
//! write slot. The transactional bodies are free functions over
//! `ConnectionTrait` so the demo seeder can compose them in one transaction.

pub mod accounts;
pub mod dashboard;
pub mod evaluations;
pub mod notifications;
pub mod policies;
pub mod seed;
pub mod users;

use serde::Serialize;

/// Result of deleting a record that owns evaluations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CascadeDeletion {
	pub id: i32,
	pub evaluations_removed: u64,
}
