//! Core error types

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by core commands and queries
#[derive(Error, Debug)]
pub enum CoreError {
	/// Referenced record does not exist
	#[error("{entity} {id} not found")]
	NotFound { entity: &'static str, id: String },

	/// A create or update would break a uniqueness invariant
	#[error("Conflict: {0}")]
	Conflict(String),

	/// Supplied value is outside the declared constraints
	#[error("Invalid {field}: {message}")]
	Validation { field: String, message: String },

	/// Storage failure unrelated to application invariants
	#[error("Database error: {0}")]
	Database(DbErr),

	/// Any other internal failure
	#[error("Internal error: {0}")]
	Internal(String),
}

/// Coarse classification handed to collaborators for transport mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	NotFound,
	Conflict,
	ValidationFailed,
	Internal,
}

impl CoreError {
	pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
		Self::NotFound {
			entity,
			id: id.to_string(),
		}
	}

	pub fn conflict(message: impl Into<String>) -> Self {
		Self::Conflict(message.into())
	}

	pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Validation {
			field: field.into(),
			message: message.into(),
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::NotFound { .. } => ErrorKind::NotFound,
			Self::Conflict(_) => ErrorKind::Conflict,
			Self::Validation { .. } => ErrorKind::ValidationFailed,
			Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
		}
	}
}

// Constraint violations surfaced by the store are the canonical conflict signal,
// including the ones that only show up at commit time.
impl From<DbErr> for CoreError {
	fn from(err: DbErr) -> Self {
		match err.sql_err() {
			Some(SqlErr::UniqueConstraintViolation(message)) => Self::Conflict(message),
			Some(SqlErr::ForeignKeyConstraintViolation(message)) => Self::NotFound {
				entity: "reference",
				id: message,
			},
			_ => Self::Database(err),
		}
	}
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kinds_cover_the_taxonomy() {
		assert_eq!(CoreError::not_found("policy", 7).kind(), ErrorKind::NotFound);
		assert_eq!(CoreError::conflict("dup").kind(), ErrorKind::Conflict);
		assert_eq!(
			CoreError::validation("status", "bad").kind(),
			ErrorKind::ValidationFailed
		);
		assert_eq!(
			CoreError::Database(DbErr::Custom("boom".into())).kind(),
			ErrorKind::Internal
		);
	}

	#[test]
	fn plain_db_errors_stay_internal() {
		let err: CoreError = DbErr::Custom("connection reset".into()).into();
		assert!(matches!(err, CoreError::Database(_)));
	}

	#[test]
	fn messages_name_the_missing_record() {
		let err = CoreError::not_found("cloud account", 42);
		assert_eq!(err.to_string(), "cloud account 42 not found");
	}
}
