//! Input constraint checks shared by the services

use crate::error::{CoreError, Result};

/// Check that a required string has between `min` and `max` characters
pub fn require_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
	let len = value.chars().count();
	if len < min {
		return Err(CoreError::validation(
			field,
			if min == 1 {
				"must not be empty".to_string()
			} else {
				format!("must be at least {} characters", min)
			},
		));
	}
	if len > max {
		return Err(CoreError::validation(
			field,
			format!("must be at most {} characters", max),
		));
	}
	Ok(())
}

/// Check that a required string is not empty, with no upper bound
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
	if value.is_empty() {
		return Err(CoreError::validation(field, "must not be empty"));
	}
	Ok(())
}

/// Check an optional string against an upper bound
pub fn optional_max(field: &str, value: Option<&str>, max: usize) -> Result<()> {
	match value {
		Some(v) if v.chars().count() > max => Err(CoreError::validation(
			field,
			format!("must be at most {} characters", max),
		)),
		_ => Ok(()),
	}
}

/// Check that a count is not negative
pub fn non_negative(field: &str, value: i32) -> Result<()> {
	if value < 0 {
		return Err(CoreError::validation(field, "must not be negative"));
	}
	Ok(())
}

/// Minimal shape check for an email address
pub fn email(field: &str, value: &str) -> Result<()> {
	require_length(field, value, 3, 255)?;
	let valid = match value.split_once('@') {
		Some((local, domain)) => {
			!local.is_empty()
				&& !domain.is_empty()
				&& !domain.contains('@')
				&& !value.chars().any(char::is_whitespace)
		}
		None => false,
	};
	if !valid {
		return Err(CoreError::validation(field, "is not a valid email address"));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn length_bounds_are_inclusive() {
		assert!(require_length("name", "a", 1, 3).is_ok());
		assert!(require_length("name", "abc", 1, 3).is_ok());
		assert!(require_length("name", "", 1, 3).is_err());
		assert!(require_length("name", "abcd", 1, 3).is_err());
	}

	#[test]
	fn length_counts_characters_not_bytes() {
		assert!(require_length("name", "ééé", 1, 3).is_ok());
	}

	#[test]
	fn optional_fields_only_check_the_upper_bound() {
		assert!(optional_max("tenant_id", None, 4).is_ok());
		assert!(optional_max("tenant_id", Some(""), 4).is_ok());
		assert!(optional_max("tenant_id", Some("abcde"), 4).is_err());
	}

	#[test]
	fn error_names_the_field() {
		let err = require_length("display_name", "", 1, 255).unwrap_err();
		assert_eq!(err.to_string(), "Invalid display_name: must not be empty");
	}

	#[test]
	fn rejects_malformed_emails() {
		assert!(email("email", "admin@cloudguard.dev").is_ok());
		assert!(email("email", "admin.cloudguard.dev").is_err());
		assert!(email("email", "@cloudguard.dev").is_err());
		assert!(email("email", "a@b@c").is_err());
		assert!(email("email", "a b@c.dev").is_err());
	}

	#[test]
	fn rejects_negative_counts() {
		assert!(non_negative("affected_resources", 0).is_ok());
		assert!(non_negative("affected_resources", -1).is_err());
	}
}
