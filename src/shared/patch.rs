//! Partial-update field helpers
//!
//! A nullable column in a patch is an `Option<Option<T>>`: `None` leaves the
//! column alone, `Some(None)` clears it and `Some(Some(v))` sets it. Serde
//! collapses a JSON `null` into the outer `None` unless the field is routed
//! through [`double_option`].

use sea_orm::{ActiveValue, Value};
use serde::{Deserialize, Deserializer};

/// Deserialize a present field (including `null`) as `Some(..)`
///
/// Pair with `#[serde(default)]` so that an absent field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}

/// Turn a plain patch field into an active value
pub fn set_if<T>(value: Option<T>) -> ActiveValue<T>
where
	T: Into<Value>,
{
	match value {
		Some(v) => ActiveValue::Set(v),
		None => ActiveValue::NotSet,
	}
}

/// Turn a nullable patch field into an active value
pub fn set_nullable<T>(value: Option<Option<T>>) -> ActiveValue<Option<T>>
where
	Option<T>: Into<Value>,
{
	match value {
		Some(v) => ActiveValue::Set(v),
		None => ActiveValue::NotSet,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::Deserialize;

	#[derive(Debug, Default, Deserialize)]
	struct Patch {
		#[serde(default, deserialize_with = "double_option")]
		findings: Option<Option<String>>,
	}

	#[test]
	fn absent_field_is_untouched() {
		let patch: Patch = serde_json::from_str("{}").unwrap();
		assert_eq!(patch.findings, None);
	}

	#[test]
	fn explicit_null_clears() {
		let patch: Patch = serde_json::from_str(r#"{"findings": null}"#).unwrap();
		assert_eq!(patch.findings, Some(None));
	}

	#[test]
	fn value_sets() {
		let patch: Patch = serde_json::from_str(r#"{"findings": "open bucket"}"#).unwrap();
		assert_eq!(patch.findings, Some(Some("open bucket".to_string())));
	}

	#[test]
	fn active_values_follow_the_patch() {
		assert!(matches!(set_nullable::<String>(None), ActiveValue::NotSet));
		assert_eq!(
			set_nullable::<String>(Some(None)),
			ActiveValue::Set(None)
		);
		assert_eq!(set_if(Some(3)), ActiveValue::Set(3));
	}
}
