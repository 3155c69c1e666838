//! Account command inputs

use crate::domain::{AccountStatus, CloudProvider, SyncFrequency};
use crate::error::Result;
use crate::shared::patch::double_option;
use crate::shared::validation::{optional_max, require_length};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Register a new cloud account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCloudAccount {
	pub provider: CloudProvider,
	pub external_id: String,
	pub display_name: String,
	#[serde(default)]
	pub status: AccountStatus,
	#[serde(default)]
	pub access_method: Option<String>,
	#[serde(default)]
	pub credential: Option<String>,
	#[serde(default)]
	pub service_email: Option<String>,
	#[serde(default)]
	pub tenant_id: Option<String>,
	#[serde(default)]
	pub sync_frequency: SyncFrequency,
	#[serde(default = "default_auto_sync")]
	pub auto_sync: bool,
	#[serde(default)]
	pub owner_id: Option<i32>,
}

fn default_auto_sync() -> bool {
	true
}

impl NewCloudAccount {
	pub fn new(
		provider: CloudProvider,
		external_id: impl Into<String>,
		display_name: impl Into<String>,
	) -> Self {
		Self {
			provider,
			external_id: external_id.into(),
			display_name: display_name.into(),
			status: AccountStatus::default(),
			access_method: None,
			credential: None,
			service_email: None,
			tenant_id: None,
			sync_frequency: SyncFrequency::default(),
			auto_sync: true,
			owner_id: None,
		}
	}

	pub fn owned_by(mut self, owner_id: i32) -> Self {
		self.owner_id = Some(owner_id);
		self
	}

	pub(crate) fn validate(&self) -> Result<()> {
		require_length("external_id", &self.external_id, 1, 255)?;
		require_length("display_name", &self.display_name, 1, 255)?;
		validate_connector(
			self.access_method.as_deref(),
			self.credential.as_deref(),
			self.service_email.as_deref(),
			self.tenant_id.as_deref(),
		)
	}
}

/// Partial update of an account
///
/// Provider and external id identify the account and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CloudAccountPatch {
	pub display_name: Option<String>,
	pub status: Option<AccountStatus>,
	#[serde(deserialize_with = "double_option")]
	pub access_method: Option<Option<String>>,
	#[serde(deserialize_with = "double_option")]
	pub credential: Option<Option<String>>,
	#[serde(deserialize_with = "double_option")]
	pub service_email: Option<Option<String>>,
	#[serde(deserialize_with = "double_option")]
	pub tenant_id: Option<Option<String>>,
	pub sync_frequency: Option<SyncFrequency>,
	pub auto_sync: Option<bool>,
	#[serde(deserialize_with = "double_option")]
	pub last_synced_at: Option<Option<DateTime<Utc>>>,
	#[serde(deserialize_with = "double_option")]
	pub owner_id: Option<Option<i32>>,
}

impl CloudAccountPatch {
	pub(crate) fn validate(&self) -> Result<()> {
		if let Some(name) = &self.display_name {
			require_length("display_name", name, 1, 255)?;
		}
		validate_connector(
			self.access_method.as_ref().and_then(Option::as_deref),
			self.credential.as_ref().and_then(Option::as_deref),
			self.service_email.as_ref().and_then(Option::as_deref),
			self.tenant_id.as_ref().and_then(Option::as_deref),
		)
	}
}

fn validate_connector(
	access_method: Option<&str>,
	credential: Option<&str>,
	service_email: Option<&str>,
	tenant_id: Option<&str>,
) -> Result<()> {
	optional_max("access_method", access_method, 100)?;
	optional_max("credential", credential, 2000)?;
	optional_max("service_email", service_email, 255)?;
	optional_max("tenant_id", tenant_id, 255)
}

/// Listing filter; unset fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountFilter {
	pub provider: Option<CloudProvider>,
	pub status: Option<AccountStatus>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn create_defaults() {
		let input: NewCloudAccount = serde_json::from_str(
			r#"{"provider": "gcp", "external_id": "proj-1", "display_name": "Prod"}"#,
		)
		.unwrap();

		assert_eq!(input, NewCloudAccount::new(CloudProvider::Gcp, "proj-1", "Prod"));
		assert!(input.auto_sync);
		assert_eq!(input.sync_frequency, SyncFrequency::Daily);
	}

	#[test]
	fn patch_separates_absent_from_null() {
		let patch: CloudAccountPatch =
			serde_json::from_str(r#"{"display_name": "Renamed", "tenant_id": null}"#).unwrap();

		assert_eq!(patch.display_name.as_deref(), Some("Renamed"));
		assert_eq!(patch.tenant_id, Some(None));
		assert_eq!(patch.credential, None);
		assert_eq!(patch.status, None);
	}

	#[test]
	fn rejects_oversized_connector_fields() {
		let mut input = NewCloudAccount::new(CloudProvider::Aws, "1", "A");
		input.credential = Some("x".repeat(2001));
		assert!(input.validate().is_err());

		let patch = CloudAccountPatch {
			access_method: Some(Some("m".repeat(101))),
			..Default::default()
		};
		assert!(patch.validate().is_err());
	}

	#[test]
	fn rejects_blank_display_name_in_patch() {
		let patch = CloudAccountPatch {
			display_name: Some(String::new()),
			..Default::default()
		};
		assert!(patch.validate().is_err());
	}
}
