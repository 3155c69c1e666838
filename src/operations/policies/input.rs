//! Policy command inputs

use crate::domain::{CloudProvider, ComplianceStatus, PolicySeverity};
use crate::error::Result;
use crate::shared::patch::double_option;
use crate::shared::validation::{non_negative, optional_max, require_length};
use chrono::NaiveDate;
use serde::Deserialize;

/// Define a new control
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPolicy {
	pub provider: CloudProvider,
	pub name: String,
	pub control_id: String,
	pub category: String,
	#[serde(default)]
	pub severity: PolicySeverity,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub policy_type: Option<String>,
	#[serde(default)]
	pub scope_level: Option<String>,
	#[serde(default)]
	pub scope_name: Option<String>,
	#[serde(default)]
	pub scope_id: Option<String>,
	#[serde(default)]
	pub compliance_status: ComplianceStatus,
	#[serde(default)]
	pub affected_resources: i32,
	#[serde(default)]
	pub last_reviewed: Option<NaiveDate>,
	#[serde(default)]
	pub policy_content: Option<String>,
	#[serde(default)]
	pub tags: Option<String>,
}

impl NewPolicy {
	pub fn new(
		provider: CloudProvider,
		control_id: impl Into<String>,
		name: impl Into<String>,
		category: impl Into<String>,
	) -> Self {
		Self {
			provider,
			name: name.into(),
			control_id: control_id.into(),
			category: category.into(),
			severity: PolicySeverity::default(),
			description: None,
			policy_type: None,
			scope_level: None,
			scope_name: None,
			scope_id: None,
			compliance_status: ComplianceStatus::default(),
			affected_resources: 0,
			last_reviewed: None,
			policy_content: None,
			tags: None,
		}
	}

	pub fn with_severity(mut self, severity: PolicySeverity) -> Self {
		self.severity = severity;
		self
	}

	pub(crate) fn validate(&self) -> Result<()> {
		require_length("name", &self.name, 1, 255)?;
		require_length("control_id", &self.control_id, 1, 255)?;
		require_length("category", &self.category, 1, 255)?;
		non_negative("affected_resources", self.affected_resources)?;
		validate_metadata(
			self.policy_type.as_deref(),
			self.scope_level.as_deref(),
			self.scope_name.as_deref(),
			self.scope_id.as_deref(),
			self.tags.as_deref(),
		)
	}
}

/// Partial update of a policy
///
/// The control id may change; the provider may not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyPatch {
	pub name: Option<String>,
	pub control_id: Option<String>,
	pub category: Option<String>,
	pub severity: Option<PolicySeverity>,
	#[serde(deserialize_with = "double_option")]
	pub description: Option<Option<String>>,
	#[serde(deserialize_with = "double_option")]
	pub policy_type: Option<Option<String>>,
	#[serde(deserialize_with = "double_option")]
	pub scope_level: Option<Option<String>>,
	#[serde(deserialize_with = "double_option")]
	pub scope_name: Option<Option<String>>,
	#[serde(deserialize_with = "double_option")]
	pub scope_id: Option<Option<String>>,
	pub compliance_status: Option<ComplianceStatus>,
	pub affected_resources: Option<i32>,
	#[serde(deserialize_with = "double_option")]
	pub last_reviewed: Option<Option<NaiveDate>>,
	#[serde(deserialize_with = "double_option")]
	pub policy_content: Option<Option<String>>,
	#[serde(deserialize_with = "double_option")]
	pub tags: Option<Option<String>>,
}

impl PolicyPatch {
	pub(crate) fn validate(&self) -> Result<()> {
		if let Some(name) = &self.name {
			require_length("name", name, 1, 255)?;
		}
		if let Some(control_id) = &self.control_id {
			require_length("control_id", control_id, 1, 255)?;
		}
		if let Some(category) = &self.category {
			require_length("category", category, 1, 255)?;
		}
		if let Some(count) = self.affected_resources {
			non_negative("affected_resources", count)?;
		}
		validate_metadata(
			self.policy_type.as_ref().and_then(Option::as_deref),
			self.scope_level.as_ref().and_then(Option::as_deref),
			self.scope_name.as_ref().and_then(Option::as_deref),
			self.scope_id.as_ref().and_then(Option::as_deref),
			self.tags.as_ref().and_then(Option::as_deref),
		)
	}
}

fn validate_metadata(
	policy_type: Option<&str>,
	scope_level: Option<&str>,
	scope_name: Option<&str>,
	scope_id: Option<&str>,
	tags: Option<&str>,
) -> Result<()> {
	optional_max("policy_type", policy_type, 100)?;
	optional_max("scope_level", scope_level, 100)?;
	optional_max("scope_name", scope_name, 255)?;
	optional_max("scope_id", scope_id, 255)?;
	optional_max("tags", tags, 500)
}

/// Pagination for policy listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyListOptions {
	pub provider: Option<CloudProvider>,
	pub offset: Option<u64>,
	pub limit: Option<u64>,
}
