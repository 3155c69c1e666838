//! Evaluation command inputs

use crate::domain::ComplianceStatus;
use crate::error::Result;
use crate::shared::patch::double_option;
use crate::shared::validation::optional_max;
use serde::Deserialize;

/// Verdict for one (policy, account) pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewEvaluation {
	pub policy_id: i32,
	pub account_id: i32,
	#[serde(default)]
	pub status: ComplianceStatus,
	#[serde(default)]
	pub findings: Option<String>,
	#[serde(default)]
	pub resource_id: Option<String>,
}

impl NewEvaluation {
	pub fn new(policy_id: i32, account_id: i32) -> Self {
		Self {
			policy_id,
			account_id,
			status: ComplianceStatus::default(),
			findings: None,
			resource_id: None,
		}
	}

	pub fn with_status(mut self, status: ComplianceStatus) -> Self {
		self.status = status;
		self
	}

	pub fn with_findings(mut self, findings: impl Into<String>) -> Self {
		self.findings = Some(findings.into());
		self
	}

	pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
		self.resource_id = Some(resource_id.into());
		self
	}

	pub(crate) fn validate(&self) -> Result<()> {
		optional_max("resource_id", self.resource_id.as_deref(), 255)
	}
}

/// Partial update of an evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvaluationPatch {
	pub status: Option<ComplianceStatus>,
	#[serde(deserialize_with = "double_option")]
	pub findings: Option<Option<String>>,
	#[serde(deserialize_with = "double_option")]
	pub resource_id: Option<Option<String>>,
}

impl EvaluationPatch {
	pub fn status(status: ComplianceStatus) -> Self {
		Self {
			status: Some(status),
			..Default::default()
		}
	}

	pub(crate) fn validate(&self) -> Result<()> {
		optional_max(
			"resource_id",
			self.resource_id.as_ref().and_then(Option::as_deref),
			255,
		)
	}
}

/// Listing filter and pagination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvaluationFilter {
	pub policy_id: Option<i32>,
	pub account_id: Option<i32>,
	pub status: Option<ComplianceStatus>,
	pub offset: Option<u64>,
	pub limit: Option<u64>,
}
