//! Closed value sets shared by the entities
//!
//! Every enum is stored as snake_case text and `as_ref()` gives that form.
//! String parsing is case-sensitive and rejects anything outside the set
//! instead of coercing it.

use crate::error::{CoreError, Result};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, EnumString};

/// Cloud provider hosting an account or owning a control
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	PartialOrd,
	Ord,
	EnumIter,
	DeriveActiveEnum,
	EnumString,
	AsRefStr,
	Serialize,
	Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CloudProvider {
	#[sea_orm(string_value = "aws")]
	Aws,
	#[sea_orm(string_value = "azure")]
	Azure,
	#[sea_orm(string_value = "gcp")]
	Gcp,
}

impl CloudProvider {
	/// Upper-cased provider code, e.g. `AWS`
	pub fn code(&self) -> String {
		self.as_ref().to_uppercase()
	}
}

/// Connection state of a cloud account
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	EnumIter,
	DeriveActiveEnum,
	EnumString,
	AsRefStr,
	Serialize,
	Deserialize,
	Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccountStatus {
	#[default]
	#[sea_orm(string_value = "pending")]
	Pending,
	#[sea_orm(string_value = "connected")]
	Connected,
	#[sea_orm(string_value = "error")]
	Error,
}

/// How often an account is expected to sync
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	EnumIter,
	DeriveActiveEnum,
	EnumString,
	AsRefStr,
	Serialize,
	Deserialize,
	Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SyncFrequency {
	#[sea_orm(string_value = "hourly")]
	Hourly,
	#[default]
	#[sea_orm(string_value = "daily")]
	Daily,
	#[sea_orm(string_value = "weekly")]
	Weekly,
	#[sea_orm(string_value = "manual")]
	Manual,
}

/// Severity of a control
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	PartialOrd,
	Ord,
	EnumIter,
	DeriveActiveEnum,
	EnumString,
	AsRefStr,
	Serialize,
	Deserialize,
	Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PolicySeverity {
	#[sea_orm(string_value = "low")]
	Low,
	#[default]
	#[sea_orm(string_value = "medium")]
	Medium,
	#[sea_orm(string_value = "high")]
	High,
	#[sea_orm(string_value = "critical")]
	Critical,
}

/// Compliance verdict for a control on an account
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	EnumIter,
	DeriveActiveEnum,
	EnumString,
	AsRefStr,
	Serialize,
	Deserialize,
	Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComplianceStatus {
	#[sea_orm(string_value = "compliant")]
	Compliant,
	#[sea_orm(string_value = "non_compliant")]
	NonCompliant,
	#[sea_orm(string_value = "warning")]
	Warning,
	#[default]
	#[sea_orm(string_value = "unknown")]
	Unknown,
}

/// Category of an inbox notification
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	EnumIter,
	DeriveActiveEnum,
	EnumString,
	AsRefStr,
	Serialize,
	Deserialize,
	Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
	#[sea_orm(string_value = "policy_violation")]
	PolicyViolation,
	#[sea_orm(string_value = "account_sync")]
	AccountSync,
	#[sea_orm(string_value = "build_complete")]
	BuildComplete,
	#[sea_orm(string_value = "provisioning")]
	Provisioning,
	#[default]
	#[sea_orm(string_value = "broadcast")]
	Broadcast,
}

/// Parse a closed-set value, naming the offending field on failure
pub fn parse_field<T: FromStr>(field: &str, value: &str) -> Result<T> {
	value.parse::<T>().map_err(|_| {
		CoreError::validation(field, format!("'{}' is not an accepted value", value))
	})
}
