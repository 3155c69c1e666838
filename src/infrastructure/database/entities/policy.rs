//! Policy (control) entity

use crate::domain::{CloudProvider, ComplianceStatus, PolicySeverity};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "policies")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,
	pub provider: CloudProvider,
	pub name: String,
	pub control_id: String,
	pub category: String,
	pub severity: PolicySeverity,
	#[sea_orm(column_type = "Text", nullable)]
	pub description: Option<String>,
	pub policy_type: Option<String>,
	pub scope_level: Option<String>,
	pub scope_name: Option<String>,
	pub scope_id: Option<String>,
	/// Snapshot status kept on the policy itself, independent of evaluations
	pub compliance_status: ComplianceStatus,
	pub affected_resources: i32,
	pub last_reviewed: Option<Date>,
	#[sea_orm(column_type = "Text", nullable)]
	pub policy_content: Option<String>,
	/// Comma-delimited
	pub tags: Option<String>,
	pub created_at: DateTimeUtc,
	pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::policy_evaluation::Entity")]
	Evaluations,
}

impl Related<super::policy_evaluation::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Evaluations.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
	/// Tags split on commas, trimmed, empties dropped
	pub fn tag_list(&self) -> Vec<&str> {
		self.tags
			.as_deref()
			.map(|tags| {
				tags.split(',')
					.map(str::trim)
					.filter(|t| !t.is_empty())
					.collect()
			})
			.unwrap_or_default()
	}
}
