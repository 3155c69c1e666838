//! Policy evaluation entity
//!
//! One row per (policy, account) pair holding the current verdict.

use crate::domain::ComplianceStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "policy_evaluations")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,
	pub policy_id: i32,
	pub account_id: i32,
	pub status: ComplianceStatus,
	#[sea_orm(column_type = "Text", nullable)]
	pub findings: Option<String>,
	pub resource_id: Option<String>,
	pub last_checked_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::policy::Entity",
		from = "Column::PolicyId",
		to = "super::policy::Column::Id",
		on_delete = "Cascade"
	)]
	Policy,
	#[sea_orm(
		belongs_to = "super::cloud_account::Entity",
		from = "Column::AccountId",
		to = "super::cloud_account::Column::Id",
		on_delete = "Cascade"
	)]
	CloudAccount,
}

impl Related<super::policy::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Policy.def()
	}
}

impl Related<super::cloud_account::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::CloudAccount.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
