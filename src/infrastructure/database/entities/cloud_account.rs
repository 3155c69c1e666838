//! Cloud account entity

use crate::domain::{AccountStatus, CloudProvider, SyncFrequency};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cloud_accounts")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,
	pub provider: CloudProvider,
	pub external_id: String,
	pub display_name: String,
	pub status: AccountStatus,

	// Connector metadata, opaque to the core
	pub access_method: Option<String>,
	#[serde(skip_serializing)]
	pub credential: Option<String>,
	pub service_email: Option<String>,
	pub tenant_id: Option<String>,

	pub sync_frequency: SyncFrequency,
	pub auto_sync: bool,
	pub last_synced_at: Option<DateTimeUtc>,
	pub owner_id: Option<i32>,
	pub created_at: DateTimeUtc,
	pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::user::Entity",
		from = "Column::OwnerId",
		to = "super::user::Column::Id",
		on_delete = "Cascade"
	)]
	Owner,
	#[sea_orm(has_many = "super::policy_evaluation::Entity")]
	Evaluations,
}

impl Related<super::user::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Owner.def()
	}
}

impl Related<super::policy_evaluation::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Evaluations.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
