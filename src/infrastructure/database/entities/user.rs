//! User entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,
	#[sea_orm(unique)]
	pub email: String,
	pub full_name: String,
	#[serde(skip_serializing)]
	pub password_hash: String,
	pub is_active: bool,
	pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::cloud_account::Entity")]
	CloudAccounts,
}

impl Related<super::cloud_account::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::CloudAccounts.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
