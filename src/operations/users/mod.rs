//! User directory

use crate::error::{CoreError, Result};
use crate::infrastructure::database::entities::{cloud_account, policy_evaluation, user};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::infrastructure::security::PasswordHasher;
use crate::shared::{time, validation};
use sea_orm::{
	ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
	QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registration input
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
	pub email: String,
	pub full_name: String,
	pub password: String,
}

impl NewUser {
	pub fn new(
		email: impl Into<String>,
		full_name: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			email: email.into(),
			full_name: full_name.into(),
			password: password.into(),
		}
	}

	fn validate(&self) -> Result<()> {
		validation::email("email", &self.email)?;
		validation::require_length("full_name", &self.full_name, 1, 255)?;
		validation::require_length("password", &self.password, 6, 128)
	}
}

/// Result of removing a user and everything they own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserDeletion {
	pub id: i32,
	pub accounts_removed: u64,
	pub evaluations_removed: u64,
}

pub(crate) async fn find_by_email_in<C: ConnectionTrait>(
	conn: &C,
	email: &str,
) -> Result<Option<user::Model>> {
	Ok(user::Entity::find()
		.filter(user::Column::Email.eq(email))
		.one(conn)
		.await?)
}

/// Insert a user on `conn`, hashing the password first
pub(crate) async fn register_in<C: ConnectionTrait>(
	conn: &C,
	hasher: &dyn PasswordHasher,
	input: &NewUser,
) -> Result<user::Model> {
	input.validate()?;

	if find_by_email_in(conn, &input.email).await?.is_some() {
		warn!(email = %input.email, "Rejected duplicate user");
		return Err(CoreError::conflict(format!(
			"user {} already exists",
			input.email
		)));
	}

	let password_hash = hasher.hash(&input.password)?;
	let created = user::ActiveModel {
		email: Set(input.email.clone()),
		full_name: Set(input.full_name.clone()),
		password_hash: Set(password_hash),
		is_active: Set(true),
		created_at: Set(time::now()),
		..Default::default()
	}
	.insert(conn)
	.await?;

	Ok(created)
}

/// Registration, lookup and authentication of users
pub struct UserDirectory {
	db: Arc<Database>,
	events: Arc<EventBus>,
	hasher: Arc<dyn PasswordHasher>,
}

impl UserDirectory {
	pub fn new(
		db: Arc<Database>,
		events: Arc<EventBus>,
		hasher: Arc<dyn PasswordHasher>,
	) -> Self {
		Self { db, events, hasher }
	}

	pub async fn register(&self, input: NewUser) -> Result<user::Model> {
		let _slot = self.db.write_slot().await;
		let created = register_in(self.db.conn(), self.hasher.as_ref(), &input).await?;

		info!(id = created.id, email = %created.email, "Registered user");
		self.events.emit(Event::UserRegistered { id: created.id });

		Ok(created)
	}

	pub async fn get(&self, id: i32) -> Result<user::Model> {
		user::Entity::find_by_id(id)
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("user", id))
	}

	pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
		find_by_email_in(self.db.conn(), email).await
	}

	pub async fn list(&self) -> Result<Vec<user::Model>> {
		let users = user::Entity::find()
			.order_by_asc(user::Column::Id)
			.all(self.db.conn())
			.await?;
		debug!(count = users.len(), "Listed users");
		Ok(users)
	}

	/// `None` for an unknown email, a wrong password, or an inactive user
	pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<user::Model>> {
		let Some(found) = self.find_by_email(email).await? else {
			debug!(email, "Authentication failed: unknown email");
			return Ok(None);
		};

		if !found.is_active || !self.hasher.verify(password, &found.password_hash) {
			debug!(email, "Authentication failed");
			return Ok(None);
		}

		Ok(Some(found))
	}

	/// Delete a user with their accounts and those accounts' evaluations
	pub async fn delete(&self, id: i32) -> Result<UserDeletion> {
		let (_slot, txn) = self.db.begin_write().await?;
		if user::Entity::find_by_id(id).one(&txn).await?.is_none() {
			return Err(CoreError::not_found("user", id));
		}

		let account_ids: Vec<i32> = cloud_account::Entity::find()
			.select_only()
			.column(cloud_account::Column::Id)
			.filter(cloud_account::Column::OwnerId.eq(id))
			.into_tuple()
			.all(&txn)
			.await?;

		let evaluations_removed = if account_ids.is_empty() {
			0
		} else {
			policy_evaluation::Entity::delete_many()
				.filter(policy_evaluation::Column::AccountId.is_in(account_ids.clone()))
				.exec(&txn)
				.await?
				.rows_affected
		};
		let accounts_removed = cloud_account::Entity::delete_many()
			.filter(cloud_account::Column::OwnerId.eq(id))
			.exec(&txn)
			.await?
			.rows_affected;
		user::Entity::delete_by_id(id).exec(&txn).await?;
		txn.commit().await?;

		info!(id, accounts_removed, evaluations_removed, "Deleted user");
		self.events.emit(Event::UserDeleted {
			id,
			accounts_removed,
		});

		Ok(UserDeletion {
			id,
			accounts_removed,
			evaluations_removed,
		})
	}
}
