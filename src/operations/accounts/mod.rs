//! Cloud account commands and queries

mod input;

pub use input::{AccountFilter, CloudAccountPatch, NewCloudAccount};

use super::notifications::{self, provisioning, NewNotification};
use super::CascadeDeletion;
use crate::domain::{AccountStatus, NotificationKind};
use crate::error::{CoreError, Result};
use crate::infrastructure::database::entities::{
	cloud_account, notification, policy_evaluation, user,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::patch::{set_if, set_nullable};
use crate::shared::time;
use sea_orm::{
	ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An account together with the provisioning notifications written for it
#[derive(Debug, Clone)]
pub struct ProvisionedAccount {
	pub account: cloud_account::Model,
	pub notifications: Vec<notification::Model>,
}

/// Fetch an account or fail with `NotFound`
pub(crate) async fn find<C: ConnectionTrait>(conn: &C, id: i32) -> Result<cloud_account::Model> {
	cloud_account::Entity::find_by_id(id)
		.one(conn)
		.await?
		.ok_or_else(|| CoreError::not_found("cloud account", id))
}

async fn ensure_owner<C: ConnectionTrait>(conn: &C, owner_id: Option<i32>) -> Result<()> {
	if let Some(owner_id) = owner_id {
		if user::Entity::find_by_id(owner_id).one(conn).await?.is_none() {
			return Err(CoreError::not_found("user", owner_id));
		}
	}
	Ok(())
}

/// Insert an account and its provisioning sequence on `conn`
pub(crate) async fn create_in<C: ConnectionTrait>(
	conn: &C,
	input: &NewCloudAccount,
) -> Result<ProvisionedAccount> {
	input.validate()?;
	ensure_owner(conn, input.owner_id).await?;

	let duplicate = cloud_account::Entity::find()
		.filter(cloud_account::Column::Provider.eq(input.provider))
		.filter(cloud_account::Column::ExternalId.eq(input.external_id.as_str()))
		.one(conn)
		.await?;
	if duplicate.is_some() {
		warn!(
			provider = input.provider.as_ref(),
			external_id = %input.external_id,
			"Rejected duplicate cloud account"
		);
		return Err(CoreError::conflict(format!(
			"cloud account {}/{} already exists",
			input.provider.as_ref(),
			input.external_id
		)));
	}

	let now = time::now();
	let account = cloud_account::ActiveModel {
		provider: Set(input.provider),
		external_id: Set(input.external_id.clone()),
		display_name: Set(input.display_name.clone()),
		status: Set(input.status),
		access_method: Set(input.access_method.clone()),
		credential: Set(input.credential.clone()),
		service_email: Set(input.service_email.clone()),
		tenant_id: Set(input.tenant_id.clone()),
		sync_frequency: Set(input.sync_frequency),
		auto_sync: Set(input.auto_sync),
		last_synced_at: Set(None),
		owner_id: Set(input.owner_id),
		created_at: Set(now),
		updated_at: Set(now),
		..Default::default()
	}
	.insert(conn)
	.await?;

	let notifications = provisioning::provision(conn, &account, now).await?;

	Ok(ProvisionedAccount {
		account,
		notifications,
	})
}

/// Cloud account service
pub struct AccountService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl AccountService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Register an account; the provisioning notifications commit with it
	pub async fn create(&self, input: NewCloudAccount) -> Result<ProvisionedAccount> {
		let (_slot, txn) = self.db.begin_write().await?;
		let created = create_in(&txn, &input).await?;
		txn.commit().await?;

		let account = &created.account;
		info!(
			id = account.id,
			provider = account.provider.as_ref(),
			"Registered cloud account {}",
			account.display_name
		);
		self.events.emit(Event::AccountCreated {
			id: account.id,
			provider: account.provider,
			display_name: account.display_name.clone(),
		});
		for n in &created.notifications {
			self.events.emit(Event::NotificationCreated {
				id: n.id,
				kind: n.kind,
			});
		}

		Ok(created)
	}

	pub async fn get(&self, id: i32) -> Result<cloud_account::Model> {
		find(self.db.conn(), id).await
	}

	/// Newest first, optionally narrowed by provider and status
	pub async fn list(&self, filter: AccountFilter) -> Result<Vec<cloud_account::Model>> {
		let mut query = cloud_account::Entity::find();
		if let Some(provider) = filter.provider {
			query = query.filter(cloud_account::Column::Provider.eq(provider));
		}
		if let Some(status) = filter.status {
			query = query.filter(cloud_account::Column::Status.eq(status));
		}

		let accounts = query
			.order_by_desc(cloud_account::Column::CreatedAt)
			.order_by_desc(cloud_account::Column::Id)
			.all(self.db.conn())
			.await?;

		debug!(count = accounts.len(), "Listed cloud accounts");
		Ok(accounts)
	}

	/// Apply the supplied fields only
	pub async fn update(&self, id: i32, patch: CloudAccountPatch) -> Result<cloud_account::Model> {
		patch.validate()?;

		let (_slot, txn) = self.db.begin_write().await?;
		let existing = find(&txn, id).await?;
		if let Some(owner_id) = patch.owner_id {
			ensure_owner(&txn, owner_id).await?;
		}

		let updated_at = time::advance(existing.updated_at);
		let mut model: cloud_account::ActiveModel = existing.into();
		model.display_name = set_if(patch.display_name);
		model.status = set_if(patch.status);
		model.access_method = set_nullable(patch.access_method);
		model.credential = set_nullable(patch.credential);
		model.service_email = set_nullable(patch.service_email);
		model.tenant_id = set_nullable(patch.tenant_id);
		model.sync_frequency = set_if(patch.sync_frequency);
		model.auto_sync = set_if(patch.auto_sync);
		model.last_synced_at = set_nullable(patch.last_synced_at);
		model.owner_id = set_nullable(patch.owner_id);
		model.updated_at = Set(updated_at);

		let updated = model.update(&txn).await?;
		txn.commit().await?;

		info!(id, "Updated cloud account");
		self.events.emit(Event::AccountUpdated { id });

		Ok(updated)
	}

	/// Delete an account and its evaluations in one transaction
	pub async fn delete(&self, id: i32) -> Result<CascadeDeletion> {
		let (_slot, txn) = self.db.begin_write().await?;
		find(&txn, id).await?;

		let evaluations = policy_evaluation::Entity::delete_many()
			.filter(policy_evaluation::Column::AccountId.eq(id))
			.exec(&txn)
			.await?;
		cloud_account::Entity::delete_by_id(id).exec(&txn).await?;
		txn.commit().await?;

		let deletion = CascadeDeletion {
			id,
			evaluations_removed: evaluations.rows_affected,
		};
		info!(
			id,
			evaluations_removed = deletion.evaluations_removed,
			"Deleted cloud account"
		);
		self.events.emit(Event::AccountDeleted {
			id,
			evaluations_removed: deletion.evaluations_removed,
		});

		Ok(deletion)
	}

	/// Mark the account synced, promote it out of `pending`, and notify
	pub async fn request_sync(&self, id: i32) -> Result<cloud_account::Model> {
		let (_slot, txn) = self.db.begin_write().await?;
		let existing = find(&txn, id).await?;

		let now = time::now();
		let updated_at = time::advance(existing.updated_at);
		let display_name = existing.display_name.clone();
		let promote = existing.status == AccountStatus::Pending;

		let mut model: cloud_account::ActiveModel = existing.into();
		model.last_synced_at = Set(Some(now));
		if promote {
			model.status = Set(AccountStatus::Connected);
		}
		model.updated_at = Set(updated_at);
		let updated = model.update(&txn).await?;

		let notice = NewNotification {
			title: "Manual sync requested".to_string(),
			message: format!("{} is syncing now.", display_name),
			kind: NotificationKind::AccountSync,
		};
		let written = notifications::insert(&txn, &notice, now).await?;
		txn.commit().await?;

		info!(id, promoted = promote, "Requested sync for cloud account");
		self.events.emit(Event::AccountSyncRequested { id });
		self.events.emit(Event::NotificationCreated {
			id: written.id,
			kind: written.kind,
		});

		Ok(updated)
	}
}
