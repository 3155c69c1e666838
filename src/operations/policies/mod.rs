//! Policy (control) commands and queries

mod input;

pub use input::{NewPolicy, PolicyListOptions, PolicyPatch};

use super::CascadeDeletion;
use crate::domain::CloudProvider;
use crate::error::{CoreError, Result};
use crate::infrastructure::database::entities::{policy, policy_evaluation};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::patch::{set_if, set_nullable};
use crate::shared::time;
use sea_orm::{
	ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
	QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub(crate) async fn find<C: ConnectionTrait>(conn: &C, id: i32) -> Result<policy::Model> {
	policy::Entity::find_by_id(id)
		.one(conn)
		.await?
		.ok_or_else(|| CoreError::not_found("policy", id))
}

/// Fail with `Conflict` if another policy already holds (provider, control_id)
async fn ensure_unique<C: ConnectionTrait>(
	conn: &C,
	provider: CloudProvider,
	control_id: &str,
	except: Option<i32>,
) -> Result<()> {
	let mut query = policy::Entity::find()
		.filter(policy::Column::Provider.eq(provider))
		.filter(policy::Column::ControlId.eq(control_id));
	if let Some(id) = except {
		query = query.filter(policy::Column::Id.ne(id));
	}

	if query.one(conn).await?.is_some() {
		warn!(provider = provider.as_ref(), control_id, "Rejected duplicate policy");
		return Err(CoreError::conflict(format!(
			"policy {}/{} already exists",
			provider.as_ref(),
			control_id
		)));
	}
	Ok(())
}

pub(crate) async fn create_in<C: ConnectionTrait>(conn: &C, input: &NewPolicy) -> Result<policy::Model> {
	input.validate()?;
	ensure_unique(conn, input.provider, &input.control_id, None).await?;

	let now = time::now();
	let created = policy::ActiveModel {
		provider: Set(input.provider),
		name: Set(input.name.clone()),
		control_id: Set(input.control_id.clone()),
		category: Set(input.category.clone()),
		severity: Set(input.severity),
		description: Set(input.description.clone()),
		policy_type: Set(input.policy_type.clone()),
		scope_level: Set(input.scope_level.clone()),
		scope_name: Set(input.scope_name.clone()),
		scope_id: Set(input.scope_id.clone()),
		compliance_status: Set(input.compliance_status),
		affected_resources: Set(input.affected_resources),
		last_reviewed: Set(input.last_reviewed),
		policy_content: Set(input.policy_content.clone()),
		tags: Set(input.tags.clone()),
		created_at: Set(now),
		updated_at: Set(now),
		..Default::default()
	}
	.insert(conn)
	.await?;

	Ok(created)
}

/// Policy service
pub struct PolicyService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl PolicyService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	pub async fn create(&self, input: NewPolicy) -> Result<policy::Model> {
		let (_slot, txn) = self.db.begin_write().await?;
		let created = create_in(&txn, &input).await?;
		txn.commit().await?;

		info!(
			id = created.id,
			provider = created.provider.as_ref(),
			control_id = %created.control_id,
			"Created policy"
		);
		self.events.emit(Event::PolicyCreated {
			id: created.id,
			control_id: created.control_id.clone(),
		});

		Ok(created)
	}

	pub async fn get(&self, id: i32) -> Result<policy::Model> {
		find(self.db.conn(), id).await
	}

	/// Ordered by provider, then control id
	pub async fn list(&self, options: PolicyListOptions) -> Result<Vec<policy::Model>> {
		let mut query = policy::Entity::find();
		if let Some(provider) = options.provider {
			query = query.filter(policy::Column::Provider.eq(provider));
		}

		let policies = query
			.order_by_asc(policy::Column::Provider)
			.order_by_asc(policy::Column::ControlId)
			.offset(options.offset)
			.limit(options.limit)
			.all(self.db.conn())
			.await?;

		debug!(count = policies.len(), "Listed policies");
		Ok(policies)
	}

	pub async fn update(&self, id: i32, patch: PolicyPatch) -> Result<policy::Model> {
		patch.validate()?;

		let (_slot, txn) = self.db.begin_write().await?;
		let existing = find(&txn, id).await?;
		if let Some(control_id) = &patch.control_id {
			ensure_unique(&txn, existing.provider, control_id, Some(id)).await?;
		}

		let updated_at = time::advance(existing.updated_at);
		let mut model: policy::ActiveModel = existing.into();
		model.name = set_if(patch.name);
		model.control_id = set_if(patch.control_id);
		model.category = set_if(patch.category);
		model.severity = set_if(patch.severity);
		model.description = set_nullable(patch.description);
		model.policy_type = set_nullable(patch.policy_type);
		model.scope_level = set_nullable(patch.scope_level);
		model.scope_name = set_nullable(patch.scope_name);
		model.scope_id = set_nullable(patch.scope_id);
		model.compliance_status = set_if(patch.compliance_status);
		model.affected_resources = set_if(patch.affected_resources);
		model.last_reviewed = set_nullable(patch.last_reviewed);
		model.policy_content = set_nullable(patch.policy_content);
		model.tags = set_nullable(patch.tags);
		model.updated_at = Set(updated_at);

		let updated = model.update(&txn).await?;
		txn.commit().await?;

		info!(id, "Updated policy");
		self.events.emit(Event::PolicyUpdated { id });

		Ok(updated)
	}

	/// Delete a policy and all of its evaluations
	pub async fn delete(&self, id: i32) -> Result<CascadeDeletion> {
		let (_slot, txn) = self.db.begin_write().await?;
		find(&txn, id).await?;

		let evaluations = policy_evaluation::Entity::delete_many()
			.filter(policy_evaluation::Column::PolicyId.eq(id))
			.exec(&txn)
			.await?;
		policy::Entity::delete_by_id(id).exec(&txn).await?;
		txn.commit().await?;

		info!(id, evaluations_removed = evaluations.rows_affected, "Deleted policy");
		self.events.emit(Event::PolicyDeleted {
			id,
			evaluations_removed: evaluations.rows_affected,
		});

		Ok(CascadeDeletion {
			id,
			evaluations_removed: evaluations.rows_affected,
		})
	}
}
