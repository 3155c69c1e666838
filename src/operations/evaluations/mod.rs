//! Evaluation engine
//!
//! Holds exactly one evaluation per (policy, account). Every write refreshes
//! `last_checked_at`, and entering `non_compliant` raises a policy violation
//! notification in the same transaction.

mod input;

pub use input::{EvaluationFilter, EvaluationPatch, NewEvaluation};

use super::{accounts, notifications, policies};
use crate::domain::{ComplianceStatus, NotificationKind};
use crate::error::{CoreError, Result};
use crate::infrastructure::database::entities::{
	cloud_account, notification, policy, policy_evaluation,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::patch::{set_if, set_nullable};
use crate::shared::time;
use chrono::{DateTime, Utc};
use sea_orm::{
	ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
	QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a write, with the violation notice it raised if any
#[derive(Debug, Clone)]
pub struct EvaluationChange {
	pub evaluation: policy_evaluation::Model,
	/// True when the write inserted a new row
	pub created: bool,
	pub violation: Option<notification::Model>,
}

pub(crate) async fn find<C: ConnectionTrait>(
	conn: &C,
	id: i32,
) -> Result<policy_evaluation::Model> {
	policy_evaluation::Entity::find_by_id(id)
		.one(conn)
		.await?
		.ok_or_else(|| CoreError::not_found("policy evaluation", id))
}

async fn find_pair<C: ConnectionTrait>(
	conn: &C,
	policy_id: i32,
	account_id: i32,
) -> Result<Option<policy_evaluation::Model>> {
	Ok(policy_evaluation::Entity::find()
		.filter(policy_evaluation::Column::PolicyId.eq(policy_id))
		.filter(policy_evaluation::Column::AccountId.eq(account_id))
		.one(conn)
		.await?)
}

/// Title and message of a violation notice
pub fn violation_notice(
	policy: &policy::Model,
	account: &cloud_account::Model,
) -> notifications::NewNotification {
	notifications::NewNotification {
		title: "Policy violation detected".to_string(),
		message: format!(
			"{} ({}) is non-compliant on {}",
			policy.name, policy.control_id, account.display_name
		),
		kind: NotificationKind::PolicyViolation,
	}
}

async fn raise_violation<C: ConnectionTrait>(
	conn: &C,
	policy_id: i32,
	account_id: i32,
	at: DateTime<Utc>,
) -> Result<notification::Model> {
	let policy = policies::find(conn, policy_id).await?;
	let account = accounts::find(conn, account_id).await?;
	notifications::insert(conn, &violation_notice(&policy, &account), at).await
}

/// Insert a new evaluation on `conn`
pub(crate) async fn create_in<C: ConnectionTrait>(
	conn: &C,
	input: &NewEvaluation,
) -> Result<EvaluationChange> {
	input.validate()?;
	let policy = policies::find(conn, input.policy_id).await?;
	let account = accounts::find(conn, input.account_id).await?;

	if find_pair(conn, input.policy_id, input.account_id).await?.is_some() {
		warn!(
			policy_id = input.policy_id,
			account_id = input.account_id,
			"Rejected duplicate evaluation"
		);
		return Err(CoreError::conflict(format!(
			"evaluation for policy {} on account {} already exists",
			input.policy_id, input.account_id
		)));
	}

	let now = time::now();
	let evaluation = policy_evaluation::ActiveModel {
		policy_id: Set(input.policy_id),
		account_id: Set(input.account_id),
		status: Set(input.status),
		findings: Set(input.findings.clone()),
		resource_id: Set(input.resource_id.clone()),
		last_checked_at: Set(now),
		..Default::default()
	}
	.insert(conn)
	.await?;

	let violation = if evaluation.status == ComplianceStatus::NonCompliant {
		Some(notifications::insert(conn, &violation_notice(&policy, &account), now).await?)
	} else {
		None
	};

	Ok(EvaluationChange {
		evaluation,
		created: true,
		violation,
	})
}

/// Apply a patch to an existing row on `conn`
pub(crate) async fn update_in<C: ConnectionTrait>(
	conn: &C,
	existing: policy_evaluation::Model,
	patch: EvaluationPatch,
) -> Result<EvaluationChange> {
	patch.validate()?;

	let was = existing.status;
	let checked_at = time::advance(existing.last_checked_at);

	let mut model: policy_evaluation::ActiveModel = existing.into();
	model.status = set_if(patch.status);
	model.findings = set_nullable(patch.findings);
	model.resource_id = set_nullable(patch.resource_id);
	model.last_checked_at = Set(checked_at);
	let evaluation = model.update(conn).await?;

	let entered_violation =
		was != ComplianceStatus::NonCompliant && evaluation.status == ComplianceStatus::NonCompliant;
	let violation = if entered_violation {
		Some(raise_violation(conn, evaluation.policy_id, evaluation.account_id, checked_at).await?)
	} else {
		None
	};

	Ok(EvaluationChange {
		evaluation,
		created: false,
		violation,
	})
}

/// Evaluation service
pub struct EvaluationService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl EvaluationService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	fn announce(&self, change: &EvaluationChange) {
		let e = &change.evaluation;
		info!(
			id = e.id,
			policy_id = e.policy_id,
			account_id = e.account_id,
			status = e.status.as_ref(),
			created = change.created,
			"Recorded evaluation"
		);
		self.events.emit(Event::EvaluationRecorded {
			id: e.id,
			policy_id: e.policy_id,
			account_id: e.account_id,
			status: e.status,
		});
		if let Some(n) = &change.violation {
			self.events.emit(Event::NotificationCreated {
				id: n.id,
				kind: n.kind,
			});
		}
	}

	/// Create the evaluation for a pair that has none yet
	pub async fn create(&self, input: NewEvaluation) -> Result<policy_evaluation::Model> {
		let (_slot, txn) = self.db.begin_write().await?;
		let change = create_in(&txn, &input).await?;
		txn.commit().await?;

		self.announce(&change);
		Ok(change.evaluation)
	}

	pub async fn get(&self, id: i32) -> Result<policy_evaluation::Model> {
		find(self.db.conn(), id).await
	}

	/// Evaluation for a pair, `NotFound` if there is none
	pub async fn get_by_pair(
		&self,
		policy_id: i32,
		account_id: i32,
	) -> Result<policy_evaluation::Model> {
		self.find_by_pair(policy_id, account_id)
			.await?
			.ok_or_else(|| {
				CoreError::not_found(
					"policy evaluation",
					format!("(policy {}, account {})", policy_id, account_id),
				)
			})
	}

	pub async fn find_by_pair(
		&self,
		policy_id: i32,
		account_id: i32,
	) -> Result<Option<policy_evaluation::Model>> {
		find_pair(self.db.conn(), policy_id, account_id).await
	}

	/// Most recently checked first
	pub async fn list(&self, filter: EvaluationFilter) -> Result<Vec<policy_evaluation::Model>> {
		let mut query = policy_evaluation::Entity::find();
		if let Some(policy_id) = filter.policy_id {
			query = query.filter(policy_evaluation::Column::PolicyId.eq(policy_id));
		}
		if let Some(account_id) = filter.account_id {
			query = query.filter(policy_evaluation::Column::AccountId.eq(account_id));
		}
		if let Some(status) = filter.status {
			query = query.filter(policy_evaluation::Column::Status.eq(status));
		}

		let rows = query
			.order_by_desc(policy_evaluation::Column::LastCheckedAt)
			.order_by_desc(policy_evaluation::Column::Id)
			.offset(filter.offset)
			.limit(filter.limit)
			.all(self.db.conn())
			.await?;

		debug!(count = rows.len(), "Listed evaluations");
		Ok(rows)
	}

	/// Apply the supplied fields; `last_checked_at` always moves forward
	pub async fn update(
		&self,
		id: i32,
		patch: EvaluationPatch,
	) -> Result<policy_evaluation::Model> {
		let (_slot, txn) = self.db.begin_write().await?;
		let existing = find(&txn, id).await?;
		let change = update_in(&txn, existing, patch).await?;
		txn.commit().await?;

		self.announce(&change);
		Ok(change.evaluation)
	}

	pub async fn delete(&self, id: i32) -> Result<()> {
		let _slot = self.db.write_slot().await;
		let result = policy_evaluation::Entity::delete_by_id(id)
			.exec(self.db.conn())
			.await?;
		if result.rows_affected == 0 {
			return Err(CoreError::not_found("policy evaluation", id));
		}

		info!(id, "Deleted evaluation");
		self.events.emit(Event::EvaluationDeleted { id });
		Ok(())
	}

	/// Re-evaluate a pair: update its row, or create one if there is none
	///
	/// Status, findings and resource id are all replaced by the new verdict.
	pub async fn record(&self, input: NewEvaluation) -> Result<EvaluationChange> {
		let (_slot, txn) = self.db.begin_write().await?;
		let change = match find_pair(&txn, input.policy_id, input.account_id).await? {
			Some(existing) => {
				let patch = EvaluationPatch {
					status: Some(input.status),
					findings: Some(input.findings),
					resource_id: Some(input.resource_id),
				};
				update_in(&txn, existing, patch).await?
			}
			None => create_in(&txn, &input).await?,
		};
		txn.commit().await?;

		self.announce(&change);
		Ok(change)
	}
}
