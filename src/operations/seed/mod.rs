//! Demo data seeding
//!
//! Idempotent: the sentinel admin user marks a seeded store, and everything
//! is written in one transaction so a failed run leaves nothing behind.

mod data;

use super::{accounts, evaluations, notifications, policies, users};
use crate::config::SeedConfig;
use crate::error::{CoreError, Result};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::infrastructure::security::PasswordHasher;
use crate::shared::time;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// What a seeding run did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
	/// The sentinel admin already exists; nothing was written
	AlreadySeeded,
	Seeded {
		users: u64,
		accounts: u64,
		policies: u64,
		evaluations: u64,
		notifications: u64,
	},
}

/// Seed demo data unless the sentinel admin is already present
pub async fn seed_demo_data(
	db: &Database,
	hasher: &dyn PasswordHasher,
	events: &EventBus,
	config: &SeedConfig,
) -> Result<SeedOutcome> {
	let (_slot, txn) = db.begin_write().await?;

	if users::find_by_email_in(&txn, &config.admin_email).await?.is_some() {
		info!(admin = %config.admin_email, "Demo data already seeded");
		return Ok(SeedOutcome::AlreadySeeded);
	}

	let admin = users::register_in(
		&txn,
		hasher,
		&users::NewUser::new(
			config.admin_email.clone(),
			config.admin_full_name.clone(),
			config.admin_password.clone(),
		),
	)
	.await?;

	let mut notification_count = 0u64;

	let mut account_ids = HashMap::new();
	for demo in &data::ACCOUNTS {
		let created = accounts::create_in(&txn, &demo.to_input(admin.id)).await?;
		notification_count += created.notifications.len() as u64;
		account_ids.insert(demo.external_id, created.account.id);
	}

	let today = time::now().date_naive();
	let mut policy_ids = HashMap::new();
	for demo in &data::POLICIES {
		let created = policies::create_in(&txn, &demo.to_input(today)).await?;
		policy_ids.insert(demo.control_id, created.id);
	}

	for (control_id, external_id, status, resource, findings) in data::EVALUATIONS {
		let (Some(&policy_id), Some(&account_id)) =
			(policy_ids.get(control_id), account_ids.get(external_id))
		else {
			return Err(CoreError::Internal(format!(
				"demo evaluation references unknown pair {}/{}",
				control_id, external_id
			)));
		};

		let mut input = evaluations::NewEvaluation::new(policy_id, account_id)
			.with_status(status)
			.with_resource(resource);
		input.findings = findings.map(str::to_string);

		let change = evaluations::create_in(&txn, &input).await?;
		if change.violation.is_some() {
			notification_count += 1;
		}
	}

	for notice in data::broadcasts() {
		notifications::insert(&txn, &notice, time::now()).await?;
		notification_count += 1;
	}

	txn.commit().await?;

	let outcome = SeedOutcome::Seeded {
		users: 1,
		accounts: account_ids.len() as u64,
		policies: policy_ids.len() as u64,
		evaluations: data::EVALUATIONS.len() as u64,
		notifications: notification_count,
	};
	info!(?outcome, "Seeded demo data");
	events.emit(Event::DemoDataSeeded);

	Ok(outcome)
}

#[cfg(test)]
mod tests {
	use super::data;
	use std::collections::HashSet;

	#[test]
	fn fixture_documents_are_valid_json() {
		for policy in &data::POLICIES {
			serde_json::from_str::<serde_json::Value>(policy.document)
				.unwrap_or_else(|e| panic!("{}: {}", policy.control_id, e));
		}
	}

	#[test]
	fn fixture_evaluations_use_distinct_pairs() {
		let pairs: HashSet<_> = data::EVALUATIONS.iter().map(|e| (e.0, e.1)).collect();
		assert_eq!(pairs.len(), data::EVALUATIONS.len());
	}

	#[test]
	fn fixture_evaluations_match_provider() {
		for (control_id, external_id, ..) in data::EVALUATIONS {
			let policy = data::POLICIES.iter().find(|p| p.control_id == control_id).unwrap();
			let account = data::ACCOUNTS.iter().find(|a| a.external_id == external_id).unwrap();
			assert_eq!(policy.provider, account.provider, "{}", control_id);
		}
	}
}
