//! Dashboard aggregator
//!
//! Computes the compliance summary and the per-provider breakdown from one
//! grouped query, so both always describe the same committed state.

use crate::domain::{CloudProvider, ComplianceStatus};
use crate::error::Result;
use crate::infrastructure::database::entities::{cloud_account, policy_evaluation};
use crate::infrastructure::database::Database;
use sea_orm::sea_query::Expr;
use sea_orm::{EntityTrait, JoinType, QuerySelect, RelationTrait};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Global evaluation counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
	/// Number of evaluations
	pub total_policies: u64,
	pub compliant: u64,
	pub non_compliant: u64,
	pub warning: u64,
	pub unknown: u64,
}

impl ComplianceSummary {
	fn tally(&mut self, status: ComplianceStatus, count: u64) {
		self.total_policies += count;
		match status {
			ComplianceStatus::Compliant => self.compliant += count,
			ComplianceStatus::NonCompliant => self.non_compliant += count,
			ComplianceStatus::Warning => self.warning += count,
			ComplianceStatus::Unknown => self.unknown += count,
		}
	}
}

/// Evaluation counts for one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderBreakdown {
	pub provider: CloudProvider,
	/// Distinct accounts with at least one evaluation
	pub accounts: u64,
	pub compliant: u64,
	pub non_compliant: u64,
	pub warning: u64,
	pub unknown: u64,
}

impl ProviderBreakdown {
	fn empty(provider: CloudProvider) -> Self {
		Self {
			provider,
			accounts: 0,
			compliant: 0,
			non_compliant: 0,
			warning: 0,
			unknown: 0,
		}
	}

	fn tally(&mut self, status: ComplianceStatus, count: u64) {
		match status {
			ComplianceStatus::Compliant => self.compliant += count,
			ComplianceStatus::NonCompliant => self.non_compliant += count,
			ComplianceStatus::Warning => self.warning += count,
			ComplianceStatus::Unknown => self.unknown += count,
		}
	}

	pub fn evaluations(&self) -> u64 {
		self.compliant + self.non_compliant + self.warning + self.unknown
	}
}

/// Point-in-time view computed fresh on every call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
	pub summary: ComplianceSummary,
	/// Sorted by provider
	pub providers: Vec<ProviderBreakdown>,
}

/// One grouped row: provider, account, status and how many evaluations share them
type GroupRow = (CloudProvider, i32, ComplianceStatus, i64);

fn fold(rows: impl IntoIterator<Item = GroupRow>) -> DashboardSnapshot {
	let mut summary = ComplianceSummary::default();
	let mut by_provider: BTreeMap<CloudProvider, (ProviderBreakdown, HashSet<i32>)> =
		BTreeMap::new();

	for (provider, account_id, status, count) in rows {
		let count = count.max(0) as u64;
		summary.tally(status, count);

		let (row, accounts) = by_provider
			.entry(provider)
			.or_insert_with(|| (ProviderBreakdown::empty(provider), HashSet::new()));
		row.tally(status, count);
		accounts.insert(account_id);
	}

	let providers = by_provider
		.into_values()
		.map(|(mut row, accounts)| {
			row.accounts = accounts.len() as u64;
			row
		})
		.collect();

	DashboardSnapshot { summary, providers }
}

/// Builds dashboard snapshots
pub struct DashboardAggregator {
	db: Arc<Database>,
}

impl DashboardAggregator {
	pub fn new(db: Arc<Database>) -> Self {
		Self { db }
	}

	pub async fn build_snapshot(&self) -> Result<DashboardSnapshot> {
		let rows: Vec<GroupRow> = policy_evaluation::Entity::find()
			.select_only()
			.column(cloud_account::Column::Provider)
			.column(policy_evaluation::Column::AccountId)
			.column(policy_evaluation::Column::Status)
			.column_as(
				Expr::col((policy_evaluation::Entity, policy_evaluation::Column::Id)).count(),
				"evaluations",
			)
			.join(
				JoinType::InnerJoin,
				policy_evaluation::Relation::CloudAccount.def(),
			)
			.group_by(cloud_account::Column::Provider)
			.group_by(policy_evaluation::Column::AccountId)
			.group_by(policy_evaluation::Column::Status)
			.into_tuple()
			.all(self.db.conn())
			.await?;

		let snapshot = fold(rows);
		debug!(
			evaluations = snapshot.summary.total_policies,
			providers = snapshot.providers.len(),
			"Built dashboard snapshot"
		);
		Ok(snapshot)
	}
}
