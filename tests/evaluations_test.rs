//! Evaluation bookkeeping and violation alerts

mod helpers;

use cloudguard_core::domain::{CloudProvider, ComplianceStatus, NotificationKind};
use cloudguard_core::operations::evaluations::{EvaluationFilter, EvaluationPatch, NewEvaluation};
use cloudguard_core::operations::notifications::NotificationListOptions;
use cloudguard_core::{Core, ErrorKind};
use helpers::{account, policy, test_core};
use pretty_assertions::assert_eq;

async fn violations(core: &Core) -> Vec<String> {
	core.notifications()
		.list(NotificationListOptions::default())
		.await
		.unwrap()
		.into_iter()
		.filter(|n| n.kind == NotificationKind::PolicyViolation)
		.map(|n| n.message)
		.collect()
}

#[tokio::test]
async fn one_evaluation_per_pair() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Aws, "1", "A").await;
	let p = policy(&core, CloudProvider::Aws, "C-1").await;

	let first = core
		.evaluations()
		.create(NewEvaluation::new(p.id, a.id).with_status(ComplianceStatus::Warning))
		.await
		.unwrap();
	let err = core
		.evaluations()
		.create(NewEvaluation::new(p.id, a.id).with_status(ComplianceStatus::Compliant))
		.await
		.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::Conflict);
	let stored = core.evaluations().get_by_pair(p.id, a.id).await.unwrap();
	assert_eq!(stored.id, first.id);
	assert_eq!(stored.status, ComplianceStatus::Warning);
	assert_eq!(
		core.evaluations().list(EvaluationFilter::default()).await.unwrap().len(),
		1
	);
}

#[tokio::test]
async fn dangling_references_are_not_found() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Aws, "1", "A").await;
	let p = policy(&core, CloudProvider::Aws, "C-1").await;

	let missing_policy = core
		.evaluations()
		.create(NewEvaluation::new(p.id + 100, a.id))
		.await
		.unwrap_err();
	let missing_account = core
		.evaluations()
		.create(NewEvaluation::new(p.id, a.id + 100))
		.await
		.unwrap_err();

	assert_eq!(missing_policy.kind(), ErrorKind::NotFound);
	assert_eq!(missing_account.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn creating_non_compliant_raises_a_violation() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Aws, "1", "Prod AWS").await;
	let p = policy(&core, CloudProvider::Aws, "CIS-2.1").await;

	core.evaluations()
		.create(NewEvaluation::new(p.id, a.id).with_status(ComplianceStatus::NonCompliant))
		.await
		.unwrap();

	assert_eq!(
		violations(&core).await,
		vec!["Control CIS-2.1 (CIS-2.1) is non-compliant on Prod AWS".to_string()]
	);
}

#[tokio::test]
async fn violation_fires_only_on_entering_non_compliant() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Aws, "1", "A").await;
	let p = policy(&core, CloudProvider::Aws, "C-1").await;
	let e = core
		.evaluations()
		.create(NewEvaluation::new(p.id, a.id).with_status(ComplianceStatus::Compliant))
		.await
		.unwrap();
	assert!(violations(&core).await.is_empty());

	let service = core.evaluations();
	service
		.update(e.id, EvaluationPatch::status(ComplianceStatus::NonCompliant))
		.await
		.unwrap();
	assert_eq!(violations(&core).await.len(), 1);

	// still failing: no new alert
	service
		.update(e.id, EvaluationPatch::status(ComplianceStatus::NonCompliant))
		.await
		.unwrap();
	assert_eq!(violations(&core).await.len(), 1);

	service
		.update(e.id, EvaluationPatch::status(ComplianceStatus::Warning))
		.await
		.unwrap();
	service
		.update(e.id, EvaluationPatch::status(ComplianceStatus::NonCompliant))
		.await
		.unwrap();
	assert_eq!(violations(&core).await.len(), 2);
}

#[tokio::test]
async fn last_checked_at_strictly_increases() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Gcp, "p", "P").await;
	let p = policy(&core, CloudProvider::Gcp, "G-1").await;
	let mut previous = core
		.evaluations()
		.create(NewEvaluation::new(p.id, a.id))
		.await
		.unwrap();

	for _ in 0..5 {
		let next = core
			.evaluations()
			.update(previous.id, EvaluationPatch::default())
			.await
			.unwrap();
		assert!(next.last_checked_at > previous.last_checked_at);
		assert_eq!(next.status, previous.status);
		previous = next;
	}
}

#[tokio::test]
async fn record_upserts_and_replaces_the_verdict() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Azure, "t", "Tenant").await;
	let p = policy(&core, CloudProvider::Azure, "AZ-1").await;

	let first = core
		.evaluations()
		.record(
			NewEvaluation::new(p.id, a.id)
				.with_status(ComplianceStatus::NonCompliant)
				.with_findings("public blob")
				.with_resource("storage/1"),
		)
		.await
		.unwrap();
	assert!(first.created);
	assert!(first.violation.is_some());

	let second = core
		.evaluations()
		.record(NewEvaluation::new(p.id, a.id).with_status(ComplianceStatus::Compliant))
		.await
		.unwrap();
	assert!(!second.created);
	assert!(second.violation.is_none());
	assert_eq!(second.evaluation.id, first.evaluation.id);
	assert_eq!(second.evaluation.findings, None);
	assert_eq!(second.evaluation.resource_id, None);
	assert!(second.evaluation.last_checked_at > first.evaluation.last_checked_at);

	let rows = core.evaluations().list(EvaluationFilter::default()).await.unwrap();
	assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn list_filters_and_orders_by_recency() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Aws, "1", "A").await;
	let b = account(&core, CloudProvider::Aws, "2", "B").await;
	let p = policy(&core, CloudProvider::Aws, "C-1").await;
	let first = core
		.evaluations()
		.create(NewEvaluation::new(p.id, a.id).with_status(ComplianceStatus::Warning))
		.await
		.unwrap();
	core.evaluations().create(NewEvaluation::new(p.id, b.id)).await.unwrap();
	core.evaluations()
		.update(first.id, EvaluationPatch::default())
		.await
		.unwrap();

	let all = core.evaluations().list(EvaluationFilter::default()).await.unwrap();
	assert_eq!(all.len(), 2);
	assert!(all[0].last_checked_at >= all[1].last_checked_at);

	let warnings = core
		.evaluations()
		.list(EvaluationFilter {
			status: Some(ComplianceStatus::Warning),
			..Default::default()
		})
		.await
		.unwrap();
	assert_eq!(warnings.len(), 1);

	let for_b = core
		.evaluations()
		.list(EvaluationFilter {
			account_id: Some(b.id),
			..Default::default()
		})
		.await
		.unwrap();
	assert_eq!(for_b.len(), 1);
	assert_eq!(for_b[0].account_id, b.id);
}

#[tokio::test]
async fn delete_missing_evaluation_is_not_found() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Aws, "1", "A").await;
	let p = policy(&core, CloudProvider::Aws, "C-1").await;
	let e = core.evaluations().create(NewEvaluation::new(p.id, a.id)).await.unwrap();

	core.evaluations().delete(e.id).await.unwrap();

	assert_eq!(
		core.evaluations().delete(e.id).await.unwrap_err().kind(),
		ErrorKind::NotFound
	);
	assert_eq!(
		core.evaluations().get_by_pair(p.id, a.id).await.unwrap_err().kind(),
		ErrorKind::NotFound
	);
}
