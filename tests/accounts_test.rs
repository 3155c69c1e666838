//! Cloud account lifecycle

mod helpers;

use cloudguard_core::domain::{AccountStatus, CloudProvider, NotificationKind, SyncFrequency};
use cloudguard_core::operations::accounts::{AccountFilter, CloudAccountPatch, NewCloudAccount};
use cloudguard_core::operations::evaluations::NewEvaluation;
use cloudguard_core::operations::notifications::NotificationListOptions;
use cloudguard_core::ErrorKind;
use chrono::Duration;
use helpers::{account, policy, test_core};
use pretty_assertions::assert_eq;
use tokio::task::JoinSet;

#[tokio::test]
async fn create_writes_four_ordered_provisioning_notifications() {
	let core = test_core().await;

	let created = core
		.accounts()
		.create(NewCloudAccount::new(CloudProvider::Aws, "111", "Prod"))
		.await
		.unwrap();

	assert_eq!(created.account.status, AccountStatus::Pending);
	assert_eq!(created.account.sync_frequency, SyncFrequency::Daily);
	assert!(created.account.auto_sync);

	let titles: Vec<_> = created.notifications.iter().map(|n| n.title.as_str()).collect();
	assert_eq!(
		titles,
		vec![
			"Initializing secure workspace",
			"Building connectors",
			"Deploying baseline policies",
			"Provisioning complete",
		]
	);
	assert_eq!(
		created.notifications[0].message,
		"Preparing guardrails for Prod (AWS)"
	);
	assert_eq!(created.notifications[3].message, "Prod is ready to ingest findings");

	let t0 = created.notifications[0].created_at;
	for (i, n) in created.notifications.iter().enumerate() {
		assert_eq!(n.kind, NotificationKind::Provisioning);
		assert!(!n.is_read);
		assert_eq!(n.created_at, t0 + Duration::seconds(2 * i as i64));
	}

	let stored = core
		.notifications()
		.list(NotificationListOptions::default())
		.await
		.unwrap();
	assert_eq!(stored.len(), 4);
	assert_eq!(stored[0].title, "Provisioning complete");
}

#[tokio::test]
async fn duplicate_natural_key_conflicts_without_side_effects() {
	let core = test_core().await;
	account(&core, CloudProvider::Aws, "111", "Prod").await;

	let err = core
		.accounts()
		.create(NewCloudAccount::new(CloudProvider::Aws, "111", "Again"))
		.await
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Conflict);

	let accounts = core.accounts().list(AccountFilter::default()).await.unwrap();
	assert_eq!(accounts.len(), 1);
	assert_eq!(core.notifications().unread_count().await.unwrap(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_with_distinct_keys_all_commit() {
	let core = test_core().await;

	let mut tasks = JoinSet::new();
	for i in 0..16 {
		let accounts = core.accounts();
		tasks.spawn(async move {
			accounts
				.create(NewCloudAccount::new(
					CloudProvider::Aws,
					format!("acct-{}", i),
					"A",
				))
				.await
		});
	}
	while let Some(joined) = tasks.join_next().await {
		joined.unwrap().unwrap();
	}

	let accounts = core.accounts().list(AccountFilter::default()).await.unwrap();
	assert_eq!(accounts.len(), 16);
	assert_eq!(core.notifications().unread_count().await.unwrap(), 64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_of_one_key_yield_a_single_winner() {
	let core = test_core().await;

	let mut tasks = JoinSet::new();
	for _ in 0..8 {
		let accounts = core.accounts();
		tasks.spawn(async move {
			accounts
				.create(NewCloudAccount::new(CloudProvider::Aws, "same", "A"))
				.await
		});
	}

	let mut created = 0;
	let mut conflicts = 0;
	while let Some(joined) = tasks.join_next().await {
		match joined.unwrap() {
			Ok(_) => created += 1,
			Err(e) => {
				assert_eq!(e.kind(), ErrorKind::Conflict, "{}", e);
				conflicts += 1;
			}
		}
	}

	assert_eq!((created, conflicts), (1, 7));
	assert_eq!(core.notifications().unread_count().await.unwrap(), 4);
}

#[tokio::test]
async fn same_external_id_under_another_provider_is_allowed() {
	let core = test_core().await;
	account(&core, CloudProvider::Aws, "shared", "A").await;
	account(&core, CloudProvider::Gcp, "shared", "B").await;

	let accounts = core.accounts().list(AccountFilter::default()).await.unwrap();
	assert_eq!(accounts.len(), 2);
}

#[tokio::test]
async fn invalid_input_is_rejected_before_storage() {
	let core = test_core().await;

	let err = core
		.accounts()
		.create(NewCloudAccount::new(CloudProvider::Azure, "", "Prod"))
		.await
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ValidationFailed);
	assert_eq!(core.notifications().unread_count().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_owner_is_not_found() {
	let core = test_core().await;

	let err = core
		.accounts()
		.create(NewCloudAccount::new(CloudProvider::Aws, "1", "A").owned_by(99))
		.await
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn patch_touches_only_supplied_fields() {
	let core = test_core().await;
	let mut input = NewCloudAccount::new(CloudProvider::Azure, "tenant-1", "Old name");
	input.status = AccountStatus::Connected;
	input.sync_frequency = SyncFrequency::Weekly;
	input.tenant_id = Some("t-123".to_string());
	let original = core.accounts().create(input).await.unwrap().account;

	let updated = core
		.accounts()
		.update(
			original.id,
			CloudAccountPatch {
				display_name: Some("New name".to_string()),
				..Default::default()
			},
		)
		.await
		.unwrap();

	assert_eq!(updated.display_name, "New name");
	assert_eq!(updated.status, AccountStatus::Connected);
	assert_eq!(updated.sync_frequency, SyncFrequency::Weekly);
	assert_eq!(updated.tenant_id.as_deref(), Some("t-123"));
	assert_eq!(updated.external_id, original.external_id);
	assert_eq!(updated.created_at, original.created_at);
	assert!(updated.updated_at > original.updated_at);
}

#[tokio::test]
async fn explicit_null_clears_a_nullable_field() {
	let core = test_core().await;
	let mut input = NewCloudAccount::new(CloudProvider::Gcp, "proj", "P");
	input.service_email = Some("svc@proj.iam".to_string());
	let original = core.accounts().create(input).await.unwrap().account;

	let patch: CloudAccountPatch = serde_json::from_str(r#"{"service_email": null}"#).unwrap();
	let updated = core.accounts().update(original.id, patch).await.unwrap();

	assert_eq!(updated.service_email, None);
	assert_eq!(updated.display_name, "P");
}

#[tokio::test]
async fn list_filters_by_provider_and_status() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Aws, "1", "A").await;
	account(&core, CloudProvider::Aws, "2", "B").await;
	account(&core, CloudProvider::Gcp, "3", "C").await;
	core.accounts().request_sync(a.id).await.unwrap();

	let aws = core
		.accounts()
		.list(AccountFilter {
			provider: Some(CloudProvider::Aws),
			status: None,
		})
		.await
		.unwrap();
	assert_eq!(aws.len(), 2);
	// newest first
	assert_eq!(aws[0].external_id, "2");

	let connected = core
		.accounts()
		.list(AccountFilter {
			provider: None,
			status: Some(AccountStatus::Connected),
		})
		.await
		.unwrap();
	assert_eq!(connected.len(), 1);
	assert_eq!(connected[0].id, a.id);
}

#[tokio::test]
async fn request_sync_promotes_pending_and_notifies() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Aws, "1", "Prod AWS").await;
	assert_eq!(a.last_synced_at, None);

	let synced = core.accounts().request_sync(a.id).await.unwrap();

	assert_eq!(synced.status, AccountStatus::Connected);
	assert!(synced.last_synced_at.is_some());
	assert!(synced.updated_at > a.updated_at);

	let inbox = core
		.notifications()
		.list(NotificationListOptions::default())
		.await
		.unwrap();
	let syncs: Vec<_> = inbox
		.iter()
		.filter(|n| n.kind == NotificationKind::AccountSync)
		.collect();
	assert_eq!(syncs.len(), 1);
	assert_eq!(syncs[0].title, "Manual sync requested");
	assert_eq!(syncs[0].message, "Prod AWS is syncing now.");
}

#[tokio::test]
async fn request_sync_keeps_error_status() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Azure, "1", "A").await;
	core.accounts()
		.update(
			a.id,
			CloudAccountPatch {
				status: Some(AccountStatus::Error),
				..Default::default()
			},
		)
		.await
		.unwrap();

	let synced = core.accounts().request_sync(a.id).await.unwrap();
	assert_eq!(synced.status, AccountStatus::Error);
}

#[tokio::test]
async fn delete_cascades_to_evaluations_only() {
	let core = test_core().await;
	let a = account(&core, CloudProvider::Aws, "1", "A").await;
	let other = account(&core, CloudProvider::Aws, "2", "B").await;
	let p1 = policy(&core, CloudProvider::Aws, "C-1").await;
	let p2 = policy(&core, CloudProvider::Aws, "C-2").await;
	for p in [&p1, &p2] {
		core.evaluations().create(NewEvaluation::new(p.id, a.id)).await.unwrap();
	}
	core.evaluations().create(NewEvaluation::new(p1.id, other.id)).await.unwrap();

	let deletion = core.accounts().delete(a.id).await.unwrap();

	assert_eq!(deletion.evaluations_removed, 2);
	assert_eq!(core.accounts().get(a.id).await.unwrap_err().kind(), ErrorKind::NotFound);
	assert!(core.evaluations().find_by_pair(p1.id, a.id).await.unwrap().is_none());
	assert!(core.evaluations().find_by_pair(p1.id, other.id).await.unwrap().is_some());
	assert!(core.policies().get(p2.id).await.is_ok());
}

#[tokio::test]
async fn missing_account_is_not_found() {
	let core = test_core().await;

	assert_eq!(core.accounts().get(7).await.unwrap_err().kind(), ErrorKind::NotFound);
	assert_eq!(
		core.accounts().delete(7).await.unwrap_err().kind(),
		ErrorKind::NotFound
	);
	assert_eq!(
		core.accounts()
			.update(7, CloudAccountPatch::default())
			.await
			.unwrap_err()
			.kind(),
		ErrorKind::NotFound
	);
	assert_eq!(
		core.accounts().request_sync(7).await.unwrap_err().kind(),
		ErrorKind::NotFound
	);
}
