//! User directory

mod helpers;

use cloudguard_core::domain::CloudProvider;
use cloudguard_core::operations::accounts::NewCloudAccount;
use cloudguard_core::operations::evaluations::NewEvaluation;
use cloudguard_core::operations::users::NewUser;
use cloudguard_core::infrastructure::security::PasswordHasher;
use cloudguard_core::{Core, ErrorKind};
use helpers::{policy, test_config, test_core};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

/// Reversible stand-in so hashes are predictable
struct TaggingHasher;

impl PasswordHasher for TaggingHasher {
	fn hash(&self, plaintext: &str) -> cloudguard_core::Result<String> {
		Ok(format!("tagged:{}", plaintext))
	}

	fn verify(&self, plaintext: &str, hash: &str) -> bool {
		hash == format!("tagged:{}", plaintext)
	}
}

#[tokio::test]
async fn register_and_authenticate() {
	let core = test_core().await;
	let users = core.users();

	let user = users
		.register(NewUser::new("ops@example.com", "Ops Team", "s3cret!"))
		.await
		.unwrap();
	assert!(user.is_active);
	assert_ne!(user.password_hash, "s3cret!");

	let ok = users.authenticate("ops@example.com", "s3cret!").await.unwrap();
	assert_eq!(ok.map(|u| u.id), Some(user.id));
	assert!(users
		.authenticate("ops@example.com", "wrong")
		.await
		.unwrap()
		.is_none());
	assert!(users
		.authenticate("nobody@example.com", "s3cret!")
		.await
		.unwrap()
		.is_none());
}

#[tokio::test]
async fn password_hash_is_never_serialized() {
	let core = test_core().await;
	let user = core
		.users()
		.register(NewUser::new("a@example.com", "A", "password"))
		.await
		.unwrap();

	let json = serde_json::to_value(&user).unwrap();
	assert!(json.get("password_hash").is_none());
	assert_eq!(json["email"], "a@example.com");
}

#[tokio::test]
async fn emails_are_unique() {
	let core = test_core().await;
	let users = core.users();
	users
		.register(NewUser::new("a@example.com", "A", "password"))
		.await
		.unwrap();

	let err = users
		.register(NewUser::new("a@example.com", "Other", "password"))
		.await
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Conflict);
	assert_eq!(users.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn registration_validates_input() {
	let core = test_core().await;
	let users = core.users();

	for input in [
		NewUser::new("not-an-email", "A", "password"),
		NewUser::new("a@example.com", "", "password"),
		NewUser::new("a@example.com", "A", "short"),
	] {
		let err = users.register(input).await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ValidationFailed);
	}
}

#[tokio::test]
async fn delete_removes_owned_accounts_and_their_evaluations() {
	let core = test_core().await;
	let owner = core
		.users()
		.register(NewUser::new("owner@example.com", "Owner", "password"))
		.await
		.unwrap();
	let owned = core
		.accounts()
		.create(NewCloudAccount::new(CloudProvider::Aws, "1", "Owned").owned_by(owner.id))
		.await
		.unwrap()
		.account;
	let unowned = core
		.accounts()
		.create(NewCloudAccount::new(CloudProvider::Aws, "2", "Shared"))
		.await
		.unwrap()
		.account;
	let p = policy(&core, CloudProvider::Aws, "C-1").await;
	core.evaluations().create(NewEvaluation::new(p.id, owned.id)).await.unwrap();
	core.evaluations().create(NewEvaluation::new(p.id, unowned.id)).await.unwrap();

	let deletion = core.users().delete(owner.id).await.unwrap();

	assert_eq!(deletion.accounts_removed, 1);
	assert_eq!(deletion.evaluations_removed, 1);
	assert_eq!(core.users().get(owner.id).await.unwrap_err().kind(), ErrorKind::NotFound);
	assert_eq!(core.accounts().get(owned.id).await.unwrap_err().kind(), ErrorKind::NotFound);
	assert!(core.accounts().get(unowned.id).await.is_ok());
	assert!(core.policies().get(p.id).await.is_ok());
}

#[tokio::test]
async fn injected_hasher_is_used_for_register_and_authenticate() {
	let dir = TempDir::new().unwrap();
	let core = Core::with_hasher(test_config(&dir), Arc::new(TaggingHasher))
		.await
		.unwrap();

	let user = core
		.users()
		.register(NewUser::new("x@example.com", "X", "hunter22"))
		.await
		.unwrap();

	assert_eq!(user.password_hash, "tagged:hunter22");
	assert!(core
		.users()
		.authenticate("x@example.com", "hunter22")
		.await
		.unwrap()
		.is_some());
}
