//! Shared fixtures for the integration tests

#![allow(dead_code)]

use cloudguard_core::config::AppConfig;
use cloudguard_core::domain::CloudProvider;
use cloudguard_core::infrastructure::database::entities::{cloud_account, policy};
use cloudguard_core::operations::accounts::NewCloudAccount;
use cloudguard_core::operations::policies::NewPolicy;
use cloudguard_core::Core;
use tempfile::TempDir;

/// A core on a throwaway data directory; the directory lives as long as this
pub struct TestCore {
	pub core: Core,
	_dir: TempDir,
}

impl std::ops::Deref for TestCore {
	type Target = Core;

	fn deref(&self) -> &Core {
		&self.core
	}
}

pub fn test_config(dir: &TempDir) -> AppConfig {
	let mut config = AppConfig::default_with_dir(dir.path().to_path_buf());
	config.seed.enabled = false;
	config
}

/// Fresh, empty, migrated store
pub async fn test_core() -> TestCore {
	let dir = TempDir::new().unwrap();
	let core = Core::new(test_config(&dir)).await.unwrap();
	TestCore { core, _dir: dir }
}

pub async fn account(
	core: &Core,
	provider: CloudProvider,
	external_id: &str,
	name: &str,
) -> cloud_account::Model {
	core.accounts()
		.create(NewCloudAccount::new(provider, external_id, name))
		.await
		.unwrap()
		.account
}

pub async fn policy(core: &Core, provider: CloudProvider, control_id: &str) -> policy::Model {
	core.policies()
		.create(NewPolicy::new(
			provider,
			control_id,
			format!("Control {}", control_id),
			"Storage Security",
		))
		.await
		.unwrap()
}
