//! CloudGuard core: the multi-cloud compliance state model
//!
//! A [`Core`] owns the database handle, the event bus and the password hasher,
//! and hands out one service per area of the model.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod operations;
pub mod shared;

pub use error::{CoreError, ErrorKind, Result};

use crate::config::AppConfig;
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::infrastructure::security::{Argon2Hasher, PasswordHasher};
use crate::operations::accounts::AccountService;
use crate::operations::dashboard::DashboardAggregator;
use crate::operations::evaluations::EvaluationService;
use crate::operations::notifications::NotificationInbox;
use crate::operations::policies::PolicyService;
use crate::operations::seed::{self, SeedOutcome};
use crate::operations::users::UserDirectory;
use std::sync::Arc;
use tracing::info;

/// Handle to an opened, migrated compliance store
pub struct Core {
	config: AppConfig,
	db: Arc<Database>,
	hasher: Arc<dyn PasswordHasher>,
	pub events: Arc<EventBus>,
}

impl Core {
	/// Open with the default Argon2 hasher
	pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
		Self::with_hasher(config, Arc::new(Argon2Hasher::new())).await
	}

	/// Open with a caller-supplied password hasher
	pub async fn with_hasher(
		config: AppConfig,
		hasher: Arc<dyn PasswordHasher>,
	) -> anyhow::Result<Self> {
		info!("Initializing {} core at {:?}", config.app_name, config.data_dir);
		config.ensure_directories()?;

		let db = Database::connect(&config.database_url()).await?;
		db.migrate().await?;

		let core = Self {
			config,
			db: Arc::new(db),
			hasher,
			events: Arc::new(EventBus::default()),
		};

		if core.config.seed.enabled {
			core.seed_demo_data().await?;
		}

		core.events.emit(Event::CoreStarted);
		Ok(core)
	}

	pub fn config(&self) -> &AppConfig {
		&self.config
	}

	pub fn accounts(&self) -> AccountService {
		AccountService::new(self.db.clone(), self.events.clone())
	}

	pub fn policies(&self) -> PolicyService {
		PolicyService::new(self.db.clone(), self.events.clone())
	}

	pub fn evaluations(&self) -> EvaluationService {
		EvaluationService::new(self.db.clone(), self.events.clone())
	}

	pub fn notifications(&self) -> NotificationInbox {
		NotificationInbox::new(self.db.clone(), self.events.clone())
	}

	pub fn dashboard(&self) -> DashboardAggregator {
		DashboardAggregator::new(self.db.clone())
	}

	pub fn users(&self) -> UserDirectory {
		UserDirectory::new(self.db.clone(), self.events.clone(), self.hasher.clone())
	}

	/// Seed demo data unless the configured sentinel admin already exists
	pub async fn seed_demo_data(&self) -> Result<SeedOutcome> {
		seed::seed_demo_data(
			&self.db,
			self.hasher.as_ref(),
			&self.events,
			&self.config.seed,
		)
		.await
	}
}
