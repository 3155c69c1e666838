//! Application configuration management

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub mod app_config;
pub mod migration;

pub use app_config::AppConfig;
pub use migration::Migrate;

/// Sentinel admin account used by the demo seeder
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@cloudguard.dev";

/// Platform-specific data directory resolution
pub fn default_data_dir() -> Result<PathBuf> {
	#[cfg(target_os = "windows")]
	let dir = dirs::data_dir()
		.ok_or_else(|| anyhow!("Could not determine data directory"))?
		.join("CloudGuard");

	#[cfg(not(target_os = "windows"))]
	let dir = dirs::data_local_dir()
		.ok_or_else(|| anyhow!("Could not determine data directory"))?
		.join("cloudguard");

	fs::create_dir_all(&dir)?;

	Ok(dir)
}

/// Demo data seeding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
	/// Seed on startup when the sentinel admin is missing
	pub enabled: bool,
	pub admin_email: String,
	pub admin_password: String,
	pub admin_full_name: String,
}

impl Default for SeedConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
			admin_password: "changeme123".to_string(),
			admin_full_name: "Cloud Guard Admin".to_string(),
		}
	}
}
