//! Application configuration

use super::{default_data_dir, SeedConfig};
use crate::config::migration::Migrate;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CONFIG_FILE: &str = "cloudguard.json";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
	/// Config schema version
	pub version: u32,

	/// Data directory path
	pub data_dir: PathBuf,

	/// Explicit database URL, otherwise a SQLite file in the data directory
	#[serde(default)]
	pub database_url: Option<String>,

	/// Logging level
	pub log_level: String,

	/// Display name used by the CLI
	#[serde(default = "default_app_name")]
	pub app_name: String,

	/// Demo seeding
	#[serde(default)]
	pub seed: SeedConfig,
}

fn default_app_name() -> String {
	"Cloud Guard Platform".to_string()
}

impl AppConfig {
	/// Load configuration from a specific data directory
	pub fn load_from(data_dir: &Path) -> Result<Self> {
		let config_path = data_dir.join(CONFIG_FILE);

		if config_path.exists() {
			info!("Loading config from {:?}", config_path);
			let json = fs::read_to_string(&config_path)?;
			let mut config: AppConfig = serde_json::from_str(&json)?;

			if config.needs_migration() {
				info!(
					"Migrating config from v{} to v{}",
					config.version,
					Self::target_version()
				);
				config.migrate()?;
				config.save()?;
			}

			Ok(config)
		} else {
			warn!("No config found, creating default at {:?}", config_path);
			let config = Self::default_with_dir(data_dir.to_path_buf());
			config.save()?;
			Ok(config)
		}
	}

	/// Load or create configuration, replacing an unreadable file with defaults
	pub fn load_or_create(data_dir: &Path) -> Result<Self> {
		Self::load_from(data_dir).or_else(|e| {
			warn!("Config unreadable ({}), writing defaults", e);
			let config = Self::default_with_dir(data_dir.to_path_buf());
			config.save()?;
			Ok(config)
		})
	}

	/// Create default configuration with specific data directory
	pub fn default_with_dir(data_dir: PathBuf) -> Self {
		Self {
			version: Self::target_version(),
			data_dir,
			database_url: None,
			log_level: "info".to_string(),
			app_name: default_app_name(),
			seed: SeedConfig::default(),
		}
	}

	/// Apply `CLOUDGUARD_*` overrides from the process environment
	pub fn with_env_overrides(self) -> Result<Self> {
		self.with_overrides(|key| std::env::var(key).ok())
	}

	/// Apply overrides from any key lookup
	pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(url) = lookup("CLOUDGUARD_DATABASE_URL") {
			self.database_url = Some(url);
		}
		if let Some(level) = lookup("CLOUDGUARD_LOG_LEVEL") {
			self.log_level = level;
		}
		if let Some(flag) = lookup("CLOUDGUARD_DEMO_SEED") {
			self.seed.enabled = parse_flag(&flag)
				.ok_or_else(|| anyhow!("CLOUDGUARD_DEMO_SEED must be true or false, got {:?}", flag))?;
		}
		Ok(self)
	}

	/// Save configuration to disk
	pub fn save(&self) -> Result<()> {
		fs::create_dir_all(&self.data_dir)?;

		let config_path = self.data_dir.join(CONFIG_FILE);
		let json = serde_json::to_string_pretty(self)?;
		fs::write(&config_path, json)?;
		info!("Saved config to {:?}", config_path);
		Ok(())
	}

	/// Default SQLite database file
	pub fn database_path(&self) -> PathBuf {
		self.data_dir.join("cloudguard.db")
	}

	/// URL the core connects to
	pub fn database_url(&self) -> String {
		self.database_url
			.clone()
			.unwrap_or_else(|| format!("sqlite://{}?mode=rwc", self.database_path().display()))
	}

	/// Get the path for logs directory
	pub fn logs_dir(&self) -> PathBuf {
		self.data_dir.join("logs")
	}

	/// Ensure all required directories exist
	pub fn ensure_directories(&self) -> Result<()> {
		fs::create_dir_all(&self.data_dir)?;
		fs::create_dir_all(self.logs_dir())?;
		Ok(())
	}
}

fn parse_flag(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		let data_dir = default_data_dir().unwrap_or_else(|_| PathBuf::from("."));
		Self::default_with_dir(data_dir)
	}
}

impl Migrate for AppConfig {
	fn current_version(&self) -> u32 {
		self.version
	}

	fn target_version() -> u32 {
		1
	}

	fn migrate(&mut self) -> Result<()> {
		match self.version {
			0 => {
				self.version = 1;
				Ok(())
			}
			1 => Ok(()),
			v => Err(anyhow!("Unknown config version: {}", v)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use std::collections::HashMap;
	use tempfile::TempDir;

	#[test]
	fn creates_default_config_on_first_load() {
		let dir = TempDir::new().unwrap();
		let config = AppConfig::load_from(dir.path()).unwrap();

		assert_eq!(config.version, 1);
		assert_eq!(config.app_name, "Cloud Guard Platform");
		assert_eq!(config.seed.admin_email, "admin@cloudguard.dev");
		assert!(dir.path().join("cloudguard.json").exists());
	}

	#[test]
	fn round_trips_through_disk() {
		let dir = TempDir::new().unwrap();
		let mut config = AppConfig::default_with_dir(dir.path().to_path_buf());
		config.log_level = "debug".to_string();
		config.seed.enabled = false;
		config.save().unwrap();

		let loaded = AppConfig::load_from(dir.path()).unwrap();
		assert_eq!(loaded, config);
	}

	#[test]
	fn migrates_version_zero() {
		let dir = TempDir::new().unwrap();
		let json = serde_json::json!({
			"version": 0,
			"data_dir": dir.path(),
			"log_level": "warn",
		});
		fs::write(dir.path().join(CONFIG_FILE), json.to_string()).unwrap();

		let config = AppConfig::load_from(dir.path()).unwrap();
		assert_eq!(config.version, 1);
		assert_eq!(config.log_level, "warn");
		assert_eq!(config.seed, SeedConfig::default());
	}

	#[test]
	fn load_or_create_replaces_garbage() {
		let dir = TempDir::new().unwrap();
		fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

		let config = AppConfig::load_or_create(dir.path()).unwrap();
		assert_eq!(config.data_dir, dir.path());
	}

	#[test]
	fn database_url_defaults_to_data_dir() {
		let config = AppConfig::default_with_dir(PathBuf::from("/var/lib/cloudguard"));
		assert_eq!(
			config.database_url(),
			"sqlite:///var/lib/cloudguard/cloudguard.db?mode=rwc"
		);
	}

	#[test]
	fn overrides_apply_on_top_of_file_values() {
		let env: HashMap<&str, &str> = HashMap::from([
			("CLOUDGUARD_DATABASE_URL", "sqlite::memory:"),
			("CLOUDGUARD_LOG_LEVEL", "trace"),
			("CLOUDGUARD_DEMO_SEED", "false"),
		]);
		let config = AppConfig::default_with_dir(PathBuf::from("/tmp/cg"))
			.with_overrides(|key| env.get(key).map(|v| v.to_string()))
			.unwrap();

		assert_eq!(config.database_url(), "sqlite::memory:");
		assert_eq!(config.log_level, "trace");
		assert!(!config.seed.enabled);
	}

	#[test]
	fn rejects_unparseable_seed_flag() {
		let result = AppConfig::default_with_dir(PathBuf::from("/tmp/cg")).with_overrides(|key| {
			(key == "CLOUDGUARD_DEMO_SEED").then(|| "sometimes".to_string())
		});
		assert!(result.is_err());
	}
}
