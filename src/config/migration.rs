//! Config schema migration

use anyhow::Result;

/// Versioned configuration that can upgrade itself in place
pub trait Migrate {
	/// Version the loaded value was written with
	fn current_version(&self) -> u32;

	/// Version this build writes
	fn target_version() -> u32;

	/// Upgrade to `target_version()`
	fn migrate(&mut self) -> Result<()>;

	fn needs_migration(&self) -> bool {
		self.current_version() < Self::target_version()
	}
}
