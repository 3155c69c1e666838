//! Database infrastructure using SeaORM

use sea_orm::sqlx::sqlite::SqliteJournalMode;
use sea_orm::{
	ConnectOptions, Database as SeaDatabase, DatabaseConnection, DatabaseTransaction, DbErr,
	TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

pub mod entities;
pub mod migration;

/// How long a statement waits on a lock held by another connection
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database wrapper for the compliance store
///
/// SQLite allows one writer at a time, and a deferred transaction that has
/// already read cannot wait for the write lock. Every write therefore takes
/// the store's write slot first, so in-process writers queue instead of
/// failing with `SQLITE_BUSY`. Reads never take the slot.
pub struct Database {
	conn: DatabaseConnection,
	writer: Mutex<()>,
}

impl Database {
	/// Connect to an explicit database URL
	pub async fn connect(url: &str) -> Result<Self, DbErr> {
		let mut opt = ConnectOptions::new(url.to_owned());

		// Every pooled connection to `sqlite::memory:` is a separate database
		if url.contains(":memory:") {
			opt.max_connections(1).min_connections(1);
		} else {
			opt.max_connections(10)
				.min_connections(1)
				.map_sqlx_sqlite_opts(|sqlite| {
					sqlite
						.journal_mode(SqliteJournalMode::Wal)
						.busy_timeout(BUSY_TIMEOUT)
				});
		}

		opt.connect_timeout(Duration::from_secs(8))
			.acquire_timeout(Duration::from_secs(8))
			.sqlx_logging(false);

		let conn = SeaDatabase::connect(opt).await?;
		Ok(Self {
			conn,
			writer: Mutex::new(()),
		})
	}

	/// In-memory database, mainly for tests
	pub async fn memory() -> Result<Self, DbErr> {
		Self::connect("sqlite::memory:").await
	}

	/// Run migrations
	pub async fn migrate(&self) -> Result<(), DbErr> {
		migration::Migrator::up(&self.conn, None).await?;
		info!("Database migrations completed successfully");
		Ok(())
	}

	/// Get the database connection
	pub fn conn(&self) -> &DatabaseConnection {
		&self.conn
	}

	/// Hold the write slot for a single autocommit write
	pub async fn write_slot(&self) -> MutexGuard<'_, ()> {
		self.writer.lock().await
	}

	/// Open a write transaction
	///
	/// Bind the guard as `let (_slot, txn) = ...` so the transaction drops
	/// (and rolls back) before the slot is released.
	pub async fn begin_write(&self) -> Result<(MutexGuard<'_, ()>, DatabaseTransaction), DbErr> {
		let slot = self.writer.lock().await;
		let txn = self.conn.begin().await?;
		Ok((slot, txn))
	}
}
