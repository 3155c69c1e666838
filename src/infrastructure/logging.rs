//! Tracing subscriber setup

use anyhow::{anyhow, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install console and daily-rolling file logging
///
/// `RUST_LOG` wins over `default_level`. The returned guard flushes the file
/// writer when dropped, so keep it alive for the life of the process.
pub fn init_tracing(logs_dir: &Path, default_level: &str) -> Result<WorkerGuard> {
	std::fs::create_dir_all(logs_dir)?;

	let file_appender = RollingFileAppender::new(Rotation::DAILY, logs_dir, "cloudguard.log");
	let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("{},sea_orm=warn,sqlx=warn", default_level)));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_target(false)
				// stdout is reserved for command output
				.with_writer(std::io::stderr),
		)
		.with(
			fmt::layer()
				.with_target(true)
				.with_thread_ids(true)
				.with_ansi(false)
				.with_writer(file_writer),
		)
		.try_init()
		.map_err(|e| anyhow!("Failed to initialize tracing: {}", e))?;

	Ok(guard)
}
