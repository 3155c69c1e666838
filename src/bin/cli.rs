use anyhow::Result;
use clap::Parser;
use cloudguard_core::config::AppConfig;
use cloudguard_core::infrastructure::cli::{self, Cli};
use cloudguard_core::infrastructure::logging;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	let config = AppConfig::load_or_create(&cli.data_dir()?)?.with_env_overrides()?;
	let _guard = logging::init_tracing(&config.logs_dir(), &config.log_level)?;

	cli::run(cli, config).await
}
