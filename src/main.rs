mod cli;
mod commands;

use color_eyre::eyre::Result;
use cli::Cli;
use page_settings::config::ConfigManager;
use page_settings::logging;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse_args();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new()?,
    };
    let mut config = manager.app_config().clone();
    cli.apply_overrides(&mut config);

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = logging::init(&config.general.log_level, config.general.log_file.as_deref())?;

    commands::run(cli.command, &manager, &config).await
}
