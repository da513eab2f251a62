use anyhow::{Context, Result};
use clap::Parser;
use jobmatch::cli::{handle_command, Cli};
use jobmatch::{core::ConfigManager, MatchClient};
use std::fs::OpenOptions;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigManager::load()?;
    config.ensure_directories()?;

    // Initialize logging before the client touches the session
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {}", config.log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Environment: {}", config.environment);
    info!("Server: {}", config.service.api_url);

    let client = MatchClient::from_config(&config)?;
    handle_command(&client, cli.command).await
}
