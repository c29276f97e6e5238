use anyhow::{Context, Result};
use introlink_core::{start_web_server, AppConfig};
use std::fs::OpenOptions;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first
    let log_path = std::env::var("INTROLINK_LOG_PATH")
        .unwrap_or_else(|_| "/tmp/introlink.log".to_string());
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("introlink_core=info,rocket::server=off")),
        )
        .init();

    let port = std::env::var("ROCKET_PORT")
        .map_err(|_| anyhow::anyhow!("ROCKET_PORT environment variable not set"))?
        .parse::<u16>()
        .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;

    let config = AppConfig::load()?;
    config.ensure_directories().await?;

    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    info!("Database: {}", config.database_path.display());
    info!("Server: http://0.0.0.0:{}", port);

    start_web_server(config).await
}
