// src/bin/guest_admin.rs
use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use introlink_core::store::GuestStore;
use introlink_core::DatabaseConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "guest-admin")]
#[command(about = "Maintenance commands for guest session data")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value = "data/introlink.db")]
    database_path: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Show row counts across the guest tables
    Stats,
    /// Delete guest sessions whose profile is older than the given number of days
    Purge {
        #[arg(long, default_value_t = 30)]
        older_than_days: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut db_config = DatabaseConfig::new(cli.database_path.clone());
    db_config.init_pool().await?;
    db_config.migrate().await?;

    let pool = db_config.pool()?;
    let store = GuestStore::new(pool);

    match cli.command {
        Command::Stats => {
            let counts = store.table_counts().await?;
            println!("Guest table row counts:");
            println!("  profiles:  {}", counts.profiles);
            println!("  summaries: {}", counts.summaries);
            println!("  contacts:  {}", counts.contacts);
            println!("  messages:  {}", counts.messages);
        }

        Command::Purge { older_than_days } => {
            let cutoff = Utc::now() - Duration::days(older_than_days);
            let purged = store.purge_older_than(cutoff).await?;
            println!(
                "Purged {} guest sessions older than {} days",
                purged, older_than_days
            );
        }
    }

    Ok(())
}
