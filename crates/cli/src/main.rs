use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::Path;

mod commands;

use commands::{GlobalArgs, LoadLineupsArgs, LoadSpineArgs};

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "Basketball stats warehouse ETL", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load lineup game logs for one team, date by date
    LoadLineups(LoadLineupsArgs),
    /// Load completed games into the game spine
    LoadSpine(LoadSpineArgs),
    /// Load the spine, then lineups for every configured team
    Daily,
    /// Apply database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.log_file.as_deref())?;

    tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Received Ctrl+C, stopping");
            Err(anyhow!("Interrupted"))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::LoadLineups(args) => commands::run_load_lineups(args, &cli.global).await,
        Commands::LoadSpine(args) => commands::run_load_spine(args, &cli.global).await,
        Commands::Daily => commands::run_daily(&cli.global).await,
        Commands::Migrate => commands::run_migrate(&cli.global).await,
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}
