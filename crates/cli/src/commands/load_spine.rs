//! Load the game spine for a season.

use anyhow::Result;
use clap::Args;
use hoops_core::Season;
use hoops_etl::{SpineLoader, StatsSpineSource};
use std::sync::Arc;

use super::setup::{self, GlobalArgs};

/// Arguments for the load-spine command.
#[derive(Args, Debug, Clone)]
pub struct LoadSpineArgs {
    /// Season in YYYY-YY form (defaults to etl.current_season, then today's season)
    #[arg(long)]
    pub season: Option<Season>,
}

/// Runs the load-spine command.
///
/// # Errors
/// Returns an error if setup, the API call, or the upsert fails.
pub async fn run_load_spine(args: LoadSpineArgs, global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let season = match args.season {
        Some(season) => season,
        None => config.etl.season()?,
    };

    let db = setup::connect(&config).await?;
    let client = setup::stats_client(&config)?;

    let loader = SpineLoader::new(
        Arc::new(StatsSpineSource::new(client, config.etl.retry_policy())),
        Arc::new(db.repositories().spine),
    );

    let result = loader.load_season(&season.to_string()).await;
    db.close().await;

    result?;
    Ok(())
}
