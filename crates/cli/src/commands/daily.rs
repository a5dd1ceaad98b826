//! Scheduled daily run.

use anyhow::Result;
use hoops_etl::DailyPipeline;

use super::setup::{self, GlobalArgs};

/// Runs the daily command: spine, then lineups for every configured team.
///
/// # Errors
/// Returns an error if setup or the spine load fails.
pub async fn run_daily(global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let db = setup::connect(&config).await?;
    let client = setup::stats_client(&config)?;

    let pipeline = DailyPipeline::from_parts(client, db.repositories(), config.etl.clone());
    let result = pipeline.run().await;

    let status = db.pool_status();
    tracing::debug!(
        "Pool status: {} connections, {} idle, {} in use",
        status.size,
        status.idle,
        status.in_use
    );
    db.close().await;

    let report = result?;
    for (team_id, summary) in &report.lineups {
        tracing::info!("Team {}: {}", team_id, summary.summary());
    }
    Ok(())
}
