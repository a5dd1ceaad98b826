//! Load lineup game logs for one team and season.

use anyhow::Result;
use clap::Args;
use hoops_core::{EtlConfig, Season};
use hoops_etl::{LineupLoader, LoadLineupsParams, StatsLineupSource};
use std::sync::Arc;
use std::time::Duration;

use super::setup::{self, GlobalArgs};

/// Arguments for the load-lineups command.
#[derive(Args, Debug, Clone)]
pub struct LoadLineupsArgs {
    /// Season in YYYY-YY form (defaults to etl.current_season, then today's season)
    #[arg(long)]
    pub season: Option<Season>,

    /// Team to load
    #[arg(long)]
    pub team_id: i64,

    /// Players per lineup
    #[arg(long)]
    pub group_quantity: Option<u8>,

    /// Only process the first N dates
    #[arg(long)]
    pub limit: Option<usize>,

    /// Pause after every date (defaults to etl.sleep_seconds)
    #[arg(long)]
    pub sleep_seconds: Option<f64>,
}

impl LoadLineupsArgs {
    /// Builds loader parameters, filling gaps from config.
    ///
    /// # Errors
    /// Returns an error if no season was given and the configured one is invalid.
    pub fn params(&self, etl: &EtlConfig) -> Result<LoadLineupsParams> {
        let season = match self.season {
            Some(season) => season,
            None => etl.season()?,
        };
        let sleep = match self.sleep_seconds {
            Some(secs) if secs.is_finite() && secs > 0.0 => Duration::from_secs_f64(secs),
            Some(_) => Duration::ZERO,
            None => etl.sleep_duration(),
        };

        Ok(LoadLineupsParams::new(season.to_string(), self.team_id)
            .with_group_quantity(i16::from(self.group_quantity.unwrap_or(etl.group_quantity)))
            .with_limit(self.limit)
            .with_sleep(sleep))
    }
}

/// Runs the load-lineups command.
///
/// # Errors
/// Returns an error if setup fails or the spine dates cannot be read.
pub async fn run_load_lineups(args: LoadLineupsArgs, global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let params = args.params(&config.etl)?;

    let db = setup::connect(&config).await?;
    let client = setup::stats_client(&config)?;
    let repos = db.repositories();

    let loader = LineupLoader::new(
        Arc::new(StatsLineupSource::new(client, config.etl.retry_policy())),
        Arc::new(repos.spine),
        Arc::new(repos.lineups),
    );

    let result = loader.run(&params).await;
    db.close().await;

    let summary = result?;
    tracing::info!("{}", summary.summary());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoops_core::AppConfig;

    fn args() -> LoadLineupsArgs {
        LoadLineupsArgs {
            season: None,
            team_id: 1_610_612_750,
            group_quantity: None,
            limit: None,
            sleep_seconds: None,
        }
    }

    #[test]
    fn test_params_fall_back_to_config() {
        let mut etl = AppConfig::default().etl;
        etl.current_season = Some("2023-24".to_string());
        etl.sleep_seconds = 0.5;

        let params = args().params(&etl).unwrap();

        assert_eq!(params.season, "2023-24");
        assert_eq!(params.group_quantity, 5);
        assert_eq!(params.sleep, Duration::from_millis(500));
        assert_eq!(params.limit, None);
    }

    #[test]
    fn test_explicit_args_win() {
        let etl = AppConfig::default().etl;
        let args = LoadLineupsArgs {
            season: Some(Season::starting(2024)),
            group_quantity: Some(3),
            limit: Some(2),
            sleep_seconds: Some(-1.0),
            ..args()
        };

        let params = args.params(&etl).unwrap();

        assert_eq!(params.season, "2024-25");
        assert_eq!(params.group_quantity, 3);
        assert_eq!(params.limit, Some(2));
        assert_eq!(params.sleep, Duration::ZERO);
    }
}
