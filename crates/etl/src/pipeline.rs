//! Daily ETL run: spine first, then lineups for each configured team.

use anyhow::{Context, Result};
use hoops_core::{EtlConfig, Season};
use hoops_data::Repositories;
use hoops_stats_api::StatsClient;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::adapters::{StatsLineupSource, StatsSpineSource};
use crate::lineup_loader::{LineupLoader, LoadLineupsParams, LoadSummary};
use crate::spine_loader::{SpineLoadReport, SpineLoader};

/// What a pipeline run did.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub season: Season,
    pub spine: SpineLoadReport,
    pub lineups: Vec<(i64, LoadSummary)>,
    pub elapsed: Duration,
}

impl PipelineReport {
    #[must_use]
    pub fn rows_loaded(&self) -> u64 {
        self.lineups.iter().map(|(_, s)| s.rows_loaded).sum()
    }
}

#[derive(Debug, Clone)]
pub struct DailyPipeline {
    spine_loader: SpineLoader,
    lineup_loader: LineupLoader,
    config: EtlConfig,
}

impl DailyPipeline {
    #[must_use]
    pub fn new(spine_loader: SpineLoader, lineup_loader: LineupLoader, config: EtlConfig) -> Self {
        Self {
            spine_loader,
            lineup_loader,
            config,
        }
    }

    /// Wires the pipeline to the stats API and the warehouse.
    #[must_use]
    pub fn from_parts(client: Arc<StatsClient>, repos: Repositories, config: EtlConfig) -> Self {
        let retry = config.retry_policy();
        let spine = Arc::new(repos.spine);

        let spine_loader = SpineLoader::new(
            Arc::new(StatsSpineSource::new(client.clone(), retry)),
            spine.clone(),
        );
        let lineup_loader = LineupLoader::new(
            Arc::new(StatsLineupSource::new(client, retry)),
            spine,
            Arc::new(repos.lineups),
        );

        Self::new(spine_loader, lineup_loader, config)
    }

    /// The configured season, or the one in progress today.
    ///
    /// # Errors
    /// Returns an error if the configured season is not `YYYY-YY`.
    pub fn season(&self) -> Result<Season> {
        self.config
            .season()
            .context("Invalid etl.current_season in configuration")
    }

    /// Runs the spine load, then the lineup load for every configured team.
    ///
    /// # Errors
    /// Returns an error if the season is invalid, the spine load fails, or a
    /// team's date list cannot be read. Per-date lineup failures are only
    /// counted.
    pub async fn run(&self) -> Result<PipelineReport> {
        let started = Instant::now();
        let season = self.season()?;
        tracing::info!("Starting daily pipeline for {}", season);

        let spine = self.spine_loader.load_season(&season.to_string()).await?;

        let mut lineups = Vec::with_capacity(self.config.lineup_team_ids.len());
        for &team_id in &self.config.lineup_team_ids {
            let params = LoadLineupsParams::new(season.to_string(), team_id)
                .with_group_quantity(i16::from(self.config.group_quantity))
                .with_sleep(self.config.sleep_duration());
            let summary = self.lineup_loader.run(&params).await?;
            lineups.push((team_id, summary));
        }

        let report = PipelineReport {
            season,
            spine,
            lineups,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            "Daily pipeline finished in {:.1}s: {} games, {} lineup rows",
            report.elapsed.as_secs_f64(),
            report.spine.attempted,
            report.rows_loaded()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{
        date, extracted, spine_game, FakeLineupSource, FakeLineupStore, FakeSpine,
        FakeSpineSource,
    };
    use hoops_core::AppConfig;

    const WOLVES: i64 = 1_610_612_750;
    const LAKERS: i64 = 1_610_612_747;

    fn config() -> EtlConfig {
        let mut config = AppConfig::default().etl;
        config.current_season = Some("2024-25".to_string());
        config.sleep_seconds = 0.0;
        config.lineup_team_ids = vec![WOLVES, LAKERS];
        config
    }

    fn build(
        spine_games: Option<Vec<hoops_data::SpineGame>>,
        config: EtlConfig,
    ) -> (DailyPipeline, Arc<FakeLineupStore>) {
        let game_date = date(2025, 1, 15);
        let spine = Arc::new(FakeSpine::default());
        let store = Arc::new(FakeLineupStore::default());
        let source = Arc::new(FakeLineupSource::default().with_lineups(
            game_date,
            vec![
                extracted(game_date, WOLVES, "-1-", 10),
                extracted(game_date, LAKERS, "-9-", 7),
            ],
        ));

        let spine_loader = SpineLoader::new(
            Arc::new(FakeSpineSource { games: spine_games }),
            spine.clone(),
        );
        let lineup_loader = LineupLoader::new(source, spine, store.clone());
        (DailyPipeline::new(spine_loader, lineup_loader, config), store)
    }

    #[tokio::test]
    async fn test_runs_spine_then_each_team() {
        let games = vec![spine_game("0022400555", date(2025, 1, 15), WOLVES, LAKERS)];
        let (pipeline, store) = build(Some(games), config());

        let report = pipeline.run().await.unwrap();

        assert_eq!(report.season.to_string(), "2024-25");
        assert_eq!(report.spine.upserted, 1);
        assert_eq!(report.lineups.len(), 2);
        assert_eq!(report.lineups[0].0, WOLVES);
        assert_eq!(report.lineups[1].0, LAKERS);
        assert_eq!(report.rows_loaded(), 2);

        let rows = store.rows();
        assert_eq!(rows.len(), 2);
        let lakers = rows.iter().find(|r| r.team_id == LAKERS).unwrap();
        assert_eq!(lakers.game_id, "0022400555");
        assert_eq!(lakers.opponent_team_id, Some(WOLVES));
        assert_eq!(lakers.is_home, Some(false));
    }

    #[tokio::test]
    async fn test_spine_failure_aborts() {
        let (pipeline, store) = build(None, config());

        assert!(pipeline.run().await.is_err());
        assert_eq!(store.call_count(), 0);
    }

    #[test]
    fn test_season_override_and_validation() {
        let (pipeline, _) = build(Some(Vec::new()), config());
        assert_eq!(pipeline.season().unwrap().to_string(), "2024-25");

        let mut bad = config();
        bad.current_season = Some("2024-26".to_string());
        let (pipeline, _) = build(Some(Vec::new()), bad);
        assert!(pipeline.season().is_err());

        let mut auto = config();
        auto.current_season = None;
        let (pipeline, _) = build(Some(Vec::new()), auto);
        assert_eq!(pipeline.season().unwrap(), Season::current());
    }
}
