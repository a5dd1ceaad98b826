//! Date-driven incremental lineup loader.
//!
//! Walks every date a team played in a season according to the game spine,
//! pulls that date's lineups from the source, resolves the game identity, and
//! upserts the enriched rows. Each date is handled independently: a failure
//! on one date is counted and the loop moves on.
//!
//! # Example
//!
//! ```ignore
//! let loader = LineupLoader::new(source, spine, store);
//! let params = LoadLineupsParams::new("2024-25", 1610612750).with_limit(Some(3));
//! let rows = loader.load_season_game_lineups_for_team(&params).await?;
//! ```

use anyhow::{Context, Result};
use hoops_data::{GameDateEntry, LineupRecord};
use hoops_stats_api::{LineupQuery, DEFAULT_GROUP_QUANTITY};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::resolution::resolve_game;
use crate::traits::{GameSpine, LineupSource, LineupStore};

/// Pause between dates unless configured otherwise.
pub const DEFAULT_SLEEP: Duration = Duration::from_secs(1);

/// Inputs for one team-season load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadLineupsParams {
    /// Season in `YYYY-YY` form.
    pub season: String,
    pub team_id: i64,
    pub group_quantity: i16,
    /// Process only the first `limit` dates. `Some(0)` means no limit.
    pub limit: Option<usize>,
    /// Pause after every date.
    pub sleep: Duration,
}

impl LoadLineupsParams {
    #[must_use]
    pub fn new(season: impl Into<String>, team_id: i64) -> Self {
        Self {
            season: season.into(),
            team_id,
            group_quantity: DEFAULT_GROUP_QUANTITY,
            limit: None,
            sleep: DEFAULT_SLEEP,
        }
    }

    #[must_use]
    pub fn with_group_quantity(mut self, group_quantity: i16) -> Self {
        self.group_quantity = group_quantity;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_sleep(mut self, sleep: Duration) -> Self {
        self.sleep = sleep;
        self
    }
}

/// Why a date produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataReason {
    /// The source returned no rows for the team.
    NoSourceRows,
    /// The source had rows but the spine has no game for the team that day.
    GameNotInSpine,
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSourceRows => write!(f, "no source rows"),
            Self::GameNotInSpine => write!(f, "game not in spine"),
        }
    }
}

/// Result of processing one date.
#[derive(Debug)]
pub enum DateOutcome {
    NoData(NoDataReason),
    Loaded { game_id: String, rows: u64 },
    Failed(anyhow::Error),
}

/// Counters for one loader run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub dates_processed: usize,
    pub success: usize,
    pub no_data: usize,
    pub failed: usize,
    pub rows_loaded: u64,
}

impl LoadSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one date's outcome to the counters.
    pub fn record(&mut self, outcome: &DateOutcome) {
        self.dates_processed += 1;
        match outcome {
            DateOutcome::NoData(_) => self.no_data += 1,
            DateOutcome::Loaded { rows, .. } => {
                self.success += 1;
                self.rows_loaded += rows;
            }
            DateOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Formats a summary report.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Dates: {}, Success: {}, No data: {}, Failed: {}, Rows: {}",
            self.dates_processed, self.success, self.no_data, self.failed, self.rows_loaded
        )
    }
}

/// Loads lineup game logs for one team at a time.
#[derive(Clone)]
pub struct LineupLoader {
    source: Arc<dyn LineupSource>,
    spine: Arc<dyn GameSpine>,
    store: Arc<dyn LineupStore>,
}

impl fmt::Debug for LineupLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineupLoader").finish_non_exhaustive()
    }
}

impl LineupLoader {
    #[must_use]
    pub fn new(
        source: Arc<dyn LineupSource>,
        spine: Arc<dyn GameSpine>,
        store: Arc<dyn LineupStore>,
    ) -> Self {
        Self {
            source,
            spine,
            store,
        }
    }

    /// Loads every spine date for the team and returns the rows written.
    ///
    /// # Errors
    /// Returns an error only if the date list cannot be read from the spine.
    pub async fn load_season_game_lineups_for_team(&self, params: &LoadLineupsParams) -> Result<u64> {
        Ok(self.run(params).await?.rows_loaded)
    }

    /// Loads every spine date for the team and returns the per-outcome counts.
    ///
    /// # Errors
    /// Returns an error only if the date list cannot be read from the spine.
    pub async fn run(&self, params: &LoadLineupsParams) -> Result<LoadSummary> {
        let mut dates = self
            .spine
            .game_dates(params.team_id, &params.season)
            .await
            .with_context(|| {
                format!(
                    "Failed to list game dates for team {} in {}",
                    params.team_id, params.season
                )
            })?;

        if let Some(limit) = params.limit.filter(|&n| n > 0) {
            dates.truncate(limit);
        }

        let total = dates.len();
        tracing::info!(
            "Loading lineups for team {} in {}: {} dates",
            params.team_id,
            params.season,
            total
        );

        let mut summary = LoadSummary::new();

        for (i, game_date) in dates.into_iter().enumerate() {
            let entry = GameDateEntry {
                game_date,
                team_id: params.team_id,
            };
            tracing::info!("[{}/{}] Processing date {}", i + 1, total, entry.api_date());

            let outcome = self.load_date(entry, params).await;
            match &outcome {
                DateOutcome::Loaded { game_id, rows } => {
                    tracing::info!("Upserted {} lineups for game {}", rows, game_id);
                }
                DateOutcome::NoData(NoDataReason::NoSourceRows) => {
                    tracing::debug!("No lineup data for {}", entry.api_date());
                }
                DateOutcome::NoData(NoDataReason::GameNotInSpine) => {
                    tracing::warn!(
                        "No spine game for team {} on {}, skipping",
                        entry.team_id,
                        entry.api_date()
                    );
                }
                DateOutcome::Failed(e) => {
                    tracing::error!("Failed to load {}: {:#}", entry.api_date(), e);
                }
            }
            summary.record(&outcome);

            tokio::time::sleep(params.sleep).await;
        }

        tracing::info!("Lineup load complete for team {}", params.team_id);
        tracing::info!("  Dates processed: {}", summary.dates_processed);
        tracing::info!("  Success: {}", summary.success);
        tracing::info!("  No data: {}", summary.no_data);
        tracing::info!("  Failed: {}", summary.failed);
        tracing::info!("  Total rows: {}", summary.rows_loaded);

        Ok(summary)
    }

    /// Processes a single date. Never fails; errors become [`DateOutcome::Failed`].
    pub async fn load_date(&self, entry: GameDateEntry, params: &LoadLineupsParams) -> DateOutcome {
        match self.try_load_date(entry, params).await {
            Ok(outcome) => outcome,
            Err(e) => DateOutcome::Failed(e),
        }
    }

    async fn try_load_date(
        &self,
        entry: GameDateEntry,
        params: &LoadLineupsParams,
    ) -> Result<DateOutcome> {
        let query = LineupQuery::new(params.season.clone(), entry.game_date, entry.team_id)
            .with_group_quantity(params.group_quantity);

        let lineups = self.source.lineups_for_date(&query).await?;
        if lineups.is_empty() {
            return Ok(DateOutcome::NoData(NoDataReason::NoSourceRows));
        }

        let Some(game) = resolve_game(self.spine.as_ref(), &entry.api_date(), entry.team_id).await?
        else {
            return Ok(DateOutcome::NoData(NoDataReason::GameNotInSpine));
        };

        let records: Vec<LineupRecord> = lineups
            .into_iter()
            .map(|lineup| LineupRecord::from_extracted(lineup, &game))
            .collect();

        let rows = self
            .store
            .upsert_lineups(&records)
            .await
            .with_context(|| format!("Failed to upsert lineups for game {}", game.game_id))?;

        Ok(DateOutcome::Loaded {
            game_id: game.game_id,
            rows,
        })
    }
}
