//! Seams between the loaders and the outside world.
//!
//! Loaders depend on these traits rather than on the HTTP client or the
//! database, so they can run against in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use hoops_data::{ExtractedLineup, GameInfo, LineupRecord, SpineGame};
use hoops_stats_api::LineupQuery;

/// Lineup rows for one team on one date.
#[async_trait]
pub trait LineupSource: Send + Sync {
    /// Returns an empty Vec when the source has nothing for the date.
    async fn lineups_for_date(&self, query: &LineupQuery) -> Result<Vec<ExtractedLineup>>;
}

/// Read side of the game spine.
#[async_trait]
pub trait GameSpine: Send + Sync {
    /// Distinct dates `team_id` played in `season`, oldest first.
    async fn game_dates(&self, team_id: i64, season: &str) -> Result<Vec<NaiveDate>>;

    /// Up to `limit` games `team_id` played on `game_date`, ordered by game id.
    async fn games_on(&self, game_date: NaiveDate, team_id: i64, limit: i64)
        -> Result<Vec<GameInfo>>;
}

/// Write side of the lineup table.
#[async_trait]
pub trait LineupStore: Send + Sync {
    /// Upserts all records atomically and returns the number written.
    async fn upsert_lineups(&self, records: &[LineupRecord]) -> Result<u64>;
}

/// Completed games for a season.
#[async_trait]
pub trait SpineSource: Send + Sync {
    async fn completed_games(&self, season: &str) -> Result<Vec<SpineGame>>;
}

/// Write side of the game spine.
#[async_trait]
pub trait SpineStore: Send + Sync {
    async fn upsert_games(&self, games: &[SpineGame]) -> Result<u64>;
}
