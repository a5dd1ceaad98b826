//! Production implementations of the loader traits.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use hoops_core::RetryPolicy;
use hoops_data::{
    ExtractedLineup, GameInfo, GameSpineRepository, LineupGameLogRepository, LineupRecord,
    SpineGame,
};
use hoops_stats_api::{
    extract_lineups, extract_spine_games, LineupQuery, StatsApiError, StatsClient,
};
use std::sync::Arc;

use crate::traits::{GameSpine, LineupSource, LineupStore, SpineSource, SpineStore};

/// Lineups from the `leaguedashlineups` endpoint.
#[derive(Debug, Clone)]
pub struct StatsLineupSource {
    client: Arc<StatsClient>,
    retry: RetryPolicy,
}

impl StatsLineupSource {
    #[must_use]
    pub fn new(client: Arc<StatsClient>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }
}

#[async_trait]
impl LineupSource for StatsLineupSource {
    async fn lineups_for_date(&self, query: &LineupQuery) -> Result<Vec<ExtractedLineup>> {
        let client = self.client.as_ref();
        let label = format!("leaguedashlineups {} team {}", query.api_date(), query.team_id);

        let table = self
            .retry
            .run_with_hint(
                &label,
                move || client.league_dash_lineups(query),
                StatsApiError::is_transient,
                StatsApiError::retry_delay,
            )
            .await
            .with_context(|| format!("Failed to fetch lineups for {}", query.api_date()))?;

        let lineups = extract_lineups(&table, query)?;
        tracing::debug!(
            "{} lineups for team {} on {} ({} rows in response)",
            lineups.len(),
            query.team_id,
            query.api_date(),
            table.len()
        );
        Ok(lineups)
    }
}

/// Completed games from the `leaguegamefinder` endpoint.
#[derive(Debug, Clone)]
pub struct StatsSpineSource {
    client: Arc<StatsClient>,
    retry: RetryPolicy,
}

impl StatsSpineSource {
    #[must_use]
    pub fn new(client: Arc<StatsClient>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }
}

#[async_trait]
impl SpineSource for StatsSpineSource {
    async fn completed_games(&self, season: &str) -> Result<Vec<SpineGame>> {
        let client = self.client.as_ref();
        let label = format!("leaguegamefinder {season}");

        let table = self
            .retry
            .run_with_hint(
                &label,
                move || client.league_game_finder(season),
                StatsApiError::is_transient,
                StatsApiError::retry_delay,
            )
            .await
            .with_context(|| format!("Failed to fetch games for season {season}"))?;

        Ok(extract_spine_games(&table, season)?)
    }
}

#[async_trait]
impl GameSpine for GameSpineRepository {
    async fn game_dates(&self, team_id: i64, season: &str) -> Result<Vec<NaiveDate>> {
        self.distinct_game_dates(team_id, season).await
    }

    async fn games_on(
        &self,
        game_date: NaiveDate,
        team_id: i64,
        limit: i64,
    ) -> Result<Vec<GameInfo>> {
        self.games_for_team_on(game_date, team_id, limit).await
    }
}

#[async_trait]
impl SpineStore for GameSpineRepository {
    async fn upsert_games(&self, games: &[SpineGame]) -> Result<u64> {
        self.upsert_batch(games).await
    }
}

#[async_trait]
impl LineupStore for LineupGameLogRepository {
    async fn upsert_lineups(&self, records: &[LineupRecord]) -> Result<u64> {
        self.upsert_batch(records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoops_core::Backoff;
    use hoops_stats_api::StatsClientConfig;
    use std::num::NonZeroU32;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> Arc<StatsClient> {
        let config = StatsClientConfig::default()
            .with_base_url(server.uri())
            .with_rate_limit(NonZeroU32::new(6000).unwrap());
        Arc::new(StatsClient::new(config).unwrap())
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(3, Backoff::Fixed(Duration::from_millis(1)))
    }

    fn query() -> LineupQuery {
        LineupQuery::new(
            "2024-25",
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            1_610_612_750,
        )
    }

    #[tokio::test]
    async fn test_lineup_source_retries_server_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/leaguedashlineups"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/leaguedashlineups"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resultSets": [{
                    "name": "Lineups",
                    "headers": ["GROUP_ID", "GROUP_NAME", "TEAM_ID", "PTS"],
                    "rowSet": [["-1-2-", "A. Edwards - R. Gobert", 1610612750, 20]]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = StatsLineupSource::new(client(&server), fast_retry());
        let lineups = source.lineups_for_date(&query()).await.unwrap();

        assert_eq!(lineups.len(), 1);
        assert_eq!(lineups[0].group_id, "-1-2-");
        assert_eq!(lineups[0].totals.pts, Some(20));
    }

    #[tokio::test]
    async fn test_lineup_source_gives_up_after_max_attempts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/leaguedashlineups"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let source = StatsLineupSource::new(client(&server), fast_retry());
        let err = source.lineups_for_date(&query()).await.unwrap_err();

        assert!(err.to_string().contains("Failed to fetch lineups for 01/15/2025"));
    }

    #[tokio::test]
    async fn test_lineup_source_does_not_retry_client_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/leaguedashlineups"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let source = StatsLineupSource::new(client(&server), fast_retry());
        assert!(source.lineups_for_date(&query()).await.is_err());
    }

    #[tokio::test]
    async fn test_lineup_source_waits_for_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/leaguedashlineups"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/leaguedashlineups"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resultSets": [{
                    "name": "Lineups",
                    "headers": ["GROUP_ID", "GROUP_NAME", "TEAM_ID", "PTS"],
                    "rowSet": [["-1-2-", "A. Edwards - R. Gobert", 1610612750, 20]]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = StatsLineupSource::new(client(&server), fast_retry());
        let started = std::time::Instant::now();
        let lineups = source.lineups_for_date(&query()).await.unwrap();

        assert_eq!(lineups.len(), 1);
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_spine_source_pairs_games() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/leaguegamefinder"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resultSets": [{
                    "name": "LeagueGameFinderResults",
                    "headers": ["TEAM_ID", "GAME_ID", "GAME_DATE", "MATCHUP", "WL"],
                    "rowSet": [
                        [1610612750, "0022400555", "2025-01-15", "MIN vs. LAL", "W"],
                        [1610612747, "0022400555", "2025-01-15", "LAL @ MIN", "L"]
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let source = StatsSpineSource::new(client(&server), fast_retry());
        let games = source.completed_games("2024-25").await.unwrap();

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team_id, 1_610_612_750);
        assert_eq!(games[0].away_team_id, 1_610_612_747);
    }
}
